use plotkit_compiler::{ChunkCoordinator, ChunkPolicy, CompileError, CompilerConfig, MotionCompiler};
use plotkit_core::{Curve, FlattenOptions, Point};
use std::fs;
use std::path::Path;

const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

/// Curve `i` draws through (i, 0) to (i, 1), so every draw line names
/// its curve index.
fn corner(i: usize) -> Curve {
    Curve::Corner {
        control: Point::new(i as f64, 0.0),
        end: Point::new(i as f64, 1.0),
    }
}

fn corners(n: usize) -> Vec<Curve> {
    (0..n).map(corner).collect()
}

fn parallel_policy() -> ChunkPolicy {
    ChunkPolicy {
        max_complexity: 100_000,
        parallel_threshold: 100,
        max_workers: 4,
        min_chunk_size: 10,
        use_workers: true,
    }
}

/// Draw moves only: every `G1 X..` line except the rapid travel move of
/// a repositioning block (which follows the travel feed directive).
fn draw_lines(program: &str) -> Vec<String> {
    let lines: Vec<&str> = program.lines().collect();
    lines
        .iter()
        .enumerate()
        .filter(|(i, line)| {
            line.starts_with("G1 X") && (*i == 0 || !lines[i - 1].starts_with("G1 F3000"))
        })
        .map(|(_, line)| line.to_string())
        .collect()
}

#[test]
fn test_empty_input_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gcode");
    let coordinator =
        ChunkCoordinator::new(CompilerConfig::default(), ChunkPolicy::default()).unwrap();

    let err = coordinator
        .compile_to_file(ORIGIN, &[], &output)
        .unwrap_err();
    assert!(matches!(err, CompileError::EmptyInput));
    assert!(!output.exists());
}

#[test]
fn test_small_input_compiles_sequentially() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gcode");
    let coordinator =
        ChunkCoordinator::new(CompilerConfig::default(), ChunkPolicy::default()).unwrap();

    let summary = coordinator
        .compile_to_file(ORIGIN, &corners(50), &output)
        .unwrap();
    assert_eq!(summary.chunks, 1);
    assert_eq!(summary.workers, 1);
    assert_eq!(summary.downsample_step, None);

    let program = fs::read_to_string(&output).unwrap();
    assert!(program.ends_with('\n'));
    // The whole path is continuous: one pen-down for fifty curves.
    assert_eq!(
        program.lines().filter(|l| *l == "G1 Z0 ; Pen down").count(),
        1
    );
}

#[test]
fn test_chunked_output_is_the_ordered_part_concatenation() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gcode");
    let curves = corners(240);
    let coordinator =
        ChunkCoordinator::new(CompilerConfig::default(), parallel_policy()).unwrap();

    let summary = coordinator
        .compile_to_file(ORIGIN, &curves, &output)
        .unwrap();
    let program = fs::read_to_string(&output).unwrap();

    // Rebuild each chunk with a standalone compiler and concatenate in
    // chunk order; the coordinator's file must match byte for byte.
    let chunk_size = (curves.len() / summary.workers).max(10);
    let mut manual = String::new();
    let mut manual_chunks = 0usize;
    let mut start = ORIGIN;
    for slice in curves.chunks(chunk_size) {
        let mut compiler = MotionCompiler::new(CompilerConfig::default()).unwrap();
        compiler.append_curves(start, slice).unwrap();
        manual.push_str(&compiler.compile());
        manual.push('\n');
        manual_chunks += 1;
        start = slice.last().unwrap().end_point();
    }

    assert_eq!(summary.chunks, manual_chunks);
    assert_eq!(program, manual);
    // One pen-down per chunk seam: position resets at every boundary.
    assert_eq!(
        program.lines().filter(|l| *l == "G1 Z0 ; Pen down").count(),
        summary.chunks
    );
}

#[test]
fn test_chunked_draws_match_sequential_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let curves = corners(240);

    let chunked_out = dir.path().join("chunked.gcode");
    let chunked = ChunkCoordinator::new(CompilerConfig::default(), parallel_policy()).unwrap();
    chunked
        .compile_to_file(ORIGIN, &curves, &chunked_out)
        .unwrap();

    let sequential_out = dir.path().join("sequential.gcode");
    let sequential = ChunkCoordinator::new(
        CompilerConfig::default(),
        ChunkPolicy {
            use_workers: false,
            ..parallel_policy()
        },
    )
    .unwrap();
    sequential
        .compile_to_file(ORIGIN, &curves, &sequential_out)
        .unwrap();

    // Same draw instructions in the same order; only the lift cycles at
    // chunk seams differ.
    let chunked_program = fs::read_to_string(&chunked_out).unwrap();
    let sequential_program = fs::read_to_string(&sequential_out).unwrap();
    assert_eq!(
        draw_lines(&chunked_program),
        draw_lines(&sequential_program)
    );

    // Draw X coordinates never go backwards: original curve order.
    let xs: Vec<f64> = draw_lines(&chunked_program)
        .iter()
        .map(|line| {
            line.trim_start_matches("G1 X")
                .split(' ')
                .next()
                .unwrap()
                .parse()
                .unwrap()
        })
        .collect();
    assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_downsampling_keeps_stride_curves() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gcode");
    let coordinator =
        ChunkCoordinator::new(CompilerConfig::default(), ChunkPolicy::default()).unwrap();

    // 10000 curves against the default ceiling of 4000: stride 3.
    let summary = coordinator
        .compile_to_file(ORIGIN, &corners(10_000), &output)
        .unwrap();
    assert_eq!(summary.input_curves, 10_000);
    assert_eq!(summary.downsample_step, Some(3));
    assert_eq!(summary.compiled_curves, 3334);

    let program = fs::read_to_string(&output).unwrap();
    let has_line = |line: &str| program.lines().any(|l| l == line);
    // Index 9999 = 3 * 3333 survives, its neighbors do not.
    assert!(has_line("G1 X9999.000 Y1.000"));
    assert!(!has_line("G1 X9998.000 Y1.000"));
    assert!(!has_line("G1 X1.000 Y1.000"));
}

#[test]
fn test_workers_disabled_forces_single_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gcode");
    let coordinator = ChunkCoordinator::new(
        CompilerConfig::default(),
        ChunkPolicy {
            use_workers: false,
            ..parallel_policy()
        },
    )
    .unwrap();

    let summary = coordinator
        .compile_to_file(ORIGIN, &corners(500), &output)
        .unwrap();
    assert_eq!(summary.chunks, 1);
}

#[test]
fn test_failing_chunk_fails_the_whole_compilation() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gcode");

    // Strict flattening with an unreachable tolerance: any genuinely
    // curved Smooth fails, corners are unaffected.
    let config = CompilerConfig {
        flatten: FlattenOptions {
            tolerance: 1e-12,
            max_depth: 1,
            strict: true,
        },
        ..CompilerConfig::default()
    };
    let mut curves = corners(140);
    for i in 0..20 {
        let x = (140 + i) as f64;
        curves.push(Curve::Smooth {
            control1: Point::new(x, 80.0),
            control2: Point::new(x + 1.0, 80.0),
            end: Point::new(x + 1.0, 1.0),
        });
    }

    let coordinator = ChunkCoordinator::new(config, parallel_policy()).unwrap();
    let err = coordinator
        .compile_to_file(ORIGIN, &curves, &output)
        .unwrap_err();
    assert!(matches!(err, CompileError::ChunkCompilation { .. }));
    // No partial program is ever written.
    assert!(!output.exists());
}

#[test]
fn test_chunked_compilation_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let curves = corners(300);
    let coordinator =
        ChunkCoordinator::new(CompilerConfig::default(), parallel_policy()).unwrap();

    let first = dir.path().join("first.gcode");
    let second = dir.path().join("second.gcode");
    coordinator.compile_to_file(ORIGIN, &curves, &first).unwrap();
    coordinator
        .compile_to_file(ORIGIN, &curves, &second)
        .unwrap();

    assert_eq!(
        fs::read(&first).unwrap(),
        fs::read(&second).unwrap()
    );
}

#[test]
fn test_output_parent_directory_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("out.gcode");
    let coordinator =
        ChunkCoordinator::new(CompilerConfig::default(), ChunkPolicy::default()).unwrap();

    let err = coordinator
        .compile_to_file(ORIGIN, &corners(10), &output)
        .unwrap_err();
    assert!(matches!(err, CompileError::Io(_)));
    assert!(!Path::new(&output).exists());
}
