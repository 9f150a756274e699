//! The motion compiler: line chains in, G-code out.
//!
//! Tracks tool state across chains to avoid redundant pen lifts:
//! consecutive chains that share an endpoint compile into one continuous
//! draw. Multi-pass programs repeat the body with a lift and an optional
//! step-down between passes.

use crate::assembler;
use crate::config::CompilerConfig;
use crate::error::CompileResult;
use plotkit_core::{approximate, Curve, LineChain, Point};
use std::path::Path;
use tracing::warn;

const ABSOLUTE: &str = "G90 ; Absolute positioning";
const RELATIVE: &str = "G91 ; Relative positioning";
const PEN_UP: &str = "G1 Z5 ; Pen up";
const PEN_DOWN: &str = "G1 Z0 ; Pen down";

/// Non-fatal conditions recorded during compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileWarning {
    /// The program was compiled with an empty body (no curves appended).
    EmptyBody,
    /// A chain produced no draw moves: every segment was shorter than
    /// the operation tolerance.
    EmptyDraw,
}

/// Compiles an ordered sequence of line chains into one continuous
/// tool-state timeline.
///
/// The tool starts lifted at an unknown position. A path made of
/// several disjoint subpaths is compiled by calling [`append_curves`]
/// once per subpath, each with its own origin; the compiler inserts the
/// lift/travel/lower block wherever the pen actually has to move.
///
/// [`append_curves`]: MotionCompiler::append_curves
#[derive(Debug)]
pub struct MotionCompiler {
    config: CompilerConfig,
    header: Vec<String>,
    footer: Vec<String>,
    body: Vec<String>,
    position: Option<Point>,
    warnings: Vec<CompileWarning>,
}

impl MotionCompiler {
    /// Create a compiler from a configuration, validating it.
    pub fn new(config: CompilerConfig) -> CompileResult<Self> {
        let config = config.validated()?;

        let mut header = vec![
            ABSOLUTE.to_string(),
            format!("G1 F{:.0}", config.movement_speed),
        ];
        match &config.custom_header {
            Some(lines) => header.extend(lines.iter().cloned()),
            None => header.push(PEN_UP.to_string()),
        }
        let footer = config
            .custom_footer
            .clone()
            .unwrap_or_else(|| vec![PEN_UP.to_string()]);

        Ok(Self {
            config,
            header,
            footer,
            body: Vec::new(),
            position: None,
            warnings: Vec::new(),
        })
    }

    /// Append the draw moves for one chain.
    ///
    /// When the tool is not already at the chain start (within the
    /// operation tolerance), a dwell/lift/travel/lower block repositions
    /// it first. When it is, the chain continues the previous draw with
    /// no lift cycle.
    pub fn append_chain(&mut self, chain: &LineChain) {
        let start = chain.start();
        let repositioning = match self.position {
            None => true,
            Some(position) => position.distance_to(start) > self.config.operation_tolerance,
        };

        if repositioning {
            if self.config.dwell_time > 0.0 {
                self.body.push(format!("G4 P{:.0}", self.config.dwell_time));
            }
            self.body.push(PEN_UP.to_string());
            self.body
                .push(format!("G1 F{:.0}", self.config.movement_speed));
            self.body
                .push(format!("G1 X{:.3} Y{:.3}", start.x, start.y));
            self.body
                .push(format!("G1 F{:.0}", self.config.cutting_speed));
            self.body.push(PEN_DOWN.to_string());
            self.position = Some(start);
        }

        let mut cursor = self.position.unwrap_or(start);
        let mut draws = 0usize;
        for segment in chain {
            // Zero-length draws are tolerated but not emitted.
            if segment.end.distance_to(cursor) <= self.config.operation_tolerance {
                continue;
            }
            self.body
                .push(format!("G1 X{:.3} Y{:.3}", segment.end.x, segment.end.y));
            cursor = segment.end;
            draws += 1;
        }
        if draws == 0 {
            warn!("chain produced no draw moves");
            self.warnings.push(CompileWarning::EmptyDraw);
        }
        self.position = Some(chain.end());
    }

    /// Approximate each curve and append its chain, threading the
    /// implicit start point through the sequence from `origin`.
    pub fn append_curves(&mut self, origin: Point, curves: &[Curve]) -> CompileResult<()> {
        let mut cursor = origin;
        for curve in curves {
            let chain = approximate(cursor, curve, &self.config.flatten)?;
            self.append_chain(&chain);
            cursor = curve.end_point();
        }
        Ok(())
    }

    /// Render the full program: header, the body repeated once per
    /// pass with a lift (and step-down, when a pass depth is configured)
    /// between passes, then the footer. Blank lines are filtered out.
    pub fn compile(&mut self) -> String {
        if self.body.is_empty() {
            warn!("Compiling with an empty body (no curves). Is this intentional?");
            self.warnings.push(CompileWarning::EmptyBody);
        }

        let mut lines: Vec<String> = Vec::new();
        lines.extend(self.header.iter().cloned());
        if let Some(unit) = self.config.unit {
            lines.push(unit.gcode_directive().to_string());
        }

        for pass in 0..self.config.passes {
            lines.extend(self.body.iter().cloned());
            if pass + 1 < self.config.passes {
                lines.push(PEN_UP.to_string());
                if self.config.pass_depth > 0.0 {
                    lines.push(RELATIVE.to_string());
                    lines.push(format!(
                        "G1 Z{:.3} ; Step down for next pass",
                        -self.config.pass_depth
                    ));
                    lines.push(ABSOLUTE.to_string());
                }
            }
        }

        lines.extend(self.footer.iter().cloned());
        lines.retain(|line| !line.is_empty());
        lines.join("\n")
    }

    /// Compile and write the program to `path` atomically.
    pub fn compile_to_file(&mut self, path: &Path) -> CompileResult<()> {
        let program = self.compile();
        assembler::write_program(path, &program)
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// The tracked tool position, if any move has been emitted.
    pub fn position(&self) -> Option<Point> {
        self.position
    }
}
