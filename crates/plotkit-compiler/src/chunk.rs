//! Chunked, concurrent compilation of large curve sequences.
//!
//! Sequences above a complexity ceiling are stride-downsampled, then
//! split into contiguous chunks compiled by independent workers and
//! reassembled strictly in original order. Tool position is not carried
//! across a chunk boundary: every chunk starts with an unknown position,
//! so a seam costs at most one extra lift/travel/lower cycle compared to
//! a sequential compilation. This is a known, documented difference.

use crate::assembler;
use crate::compiler::MotionCompiler;
use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};
use plotkit_core::{Curve, Point};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, info_span};

/// Policy for downsampling and parallel compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkPolicy {
    /// Curve-count ceiling; longer sequences are stride-downsampled
    pub max_complexity: usize,
    /// Curve count above which workers are engaged
    pub parallel_threshold: usize,
    /// Upper bound on concurrent workers
    pub max_workers: usize,
    /// Lower bound on curves per chunk
    pub min_chunk_size: usize,
    /// Disable to force sequential compilation regardless of size
    pub use_workers: bool,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_complexity: 4000,
            parallel_threshold: 1000,
            max_workers: 4,
            min_chunk_size: 20,
            use_workers: true,
        }
    }
}

impl ChunkPolicy {
    fn validate(&self) -> CompileResult<()> {
        if self.max_complexity == 0 {
            return Err(CompileError::Configuration(
                "max_complexity must be at least 1".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(CompileError::Configuration(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.min_chunk_size == 0 {
            return Err(CompileError::Configuration(
                "min_chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a compilation did, for the embedder's diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    /// Curves supplied by the caller
    pub input_curves: usize,
    /// Curves actually compiled, after any downsampling
    pub compiled_curves: usize,
    /// Stride used for downsampling, when it was applied
    pub downsample_step: Option<usize>,
    /// Number of chunks compiled
    pub chunks: usize,
    /// Worker bound used for chunk sizing
    pub workers: usize,
}

/// A contiguous slice of the curve sequence with its resolved start point.
#[derive(Debug, Clone, Copy)]
struct Chunk<'a> {
    index: usize,
    start: Point,
    curves: &'a [Curve],
}

/// Coordinates downsampling, chunking, concurrent dispatch, and ordered
/// reassembly of one compilation.
#[derive(Debug, Clone)]
pub struct ChunkCoordinator {
    config: CompilerConfig,
    policy: ChunkPolicy,
}

impl ChunkCoordinator {
    /// Create a coordinator, validating both the compiler configuration
    /// and the chunking policy.
    pub fn new(config: CompilerConfig, policy: ChunkPolicy) -> CompileResult<Self> {
        let config = config.validated()?;
        policy.validate()?;
        Ok(Self { config, policy })
    }

    /// Compile a curve sequence into a program file at `output`.
    ///
    /// The curve list is continuous: each curve starts where the
    /// previous one ends, and the first starts at `origin`. Zero curves
    /// is a hard failure; no program can be produced from nothing.
    pub fn compile_to_file(
        &self,
        origin: Point,
        curves: &[Curve],
        output: &Path,
    ) -> CompileResult<CompileSummary> {
        if curves.is_empty() {
            return Err(CompileError::EmptyInput);
        }

        let (selected, downsample_step) = self.downsample(curves);
        let compiled_curves = selected.len();

        if self.policy.use_workers && compiled_curves > self.policy.parallel_threshold {
            let workers = self.worker_count();
            let chunk_size = (compiled_curves / workers).max(self.policy.min_chunk_size);
            let chunks = partition(origin, &selected, chunk_size);
            info!(
                curves = compiled_curves,
                workers,
                chunk_size,
                chunks = chunks.len(),
                "compiling in chunks"
            );
            self.compile_chunked(&chunks, output)?;
            Ok(CompileSummary {
                input_curves: curves.len(),
                compiled_curves,
                downsample_step,
                chunks: chunks.len(),
                workers,
            })
        } else {
            debug!(curves = compiled_curves, "compiling sequentially");
            let mut compiler = MotionCompiler::new(self.config.clone())?;
            compiler.append_curves(origin, &selected)?;
            compiler.compile_to_file(output)?;
            Ok(CompileSummary {
                input_curves: curves.len(),
                compiled_curves,
                downsample_step,
                chunks: 1,
                workers: 1,
            })
        }
    }

    /// Keep every step-th curve when the sequence exceeds the
    /// complexity ceiling. An explicit lossy simplification: the kept
    /// curves re-chain to each other, discarding the detail in between.
    fn downsample<'a>(&self, curves: &'a [Curve]) -> (Cow<'a, [Curve]>, Option<usize>) {
        if curves.len() <= self.policy.max_complexity {
            return (Cow::Borrowed(curves), None);
        }
        let step = curves.len() / self.policy.max_complexity + 1;
        let kept: Vec<Curve> = curves.iter().step_by(step).copied().collect();
        info!(
            input = curves.len(),
            kept = kept.len(),
            step,
            "curve count above complexity ceiling, downsampling"
        );
        (Cow::Owned(kept), Some(step))
    }

    fn worker_count(&self) -> usize {
        let available = thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1);
        self.policy.max_workers.min(available).max(1)
    }

    /// Dispatch one worker per chunk and reassemble the parts.
    ///
    /// Each worker owns a fresh compiler and an exclusive part file;
    /// nothing mutable is shared. Results are collected in chunk order,
    /// never completion order, and any failure fails the whole
    /// compilation before the destination is touched.
    fn compile_chunked(&self, chunks: &[Chunk<'_>], output: &Path) -> CompileResult<()> {
        let parts_dir = tempfile::tempdir()?;
        let destinations: Vec<PathBuf> = chunks
            .iter()
            .map(|chunk| {
                parts_dir
                    .path()
                    .join(format!("part-{:05}.gcode", chunk.index))
            })
            .collect();

        let results: Vec<CompileResult<()>> = thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .iter()
                .zip(&destinations)
                .map(|(chunk, dest)| scope.spawn(move || self.compile_chunk(chunk, dest)))
                .collect();
            handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| match handle.join() {
                    Ok(result) => result,
                    Err(_) => Err(CompileError::ChunkDispatch { index }),
                })
                .collect()
        });

        for (index, result) in results.into_iter().enumerate() {
            if let Err(source) = result {
                return Err(match source {
                    dispatch @ CompileError::ChunkDispatch { .. } => dispatch,
                    other => CompileError::ChunkCompilation {
                        index,
                        source: Box::new(other),
                    },
                });
            }
        }

        assembler::assemble(&destinations, output)
        // parts_dir is dropped here, releasing every part file.
    }

    fn compile_chunk(&self, chunk: &Chunk<'_>, dest: &Path) -> CompileResult<()> {
        let span = info_span!("chunk", index = chunk.index, curves = chunk.curves.len());
        let _guard = span.enter();

        let mut compiler = MotionCompiler::new(self.config.clone())?;
        compiler.append_curves(chunk.start, chunk.curves)?;
        compiler.compile_to_file(dest)?;
        debug!("chunk compiled");
        Ok(())
    }
}

/// Slice the curve sequence into contiguous chunks of `chunk_size`,
/// resolving each chunk's start point from the curve before it.
fn partition(origin: Point, curves: &[Curve], chunk_size: usize) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut start = origin;
    for (index, slice) in curves.chunks(chunk_size.max(1)).enumerate() {
        chunks.push(Chunk {
            index,
            start,
            curves: slice,
        });
        start = slice
            .last()
            .expect("chunks() never yields an empty slice")
            .end_point();
    }
    chunks
}
