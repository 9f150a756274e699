//! Error types for program compilation.
//!
//! Failures carry enough context for diagnosis: the failing stage, and
//! the chunk index where one applies.

use plotkit_core::GeometryError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while compiling a path into a program.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The compiler configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Zero curves were supplied; no program can be produced.
    #[error("No curves to compile")]
    EmptyInput,

    /// A geometry operation failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// One chunk failed to compile. The whole compilation fails with it;
    /// no partial program is emitted.
    #[error("Chunk {index} failed to compile: {source}")]
    ChunkCompilation {
        index: usize,
        #[source]
        source: Box<CompileError>,
    },

    /// A chunk worker terminated without producing a result.
    #[error("Chunk {index} worker terminated without producing a result")]
    ChunkDispatch { index: usize },

    /// A chunk reported success but its output was missing at assembly.
    #[error("Chunk {index} output missing during assembly: {path}")]
    Assembly { index: usize, path: PathBuf },

    /// I/O error while writing program output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
