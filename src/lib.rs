//! # Plotkit
//!
//! A curve-to-G-code motion program compiler for pen plotters and CNC
//! drawing machines.
//!
//! ## Architecture
//!
//! Plotkit is organized as a workspace with two crates:
//!
//! 1. **plotkit-core** - Points, curves, line chains, and tolerance-bounded
//!    curve flattening
//! 2. **plotkit-compiler** - The motion compiler, chunked parallel
//!    compilation, and atomic program assembly
//!
//! The stages that produce curves (bitmap tracing, vector-format parsing)
//! and the outer command-line shell are external collaborators: this
//! workspace compiles the curve sequences they provide into motion
//! programs ready for plotting firmware.

pub use plotkit_core::{
    approximate, Curve, FlattenOptions, GeometryError, GeometryResult, LineChain, LineSegment,
    Point, Unit,
};

pub use plotkit_compiler::{
    ChunkCoordinator, ChunkPolicy, CompileError, CompileResult, CompileSummary, CompileWarning,
    CompilerConfig, MotionCompiler,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()?;

    Ok(())
}
