//! Default tolerances and limits for path compilation.

/// Maximum chord-to-curve deviation accepted when flattening a curve.
pub const DEFAULT_APPROXIMATION_TOLERANCE: f64 = 0.1;

/// Minimum positional delta treated as a real move. Positions closer
/// than this are considered identical.
pub const DEFAULT_OPERATION_TOLERANCE: f64 = 1e-4;

/// Slack allowed when validating that consecutive chain segments join.
pub const CHAIN_CONTINUITY_TOLERANCE: f64 = 1e-7;

/// Subdivision depth bound for curve flattening.
pub const DEFAULT_MAX_SUBDIVISION_DEPTH: u32 = 16;
