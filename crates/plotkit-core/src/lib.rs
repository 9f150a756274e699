//! # Plotkit Core
//!
//! Geometric primitives and curve flattening for plotkit.
//! Provides the fundamental types shared by the motion compiler:
//! points, curves, line segments, continuity-checked line chains,
//! and the tolerance-bounded curve approximation that turns curves
//! into polylines.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod units;

pub use error::{GeometryError, GeometryResult};

pub use geometry::{
    chain::LineChain,
    curve::Curve,
    flatten::{approximate, FlattenOptions},
    LineSegment, Point,
};

pub use units::Unit;
