//! Tolerance-bounded curve flattening.
//!
//! Converts one curve into an ordered sequence of straight segments such
//! that every point on the curve lies within the configured deviation
//! tolerance of the produced polyline. Corners are already piecewise
//! linear and flatten exactly; smooth curves are subdivided recursively
//! until each chord is close enough to the sub-curve it replaces.

use super::chain::LineChain;
use super::curve::Curve;
use super::{LineSegment, Point};
use crate::constants::{DEFAULT_APPROXIMATION_TOLERANCE, DEFAULT_MAX_SUBDIVISION_DEPTH};
use crate::error::{GeometryError, GeometryResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Options controlling curve flattening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Maximum allowed deviation between the curve and its polyline.
    pub tolerance: f64,
    /// Recursion bound for subdivision.
    pub max_depth: u32,
    /// Fail instead of emitting a best-effort chord when the depth bound
    /// is reached before the tolerance is met.
    pub strict: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_APPROXIMATION_TOLERANCE,
            max_depth: DEFAULT_MAX_SUBDIVISION_DEPTH,
            strict: false,
        }
    }
}

/// Approximate one curve as a line chain, given the start point the path
/// assigns to it.
///
/// A `Corner` always produces exactly two segments with zero error. A
/// `Smooth` curve is subdivided until the deviation between each chord
/// and its sub-curve is within tolerance. A degenerate smooth curve
/// (start, controls and end coincident) produces a single zero-length
/// segment rather than an error; the compiler skips zero-length draws.
pub fn approximate(
    start: Point,
    curve: &Curve,
    options: &FlattenOptions,
) -> GeometryResult<LineChain> {
    match curve {
        Curve::Corner { control, end } => LineChain::new(vec![
            LineSegment::new(start, *control),
            LineSegment::new(*control, *end),
        ]),
        Curve::Smooth {
            control1,
            control2,
            end,
        } => {
            let cubic = Cubic {
                p0: start,
                p1: *control1,
                p2: *control2,
                p3: *end,
            };
            let mut segments = Vec::new();
            flatten_cubic(&cubic, options, 0, &mut segments)?;
            LineChain::new(segments)
        }
    }
}

/// A cubic span during subdivision.
#[derive(Debug, Clone, Copy)]
struct Cubic {
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
}

impl Cubic {
    fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point {
            x: b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x + b3 * self.p3.x,
            y: b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y + b3 * self.p3.y,
        }
    }

    /// De Casteljau split at t = 0.5.
    fn split(&self) -> (Cubic, Cubic) {
        let l1 = self.p0.midpoint(self.p1);
        let m = self.p1.midpoint(self.p2);
        let r2 = self.p2.midpoint(self.p3);
        let l2 = l1.midpoint(m);
        let r1 = m.midpoint(r2);
        let mid = l2.midpoint(r1);
        (
            Cubic {
                p0: self.p0,
                p1: l1,
                p2: l2,
                p3: mid,
            },
            Cubic {
                p0: mid,
                p1: r1,
                p2: r2,
                p3: self.p3,
            },
        )
    }

    /// Worst observed deviation between the curve and its chord.
    ///
    /// Sampled at the subdivision midpoint and the quarter points; the
    /// quarter points catch inflected spans whose midpoint lies on the
    /// chord.
    fn chord_deviation(&self) -> f64 {
        let chord = LineSegment::new(self.p0, self.p3);
        [0.25, 0.5, 0.75]
            .iter()
            .map(|&t| chord.distance_to_point(self.point_at(t)))
            .fold(0.0, f64::max)
    }
}

fn flatten_cubic(
    cubic: &Cubic,
    options: &FlattenOptions,
    depth: u32,
    out: &mut Vec<LineSegment>,
) -> GeometryResult<()> {
    let deviation = cubic.chord_deviation();
    if deviation <= options.tolerance {
        out.push(LineSegment::new(cubic.p0, cubic.p3));
        return Ok(());
    }
    if depth >= options.max_depth {
        if options.strict {
            return Err(GeometryError::ToleranceNotReached {
                max_depth: options.max_depth,
                achieved: deviation,
                tolerance: options.tolerance,
            });
        }
        warn!(
            deviation,
            tolerance = options.tolerance,
            "subdivision depth exhausted, emitting best available chord"
        );
        out.push(LineSegment::new(cubic.p0, cubic.p3));
        return Ok(());
    }
    let (left, right) = cubic.split();
    flatten_cubic(&left, options, depth + 1, out)?;
    flatten_cubic(&right, options, depth + 1, out)
}
