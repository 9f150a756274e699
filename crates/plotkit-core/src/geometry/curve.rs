//! Path curves.
//!
//! A path is an ordered list of curves. Each curve's start point is
//! implicit: the end point of the previous curve, or the path origin for
//! the first curve. Curves are produced upstream (by a tracer or vector
//! importer) and consumed read-only here.

use super::Point;
use serde::{Deserialize, Serialize};

/// One curve of a vector path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    /// A straight bend through one control point: two line segments,
    /// start to control and control to end.
    Corner {
        /// The bend vertex
        control: Point,
        /// Curve end point
        end: Point,
    },
    /// A cubic curve shaped by two control points.
    Smooth {
        /// First control point
        control1: Point,
        /// Second control point
        control2: Point,
        /// Curve end point
        end: Point,
    },
}

impl Curve {
    /// The end point of this curve, which is also the implicit start
    /// point of the next curve in a path.
    pub fn end_point(&self) -> Point {
        match self {
            Curve::Corner { end, .. } => *end,
            Curve::Smooth { end, .. } => *end,
        }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`, given the start
    /// point the path assigns to it.
    pub fn point_at(&self, start: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Corner { control, end } => {
                // Piecewise linear: start..control over the first half of
                // the parameter range, control..end over the second.
                if t <= 0.5 {
                    lerp(start, *control, t * 2.0)
                } else {
                    lerp(*control, *end, (t - 0.5) * 2.0)
                }
            }
            Curve::Smooth {
                control1,
                control2,
                end,
            } => {
                let u = 1.0 - t;
                let b0 = u * u * u;
                let b1 = 3.0 * u * u * t;
                let b2 = 3.0 * u * t * t;
                let b3 = t * t * t;
                Point {
                    x: b0 * start.x + b1 * control1.x + b2 * control2.x + b3 * end.x,
                    y: b0 * start.y + b1 * control1.y + b2 * control2.y + b3 * end.y,
                }
            }
        }
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_point() {
        let corner = Curve::Corner {
            control: Point::new(1.0, 0.0),
            end: Point::new(1.0, 1.0),
        };
        assert_eq!(corner.end_point(), Point::new(1.0, 1.0));

        let smooth = Curve::Smooth {
            control1: Point::new(0.0, 1.0),
            control2: Point::new(1.0, 1.0),
            end: Point::new(1.0, 0.0),
        };
        assert_eq!(smooth.end_point(), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_point_at_endpoints() {
        let start = Point::new(0.0, 0.0);
        let smooth = Curve::Smooth {
            control1: Point::new(0.0, 1.0),
            control2: Point::new(2.0, 1.0),
            end: Point::new(2.0, 0.0),
        };
        assert_eq!(smooth.point_at(start, 0.0), start);
        assert_eq!(smooth.point_at(start, 1.0), Point::new(2.0, 0.0));

        let corner = Curve::Corner {
            control: Point::new(1.0, 0.0),
            end: Point::new(1.0, 1.0),
        };
        assert_eq!(corner.point_at(start, 0.0), start);
        assert_eq!(corner.point_at(start, 0.5), Point::new(1.0, 0.0));
        assert_eq!(corner.point_at(start, 1.0), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_curve_list_from_json() {
        // The shape the upstream tracer hands over.
        let json = r#"[
            {"type": "corner", "control": {"x": 1.0, "y": 0.0}, "end": {"x": 1.0, "y": 1.0}},
            {"type": "smooth",
             "control1": {"x": 1.0, "y": 2.0},
             "control2": {"x": 0.0, "y": 2.0},
             "end": {"x": 0.0, "y": 1.0}}
        ]"#;
        let curves: Vec<Curve> = serde_json::from_str(json).unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].end_point(), Point::new(1.0, 1.0));
        assert!(matches!(curves[1], Curve::Smooth { .. }));
    }
}
