//! Continuity-checked line chains.
//!
//! A chain is the polyline approximation of exactly one curve. Chains
//! are never merged across curves: the motion compiler needs per-curve
//! chain boundaries to decide whether a pen lift is required.

use super::{LineSegment, Point};
use crate::constants::CHAIN_CONTINUITY_TOLERANCE;
use crate::error::{GeometryError, GeometryResult};

/// An ordered, non-empty sequence of line segments where every segment
/// starts where the previous one ends.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChain {
    segments: Vec<LineSegment>,
}

impl LineChain {
    /// Build a chain from segments, validating the continuity invariant.
    pub fn new(segments: Vec<LineSegment>) -> GeometryResult<Self> {
        if segments.is_empty() {
            return Err(GeometryError::EmptyChain);
        }
        for (index, pair) in segments.windows(2).enumerate() {
            let expected = pair[0].end;
            let found = pair[1].start;
            if expected.distance_to(found) > CHAIN_CONTINUITY_TOLERANCE {
                return Err(GeometryError::Discontinuity {
                    index: index + 1,
                    expected,
                    found,
                });
            }
        }
        Ok(Self { segments })
    }

    /// Start a chain from its first segment.
    pub fn from_segment(segment: LineSegment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    /// Append a segment, validating that it continues the chain.
    pub fn push(&mut self, segment: LineSegment) -> GeometryResult<()> {
        let expected = self.end();
        if expected.distance_to(segment.start) > CHAIN_CONTINUITY_TOLERANCE {
            return Err(GeometryError::Discontinuity {
                index: self.segments.len(),
                expected,
                found: segment.start,
            });
        }
        self.segments.push(segment);
        Ok(())
    }

    /// First point of the chain.
    pub fn start(&self) -> Point {
        self.segments[0].start
    }

    /// Final point of the chain.
    pub fn end(&self) -> Point {
        self.segments[self.segments.len() - 1].end
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A chain is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The segments in order.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Iterate over segments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineSegment> {
        self.segments.iter()
    }

    /// Total polyline length.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(LineSegment::length).sum()
    }
}

impl<'a> IntoIterator for &'a LineChain {
    type Item = &'a LineSegment;
    type IntoIter = std::slice::Iter<'a, LineSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> LineSegment {
        LineSegment::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert_eq!(LineChain::new(vec![]), Err(GeometryError::EmptyChain));
    }

    #[test]
    fn test_continuous_chain() {
        let chain = LineChain::new(vec![
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 1.0, 1.0),
            seg(1.0, 1.0, 0.0, 1.0),
        ])
        .unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.start(), Point::new(0.0, 0.0));
        assert_eq!(chain.end(), Point::new(0.0, 1.0));
        assert_eq!(chain.total_length(), 3.0);
    }

    #[test]
    fn test_discontinuity_rejected() {
        let err = LineChain::new(vec![seg(0.0, 0.0, 1.0, 0.0), seg(2.0, 0.0, 3.0, 0.0)]);
        assert!(matches!(
            err,
            Err(GeometryError::Discontinuity { index: 1, .. })
        ));
    }

    #[test]
    fn test_push_validates() {
        let mut chain = LineChain::from_segment(seg(0.0, 0.0, 1.0, 0.0));
        chain.push(seg(1.0, 0.0, 2.0, 0.0)).unwrap();
        assert!(chain.push(seg(5.0, 5.0, 6.0, 5.0)).is_err());
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_zero_length_segment_is_a_valid_chain() {
        let chain = LineChain::from_segment(seg(1.0, 1.0, 1.0, 1.0));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.total_length(), 0.0);
    }
}
