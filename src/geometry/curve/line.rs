use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// An infinite line `P(t) = origin + t * direction` with unit direction.
///
/// The parameter is arc length, so an edge trimmed to `[t0, t1]` has length
/// `|t1 - t0|`.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates the line through two points, parameterized so that `a` is at
    /// `t = 0` and `b` at `t = |b - a|`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(a: Point3, b: Point3) -> Result<Self> {
        Self::new(a, b - a)
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.origin + self.direction * t)
    }

    fn derivative(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn second_derivative(&self, _t: f64) -> Result<Vector3> {
        Ok(Vector3::zeros())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn arc_length(&self, t0: f64, t1: f64) -> Result<f64> {
        Ok((t1 - t0).abs())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn through_two_points() {
        let l = Line::through(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)).unwrap();
        let p = l.evaluate(5.0).unwrap();
        assert_relative_eq!(p, Point3::new(3.0, 4.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(l.arc_length(0.0, 5.0).unwrap(), 5.0);
    }

    #[test]
    fn zero_direction_rejected() {
        assert!(Line::new(Point3::origin(), Vector3::zeros()).is_err());
    }

    #[test]
    fn coincident_points_rejected() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(Line::through(p, p).is_err());
    }
}
