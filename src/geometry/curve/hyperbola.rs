use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// One branch of a hyperbola.
///
/// `P(t) = center + a * cosh(t) * major_dir + b * sinh(t) * minor_dir`.
#[derive(Debug, Clone)]
pub struct Hyperbola {
    frame: Frame,
    major_radius: f64,
    minor_radius: f64,
}

impl Hyperbola {
    /// Creates a new hyperbola branch.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive or the frame is
    /// invalid.
    pub fn new(
        center: Point3,
        major_radius: f64,
        minor_radius: f64,
        normal: Vector3,
        major_dir: Vector3,
    ) -> Result<Self> {
        if major_radius < TOLERANCE || minor_radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("hyperbola radii must be positive".into()).into(),
            );
        }
        Ok(Self {
            frame: Frame::new(center, normal, major_dir)?,
            major_radius,
            minor_radius,
        })
    }

    /// Returns the center of the hyperbola.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.frame.origin()
    }

    /// Returns the unit normal of the hyperbola plane.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.frame.axis()
    }

    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    #[must_use]
    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }
}

impl Curve for Hyperbola {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.frame.point(
            self.major_radius * t.cosh(),
            self.minor_radius * t.sinh(),
            0.0,
        ))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame.direction(
            self.major_radius * t.sinh(),
            self.minor_radius * t.cosh(),
            0.0,
        ))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame.direction(
            self.major_radius * t.cosh(),
            self.minor_radius * t.sinh(),
            0.0,
        ))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn is_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vertex_at_zero() {
        let h = Hyperbola::new(Point3::origin(), 2.0, 1.0, Vector3::z(), Vector3::x()).unwrap();
        assert_relative_eq!(h.evaluate(0.0).unwrap(), Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn satisfies_implicit_equation() {
        let h = Hyperbola::new(Point3::origin(), 3.0, 2.0, Vector3::z(), Vector3::x()).unwrap();
        let p = h.evaluate(0.7).unwrap();
        assert_relative_eq!(p.x * p.x / 9.0 - p.y * p.y / 4.0, 1.0, epsilon = 1e-12);
    }
}
