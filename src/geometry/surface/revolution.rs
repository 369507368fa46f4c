use crate::error::{GeometryError, Result};
use crate::geometry::curve::EdgeCurve;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A surface swept by rotating a basis curve about an axis.
///
/// `P(u, v) = rotate(C(v), axis, u)`.
#[derive(Debug, Clone)]
pub struct Revolution {
    basis: Box<EdgeCurve>,
    origin: Point3,
    axis: Vector3,
}

impl Revolution {
    /// Creates a new surface of revolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis direction is zero-length.
    pub fn new(basis: EdgeCurve, origin: Point3, axis: Vector3) -> Result<Self> {
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            basis: Box::new(basis),
            origin,
            axis: axis / len,
        })
    }

    #[must_use]
    pub fn basis(&self) -> &EdgeCurve {
        &self.basis
    }

    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    // Rodrigues' rotation of `d` about the unit axis.
    fn rotate(&self, d: &Vector3, angle: f64) -> Vector3 {
        let (s, c) = angle.sin_cos();
        let k = &self.axis;
        d * c + k.cross(d) * s + k * (k.dot(d) * (1.0 - c))
    }
}

impl Surface for Revolution {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let p = self.basis.as_curve().evaluate(v)?;
        Ok(self.origin + self.rotate(&(p - self.origin), u))
    }

    fn partials(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)> {
        let curve = self.basis.as_curve();
        let rotated = self.rotate(&(curve.evaluate(v)? - self.origin), u);
        let su = self.axis.cross(&rotated);
        let sv = self.rotate(&curve.derivative(v)?, u);
        Ok((su, sv))
    }

    fn domain(&self) -> SurfaceDomain {
        let d = self.basis.as_curve().domain();
        SurfaceDomain::new(0.0, std::f64::consts::TAU, d.t_min, d.t_max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Line;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn revolved_line_is_cylinder() {
        let line = Line::new(Point3::new(2.0, 0.0, 0.0), Vector3::z()).unwrap();
        let s = Revolution::new(EdgeCurve::Line(line), Point3::origin(), Vector3::z()).unwrap();
        let p = s.evaluate(FRAC_PI_2, 3.0).unwrap();
        assert_relative_eq!(p, Point3::new(0.0, 2.0, 3.0), epsilon = 1e-12);
        // su = z x (2,0,0) = (0,2,0); sv = z; normal = y x z = x.
        assert_relative_eq!(s.normal(0.0, 1.0).unwrap(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn point_on_axis_is_singular() {
        let line = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let s = Revolution::new(EdgeCurve::Line(line), Point3::origin(), Vector3::z()).unwrap();
        assert!(s.normal(0.0, 0.0).is_err());
    }
}
