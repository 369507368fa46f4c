use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A spherical surface.
///
/// `P(u, v) = center + r * cos(v) * (cos(u) * ref_dir + sin(u) * binormal) + r * sin(v) * axis`
/// with `u` in `[0, 2*pi]` and latitude `v` in `[-pi/2, pi/2]`. The poles are
/// singular.
#[derive(Debug, Clone)]
pub struct Sphere {
    frame: Frame,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the frame is invalid.
    pub fn new(center: Point3, axis: Vector3, ref_dir: Vector3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("sphere radius must be positive".into()).into());
        }
        Ok(Self {
            frame: Frame::new(center, axis, ref_dir)?,
            radius,
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.frame.origin()
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let r = self.radius;
        Ok(self
            .frame
            .point(r * v.cos() * u.cos(), r * v.cos() * u.sin(), r * v.sin()))
    }

    fn partials(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)> {
        let r = self.radius;
        Ok((
            self.frame
                .direction(-r * v.cos() * u.sin(), r * v.cos() * u.cos(), 0.0),
            self.frame.direction(
                -r * v.sin() * u.cos(),
                -r * v.sin() * u.sin(),
                r * v.cos(),
            ),
        ))
    }

    fn domain(&self) -> SurfaceDomain {
        use std::f64::consts::{FRAC_PI_2, TAU};
        SurfaceDomain::new(0.0, TAU, -FRAC_PI_2, FRAC_PI_2)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn normal_is_radial() {
        let s = Sphere::new(Point3::new(1.0, 0.0, 0.0), Vector3::z(), Vector3::x(), 2.0).unwrap();
        let p = s.evaluate(0.4, 0.3).unwrap();
        let n = s.normal(0.4, 0.3).unwrap();
        assert_relative_eq!(n, (p - s.center()) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn pole_is_singular() {
        let s = Sphere::new(Point3::origin(), Vector3::z(), Vector3::x(), 1.0).unwrap();
        assert!(s.normal(0.0, FRAC_PI_2).is_err());
    }
}
