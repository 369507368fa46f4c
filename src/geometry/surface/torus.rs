use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A toroidal surface.
///
/// `P(u, v) = center + (R + r * cos(v)) * (cos(u) * ref_dir + sin(u) * binormal) + r * sin(v) * axis`.
#[derive(Debug, Clone)]
pub struct Torus {
    frame: Frame,
    major_radius: f64,
    minor_radius: f64,
}

impl Torus {
    /// Creates a new torus.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive or the frame is
    /// invalid.
    pub fn new(
        center: Point3,
        axis: Vector3,
        ref_dir: Vector3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<Self> {
        if major_radius < TOLERANCE || minor_radius < TOLERANCE {
            return Err(GeometryError::Degenerate("torus radii must be positive".into()).into());
        }
        Ok(Self {
            frame: Frame::new(center, axis, ref_dir)?,
            major_radius,
            minor_radius,
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.frame.origin()
    }

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

impl Surface for Torus {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let ring = self.major_radius + self.minor_radius * v.cos();
        Ok(self
            .frame
            .point(ring * u.cos(), ring * u.sin(), self.minor_radius * v.sin()))
    }

    fn partials(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)> {
        let ring = self.major_radius + self.minor_radius * v.cos();
        let r = self.minor_radius;
        Ok((
            self.frame.direction(-ring * u.sin(), ring * u.cos(), 0.0),
            self.frame
                .direction(-r * v.sin() * u.cos(), -r * v.sin() * u.sin(), r * v.cos()),
        ))
    }

    fn domain(&self) -> SurfaceDomain {
        use std::f64::consts::TAU;
        SurfaceDomain::new(0.0, TAU, 0.0, TAU)
    }
}
