use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A cylindrical surface.
///
/// `P(u, v) = origin + r * (cos(u) * ref_dir + sin(u) * binormal) + v * axis`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    frame: Frame,
    radius: f64,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the frame is invalid.
    pub fn new(origin: Point3, axis: Vector3, ref_dir: Vector3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        Ok(Self {
            frame: Frame::new(origin, axis, ref_dir)?,
            radius,
        })
    }

    /// Returns a point on the axis.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        self.frame.origin()
    }

    /// Returns the unit axis direction.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.frame.axis()
    }

    /// Returns the reference direction (u = 0).
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        self.frame.ref_dir()
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self
            .frame
            .point(self.radius * u.cos(), self.radius * u.sin(), v))
    }

    fn partials(&self, u: f64, _v: f64) -> Result<(Vector3, Vector3)> {
        Ok((
            self.frame
                .direction(-self.radius * u.sin(), self.radius * u.cos(), 0.0),
            *self.frame.axis(),
        ))
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, std::f64::consts::TAU, f64::NEG_INFINITY, f64::INFINITY)
    }
}
