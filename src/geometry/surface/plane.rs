use crate::error::Result;
use crate::math::{Frame, Point3, Vector3};

use super::{Surface, SurfaceDomain};

/// An infinite plane in 3D space.
///
/// Parametric form: `P(u, v) = origin + u * x_dir + v * y_dir`, with
/// `y_dir = normal x x_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    frame: Frame,
}

impl Plane {
    /// Creates a plane from an origin, a normal and an in-plane X direction.
    ///
    /// # Errors
    ///
    /// Returns an error if either vector is zero-length or `x_dir` is not
    /// perpendicular to the normal.
    pub fn new(origin: Point3, normal: Vector3, x_dir: Vector3) -> Result<Self> {
        Ok(Self {
            frame: Frame::new(origin, normal, x_dir)?,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The in-plane directions are chosen automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        Ok(Self {
            frame: Frame::from_axis(origin, normal)?,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        self.frame.origin()
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        self.frame.axis()
    }

    /// Returns the in-plane X direction.
    #[must_use]
    pub fn x_dir(&self) -> &Vector3 {
        self.frame.ref_dir()
    }

    /// Returns the in-plane Y direction.
    #[must_use]
    pub fn y_dir(&self) -> Vector3 {
        self.frame.binormal()
    }

    /// Projects a point into plane `(u, v)` coordinates.
    #[must_use]
    pub fn project(&self, p: &Point3) -> (f64, f64) {
        let (u, v, _) = self.frame.local(p);
        (u, v)
    }
}

impl Surface for Plane {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.frame.point(u, v, 0.0))
    }

    fn partials(&self, _u: f64, _v: f64) -> Result<(Vector3, Vector3)> {
        Ok((*self.frame.ref_dir(), self.frame.binormal()))
    }

    fn normal(&self, _u: f64, _v: f64) -> Result<Vector3> {
        Ok(*self.frame.axis())
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }
}
