use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A circle in 3D space.
///
/// `P(t) = center + radius * (cos(t) * ref_dir + sin(t) * binormal)`.
///
/// The natural domain is `[0, 2*pi]`; arcs are circles whose owning edge
/// trims the parameter range.
#[derive(Debug, Clone)]
pub struct Circle {
    frame: Frame,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the circle plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the frame is invalid.
    pub fn new(center: Point3, radius: f64, normal: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("circle radius must be positive".into()).into(),
            );
        }
        Ok(Self {
            frame: Frame::new(center, normal, ref_dir)?,
            radius,
        })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.frame.origin()
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the unit normal of the circle plane.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.frame.axis()
    }

    /// Returns the reference direction (t = 0).
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        self.frame.ref_dir()
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self
            .frame
            .point(self.radius * t.cos(), self.radius * t.sin(), 0.0))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self
            .frame
            .direction(-self.radius * t.sin(), self.radius * t.cos(), 0.0))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self
            .frame
            .direction(-self.radius * t.cos(), -self.radius * t.sin(), 0.0))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, std::f64::consts::TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn arc_length(&self, t0: f64, t1: f64) -> Result<f64> {
        Ok(self.radius * (t1 - t0).abs())
    }
}
