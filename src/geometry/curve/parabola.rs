use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A parabola `P(t) = apex + t^2 / (4f) * axis_dir + t * y_dir`.
///
/// `axis_dir` is the symmetry axis pointing towards the focus, `f` the focal
/// length.
#[derive(Debug, Clone)]
pub struct Parabola {
    frame: Frame,
    focal: f64,
}

impl Parabola {
    /// Creates a new parabola.
    ///
    /// # Errors
    ///
    /// Returns an error if the focal length is non-positive or the frame is
    /// invalid.
    pub fn new(apex: Point3, focal: f64, normal: Vector3, axis_dir: Vector3) -> Result<Self> {
        if focal < TOLERANCE {
            return Err(
                GeometryError::Degenerate("parabola focal length must be positive".into()).into(),
            );
        }
        Ok(Self {
            frame: Frame::new(apex, normal, axis_dir)?,
            focal,
        })
    }

    /// Returns the apex.
    #[must_use]
    pub fn apex(&self) -> &Point3 {
        self.frame.origin()
    }

    /// Returns the unit normal of the parabola plane.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.frame.axis()
    }

    /// Returns the unit symmetry axis.
    #[must_use]
    pub fn axis_dir(&self) -> &Vector3 {
        self.frame.ref_dir()
    }

    /// Returns the focal length.
    #[must_use]
    pub fn focal(&self) -> f64 {
        self.focal
    }
}

impl Curve for Parabola {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.frame.point(t * t / (4.0 * self.focal), t, 0.0))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame.direction(t / (2.0 * self.focal), 1.0, 0.0))
    }

    fn second_derivative(&self, _t: f64) -> Result<Vector3> {
        Ok(self.frame.direction(1.0 / (2.0 * self.focal), 0.0, 0.0))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
