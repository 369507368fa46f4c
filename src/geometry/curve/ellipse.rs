use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// An ellipse in 3D space.
///
/// `P(t) = center + a * cos(t) * major_dir + b * sin(t) * minor_dir`
/// where `minor_dir = normal x major_dir`. The natural domain is
/// `[0, 2*pi]`.
#[derive(Debug, Clone)]
pub struct Ellipse {
    frame: Frame,
    major_radius: f64,
    minor_radius: f64,
}

impl Ellipse {
    /// Creates a new ellipse.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive, the minor radius
    /// exceeds the major radius, or the frame is invalid.
    pub fn new(
        center: Point3,
        major_radius: f64,
        minor_radius: f64,
        normal: Vector3,
        major_dir: Vector3,
    ) -> Result<Self> {
        if minor_radius < TOLERANCE || major_radius < minor_radius {
            return Err(GeometryError::Degenerate(
                "ellipse radii must satisfy 0 < minor <= major".into(),
            )
            .into());
        }
        Ok(Self {
            frame: Frame::new(center, normal, major_dir)?,
            major_radius,
            minor_radius,
        })
    }

    /// Returns the center of the ellipse.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        self.frame.origin()
    }

    /// Returns the unit normal of the ellipse plane.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.frame.axis()
    }

    /// Returns the unit major axis direction.
    #[must_use]
    pub fn major_dir(&self) -> &Vector3 {
        self.frame.ref_dir()
    }

    /// Returns the semi-major axis length.
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Returns the semi-minor axis length.
    #[must_use]
    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }
}

impl Curve for Ellipse {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.frame.point(
            self.major_radius * t.cos(),
            self.minor_radius * t.sin(),
            0.0,
        ))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame.direction(
            -self.major_radius * t.sin(),
            self.minor_radius * t.cos(),
            0.0,
        ))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame.direction(
            -self.major_radius * t.cos(),
            -self.minor_radius * t.sin(),
            0.0,
        ))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, std::f64::consts::TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }
}
