use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A conical surface.
///
/// `P(u, v) = origin + (r + v * sin(a)) * (cos(u) * ref_dir + sin(u) * binormal) + v * cos(a) * axis`
/// where `r` is the reference radius at `v = 0` and `a` the semi-angle.
/// The parametrization is singular at the apex, where `r + v * sin(a) = 0`.
#[derive(Debug, Clone)]
pub struct Cone {
    frame: Frame,
    ref_radius: f64,
    semi_angle: f64,
}

impl Cone {
    /// Creates a new cone.
    ///
    /// # Arguments
    ///
    /// * `origin` - Center of the reference circle
    /// * `axis` - Axis direction (will be normalized)
    /// * `ref_dir` - Reference direction for u = 0 (perpendicular to axis)
    /// * `ref_radius` - Radius at the reference circle (may be zero)
    /// * `semi_angle` - Semi-angle in radians, `0 < |a| < pi/2`
    ///
    /// # Errors
    ///
    /// Returns an error if the semi-angle is out of range, the reference
    /// radius is negative, or the frame is invalid.
    pub fn new(
        origin: Point3,
        axis: Vector3,
        ref_dir: Vector3,
        ref_radius: f64,
        semi_angle: f64,
    ) -> Result<Self> {
        if semi_angle.abs() <= TOLERANCE
            || semi_angle.abs() >= std::f64::consts::FRAC_PI_2 - TOLERANCE
        {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "semi_angle",
                value: semi_angle,
                min: 0.0,
                max: std::f64::consts::FRAC_PI_2,
            }
            .into());
        }
        if ref_radius < 0.0 {
            return Err(
                GeometryError::Degenerate("cone reference radius must be >= 0".into()).into(),
            );
        }
        Ok(Self {
            frame: Frame::new(origin, axis, ref_dir)?,
            ref_radius,
            semi_angle,
        })
    }

    /// Returns the apex point.
    #[must_use]
    pub fn apex(&self) -> Point3 {
        let offset = -self.ref_radius / self.semi_angle.tan();
        self.frame.origin() + self.frame.axis() * offset
    }

    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.frame.axis()
    }

    #[must_use]
    pub fn ref_radius(&self) -> f64 {
        self.ref_radius
    }

    /// Returns the semi-angle in radians.
    #[must_use]
    pub fn semi_angle(&self) -> f64 {
        self.semi_angle
    }
}

impl Surface for Cone {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let r = self.ref_radius + v * self.semi_angle.sin();
        Ok(self
            .frame
            .point(r * u.cos(), r * u.sin(), v * self.semi_angle.cos()))
    }

    fn partials(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)> {
        let (sa, ca) = self.semi_angle.sin_cos();
        let r = self.ref_radius + v * sa;
        Ok((
            self.frame.direction(-r * u.sin(), r * u.cos(), 0.0),
            self.frame.direction(sa * u.cos(), sa * u.sin(), ca),
        ))
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, std::f64::consts::TAU, f64::NEG_INFINITY, f64::INFINITY)
    }
}
