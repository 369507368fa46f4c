mod bezier;
mod bspline;
mod cone;
mod cylinder;
mod extrusion;
mod offset;
mod plane;
mod revolution;
mod sphere;
mod torus;

pub use bezier::BezierSurface;
pub use bspline::BSplineSurface;
pub use cone::Cone;
pub use cylinder::Cylinder;
pub use extrusion::Extrusion;
pub use offset::OffsetSurface;
pub use plane::Plane;
pub use revolution::Revolution;
pub use sphere::Sphere;
pub use torus::Torus;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Step used for numerical partial derivatives, relative to `max(1, |x|)`.
const DIFF_STEP: f64 = 1e-6;

/// Parameter domain for a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDomain {
    /// Start of the U parameter range.
    pub u_min: f64,
    /// End of the U parameter range.
    pub u_max: f64,
    /// Start of the V parameter range.
    pub v_min: f64,
    /// End of the V parameter range.
    pub v_max: f64,
}

impl SurfaceDomain {
    /// Creates a new surface domain.
    #[must_use]
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    /// Returns the parameter-space center `(u, v)`.
    #[must_use]
    pub fn mid(&self) -> (f64, f64) {
        (
            0.5 * (self.u_min + self.u_max),
            0.5 * (self.v_min + self.v_max),
        )
    }

    /// Returns `true` if all four bounds are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        [self.u_min, self.u_max, self.v_min, self.v_max]
            .iter()
            .all(|x| x.is_finite())
    }
}

/// Trait for parametric surfaces in 3D space.
pub trait Surface {
    /// Evaluates the surface at parameters `(u, v)`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Partial derivatives `(dS/du, dS/dv)`.
    ///
    /// The default uses central differences of [`Surface::evaluate`].
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn partials(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)> {
        let hu = DIFF_STEP * u.abs().max(1.0);
        let hv = DIFF_STEP * v.abs().max(1.0);
        let su = (self.evaluate(u + hu, v)? - self.evaluate(u - hu, v)?) / (2.0 * hu);
        let sv = (self.evaluate(u, v + hv)? - self.evaluate(u, v - hv)?) / (2.0 * hv);
        Ok((su, sv))
    }

    /// Unit normal `normalize(dS/du x dS/dv)` at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error where the parametrization is singular.
    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let (su, sv) = self.partials(u, v)?;
        let n = su.cross(&sv);
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate("surface normal is undefined".into()).into());
        }
        Ok(n / len)
    }

    /// Returns the natural parameter domain of the surface.
    fn domain(&self) -> SurfaceDomain;
}

/// The geometric surface carried by a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    Plane(Plane),
    Cylinder(Cylinder),
    Cone(Cone),
    Sphere(Sphere),
    Torus(Torus),
    BSpline(BSplineSurface),
    Bezier(BezierSurface),
    Revolution(Revolution),
    Extrusion(Extrusion),
    Offset(OffsetSurface),
}

impl FaceSurface {
    /// Returns the surface as a trait object for evaluation.
    #[must_use]
    pub fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Plane(s) => s,
            Self::Cylinder(s) => s,
            Self::Cone(s) => s,
            Self::Sphere(s) => s,
            Self::Torus(s) => s,
            Self::BSpline(s) => s,
            Self::Bezier(s) => s,
            Self::Revolution(s) => s,
            Self::Extrusion(s) => s,
            Self::Offset(s) => s,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn domain_mid() {
        let d = SurfaceDomain::new(0.0, 2.0, -1.0, 3.0);
        assert_eq!(d.mid(), (1.0, 1.0));
        assert!(d.is_bounded());
        assert!(!SurfaceDomain::new(0.0, f64::INFINITY, 0.0, 1.0).is_bounded());
    }

    #[test]
    fn default_partials_match_plane() {
        let p = Plane::new(Point3::origin(), Vector3::z(), Vector3::x()).unwrap();
        let s = FaceSurface::Plane(p);
        let (su, sv) = s.as_surface().partials(0.3, 0.7).unwrap();
        assert_relative_eq!(su, Vector3::x(), epsilon = 1e-9);
        assert_relative_eq!(sv, Vector3::y(), epsilon = 1e-9);
    }
}
