use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};

use super::{FaceSurface, Surface, SurfaceDomain};

/// A surface at constant distance along the normal of a basis surface.
#[derive(Debug, Clone)]
pub struct OffsetSurface {
    basis: Box<FaceSurface>,
    distance: f64,
}

impl OffsetSurface {
    /// Creates a new offset surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the distance is not finite.
    pub fn new(basis: FaceSurface, distance: f64) -> Result<Self> {
        if !distance.is_finite() {
            return Err(GeometryError::NonFinite("offset distance").into());
        }
        Ok(Self {
            basis: Box::new(basis),
            distance,
        })
    }

    #[must_use]
    pub fn basis(&self) -> &FaceSurface {
        &self.basis
    }

    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Surface for OffsetSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let basis = self.basis.as_surface();
        Ok(basis.evaluate(u, v)? + basis.normal(u, v)? * self.distance)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        self.basis.as_surface().normal(u, v)
    }

    fn domain(&self) -> SurfaceDomain {
        self.basis.as_surface().domain()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Sphere;
    use approx::assert_relative_eq;

    #[test]
    fn offset_sphere_radius() {
        let s = Sphere::new(Point3::origin(), Vector3::z(), Vector3::x(), 1.0).unwrap();
        let o = OffsetSurface::new(FaceSurface::Sphere(s), 0.5).unwrap();
        let p = o.evaluate(0.7, 0.2).unwrap();
        assert_relative_eq!(p.coords.norm(), 1.5, epsilon = 1e-12);
    }
}
