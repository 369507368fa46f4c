use crate::error::{GeometryError, Result};
use crate::geometry::curve::EdgeCurve;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A surface of linear extrusion: `P(u, v) = C(u) + v * direction`.
#[derive(Debug, Clone)]
pub struct Extrusion {
    basis: Box<EdgeCurve>,
    direction: Vector3,
}

impl Extrusion {
    /// Creates a new extrusion surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction is zero-length.
    pub fn new(basis: EdgeCurve, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            basis: Box::new(basis),
            direction: direction / len,
        })
    }

    #[must_use]
    pub fn basis(&self) -> &EdgeCurve {
        &self.basis
    }

    /// Returns the unit extrusion direction.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Surface for Extrusion {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.basis.as_curve().evaluate(u)? + self.direction * v)
    }

    fn partials(&self, u: f64, _v: f64) -> Result<(Vector3, Vector3)> {
        Ok((self.basis.as_curve().derivative(u)?, self.direction))
    }

    fn domain(&self) -> SurfaceDomain {
        let d = self.basis.as_curve().domain();
        SurfaceDomain::new(d.t_min, d.t_max, f64::NEG_INFINITY, f64::INFINITY)
    }
}
