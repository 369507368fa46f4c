use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{central_difference, Curve, CurveDomain, EdgeCurve};

/// A curve at constant distance from a basis curve.
///
/// `P(t) = B(t) + d * normalize(B'(t) x reference)`.
#[derive(Debug, Clone)]
pub struct OffsetCurve {
    basis: Box<EdgeCurve>,
    distance: f64,
    reference: Vector3,
}

impl OffsetCurve {
    /// Creates a new offset curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference direction is zero-length or the
    /// distance is not finite.
    pub fn new(basis: EdgeCurve, distance: f64, reference: Vector3) -> Result<Self> {
        if !distance.is_finite() {
            return Err(GeometryError::NonFinite("offset distance").into());
        }
        let len = reference.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            basis: Box::new(basis),
            distance,
            reference: reference / len,
        })
    }

    /// Returns the basis curve.
    #[must_use]
    pub fn basis(&self) -> &EdgeCurve {
        &self.basis
    }

    /// Returns the signed offset distance.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub fn reference(&self) -> &Vector3 {
        &self.reference
    }
}

impl Curve for OffsetCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let basis = self.basis.as_curve();
        let side = basis.derivative(t)?.cross(&self.reference);
        let len = side.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate(
                "offset direction undefined: tangent parallel to reference".into(),
            )
            .into());
        }
        Ok(basis.evaluate(t)? + side * (self.distance / len))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        central_difference(t, |s| Ok(self.evaluate(s)?.coords))
    }

    fn domain(&self) -> CurveDomain {
        self.basis.as_curve().domain()
    }

    fn is_closed(&self) -> bool {
        self.basis.as_curve().is_closed()
    }
}
