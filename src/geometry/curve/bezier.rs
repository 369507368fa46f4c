use nalgebra::Vector4;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};

use super::{central_difference, Curve, CurveDomain};

/// A Bezier curve over `[0, 1]`, rational when weights are present.
#[derive(Debug, Clone)]
pub struct BezierCurve {
    poles: Vec<Point3>,
    weights: Option<Vec<f64>>,
}

impl BezierCurve {
    /// Creates a new Bezier curve.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two poles are given, or if the weights
    /// do not match the poles in count or are not all positive.
    pub fn new(poles: Vec<Point3>, weights: Option<Vec<f64>>) -> Result<Self> {
        if poles.len() < 2 {
            return Err(
                GeometryError::Degenerate("bezier curve needs at least two poles".into()).into(),
            );
        }
        if let Some(w) = &weights {
            validate_weights(w, poles.len())?;
        }
        Ok(Self { poles, weights })
    }

    /// Returns the polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.poles.len() - 1
    }

    #[must_use]
    pub fn poles(&self) -> &[Point3] {
        &self.poles
    }

    #[must_use]
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Returns `true` if the curve carries weights.
    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }
}

/// Checks that a weight list matches `count` poles and is strictly positive.
pub(crate) fn validate_weights(weights: &[f64], count: usize) -> Result<()> {
    if weights.len() != count {
        return Err(GeometryError::Degenerate(format!(
            "expected {count} weights, got {}",
            weights.len()
        ))
        .into());
    }
    if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
        return Err(GeometryError::Degenerate("weights must be positive".into()).into());
    }
    Ok(())
}

/// Lifts a pole into homogeneous coordinates.
pub(crate) fn homogeneous(p: &Point3, w: f64) -> Vector4<f64> {
    Vector4::new(p.x * w, p.y * w, p.z * w, w)
}

/// Projects a homogeneous point back to 3D.
pub(crate) fn project(h: &Vector4<f64>) -> Result<Point3> {
    if h.w.abs() < f64::EPSILON {
        return Err(GeometryError::Degenerate("zero homogeneous weight".into()).into());
    }
    Ok(Point3::new(h.x / h.w, h.y / h.w, h.z / h.w))
}

impl Curve for BezierCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let mut pts: Vec<Vector4<f64>> = match &self.weights {
            Some(w) => self
                .poles
                .iter()
                .zip(w)
                .map(|(p, w)| homogeneous(p, *w))
                .collect(),
            None => self.poles.iter().map(|p| homogeneous(p, 1.0)).collect(),
        };
        // de Casteljau
        let n = pts.len();
        for r in 1..n {
            for i in 0..n - r {
                pts[i] = pts[i] * (1.0 - t) + pts[i + 1] * t;
            }
        }
        project(&pts[0])
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        central_difference(t, |s| Ok(self.evaluate(s)?.coords))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        match (self.poles.first(), self.poles.last()) {
            (Some(a), Some(b)) => (a - b).norm() < crate::math::TOLERANCE,
            _ => false,
        }
    }
}
