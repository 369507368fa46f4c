use nalgebra::Vector4;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::bezier::{homogeneous, project, validate_weights};
use super::{central_difference, Curve, CurveDomain};

/// A B-spline curve, rational when weights are present.
///
/// Knots are stored the way exchange formats carry them: distinct values
/// plus multiplicities. The flat knot vector is expanded once on
/// construction.
#[derive(Debug, Clone)]
pub struct BSplineCurve {
    degree: usize,
    poles: Vec<Point3>,
    weights: Option<Vec<f64>>,
    knots: Vec<f64>,
    multiplicities: Vec<usize>,
    periodic: bool,
    flat_knots: Vec<f64>,
}

impl BSplineCurve {
    /// Creates a new B-spline curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the degree is zero, the knots are not strictly
    /// increasing, the multiplicities do not sum to `poles + degree + 1`, or
    /// the weights are invalid.
    pub fn new(
        degree: usize,
        poles: Vec<Point3>,
        weights: Option<Vec<f64>>,
        knots: Vec<f64>,
        multiplicities: Vec<usize>,
        periodic: bool,
    ) -> Result<Self> {
        if degree == 0 || poles.len() <= degree {
            return Err(GeometryError::Degenerate(format!(
                "b-spline of degree {degree} needs more than {degree} poles"
            ))
            .into());
        }
        if let Some(w) = &weights {
            validate_weights(w, poles.len())?;
        }
        let flat_knots = expand_knots(&knots, &multiplicities)?;
        if flat_knots.len() != poles.len() + degree + 1 {
            return Err(GeometryError::Degenerate(format!(
                "knot multiplicities sum to {}, expected {}",
                flat_knots.len(),
                poles.len() + degree + 1
            ))
            .into());
        }
        Ok(Self {
            degree,
            poles,
            weights,
            knots,
            multiplicities,
            periodic,
            flat_knots,
        })
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[must_use]
    pub fn poles(&self) -> &[Point3] {
        &self.poles
    }

    #[must_use]
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Returns the distinct knot values.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    #[must_use]
    pub fn multiplicities(&self) -> &[usize] {
        &self.multiplicities
    }

    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    #[must_use]
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    fn wrap(&self, t: f64) -> f64 {
        if !self.periodic {
            return t;
        }
        let d = self.domain();
        let span = d.t_max - d.t_min;
        d.t_min + (t - d.t_min).rem_euclid(span)
    }
}

impl Curve for BSplineCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let t = self.wrap(t);
        let n = self.poles.len() - 1;
        let span = find_span(n, self.degree, t, &self.flat_knots);
        let basis = basis_funs(span, t, self.degree, &self.flat_knots);

        let mut h = Vector4::zeros();
        for (j, b) in basis.iter().enumerate() {
            let idx = span - self.degree + j;
            let w = self.weights.as_ref().map_or(1.0, |w| w[idx]);
            h += homogeneous(&self.poles[idx], w) * *b;
        }
        project(&h)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        central_difference(t, |s| Ok(self.evaluate(s)?.coords))
    }

    fn domain(&self) -> CurveDomain {
        let n = self.poles.len() - 1;
        CurveDomain::new(self.flat_knots[self.degree], self.flat_knots[n + 1])
    }

    fn is_closed(&self) -> bool {
        if self.periodic {
            return true;
        }
        match (self.poles.first(), self.poles.last()) {
            (Some(a), Some(b)) => (a - b).norm() < TOLERANCE,
            _ => false,
        }
    }
}

/// Expands distinct knots and multiplicities into a flat knot vector.
///
/// # Errors
///
/// Returns an error if the lists differ in length, a multiplicity is zero,
/// or the knots are not strictly increasing.
pub(crate) fn expand_knots(knots: &[f64], multiplicities: &[usize]) -> Result<Vec<f64>> {
    if knots.len() != multiplicities.len() || knots.len() < 2 {
        return Err(GeometryError::Degenerate(
            "knots and multiplicities must pair up (at least two knots)".into(),
        )
        .into());
    }
    if knots.windows(2).any(|w| w[1] <= w[0]) {
        return Err(GeometryError::Degenerate("knots must be strictly increasing".into()).into());
    }
    if multiplicities.contains(&0) {
        return Err(GeometryError::Degenerate("knot multiplicity must be positive".into()).into());
    }
    Ok(knots
        .iter()
        .zip(multiplicities)
        .flat_map(|(k, m)| std::iter::repeat(*k).take(*m))
        .collect())
}

/// Finds the span index `i` with `knots[i] <= u < knots[i + 1]`.
///
/// `n` is the index of the last pole and `p` the degree. Parameters outside
/// the domain clamp to the first or last span.
pub(crate) fn find_span(n: usize, p: usize, u: f64, knots: &[f64]) -> usize {
    if u >= knots[n + 1] {
        return n;
    }
    if u <= knots[p] {
        return p;
    }

    let (mut lo, mut hi) = (p, n + 1);
    let mut mid = (lo + hi) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
        mid = (lo + hi) / 2;
    }
    mid
}

/// Evaluates the `p + 1` non-zero basis functions on `span` at `u`.
pub(crate) fn basis_funs(span: usize, u: f64, p: usize, knots: &[f64]) -> Vec<f64> {
    let mut n = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    n[0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom.abs() < f64::EPSILON {
                0.0
            } else {
                n[r] / denom
            };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn clamped_cubic() -> BSplineCurve {
        BSplineCurve::new(
            3,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(4.0, 1.0, 0.0),
            ],
            None,
            vec![0.0, 0.5, 1.0],
            vec![4, 1, 4],
            false,
        )
        .unwrap()
    }

    #[test]
    fn interpolates_end_poles() {
        let c = clamped_cubic();
        assert_relative_eq!(c.evaluate(0.0).unwrap(), Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(c.evaluate(1.0).unwrap(), Point3::new(4.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(c.domain().t_max, 1.0);
    }

    #[test]
    fn basis_partition_of_unity() {
        let flat = expand_knots(&[0.0, 1.0, 2.0, 3.0], &[3, 1, 1, 3]).unwrap();
        for i in 0..=30 {
            let u = f64::from(i) * 0.1;
            let span = find_span(4, 2, u, &flat);
            let sum: f64 = basis_funs(span, u, 2, &flat).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn linear_bspline_is_polyline() {
        let c = BSplineCurve::new(
            1,
            vec![Point3::origin(), Point3::new(2.0, 0.0, 0.0)],
            None,
            vec![0.0, 1.0],
            vec![2, 2],
            false,
        )
        .unwrap();
        assert_relative_eq!(c.arc_length(0.0, 1.0).unwrap(), 2.0, epsilon = 1e-9);
        assert!(c.curvature(0.5).unwrap() < 1e-4);
    }

    #[test]
    fn rejects_bad_multiplicities() {
        let r = BSplineCurve::new(
            2,
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 0.0)],
            None,
            vec![0.0, 1.0],
            vec![2, 2],
            false,
        );
        assert!(r.is_err());
    }

    #[test]
    fn rejects_unsorted_knots() {
        assert!(expand_knots(&[0.0, 0.0], &[1, 1]).is_err());
    }
}
