use nalgebra::Vector4;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{homogeneous, project};
use crate::math::Point3;

use super::{Surface, SurfaceDomain};

/// A tensor-product Bezier patch over `[0, 1] x [0, 1]`.
///
/// `poles[i][j]` is the control point at U index `i`, V index `j`.
#[derive(Debug, Clone)]
pub struct BezierSurface {
    poles: Vec<Vec<Point3>>,
    weights: Option<Vec<Vec<f64>>>,
}

impl BezierSurface {
    /// Creates a new Bezier surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is smaller than 2x2, ragged, or the
    /// weights do not match it.
    pub fn new(poles: Vec<Vec<Point3>>, weights: Option<Vec<Vec<f64>>>) -> Result<Self> {
        let nv = poles.first().map_or(0, Vec::len);
        if poles.len() < 2 || nv < 2 || poles.iter().any(|row| row.len() != nv) {
            return Err(GeometryError::Degenerate(
                "bezier surface needs a rectangular grid of at least 2x2".into(),
            )
            .into());
        }
        if let Some(w) = &weights {
            let shape_ok = w.len() == poles.len() && w.iter().all(|row| row.len() == nv);
            if !shape_ok || w.iter().flatten().any(|x| !x.is_finite() || *x <= 0.0) {
                return Err(GeometryError::Degenerate(
                    "weights must be positive and match the control grid".into(),
                )
                .into());
            }
        }
        Ok(Self { poles, weights })
    }

    #[must_use]
    pub fn u_degree(&self) -> usize {
        self.poles.len() - 1
    }

    #[must_use]
    pub fn v_degree(&self) -> usize {
        self.poles[0].len() - 1
    }

    #[must_use]
    pub fn poles(&self) -> &[Vec<Point3>] {
        &self.poles
    }

    #[must_use]
    pub fn weights(&self) -> Option<&[Vec<f64>]> {
        self.weights.as_deref()
    }

    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }
}

fn de_casteljau(mut pts: Vec<Vector4<f64>>, t: f64) -> Vector4<f64> {
    let n = pts.len();
    for r in 1..n {
        for i in 0..n - r {
            pts[i] = pts[i] * (1.0 - t) + pts[i + 1] * t;
        }
    }
    pts[0]
}

impl Surface for BezierSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let column: Vec<Vector4<f64>> = self
            .poles
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let lifted = row
                    .iter()
                    .enumerate()
                    .map(|(j, p)| {
                        let w = self.weights.as_ref().map_or(1.0, |w| w[i][j]);
                        homogeneous(p, w)
                    })
                    .collect();
                de_casteljau(lifted, v)
            })
            .collect();
        project(&de_casteljau(column, u))
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, 1.0, 0.0, 1.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saddle_patch_center() {
        let s = BezierSurface::new(
            vec![
                vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0)],
                vec![Point3::new(1.0, 0.0, 1.0), Point3::new(1.0, 1.0, 0.0)],
            ],
            None,
        )
        .unwrap();
        assert_eq!((s.u_degree(), s.v_degree()), (1, 1));
        assert_relative_eq!(
            s.evaluate(0.5, 0.5).unwrap(),
            Point3::new(0.5, 0.5, 0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn collapsed_patch_has_no_normal() {
        // All poles on one line: dS/du and dS/dv are parallel everywhere.
        let s = BezierSurface::new(
            vec![
                vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
                vec![Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)],
            ],
            None,
        )
        .unwrap();
        assert!(s.normal(0.5, 0.5).is_err());
    }
}
