use nalgebra::Vector4;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{basis_funs, expand_knots, find_span, homogeneous, project};
use crate::math::Point3;

use super::{Surface, SurfaceDomain};

/// Knot data for one parametric direction of a B-spline surface.
#[derive(Debug, Clone)]
pub struct KnotSpec {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub multiplicities: Vec<usize>,
    pub periodic: bool,
}

/// A tensor-product B-spline surface, rational when weights are present.
///
/// `poles[i][j]` is the control point at U index `i`, V index `j`.
#[derive(Debug, Clone)]
pub struct BSplineSurface {
    u: KnotSpec,
    v: KnotSpec,
    poles: Vec<Vec<Point3>>,
    weights: Option<Vec<Vec<f64>>>,
    flat_u: Vec<f64>,
    flat_v: Vec<f64>,
}

impl BSplineSurface {
    /// Creates a new B-spline surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the control grid is ragged, the knot data does not
    /// match the grid size, or the weights are invalid.
    pub fn new(
        u: KnotSpec,
        v: KnotSpec,
        poles: Vec<Vec<Point3>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Result<Self> {
        let nu = poles.len();
        let nv = poles.first().map_or(0, Vec::len);
        if poles.iter().any(|row| row.len() != nv) {
            return Err(GeometryError::Degenerate("control grid rows differ in length".into()).into());
        }
        if u.degree == 0 || v.degree == 0 || nu <= u.degree || nv <= v.degree {
            return Err(GeometryError::Degenerate(format!(
                "{nu}x{nv} control grid is too small for degrees ({}, {})",
                u.degree, v.degree
            ))
            .into());
        }
        if let Some(w) = &weights {
            let shape_ok = w.len() == nu && w.iter().all(|row| row.len() == nv);
            let positive = w.iter().flatten().all(|x| x.is_finite() && *x > 0.0);
            if !shape_ok || !positive {
                return Err(GeometryError::Degenerate(
                    "weights must be positive and match the control grid".into(),
                )
                .into());
            }
        }
        let flat_u = expand_knots(&u.knots, &u.multiplicities)?;
        let flat_v = expand_knots(&v.knots, &v.multiplicities)?;
        if flat_u.len() != nu + u.degree + 1 || flat_v.len() != nv + v.degree + 1 {
            return Err(GeometryError::Degenerate(
                "knot multiplicities do not match the control grid".into(),
            )
            .into());
        }
        Ok(Self {
            u,
            v,
            poles,
            weights,
            flat_u,
            flat_v,
        })
    }

    /// Returns the knot data in the U direction.
    #[must_use]
    pub fn u_spec(&self) -> &KnotSpec {
        &self.u
    }

    /// Returns the knot data in the V direction.
    #[must_use]
    pub fn v_spec(&self) -> &KnotSpec {
        &self.v
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

impl Surface for BSplineSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let (pu, pv) = (self.u.degree, self.v.degree);
        let su = find_span(self.poles.len() - 1, pu, u, &self.flat_u);
        let sv = find_span(self.poles[0].len() - 1, pv, v, &self.flat_v);
        let bu = basis_funs(su, u, pu, &self.flat_u);
        let bv = basis_funs(sv, v, pv, &self.flat_v);

        let mut h = Vector4::zeros();
        for (a, nu) in bu.iter().enumerate() {
            let i = su - pu + a;
            for (b, nv) in bv.iter().enumerate() {
                let j = sv - pv + b;
                let w = self.weights.as_ref().map_or(1.0, |w| w[i][j]);
                h += homogeneous(&self.poles[i][j], w) * (nu * nv);
            }
        }
        project(&h)
    }

    fn domain(&self) -> SurfaceDomain {
        let nu = self.poles.len() - 1;
        let nv = self.poles[0].len() - 1;
        SurfaceDomain::new(
            self.flat_u[self.u.degree],
            self.flat_u[nu + 1],
            self.flat_v[self.v.degree],
            self.flat_v[nv + 1],
        )
    }
}
