mod bezier;
mod bspline;
mod circle;
mod ellipse;
mod hyperbola;
mod line;
mod offset;
mod parabola;

pub use bezier::BezierCurve;
pub use bspline::BSplineCurve;
pub(crate) use bezier::{homogeneous, project, validate_weights};
pub(crate) use bspline::{basis_funs, expand_knots, find_span};
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use hyperbola::Hyperbola;
pub use line::Line;
pub use offset::OffsetCurve;
pub use parabola::Parabola;

use crate::error::{GeometryError, Result};
use crate::math::quadrature::{integrate, DEFAULT_SEGMENTS};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Step used for numerical differentiation, relative to `max(1, |t|)`.
const DIFF_STEP: f64 = 1e-5;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns the midpoint parameter.
    #[must_use]
    pub fn mid(&self) -> f64 {
        0.5 * (self.t_min + self.t_max)
    }

    /// Returns the absolute parameter span.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.t_max - self.t_min).abs()
    }
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// First derivative `C'(t)` (not normalized).
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn derivative(&self, t: f64) -> Result<Vector3>;

    /// Second derivative `C''(t)`.
    ///
    /// The default differentiates [`Curve::derivative`] numerically.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        central_difference(t, |s| self.derivative(s))
    }

    /// Unit tangent at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the derivative vanishes.
    fn tangent(&self, t: f64) -> Result<Vector3> {
        let d = self.derivative(t)?;
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    /// Returns the natural parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed over its natural domain.
    fn is_closed(&self) -> bool;

    /// Arc length between `t0` and `t1`, always non-negative.
    ///
    /// The default integrates `|C'(t)|` with Gauss-Legendre quadrature.
    ///
    /// # Errors
    ///
    /// Returns an error if the derivative cannot be evaluated.
    fn arc_length(&self, t0: f64, t1: f64) -> Result<f64> {
        let len = integrate(t0, t1, DEFAULT_SEGMENTS, 0.0, |t| {
            Ok(self.derivative(t)?.norm())
        })?;
        Ok(len.abs())
    }

    /// Curvature `|C' x C''| / |C'|^3` at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the first derivative vanishes.
    fn curvature(&self, t: f64) -> Result<f64> {
        let d1 = self.derivative(t)?;
        let speed = d1.norm();
        if speed < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let d2 = self.second_derivative(t)?;
        Ok(d1.cross(&d2).norm() / speed.powi(3))
    }
}

/// Numerical central difference of a vector-valued function.
pub(crate) fn central_difference<F>(t: f64, f: F) -> Result<Vector3>
where
    F: Fn(f64) -> Result<Vector3>,
{
    let h = DIFF_STEP * t.abs().max(1.0);
    Ok((f(t + h)? - f(t - h)?) / (2.0 * h))
}

/// The geometric curve carried by an edge.
///
/// This is the single place where curve families are enumerated; consumers
/// match on it exhaustively.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A straight line.
    Line(Line),
    /// A circle; the edge's parameter range selects the arc.
    Circle(Circle),
    /// An ellipse.
    Ellipse(Ellipse),
    /// One branch of a hyperbola.
    Hyperbola(Hyperbola),
    /// A parabola.
    Parabola(Parabola),
    /// A (possibly rational) Bezier curve.
    Bezier(BezierCurve),
    /// A (possibly rational) B-spline curve.
    BSpline(BSplineCurve),
    /// A curve at constant distance from a basis curve.
    Offset(OffsetCurve),
}

impl EdgeCurve {
    /// Returns the curve as a trait object for evaluation.
    #[must_use]
    pub fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(c) => c,
            Self::Circle(c) => c,
            Self::Ellipse(c) => c,
            Self::Hyperbola(c) => c,
            Self::Parabola(c) => c,
            Self::Bezier(c) => c,
            Self::BSpline(c) => c,
            Self::Offset(c) => c,
        }
    }
}
