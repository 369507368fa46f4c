//! Composite Gauss-Legendre quadrature.
//!
//! Used for arc lengths, planar boundary moments and surface area integrals.
//! Integrands may fail (evaluation errors propagate).

use std::ops::{Add, Mul};

use crate::error::Result;

/// 8-point Gauss-Legendre nodes on `[-1, 1]` (positive half).
const NODES: [f64; 4] = [
    0.183_434_642_495_649_8,
    0.525_532_409_916_329_0,
    0.796_666_477_413_626_7,
    0.960_289_856_497_536_3,
];

/// Weights matching [`NODES`].
const WEIGHTS: [f64; 4] = [
    0.362_683_783_378_362_0,
    0.313_706_645_877_887_3,
    0.222_381_034_453_374_5,
    0.101_228_536_290_376_3,
];

/// Default number of sub-intervals per parameter direction.
pub const DEFAULT_SEGMENTS: usize = 16;

/// Integrates `f` over `[a, b]` split into `segments` equal sub-intervals.
///
/// A reversed interval yields a negated result. An empty interval yields
/// `zero` without evaluating `f`.
///
/// # Errors
///
/// Propagates the first error returned by `f`.
pub fn integrate<T, F>(a: f64, b: f64, segments: usize, zero: T, mut f: F) -> Result<T>
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    F: FnMut(f64) -> Result<T>,
{
    if (b - a).abs() < f64::EPSILON {
        return Ok(zero);
    }
    let segments = segments.max(1);
    #[allow(clippy::cast_precision_loss)]
    let h = (b - a) / segments as f64;

    let mut total = zero;
    for s in 0..segments {
        #[allow(clippy::cast_precision_loss)]
        let lo = a + h * s as f64;
        let mid = lo + 0.5 * h;
        let half = 0.5 * h;
        for (node, weight) in NODES.iter().zip(WEIGHTS.iter()) {
            total = total + f(mid - half * node)? * (weight * half);
            total = total + f(mid + half * node)? * (weight * half);
        }
    }
    Ok(total)
}

/// Integrates `f` over the rectangle `[u0, u1] x [v0, v1]`.
///
/// # Errors
///
/// Propagates the first error returned by `f`.
pub fn integrate_2d<T, F>(
    (u0, u1): (f64, f64),
    (v0, v1): (f64, f64),
    segments: usize,
    zero: T,
    mut f: F,
) -> Result<T>
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    F: FnMut(f64, f64) -> Result<T>,
{
    integrate(u0, u1, segments, zero, |u| {
        integrate(v0, v1, segments, zero, |v| f(u, v))
    })
}
