pub mod frame;
pub mod quadrature;

pub use frame::Frame;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Converts a point to a plain coordinate array.
#[must_use]
pub fn point_array(p: &Point3) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// Converts a vector to a plain coordinate array.
#[must_use]
pub fn vector_array(v: &Vector3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// Returns `true` if every component of the array is finite.
#[must_use]
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
