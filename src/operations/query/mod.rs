mod bounding_box;
mod mass;

pub use bounding_box::{Aabb, BoundingBox, BoundsTarget};
pub use mass::{FaceMass, MassProperties};
