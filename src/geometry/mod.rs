pub mod curve;
pub mod surface;

pub use curve::{Curve, CurveDomain, EdgeCurve};
pub use surface::{FaceSurface, Surface, SurfaceDomain};
