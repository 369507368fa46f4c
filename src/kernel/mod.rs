//! The seam between joint analysis and a B-Rep kernel.
//!
//! Analysis only ever talks to a [`BrepKernel`]; [`StoreShape`] implements it
//! over the crate's own [`TopologyStore`](crate::topology::TopologyStore).
//! Another kernel can be plugged in by implementing the trait over its own
//! handles and mapping them to [`EntityKey`]s.

mod store_shape;

pub use store_shape::StoreShape;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{EdgeCurve, FaceSurface, SurfaceDomain};
use crate::math::Point3;
use crate::operations::query::{Aabb, MassProperties};

/// Opaque structural identity of a kernel entity.
///
/// Two handles to the same underlying vertex, edge or face yield the same
/// key, however many parents reference it. Keys are only unique within one
/// [`TopoKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub u64);

/// The topology kinds analysis distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopoKind {
    Vertex,
    Edge,
    Face,
}

/// Orientation of a face relative to its underlying surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Forward,
    Reversed,
}

/// Edge keys bounding a face.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceBoundary {
    /// Outer loop, in wire order.
    pub outer: Vec<EntityKey>,
    /// One list per hole.
    pub inner: Vec<Vec<EntityKey>>,
}

/// A curve together with the parameter range an edge uses.
#[derive(Debug, Clone, Copy)]
pub struct CurveRange<'a> {
    pub curve: &'a EdgeCurve,
    pub first: f64,
    pub last: f64,
}

/// A surface together with the UV box a face covers.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePatch<'a> {
    pub surface: &'a FaceSurface,
    pub uv: SurfaceDomain,
}

/// Read-only queries analysis needs from a B-Rep kernel.
///
/// Every lookup that can legitimately fail for a single entity returns an
/// `Option`; only [`BrepKernel::validate`] rejects the shape as a whole.
pub trait BrepKernel {
    /// Rejects a shape that cannot be analyzed at all.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or empty shape, or a
    /// topology error for dangling references.
    fn validate(&self) -> Result<()>;

    /// Enumerates entities of one kind in traversal order, with repeats for
    /// entities reached through several parents.
    fn explore(&self, kind: TopoKind) -> Vec<EntityKey>;

    /// Start and end vertex of an edge.
    fn edge_vertices(&self, edge: EntityKey) -> Option<(EntityKey, EntityKey)>;

    /// Boundary edges of a face.
    fn face_boundary(&self, face: EntityKey) -> Option<FaceBoundary>;

    /// Maps each `child` entity to its distinct `parent` entities, both in
    /// first-seen traversal order.
    fn ancestors(&self, child: TopoKind, parent: TopoKind) -> Vec<(EntityKey, Vec<EntityKey>)>;

    fn vertex_point(&self, vertex: EntityKey) -> Option<Point3>;

    /// The 3D curve of an edge, or `None` if the edge has none.
    fn edge_curve(&self, edge: EntityKey) -> Option<CurveRange<'_>>;

    fn edge_is_degenerate(&self, edge: EntityKey) -> bool;

    fn edge_is_closed(&self, edge: EntityKey) -> bool;

    /// `true` if the edge bounds the same face on both sides.
    fn edge_is_seam(&self, edge: EntityKey) -> bool;

    /// The surface of a face, or `None` if the face has none.
    fn face_surface(&self, face: EntityKey) -> Option<SurfacePatch<'_>>;

    fn face_orientation(&self, face: EntityKey) -> Orientation;

    /// Area and centroid, or `None` if they cannot be computed.
    fn face_mass(&self, face: EntityKey) -> Option<MassProperties>;

    /// Bounding box of a single entity.
    fn bounds(&self, kind: TopoKind, key: EntityKey) -> Option<Aabb>;

    /// Bounding box of the whole shape, or `None` if nothing is bounded.
    fn shape_bounds(&self) -> Option<Aabb>;
}
