use crate::geometry::curve::EdgeCurve;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve trimmed to
/// `[t_start, t_end]`. A degenerate edge collapses to a point (for example
/// at a cone apex) and has zero length.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
    /// Set when the edge collapses to a single point.
    pub degenerate: bool,
}

impl EdgeData {
    /// Creates a regular (non-degenerate) edge.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, curve: EdgeCurve, t_start: f64, t_end: f64) -> Self {
        Self {
            start,
            end,
            curve,
            t_start,
            t_end,
            degenerate: false,
        }
    }

    /// Returns `true` if the edge starts and ends on the same vertex.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.start == self.end
    }
}
