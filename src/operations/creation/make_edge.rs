use crate::error::Result;
use crate::geometry::curve::{EdgeCurve, Line};
use crate::topology::{EdgeData, EdgeId, TopologyStore, VertexId};

/// Creates a straight edge between two existing vertices.
///
/// The line is parameterized by arc length from the start vertex.
pub struct MakeLineEdge {
    start: VertexId,
    end: VertexId,
}

impl MakeLineEdge {
    /// Creates a new `MakeLineEdge` operation.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self { start, end }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or the two vertices
    /// coincide.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let a = store.vertex(self.start)?.point;
        let b = store.vertex(self.end)?.point;
        let line = Line::through(a, b)?;
        let length = (b - a).norm();
        Ok(store.add_edge(EdgeData::new(
            self.start,
            self.end,
            EdgeCurve::Line(line),
            0.0,
            length,
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Curve;
    use crate::math::Point3;
    use crate::topology::VertexData;
    use approx::assert_relative_eq;

    #[test]
    fn edge_ends_on_vertices() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(1.0, 1.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 4.0, 4.0)));
        let e = MakeLineEdge::new(a, b).execute(&mut store).unwrap();

        let edge = store.edge(e).unwrap();
        let end = edge.curve.as_curve().evaluate(edge.t_end).unwrap();
        assert_relative_eq!(end, Point3::new(1.0, 4.0, 4.0), epsilon = 1e-12);
        assert!(!edge.degenerate);
    }

    #[test]
    fn coincident_vertices_fail() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::origin()));
        let b = store.add_vertex(VertexData::new(Point3::origin()));
        assert!(MakeLineEdge::new(a, b).execute(&mut store).is_err());
    }
}
