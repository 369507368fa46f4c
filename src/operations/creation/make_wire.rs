use crate::error::{Result, TopologyError};
use crate::topology::{OrientedEdge, TopologyStore, VertexId, WireData, WireId};

/// Creates a wire from a chain of oriented edges.
pub struct MakeWire {
    edges: Vec<OrientedEdge>,
}

impl MakeWire {
    /// Creates a new `MakeWire` operation.
    #[must_use]
    pub fn new(edges: Vec<OrientedEdge>) -> Self {
        Self { edges }
    }

    /// Executes the operation, creating the wire in the topology store.
    ///
    /// The wire is closed when the last edge ends where the first begins.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is empty, an edge is missing, or two
    /// consecutive edges do not share a vertex.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        let ends = self
            .edges
            .iter()
            .map(|oe| oriented_ends(store, oe))
            .collect::<Result<Vec<_>>>()?;

        let (Some(first), Some(last)) = (ends.first(), ends.last()) else {
            return Err(TopologyError::InvalidTopology("wire has no edges".into()).into());
        };
        for (i, pair) in ends.windows(2).enumerate() {
            if pair[0].1 != pair[1].0 {
                return Err(TopologyError::DisconnectedWire(i).into());
            }
        }
        let is_closed = last.1 == first.0;

        Ok(store.add_wire(WireData {
            edges: self.edges.clone(),
            is_closed,
        }))
    }
}

/// Returns `(start, end)` of an edge in traversal direction.
fn oriented_ends(store: &TopologyStore, oe: &OrientedEdge) -> Result<(VertexId, VertexId)> {
    let edge = store.edge(oe.edge)?;
    Ok(if oe.forward {
        (edge.start, edge.end)
    } else {
        (edge.end, edge.start)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BrepJointError;
    use crate::math::Point3;
    use crate::operations::creation::MakeLineEdge;
    use crate::topology::VertexData;

    #[test]
    fn triangle_is_closed() {
        let mut store = TopologyStore::new();
        let v: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
            .iter()
            .map(|(x, y)| store.add_vertex(VertexData::new(Point3::new(*x, *y, 0.0))))
            .collect();
        let e0 = MakeLineEdge::new(v[0], v[1]).execute(&mut store).unwrap();
        let e1 = MakeLineEdge::new(v[1], v[2]).execute(&mut store).unwrap();
        let e2 = MakeLineEdge::new(v[0], v[2]).execute(&mut store).unwrap();

        let w = MakeWire::new(vec![
            OrientedEdge::new(e0, true),
            OrientedEdge::new(e1, true),
            OrientedEdge::new(e2, false),
        ])
        .execute(&mut store)
        .unwrap();
        assert!(store.wire(w).unwrap().is_closed);
    }

    #[test]
    fn disconnected_chain_fails() {
        let mut store = TopologyStore::new();
        let v: Vec<_> = (0..4)
            .map(|i| store.add_vertex(VertexData::new(Point3::new(f64::from(i), 0.0, 0.0))))
            .collect();
        let e0 = MakeLineEdge::new(v[0], v[1]).execute(&mut store).unwrap();
        let e1 = MakeLineEdge::new(v[2], v[3]).execute(&mut store).unwrap();

        let r = MakeWire::new(vec![OrientedEdge::new(e0, true), OrientedEdge::new(e1, true)])
            .execute(&mut store);
        assert!(matches!(
            r,
            Err(BrepJointError::Topology(TopologyError::DisconnectedWire(0)))
        ));
    }

    #[test]
    fn empty_wire_fails() {
        let mut store = TopologyStore::new();
        assert!(MakeWire::new(Vec::new()).execute(&mut store).is_err());
    }
}
