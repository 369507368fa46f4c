pub mod edge;
pub mod face;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns all topological entities.
///
/// Entities reference each other via typed IDs (generational indices), so a
/// vertex or edge shared by several parents is stored once and referenced by
/// key. Those keys are the structural identity the extraction deduplicates
/// on.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
}

macro_rules! arena_access {
    ($field:ident, $add:ident, $get:ident, $get_mut:ident, $id:ty, $data:ty, $name:literal) => {
        #[doc = concat!("Inserts a ", $name, " and returns its ID.")]
        pub fn $add(&mut self, data: $data) -> $id {
            self.$field.insert(data)
        }

        #[doc = concat!("Returns the ", $name, " data.")]
        ///
        /// # Errors
        ///
        /// Returns an error if the entity is not found in the store.
        pub fn $get(&self, id: $id) -> Result<&$data, TopologyError> {
            self.$field
                .get(id)
                .ok_or_else(|| TopologyError::EntityNotFound($name.into()))
        }

        #[doc = concat!("Returns the ", $name, " data mutably.")]
        ///
        /// # Errors
        ///
        /// Returns an error if the entity is not found in the store.
        pub fn $get_mut(&mut self, id: $id) -> Result<&mut $data, TopologyError> {
            self.$field
                .get_mut(id)
                .ok_or_else(|| TopologyError::EntityNotFound($name.into()))
        }
    };
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    arena_access!(vertices, add_vertex, vertex, vertex_mut, VertexId, VertexData, "vertex");
    arena_access!(edges, add_edge, edge, edge_mut, EdgeId, EdgeData, "edge");
    arena_access!(wires, add_wire, wire, wire_mut, WireId, WireData, "wire");
    arena_access!(faces, add_face, face, face_mut, FaceId, FaceData, "face");
    arena_access!(shells, add_shell, shell, shell_mut, ShellId, ShellData, "shell");
    arena_access!(solids, add_solid, solid, solid_mut, SolidId, SolidData, "solid");

    /// Returns `true` if the store holds a vertex with this ID.
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    /// Returns `true` if the store holds an edge with this ID.
    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// Returns `true` if the store holds a face with this ID.
    #[must_use]
    pub fn contains_face(&self, id: FaceId) -> bool {
        self.faces.contains_key(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn insert_and_lookup() {
        let mut store = TopologyStore::new();
        let v = store.add_vertex(VertexData::new(Point3::new(1.0, 2.0, 3.0)));
        assert!(store.contains_vertex(v));
        assert_relative_eq!(store.vertex(v).unwrap().point.y, 2.0);

        store.vertex_mut(v).unwrap().point.y = 5.0;
        assert_relative_eq!(store.vertex(v).unwrap().point.y, 5.0);
    }

    #[test]
    fn missing_entity_is_an_error() {
        let mut other = TopologyStore::new();
        let e = other.add_shell(ShellData {
            faces: Vec::new(),
            is_closed: false,
        });
        let store = TopologyStore::new();
        assert!(matches!(store.shell(e), Err(TopologyError::EntityNotFound(_))));
    }
}
