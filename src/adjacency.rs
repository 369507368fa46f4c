//! Edge, face and vertex adjacency.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extract::{EdgeDescriptor, Entities};
use crate::kernel::{BrepKernel, TopoKind};
use crate::schema::Diagnostics;

/// Incidence maps between extracted entities, keyed by id.
///
/// Every list is sorted ascending. An edge absent from `edge_face_map` has no
/// surviving face incidences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyGraph {
    pub edge_face_map: BTreeMap<usize, Vec<usize>>,
    /// Only faces with at least one neighbor appear.
    pub face_adjacency: BTreeMap<usize, Vec<usize>>,
    pub vertex_edge_map: BTreeMap<usize, Vec<usize>>,
}

/// Counts derived from an [`AdjacencyGraph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub total_edges: usize,
    pub boundary_edges: usize,
    pub internal_edges: usize,
    pub potential_weld_edges: usize,
    pub non_manifold_edges: usize,
    pub connected_faces: usize,
    pub connected_vertices: usize,
}

impl AdjacencyGraph {
    /// Builds the graph from one edge-to-face ancestor query plus the edge
    /// endpoint ids already recorded in `entities`.
    pub fn build<K>(kernel: &K, entities: &Entities, diagnostics: &mut Diagnostics) -> Self
    where
        K: BrepKernel + ?Sized,
    {
        let registry = &entities.registry;
        let mut edge_face_map = BTreeMap::new();

        for (edge_key, face_keys) in kernel.ancestors(TopoKind::Edge, TopoKind::Face) {
            let Some(edge_id) = registry.id_of_edge(edge_key) else {
                diagnostics.dropped_incidences += face_keys.len();
                continue;
            };
            let mut faces: Vec<usize> = Vec::with_capacity(face_keys.len());
            for fk in face_keys {
                match registry.id_of_face(fk) {
                    Some(id) => faces.push(id),
                    None => diagnostics.dropped_incidences += 1,
                }
            }
            faces.sort_unstable();
            faces.dedup();
            if !faces.is_empty() {
                edge_face_map.insert(edge_id, faces);
            }
        }

        let mut graph = Self {
            edge_face_map,
            ..Self::default()
        };
        graph.derive_face_adjacency();
        graph.derive_vertex_edges(&entities.edges);

        let summary = graph.summary();
        if summary.non_manifold_edges > 0 {
            warn!(count = summary.non_manifold_edges, "non-manifold edges present");
        }
        debug!(?summary, "adjacency built");
        graph
    }

    fn derive_face_adjacency(&mut self) {
        let mut neighbors: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for faces in self.edge_face_map.values().filter(|f| f.len() >= 2) {
            for (i, &a) in faces.iter().enumerate() {
                for &b in &faces[i + 1..] {
                    neighbors.entry(a).or_default().insert(b);
                    neighbors.entry(b).or_default().insert(a);
                }
            }
        }
        self.face_adjacency = neighbors
            .into_iter()
            .map(|(f, set)| (f, set.into_iter().collect()))
            .collect();
    }

    fn derive_vertex_edges(&mut self, edges: &[EdgeDescriptor]) {
        let mut map: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for edge in edges {
            for &v in &edge.vertices {
                map.entry(v).or_default().insert(edge.id);
            }
        }
        self.vertex_edge_map = map
            .into_iter()
            .map(|(v, set)| (v, set.into_iter().collect()))
            .collect();
    }

    /// Writes adjacent faces and the manifold flag into each edge.
    pub fn back_fill(&self, edges: &mut [EdgeDescriptor]) {
        for edge in edges {
            edge.adjacent_faces = self.adjacent_faces(edge.id).to_vec();
            edge.is_manifold = edge.adjacent_faces.len() <= 2;
        }
    }

    #[must_use]
    pub fn adjacent_faces(&self, edge: usize) -> &[usize] {
        self.edge_face_map.get(&edge).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn face_neighbors(&self, face: usize) -> &[usize] {
        self.face_adjacency.get(&face).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn vertex_edges(&self, vertex: usize) -> &[usize] {
        self.vertex_edge_map.get(&vertex).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_boundary_edge(&self, edge: usize) -> bool {
        self.adjacent_faces(edge).len() == 1
    }

    #[must_use]
    pub fn is_internal_edge(&self, edge: usize) -> bool {
        self.adjacent_faces(edge).len() >= 2
    }

    #[must_use]
    pub fn is_non_manifold_edge(&self, edge: usize) -> bool {
        self.adjacent_faces(edge).len() > 2
    }

    /// Edges shared by exactly two faces, ascending.
    #[must_use]
    pub fn potential_weld_edges(&self) -> Vec<usize> {
        self.edge_face_map
            .iter()
            .filter(|(_, faces)| faces.len() == 2)
            .map(|(&e, _)| e)
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> TopologySummary {
        let count = |pred: fn(usize) -> bool| {
            self.edge_face_map
                .values()
                .filter(|faces| pred(faces.len()))
                .count()
        };
        TopologySummary {
            total_edges: self.edge_face_map.len(),
            boundary_edges: count(|n| n == 1),
            internal_edges: count(|n| n >= 2),
            potential_weld_edges: count(|n| n == 2),
            non_manifold_edges: count(|n| n > 2),
            connected_faces: self.face_adjacency.len(),
            connected_vertices: self.vertex_edge_map.len(),
        }
    }
}
