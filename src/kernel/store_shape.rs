use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{Key, KeyData};

use crate::error::{Result, ValidationError};
use crate::math::Point3;
use crate::operations::query::{Aabb, BoundingBox, BoundsTarget, FaceMass, MassProperties};
use crate::topology::{EdgeId, FaceId, ShellId, SolidId, TopologyStore, VertexId, WireId};

use super::{
    BrepKernel, CurveRange, EntityKey, FaceBoundary, Orientation, SurfacePatch, TopoKind,
};

#[derive(Debug, Clone, Copy)]
enum ShapeRoot {
    Solid(SolidId),
    Shell(ShellId),
}

/// A shape in a [`TopologyStore`], viewed through [`BrepKernel`].
///
/// Slotmap keys serve as the structural identity: a shared edge is one
/// `EdgeId` no matter how many wires reference it.
///
/// Seam edges are collected once when the view is created.
#[derive(Debug, Clone)]
pub struct StoreShape<'a> {
    store: &'a TopologyStore,
    root: ShapeRoot,
    seams: FxHashSet<EdgeId>,
}

fn key_of<K: Key>(id: K) -> EntityKey {
    EntityKey(id.data().as_ffi())
}

fn id_of<K: Key>(key: EntityKey) -> K {
    K::from(KeyData::from_ffi(key.0))
}

impl<'a> StoreShape<'a> {
    /// Views a solid.
    #[must_use]
    pub fn solid(store: &'a TopologyStore, solid: SolidId) -> Self {
        Self::rooted(store, ShapeRoot::Solid(solid))
    }

    /// Views a single shell (for example an open sheet).
    #[must_use]
    pub fn shell(store: &'a TopologyStore, shell: ShellId) -> Self {
        Self::rooted(store, ShapeRoot::Shell(shell))
    }

    fn rooted(store: &'a TopologyStore, root: ShapeRoot) -> Self {
        let mut shape = Self {
            store,
            root,
            seams: FxHashSet::default(),
        };
        shape.seams = shape.collect_seams();
        shape
    }

    /// Edges used at least twice by the wires of a single face.
    fn collect_seams(&self) -> FxHashSet<EdgeId> {
        let mut seams = FxHashSet::default();
        let mut uses: FxHashMap<EdgeId, usize> = FxHashMap::default();
        for f in self.faces() {
            uses.clear();
            for e in self.face_edges(f) {
                let n = uses.entry(e).or_default();
                *n += 1;
                if *n == 2 {
                    seams.insert(e);
                }
            }
        }
        seams
    }

    fn shells(&self) -> Vec<ShellId> {
        match self.root {
            ShapeRoot::Solid(s) => self
                .store
                .solid(s)
                .map(|solid| solid.shells().collect())
                .unwrap_or_default(),
            ShapeRoot::Shell(s) => vec![s],
        }
    }

    /// Faces in traversal order, repeated if a face sits in several shells.
    fn faces(&self) -> Vec<FaceId> {
        self.shells()
            .into_iter()
            .filter_map(|s| self.store.shell(s).ok())
            .flat_map(|shell| shell.faces.iter().copied())
            .collect()
    }

    fn wires_of(&self, face: FaceId) -> Vec<WireId> {
        self.store
            .face(face)
            .map(|f| std::iter::once(f.outer_wire).chain(f.inner_wires.iter().copied()).collect())
            .unwrap_or_default()
    }

    fn wire_edges(&self, wire: WireId) -> Vec<EdgeId> {
        self.store
            .wire(wire)
            .map(|w| w.edges.iter().map(|oe| oe.edge).collect())
            .unwrap_or_default()
    }

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId> {
        self.wires_of(face)
            .into_iter()
            .flat_map(|w| self.wire_edges(w))
            .collect()
    }

    fn edge_ends(&self, edge: EdgeId) -> Vec<VertexId> {
        self.store
            .edge(edge)
            .map(|e| vec![e.start, e.end])
            .unwrap_or_default()
    }

    fn children(&self, parent: EntityKey, parent_kind: TopoKind, child: TopoKind) -> Vec<EntityKey> {
        match (parent_kind, child) {
            (TopoKind::Face, TopoKind::Edge) => {
                self.face_edges(id_of(parent)).into_iter().map(key_of).collect()
            }
            (TopoKind::Face, TopoKind::Vertex) => self
                .face_edges(id_of(parent))
                .into_iter()
                .flat_map(|e| self.edge_ends(e))
                .map(key_of)
                .collect(),
            (TopoKind::Edge, TopoKind::Vertex) => {
                self.edge_ends(id_of(parent)).into_iter().map(key_of).collect()
            }
            _ => Vec::new(),
        }
    }

    fn check_face(&self, face: FaceId) -> Result<()> {
        let data = self.store.face(face)?;
        for w in std::iter::once(&data.outer_wire).chain(&data.inner_wires) {
            for oe in &self.store.wire(*w)?.edges {
                let edge = self.store.edge(oe.edge)?;
                self.store.vertex(edge.start)?;
                self.store.vertex(edge.end)?;
            }
        }
        Ok(())
    }
}

impl BrepKernel for StoreShape<'_> {
    fn validate(&self) -> Result<()> {
        let shells = match self.root {
            ShapeRoot::Solid(s) => self
                .store
                .solid(s)
                .map_err(|_| ValidationError::MissingRoot(format!("{s:?}")))?
                .shells()
                .collect(),
            ShapeRoot::Shell(s) => vec![s],
        };
        for s in shells {
            let shell = self
                .store
                .shell(s)
                .map_err(|_| ValidationError::MissingRoot(format!("{s:?}")))?;
            for f in &shell.faces {
                self.check_face(*f)?;
            }
        }
        if self.faces().is_empty() {
            return Err(ValidationError::EmptyShape.into());
        }
        Ok(())
    }

    fn explore(&self, kind: TopoKind) -> Vec<EntityKey> {
        let faces = self.faces();
        match kind {
            TopoKind::Face => faces.into_iter().map(key_of).collect(),
            TopoKind::Edge | TopoKind::Vertex => faces
                .into_iter()
                .flat_map(|f| self.children(key_of(f), TopoKind::Face, kind))
                .collect(),
        }
    }

    fn edge_vertices(&self, edge: EntityKey) -> Option<(EntityKey, EntityKey)> {
        let e = self.store.edge(id_of(edge)).ok()?;
        Some((key_of(e.start), key_of(e.end)))
    }

    fn face_boundary(&self, face: EntityKey) -> Option<FaceBoundary> {
        let f = self.store.face(id_of(face)).ok()?;
        let keys = |w: WireId| self.wire_edges(w).into_iter().map(key_of).collect();
        Some(FaceBoundary {
            outer: keys(f.outer_wire),
            inner: f.inner_wires.iter().map(|w| keys(*w)).collect(),
        })
    }

    fn ancestors(&self, child: TopoKind, parent: TopoKind) -> Vec<(EntityKey, Vec<EntityKey>)> {
        let mut order: Vec<EntityKey> = Vec::new();
        let mut parents_of: FxHashMap<EntityKey, Vec<EntityKey>> = FxHashMap::default();
        let mut seen_parent = FxHashSet::default();

        for p in self.explore(parent) {
            if !seen_parent.insert(p) {
                continue;
            }
            for c in self.children(p, parent, child) {
                let list = parents_of.entry(c).or_insert_with(|| {
                    order.push(c);
                    Vec::new()
                });
                if !list.contains(&p) {
                    list.push(p);
                }
            }
        }

        order
            .into_iter()
            .map(|c| {
                let parents = parents_of.remove(&c).unwrap_or_default();
                (c, parents)
            })
            .collect()
    }

    fn vertex_point(&self, vertex: EntityKey) -> Option<Point3> {
        self.store
            .vertex(id_of::<VertexId>(vertex))
            .ok()
            .map(|v| v.point)
    }

    fn edge_curve(&self, edge: EntityKey) -> Option<CurveRange<'_>> {
        let e = self.store.edge(id_of(edge)).ok()?;
        Some(CurveRange {
            curve: &e.curve,
            first: e.t_start,
            last: e.t_end,
        })
    }

    fn edge_is_degenerate(&self, edge: EntityKey) -> bool {
        self.store
            .edge(id_of(edge))
            .is_ok_and(|e| e.degenerate)
    }

    fn edge_is_closed(&self, edge: EntityKey) -> bool {
        self.store.edge(id_of(edge)).is_ok_and(|e| e.is_closed())
    }

    fn edge_is_seam(&self, edge: EntityKey) -> bool {
        self.seams.contains(&id_of::<EdgeId>(edge))
    }

    fn face_surface(&self, face: EntityKey) -> Option<SurfacePatch<'_>> {
        let f = self.store.face(id_of(face)).ok()?;
        Some(SurfacePatch {
            surface: &f.surface,
            uv: f.uv_bounds,
        })
    }

    fn face_orientation(&self, face: EntityKey) -> Orientation {
        match self.store.face(id_of(face)) {
            Ok(f) if !f.same_sense => Orientation::Reversed,
            _ => Orientation::Forward,
        }
    }

    fn face_mass(&self, face: EntityKey) -> Option<MassProperties> {
        FaceMass::new(id_of(face)).execute(self.store).ok()
    }

    fn bounds(&self, kind: TopoKind, key: EntityKey) -> Option<Aabb> {
        match kind {
            TopoKind::Vertex => self.vertex_point(key).map(Aabb::from_point),
            TopoKind::Edge => BoundingBox::new(BoundsTarget::Edge(id_of(key)))
                .execute(self.store)
                .ok(),
            TopoKind::Face => BoundingBox::new(BoundsTarget::Face(id_of(key)))
                .execute(self.store)
                .ok(),
        }
    }

    fn shape_bounds(&self) -> Option<Aabb> {
        let target = match self.root {
            ShapeRoot::Solid(s) => BoundsTarget::Solid(s),
            ShapeRoot::Shell(s) => BoundsTarget::Shell(s),
        };
        BoundingBox::new(target).execute(self.store).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BrepJointError;
    use crate::operations::creation::{MakeBox, MakeCylinder};

    fn cube(store: &mut TopologyStore) -> SolidId {
        MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(store)
            .unwrap()
    }

    #[test]
    fn explore_repeats_shared_entities() {
        let mut store = TopologyStore::new();
        let solid = cube(&mut store);
        let shape = StoreShape::solid(&store, solid);
        shape.validate().unwrap();

        assert_eq!(shape.explore(TopoKind::Face).len(), 6);
        assert_eq!(shape.explore(TopoKind::Edge).len(), 24);
        assert_eq!(shape.explore(TopoKind::Vertex).len(), 48);
    }

    #[test]
    fn ancestors_are_distinct() {
        let mut store = TopologyStore::new();
        let solid = cube(&mut store);
        let shape = StoreShape::solid(&store, solid);

        let edge_faces = shape.ancestors(TopoKind::Edge, TopoKind::Face);
        assert_eq!(edge_faces.len(), 12);
        assert!(edge_faces.iter().all(|(_, faces)| faces.len() == 2));

        let vertex_edges = shape.ancestors(TopoKind::Vertex, TopoKind::Edge);
        assert_eq!(vertex_edges.len(), 8);
        assert!(vertex_edges.iter().all(|(_, edges)| edges.len() == 3));

        assert!(shape.ancestors(TopoKind::Face, TopoKind::Edge).is_empty());
    }

    #[test]
    fn key_roundtrip() {
        let mut store = TopologyStore::new();
        let solid = cube(&mut store);
        let shape = StoreShape::solid(&store, solid);
        let e = shape.explore(TopoKind::Edge)[0];
        let (a, b) = shape.edge_vertices(e).unwrap();
        assert_ne!(a, b);
        assert!(shape.vertex_point(a).is_some());
        assert!(shape.edge_curve(e).is_some());
    }

    #[test]
    fn cylinder_seam_detected() {
        let mut store = TopologyStore::new();
        let solid = MakeCylinder::new(Point3::origin(), 1.0, crate::math::Vector3::z(), 2.0)
            .execute(&mut store)
            .unwrap();
        let shape = StoreShape::solid(&store, solid);

        let edges = shape.ancestors(TopoKind::Edge, TopoKind::Face);
        assert_eq!(edges.len(), 3);
        let seams: Vec<_> = edges
            .iter()
            .filter(|(e, _)| shape.edge_is_seam(*e))
            .collect();
        assert_eq!(seams.len(), 1);
        assert_eq!(seams[0].1.len(), 1);
        assert!(edges
            .iter()
            .filter(|(e, _)| !shape.edge_is_seam(*e))
            .all(|(e, faces)| faces.len() == 2 && shape.edge_is_closed(*e)));
    }

    #[test]
    fn shared_edges_between_faces_are_not_seams() {
        let mut store = TopologyStore::new();
        let solid = cube(&mut store);
        let shape = StoreShape::solid(&store, solid);
        assert!(shape.seams.is_empty());
        assert!(shape
            .explore(TopoKind::Edge)
            .into_iter()
            .all(|e| !shape.edge_is_seam(e)));

        let mut store = TopologyStore::new();
        let solid = MakeCylinder::new(Point3::origin(), 1.0, crate::math::Vector3::z(), 2.0)
            .execute(&mut store)
            .unwrap();
        let shape = StoreShape::solid(&store, solid);
        assert_eq!(shape.seams.len(), 1);
    }

    #[test]
    fn missing_root_rejected() {
        let mut other = TopologyStore::new();
        let solid = cube(&mut other);
        let store = TopologyStore::new();
        let r = StoreShape::solid(&store, solid).validate();
        assert!(matches!(
            r,
            Err(BrepJointError::Validation(ValidationError::MissingRoot(_)))
        ));
    }

    #[test]
    fn empty_shell_rejected() {
        let mut store = TopologyStore::new();
        let shell = store.add_shell(crate::topology::ShellData {
            faces: Vec::new(),
            is_closed: false,
        });
        let r = StoreShape::shell(&store, shell).validate();
        assert!(matches!(
            r,
            Err(BrepJointError::Validation(ValidationError::EmptyShape))
        ));
    }
}
