use rustc_hash::FxHashMap;

use crate::error::{GeometryError, Result};
use crate::geometry::surface::{FaceSurface, Plane};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{EdgeId, OrientedEdge, SolidId, TopologyStore, VertexData, VertexId};

use super::{MakeFace, MakeLineEdge, MakeShell, MakeSolid, MakeWire};

/// Corner indices of each face, counter-clockwise seen from outside, with the
/// outward normal. Corner `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
const FACES: [([usize; 4], [f64; 3]); 6] = [
    ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
    ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
    ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
];

/// Creates a box solid from two corner points.
///
/// The result has 8 vertices, 12 line edges and 6 planar faces whose surface
/// normals point outward. Each edge is shared by exactly two faces.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is not positive.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let size = self.max_corner - self.min_corner;
        if size.iter().any(|s| *s < TOLERANCE) {
            return Err(GeometryError::Degenerate("box extents must be positive".into()).into());
        }

        let corners: Vec<VertexId> = (0..8)
            .map(|i| {
                let p = self.min_corner
                    + Vector3::new(
                        if i & 1 == 0 { 0.0 } else { size.x },
                        if i & 2 == 0 { 0.0 } else { size.y },
                        if i & 4 == 0 { 0.0 } else { size.z },
                    );
                store.add_vertex(VertexData::new(p))
            })
            .collect();

        let mut edges: FxHashMap<(usize, usize), EdgeId> = FxHashMap::default();
        let mut faces = Vec::with_capacity(FACES.len());
        for (loop_idx, normal) in &FACES {
            let mut wire = Vec::with_capacity(4);
            for k in 0..4 {
                let (a, b) = (loop_idx[k], loop_idx[(k + 1) % 4]);
                let key = (a.min(b), a.max(b));
                let edge = match edges.get(&key) {
                    Some(e) => *e,
                    None => {
                        let e = MakeLineEdge::new(corners[key.0], corners[key.1]).execute(store)?;
                        edges.insert(key, e);
                        e
                    }
                };
                wire.push(OrientedEdge::new(edge, a < b));
            }
            let wire = MakeWire::new(wire).execute(store)?;

            let origin = store.vertex(corners[loop_idx[0]])?.point;
            let x_dir = store.vertex(corners[loop_idx[1]])?.point - origin;
            let plane = Plane::new(origin, Vector3::from(*normal), x_dir)?;
            faces.push(MakeFace::new(FaceSurface::Plane(plane), wire).execute(store)?);
        }

        let shell = MakeShell::new(faces).execute(store)?;
        MakeSolid::new(shell, Vec::new()).execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Surface;

    #[test]
    fn box_topology_counts() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0))
            .execute(&mut store)
            .unwrap();
        let shell = store.shell(store.solid(solid).unwrap().outer_shell).unwrap();
        assert_eq!(shell.faces.len(), 6);
        assert!(shell.is_closed);

        let mut edges: Vec<_> = shell
            .faces
            .iter()
            .flat_map(|f| {
                let w = store.face(*f).unwrap().outer_wire;
                store.wire(w).unwrap().edges.iter().map(|oe| oe.edge).collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(edges.len(), 24);
        edges.sort();
        edges.dedup();
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn face_normals_point_outward() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0))
            .execute(&mut store)
            .unwrap();
        let center = Point3::new(1.0, 1.0, 1.0);
        let shell = store.shell(store.solid(solid).unwrap().outer_shell).unwrap();
        for f in &shell.faces {
            let face = store.face(*f).unwrap();
            let (u, v) = face.uv_bounds.mid();
            let s = face.surface.as_surface();
            let p = s.evaluate(u, v).unwrap();
            assert!(s.normal(u, v).unwrap().dot(&(p - center)) > 0.0);
        }
    }

    #[test]
    fn flat_box_fails() {
        let mut store = TopologyStore::new();
        let r = MakeBox::new(Point3::origin(), Point3::new(1.0, 0.0, 1.0)).execute(&mut store);
        assert!(r.is_err());
    }
}
