//! Shapes and stubs shared by unit tests.

#![allow(clippy::unwrap_used)]

use crate::extract::{
    BoundingBoxDescriptor, CurveCategory, EdgeDescriptor, FaceDescriptor, SurfaceCategory,
    SurfaceParams, UvRange,
};
use crate::geometry::curve::{EdgeCurve, Line};
use crate::geometry::surface::{FaceSurface, Plane, Sphere, SurfaceDomain};
use crate::kernel::{
    BrepKernel, CurveRange, EntityKey, FaceBoundary, Orientation, StoreShape, SurfacePatch,
    TopoKind,
};
use crate::math::{Point3, Vector3};
use crate::operations::creation::{MakeBox, MakeCylinder, MakeFace, MakeLineEdge, MakeShell, MakeWire};
use crate::operations::query::{Aabb, MassProperties};
use crate::topology::{
    EdgeData, EdgeId, OrientedEdge, ShellId, SolidId, TopologyStore, VertexData, VertexId,
};

/// Installs a test-writer subscriber once; later calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Axis-aligned cube with one corner at the origin.
pub(crate) fn cube(store: &mut TopologyStore, size: f64) -> SolidId {
    MakeBox::new(Point3::origin(), Point3::new(size, size, size))
        .execute(store)
        .unwrap()
}

/// Cylinder of radius 2 and height 5 standing on the XY plane.
pub(crate) fn cylinder(store: &mut TopologyStore) -> SolidId {
    MakeCylinder::new(Point3::origin(), 2.0, Vector3::z(), 5.0)
        .execute(store)
        .unwrap()
}

fn vertex(store: &mut TopologyStore, x: f64, y: f64, z: f64) -> VertexId {
    store.add_vertex(VertexData::new(Point3::new(x, y, z)))
}

fn line(store: &mut TopologyStore, a: VertexId, b: VertexId) -> EdgeId {
    MakeLineEdge::new(a, b).execute(store).unwrap()
}

fn planar_face(
    store: &mut TopologyStore,
    edges: Vec<OrientedEdge>,
    origin: Point3,
    normal: Vector3,
) -> crate::topology::FaceId {
    let wire = MakeWire::new(edges).execute(store).unwrap();
    let plane = Plane::new(origin, normal, Vector3::x()).unwrap();
    MakeFace::new(FaceSurface::Plane(plane), wire)
        .execute(store)
        .unwrap()
}

/// Two coplanar `size` squares side by side along X sharing one edge. With
/// `opposed` the second plate's surface normal is -Z.
pub(crate) fn plates(store: &mut TopologyStore, size: f64, opposed: bool) -> ShellId {
    let v0 = vertex(store, 0.0, 0.0, 0.0);
    let v1 = vertex(store, size, 0.0, 0.0);
    let v2 = vertex(store, 2.0 * size, 0.0, 0.0);
    let v3 = vertex(store, 0.0, size, 0.0);
    let v4 = vertex(store, size, size, 0.0);
    let v5 = vertex(store, 2.0 * size, size, 0.0);

    let shared = line(store, v1, v4);
    let a_edges = vec![
        OrientedEdge::new(line(store, v0, v1), true),
        OrientedEdge::new(shared, true),
        OrientedEdge::new(line(store, v4, v3), true),
        OrientedEdge::new(line(store, v3, v0), true),
    ];
    let b_edges = vec![
        OrientedEdge::new(line(store, v1, v2), true),
        OrientedEdge::new(line(store, v2, v5), true),
        OrientedEdge::new(line(store, v5, v4), true),
        OrientedEdge::new(shared, false),
    ];

    let a = planar_face(store, a_edges, Point3::origin(), Vector3::z());
    let b_normal = if opposed { -Vector3::z() } else { Vector3::z() };
    let b = planar_face(store, b_edges, Point3::new(size, 0.0, 0.0), b_normal);
    MakeShell::new(vec![a, b]).execute(store).unwrap()
}

/// Three plates meeting along the X axis segment `[0, 10]`.
pub(crate) fn fin(store: &mut TopologyStore) -> ShellId {
    let v0 = vertex(store, 0.0, 0.0, 0.0);
    let v1 = vertex(store, 10.0, 0.0, 0.0);
    let spine = line(store, v0, v1);

    let mut faces = Vec::new();
    for (dir, normal) in [
        (Vector3::y(), Vector3::z()),
        (-Vector3::y(), -Vector3::z()),
        (Vector3::z(), -Vector3::y()),
    ] {
        let a = store.add_vertex(VertexData::new(Point3::new(10.0, 0.0, 0.0) + dir * 10.0));
        let b = store.add_vertex(VertexData::new(Point3::origin() + dir * 10.0));
        let edges = vec![
            OrientedEdge::new(spine, true),
            OrientedEdge::new(line(store, v1, a), true),
            OrientedEdge::new(line(store, a, b), true),
            OrientedEdge::new(line(store, b, v0), true),
        ];
        faces.push(planar_face(store, edges, Point3::origin(), normal));
    }
    MakeShell::new(faces).execute(store).unwrap()
}

/// Two triangles at a right angle sharing a 10-unit edge, with a degenerate
/// edge collapsed onto the shared edge's end vertex in both loops.
pub(crate) fn plates_with_degenerate_edge(store: &mut TopologyStore) -> ShellId {
    let v0 = vertex(store, 0.0, 0.0, 0.0);
    let v1 = vertex(store, 10.0, 0.0, 0.0);
    let v2 = vertex(store, 5.0, 10.0, 0.0);
    let v3 = vertex(store, 5.0, 0.0, 10.0);

    let shared = line(store, v0, v1);
    let collapsed = Line::new(Point3::new(10.0, 0.0, 0.0), Vector3::x()).unwrap();
    let degenerate = store.add_edge(EdgeData {
        degenerate: true,
        ..EdgeData::new(v1, v1, EdgeCurve::Line(collapsed), 0.0, 0.0)
    });

    let a_edges = vec![
        OrientedEdge::new(shared, true),
        OrientedEdge::new(degenerate, true),
        OrientedEdge::new(line(store, v1, v2), true),
        OrientedEdge::new(line(store, v2, v0), true),
    ];
    let b_edges = vec![
        OrientedEdge::new(shared, false),
        OrientedEdge::new(line(store, v0, v3), true),
        OrientedEdge::new(line(store, v3, v1), true),
        OrientedEdge::new(degenerate, true),
    ];

    let a = planar_face(store, a_edges, Point3::origin(), Vector3::z());
    let b = planar_face(store, b_edges, Point3::origin(), -Vector3::y());
    MakeShell::new(vec![a, b]).execute(store).unwrap()
}

/// A unit square on a plane whose origin is NaN.
pub(crate) fn nan_origin_plate(store: &mut TopologyStore) -> ShellId {
    let v0 = vertex(store, 0.0, 0.0, 0.0);
    let v1 = vertex(store, 1.0, 0.0, 0.0);
    let v2 = vertex(store, 1.0, 1.0, 0.0);
    let v3 = vertex(store, 0.0, 1.0, 0.0);
    let edges = vec![
        OrientedEdge::new(line(store, v0, v1), true),
        OrientedEdge::new(line(store, v1, v2), true),
        OrientedEdge::new(line(store, v2, v3), true),
        OrientedEdge::new(line(store, v3, v0), true),
    ];
    let wire = MakeWire::new(edges).execute(store).unwrap();
    let plane = Plane::new(Point3::new(f64::NAN, 0.0, 0.0), Vector3::z(), Vector3::x()).unwrap();
    let face = MakeFace::new(FaceSurface::Plane(plane), wire)
        .with_uv_bounds(SurfaceDomain::new(0.0, 1.0, 0.0, 1.0))
        .execute(store)
        .unwrap();
    MakeShell::new(vec![face]).execute(store).unwrap()
}

/// Wraps a [`StoreShape`] and degrades chosen entities.
///
/// A hidden edge has no curve. A polar face is served a unit sphere patch
/// whose UV centre sits on the pole, so its normal is undefined there, and
/// it has no mass properties.
pub(crate) struct Degraded<'a> {
    pub inner: StoreShape<'a>,
    hidden_curve: Option<EntityKey>,
    polar_face: Option<EntityKey>,
    sphere: FaceSurface,
}

impl<'a> Degraded<'a> {
    pub(crate) fn new(inner: StoreShape<'a>) -> Self {
        let sphere = Sphere::new(Point3::origin(), Vector3::z(), Vector3::x(), 1.0).unwrap();
        Self {
            inner,
            hidden_curve: None,
            polar_face: None,
            sphere: FaceSurface::Sphere(sphere),
        }
    }

    pub(crate) fn hide_curve(mut self, edge: EntityKey) -> Self {
        self.hidden_curve = Some(edge);
        self
    }

    pub(crate) fn polar_face(mut self, face: EntityKey) -> Self {
        self.polar_face = Some(face);
        self
    }
}

impl BrepKernel for Degraded<'_> {
    fn validate(&self) -> crate::error::Result<()> {
        self.inner.validate()
    }

    fn explore(&self, kind: TopoKind) -> Vec<EntityKey> {
        self.inner.explore(kind)
    }

    fn edge_vertices(&self, edge: EntityKey) -> Option<(EntityKey, EntityKey)> {
        self.inner.edge_vertices(edge)
    }

    fn face_boundary(&self, face: EntityKey) -> Option<FaceBoundary> {
        self.inner.face_boundary(face)
    }

    fn ancestors(&self, child: TopoKind, parent: TopoKind) -> Vec<(EntityKey, Vec<EntityKey>)> {
        self.inner.ancestors(child, parent)
    }

    fn vertex_point(&self, vertex: EntityKey) -> Option<Point3> {
        self.inner.vertex_point(vertex)
    }

    fn edge_curve(&self, edge: EntityKey) -> Option<CurveRange<'_>> {
        if self.hidden_curve == Some(edge) {
            None
        } else {
            self.inner.edge_curve(edge)
        }
    }

    fn edge_is_degenerate(&self, edge: EntityKey) -> bool {
        self.inner.edge_is_degenerate(edge)
    }

    fn edge_is_closed(&self, edge: EntityKey) -> bool {
        self.inner.edge_is_closed(edge)
    }

    fn edge_is_seam(&self, edge: EntityKey) -> bool {
        self.inner.edge_is_seam(edge)
    }

    fn face_surface(&self, face: EntityKey) -> Option<SurfacePatch<'_>> {
        if self.polar_face == Some(face) {
            Some(SurfacePatch {
                surface: &self.sphere,
                uv: SurfaceDomain::new(0.0, 1.0, 0.0, std::f64::consts::PI),
            })
        } else {
            self.inner.face_surface(face)
        }
    }

    fn face_orientation(&self, face: EntityKey) -> Orientation {
        self.inner.face_orientation(face)
    }

    fn face_mass(&self, face: EntityKey) -> Option<MassProperties> {
        if self.polar_face == Some(face) {
            None
        } else {
            self.inner.face_mass(face)
        }
    }

    fn bounds(&self, kind: TopoKind, key: EntityKey) -> Option<Aabb> {
        self.inner.bounds(kind, key)
    }

    fn shape_bounds(&self) -> Option<Aabb> {
        self.inner.shape_bounds()
    }
}

/// A planar face descriptor with the given center normal.
pub(crate) fn face_stub(id: usize, normal: [f64; 3]) -> FaceDescriptor {
    FaceDescriptor {
        id,
        key: EntityKey(id as u64),
        surface_type: SurfaceCategory::Plane,
        params: Some(SurfaceParams::Plane {
            origin: [0.0; 3],
            normal,
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 1.0, 0.0],
        }),
        outer_edges: Vec::new(),
        inner_edges: Vec::new(),
        area: 1.0,
        centroid: None,
        normal: Some(normal),
        uv_range: UvRange {
            u_min: 0.0,
            u_max: 1.0,
            v_min: 0.0,
            v_max: 1.0,
        },
        orientation: Orientation::Forward,
        bbox: None,
    }
}

/// A straight edge descriptor along X of the given length.
pub(crate) fn edge_stub(id: usize, length: f64) -> EdgeDescriptor {
    EdgeDescriptor {
        id,
        key: EntityKey(id as u64),
        curve_type: CurveCategory::Line,
        params: None,
        first_parameter: 0.0,
        last_parameter: length,
        start_point: [0.0; 3],
        end_point: [length, 0.0, 0.0],
        midpoint: [0.5 * length, 0.0, 0.0],
        vertices: Vec::new(),
        length,
        is_closed: false,
        is_degenerated: false,
        is_seam: false,
        is_manifold: true,
        curvature: Some(0.0),
        bbox: BoundingBoxDescriptor::zero(),
        adjacent_faces: Vec::new(),
    }
}
