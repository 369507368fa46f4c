//! Entity extraction and the analysis pipeline.
//!
//! [`extract_entities`] walks the shape once per kind, vertices first, then
//! edges, then faces, so that every reference can be resolved against ids
//! assigned earlier. [`analyze`] runs the full pipeline on top of it.

pub mod descriptor;
pub mod edge_analysis;
pub mod registry;

pub use descriptor::{
    BoundingBoxDescriptor, CurveCategory, CurveParams, EdgeDescriptor, FaceDescriptor,
    SurfaceCategory, SurfaceParams, UvRange, VertexDescriptor,
};
pub use edge_analysis::{EdgeAnalysis, EdgeAnalyzer, LengthClass};
pub use registry::{EntityRegistry, KeyTable};

use tracing::{debug, info, warn};

use crate::adjacency::AdjacencyGraph;
use crate::classify::Classifier;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::kernel::{BrepKernel, EntityKey, TopoKind};
use crate::math::{all_finite, point_array, vector_array, Point3};
use crate::operations::query::Aabb;
use crate::schema::{seam_hints, Diagnostics, GeometryDocument};

use registry::Visit;

/// Descriptors of every extracted entity, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Entities {
    pub registry: EntityRegistry,
    pub vertices: Vec<VertexDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
    pub faces: Vec<FaceDescriptor>,
}

/// Runs registry, descriptor extraction, adjacency, classification and
/// assembly over one shape.
///
/// # Errors
///
/// Returns a config error for an invalid `config`, or the kernel's
/// validation error for a shape that cannot be analyzed. Per-entity problems
/// never fail the run; they are counted in the document diagnostics.
pub fn analyze<K>(kernel: &K, config: &AnalysisConfig) -> Result<GeometryDocument>
where
    K: BrepKernel + ?Sized,
{
    config.validate()?;
    kernel.validate()?;

    let mut diagnostics = Diagnostics::default();
    let mut entities = extract_entities(kernel, &mut diagnostics);

    let graph = AdjacencyGraph::build(kernel, &entities, &mut diagnostics);
    graph.back_fill(&mut entities.edges);

    let report = Classifier::new(config).classify(&graph, &entities.edges, &entities.faces);
    diagnostics.gated_candidates = report.gated;
    diagnostics.unmatched_candidates = report.unmatched;
    diagnostics.undefined_angle_candidates = report.undefined_angle;
    diagnostics.non_manifold_candidates = graph.summary().non_manifold_edges;

    let hints = if config.seam_hints {
        seam_hints(&graph, &entities.edges, &entities.faces)
    } else {
        Vec::new()
    };

    info!(
        joints = report.candidates.len(),
        seam_hints = hints.len(),
        mode = ?config.mode,
        "analysis complete"
    );

    let bounds = kernel.shape_bounds();
    Ok(GeometryDocument::assemble(
        config,
        entities,
        graph,
        report,
        hints,
        bounds,
        diagnostics,
    ))
}

/// Builds deduplicated descriptors for all vertices, edges and faces.
///
/// The kernel must already have passed [`BrepKernel::validate`].
pub fn extract_entities<K>(kernel: &K, diagnostics: &mut Diagnostics) -> Entities
where
    K: BrepKernel + ?Sized,
{
    let mut entities = Entities::default();

    for key in kernel.explore(TopoKind::Vertex) {
        if entities.registry.vertices.visit(key) != Visit::Fresh {
            continue;
        }
        match vertex_descriptor(kernel, key, entities.vertices.len()) {
            Some(v) => {
                entities.registry.vertices.assign(key);
                entities.vertices.push(v);
            }
            None => {
                warn!(?key, "skipping vertex without a finite point");
                entities.registry.vertices.skip(key);
                diagnostics.skipped_vertices += 1;
            }
        }
    }
    debug!(count = entities.vertices.len(), "vertices extracted");

    for key in kernel.explore(TopoKind::Edge) {
        if entities.registry.edges.visit(key) != Visit::Fresh {
            continue;
        }
        let id = entities.edges.len();
        match edge_descriptor(kernel, key, id, &entities.registry, diagnostics) {
            Some(e) => {
                entities.registry.edges.assign(key);
                entities.edges.push(e);
            }
            None => {
                warn!(?key, "skipping edge without an evaluable curve");
                entities.registry.edges.skip(key);
                diagnostics.skipped_edges += 1;
            }
        }
    }
    debug!(count = entities.edges.len(), "edges extracted");

    for key in kernel.explore(TopoKind::Face) {
        if entities.registry.faces.visit(key) != Visit::Fresh {
            continue;
        }
        let id = entities.faces.len();
        match face_descriptor(kernel, key, id, &entities, diagnostics) {
            Some(f) => {
                entities.registry.faces.assign(key);
                entities.faces.push(f);
            }
            None => {
                warn!(?key, "skipping face without a surface");
                entities.registry.faces.skip(key);
                diagnostics.skipped_faces += 1;
            }
        }
    }

    info!(
        vertices = entities.vertices.len(),
        edges = entities.edges.len(),
        faces = entities.faces.len(),
        "entities extracted"
    );
    entities
}

fn vertex_descriptor<K>(kernel: &K, key: EntityKey, id: usize) -> Option<VertexDescriptor>
where
    K: BrepKernel + ?Sized,
{
    let point = point_array(&kernel.vertex_point(key)?);
    all_finite(&point).then_some(VertexDescriptor { id, key, point })
}

fn finite_point(p: Result<Point3>) -> Option<[f64; 3]> {
    let arr = point_array(&p.ok()?);
    all_finite(&arr).then_some(arr)
}

fn edge_descriptor<K>(
    kernel: &K,
    key: EntityKey,
    id: usize,
    registry: &EntityRegistry,
    diagnostics: &mut Diagnostics,
) -> Option<EdgeDescriptor>
where
    K: BrepKernel + ?Sized,
{
    let range = kernel.edge_curve(key)?;
    let curve = range.curve.as_curve();
    let (first, last) = (range.first, range.last);
    let mid = 0.5 * (first + last);

    let start_point = finite_point(curve.evaluate(first))?;
    let end_point = finite_point(curve.evaluate(last))?;
    let midpoint = finite_point(curve.evaluate(mid))?;

    let curve_type = CurveCategory::of(range.curve);
    let params = Some(CurveParams::extract(range.curve, first, last)).filter(CurveParams::is_finite);
    if params.is_none() {
        warn!(edge = id, ?curve_type, "curve parameters are not finite");
        diagnostics.parameter_fallbacks += 1;
    }

    let mut vertices = Vec::with_capacity(2);
    if let Some((a, b)) = kernel.edge_vertices(key) {
        for v in [a, b] {
            match registry.id_of_vertex(v) {
                Some(vid) if !vertices.contains(&vid) => vertices.push(vid),
                Some(_) => {}
                None => diagnostics.dropped_references += 1,
            }
        }
    }

    let is_degenerated = kernel.edge_is_degenerate(key);
    let length = if is_degenerated {
        0.0
    } else {
        match curve.arc_length(first, last) {
            Ok(len) if len.is_finite() => len,
            _ => {
                warn!(edge = id, "arc length failed, using zero");
                diagnostics.measure_fallbacks += 1;
                0.0
            }
        }
    };

    let curvature = if is_degenerated {
        None
    } else {
        curve.curvature(mid).ok().filter(|k| k.is_finite())
    };

    let bbox = kernel
        .bounds(TopoKind::Edge, key)
        .or_else(|| {
            Aabb::from_points(
                [start_point, end_point, midpoint]
                    .iter()
                    .map(|p| Point3::new(p[0], p[1], p[2])),
            )
        })
        .map_or_else(BoundingBoxDescriptor::zero, BoundingBoxDescriptor::from);

    Some(EdgeDescriptor {
        id,
        key,
        curve_type,
        params,
        first_parameter: first,
        last_parameter: last,
        start_point,
        end_point,
        midpoint,
        vertices,
        length,
        is_closed: kernel.edge_is_closed(key),
        is_degenerated,
        is_seam: kernel.edge_is_seam(key),
        is_manifold: true,
        curvature,
        bbox,
        adjacent_faces: Vec::new(),
    })
}

fn face_descriptor<K>(
    kernel: &K,
    key: EntityKey,
    id: usize,
    entities: &Entities,
    diagnostics: &mut Diagnostics,
) -> Option<FaceDescriptor>
where
    K: BrepKernel + ?Sized,
{
    let patch = kernel.face_surface(key)?;
    let surface_type = SurfaceCategory::of(patch.surface);

    let params = Some(SurfaceParams::extract(patch.surface)).filter(SurfaceParams::is_finite);
    if params.is_none() {
        warn!(face = id, ?surface_type, "surface parameters are not finite");
        diagnostics.parameter_fallbacks += 1;
    }

    let boundary = kernel.face_boundary(key).unwrap_or_default();
    let mut resolve = |keys: &[EntityKey]| -> Vec<usize> {
        keys.iter()
            .filter_map(|k| {
                let id = entities.registry.id_of_edge(*k);
                if id.is_none() {
                    diagnostics.dropped_references += 1;
                }
                id
            })
            .collect()
    };
    let outer_edges = resolve(&boundary.outer[..]);
    let inner_edges: Vec<Vec<usize>> = boundary.inner.iter().map(|w| resolve(&w[..])).collect();

    let (area, centroid) = match kernel.face_mass(key) {
        Some(m) if m.area.is_finite() => (m.area, Some(point_array(&m.centroid))),
        _ => {
            warn!(face = id, "mass properties failed, using zero area");
            diagnostics.measure_fallbacks += 1;
            (0.0, None)
        }
    };

    let (u, v) = patch.uv.mid();
    let normal = patch
        .surface
        .as_surface()
        .normal(u, v)
        .ok()
        .map(|n| vector_array(&n))
        .filter(|n| all_finite(n));
    if normal.is_none() {
        debug!(face = id, "surface normal undefined at the UV center");
        diagnostics.undefined_normals += 1;
    }

    let bbox = kernel
        .bounds(TopoKind::Face, key)
        .map(BoundingBoxDescriptor::from)
        .or_else(|| {
            let boxes = outer_edges
                .iter()
                .filter_map(|e| entities.edges.get(*e))
                .map(|e| Aabb {
                    min: Point3::from(e.bbox.min),
                    max: Point3::from(e.bbox.max),
                });
            boxes
                .reduce(|a, b| a.union(&b))
                .map(BoundingBoxDescriptor::from)
        });

    Some(FaceDescriptor {
        id,
        key,
        surface_type,
        params,
        outer_edges,
        inner_edges,
        area,
        centroid,
        normal,
        uv_range: UvRange {
            u_min: patch.uv.u_min,
            u_max: patch.uv.u_max,
            v_min: patch.uv.v_min,
            v_max: patch.uv.v_max,
        },
        orientation: kernel.face_orientation(key),
        bbox,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{BrepJointError, ValidationError};
    use crate::kernel::StoreShape;
    use crate::test_support::{self, Degraded};
    use crate::topology::TopologyStore;
    use approx::assert_relative_eq;

    #[test]
    fn cube_entities_are_deduplicated() {
        test_support::init_tracing();
        let mut store = TopologyStore::new();
        let solid = test_support::cube(&mut store, 1.0);
        let shape = StoreShape::solid(&store, solid);

        let mut diag = Diagnostics::default();
        let e = extract_entities(&shape, &mut diag);
        assert_eq!(e.vertices.len(), 8);
        assert_eq!(e.edges.len(), 12);
        assert_eq!(e.faces.len(), 6);
        assert!(diag.is_clean());

        for (i, v) in e.vertices.iter().enumerate() {
            assert_eq!(v.id, i);
            assert_eq!(e.registry.id_of_vertex(v.key), Some(i));
            assert_eq!(e.registry.key_of_vertex(i), Some(v.key));
        }
        for edge in &e.edges {
            assert_eq!(edge.curve_type, CurveCategory::Line);
            assert_eq!(edge.vertices.len(), 2);
            assert_relative_eq!(edge.length, 1.0, epsilon = 1e-9);
            assert!(edge.curvature.unwrap().abs() < 1e-12);
        }
        for face in &e.faces {
            assert_eq!(face.surface_type, SurfaceCategory::Plane);
            assert_eq!(face.outer_edges.len(), 4);
            assert_relative_eq!(face.area, 1.0, epsilon = 1e-9);
            assert!(face.normal.is_some());
        }
    }

    #[test]
    fn repeated_runs_assign_identical_ids() {
        let mut store = TopologyStore::new();
        let solid = test_support::cube(&mut store, 3.0);
        let shape = StoreShape::solid(&store, solid);

        let a = extract_entities(&shape, &mut Diagnostics::default());
        let b = extract_entities(&shape, &mut Diagnostics::default());
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.edges, b.edges);
        assert_eq!(a.faces, b.faces);
    }

    #[test]
    fn cylinder_descriptors() {
        let mut store = TopologyStore::new();
        let solid = test_support::cylinder(&mut store);
        let shape = StoreShape::solid(&store, solid);
        let e = extract_entities(&shape, &mut Diagnostics::default());

        assert_eq!(e.edges.len(), 3);
        let circles: Vec<_> = e
            .edges
            .iter()
            .filter(|e| e.curve_type == CurveCategory::Circle)
            .collect();
        assert_eq!(circles.len(), 2);
        for c in circles {
            assert!(c.is_closed);
            assert_eq!(c.vertices.len(), 1);
            assert!(matches!(
                c.params,
                Some(CurveParams::Circle { is_full_circle: true, .. })
            ));
        }
        let seam = e.edges.iter().find(|e| e.is_seam).unwrap();
        assert_eq!(seam.curve_type, CurveCategory::Line);

        let lateral = e
            .faces
            .iter()
            .find(|f| f.surface_type == SurfaceCategory::Cylinder)
            .unwrap();
        assert_eq!(lateral.outer_edges.len(), 4);
        assert_relative_eq!(lateral.area, std::f64::consts::TAU * 2.0 * 5.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_edge_has_zero_length() {
        let mut store = TopologyStore::new();
        let shell = test_support::plates_with_degenerate_edge(&mut store);
        let shape = StoreShape::shell(&store, shell);
        let e = extract_entities(&shape, &mut Diagnostics::default());

        let deg = e.edges.iter().find(|e| e.is_degenerated).unwrap();
        assert!(deg.length.abs() < f64::EPSILON);
        assert!(deg.curvature.is_none());
        assert!(deg.is_closed);
    }

    #[test]
    fn edge_without_curve_is_skipped_once() {
        let mut store = TopologyStore::new();
        let solid = test_support::cube(&mut store, 1.0);
        let inner = StoreShape::solid(&store, solid);
        let hidden = inner.explore(TopoKind::Edge)[0];
        let shape = Degraded::new(inner).hide_curve(hidden);

        let mut diag = Diagnostics::default();
        let e = extract_entities(&shape, &mut diag);
        assert_eq!(diag.skipped_edges, 1);
        assert_eq!(e.edges.len(), 11);
        assert!(e.registry.id_of_edge(hidden).is_none());
        // two faces referenced the hidden edge
        assert_eq!(diag.dropped_references, 2);
        assert!(e.faces.iter().all(|f| !f.outer_edges.is_empty()));
        let short = e.faces.iter().filter(|f| f.outer_edges.len() == 3).count();
        assert_eq!(short, 2);
    }

    #[test]
    fn non_finite_parameters_fall_back() {
        let mut store = TopologyStore::new();
        let shell = test_support::nan_origin_plate(&mut store);
        let shape = StoreShape::shell(&store, shell);

        let mut diag = Diagnostics::default();
        let e = extract_entities(&shape, &mut diag);
        assert_eq!(e.faces.len(), 1);
        assert!(e.faces[0].params.is_none());
        assert_eq!(diag.parameter_fallbacks, 1);
    }

    #[test]
    fn undefined_normal_drops_the_candidate() {
        test_support::init_tracing();
        let mut store = TopologyStore::new();
        let shell = test_support::plates(&mut store, 10.0, false);
        let inner = StoreShape::shell(&store, shell);
        let polar = inner.explore(TopoKind::Face)[1];
        let shape = Degraded::new(inner).polar_face(polar);

        let mut config = AnalysisConfig::default();
        config.weld_seam.require_planar = false;
        let doc = analyze(&shape, &config).unwrap();
        let d = &doc.metadata.diagnostics;

        assert!(doc.joints().is_empty());
        assert_eq!(d.undefined_angle_candidates, 1);
        assert_eq!(d.gated_candidates, 0);
        assert_eq!(d.undefined_normals, 1);
        assert_eq!(d.measure_fallbacks, 1);

        let face = &doc.faces[1];
        assert_eq!(face.surface_type, SurfaceCategory::Sphere);
        assert!(face.normal.is_none());
        assert!(face.centroid.is_none());
        assert!(face.area.abs() < f64::EPSILON);

        // the seam heuristic still reports the pair, at its default angle
        assert_eq!(doc.seam_hints().len(), 1);
        assert_relative_eq!(doc.seam_hints()[0].angle, 90.0);
    }

    #[test]
    fn analyze_rejects_empty_shell() {
        let mut store = TopologyStore::new();
        let shell = store.add_shell(crate::topology::ShellData {
            faces: Vec::new(),
            is_closed: false,
        });
        let r = analyze(&StoreShape::shell(&store, shell), &AnalysisConfig::default());
        assert!(matches!(
            r,
            Err(BrepJointError::Validation(ValidationError::EmptyShape))
        ));
    }
}
