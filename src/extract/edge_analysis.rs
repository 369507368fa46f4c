//! Detailed inspection of single edges.
//!
//! The pipeline only records midpoint curvature per edge. [`EdgeAnalyzer`]
//! goes further on request: evenly spaced sample points, derivatives at the
//! midpoint, the spread of curvature along the edge and the edge's linear
//! mass properties.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};
use crate::geometry::Curve;
use crate::kernel::{BrepKernel, EntityKey};
use crate::math::quadrature::{integrate, DEFAULT_SEGMENTS};
use crate::math::{all_finite, point_array, vector_array, Vector3, TOLERANCE};

use super::{CurveCategory, EdgeDescriptor};

/// Number of evenly spaced points reported per edge.
pub const SAMPLE_COUNT: usize = 10;

/// Number of parameters at which curvature is sampled.
pub const CURVATURE_SAMPLES: usize = 20;

/// Edges shorter than this are flagged as small.
pub const SMALL_EDGE_LENGTH: f64 = 1e-6;

/// Coarse length bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthClass {
    /// Below 0.001.
    Tiny,
    /// Below 0.1.
    Small,
    /// Below 10.
    Medium,
    Large,
}

impl LengthClass {
    #[must_use]
    pub fn of(length: f64) -> Self {
        if length < 0.001 {
            Self::Tiny
        } else if length < 0.1 {
            Self::Small
        } else if length < 10.0 {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub parameter: f64,
    pub point: [f64; 3],
}

/// First and second derivative at the parameter midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidpointDerivatives {
    pub first: [f64; 3],
    pub second: [f64; 3],
    /// `|C'|` at the midpoint.
    pub tangent_magnitude: f64,
    /// Unit tangent; absent where the derivative vanishes.
    pub tangent: Option<[f64; 3]>,
}

/// Curvature statistics over [`CURVATURE_SAMPLES`] parameters. Zero
/// everywhere when no sample had a defined curvature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvatureSpread {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Samples that contributed.
    pub samples: usize,
}

impl CurvatureSpread {
    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|k| (k - mean).powi(2)).sum::<f64>() / n;
        Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std: var.sqrt(),
            samples: values.len(),
        }
    }
}

/// Everything [`EdgeAnalyzer::analyze`] reports for one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAnalysis {
    pub edge_id: usize,
    pub key: EntityKey,
    pub curve_type: CurveCategory,
    pub length: f64,
    pub length_class: LengthClass,
    pub is_small_edge: bool,
    pub samples: Vec<CurveSample>,
    /// Absent when the curve cannot be differentiated at the midpoint.
    pub derivatives: Option<MidpointDerivatives>,
    pub curvature: CurvatureSpread,
    /// Integral of `|C'|` over the edge range.
    pub linear_mass: f64,
    /// Centre of mass of the curve; absent for zero linear mass.
    pub centroid: Option<[f64; 3]>,
    pub adjacent_face_count: usize,
    pub is_manifold: bool,
}

/// Analyzes extracted edges by id against the kernel they came from.
pub struct EdgeAnalyzer<'a, K: ?Sized> {
    kernel: &'a K,
    edges: &'a [EdgeDescriptor],
}

impl<'a, K> EdgeAnalyzer<'a, K>
where
    K: BrepKernel + ?Sized,
{
    /// `edges` are the descriptors produced from `kernel`, indexed by id.
    #[must_use]
    pub fn new(kernel: &'a K, edges: &'a [EdgeDescriptor]) -> Self {
        Self { kernel, edges }
    }

    /// Analyzes the edge with id `edge_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown id or an edge
    /// whose curve the kernel no longer provides, and propagates evaluation
    /// errors from sampling and integration.
    pub fn analyze(&self, edge_id: usize) -> Result<EdgeAnalysis> {
        let edge = self
            .edges
            .get(edge_id)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("edge {edge_id}")))?;
        let range = self
            .kernel
            .edge_curve(edge.key)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("curve of edge {edge_id}")))?;
        let curve = range.curve.as_curve();
        let (first, last) = (range.first, range.last);

        let samples = (0..SAMPLE_COUNT)
            .map(|i| -> Result<CurveSample> {
                let t = lerp(first, last, i, SAMPLE_COUNT);
                Ok(CurveSample {
                    parameter: t,
                    point: point_array(&curve.evaluate(t)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let derivatives = midpoint_derivatives(curve, 0.5 * (first + last));

        let curvatures: Vec<f64> = if edge.is_degenerated {
            Vec::new()
        } else {
            (0..CURVATURE_SAMPLES)
                .filter_map(|i| curve.curvature(lerp(first, last, i, CURVATURE_SAMPLES)).ok())
                .filter(|k| k.is_finite())
                .collect()
        };

        let mass = integrate(first, last, DEFAULT_SEGMENTS, 0.0, |t| {
            Ok(curve.derivative(t)?.norm())
        })?;
        let moment = integrate(first, last, DEFAULT_SEGMENTS, Vector3::zeros(), |t| {
            Ok(curve.evaluate(t)?.coords * curve.derivative(t)?.norm())
        })?;
        let centroid = (mass.abs() > TOLERANCE)
            .then(|| vector_array(&(moment / mass)))
            .filter(|c| all_finite(c));

        Ok(EdgeAnalysis {
            edge_id,
            key: edge.key,
            curve_type: edge.curve_type,
            length: edge.length,
            length_class: LengthClass::of(edge.length),
            is_small_edge: edge.length < SMALL_EDGE_LENGTH,
            samples,
            derivatives,
            curvature: CurvatureSpread::from_values(&curvatures),
            linear_mass: mass.abs(),
            centroid,
            adjacent_face_count: edge.adjacent_faces.len(),
            is_manifold: edge.is_manifold,
        })
    }

    /// Analyzes several edges, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`EdgeAnalyzer::analyze`].
    pub fn analyze_many(&self, edge_ids: &[usize]) -> Result<Vec<EdgeAnalysis>> {
        edge_ids.iter().map(|id| self.analyze(*id)).collect()
    }
}

fn lerp(first: f64, last: f64, i: usize, count: usize) -> f64 {
    if count < 2 {
        return first;
    }
    #[allow(clippy::cast_precision_loss)]
    let s = i as f64 / (count - 1) as f64;
    first + (last - first) * s
}

fn midpoint_derivatives(curve: &dyn Curve, t: f64) -> Option<MidpointDerivatives> {
    let d1 = curve.derivative(t).ok()?;
    let d2 = curve.second_derivative(t).ok()?;
    let first = vector_array(&d1);
    let second = vector_array(&d2);
    if !all_finite(&first) || !all_finite(&second) {
        return None;
    }
    Some(MidpointDerivatives {
        first,
        second,
        tangent_magnitude: d1.norm(),
        tangent: curve.tangent(t).ok().map(|v| vector_array(&v)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyGraph;
    use crate::error::BrepJointError;
    use crate::extract::extract_entities;
    use crate::kernel::StoreShape;
    use crate::schema::Diagnostics;
    use crate::test_support;
    use crate::topology::TopologyStore;
    use approx::assert_relative_eq;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn circle_has_constant_curvature() {
        let mut store = TopologyStore::new();
        let solid = test_support::cylinder(&mut store);
        let shape = StoreShape::solid(&store, solid);
        let mut diag = Diagnostics::default();
        let mut entities = extract_entities(&shape, &mut diag);
        let graph = AdjacencyGraph::build(&shape, &entities, &mut diag);
        graph.back_fill(&mut entities.edges);

        let circle = entities
            .edges
            .iter()
            .find(|e| e.curve_type == CurveCategory::Circle)
            .unwrap();
        let a = EdgeAnalyzer::new(&shape, &entities.edges)
            .analyze(circle.id)
            .unwrap();

        assert_eq!(a.curvature.samples, CURVATURE_SAMPLES);
        assert_relative_eq!(a.curvature.mean, 0.5, epsilon = 1e-9);
        assert_relative_eq!(a.curvature.min, 0.5, epsilon = 1e-9);
        assert_relative_eq!(a.curvature.max, 0.5, epsilon = 1e-9);
        assert!(a.curvature.std < 1e-9);

        assert_relative_eq!(a.linear_mass, 2.0 * PI * 2.0, epsilon = 1e-9);
        let c = a.centroid.unwrap();
        assert!(c[0].abs() < 1e-9 && c[1].abs() < 1e-9);
        assert_relative_eq!(c[2], circle.start_point[2], epsilon = 1e-9);

        assert_eq!(a.samples.len(), SAMPLE_COUNT);
        assert_relative_eq!(a.samples[SAMPLE_COUNT - 1].parameter, TAU, epsilon = 1e-12);
        let (p0, pn) = (a.samples[0].point, a.samples[SAMPLE_COUNT - 1].point);
        assert_relative_eq!(p0[0], pn[0], epsilon = 1e-9);
        assert_relative_eq!(p0[1], pn[1], epsilon = 1e-9);

        let d = a.derivatives.unwrap();
        assert_relative_eq!(d.tangent_magnitude, 2.0, epsilon = 1e-9);
        assert_eq!(a.length_class, LengthClass::Large);
        assert_eq!(a.adjacent_face_count, 2);
        assert!(a.is_manifold);
    }

    #[test]
    fn cube_edge_is_straight() {
        let mut store = TopologyStore::new();
        let solid = test_support::cube(&mut store, 1.0);
        let shape = StoreShape::solid(&store, solid);
        let entities = extract_entities(&shape, &mut Diagnostics::default());

        let a = EdgeAnalyzer::new(&shape, &entities.edges).analyze(0).unwrap();
        assert!(a.curvature.max < 1e-9);
        assert_eq!(a.length_class, LengthClass::Medium);
        assert!(!a.is_small_edge);

        let d = a.derivatives.unwrap();
        let t = d.tangent.unwrap();
        assert_relative_eq!((t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.second[0], 0.0, epsilon = 1e-12);

        let mid = entities.edges[0].midpoint;
        for (c, m) in a.centroid.unwrap().iter().zip(&mid) {
            assert_relative_eq!(*c, *m, epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_edge_has_no_mass() {
        let mut store = TopologyStore::new();
        let shell = test_support::plates_with_degenerate_edge(&mut store);
        let shape = StoreShape::shell(&store, shell);
        let entities = extract_entities(&shape, &mut Diagnostics::default());
        let deg = entities.edges.iter().find(|e| e.is_degenerated).unwrap();

        let a = EdgeAnalyzer::new(&shape, &entities.edges).analyze(deg.id).unwrap();
        assert!(a.is_small_edge);
        assert_eq!(a.length_class, LengthClass::Tiny);
        assert!(a.linear_mass.abs() < f64::EPSILON);
        assert!(a.centroid.is_none());
        assert_eq!(a.curvature, CurvatureSpread::default());
    }

    #[test]
    fn unknown_edge_id_is_an_error() {
        let mut store = TopologyStore::new();
        let solid = test_support::cube(&mut store, 1.0);
        let shape = StoreShape::solid(&store, solid);
        let entities = extract_entities(&shape, &mut Diagnostics::default());
        let analyzer = EdgeAnalyzer::new(&shape, &entities.edges);

        assert_eq!(analyzer.analyze_many(&[0, 3, 11]).unwrap().len(), 3);
        assert!(matches!(
            analyzer.analyze(12),
            Err(BrepJointError::Topology(TopologyError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn length_buckets() {
        assert_eq!(LengthClass::of(0.0005), LengthClass::Tiny);
        assert_eq!(LengthClass::of(0.05), LengthClass::Small);
        assert_eq!(LengthClass::of(9.99), LengthClass::Medium);
        assert_eq!(LengthClass::of(10.0), LengthClass::Large);
    }
}
