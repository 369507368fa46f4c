//! Rule-based classification of two-face edges into joint candidates.

mod taxonomy;

pub use taxonomy::{ConfidenceFn, JointLabel, Prerequisites, QualityFn, Rule, Taxonomy};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use crate::adjacency::AdjacencyGraph;
use crate::config::{AnalysisConfig, ClassificationMode};
use crate::extract::{CurveCategory, EdgeDescriptor, FaceDescriptor, SurfaceCategory};

/// A classified joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointCandidate {
    pub joint_type: JointLabel,
    pub edge_id: usize,
    pub face_ids: [usize; 2],
    /// Dihedral angle in degrees.
    #[serde(serialize_with = "round_2dp")]
    pub angle: f64,
    pub length: f64,
    pub midpoint: [f64; 3],
    pub confidence: f64,
    /// Corner taxonomy only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    pub is_linear: bool,
    pub is_planar: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn round_2dp<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

/// Aggregates over the accepted candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointStatistics {
    pub counts: BTreeMap<JointLabel, usize>,
    pub mean_angle: f64,
    pub mean_confidence: f64,
    pub total_length: f64,
}

impl JointStatistics {
    fn from_candidates(candidates: &[JointCandidate]) -> Self {
        let mut stats = Self::default();
        if candidates.is_empty() {
            return stats;
        }
        for c in candidates {
            *stats.counts.entry(c.joint_type).or_default() += 1;
            stats.mean_angle += c.angle;
            stats.mean_confidence += c.confidence;
            stats.total_length += c.length;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = candidates.len() as f64;
        stats.mean_angle /= n;
        stats.mean_confidence /= n;
        stats
    }
}

/// Output of one classification pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationReport {
    pub candidates: Vec<JointCandidate>,
    pub statistics: JointStatistics,
    /// Failed the prerequisite gate.
    pub gated: usize,
    /// Passed the gate but matched no rule.
    pub unmatched: usize,
    /// A face normal was missing.
    pub undefined_angle: usize,
}

/// Runs one taxonomy over the potential weld edges of a graph.
#[derive(Debug, Clone)]
pub struct Classifier {
    mode: ClassificationMode,
    taxonomy: Taxonomy,
}

impl Classifier {
    /// Builds the classifier for `config.mode`.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        let taxonomy = match config.mode {
            ClassificationMode::WeldSeam => Taxonomy::weld_seam(&config.weld_seam),
            ClassificationMode::CornerJoint => Taxonomy::corner_joint(&config.corner_joint),
        };
        Self {
            mode: config.mode,
            taxonomy,
        }
    }

    /// Uses an explicit taxonomy.
    #[must_use]
    pub fn with_taxonomy(mode: ClassificationMode, taxonomy: Taxonomy) -> Self {
        Self { mode, taxonomy }
    }

    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classifies every edge shared by exactly two faces, in ascending edge
    /// id order.
    #[must_use]
    pub fn classify(
        &self,
        graph: &AdjacencyGraph,
        edges: &[EdgeDescriptor],
        faces: &[FaceDescriptor],
    ) -> ClassificationReport {
        let mut report = ClassificationReport::default();

        for edge_id in graph.potential_weld_edges() {
            let (Some(edge), [a, b]) = (edges.get(edge_id), graph.adjacent_faces(edge_id)) else {
                continue;
            };
            let (Some(fa), Some(fb)) = (faces.get(*a), faces.get(*b)) else {
                continue;
            };

            match self.classify_edge(edge, fa, fb) {
                Outcome::Accepted(c) => report.candidates.push(c),
                Outcome::Gated => report.gated += 1,
                Outcome::Unmatched => report.unmatched += 1,
                Outcome::UndefinedAngle => report.undefined_angle += 1,
            }
        }

        report.statistics = JointStatistics::from_candidates(&report.candidates);
        info!(
            mode = ?self.mode,
            accepted = report.candidates.len(),
            gated = report.gated,
            unmatched = report.unmatched,
            undefined_angle = report.undefined_angle,
            "classification complete"
        );
        report
    }

    fn classify_edge(
        &self,
        edge: &EdgeDescriptor,
        fa: &FaceDescriptor,
        fb: &FaceDescriptor,
    ) -> Outcome {
        let gate = &self.taxonomy.gate;
        let is_linear = edge.curve_type == CurveCategory::Line;
        let is_planar =
            fa.surface_type == SurfaceCategory::Plane && fb.surface_type == SurfaceCategory::Plane;

        let curve_ok = gate.required_curve.map_or(true, |c| edge.curve_type == c);
        let surface_ok = gate
            .required_surface
            .map_or(true, |s| fa.surface_type == s && fb.surface_type == s);
        if !curve_ok || !surface_ok || edge.length < gate.min_joint_length {
            debug!(edge = edge.id, is_linear, is_planar, length = edge.length, "gated");
            return Outcome::Gated;
        }

        let Some(angle) = dihedral_angle(fa, fb) else {
            debug!(edge = edge.id, "dihedral angle undefined");
            return Outcome::UndefinedAngle;
        };

        let Some(rule) = self.taxonomy.evaluate(angle, edge.length) else {
            debug!(edge = edge.id, angle, "no rule matched");
            return Outcome::Unmatched;
        };

        Outcome::Accepted(JointCandidate {
            joint_type: rule.label,
            edge_id: edge.id,
            face_ids: [fa.id, fb.id],
            angle,
            length: edge.length,
            midpoint: edge.midpoint,
            confidence: rule.confidence.score(angle, edge.length),
            quality: self.taxonomy.quality.map(|q| q.score(angle, edge.length)),
            is_linear,
            is_planar,
        })
    }
}

enum Outcome {
    Accepted(JointCandidate),
    Gated,
    Unmatched,
    UndefinedAngle,
}

/// Angle in degrees between the two faces' center normals.
#[must_use]
pub fn dihedral_angle(fa: &FaceDescriptor, fb: &FaceDescriptor) -> Option<f64> {
    let (na, nb) = (fa.normal?, fb.normal?);
    let dot: f64 = na.iter().zip(&nb).map(|(x, y)| x * y).sum();
    Some(dot.clamp(-1.0, 1.0).acos().to_degrees())
}
