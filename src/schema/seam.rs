use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyGraph;
use crate::config::AngleWindow;
use crate::extract::{EdgeDescriptor, FaceDescriptor, SurfaceCategory};
use crate::kernel::EntityKey;

/// Angle assumed when either face is not a plane with known parameters.
const DEFAULT_ANGLE: f64 = 90.0;

const BUTT: AngleWindow = AngleWindow::new(160.0, 180.0);
const CORNER: AngleWindow = AngleWindow::new(80.0, 100.0);
const T_JOINT: AngleWindow = AngleWindow::new(85.0, 95.0);
const LAP_BELOW: f64 = 30.0;

const KNOWN_CONFIDENCE: f64 = 0.8;
const UNKNOWN_CONFIDENCE: f64 = 0.3;

/// Coarse seam label from the angle-only heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamType {
    ButtJoint,
    CornerJoint,
    /// Shadowed by [`SeamType::CornerJoint`] with the fixed windows.
    TJoint,
    LapJoint,
    Unknown,
}

impl SeamType {
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        if BUTT.contains(angle) {
            Self::ButtJoint
        } else if CORNER.contains(angle) {
            Self::CornerJoint
        } else if T_JOINT.contains(angle) {
            Self::TJoint
        } else if angle < LAP_BELOW {
            Self::LapJoint
        } else {
            Self::Unknown
        }
    }
}

/// A lightweight seam suggestion, independent of the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeamHint {
    pub edge_id: usize,
    pub edge_key: EntityKey,
    pub seam_type: SeamType,
    pub confidence: f64,
    /// Always zero: the two faces meet at the edge.
    pub gap: f64,
    pub angle: f64,
    pub length: f64,
    pub face_ids: [usize; 2],
    pub face_types: [SurfaceCategory; 2],
}

/// Seam hints for every edge with exactly two faces, from plane parameter
/// normals only.
#[must_use]
pub fn seam_hints(
    graph: &AdjacencyGraph,
    edges: &[EdgeDescriptor],
    faces: &[FaceDescriptor],
) -> Vec<SeamHint> {
    graph
        .edge_face_map
        .iter()
        .filter_map(|(&edge_id, face_ids)| {
            let [a, b] = face_ids.as_slice() else {
                return None;
            };
            let edge = edges.get(edge_id)?;
            let (fa, fb) = (faces.get(*a)?, faces.get(*b)?);

            let angle = plane_angle(fa, fb).unwrap_or(DEFAULT_ANGLE);
            let seam_type = SeamType::from_angle(angle);
            let confidence = if seam_type == SeamType::Unknown {
                UNKNOWN_CONFIDENCE
            } else {
                KNOWN_CONFIDENCE
            };

            Some(SeamHint {
                edge_id,
                edge_key: edge.key,
                seam_type,
                confidence,
                gap: 0.0,
                angle,
                length: edge.length,
                face_ids: [*a, *b],
                face_types: [fa.surface_type, fb.surface_type],
            })
        })
        .collect()
}

fn plane_angle(fa: &FaceDescriptor, fb: &FaceDescriptor) -> Option<f64> {
    let na = fa.params.as_ref()?.plane_normal()?;
    let nb = fb.params.as_ref()?.plane_normal()?;
    let dot: f64 = na.iter().zip(&nb).map(|(x, y)| x * y).sum();
    Some(dot.clamp(-1.0, 1.0).acos().to_degrees())
}
