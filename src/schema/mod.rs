//! The structured analysis result and its JSON form.

mod metadata;
mod seam;

pub use metadata::{Diagnostics, EntityCounts, Metadata};
pub use seam::{seam_hints, SeamHint, SeamType};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyGraph;
use crate::classify::{ClassificationReport, JointCandidate, JointStatistics};
use crate::config::{AnalysisConfig, ClassificationMode};
use crate::error::Result;
use crate::extract::{
    BoundingBoxDescriptor, EdgeDescriptor, Entities, FaceDescriptor, VertexDescriptor,
};
use crate::operations::query::Aabb;

/// Joint output of a run. Absent from the document when both lists are
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub mode: ClassificationMode,
    pub potential_weld_seams: Vec<SeamHint>,
    pub joints: Vec<JointCandidate>,
    pub statistics: JointStatistics,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDocument {
    pub metadata: Metadata,
    pub vertices: Vec<VertexDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
    pub faces: Vec<FaceDescriptor>,
    pub topology: AdjacencyGraph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
}

impl GeometryDocument {
    pub(crate) fn assemble(
        config: &AnalysisConfig,
        entities: Entities,
        topology: AdjacencyGraph,
        report: ClassificationReport,
        hints: Vec<SeamHint>,
        bounds: Option<Aabb>,
        diagnostics: Diagnostics,
    ) -> Self {
        let mut curve_types = BTreeMap::new();
        for e in &entities.edges {
            *curve_types.entry(e.curve_type).or_default() += 1;
        }
        let mut surface_types = BTreeMap::new();
        for f in &entities.faces {
            *surface_types.entry(f.surface_type).or_default() += 1;
        }

        let metadata = Metadata {
            source_name: config.source_name.clone(),
            bounding_box: bounds.map_or_else(BoundingBoxDescriptor::zero, BoundingBoxDescriptor::from),
            counts: EntityCounts {
                vertices: entities.vertices.len(),
                edges: entities.edges.len(),
                faces: entities.faces.len(),
            },
            curve_types,
            surface_types,
            topology: topology.summary(),
            diagnostics,
        };

        let features = (!hints.is_empty() || !report.candidates.is_empty()).then(|| Features {
            mode: config.mode,
            potential_weld_seams: hints,
            joints: report.candidates,
            statistics: report.statistics,
        });

        Self {
            metadata,
            vertices: entities.vertices,
            edges: entities.edges,
            faces: entities.faces,
            topology,
            features,
        }
    }

    /// Classified joints, empty if there are none.
    #[must_use]
    pub fn joints(&self) -> &[JointCandidate] {
        self.features
            .as_ref()
            .map(|f| f.joints.as_slice())
            .unwrap_or_default()
    }

    /// Seam hints, empty if there are none or they were disabled.
    #[must_use]
    pub fn seam_hints(&self) -> &[SeamHint] {
        self.features
            .as_ref()
            .map(|f| f.potential_weld_seams.as_slice())
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns a serialization error if a value cannot be encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Returns a serialization error if a value cannot be encoded.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns a serialization error for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
