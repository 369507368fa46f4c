use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adjacency::TopologySummary;
use crate::extract::descriptor::{BoundingBoxDescriptor, CurveCategory, SurfaceCategory};

/// Counters for everything an extraction run dropped or approximated.
///
/// None of these abort a run; they are the only trace a partial extraction
/// leaves in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnostics {
    pub skipped_vertices: usize,
    pub skipped_edges: usize,
    pub skipped_faces: usize,
    /// Entities whose category parameters were dropped.
    pub parameter_fallbacks: usize,
    pub undefined_normals: usize,
    /// Edge lengths or face areas that fell back to zero.
    pub measure_fallbacks: usize,
    /// Endpoint or boundary references to skipped entities.
    pub dropped_references: usize,
    /// Edge-face incidences involving a skipped entity.
    pub dropped_incidences: usize,
    pub gated_candidates: usize,
    pub unmatched_candidates: usize,
    pub undefined_angle_candidates: usize,
    pub non_manifold_candidates: usize,
}

impl Diagnostics {
    /// `true` if nothing was skipped or approximated during extraction.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped_vertices == 0
            && self.skipped_edges == 0
            && self.skipped_faces == 0
            && self.parameter_fallbacks == 0
            && self.undefined_normals == 0
            && self.measure_fallbacks == 0
            && self.dropped_references == 0
            && self.dropped_incidences == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

/// Summary section of a [`GeometryDocument`](super::GeometryDocument).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub bounding_box: BoundingBoxDescriptor,
    pub counts: EntityCounts,
    pub curve_types: BTreeMap<CurveCategory, usize>,
    pub surface_types: BTreeMap<SurfaceCategory, usize>,
    pub topology: TopologySummary,
    pub diagnostics: Diagnostics,
}
