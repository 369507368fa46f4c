use crate::error::{GeometryError, Result};
use crate::geometry::surface::{FaceSurface, Plane, SurfaceDomain};
use crate::math::Point3;
use crate::topology::{FaceData, FaceId, TopologyStore, WireId};

/// Samples per edge when deriving plane UV bounds from a boundary.
const BOUNDARY_SAMPLES: u32 = 16;

/// Creates a face from a surface and its boundary wires.
pub struct MakeFace {
    surface: FaceSurface,
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
    same_sense: bool,
    uv_bounds: Option<SurfaceDomain>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation with no holes and forward
    /// orientation.
    #[must_use]
    pub fn new(surface: FaceSurface, outer_wire: WireId) -> Self {
        Self {
            surface,
            outer_wire,
            inner_wires: Vec::new(),
            same_sense: true,
            uv_bounds: None,
        }
    }

    /// Adds hole boundaries.
    #[must_use]
    pub fn with_holes(mut self, inner_wires: Vec<WireId>) -> Self {
        self.inner_wires = inner_wires;
        self
    }

    /// Sets the UV box of the face explicitly. Required for non-planar
    /// surfaces.
    #[must_use]
    pub fn with_uv_bounds(mut self, uv_bounds: SurfaceDomain) -> Self {
        self.uv_bounds = Some(uv_bounds);
        self
    }

    /// Marks the face as reversed relative to its surface.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.same_sense = false;
        self
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// For planar faces without explicit bounds, the UV box is derived by
    /// projecting the outer boundary into the plane.
    ///
    /// # Errors
    ///
    /// Returns an error if a wire is missing, or a non-planar face has no
    /// UV bounds.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        for w in std::iter::once(&self.outer_wire).chain(&self.inner_wires) {
            store.wire(*w)?;
        }

        let uv_bounds = match (self.uv_bounds, &self.surface) {
            (Some(uv), _) => uv,
            (None, FaceSurface::Plane(plane)) => plane_bounds(store, self.outer_wire, plane)?,
            (None, _) => {
                return Err(GeometryError::Degenerate(
                    "uv bounds are required for non-planar faces".into(),
                )
                .into())
            }
        };

        Ok(store.add_face(FaceData {
            surface: self.surface.clone(),
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
            same_sense: self.same_sense,
            uv_bounds,
        }))
    }
}

fn plane_bounds(store: &TopologyStore, wire: WireId, plane: &Plane) -> Result<SurfaceDomain> {
    let mut points: Vec<Point3> = Vec::new();
    for oe in &store.wire(wire)?.edges {
        let edge = store.edge(oe.edge)?;
        let curve = edge.curve.as_curve();
        let step = (edge.t_end - edge.t_start) / f64::from(BOUNDARY_SAMPLES);
        for i in 0..=BOUNDARY_SAMPLES {
            points.push(curve.evaluate(edge.t_start + step * f64::from(i))?);
        }
    }

    let mut uv = SurfaceDomain::new(f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for p in &points {
        let (u, v) = plane.project(p);
        uv.u_min = uv.u_min.min(u);
        uv.u_max = uv.u_max.max(u);
        uv.v_min = uv.v_min.min(v);
        uv.v_max = uv.v_max.max(v);
    }
    if !uv.is_bounded() {
        return Err(GeometryError::Degenerate("face boundary is empty".into()).into());
    }
    Ok(uv)
}
