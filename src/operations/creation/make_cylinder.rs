use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{Circle, EdgeCurve, Line};
use crate::geometry::surface::{Cylinder, FaceSurface, Plane, SurfaceDomain};
use crate::math::{Frame, Point3, Vector3, TOLERANCE};
use crate::topology::{EdgeData, OrientedEdge, SolidId, TopologyStore, VertexData};

use super::{MakeFace, MakeShell, MakeSolid, MakeWire};

/// Creates a closed cylinder solid.
///
/// The lateral face is bounded by the two circular rims and a seam line that
/// appears twice in its wire. The rims are closed edges on a single vertex
/// each and are shared with the planar end caps.
pub struct MakeCylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    height: f64,
}

impl MakeCylinder {
    /// Creates a new `MakeCylinder` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64, axis: Vector3, height: f64) -> Self {
        Self {
            center,
            radius,
            axis,
            height,
        }
    }

    /// Executes the operation, creating the cylinder in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is not positive, or the axis
    /// is degenerate.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        if self.height < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder height must be positive".into()).into(),
            );
        }
        let frame = Frame::from_axis(self.center, self.axis)?;
        let axis = *frame.axis();
        let ref_dir = *frame.ref_dir();
        let top_center = self.center + axis * self.height;

        let v0 = store.add_vertex(VertexData::new(self.center + ref_dir * self.radius));
        let v1 = store.add_vertex(VertexData::new(top_center + ref_dir * self.radius));

        let bottom = store.add_edge(EdgeData::new(
            v0,
            v0,
            EdgeCurve::Circle(Circle::new(self.center, self.radius, axis, ref_dir)?),
            0.0,
            TAU,
        ));
        let top = store.add_edge(EdgeData::new(
            v1,
            v1,
            EdgeCurve::Circle(Circle::new(top_center, self.radius, axis, ref_dir)?),
            0.0,
            TAU,
        ));
        let seam_start = store.vertex(v0)?.point;
        let seam = store.add_edge(EdgeData::new(
            v0,
            v1,
            EdgeCurve::Line(Line::new(seam_start, axis)?),
            0.0,
            self.height,
        ));

        let lateral_wire = MakeWire::new(vec![
            OrientedEdge::new(bottom, true),
            OrientedEdge::new(seam, true),
            OrientedEdge::new(top, false),
            OrientedEdge::new(seam, false),
        ])
        .execute(store)?;
        let lateral = MakeFace::new(
            FaceSurface::Cylinder(Cylinder::new(self.center, axis, ref_dir, self.radius)?),
            lateral_wire,
        )
        .with_uv_bounds(SurfaceDomain::new(0.0, TAU, 0.0, self.height))
        .execute(store)?;

        let bottom_wire = MakeWire::new(vec![OrientedEdge::new(bottom, false)]).execute(store)?;
        let bottom_cap = MakeFace::new(
            FaceSurface::Plane(Plane::new(self.center, -axis, ref_dir)?),
            bottom_wire,
        )
        .execute(store)?;

        let top_wire = MakeWire::new(vec![OrientedEdge::new(top, true)]).execute(store)?;
        let top_cap = MakeFace::new(
            FaceSurface::Plane(Plane::new(top_center, axis, ref_dir)?),
            top_wire,
        )
        .execute(store)?;

        let shell = MakeShell::new(vec![lateral, bottom_cap, top_cap]).execute(store)?;
        MakeSolid::new(shell, Vec::new()).execute(store)
    }
}
