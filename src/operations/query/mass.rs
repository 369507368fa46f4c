use nalgebra::Vector4;

use crate::error::{GeometryError, Result};
use crate::geometry::surface::Plane;
use crate::geometry::{FaceSurface, Surface};
use crate::math::quadrature::{integrate, integrate_2d, DEFAULT_SEGMENTS};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{FaceId, TopologyStore, WireId};

/// Surface mass properties of a face.
#[derive(Debug, Clone, Copy)]
pub struct MassProperties {
    pub area: f64,
    pub centroid: Point3,
}

/// Computes the area and centroid of a face.
///
/// Planar faces integrate their boundary loops with Green's theorem, so holes
/// and arbitrary trims are exact up to quadrature error. Other faces
/// integrate `|dS/du x dS/dv|` over their UV bounds, which ignores trimming
/// inside that box.
pub struct FaceMass {
    face: FaceId,
}

impl FaceMass {
    /// Creates a new `FaceMass` query.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing, its UV bounds are unbounded,
    /// evaluation fails, or the resulting area is zero.
    pub fn execute(&self, store: &TopologyStore) -> Result<MassProperties> {
        let face = store.face(self.face)?;
        match &face.surface {
            FaceSurface::Plane(plane) => {
                let mut total = oriented_loop(store, face.outer_wire, plane)?;
                for hole in &face.inner_wires {
                    total -= oriented_loop(store, *hole, plane)?;
                }
                let area = total.x;
                if area < TOLERANCE {
                    return Err(GeometryError::Degenerate("face encloses no area".into()).into());
                }
                Ok(MassProperties {
                    area,
                    centroid: plane.evaluate(total.y / area, total.z / area)?,
                })
            }
            other => {
                let uv = face.uv_bounds;
                if !uv.is_bounded() {
                    return Err(
                        GeometryError::Degenerate("face has unbounded uv range".into()).into(),
                    );
                }
                let surface = other.as_surface();
                let sums = integrate_2d(
                    (uv.u_min, uv.u_max),
                    (uv.v_min, uv.v_max),
                    DEFAULT_SEGMENTS,
                    Vector4::zeros(),
                    |u, v| {
                        let (su, sv) = surface.partials(u, v)?;
                        let jac = su.cross(&sv).norm();
                        let p = surface.evaluate(u, v)?;
                        Ok(Vector4::new(p.x * jac, p.y * jac, p.z * jac, jac))
                    },
                )?;
                // Reversed uv ranges integrate to a negative measure.
                let sums = if sums.w < 0.0 { -sums } else { sums };
                if sums.w < TOLERANCE {
                    return Err(GeometryError::Degenerate("face encloses no area".into()).into());
                }
                Ok(MassProperties {
                    area: sums.w,
                    centroid: Point3::new(sums.x / sums.w, sums.y / sums.w, sums.z / sums.w),
                })
            }
        }
    }
}

/// Returns `(area, first u moment, first v moment)` of one boundary loop in
/// plane coordinates, signed so that the area is non-negative.
fn oriented_loop(store: &TopologyStore, wire: WireId, plane: &Plane) -> Result<Vector3> {
    let x_dir = *plane.x_dir();
    let y_dir = plane.y_dir();
    let mut total = Vector3::zeros();
    for oe in &store.wire(wire)?.edges {
        let edge = store.edge(oe.edge)?;
        if edge.degenerate {
            continue;
        }
        let curve = edge.curve.as_curve();
        let (a, b) = if oe.forward {
            (edge.t_start, edge.t_end)
        } else {
            (edge.t_end, edge.t_start)
        };
        total += integrate(a, b, DEFAULT_SEGMENTS, Vector3::zeros(), |t| {
            let (u, v) = plane.project(&curve.evaluate(t)?);
            let d = curve.derivative(t)?;
            let (du, dv) = (d.dot(&x_dir), d.dot(&y_dir));
            Ok(Vector3::new(u * dv, 0.5 * u * u * dv, -0.5 * v * v * du))
        })?;
    }
    Ok(if total.x < 0.0 { -total } else { total })
}
