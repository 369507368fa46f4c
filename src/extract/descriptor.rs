//! Per-entity geometric descriptors.
//!
//! Curve and surface families are mapped to serializable categories and
//! parameter sets in one exhaustive match each. Angles leave this module in
//! degrees; lengths keep the model's unit.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::geometry::{EdgeCurve, FaceSurface};
use crate::kernel::{EntityKey, Orientation};
use crate::math::{all_finite, point_array, vector_array, Point3};
use crate::operations::query::Aabb;

/// Tolerance on `|last - first| - 2*pi` for a full circle.
pub const FULL_CIRCLE_TOLERANCE: f64 = 1e-6;

/// Curve family of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveCategory {
    Line,
    Circle,
    Ellipse,
    Hyperbola,
    Parabola,
    Bezier,
    Bspline,
    Other,
}

/// Surface family of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceCategory {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    Bspline,
    Bezier,
    Revolution,
    Extrusion,
    Offset,
    Other,
}

impl CurveCategory {
    #[must_use]
    pub fn of(curve: &EdgeCurve) -> Self {
        match curve {
            EdgeCurve::Line(_) => Self::Line,
            EdgeCurve::Circle(_) => Self::Circle,
            EdgeCurve::Ellipse(_) => Self::Ellipse,
            EdgeCurve::Hyperbola(_) => Self::Hyperbola,
            EdgeCurve::Parabola(_) => Self::Parabola,
            EdgeCurve::Bezier(_) => Self::Bezier,
            EdgeCurve::BSpline(_) => Self::Bspline,
            EdgeCurve::Offset(_) => Self::Other,
        }
    }
}

impl SurfaceCategory {
    #[must_use]
    pub fn of(surface: &FaceSurface) -> Self {
        match surface {
            FaceSurface::Plane(_) => Self::Plane,
            FaceSurface::Cylinder(_) => Self::Cylinder,
            FaceSurface::Cone(_) => Self::Cone,
            FaceSurface::Sphere(_) => Self::Sphere,
            FaceSurface::Torus(_) => Self::Torus,
            FaceSurface::BSpline(_) => Self::Bspline,
            FaceSurface::Bezier(_) => Self::Bezier,
            FaceSurface::Revolution(_) => Self::Revolution,
            FaceSurface::Extrusion(_) => Self::Extrusion,
            FaceSurface::Offset(_) => Self::Offset,
        }
    }
}

/// Category-specific curve parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CurveParams {
    Line {
        origin: [f64; 3],
        direction: [f64; 3],
    },
    Circle {
        center: [f64; 3],
        axis: [f64; 3],
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        is_full_circle: bool,
    },
    Ellipse {
        center: [f64; 3],
        axis: [f64; 3],
        major_direction: [f64; 3],
        major_radius: f64,
        minor_radius: f64,
    },
    Hyperbola {
        center: [f64; 3],
        axis: [f64; 3],
        major_radius: f64,
        minor_radius: f64,
    },
    Parabola {
        apex: [f64; 3],
        axis: [f64; 3],
        symmetry_direction: [f64; 3],
        focal_length: f64,
    },
    Bezier {
        degree: usize,
        control_points: Vec<[f64; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<f64>>,
        is_rational: bool,
    },
    Bspline {
        degree: usize,
        control_points: Vec<[f64; 3]>,
        knots: Vec<f64>,
        multiplicities: Vec<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<f64>>,
        is_rational: bool,
        is_periodic: bool,
    },
    /// Offset curves, described by their basis.
    Other {
        basis_type: CurveCategory,
        offset_distance: f64,
    },
}

impl CurveParams {
    /// Extracts parameters for an edge trimmed to `[first, last]`.
    #[must_use]
    pub fn extract(curve: &EdgeCurve, first: f64, last: f64) -> Self {
        match curve {
            EdgeCurve::Line(l) => Self::Line {
                origin: point_array(l.origin()),
                direction: vector_array(l.direction()),
            },
            EdgeCurve::Circle(c) => Self::Circle {
                center: point_array(c.center()),
                axis: vector_array(c.axis()),
                radius: c.radius(),
                start_angle: first.to_degrees(),
                end_angle: last.to_degrees(),
                is_full_circle: ((last - first).abs() - TAU).abs() < FULL_CIRCLE_TOLERANCE,
            },
            EdgeCurve::Ellipse(e) => Self::Ellipse {
                center: point_array(e.center()),
                axis: vector_array(e.axis()),
                major_direction: vector_array(e.major_dir()),
                major_radius: e.major_radius(),
                minor_radius: e.minor_radius(),
            },
            EdgeCurve::Hyperbola(h) => Self::Hyperbola {
                center: point_array(h.center()),
                axis: vector_array(h.axis()),
                major_radius: h.major_radius(),
                minor_radius: h.minor_radius(),
            },
            EdgeCurve::Parabola(p) => Self::Parabola {
                apex: point_array(p.apex()),
                axis: vector_array(p.axis()),
                symmetry_direction: vector_array(p.axis_dir()),
                focal_length: p.focal(),
            },
            EdgeCurve::Bezier(b) => Self::Bezier {
                degree: b.degree(),
                control_points: b.poles().iter().map(point_array).collect(),
                weights: b.weights().map(<[f64]>::to_vec),
                is_rational: b.is_rational(),
            },
            EdgeCurve::BSpline(b) => Self::Bspline {
                degree: b.degree(),
                control_points: b.poles().iter().map(point_array).collect(),
                knots: b.knots().to_vec(),
                multiplicities: b.multiplicities().to_vec(),
                weights: b.weights().map(<[f64]>::to_vec),
                is_rational: b.is_rational(),
                is_periodic: b.is_periodic(),
            },
            EdgeCurve::Offset(o) => Self::Other {
                basis_type: CurveCategory::of(o.basis()),
                offset_distance: o.distance(),
            },
        }
    }

    /// `true` if every numeric field is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Line { origin, direction } => all_finite(origin) && all_finite(direction),
            Self::Circle {
                center,
                axis,
                radius,
                start_angle,
                end_angle,
                ..
            } => {
                all_finite(center)
                    && all_finite(axis)
                    && all_finite(&[*radius, *start_angle, *end_angle])
            }
            Self::Ellipse {
                center,
                axis,
                major_direction,
                major_radius,
                minor_radius,
            } => {
                all_finite(center)
                    && all_finite(axis)
                    && all_finite(major_direction)
                    && all_finite(&[*major_radius, *minor_radius])
            }
            Self::Hyperbola {
                center,
                axis,
                major_radius,
                minor_radius,
            } => all_finite(center) && all_finite(axis) && all_finite(&[*major_radius, *minor_radius]),
            Self::Parabola {
                apex,
                axis,
                symmetry_direction,
                focal_length,
            } => {
                all_finite(apex)
                    && all_finite(axis)
                    && all_finite(symmetry_direction)
                    && focal_length.is_finite()
            }
            Self::Bezier {
                control_points,
                weights,
                ..
            } => points_finite(control_points) && weights.as_deref().map_or(true, all_finite),
            Self::Bspline {
                control_points,
                knots,
                weights,
                ..
            } => {
                points_finite(control_points)
                    && all_finite(knots)
                    && weights.as_deref().map_or(true, all_finite)
            }
            Self::Other {
                offset_distance, ..
            } => offset_distance.is_finite(),
        }
    }
}

/// Category-specific surface parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurfaceParams {
    Plane {
        origin: [f64; 3],
        normal: [f64; 3],
        x_axis: [f64; 3],
        y_axis: [f64; 3],
    },
    Cylinder {
        origin: [f64; 3],
        axis: [f64; 3],
        radius: f64,
    },
    Cone {
        apex: [f64; 3],
        axis: [f64; 3],
        ref_radius: f64,
        semi_angle: f64,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Torus {
        center: [f64; 3],
        axis: [f64; 3],
        major_radius: f64,
        minor_radius: f64,
    },
    Bspline {
        u_degree: usize,
        v_degree: usize,
        control_points: Vec<Vec<[f64; 3]>>,
        u_knots: Vec<f64>,
        v_knots: Vec<f64>,
        u_multiplicities: Vec<usize>,
        v_multiplicities: Vec<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<Vec<f64>>>,
        u_periodic: bool,
        v_periodic: bool,
        is_rational: bool,
    },
    Bezier {
        u_degree: usize,
        v_degree: usize,
        control_points: Vec<Vec<[f64; 3]>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<Vec<f64>>>,
        is_rational: bool,
    },
    Revolution {
        origin: [f64; 3],
        axis: [f64; 3],
        basis_type: CurveCategory,
    },
    Extrusion {
        direction: [f64; 3],
        basis_type: CurveCategory,
    },
    Offset {
        basis_type: SurfaceCategory,
        distance: f64,
    },
}

impl SurfaceParams {
    #[must_use]
    pub fn extract(surface: &FaceSurface) -> Self {
        match surface {
            FaceSurface::Plane(p) => Self::Plane {
                origin: point_array(p.origin()),
                normal: vector_array(p.plane_normal()),
                x_axis: vector_array(p.x_dir()),
                y_axis: vector_array(&p.y_dir()),
            },
            FaceSurface::Cylinder(c) => Self::Cylinder {
                origin: point_array(c.origin()),
                axis: vector_array(c.axis()),
                radius: c.radius(),
            },
            FaceSurface::Cone(c) => Self::Cone {
                apex: point_array(&c.apex()),
                axis: vector_array(c.axis()),
                ref_radius: c.ref_radius(),
                semi_angle: c.semi_angle().to_degrees(),
            },
            FaceSurface::Sphere(s) => Self::Sphere {
                center: point_array(s.center()),
                radius: s.radius(),
            },
            FaceSurface::Torus(t) => Self::Torus {
                center: point_array(t.center()),
                axis: vector_array(t.axis()),
                major_radius: t.major_radius(),
                minor_radius: t.minor_radius(),
            },
            FaceSurface::BSpline(b) => Self::Bspline {
                u_degree: b.u_spec().degree,
                v_degree: b.v_spec().degree,
                control_points: grid(b.poles()),
                u_knots: b.u_spec().knots.clone(),
                v_knots: b.v_spec().knots.clone(),
                u_multiplicities: b.u_spec().multiplicities.clone(),
                v_multiplicities: b.v_spec().multiplicities.clone(),
                weights: b.weights().map(<[Vec<f64>]>::to_vec),
                u_periodic: b.u_spec().periodic,
                v_periodic: b.v_spec().periodic,
                is_rational: b.is_rational(),
            },
            FaceSurface::Bezier(b) => Self::Bezier {
                u_degree: b.u_degree(),
                v_degree: b.v_degree(),
                control_points: grid(b.poles()),
                weights: b.weights().map(<[Vec<f64>]>::to_vec),
                is_rational: b.is_rational(),
            },
            FaceSurface::Revolution(r) => Self::Revolution {
                origin: point_array(r.origin()),
                axis: vector_array(r.axis()),
                basis_type: CurveCategory::of(r.basis()),
            },
            FaceSurface::Extrusion(e) => Self::Extrusion {
                direction: vector_array(e.direction()),
                basis_type: CurveCategory::of(e.basis()),
            },
            FaceSurface::Offset(o) => Self::Offset {
                basis_type: SurfaceCategory::of(o.basis()),
                distance: o.distance(),
            },
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Plane {
                origin,
                normal,
                x_axis,
                y_axis,
            } => all_finite(origin) && all_finite(normal) && all_finite(x_axis) && all_finite(y_axis),
            Self::Cylinder {
                origin,
                axis,
                radius,
            } => all_finite(origin) && all_finite(axis) && radius.is_finite(),
            Self::Cone {
                apex,
                axis,
                ref_radius,
                semi_angle,
            } => all_finite(apex) && all_finite(axis) && all_finite(&[*ref_radius, *semi_angle]),
            Self::Sphere { center, radius } => all_finite(center) && radius.is_finite(),
            Self::Torus {
                center,
                axis,
                major_radius,
                minor_radius,
            } => all_finite(center) && all_finite(axis) && all_finite(&[*major_radius, *minor_radius]),
            Self::Bspline {
                control_points,
                u_knots,
                v_knots,
                weights,
                ..
            } => {
                control_points.iter().all(|row| points_finite(row))
                    && all_finite(u_knots)
                    && all_finite(v_knots)
                    && weights
                        .as_ref()
                        .map_or(true, |w| w.iter().all(|row| all_finite(row)))
            }
            Self::Bezier {
                control_points,
                weights,
                ..
            } => {
                control_points.iter().all(|row| points_finite(row))
                    && weights
                        .as_ref()
                        .map_or(true, |w| w.iter().all(|row| all_finite(row)))
            }
            Self::Revolution { origin, axis, .. } => all_finite(origin) && all_finite(axis),
            Self::Extrusion { direction, .. } => all_finite(direction),
            Self::Offset { distance, .. } => distance.is_finite(),
        }
    }

    /// The plane normal, if these are plane parameters.
    #[must_use]
    pub fn plane_normal(&self) -> Option<[f64; 3]> {
        match self {
            Self::Plane { normal, .. } => Some(*normal),
            _ => None,
        }
    }
}

fn points_finite(points: &[[f64; 3]]) -> bool {
    points.iter().all(|p| all_finite(p))
}

fn grid(poles: &[Vec<Point3>]) -> Vec<Vec<[f64; 3]>> {
    poles
        .iter()
        .map(|row| row.iter().map(point_array).collect())
        .collect()
}

/// An axis-aligned box with its derived measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxDescriptor {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub center: [f64; 3],
    pub size: [f64; 3],
    pub diagonal: f64,
}

impl BoundingBoxDescriptor {
    /// The all-zero box reported for a shape with no bounded geometry.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            min: [0.0; 3],
            max: [0.0; 3],
            center: [0.0; 3],
            size: [0.0; 3],
            diagonal: 0.0,
        }
    }
}

impl From<Aabb> for BoundingBoxDescriptor {
    fn from(b: Aabb) -> Self {
        Self {
            min: point_array(&b.min),
            max: point_array(&b.max),
            center: point_array(&b.center()),
            size: vector_array(&b.size()),
            diagonal: b.diagonal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexDescriptor {
    pub id: usize,
    pub key: EntityKey,
    pub point: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub id: usize,
    pub key: EntityKey,
    pub curve_type: CurveCategory,
    /// `None` when the parameters could not be extracted.
    pub params: Option<CurveParams>,
    pub first_parameter: f64,
    pub last_parameter: f64,
    pub start_point: [f64; 3],
    pub end_point: [f64; 3],
    pub midpoint: [f64; 3],
    /// Endpoint vertex ids; one entry for a closed edge.
    pub vertices: Vec<usize>,
    pub length: f64,
    pub is_closed: bool,
    pub is_degenerated: bool,
    pub is_seam: bool,
    /// `false` when more than two faces share the edge.
    pub is_manifold: bool,
    /// Curvature at the parameter midpoint.
    pub curvature: Option<f64>,
    pub bbox: BoundingBoxDescriptor,
    pub adjacent_faces: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRange {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDescriptor {
    pub id: usize,
    pub key: EntityKey,
    pub surface_type: SurfaceCategory,
    pub params: Option<SurfaceParams>,
    /// Outer loop edge ids in wire order. A seam edge appears twice.
    pub outer_edges: Vec<usize>,
    pub inner_edges: Vec<Vec<usize>>,
    pub area: f64,
    pub centroid: Option<[f64; 3]>,
    /// Unit surface normal at the center of the UV range, not flipped for a
    /// reversed face.
    pub normal: Option<[f64; 3]>,
    pub uv_range: UvRange,
    pub orientation: Orientation,
    pub bbox: Option<BoundingBoxDescriptor>,
}
