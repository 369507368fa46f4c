use crate::error::Result;
use crate::geometry::FaceSurface;
use crate::math::{Point3, Vector3};
use crate::topology::{EdgeId, FaceId, ShellId, SolidId, TopologyStore};

/// Number of sub-intervals sampled along an edge.
const EDGE_SAMPLES: u32 = 32;

/// Number of sub-intervals per direction sampled over a curved face.
const FACE_SAMPLES: u32 = 16;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a degenerate box around one point.
    #[must_use]
    pub fn from_point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    /// Returns the smallest box containing all points, or `None` if empty.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::from_point(first);
        for p in iter {
            aabb.include(&p);
        }
        Some(aabb)
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Returns the smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }
}

/// The entity whose bounds are computed.
#[derive(Debug, Clone, Copy)]
pub enum BoundsTarget {
    Edge(EdgeId),
    Face(FaceId),
    Shell(ShellId),
    Solid(SolidId),
}

/// Computes the axis-aligned bounding box of an entity.
///
/// Edges are sampled along their trimmed range; curved faces additionally
/// sample a grid over their UV bounds. The result can be slightly smaller
/// than the exact box for strongly curved geometry.
pub struct BoundingBox {
    target: BoundsTarget,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(target: BoundsTarget) -> Self {
        Self { target }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing or geometry cannot be
    /// evaluated.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        match self.target {
            BoundsTarget::Edge(e) => edge_bounds(store, e),
            BoundsTarget::Face(f) => face_bounds(store, f),
            BoundsTarget::Shell(s) => shell_bounds(store, s),
            BoundsTarget::Solid(s) => {
                let solid = store.solid(s)?;
                let mut aabb = shell_bounds(store, solid.outer_shell)?;
                for inner in &solid.inner_shells {
                    aabb = aabb.union(&shell_bounds(store, *inner)?);
                }
                Ok(aabb)
            }
        }
    }
}

fn edge_bounds(store: &TopologyStore, id: EdgeId) -> Result<Aabb> {
    let edge = store.edge(id)?;
    let start = store.vertex(edge.start)?.point;
    let mut aabb = Aabb::from_point(start);
    aabb.include(&store.vertex(edge.end)?.point);
    if edge.degenerate {
        return Ok(aabb);
    }
    let curve = edge.curve.as_curve();
    let step = (edge.t_end - edge.t_start) / f64::from(EDGE_SAMPLES);
    for i in 0..=EDGE_SAMPLES {
        aabb.include(&curve.evaluate(edge.t_start + step * f64::from(i))?);
    }
    Ok(aabb)
}

fn face_bounds(store: &TopologyStore, id: FaceId) -> Result<Aabb> {
    let face = store.face(id)?;
    let mut aabb: Option<Aabb> = None;
    for wire in std::iter::once(&face.outer_wire).chain(&face.inner_wires) {
        for oe in &store.wire(*wire)?.edges {
            let eb = edge_bounds(store, oe.edge)?;
            aabb = Some(aabb.map_or(eb, |a| a.union(&eb)));
        }
    }

    let uv = face.uv_bounds;
    if !matches!(face.surface, FaceSurface::Plane(_)) && uv.is_bounded() {
        let surface = face.surface.as_surface();
        let du = (uv.u_max - uv.u_min) / f64::from(FACE_SAMPLES);
        let dv = (uv.v_max - uv.v_min) / f64::from(FACE_SAMPLES);
        for i in 0..=FACE_SAMPLES {
            for j in 0..=FACE_SAMPLES {
                let p = surface.evaluate(
                    uv.u_min + du * f64::from(i),
                    uv.v_min + dv * f64::from(j),
                )?;
                match aabb.as_mut() {
                    Some(a) => a.include(&p),
                    None => aabb = Some(Aabb::from_point(p)),
                }
            }
        }
    }

    aabb.ok_or_else(|| {
        crate::error::TopologyError::InvalidTopology("face has no boundary or bounds".into())
            .into()
    })
}

fn shell_bounds(store: &TopologyStore, id: ShellId) -> Result<Aabb> {
    let shell = store.shell(id)?;
    let mut aabb: Option<Aabb> = None;
    for face in &shell.faces {
        let fb = face_bounds(store, *face)?;
        aabb = Some(aabb.map_or(fb, |a| a.union(&fb)));
    }
    aabb.ok_or_else(|| {
        crate::error::TopologyError::InvalidTopology("shell has no faces".into()).into()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{MakeBox, MakeCylinder};
    use approx::assert_relative_eq;

    #[test]
    fn box_bounds() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(Point3::new(-1.0, 0.0, 2.0), Point3::new(3.0, 4.0, 5.0))
            .execute(&mut store)
            .unwrap();

        let aabb = BoundingBox::new(BoundsTarget::Solid(solid))
            .execute(&store)
            .unwrap();
        assert_relative_eq!(aabb.min, Point3::new(-1.0, 0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(aabb.max, Point3::new(3.0, 4.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(aabb.diagonal(), (16.0_f64 + 16.0 + 9.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(aabb.center(), Point3::new(1.0, 2.0, 3.5), epsilon = 1e-12);
    }

    #[test]
    fn cylinder_bounds_cover_full_circle() {
        let mut store = TopologyStore::new();
        let solid = MakeCylinder::new(Point3::origin(), 2.0, Vector3::z(), 5.0)
            .execute(&mut store)
            .unwrap();

        let aabb = BoundingBox::new(BoundsTarget::Solid(solid))
            .execute(&store)
            .unwrap();
        assert_relative_eq!(aabb.min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.z, 5.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.min.x, -2.0, epsilon = 1e-9);
        assert!(aabb.max.y > 1.99);
    }

    #[test]
    fn union_and_from_points() {
        assert!(Aabb::from_points(Vec::new()).is_none());
        let a = Aabb::from_points([Point3::origin(), Point3::new(1.0, -1.0, 0.0)]).unwrap();
        let b = Aabb::from_point(Point3::new(0.0, 0.0, 3.0));
        let u = a.union(&b);
        assert_relative_eq!(u.size(), Vector3::new(1.0, 1.0, 3.0));
    }
}
