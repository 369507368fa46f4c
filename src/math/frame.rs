use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, TOLERANCE};

/// A right-handed orthonormal placement.
///
/// `ref_dir` is the local X axis, `binormal = axis x ref_dir` the local Y
/// axis, and `axis` the local Z axis. Every analytic curve and surface in
/// [`crate::geometry`] is positioned by one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    origin: Point3,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Frame {
    /// Creates a frame from an axis and a reference direction.
    ///
    /// Both vectors are normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if either vector is zero-length or the reference
    /// direction is not perpendicular to the axis.
    pub fn new(origin: Point3, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        let axis_len = axis.norm();
        if axis_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if axis.dot(&ref_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            origin,
            axis,
            ref_dir,
        })
    }

    /// Creates a frame from an axis alone, choosing a reference direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is zero-length.
    pub fn from_axis(origin: Point3, axis: Vector3) -> Result<Self> {
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / len;

        let reference = if axis.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let ref_dir = reference - axis * reference.dot(&axis);

        Self::new(origin, axis, ref_dir)
    }

    /// Returns the frame origin.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit axis (local Z).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the unit reference direction (local X).
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    /// Returns `axis x ref_dir` (local Y).
    #[must_use]
    pub fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Maps local coordinates to a world direction.
    #[must_use]
    pub fn direction(&self, x: f64, y: f64, z: f64) -> Vector3 {
        self.ref_dir * x + self.binormal() * y + self.axis * z
    }

    /// Maps local coordinates to a world point.
    #[must_use]
    pub fn point(&self, x: f64, y: f64, z: f64) -> Point3 {
        self.origin + self.direction(x, y, z)
    }

    /// Expresses a world point in local coordinates.
    #[must_use]
    pub fn local(&self, p: &Point3) -> (f64, f64, f64) {
        let d = p - self.origin;
        (
            d.dot(&self.ref_dir),
            d.dot(&self.binormal()),
            d.dot(&self.axis),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn binormal_is_right_handed() {
        let f = Frame::new(Point3::origin(), Vector3::z(), Vector3::x()).unwrap();
        assert_relative_eq!(f.binormal(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn from_axis_picks_perpendicular_reference() {
        let f = Frame::from_axis(Point3::origin(), Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(f.axis().dot(f.ref_dir()).abs() < 1e-12);
        assert_relative_eq!(f.ref_dir().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn local_inverts_point() {
        let f = Frame::new(Point3::new(1.0, 2.0, 3.0), Vector3::y(), Vector3::z()).unwrap();
        let p = f.point(0.5, -2.0, 4.0);
        let (x, y, z) = f.local(&p);
        assert_relative_eq!(x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(y, -2.0, epsilon = 1e-12);
        assert_relative_eq!(z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_skew_reference() {
        let r = Frame::new(Point3::origin(), Vector3::z(), Vector3::new(1.0, 0.0, 1.0));
        assert!(r.is_err());
    }
}
