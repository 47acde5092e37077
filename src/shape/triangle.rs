use crate::math::{Real, DEFAULT_EPSILON};
use na::{Isometry3, Point3, Unit, UnitVector3, Vector3};

/// A triangle defined by three ordered 3D points.
///
/// The ordering defines the triangle's normal by the right-hand rule.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// The triangle's first point.
    pub a: Point3<Real>,
    /// The triangle's second point.
    pub b: Point3<Real>,
    /// The triangle's third point.
    pub c: Point3<Real>,
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Self {
        Triangle { a, b, c }
    }

    /// The three vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point3<Real>; 3] {
        [self.a, self.b, self.c]
    }

    /// The non-normalized normal of this triangle.
    #[inline]
    pub fn scaled_normal(&self) -> Vector3<Real> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// The unit normal of this triangle, or `None` if it is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector3<Real>> {
        Unit::try_new(self.scaled_normal(), DEFAULT_EPSILON)
    }

    /// The center of this triangle.
    #[inline]
    pub fn center(&self) -> Point3<Real> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// This triangle transformed by `m`.
    #[inline]
    pub fn transformed(&self, m: &Isometry3<Real>) -> Triangle {
        Triangle::new(m * self.a, m * self.b, m * self.c)
    }

    /// This triangle with its winding (and thus its normal) reversed.
    #[inline]
    pub fn reversed(&self) -> Triangle {
        Triangle::new(self.a, self.c, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_follows_right_hand_rule() {
        let tri = Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(tri.normal().unwrap().into_inner(), Vector3::z());
        assert_relative_eq!(
            tri.reversed().normal().unwrap().into_inner(),
            -Vector3::z()
        );

        let degenerate = Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(degenerate.normal().is_none());
    }
}
