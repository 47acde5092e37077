use crate::math::Real;
use na::{Point2, Point3, Vector2, Vector3};

/// An Axis-Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// The minimum of the Aabb.
    pub mins: Point3<Real>,
    /// The maximum of the Aabb.
    pub maxs: Point3<Real>,
}

impl Aabb {
    /// Creates a new Aabb.
    ///
    /// `mins` must be componentwise smaller than `maxs` for the box to be
    /// non-degenerate.
    #[inline]
    pub fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Aabb { mins, maxs }
    }

    /// Creates an invalid Aabb with `mins` componentwise greater than `maxs`.
    ///
    /// Taking any point into it makes it valid; useful as the seed of an
    /// accumulation.
    #[inline]
    pub fn new_invalid() -> Self {
        Aabb {
            mins: Point3::new(Real::MAX, Real::MAX, Real::MAX),
            maxs: Point3::new(-Real::MAX, -Real::MAX, -Real::MAX),
        }
    }

    /// The smallest Aabb containing all the given points.
    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Point3<Real>>) -> Self {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Enlarges this Aabb so it contains `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: &Point3<Real>) {
        self.mins = self.mins.inf(pt);
        self.maxs = self.maxs.sup(pt);
    }

    /// The extents of this Aabb.
    #[inline]
    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }

    /// The center of this Aabb.
    #[inline]
    pub fn center(&self) -> Point3<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// Does this Aabb intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.mins.x <= other.maxs.x
            && self.maxs.x >= other.mins.x
            && self.mins.y <= other.maxs.y
            && self.maxs.y >= other.mins.y
            && self.mins.z <= other.maxs.z
            && self.maxs.z >= other.mins.z
    }

    /// Does this Aabb contain `pt`?
    #[inline]
    pub fn contains_point(&self, pt: &Point3<Real>) -> bool {
        pt.x >= self.mins.x
            && pt.x <= self.maxs.x
            && pt.y >= self.mins.y
            && pt.y <= self.maxs.y
            && pt.z >= self.mins.z
            && pt.z <= self.maxs.z
    }

    /// This Aabb grown by `margin` on every side.
    #[inline]
    pub fn grown(&self, margin: Real) -> Self {
        let m = Vector3::repeat(margin);
        Aabb {
            mins: self.mins - m,
            maxs: self.maxs + m,
        }
    }
}

/// A 2D axis-aligned bounding rectangle in a plane's local frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Aabb2 {
    /// The minimum of the Aabb.
    pub mins: Point2<Real>,
    /// The maximum of the Aabb.
    pub maxs: Point2<Real>,
}

impl Aabb2 {
    /// Creates a new 2D Aabb.
    #[inline]
    pub fn new(mins: Point2<Real>, maxs: Point2<Real>) -> Self {
        Aabb2 { mins, maxs }
    }

    /// Creates an invalid 2D Aabb, to be used as the seed of an accumulation.
    #[inline]
    pub fn new_invalid() -> Self {
        Aabb2 {
            mins: Point2::new(Real::MAX, Real::MAX),
            maxs: Point2::new(-Real::MAX, -Real::MAX),
        }
    }

    /// The smallest 2D Aabb containing all the given points.
    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Point2<Real>>) -> Self {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Enlarges this Aabb so it contains `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: &Point2<Real>) {
        self.mins = self.mins.inf(pt);
        self.maxs = self.maxs.sup(pt);
    }

    /// Merges this Aabb with `other`.
    #[inline]
    pub fn merge(&mut self, other: &Aabb2) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    /// The extents of this Aabb.
    #[inline]
    pub fn extents(&self) -> Vector2<Real> {
        self.maxs - self.mins
    }

    /// Does this Aabb intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.mins.x <= other.maxs.x
            && self.maxs.x >= other.mins.x
            && self.mins.y <= other.maxs.y
            && self.maxs.y >= other.mins.y
    }

    /// This Aabb grown by `margin` on every side.
    #[inline]
    pub fn grown(&self, margin: Real) -> Self {
        let m = Vector2::repeat(margin);
        Aabb2 {
            mins: self.mins - m,
            maxs: self.maxs + m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb2_accumulation_and_overlap() {
        let pts = [
            Point2::new(0.0, 1.0),
            Point2::new(4.0, -2.0),
            Point2::new(2.0, 3.0),
        ];
        let aabb = Aabb2::from_points(&pts);
        assert_eq!(aabb.mins, Point2::new(0.0, -2.0));
        assert_eq!(aabb.maxs, Point2::new(4.0, 3.0));

        let far = Aabb2::new(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0));
        assert!(!aabb.intersects(&far));
        assert!(aabb.grown(1.5).intersects(&far));
    }
}
