use crate::bounding_volume::Aabb2;
use crate::math::Real;
use crate::utils::point_in_poly2d;
use na::{Point2, Vector2};

/// Tolerances applied when normalizing rings and polygons.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingTolerances {
    /// Coordinates are snapped onto a decimal grid of roughly this size, and
    /// vertices collapsing onto one grid point are merged.
    pub snap_epsilon: Real,
    /// Rings whose |signed area| does not exceed this are degenerate and dropped.
    pub area_epsilon: Real,
}

impl Default for RingTolerances {
    fn default() -> Self {
        Self {
            snap_epsilon: 1.0e-5,
            area_epsilon: 1.0e-8,
        }
    }
}

impl RingTolerances {
    /// These tolerances with the area epsilon replaced.
    pub fn with_area_epsilon(mut self, area_epsilon: Real) -> Self {
        self.area_epsilon = area_epsilon;
        self
    }
}

/// Snaps a coordinate onto the decimal grid derived from `eps`.
///
/// Values with magnitude below `eps` collapse to zero; everything else is
/// rounded at the decimal precision of `eps`. Snapping an already snapped
/// value is a no-op, which makes ring normalization idempotent.
pub fn snap_coord(value: Real, eps: Real) -> Real {
    if value.abs() < eps {
        return 0.0;
    }
    let precision = Real::powi(10.0, eps.log10().round() as i32);
    (value / precision).round() * precision
}

/// A closed 2D point loop in a plane's local frame.
///
/// The loop is implicitly closed: the last point connects back to the first,
/// and the closing duplicate is not stored. The sign of [`Ring::signed_area`]
/// (shoelace formula) encodes the winding: positive is counter-clockwise.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ring {
    points: Vec<Point2<Real>>,
}

impl Ring {
    /// Creates a ring from an ordered point loop.
    ///
    /// The input may be open or explicitly closed, and may contain duplicate
    /// or degenerate runs; [`Ring::normalize`] cleans all of that up.
    pub fn new(points: Vec<Point2<Real>>) -> Self {
        Ring { points }
    }

    /// The points of this ring, without the closing duplicate.
    #[inline]
    pub fn points(&self) -> &[Point2<Real>] {
        &self.points
    }

    /// The number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this ring hold no points at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The signed area of this ring (shoelace formula).
    ///
    /// Positive for counter-clockwise winding.
    pub fn signed_area(&self) -> Real {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut acc = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            acc += p.x * q.y - q.x * p.y;
        }
        acc * 0.5
    }

    /// Is this ring wound counter-clockwise?
    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverses the winding of this ring in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// The bounding rectangle of this ring.
    pub fn aabb(&self) -> Aabb2 {
        Aabb2::from_points(&self.points)
    }

    /// Does this ring contain `pt`?
    ///
    /// Points exactly on the boundary may be classified either way.
    #[inline]
    pub fn contains_point(&self, pt: &Point2<Real>) -> bool {
        point_in_poly2d(pt, &self.points)
    }

    /// Does this ring enclose `other`?
    ///
    /// Decided by majority vote over `other`'s vertices, so rings sharing a
    /// few boundary vertices with this one are still classified sensibly.
    pub fn encloses(&self, other: &Ring) -> bool {
        if other.points.is_empty() {
            return false;
        }

        let inside = other
            .points
            .iter()
            .filter(|pt| self.contains_point(pt))
            .count();
        inside * 2 > other.points.len()
    }

    /// The signed area and the (area-weighted) centroid accumulation terms of
    /// this ring: `(area, Σ (p_i + p_{i+1}) * cross_i / 6)`.
    ///
    /// Summing the terms of a polygon's rings (holes wound opposite to the
    /// outer) and dividing by the summed signed area yields the polygon
    /// centroid.
    pub(crate) fn area_centroid_terms(&self) -> (Real, Vector2<Real>) {
        let n = self.points.len();
        if n < 3 {
            return (0.0, Vector2::zeros());
        }

        let mut area = 0.0;
        let mut terms = Vector2::zeros();
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let cross = p.x * q.y - q.x * p.y;
            area += cross;
            terms += (p.coords + q.coords) * cross;
        }

        (area * 0.5, terms / 6.0)
    }

    /// Numeric cleanup of this ring.
    ///
    /// Strips a redundant closing duplicate, snaps all coordinates onto the
    /// `snap_epsilon` grid, collapses consecutive duplicates (including
    /// around the implicit closure), and rejects the result if fewer than 3
    /// distinct vertices remain or its |signed area| does not exceed
    /// `area_epsilon`. Normalizing a normalized ring returns it unchanged.
    pub fn normalize(&self, tol: &RingTolerances) -> Option<Ring> {
        let mut pts: Vec<Point2<Real>> = self
            .points
            .iter()
            .map(|p| Point2::new(snap_coord(p.x, tol.snap_epsilon), snap_coord(p.y, tol.snap_epsilon)))
            .collect();

        // Collapse consecutive duplicates, then the closing duplicate(s).
        pts.dedup();
        while pts.len() > 1 && pts.first() == pts.last() {
            let _ = pts.pop();
        }

        if pts.len() < 3 {
            return None;
        }

        let ring = Ring { points: pts };
        if ring.signed_area().abs() <= tol.area_epsilon {
            return None;
        }

        Some(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: Real) -> Ring {
        Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ])
    }

    #[test]
    fn signed_area_encodes_winding() {
        let sq = square(2.0);
        assert_relative_eq!(sq.signed_area(), 4.0);
        assert!(sq.is_ccw());

        let mut rev = sq.clone();
        rev.reverse();
        assert_relative_eq!(rev.signed_area(), -4.0);
    }

    #[test]
    fn normalize_cleans_duplicates_and_closure() {
        let tol = RingTolerances::default();
        let ring = Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0 + 1.0e-7, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ]);

        let normalized = ring.normalize(&tol).unwrap();
        assert_eq!(normalized.len(), 4);
        assert_relative_eq!(normalized.signed_area(), 1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn normalize_is_idempotent() {
        let tol = RingTolerances::default();
        let ring = Ring::new(vec![
            Point2::new(0.1234567, 0.0),
            Point2::new(2.0000004, 0.2),
            Point2::new(1.0, 2.9999996),
        ]);

        let once = ring.normalize(&tol).unwrap();
        let twice = once.normalize(&tol).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_rejects_degenerate_rings() {
        let tol = RingTolerances::default();

        // Collinear sliver.
        let sliver = Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert_eq!(sliver.normalize(&tol), None);

        // Fewer than 3 distinct vertices.
        let needle = Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
        ]);
        assert_eq!(needle.normalize(&tol), None);
    }

    #[test]
    fn enclosure_votes_on_vertices() {
        let outer = square(10.0);
        let inner = Ring::new(vec![
            Point2::new(2.0, 2.0),
            Point2::new(4.0, 2.0),
            Point2::new(4.0, 4.0),
            Point2::new(2.0, 4.0),
        ]);

        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
    }
}
