//! Incremental planar subdivision ("map overlay") of polygons sharing one
//! working level.
//!
//! Where face splitting subtracts many cutters from one surface, the overlay
//! keeps *every* overlapping area as its own piece: folding a polygon into
//! the partition replaces each existing piece by `piece − new` and
//! `piece ∩ new`, and whatever stays unclaimed of the new polygon becomes a
//! piece of its own. Used for splitting floors when shapes are drawn over
//! them. The caller decides which polygons share a level (typically by a key
//! derived from world height) — the partition itself is purely 2D.

use crate::shape::{MultiPolygon, Polygon, RingTolerances};
use crate::transformation::boolean::{self, BooleanOp};

/// An incrementally built minimal disjoint piece set.
pub struct OverlayPartition {
    pieces: Vec<Polygon>,
    tol: RingTolerances,
}

impl OverlayPartition {
    /// Creates an empty partition.
    pub fn new(tol: RingTolerances) -> Self {
        OverlayPartition {
            pieces: Vec::new(),
            tol,
        }
    }

    /// The current disjoint pieces.
    #[inline]
    pub fn pieces(&self) -> &[Polygon] {
        &self.pieces
    }

    /// Consumes the partition, returning its pieces.
    #[inline]
    pub fn into_pieces(self) -> Vec<Polygon> {
        self.pieces
    }

    /// Folds `polygon` into the subdivision.
    pub fn insert(&mut self, polygon: Polygon) {
        let mut remainder = MultiPolygon::single(polygon).normalize(&self.tol);
        let existing = std::mem::take(&mut self.pieces);
        let mut next = Vec::new();

        for piece in existing {
            if remainder.is_empty() {
                next.push(piece);
                continue;
            }

            let piece_multi = MultiPolygon::single(piece.clone());
            let shared = boolean::apply(
                BooleanOp::Intersection,
                &piece_multi,
                std::slice::from_ref(&remainder),
                &self.tol,
            );
            if shared.is_empty() {
                next.push(piece);
                continue;
            }

            let kept = boolean::apply(
                BooleanOp::Difference,
                &piece_multi,
                std::slice::from_ref(&remainder),
                &self.tol,
            );
            remainder = boolean::apply(
                BooleanOp::Difference,
                &remainder,
                std::slice::from_ref(&piece_multi),
                &self.tol,
            );

            next.extend(kept.into_polygons());
            next.extend(shared.into_polygons());
        }

        // Whatever no existing piece claimed.
        next.extend(remainder.into_polygons());
        self.pieces = next;
    }

    /// Partitions a whole polygon set at once.
    pub fn partition(
        polygons: impl IntoIterator<Item = Polygon>,
        tol: RingTolerances,
    ) -> Vec<Polygon> {
        let mut overlay = OverlayPartition::new(tol);
        for polygon in polygons {
            overlay.insert(polygon);
        }
        overlay.into_pieces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Real;
    use crate::shape::Ring;
    use na::Point2;

    fn square(min: Real, max: Real) -> Polygon {
        Polygon::new(
            Ring::new(vec![
                Point2::new(min, min),
                Point2::new(max, min),
                Point2::new(max, max),
                Point2::new(min, max),
            ]),
            Vec::new(),
        )
    }

    #[test]
    fn two_overlapping_squares_make_three_pieces() {
        let pieces = OverlayPartition::partition(
            [square(0.0, 4.0), square(2.0, 6.0)],
            RingTolerances::default(),
        );

        assert_eq!(pieces.len(), 3);

        let mut areas: Vec<Real> = pieces.iter().map(Polygon::area).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(areas[0], 4.0, epsilon = 1.0e-6);
        assert_relative_eq!(areas[1], 12.0, epsilon = 1.0e-6);
        assert_relative_eq!(areas[2], 12.0, epsilon = 1.0e-6);
    }

    #[test]
    fn disjoint_polygons_stay_whole() {
        let pieces = OverlayPartition::partition(
            [square(0.0, 1.0), square(5.0, 7.0)],
            RingTolerances::default(),
        );

        assert_eq!(pieces.len(), 2);
        let total: Real = pieces.iter().map(Polygon::area).sum();
        assert_relative_eq!(total, 1.0 + 4.0, epsilon = 1.0e-6);
    }

    #[test]
    fn identical_polygons_collapse_to_one_piece() {
        let pieces = OverlayPartition::partition(
            [square(0.0, 3.0), square(0.0, 3.0)],
            RingTolerances::default(),
        );

        assert_eq!(pieces.len(), 1);
        assert_relative_eq!(pieces[0].area(), 9.0, epsilon = 1.0e-6);
    }

    #[test]
    fn contained_polygon_carves_a_piece_with_a_hole() {
        let pieces = OverlayPartition::partition(
            [square(0.0, 10.0), square(3.0, 5.0)],
            RingTolerances::default(),
        );

        assert_eq!(pieces.len(), 2);
        let total: Real = pieces.iter().map(Polygon::area).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1.0e-6);
        assert!(pieces.iter().any(|p| !p.holes().is_empty()));
    }
}
