use crate::bounding_volume::Aabb2;
use crate::math::Real;
use crate::shape::{Ring, RingTolerances};
use na::Point2;
use ordered_float::OrderedFloat;

/// A polygon with holes: one outer ring plus zero or more hole rings nested
/// inside it.
///
/// After normalization the outer ring is wound counter-clockwise and holes
/// clockwise, and the polygon's [`Polygon::area`] (outer minus holes) exceeds
/// the area epsilon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Polygon {
    outer: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    /// Creates a polygon from an outer ring and its holes.
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Polygon { outer, holes }
    }

    /// The outer boundary ring.
    #[inline]
    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    /// The hole rings.
    #[inline]
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// The area of this polygon: |outer| − Σ|holes|.
    pub fn area(&self) -> Real {
        let outer = self.outer.signed_area().abs();
        let holes: Real = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        outer - holes
    }

    /// The bounding rectangle of the outer ring.
    #[inline]
    pub fn aabb(&self) -> Aabb2 {
        self.outer.aabb()
    }

    /// Does this polygon contain `pt` (inside the outer ring, outside every
    /// hole)?
    pub fn contains_point(&self, pt: &Point2<Real>) -> bool {
        self.outer.contains_point(pt) && !self.holes.iter().any(|h| h.contains_point(pt))
    }

    /// The area-weighted centroid of this polygon.
    ///
    /// Assumes normalized winding (holes opposite to the outer). Falls back
    /// to the outer ring's vertex average when the area is degenerate.
    pub fn centroid(&self) -> Point2<Real> {
        let mut area = 0.0;
        let mut terms = na::Vector2::zeros();

        let (a, t) = self.outer.area_centroid_terms();
        area += a;
        terms += t;
        for hole in &self.holes {
            let (a, t) = hole.area_centroid_terms();
            area += a;
            terms += t;
        }

        if area.abs() > 1.0e-12 {
            Point2::from(terms / area)
        } else {
            let pts = self.outer.points();
            let mut acc = na::Vector2::zeros();
            for pt in pts {
                acc += pt.coords;
            }
            Point2::from(acc / (pts.len().max(1) as Real))
        }
    }

    /// Normalizes every ring of this polygon and reclassifies them.
    ///
    /// Rings are cleaned individually, then the outer ring is chosen by an
    /// explicit containment test: the ring enclosed by no other surviving
    /// ring (largest |area| breaks ties). Rings inside it become holes wound
    /// opposite to it; rings outside it are dropped. Returns `None` when no
    /// outer survives or the remaining area is degenerate.
    pub fn normalize(&self, tol: &RingTolerances) -> Option<Polygon> {
        let rings: Vec<Ring> = std::iter::once(&self.outer)
            .chain(self.holes.iter())
            .filter_map(|r| r.normalize(tol))
            .collect();

        if rings.is_empty() {
            return None;
        }

        let outer_idx = rings
            .iter()
            .enumerate()
            .filter(|(i, r)| {
                !rings
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != *i && other.encloses(r))
            })
            .max_by_key(|(_, r)| OrderedFloat(r.signed_area().abs()))
            .map(|(i, _)| i)
            // Mutual-containment pathologies: fall back to the largest ring.
            .unwrap_or_else(|| {
                rings
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, r)| OrderedFloat(r.signed_area().abs()))
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            });

        let mut outer = rings[outer_idx].clone();
        if !outer.is_ccw() {
            outer.reverse();
        }

        let mut holes = Vec::new();
        for (i, ring) in rings.into_iter().enumerate() {
            if i == outer_idx {
                continue;
            }
            if outer.encloses(&ring) {
                let mut hole = ring;
                if hole.is_ccw() {
                    hole.reverse();
                }
                holes.push(hole);
            } else {
                log::debug!("dropping ring outside the polygon's outer boundary");
            }
        }

        let polygon = Polygon { outer, holes };
        if polygon.area() <= tol.area_epsilon {
            return None;
        }

        Some(polygon)
    }
}

/// A set of polygons, possibly disjoint or nested.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
}

impl MultiPolygon {
    /// Creates a multi-polygon from a set of polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        MultiPolygon { polygons }
    }

    /// A multi-polygon holding a single polygon.
    pub fn single(polygon: Polygon) -> Self {
        MultiPolygon {
            polygons: vec![polygon],
        }
    }

    /// The polygons of this set.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Consumes this set, returning its polygons.
    #[inline]
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Does this set hold no polygon?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// The summed area of all polygons.
    pub fn area(&self) -> Real {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// The bounding rectangle of the whole set, or `None` if it is empty.
    pub fn aabb(&self) -> Option<Aabb2> {
        if self.polygons.is_empty() {
            return None;
        }

        let mut aabb = Aabb2::new_invalid();
        for poly in &self.polygons {
            aabb.merge(&poly.aabb());
        }
        Some(aabb)
    }

    /// Normalizes every polygon of this set, dropping the degenerate ones.
    pub fn normalize(&self, tol: &RingTolerances) -> MultiPolygon {
        MultiPolygon {
            polygons: self
                .polygons
                .iter()
                .filter_map(|p| p.normalize(tol))
                .collect(),
        }
    }

    /// Assembles loose rings into polygons with holes by containment nesting.
    ///
    /// Each ring is normalized, then its nesting depth (the number of other
    /// rings enclosing it) decides its role: even depth rings are outers, odd
    /// depth rings become holes of the innermost enclosing outer. This is how
    /// the loop sets reconstructed by boundary tracing turn into polygons.
    pub fn from_rings(rings: Vec<Ring>, tol: &RingTolerances) -> MultiPolygon {
        let rings: Vec<Ring> = rings.iter().filter_map(|r| r.normalize(tol)).collect();
        if rings.is_empty() {
            return MultiPolygon::default();
        }

        let depths: Vec<usize> = rings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                rings
                    .iter()
                    .enumerate()
                    .filter(|(j, other)| *j != i && other.encloses(r))
                    .count()
            })
            .collect();

        let mut polygons = Vec::new();
        for (i, ring) in rings.iter().enumerate() {
            if depths[i] % 2 != 0 {
                continue;
            }

            let mut outer = ring.clone();
            if !outer.is_ccw() {
                outer.reverse();
            }

            let mut holes = Vec::new();
            for (j, candidate) in rings.iter().enumerate() {
                if depths[j] == depths[i] + 1 && ring.encloses(candidate) {
                    let mut hole = candidate.clone();
                    if hole.is_ccw() {
                        hole.reverse();
                    }
                    holes.push(hole);
                }
            }

            let polygon = Polygon::new(outer, holes);
            if polygon.area() > tol.area_epsilon {
                polygons.push(polygon);
            }
        }

        MultiPolygon { polygons }
    }
}
