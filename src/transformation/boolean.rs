//! Boolean algebra over 2D polygons with holes.
//!
//! The actual sweep-line algebra is delegated to an external backend working
//! on an integer grid. Every operand is normalized on the way in and the
//! result is normalized on the way out, which isolates callers from the
//! backend's sensitivity to near-duplicate and collinear points.

use crate::math::Real;
use crate::plane::PlaneBasis;
use crate::shape::{MultiPolygon, Polygon, Ring, RingTolerances};
use na::{Point2, Point3};

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay::{Overlay, ShapeType};
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::i_float::int::point::IntPoint;

/// A boolean operation over polygons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BooleanOp {
    /// The region covered by the subject or any clip.
    Union,
    /// The region covered by the subject but no clip.
    Difference,
    /// The region covered by both the subject and the clips.
    Intersection,
    /// The region covered by exactly one of subject and clips.
    Xor,
}

impl BooleanOp {
    fn overlay_rule(self) -> OverlayRule {
        match self {
            BooleanOp::Union => OverlayRule::Union,
            BooleanOp::Difference => OverlayRule::Difference,
            BooleanOp::Intersection => OverlayRule::Intersect,
            BooleanOp::Xor => OverlayRule::Xor,
        }
    }
}

/// Integer grid steps per world unit fed to the backend.
///
/// Matches the 1e-5 vertex-merge epsilon; the i32 grid then covers roughly
/// ±21 000 world units, far beyond the tool's working envelope.
const INT_GRID_SCALE: Real = 1.0e5;

fn to_int(pt: &Point2<Real>) -> IntPoint {
    let x = (pt.x * INT_GRID_SCALE).round();
    let y = (pt.y * INT_GRID_SCALE).round();
    IntPoint::new(
        x.clamp(i32::MIN as Real, i32::MAX as Real) as i32,
        y.clamp(i32::MIN as Real, i32::MAX as Real) as i32,
    )
}

fn from_int(pt: IntPoint) -> Point2<Real> {
    Point2::new(
        pt.x as Real / INT_GRID_SCALE,
        pt.y as Real / INT_GRID_SCALE,
    )
}

fn num_points(multi: &MultiPolygon) -> usize {
    multi
        .polygons()
        .iter()
        .map(|p| p.outer().len() + p.holes().iter().map(Ring::len).sum::<usize>())
        .sum()
}

fn add_polygon(overlay: &mut Overlay, polygon: &Polygon, shape_type: ShapeType) {
    let contour: Vec<IntPoint> = polygon.outer().points().iter().map(to_int).collect();
    overlay.add_contour(&contour, shape_type);

    for hole in polygon.holes() {
        let contour: Vec<IntPoint> = hole.points().iter().map(to_int).collect();
        overlay.add_contour(&contour, shape_type);
    }
}

/// Applies `op` between `subject` and the (possibly several) `clips`.
///
/// All operands are normalized first; with no clips the normalized subject is
/// returned as-is. The clips collectively act as one clip region: because
/// normalization enforces windings (outers counter-clockwise, holes
/// clockwise), running the backend with a non-zero fill makes mutually
/// overlapping clips behave as their union.
pub fn apply(
    op: BooleanOp,
    subject: &MultiPolygon,
    clips: &[MultiPolygon],
    tol: &RingTolerances,
) -> MultiPolygon {
    let subject = subject.normalize(tol);
    if clips.is_empty() {
        return subject;
    }

    let clips: Vec<MultiPolygon> = clips.iter().map(|c| c.normalize(tol)).collect();
    let capacity = num_points(&subject) + clips.iter().map(num_points).sum::<usize>();
    if capacity == 0 {
        return MultiPolygon::default();
    }

    let mut overlay = Overlay::new(capacity);
    for polygon in subject.polygons() {
        add_polygon(&mut overlay, polygon, ShapeType::Subject);
    }
    for clip in &clips {
        for polygon in clip.polygons() {
            add_polygon(&mut overlay, polygon, ShapeType::Clip);
        }
    }

    let shapes = overlay.overlay(op.overlay_rule(), FillRule::NonZero);

    let mut polygons = Vec::new();
    for shape in shapes {
        let mut rings = shape
            .into_iter()
            .map(|contour| Ring::new(contour.into_iter().map(from_int).collect()));

        // The backend emits each shape as its outer contour followed by holes.
        if let Some(outer) = rings.next() {
            polygons.push(Polygon::new(outer, rings.collect()));
        }
    }

    MultiPolygon::new(polygons).normalize(tol)
}

/// Applies `op` between world-space ring sets lying on the plane of `basis`.
///
/// The rings are projected into the plane frame, combined in 2D, and the
/// result's rings are lifted back onto the plane (outers counter-clockwise,
/// holes clockwise; the winding tells them apart).
pub fn apply_on_plane(
    op: BooleanOp,
    basis: &PlaneBasis,
    subject_world: &[Vec<Point3<Real>>],
    clips_world: &[Vec<Vec<Point3<Real>>>],
    tol: &RingTolerances,
) -> Vec<Vec<Point3<Real>>> {
    let project = |rings: &[Vec<Point3<Real>>]| -> MultiPolygon {
        let rings = rings
            .iter()
            .map(|ring| Ring::new(ring.iter().map(|pt| basis.world_to_plane(pt)).collect()))
            .collect();
        MultiPolygon::from_rings(rings, tol)
    };

    let subject = project(subject_world);
    let clips: Vec<MultiPolygon> = clips_world.iter().map(|rings| project(rings)).collect();
    let result = apply(op, &subject, &clips, tol);

    let lift = |ring: &Ring| -> Vec<Point3<Real>> {
        ring.points().iter().map(|pt| basis.plane_to_world(pt)).collect()
    };

    let mut out = Vec::new();
    for polygon in result.polygons() {
        out.push(lift(polygon.outer()));
        for hole in polygon.holes() {
            out.push(lift(hole));
        }
    }
    out
}
