use crate::math::Real;
use na::Point2;

/// Tests if the given point is inside an arbitrary closed polygon.
///
/// The polygon is implicitly closed: its first and last points are assumed to
/// be connected by an edge. Points lying exactly on an edge may be classified
/// either way; callers needing a robust answer for boundary points must
/// perturb or vote (see `Ring::encloses`).
pub fn point_in_poly2d(pt: &Point2<Real>, poly: &[Point2<Real>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (pi, pj) = (poly[i], poly[j]);

        if (pi.y > pt.y) != (pj.y > pt.y) {
            let t = (pt.y - pi.y) / (pj.y - pi.y);
            if pt.x < pi.x + t * (pj.x - pi.x) {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}
