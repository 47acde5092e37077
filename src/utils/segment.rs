use crate::math::Real;
use na::Point3;

/// The point of the segment `[a, b]` closest to `pt`.
pub fn closest_point_on_segment(
    a: &Point3<Real>,
    b: &Point3<Real>,
    pt: &Point3<Real>,
) -> Point3<Real> {
    let ab = b - a;
    let sq_len = ab.norm_squared();

    if sq_len == 0.0 {
        return *a;
    }

    let t = ((pt - a).dot(&ab) / sq_len).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `pt` to the segment `[a, b]`.
pub fn point_segment_distance(a: &Point3<Real>, b: &Point3<Real>, pt: &Point3<Real>) -> Real {
    na::distance(&closest_point_on_segment(a, b, pt), pt)
}
