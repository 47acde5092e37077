use crate::math::Real;
use na::{Point2, Point3};

#[inline]
fn quantize(value: Real, eps: Real) -> i64 {
    (value / eps).round() as i64
}

/// Integer key identifying a 2D point on an epsilon grid.
///
/// Two points closer than roughly one grid cell collapse onto the same key,
/// which is how near-duplicate vertices of unwelded triangle soups are merged
/// into a single identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridKey2(i64, i64);

impl GridKey2 {
    /// Quantizes `pt` onto a grid with cells of size `eps`.
    pub fn new(pt: &Point2<Real>, eps: Real) -> Self {
        GridKey2(quantize(pt.x, eps), quantize(pt.y, eps))
    }
}

/// Integer key identifying a 3D point on an epsilon grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridKey3(i64, i64, i64);

impl GridKey3 {
    /// Quantizes `pt` onto a grid with cells of size `eps`.
    pub fn new(pt: &Point3<Real>, eps: Real) -> Self {
        GridKey3(
            quantize(pt.x, eps),
            quantize(pt.y, eps),
            quantize(pt.z, eps),
        )
    }
}
