use crate::math::Real;
use crate::plane::{PlaneBasis, PlaneKey};
use crate::shape::Polygon;
use na::Point3;

/// One independently editable planar sub-region: the output unit of face
/// splitting.
///
/// A region is immutable once produced. It carries the polygon in the plane
/// frame it was computed in, that frame itself, and the world-space centroid.
/// Triangulating the polygon into renderable geometry is the caller's
/// responsibility.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Region {
    polygon: Polygon,
    basis: PlaneBasis,
    centroid: Point3<Real>,
}

impl Region {
    /// Builds a region from a normalized polygon and the basis it lives in.
    pub fn new(polygon: Polygon, basis: PlaneBasis) -> Region {
        let centroid = basis.plane_to_world(&polygon.centroid());
        Region {
            polygon,
            basis,
            centroid,
        }
    }

    /// The region's polygon, in the plane frame.
    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The plane frame the polygon was computed in.
    #[inline]
    pub fn basis(&self) -> &PlaneBasis {
        &self.basis
    }

    /// The world-space centroid of the region.
    #[inline]
    pub fn centroid(&self) -> &Point3<Real> {
        &self.centroid
    }

    /// The region's area.
    #[inline]
    pub fn area(&self) -> Real {
        self.polygon.area()
    }

    /// The canonical key of the region's plane, for grouping regions lying on
    /// one plane.
    #[inline]
    pub fn plane_key(&self) -> PlaneKey {
        PlaneKey::of_basis(&self.basis)
    }
}
