use crate::math::{Real, DEFAULT_EPSILON};
use crate::plane::PlaneBasis;
use na::{Point3, Unit, UnitVector3, Vector3};

/// A canonical, hashable identity of a 3D plane.
///
/// Two physically identical planes produce the same key even when described
/// with flipped normals or different points: the normal's sign is normalized
/// so its first non-negligible component is positive, then the normal and the
/// plane offset are quantized onto fixed grids. Used to group cutters lying
/// on one plane and to recognize "same plane" across picks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaneKey {
    nx: i32,
    ny: i32,
    nz: i32,
    offset: i64,
}

impl PlaneKey {
    /// Grid step for the quantized normal components.
    const NORMAL_STEP: Real = 1.0e-4;
    /// Grid step for the quantized plane offset.
    const OFFSET_STEP: Real = 1.0e-4;

    /// The canonical key of the plane with the given normal containing `point`.
    ///
    /// Returns `None` if `normal` has (nearly) zero length.
    pub fn canonicalize(normal: &Vector3<Real>, point: &Point3<Real>) -> Option<Self> {
        let unit = Unit::try_new(*normal, DEFAULT_EPSILON)?;
        Some(Self::from_unit_normal(&unit, point))
    }

    /// The canonical key of the plane spanned by `basis`.
    pub fn of_basis(basis: &PlaneBasis) -> Self {
        Self::from_unit_normal(basis.normal(), basis.origin())
    }

    fn from_unit_normal(unit: &UnitVector3<Real>, point: &Point3<Real>) -> Self {
        let mut n = unit.into_inner();
        let mut offset = n.dot(&point.coords);

        let flip = if n.x.abs() > Self::NORMAL_STEP {
            n.x < 0.0
        } else if n.y.abs() > Self::NORMAL_STEP {
            n.y < 0.0
        } else {
            n.z < 0.0
        };

        if flip {
            n = -n;
            offset = -offset;
        }

        PlaneKey {
            nx: (n.x / Self::NORMAL_STEP).round() as i32,
            ny: (n.y / Self::NORMAL_STEP).round() as i32,
            nz: (n.z / Self::NORMAL_STEP).round() as i32,
            offset: (offset / Self::OFFSET_STEP).round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_normal_same_key() {
        let a = PlaneKey::canonicalize(&Vector3::new(0.0, 1.0, 0.0), &Point3::new(4.0, 2.0, -1.0))
            .unwrap();
        let b = PlaneKey::canonicalize(&Vector3::new(0.0, -2.0, 0.0), &Point3::new(-7.0, 2.0, 9.0))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn offset_plane_different_key() {
        let a = PlaneKey::canonicalize(&Vector3::y(), &Point3::new(0.0, 2.0, 0.0)).unwrap();
        let b = PlaneKey::canonicalize(&Vector3::y(), &Point3::new(0.0, 2.5, 0.0)).unwrap();
        assert_ne!(a, b);

        assert!(PlaneKey::canonicalize(&Vector3::zeros(), &Point3::origin()).is_none());
    }
}
