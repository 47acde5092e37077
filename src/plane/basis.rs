use crate::math::{Real, Rotation, DEFAULT_EPSILON};
use na::{Point2, Point3, Rotation3, Unit, UnitVector3, Vector3};

/// A local 2D coordinate frame on a 3D plane.
///
/// The frame consists of the plane's unit normal, an origin point on the
/// plane, and two orthonormal in-plane axes `u`, `v` with `u × v = normal`
/// (right-handed). All 2D polygon algebra in this crate happens in such a
/// frame: 3D surface work is flattened through [`PlaneBasis::world_to_plane`],
/// processed, then lifted back with [`PlaneBasis::plane_to_world`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PlaneBasis {
    normal: UnitVector3<Real>,
    origin: Point3<Real>,
    u: UnitVector3<Real>,
    v: UnitVector3<Real>,
    rotation: Rotation,
}

impl PlaneBasis {
    /// Builds a basis for the plane with the given `normal` containing `origin`.
    ///
    /// The in-plane axis `v` is picked by projecting, in order: the caller's
    /// `hint`, world-up, world-forward, then world-right onto the plane, and
    /// keeping the first projection that is not degenerate. Returns `None` if
    /// `normal` has (nearly) zero length.
    pub fn from_normal(
        normal: &Vector3<Real>,
        origin: Point3<Real>,
        hint: Option<&Vector3<Real>>,
    ) -> Option<Self> {
        let normal = Unit::try_new(*normal, DEFAULT_EPSILON)?;

        let helpers = [Vector3::y(), -Vector3::z(), Vector3::x()];
        let candidates = hint.copied().into_iter().chain(helpers);

        for helper in candidates {
            let in_plane = helper - *normal * normal.dot(&helper);
            if in_plane.norm_squared() <= DEFAULT_EPSILON {
                continue;
            }

            let v = Unit::new_normalize(in_plane);
            let u = normal.cross(&v);
            if u.norm_squared() <= DEFAULT_EPSILON {
                // Happens only with a non-finite helper; try the next one.
                continue;
            }
            let u = Unit::new_normalize(u);

            let rotation = Rotation::from_rotation_matrix(&Rotation3::from_basis_unchecked(&[
                *u,
                *v,
                *normal,
            ]));

            return Some(PlaneBasis {
                normal,
                origin,
                u,
                v,
                rotation,
            });
        }

        None
    }

    /// The plane's unit normal.
    #[inline]
    pub fn normal(&self) -> &UnitVector3<Real> {
        &self.normal
    }

    /// The origin of the local frame; lies on the plane.
    #[inline]
    pub fn origin(&self) -> &Point3<Real> {
        &self.origin
    }

    /// The first in-plane axis.
    #[inline]
    pub fn u(&self) -> &UnitVector3<Real> {
        &self.u
    }

    /// The second in-plane axis.
    #[inline]
    pub fn v(&self) -> &UnitVector3<Real> {
        &self.v
    }

    /// The rotation mapping the local frame's axes to `(u, v, normal)`.
    ///
    /// Maps the local out-of-plane axis (`+Z`) to the plane normal.
    #[inline]
    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    /// Projects a world point into the plane's 2D frame, dropping its height.
    #[inline]
    pub fn world_to_plane(&self, pt: &Point3<Real>) -> Point2<Real> {
        let d = pt - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// The signed offset of `pt` along the plane normal.
    #[inline]
    pub fn height_of(&self, pt: &Point3<Real>) -> Real {
        (pt - self.origin).dot(&self.normal)
    }

    /// Lifts a 2D point of the plane frame back into world space, on the plane.
    #[inline]
    pub fn plane_to_world(&self, pt: &Point2<Real>) -> Point3<Real> {
        self.origin + *self.u * pt.x + *self.v * pt.y
    }

    /// Lifts a 2D point back into world space at the given height above the plane.
    #[inline]
    pub fn lift(&self, pt: &Point2<Real>, height: Real) -> Point3<Real> {
        self.plane_to_world(pt) + *self.normal * height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_right_handed_orthonormal() {
        let basis = PlaneBasis::from_normal(
            &Vector3::new(1.0, 2.0, -0.5),
            Point3::new(3.0, 0.0, 1.0),
            None,
        )
        .unwrap();

        assert_relative_eq!(basis.u().dot(basis.v()), 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(basis.u().dot(basis.normal()), 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(basis.v().dot(basis.normal()), 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(
            basis.u().cross(basis.v()),
            basis.normal().into_inner(),
            epsilon = 1.0e-12
        );
        assert_relative_eq!(
            basis.rotation() * Vector3::z(),
            basis.normal().into_inner(),
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn world_plane_round_trip() {
        let mut rng = oorandom::Rand64::new(42);
        let mut coord = |scale: Real| (rng.rand_float() - 0.5) * scale;

        for _ in 0..100 {
            let normal = Vector3::new(coord(2.0), coord(2.0), coord(2.0));
            if normal.norm_squared() < 1.0e-6 {
                continue;
            }
            let origin = Point3::new(coord(20.0), coord(20.0), coord(20.0));
            let basis = PlaneBasis::from_normal(&normal, origin, None).unwrap();

            let pt = Point3::new(coord(10.0), coord(10.0), coord(10.0));
            let local = basis.world_to_plane(&pt);
            let height = basis.height_of(&pt);
            let back = basis.lift(&local, height);

            assert_relative_eq!(back, pt, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn degenerate_hint_falls_back_to_world_axes() {
        // Hint parallel to the normal projects to nothing; world-up must be used.
        let normal = Vector3::z();
        let basis =
            PlaneBasis::from_normal(&normal, Point3::origin(), Some(&Vector3::z())).unwrap();
        assert_relative_eq!(basis.v().into_inner(), Vector3::y(), epsilon = 1.0e-12);

        // A vertical plane still gets a frame even though world-up is its normal.
        let basis = PlaneBasis::from_normal(&Vector3::y(), Point3::origin(), None).unwrap();
        assert_relative_eq!(
            basis.normal().into_inner(),
            Vector3::y(),
            epsilon = 1.0e-12
        );
    }
}
