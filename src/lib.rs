/*!
planecut
========

**planecut** is a planar polygon geometry kernel for interactive 3D surface
modeling tools. It aligns triangle data to 2D working planes, reconstructs
closed boundary loops from triangle soups and plane sections, performs 2D
polygon boolean algebra with holes, flood-fills coplanar mesh regions,
splits picked faces against the rest of a scene, and resolves cursor
snapping to nearby geometric features.

The kernel is synchronous and latency-bounded: it is meant to run inside
pointer-move handlers, so unbounded-cost operations are cut off by hard
triangle/piece ceilings and return "no result" instead of degrading frame
time.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(unused_results)] // TODO: deny this
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod plane;
pub mod query;
pub mod scene;
pub mod shape;
pub mod transformation;
pub mod utils;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type used throughout this crate.
    pub use f64 as Real;

    pub use na::{Isometry3, Point2, Point3, UnitQuaternion, UnitVector3, Vector2, Vector3};

    /// The 3D point type.
    pub use Point3 as Point;

    /// The 3D vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The transformation positioning a mesh in the world.
    pub use Isometry3 as Isometry;

    /// The rotation type.
    pub type Rotation = UnitQuaternion<Real>;

    /// The default tolerance used for degeneracy checks.
    pub const DEFAULT_EPSILON: Real = 1.0e-10;
}
