//! Alignment of 3D planes to 2D working frames.

pub use self::basis::PlaneBasis;
pub use self::key::PlaneKey;

mod basis;
mod key;
