//! Axis-aligned bounding boxes used for cheap early rejection.

pub use self::aabb::{Aabb, Aabb2};

mod aabb;
