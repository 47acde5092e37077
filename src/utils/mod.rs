//! Various unsorted geometrical and logical operators.

pub use self::grid::{GridKey2, GridKey3};
pub use self::point_in_poly2d::point_in_poly2d;
pub use self::segment::{closest_point_on_segment, point_segment_distance};
pub use self::sorted_pair::SortedPair;

mod grid;
pub mod hashmap;
mod point_in_poly2d;
mod segment;
mod sorted_pair;
