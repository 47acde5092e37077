//! Pick-driven queries against meshes and the scene.

pub use self::coplanar::{coplanar_region, CoplanarRegion, CoplanarTolerances};
pub use self::face_split::{face_region, split_face, FaceSplitConfig};
pub use self::snap::{SnapCandidate, SnapConfig, SnapEdge, SnapIndex, SnapKind};

mod coplanar;
mod face_split;
mod snap;
