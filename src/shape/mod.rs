//! Value types produced and consumed by the kernel.

pub use self::footprint::FootprintMeta;
pub use self::mesh::{GeometryId, MeshError, TriMeshData};
pub use self::polygon::{MultiPolygon, Polygon};
pub use self::region::Region;
pub use self::ring::{snap_coord, Ring, RingTolerances};
pub use self::triangle::Triangle;

mod footprint;
mod mesh;
mod polygon;
mod region;
mod ring;
mod triangle;
