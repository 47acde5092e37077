//! Boundary reconstruction and polygon algebra in plane frames.

pub use self::boolean::BooleanOp;
pub use self::boundary_loops::{boundary_loops_2d, mesh_boundary_loops, TraceTolerances};
pub use self::overlay::OverlayPartition;
pub use self::plane_section::plane_section_loops;

pub mod boolean;
mod boundary_loops;
mod overlay;
mod plane_section;
