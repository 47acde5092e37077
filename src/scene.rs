//! Caller-facing description of scene objects fed to the kernel.

use crate::math::Real;
use crate::shape::{FootprintMeta, TriMeshData};
use na::Point3;

bitflags::bitflags! {
    /// Caller-supplied eligibility tags of a scene object.
    ///
    /// The kernel does not own classification policy: what counts as a
    /// helper, or selectable, is decided by the embedding application and
    /// passed down as these opaque flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        /// The object can be selected (and therefore cut other faces).
        const SELECTABLE = 1 << 0;
        /// The object is currently visible.
        const VISIBLE = 1 << 1;
        /// The object is an editing helper (grids, gizmos, guides).
        const HELPER = 1 << 2;
        /// The object is an uncommitted preview of an in-progress drawing.
        const PREVIEW = 1 << 3;
    }
}

/// Identity of a scene object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ObjectId(pub u64);

/// One scene object as seen by the kernel.
///
/// Only geometry and tags: materials, hierarchy bookkeeping and lifetime stay
/// with the caller.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// The object's identity.
    pub id: ObjectId,
    /// The root of the object's group; a face is never cut by objects
    /// sharing its root.
    pub root: ObjectId,
    /// Eligibility tags.
    pub flags: ObjectFlags,
    /// The object's triangle mesh, if it has one.
    pub mesh: Option<TriMeshData>,
    /// Exact construction metadata of the drawn shape, if known.
    pub footprint: Option<FootprintMeta>,
    /// Drawn line/arc segments (world space), used by snapping.
    pub polylines: Vec<[Point3<Real>; 2]>,
}

impl SceneObject {
    /// Can this object cut a face belonging to `target_root`?
    pub fn is_cutter_candidate(&self, target_root: ObjectId) -> bool {
        self.root != target_root
            && self.mesh.is_some()
            && self.flags.contains(ObjectFlags::SELECTABLE)
            && self.flags.contains(ObjectFlags::VISIBLE)
            && !self.flags.contains(ObjectFlags::HELPER)
            && !self.flags.contains(ObjectFlags::PREVIEW)
    }

    /// Can this object's edges attract the cursor?
    pub fn is_snap_source(&self) -> bool {
        self.flags.contains(ObjectFlags::VISIBLE)
            && !self.flags.contains(ObjectFlags::HELPER)
            && !self.flags.contains(ObjectFlags::PREVIEW)
    }
}
