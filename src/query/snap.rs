//! Nearest-feature cursor snapping with lock hysteresis.
//!
//! Runs on every pointer move: candidates come from the in-progress drawing
//! points, eligible polyline segments, and memoized mesh feature edges. The
//! resolution is priority-first (endpoint beats midpoint beats on-edge
//! within the radius), distance-second, and equidistant same-point
//! candidates merge their source edges so a shared-vertex junction remembers
//! every incident edge.

use crate::math::Real;
use crate::scene::{ObjectId, SceneObject};
use crate::shape::GeometryId;
use crate::utils::closest_point_on_segment;
use crate::utils::hashmap::{HashMap, HashSet};
use na::Point3;
use smallvec::{smallvec, SmallVec};

/// The kind of geometric feature a snap resolved to, strongest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapKind {
    /// A segment endpoint.
    Endpoint,
    /// A segment midpoint.
    Midpoint,
    /// The nearest point on a segment's interior.
    OnEdge,
}

impl SnapKind {
    fn priority(self) -> u8 {
        match self {
            SnapKind::Endpoint => 2,
            SnapKind::Midpoint => 1,
            SnapKind::OnEdge => 0,
        }
    }

    /// Strong snaps participate in lock hysteresis.
    fn is_strong(self) -> bool {
        !matches!(self, SnapKind::OnEdge)
    }
}

/// One source edge contributing to a snap candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapEdge {
    /// The object the edge belongs to; in-progress drawing points have none.
    pub object: Option<ObjectId>,
    /// The edge's world-space endpoints.
    pub segment: [Point3<Real>; 2],
}

/// A resolved snap.
#[derive(Clone, Debug)]
pub struct SnapCandidate {
    /// The feature kind the cursor snapped to.
    pub kind: SnapKind,
    /// The snapped world-space point.
    pub point: Point3<Real>,
    /// The source edge(s) this point came from; a shared-vertex junction
    /// lists every incident edge.
    pub edges: SmallVec<[SnapEdge; 2]>,
    /// Distance from the query point.
    pub distance: Real,
}

/// Snapping radii and thresholds.
///
/// The index is agnostic of the coordinate space: screen-space callers pass
/// projected segments, a pixel radius, and a tighter merge epsilon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapConfig {
    /// Candidates farther than this from the query point are ignored.
    pub radius: Real,
    /// Two candidate points within this distance are the same point.
    pub merge_epsilon: Real,
    /// How much closer a same-priority candidate must be to replace the
    /// current best.
    pub distance_margin: Real,
    /// |cos| threshold making a mesh edge's dihedral sharp enough to snap to.
    pub edge_angle_cos: Real,
    /// A locked strong snap stays active within `radius ×` this factor.
    pub lock_release_factor: Real,
    /// How much closer a strong rival must be to steal an active lock.
    pub switch_margin: Real,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            radius: 0.25,
            merge_epsilon: 1.0e-5,
            distance_margin: 1.0e-3,
            edge_angle_cos: 0.999,
            lock_release_factor: 2.0,
            switch_margin: 0.05,
        }
    }
}

/// Nearest-feature lookup over the scene.
///
/// Owned per document; its only persistent state is the memoized per-mesh
/// edge extraction, keyed by the stable geometry id plus the angle
/// threshold. Replacing an object's geometry (which changes its id)
/// naturally invalidates the cached entry.
#[derive(Default)]
pub struct SnapIndex {
    edge_cache: HashMap<(GeometryId, u64), Vec<[Point3<Real>; 2]>>,
}

impl SnapIndex {
    /// Creates an index with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached extraction for `id`.
    pub fn invalidate(&mut self, id: GeometryId) {
        self.edge_cache.retain(|(gid, _), _| *gid != id);
    }

    /// Drops the whole cache.
    pub fn clear(&mut self) {
        self.edge_cache.clear();
    }

    /// Resolves the snap nearest to `cursor`.
    ///
    /// Scans `draft_points` (the in-progress drawing), and the polyline
    /// segments and mesh feature edges of every eligible, non-excluded scene
    /// object. Returns `None` when nothing lies within the radius.
    pub fn query(
        &mut self,
        scene: &[SceneObject],
        draft_points: &[Point3<Real>],
        exclude: &HashSet<ObjectId>,
        cursor: &Point3<Real>,
        cfg: &SnapConfig,
    ) -> Option<SnapCandidate> {
        let mut best: Option<SnapCandidate> = None;

        for pt in draft_points {
            consider(
                &mut best,
                SnapCandidate {
                    kind: SnapKind::Endpoint,
                    point: *pt,
                    edges: SmallVec::new(),
                    distance: na::distance(pt, cursor),
                },
                cfg,
            );
        }

        for object in scene {
            if exclude.contains(&object.id) || !object.is_snap_source() {
                continue;
            }

            for segment in &object.polylines {
                consider_segment(&mut best, Some(object.id), segment, cursor, cfg);
            }

            if let Some(mesh) = &object.mesh {
                let key = (mesh.geometry_id(), cfg.edge_angle_cos.to_bits());
                let edges = self
                    .edge_cache
                    .entry(key)
                    .or_insert_with(|| mesh.feature_edges(cfg.merge_epsilon, cfg.edge_angle_cos));

                for segment in edges.iter() {
                    consider_segment(&mut best, Some(object.id), segment, cursor, cfg);
                }
            }
        }

        best
    }

    /// Like [`SnapIndex::query`], with lock hysteresis.
    ///
    /// A previously returned strong (endpoint/midpoint) snap stays active
    /// while the cursor remains within the release radius; only a strong
    /// candidate on a different point beating the lock by the switch margin
    /// steals it. Prevents flicker between close features.
    pub fn query_locked(
        &mut self,
        scene: &[SceneObject],
        draft_points: &[Point3<Real>],
        exclude: &HashSet<ObjectId>,
        cursor: &Point3<Real>,
        lock: &SnapCandidate,
        cfg: &SnapConfig,
    ) -> Option<SnapCandidate> {
        let raw = self.query(scene, draft_points, exclude, cursor, cfg);

        if !lock.kind.is_strong() {
            return raw;
        }
        let lock_distance = na::distance(cursor, &lock.point);
        if lock_distance > cfg.radius * cfg.lock_release_factor {
            return raw;
        }

        match raw {
            Some(candidate)
                if na::distance(&candidate.point, &lock.point) <= cfg.merge_epsilon =>
            {
                // Same feature, refreshed.
                Some(candidate)
            }
            Some(candidate)
                if candidate.kind.is_strong()
                    && candidate.distance + cfg.switch_margin < lock_distance =>
            {
                // A clearly better strong snap steals the lock.
                Some(candidate)
            }
            _ => Some(SnapCandidate {
                distance: lock_distance,
                ..lock.clone()
            }),
        }
    }
}

fn consider_segment(
    best: &mut Option<SnapCandidate>,
    object: Option<ObjectId>,
    segment: &[Point3<Real>; 2],
    cursor: &Point3<Real>,
    cfg: &SnapConfig,
) {
    let edge = SnapEdge {
        object,
        segment: *segment,
    };
    let [a, b] = segment;

    let candidates = [
        (SnapKind::Endpoint, *a),
        (SnapKind::Endpoint, *b),
        (SnapKind::Midpoint, na::center(a, b)),
        (SnapKind::OnEdge, closest_point_on_segment(a, b, cursor)),
    ];

    for (kind, point) in candidates {
        consider(
            best,
            SnapCandidate {
                kind,
                point,
                edges: smallvec![edge.clone()],
                distance: na::distance(&point, cursor),
            },
            cfg,
        );
    }
}

fn consider(best: &mut Option<SnapCandidate>, candidate: SnapCandidate, cfg: &SnapConfig) {
    if candidate.distance > cfg.radius {
        return;
    }

    let Some(current) = best else {
        *best = Some(candidate);
        return;
    };

    if na::distance(&candidate.point, &current.point) <= cfg.merge_epsilon {
        // Same point: remember every incident edge, keep the strongest kind.
        for edge in candidate.edges {
            if !current.edges.contains(&edge) {
                current.edges.push(edge);
            }
        }
        if candidate.kind.priority() > current.kind.priority() {
            current.kind = candidate.kind;
        }
        current.distance = current.distance.min(candidate.distance);
        return;
    }

    let priority = candidate.kind.priority();
    let current_priority = current.kind.priority();
    if priority > current_priority
        || (priority == current_priority
            && candidate.distance + cfg.distance_margin < current.distance)
    {
        *best = Some(candidate);
    }
}
