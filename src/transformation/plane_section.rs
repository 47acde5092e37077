//! Silhouette of a mesh cut by a plane.
//!
//! Every triangle straddling the plane contributes exactly one 2D segment
//! (its edges clipped against the plane); the accumulated segments form an
//! edge graph that the shared loop walk turns into the mesh's closed
//! silhouette ring(s) on that plane. Unlike triangle-set tracing there is no
//! interior-edge concept here: every accumulated segment counts as boundary.

use crate::math::Real;
use crate::plane::PlaneBasis;
use crate::shape::{Ring, TriMeshData};
use crate::transformation::boundary_loops::{walk_loops, PointInterner, TraceTolerances};
use crate::utils::hashmap::HashSet;
use crate::utils::SortedPair;
use arrayvec::ArrayVec;

/// Closed 2D silhouette loops of `mesh` on the plane of `basis`.
///
/// Triangles entirely on one side of the plane (within the plane epsilon)
/// are skipped; an edge endpoint lying on the plane contributes itself. The
/// reconstructed loops are normalized; unusable ones are silently dropped.
pub fn plane_section_loops(
    mesh: &TriMeshData,
    basis: &PlaneBasis,
    tol: &TraceTolerances,
) -> Vec<Ring> {
    if mesh.num_triangles() > tol.max_triangles {
        log::debug!(
            "plane section rejected: {} triangles exceed the ceiling of {}",
            mesh.num_triangles(),
            tol.max_triangles
        );
        return Vec::new();
    }

    let mut interner = PointInterner::new(tol.merge_epsilon);
    let mut segments: HashSet<SortedPair<u32>> = HashSet::default();

    for i in 0..mesh.num_triangles() as u32 {
        let tri = mesh.world_triangle(i);
        let vertices = tri.vertices();
        let dists = [
            basis.height_of(&vertices[0]),
            basis.height_of(&vertices[1]),
            basis.height_of(&vertices[2]),
        ];

        let has_pos = dists.iter().any(|&d| d > tol.plane_epsilon);
        let has_neg = dists.iter().any(|&d| d < -tol.plane_epsilon);
        if !has_pos || !has_neg {
            // Entirely on one side (within epsilon); coplanar faces are the
            // business of boundary tracing, not of the section.
            continue;
        }

        let mut ids: ArrayVec<u32, 3> = ArrayVec::new();
        for a in 0..3 {
            let b = (a + 1) % 3;
            let (da, db) = (dists[a], dists[b]);
            let on_a = da.abs() <= tol.plane_epsilon;
            let on_b = db.abs() <= tol.plane_epsilon;

            // A vertex on the plane contributes itself (once, through its
            // outgoing edge); a transversal edge contributes its crossing.
            let pt = if on_a {
                Some(vertices[a])
            } else if !on_b && (da > 0.0) != (db > 0.0) {
                let t = da / (da - db);
                Some(vertices[a] + (vertices[b] - vertices[a]) * t)
            } else {
                None
            };

            if let Some(pt) = pt {
                let id = interner.intern(basis.world_to_plane(&pt));
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        match ids.as_slice() {
            [a, b] => {
                let _ = segments.insert(SortedPair::new(*a, *b));
            }
            [_, _, _] => {
                log::debug!("skipping a sliver triangle with 3 distinct section points");
            }
            // 0 or 1 point: the triangle only grazes the plane.
            _ => {}
        }
    }

    let ring_tol = tol.ring_tolerances();
    walk_loops(interner.points(), &segments, tol.max_steps)
        .into_iter()
        .filter_map(|pts| Ring::new(pts).normalize(&ring_tol))
        .collect()
}
