//! Flood-fill of the coplanar mesh region around a picked triangle.

use crate::math::Real;
use crate::plane::PlaneBasis;
use crate::shape::{Triangle, TriMeshData};
use crate::utils::SortedPair;
use na::{Point2, UnitVector3};
use std::collections::VecDeque;

/// Parameters bounding the coplanar flood-fill.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoplanarTolerances {
    /// Minimum |cos| between a neighbor's normal and the seed normal for the
    /// neighbor to join the region.
    ///
    /// The absolute value deliberately also admits exactly-opposite-facing
    /// triangles: the back face of a thin double-sided panel is the same
    /// logical face.
    pub normal_threshold: Real,
    /// Vertices closer than this are considered the same point when the mesh
    /// has no native vertex sharing.
    pub merge_epsilon: Real,
    /// The flood-fill stops admitting triangles past this ceiling.
    pub max_triangles: usize,
}

impl Default for CoplanarTolerances {
    fn default() -> Self {
        Self {
            normal_threshold: 0.999,
            merge_epsilon: 1.0e-5,
            max_triangles: 20_000,
        }
    }
}

/// The maximal set of mesh triangles reachable from a seed without crossing
/// the normal-similarity threshold: the "face" a user picked.
#[derive(Clone, Debug)]
pub struct CoplanarRegion {
    triangle_ids: Vec<u32>,
    triangles: Vec<Triangle>,
    seed_normal: UnitVector3<Real>,
}

impl CoplanarRegion {
    /// Indices of the region's triangles in the source mesh.
    #[inline]
    pub fn triangle_ids(&self) -> &[u32] {
        &self.triangle_ids
    }

    /// The region's triangles in world space, re-wound so every triangle's
    /// orientation agrees with the seed normal.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The picked triangle's unit normal.
    #[inline]
    pub fn seed_normal(&self) -> &UnitVector3<Real> {
        &self.seed_normal
    }

    /// The region's triangles expressed in the 2D frame of `basis`.
    pub fn triangles_in(&self, basis: &PlaneBasis) -> Vec<[Point2<Real>; 3]> {
        self.triangles
            .iter()
            .map(|tri| {
                [
                    basis.world_to_plane(&tri.a),
                    basis.world_to_plane(&tri.b),
                    basis.world_to_plane(&tri.c),
                ]
            })
            .collect()
    }
}

/// Breadth-first flood-fill of `mesh`'s triangle adjacency from `seed`.
///
/// A neighbor across a shared edge joins the region when the |cos| between
/// its normal and the seed's exceeds the threshold. Edges shared by more
/// than two triangles (non-manifold input) fan out to every neighbor.
/// Returns `None` when the seed index is out of bounds or the seed triangle
/// is degenerate.
pub fn coplanar_region(
    mesh: &TriMeshData,
    seed: u32,
    tol: &CoplanarTolerances,
) -> Option<CoplanarRegion> {
    if seed as usize >= mesh.num_triangles() {
        return None;
    }
    let seed_normal = mesh.world_triangle(seed).normal()?;

    let canonical = mesh.canonical_vertex_ids(tol.merge_epsilon);
    let adjacency = mesh.edge_adjacency(&canonical);

    let mut visited = vec![false; mesh.num_triangles()];
    let mut queue = VecDeque::new();
    let mut admitted = 1usize;
    visited[seed as usize] = true;
    queue.push_back(seed);

    let mut triangle_ids = Vec::new();
    while let Some(t) = queue.pop_front() {
        triangle_ids.push(t);

        let idx = mesh.indices()[t as usize];
        for k in 0..3 {
            let a = canonical[idx[k] as usize];
            let b = canonical[idx[(k + 1) % 3] as usize];
            if a == b {
                continue;
            }
            let Some(neighbors) = adjacency.get(&SortedPair::new(a, b)) else {
                continue;
            };

            for &n in neighbors {
                if n == t || visited[n as usize] {
                    continue;
                }
                if admitted >= tol.max_triangles {
                    log::debug!(
                        "coplanar flood-fill capped at {} triangles",
                        tol.max_triangles
                    );
                    continue;
                }
                let Some(n_normal) = mesh.world_triangle(n).normal() else {
                    continue;
                };
                if seed_normal.dot(&n_normal).abs() > tol.normal_threshold {
                    visited[n as usize] = true;
                    admitted += 1;
                    queue.push_back(n);
                }
            }
        }
    }

    let triangles = triangle_ids
        .iter()
        .map(|&i| {
            let tri = mesh.world_triangle(i);
            match tri.normal() {
                Some(n) if seed_normal.dot(&n) < 0.0 => tri.reversed(),
                _ => tri,
            }
        })
        .collect();

    Some(CoplanarRegion {
        triangle_ids,
        triangles,
        seed_normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::GeometryId;
    use na::{Isometry3, Point3};

    /// A unit cube as 6 faces × 2 triangles over 8 shared vertices.
    fn cube() -> TriMeshData {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let indices = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [1, 2, 6],
            [1, 6, 5],
            [3, 0, 4],
            [3, 4, 7],
        ];
        TriMeshData::new(vertices, indices, Isometry3::identity(), GeometryId(0)).unwrap()
    }

    #[test]
    fn cube_face_flood_fill_stays_on_its_face() {
        let mesh = cube();
        let tol = CoplanarTolerances::default();

        // Seeding on any triangle returns exactly the 2 triangles of that
        // face and none from the adjacent (orthogonal) faces.
        for seed in 0..12u32 {
            let region = coplanar_region(&mesh, seed, &tol).unwrap();
            let mut ids = region.triangle_ids().to_vec();
            ids.sort();

            let face_base = (seed / 2) * 2;
            assert_eq!(ids, vec![face_base, face_base + 1], "seed = {}", seed);
        }
    }

    #[test]
    fn double_sided_panel_admits_its_back_face() {
        // Two coincident triangles with opposite winding.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriMeshData::new(
            vertices,
            vec![[0, 1, 2], [0, 2, 1]],
            Isometry3::identity(),
            GeometryId(0),
        )
        .unwrap();

        let region = coplanar_region(&mesh, 0, &CoplanarTolerances::default()).unwrap();
        assert_eq!(region.triangle_ids().len(), 2);

        // The opposed triangle got re-wound to the seed's orientation.
        for tri in region.triangles() {
            assert!(tri.normal().unwrap().dot(region.seed_normal()) > 0.999);
        }
    }

    #[test]
    fn triangle_ceiling_caps_the_region() {
        // A long flat strip of quads.
        let n = 20usize;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for i in 0..=n {
            vertices.push(Point3::new(i as Real, 0.0, 0.0));
            vertices.push(Point3::new(i as Real, 0.0, 1.0));
        }
        for i in 0..n as u32 {
            let base = i * 2;
            indices.push([base, base + 2, base + 3]);
            indices.push([base, base + 3, base + 1]);
        }
        let mesh =
            TriMeshData::new(vertices, indices, Isometry3::identity(), GeometryId(0)).unwrap();

        let tol = CoplanarTolerances {
            max_triangles: 7,
            ..CoplanarTolerances::default()
        };
        let region = coplanar_region(&mesh, 0, &tol).unwrap();
        assert_eq!(region.triangle_ids().len(), 7);

        let unbounded = coplanar_region(&mesh, 0, &CoplanarTolerances::default()).unwrap();
        assert_eq!(unbounded.triangle_ids().len(), 2 * n);
    }

    #[test]
    fn invalid_seed_is_rejected() {
        let mesh = cube();
        assert!(coplanar_region(&mesh, 99, &CoplanarTolerances::default()).is_none());
    }
}
