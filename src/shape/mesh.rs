use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::shape::Triangle;
use crate::utils::hashmap::HashMap;
use crate::utils::{GridKey3, SortedPair};
use na::{Isometry3, Point3};
use smallvec::SmallVec;

/// Stable identity of one geometry buffer generation.
///
/// Callers bump this id whenever they replace an object's geometry; data
/// memoized per geometry (snap feature edges) is keyed by it, so a
/// replacement naturally invalidates the cached entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GeometryId(pub u64);

/// Failure to build a mesh view from caller-provided buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index buffer entry points outside the vertex buffer.
    #[error("vertex index {index} out of bounds (vertex buffer holds {len} points)")]
    IndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// The vertex buffer length.
        len: usize,
    },
    /// The index buffer is empty.
    #[error("the mesh has no triangles")]
    NoTriangles,
}

/// A read-only view over a caller-owned triangle mesh: a vertex buffer, a
/// `[u32; 3]` index buffer, and a world transform.
///
/// The kernel never mutates, triangulates, or disposes meshes; callers own
/// the buffers' lifetime and must keep [`GeometryId`] in sync with geometry
/// replacements.
#[derive(Clone, Debug, PartialEq)]
pub struct TriMeshData {
    vertices: Vec<Point3<Real>>,
    indices: Vec<[u32; 3]>,
    transform: Isometry3<Real>,
    geometry_id: GeometryId,
}

impl TriMeshData {
    /// Builds a mesh view, validating that every index is in bounds.
    pub fn new(
        vertices: Vec<Point3<Real>>,
        indices: Vec<[u32; 3]>,
        transform: Isometry3<Real>,
        geometry_id: GeometryId,
    ) -> Result<Self, MeshError> {
        if indices.is_empty() {
            return Err(MeshError::NoTriangles);
        }

        let len = vertices.len();
        for idx in &indices {
            for &i in idx {
                if i as usize >= len {
                    return Err(MeshError::IndexOutOfBounds { index: i, len });
                }
            }
        }

        Ok(TriMeshData {
            vertices,
            indices,
            transform,
            geometry_id,
        })
    }

    /// The local-space vertex buffer.
    #[inline]
    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    /// The index buffer.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The world transform of this mesh.
    #[inline]
    pub fn transform(&self) -> &Isometry3<Real> {
        &self.transform
    }

    /// The geometry generation id.
    #[inline]
    pub fn geometry_id(&self) -> GeometryId {
        self.geometry_id
    }

    /// The number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The `i`-th triangle, in local space.
    #[inline]
    pub fn local_triangle(&self, i: u32) -> Triangle {
        let idx = self.indices[i as usize];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }

    /// The `i`-th triangle, in world space.
    #[inline]
    pub fn world_triangle(&self, i: u32) -> Triangle {
        self.local_triangle(i).transformed(&self.transform)
    }

    /// The `i`-th vertex, in world space.
    #[inline]
    pub fn world_vertex(&self, i: u32) -> Point3<Real> {
        self.transform * self.vertices[i as usize]
    }

    /// Iterates over all vertices in world space.
    pub fn world_vertices(&self) -> impl Iterator<Item = Point3<Real>> + '_ {
        self.vertices.iter().map(move |pt| self.transform * pt)
    }

    /// The world-space bounding box of this mesh.
    pub fn world_aabb(&self) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for pt in self.world_vertices() {
            aabb.take_point(&pt);
        }
        aabb
    }

    /// Canonical per-vertex ids merging positions closer than `merge_epsilon`.
    ///
    /// Triangle soups without native vertex sharing get a usable adjacency
    /// this way: two vertices quantizing onto the same world-space grid cell
    /// receive the id of the first one encountered.
    pub(crate) fn canonical_vertex_ids(&self, merge_epsilon: Real) -> Vec<u32> {
        let mut first_seen: HashMap<GridKey3, u32> = HashMap::default();
        let mut canonical = Vec::with_capacity(self.vertices.len());

        for (i, pt) in self.world_vertices().enumerate() {
            let key = GridKey3::new(&pt, merge_epsilon);
            let id = *first_seen.entry(key).or_insert(i as u32);
            canonical.push(id);
        }

        canonical
    }

    /// Edge → adjacent-triangle map over canonical vertex ids.
    ///
    /// More than two triangles per edge are kept: non-manifold input is a
    /// fact of life for meshes assembled by drawing tools.
    pub(crate) fn edge_adjacency(
        &self,
        canonical: &[u32],
    ) -> HashMap<SortedPair<u32>, SmallVec<[u32; 2]>> {
        let mut edges: HashMap<SortedPair<u32>, SmallVec<[u32; 2]>> = HashMap::default();

        for (tid, idx) in self.indices.iter().enumerate() {
            for k in 0..3 {
                let a = canonical[idx[k] as usize];
                let b = canonical[idx[(k + 1) % 3] as usize];
                if a == b {
                    continue;
                }
                edges
                    .entry(SortedPair::new(a, b))
                    .or_default()
                    .push(tid as u32);
            }
        }

        edges
    }

    /// World-space feature edges for snapping: free edges, non-manifold
    /// edges, and edges whose two adjacent faces' normals disagree beyond
    /// `angle_cos` (coplanar interior edges are skipped).
    pub fn feature_edges(&self, merge_epsilon: Real, angle_cos: Real) -> Vec<[Point3<Real>; 2]> {
        let canonical = self.canonical_vertex_ids(merge_epsilon);
        let adjacency = self.edge_adjacency(&canonical);

        let mut out = Vec::new();
        for (edge, tris) in &adjacency {
            let keep = match tris.as_slice() {
                [_] => true,
                [t1, t2] => {
                    let n1 = self.world_triangle(*t1).normal();
                    let n2 = self.world_triangle(*t2).normal();
                    match (n1, n2) {
                        (Some(n1), Some(n2)) => n1.dot(&n2).abs() < angle_cos,
                        // A degenerate neighbor makes the edge a border in practice.
                        _ => true,
                    }
                }
                _ => true,
            };

            if keep {
                out.push([self.world_vertex(edge.min()), self.world_vertex(edge.max())]);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_buffers() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(
            TriMeshData::new(
                vertices.clone(),
                vec![[0, 1, 7]],
                Isometry3::identity(),
                GeometryId(0)
            ),
            Err(MeshError::IndexOutOfBounds { index: 7, len: 2 })
        );
        assert_eq!(
            TriMeshData::new(vertices, vec![], Isometry3::identity(), GeometryId(0)),
            Err(MeshError::NoTriangles)
        );
    }

    #[test]
    fn canonical_ids_merge_duplicated_soup_vertices() {
        // Two triangles of a quad, each with its own copy of the shared edge.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriMeshData::new(
            vertices,
            vec![[0, 1, 2], [3, 4, 5]],
            Isometry3::identity(),
            GeometryId(0),
        )
        .unwrap();

        let canonical = mesh.canonical_vertex_ids(1.0e-5);
        assert_eq!(canonical[3], canonical[0]);
        assert_eq!(canonical[4], canonical[2]);
        assert_ne!(canonical[5], canonical[1]);

        // The merged diagonal is now shared by both triangles.
        let adjacency = mesh.edge_adjacency(&canonical);
        let diagonal = adjacency[&SortedPair::new(canonical[0], canonical[2])].clone();
        assert_eq!(diagonal.as_slice(), &[0, 1]);
    }

    #[test]
    fn feature_edges_skip_flat_interiors() {
        // Flat quad: the shared diagonal is interior and coplanar.
        let mesh = TriMeshData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            Isometry3::identity(),
            GeometryId(0),
        )
        .unwrap();

        let edges = mesh.feature_edges(1.0e-5, 0.999);
        // 4 perimeter edges survive; the diagonal does not.
        assert_eq!(edges.len(), 4);
    }
}
