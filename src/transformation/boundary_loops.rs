//! Reconstruction of closed boundary loops from unordered triangle edges.
//!
//! The shared core quantizes vertices onto an epsilon grid to merge
//! near-duplicates into integer ids, counts how many triangles use each edge
//! (an edge used exactly once is a boundary edge), then walks the boundary
//! edge graph to recover one closed ring per connected boundary component —
//! separating a face's outer boundary from its interior holes.

use crate::math::Real;
use crate::plane::PlaneBasis;
use crate::shape::{Ring, RingTolerances, TriMeshData};
use crate::utils::hashmap::{Entry, HashMap, HashSet};
use crate::utils::{GridKey2, SortedPair};
use na::Point2;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// Tolerances and ceilings for boundary tracing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TraceTolerances {
    /// Vertices closer than this merge into one graph node.
    ///
    /// Screen-space callers should tighten this to sub-pixel scale.
    pub merge_epsilon: Real,
    /// Signed distances within this of zero count as "on the plane".
    pub plane_epsilon: Real,
    /// Area cutoff below which reconstructed loops are degenerate.
    pub area_epsilon: Real,
    /// Triangle sets larger than this are rejected outright, to bound
    /// latency at mouse-move rate.
    pub max_triangles: usize,
    /// Walk budget: loops not closing within this many steps are dropped.
    pub max_steps: usize,
}

impl Default for TraceTolerances {
    fn default() -> Self {
        Self {
            merge_epsilon: 1.0e-5,
            plane_epsilon: 1.0e-4,
            area_epsilon: 1.0e-8,
            max_triangles: 50_000,
            max_steps: 20_000,
        }
    }
}

impl TraceTolerances {
    pub(crate) fn ring_tolerances(&self) -> RingTolerances {
        RingTolerances {
            snap_epsilon: self.merge_epsilon,
            area_epsilon: self.area_epsilon,
        }
    }
}

/// Merges 2D points closer than the grid epsilon into shared integer ids.
pub(crate) struct PointInterner {
    eps: Real,
    ids: HashMap<GridKey2, u32>,
    points: Vec<Point2<Real>>,
}

impl PointInterner {
    pub(crate) fn new(eps: Real) -> Self {
        PointInterner {
            eps,
            ids: HashMap::default(),
            points: Vec::new(),
        }
    }

    /// The id of `pt`; the first point of a grid cell is its representative.
    pub(crate) fn intern(&mut self, pt: Point2<Real>) -> u32 {
        let key = GridKey2::new(&pt, self.eps);
        match self.ids.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.points.len() as u32;
                let _ = entry.insert(id);
                self.points.push(pt);
                id
            }
        }
    }

    pub(crate) fn points(&self) -> &[Point2<Real>] {
        &self.points
    }
}

/// Walks an edge graph, recovering one point loop per closable component.
///
/// Starts are taken in sorted edge order, so the result does not depend on
/// hash iteration order. At every vertex the walk prefers an unvisited edge
/// different from the one just traversed; at genuinely branching vertices
/// (more than two incident edges) it takes the leftmost turn — the candidate
/// with the largest counter-clockwise angle from the incoming direction,
/// equal angles broken by the smaller vertex id. Walks exceeding `max_steps`
/// or running out of edges before closing are dropped.
pub(crate) fn walk_loops(
    points: &[Point2<Real>],
    edges: &HashSet<SortedPair<u32>>,
    max_steps: usize,
) -> Vec<Vec<Point2<Real>>> {
    let mut sorted: Vec<SortedPair<u32>> = edges.iter().copied().collect();
    sorted.sort();

    let mut adjacency: HashMap<u32, SmallVec<[u32; 4]>> = HashMap::default();
    for edge in &sorted {
        adjacency.entry(edge.min()).or_default().push(edge.max());
        adjacency.entry(edge.max()).or_default().push(edge.min());
    }

    let mut visited: HashSet<SortedPair<u32>> = HashSet::default();
    let mut loops = Vec::new();

    for start in &sorted {
        if visited.contains(start) {
            continue;
        }
        let _ = visited.insert(*start);

        let mut path = vec![start.min(), start.max()];
        let mut steps = 0usize;
        let closed = loop {
            let last = path[path.len() - 1];
            if last == path[0] {
                break true;
            }
            if steps >= max_steps {
                break false;
            }
            steps += 1;

            let came_from = path[path.len() - 2];
            match pick_next(points, &adjacency, &visited, came_from, last) {
                Some(next) => {
                    let _ = visited.insert(SortedPair::new(last, next));
                    path.push(next);
                }
                None => break false,
            }
        };

        if !closed {
            log::debug!("dropping a boundary walk that did not close ({} points)", path.len());
            continue;
        }

        let _ = path.pop(); // The closing duplicate.
        if path.len() < 3 {
            continue;
        }
        loops.push(path.into_iter().map(|id| points[id as usize]).collect());
    }

    loops
}

fn pick_next(
    points: &[Point2<Real>],
    adjacency: &HashMap<u32, SmallVec<[u32; 4]>>,
    visited: &HashSet<SortedPair<u32>>,
    came_from: u32,
    current: u32,
) -> Option<u32> {
    let neighbors = adjacency.get(&current)?;
    let mut candidates: SmallVec<[u32; 4]> = neighbors
        .iter()
        .copied()
        .filter(|&n| n != came_from && !visited.contains(&SortedPair::new(current, n)))
        .collect();

    if candidates.len() <= 1 {
        return candidates.pop();
    }

    // Branching vertex: leftmost turn from the incoming direction.
    let incoming = points[current as usize] - points[came_from as usize];
    candidates
        .into_iter()
        .max_by_key(|&n| {
            let outgoing = points[n as usize] - points[current as usize];
            let angle = incoming.perp(&outgoing).atan2(incoming.dot(&outgoing));
            (OrderedFloat(angle), std::cmp::Reverse(n))
        })
}

/// Boundary loops of a triangle set already expressed in one plane frame.
///
/// Every reconstructed loop is normalized before being returned; loops that
/// fail normalization (or never close) are silently dropped.
pub fn boundary_loops_2d(triangles: &[[Point2<Real>; 3]], tol: &TraceTolerances) -> Vec<Ring> {
    if triangles.len() > tol.max_triangles {
        log::debug!(
            "boundary tracing rejected: {} triangles exceed the ceiling of {}",
            triangles.len(),
            tol.max_triangles
        );
        return Vec::new();
    }

    let mut interner = PointInterner::new(tol.merge_epsilon);
    let mut edge_counts: HashMap<SortedPair<u32>, u32> = HashMap::default();

    for tri in triangles {
        let ids = [
            interner.intern(tri[0]),
            interner.intern(tri[1]),
            interner.intern(tri[2]),
        ];

        for k in 0..3 {
            let (a, b) = (ids[k], ids[(k + 1) % 3]);
            if a == b {
                continue;
            }
            *edge_counts.entry(SortedPair::new(a, b)).or_insert(0) += 1;
        }
    }

    let boundary: HashSet<SortedPair<u32>> = edge_counts
        .iter()
        .filter(|(_, count)| **count == 1)
        .map(|(edge, _)| *edge)
        .collect();

    let ring_tol = tol.ring_tolerances();
    walk_loops(interner.points(), &boundary, tol.max_steps)
        .into_iter()
        .filter_map(|pts| Ring::new(pts).normalize(&ring_tol))
        .collect()
}

/// Boundary loops of a whole mesh's triangles, rotated into the frame of
/// `basis`.
pub fn mesh_boundary_loops(
    mesh: &TriMeshData,
    basis: &PlaneBasis,
    tol: &TraceTolerances,
) -> Vec<Ring> {
    if mesh.num_triangles() > tol.max_triangles {
        log::debug!(
            "mesh boundary tracing rejected: {} triangles exceed the ceiling of {}",
            mesh.num_triangles(),
            tol.max_triangles
        );
        return Vec::new();
    }

    let triangles: Vec<[Point2<Real>; 3]> = (0..mesh.num_triangles() as u32)
        .map(|i| {
            let tri = mesh.world_triangle(i);
            [
                basis.world_to_plane(&tri.a),
                basis.world_to_plane(&tri.b),
                basis.world_to_plane(&tri.c),
            ]
        })
        .collect();

    boundary_loops_2d(&triangles, tol)
}
