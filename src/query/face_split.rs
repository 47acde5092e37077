//! Scene-wide splitting of a picked face into disjoint regions.
//!
//! Every eligible scene object that geometrically interferes with the face's
//! plane becomes a *cutter* polygon — traced from its own coplanar outline,
//! from its plane-intersection silhouette, or from its footprint when it
//! floats above the plane. Folding `(pieces − cutter) ∪ (pieces ∩ cutter)`
//! across all cutters leaves the face partitioned into independently
//! editable regions. Everything is bounded: the whole pass short-circuits to
//! "no split" rather than blowing the frame budget.

use crate::bounding_volume::Aabb2;
use crate::math::Real;
use crate::plane::{PlaneBasis, PlaneKey};
use crate::query::CoplanarRegion;
use crate::scene::SceneObject;
use crate::shape::{MultiPolygon, Region, Ring, RingTolerances, TriMeshData};
use crate::transformation::boolean::{self, BooleanOp};
use crate::transformation::{
    boundary_loops_2d, mesh_boundary_loops, plane_section_loops, TraceTolerances,
};
use na::{Point2, Point3, Vector3};
use ordered_float::OrderedFloat;

/// Parameters governing scene-wide face splitting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceSplitConfig {
    /// Boundary tracing tolerances and ceilings.
    pub trace: TraceTolerances,
    /// Surfaces whose entire height extent stays within this of the plane
    /// count as coplanar cutters.
    pub coplanarity_epsilon: Real,
    /// Bounding-box rejection margin, relative to the face's scale.
    pub bbox_margin: Real,
    /// Hard ceiling on the piece count; exceeding it aborts the split.
    pub max_pieces: usize,
    /// Degenerate-piece area cutoff, relative to the face's bounding-box
    /// area.
    pub area_epsilon_scale: Real,
}

impl Default for FaceSplitConfig {
    fn default() -> Self {
        Self {
            trace: TraceTolerances::default(),
            coplanarity_epsilon: 1.0e-3,
            bbox_margin: 0.01,
            max_pieces: 64,
            area_epsilon_scale: 1.0e-6,
        }
    }
}

/// Splits the picked face of `target` against every other eligible scene
/// object.
///
/// Returns the surviving disjoint regions (all sharing one plane basis), or
/// `None` when nothing usable comes out: no boundary, no cutter producing a
/// division, the piece ceiling exceeded, or fewer than two pieces surviving
/// the area filter. Callers treat `None` as "the edit does not occur".
pub fn split_face(
    scene: &[SceneObject],
    target: &SceneObject,
    region: &CoplanarRegion,
    normal: &Vector3<Real>,
    point_on_face: &Point3<Real>,
    cfg: &FaceSplitConfig,
) -> Option<Vec<Region>> {
    let basis = PlaneBasis::from_normal(normal, *point_on_face, None)?;
    let plane_key = PlaneKey::of_basis(&basis);

    // The face's own boundary polygon(s).
    let rings = boundary_loops_2d(&region.triangles_in(&basis), &cfg.trace);
    let face = MultiPolygon::from_rings(rings, &cfg.trace.ring_tolerances());
    let bbox = face.aabb()?;

    // Scale-proportional tolerances.
    let extents = bbox.extents();
    let scale = extents.x.max(extents.y);
    let area_epsilon = (extents.x * extents.y * cfg.area_epsilon_scale).max(1.0e-12);
    let tol = cfg
        .trace
        .ring_tolerances()
        .with_area_epsilon(area_epsilon);
    let margin = (scale * cfg.bbox_margin).max(cfg.coplanarity_epsilon);

    log::debug!(
        "splitting face on plane {:?} against {} scene objects",
        plane_key,
        scene.len()
    );

    let mut pieces = face.into_polygons();
    let mut divided = false;

    for object in scene {
        if object.id == target.id || !object.is_cutter_candidate(target.root) {
            continue;
        }
        let Some(mesh) = &object.mesh else { continue };

        // Aligned-space bounds of the candidate.
        let mut uv = Aabb2::new_invalid();
        let mut height_min = Real::MAX;
        let mut height_max = -Real::MAX;
        for pt in mesh.world_vertices() {
            uv.take_point(&basis.world_to_plane(&pt));
            let h = basis.height_of(&pt);
            height_min = height_min.min(h);
            height_max = height_max.max(h);
        }

        // Early rejection on the 2D bounds and the height band. Objects
        // entirely below the plane cannot cut it; objects above still can,
        // through their footprint.
        if !uv.grown(margin).intersects(&bbox) || height_max < -margin {
            continue;
        }

        let Some(cutter) = cutter_polygons(object, mesh, &basis, height_min, height_max, &uv, cfg, &tol)
        else {
            continue;
        };
        if cutter.is_empty() {
            continue;
        }

        // Fold the cutter into the running piece set.
        let mut next = Vec::with_capacity(pieces.len() + 1);
        for piece in &pieces {
            let piece_multi = MultiPolygon::single(piece.clone());
            let inter = boolean::apply(
                BooleanOp::Intersection,
                &piece_multi,
                std::slice::from_ref(&cutter),
                &tol,
            );
            if inter.is_empty() {
                next.push(piece.clone());
                continue;
            }

            let diff = boolean::apply(
                BooleanOp::Difference,
                &piece_multi,
                std::slice::from_ref(&cutter),
                &tol,
            );
            if diff.is_empty() {
                // The cutter swallows this piece whole: no division.
                next.extend(inter.into_polygons());
                continue;
            }

            divided = true;
            next.extend(diff.into_polygons());
            next.extend(inter.into_polygons());
        }
        pieces = next;

        if pieces.len() > cfg.max_pieces {
            log::debug!(
                "face split aborted: {} pieces exceed the ceiling of {}",
                pieces.len(),
                cfg.max_pieces
            );
            return None;
        }
    }

    if !divided {
        return None;
    }

    pieces.retain(|p| p.area() > area_epsilon);
    if pieces.len() < 2 {
        return None;
    }

    Some(
        pieces
            .into_iter()
            .map(|p| Region::new(p, basis.clone()))
            .collect(),
    )
}

/// The picked face's own polygon as a single region, with no scene-wide
/// cutting — for callers that just need "this face's polygon".
pub fn face_region(
    region: &CoplanarRegion,
    normal: &Vector3<Real>,
    point_on_face: &Point3<Real>,
    trace: &TraceTolerances,
) -> Option<Region> {
    let basis = PlaneBasis::from_normal(normal, *point_on_face, None)?;
    let rings = boundary_loops_2d(&region.triangles_in(&basis), trace);
    let polygon = MultiPolygon::from_rings(rings, &trace.ring_tolerances())
        .into_polygons()
        .into_iter()
        .max_by_key(|p| OrderedFloat(p.area()))?;

    Some(Region::new(polygon, basis))
}

/// Classifies one surviving candidate into its cutter polygons.
///
/// Priority order: a thin coplanar surface contributes its own traced
/// outline; an object straddling the plane contributes its intersection
/// silhouette; an object entirely above contributes its footprint — exact
/// shape metadata when present, projected bounding-box corners otherwise.
fn cutter_polygons(
    object: &SceneObject,
    mesh: &TriMeshData,
    basis: &PlaneBasis,
    height_min: Real,
    height_max: Real,
    uv: &Aabb2,
    cfg: &FaceSplitConfig,
    tol: &RingTolerances,
) -> Option<MultiPolygon> {
    let eps = cfg.coplanarity_epsilon;

    if height_min.abs() <= eps && height_max.abs() <= eps {
        let rings = mesh_boundary_loops(mesh, basis, &cfg.trace);
        return Some(MultiPolygon::from_rings(rings, tol));
    }

    if height_min < -cfg.trace.plane_epsilon && height_max > cfg.trace.plane_epsilon {
        let rings = plane_section_loops(mesh, basis, &cfg.trace);
        return Some(MultiPolygon::from_rings(rings, tol));
    }

    if height_min >= -eps {
        let ring = match &object.footprint {
            Some(meta) => Ring::new(
                meta.outline()
                    .iter()
                    .map(|pt| basis.world_to_plane(pt))
                    .collect(),
            ),
            None => Ring::new(vec![
                uv.mins,
                Point2::new(uv.maxs.x, uv.mins.y),
                uv.maxs,
                Point2::new(uv.mins.x, uv.maxs.y),
            ]),
        };
        return Some(MultiPolygon::from_rings(vec![ring], tol));
    }

    // Entirely below the plane within tolerance: not a cutter.
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{coplanar_region, CoplanarTolerances};
    use crate::scene::{ObjectFlags, ObjectId};
    use crate::shape::{FootprintMeta, GeometryId};
    use na::Isometry3;

    fn floor_object(id: u64) -> SceneObject {
        let mesh = TriMeshData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 10.0),
                Point3::new(0.0, 0.0, 10.0),
            ],
            vec![[0, 2, 1], [0, 3, 2]],
            Isometry3::identity(),
            GeometryId(id),
        )
        .unwrap();

        SceneObject {
            id: ObjectId(id),
            root: ObjectId(id),
            flags: ObjectFlags::SELECTABLE | ObjectFlags::VISIBLE,
            mesh: Some(mesh),
            footprint: None,
            polylines: Vec::new(),
        }
    }

    fn box_object(id: u64, center: Point3<Real>, half: Vector3<Real>) -> SceneObject {
        let c = center;
        let h = half;
        let vertices = vec![
            Point3::new(c.x - h.x, c.y - h.y, c.z - h.z),
            Point3::new(c.x + h.x, c.y - h.y, c.z - h.z),
            Point3::new(c.x + h.x, c.y + h.y, c.z - h.z),
            Point3::new(c.x - h.x, c.y + h.y, c.z - h.z),
            Point3::new(c.x - h.x, c.y - h.y, c.z + h.z),
            Point3::new(c.x + h.x, c.y - h.y, c.z + h.z),
            Point3::new(c.x + h.x, c.y + h.y, c.z + h.z),
            Point3::new(c.x - h.x, c.y + h.y, c.z + h.z),
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
        let mesh =
            TriMeshData::new(vertices, indices, Isometry3::identity(), GeometryId(id)).unwrap();

        SceneObject {
            id: ObjectId(id),
            root: ObjectId(id),
            flags: ObjectFlags::SELECTABLE | ObjectFlags::VISIBLE,
            mesh: Some(mesh),
            footprint: None,
            polylines: Vec::new(),
        }
    }

    fn picked_floor(floor: &SceneObject) -> CoplanarRegion {
        let mesh = floor.mesh.as_ref().unwrap();
        coplanar_region(mesh, 0, &CoplanarTolerances::default()).unwrap()
    }

    #[test]
    fn contained_cutter_splits_into_two_regions() {
        let floor = floor_object(1);
        let cutter = box_object(2, Point3::new(5.0, 0.0, 5.0), Vector3::new(2.0, 0.5, 2.0));
        let region = picked_floor(&floor);
        let scene = vec![floor.clone(), cutter];

        let regions = split_face(
            &scene,
            &floor,
            &region,
            &Vector3::y(),
            &Point3::new(5.0, 0.0, 5.0),
            &FaceSplitConfig::default(),
        )
        .unwrap();

        assert_eq!(regions.len(), 2);

        let mut areas: Vec<Real> = regions.iter().map(Region::area).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(areas[0], 16.0, epsilon = 1.0e-4);
        assert_relative_eq!(areas[1], 84.0, epsilon = 1.0e-4);
        assert_relative_eq!(areas[0] + areas[1], 100.0, epsilon = 1.0e-4);

        // All regions share one plane.
        assert!(regions
            .iter()
            .all(|r| r.plane_key() == regions[0].plane_key()));
    }

    #[test]
    fn outside_cutter_yields_no_split() {
        let floor = floor_object(1);
        let cutter = box_object(2, Point3::new(30.0, 0.0, 5.0), Vector3::new(2.0, 0.5, 2.0));
        let region = picked_floor(&floor);
        let scene = vec![floor.clone(), cutter];

        assert!(split_face(
            &scene,
            &floor,
            &region,
            &Vector3::y(),
            &Point3::new(5.0, 0.0, 5.0),
            &FaceSplitConfig::default(),
        )
        .is_none());
    }

    #[test]
    fn floating_cutter_uses_its_footprint() {
        let floor = floor_object(1);
        let mut above = box_object(2, Point3::new(5.0, 2.0, 5.0), Vector3::new(1.0, 0.5, 1.0));
        above.footprint = Some(FootprintMeta::Rect {
            center: Point3::new(5.0, 2.0, 5.0),
            width: 2.0,
            length: 2.0,
        });
        let region = picked_floor(&floor);
        let scene = vec![floor.clone(), above];

        let regions = split_face(
            &scene,
            &floor,
            &region,
            &Vector3::y(),
            &Point3::new(5.0, 0.0, 5.0),
            &FaceSplitConfig::default(),
        )
        .unwrap();

        assert_eq!(regions.len(), 2);
        let mut areas: Vec<Real> = regions.iter().map(Region::area).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(areas[0], 4.0, epsilon = 1.0e-4);
        assert_relative_eq!(areas[1], 96.0, epsilon = 1.0e-4);
    }

    #[test]
    fn helpers_and_previews_do_not_cut() {
        let floor = floor_object(1);
        let mut cutter = box_object(2, Point3::new(5.0, 0.0, 5.0), Vector3::new(2.0, 0.5, 2.0));
        cutter.flags |= ObjectFlags::PREVIEW;
        let region = picked_floor(&floor);
        let scene = vec![floor.clone(), cutter];

        assert!(split_face(
            &scene,
            &floor,
            &region,
            &Vector3::y(),
            &Point3::new(5.0, 0.0, 5.0),
            &FaceSplitConfig::default(),
        )
        .is_none());
    }

    #[test]
    fn piece_ceiling_aborts_the_split() {
        let floor = floor_object(1);
        let cutter = box_object(2, Point3::new(5.0, 0.0, 5.0), Vector3::new(2.0, 0.5, 2.0));
        let region = picked_floor(&floor);
        let scene = vec![floor.clone(), cutter];

        let cfg = FaceSplitConfig {
            max_pieces: 1,
            ..FaceSplitConfig::default()
        };
        assert!(split_face(
            &scene,
            &floor,
            &region,
            &Vector3::y(),
            &Point3::new(5.0, 0.0, 5.0),
            &cfg,
        )
        .is_none());
    }

    #[test]
    fn face_region_returns_the_picked_polygon() {
        let floor = floor_object(1);
        let region = picked_floor(&floor);

        let face = face_region(
            &region,
            &Vector3::y(),
            &Point3::new(0.0, 0.0, 0.0),
            &TraceTolerances::default(),
        )
        .unwrap();

        assert_relative_eq!(face.area(), 100.0, epsilon = 1.0e-6);
        assert_relative_eq!(
            *face.centroid(),
            Point3::new(5.0, 0.0, 5.0),
            epsilon = 1.0e-6
        );
    }
}
