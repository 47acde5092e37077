use crate::math::Real;
use na::Point3;
use std::f64::consts::TAU;

/// Exact construction metadata of a primitive drawn shape.
///
/// When available, metadata is preferred over boundary derivation from raw
/// triangles: parameters are exact while derived outlines carry
/// reconstruction error. Callers are responsible for keeping metadata and
/// geometry synchronized.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum FootprintMeta {
    /// A rectangle drawn on a horizontal plane.
    Rect {
        /// World-space center of the rectangle.
        center: Point3<Real>,
        /// Extent along world X.
        width: Real,
        /// Extent along world Z.
        length: Real,
    },
    /// A circle drawn on a horizontal plane, approximated by chords.
    Circle {
        /// World-space center of the circle.
        center: Point3<Real>,
        /// The circle radius.
        radius: Real,
        /// Number of chord segments of the drawn approximation.
        segments: u32,
    },
    /// An arbitrary planar outline given by its vertices.
    Polygon {
        /// The world-space outline vertices, in order.
        vertices: Vec<Point3<Real>>,
    },
}

impl FootprintMeta {
    /// The world-space outline of this footprint, as an implicitly closed loop.
    pub fn outline(&self) -> Vec<Point3<Real>> {
        match self {
            FootprintMeta::Rect {
                center,
                width,
                length,
            } => {
                let hw = width * 0.5;
                let hl = length * 0.5;
                vec![
                    Point3::new(center.x - hw, center.y, center.z - hl),
                    Point3::new(center.x + hw, center.y, center.z - hl),
                    Point3::new(center.x + hw, center.y, center.z + hl),
                    Point3::new(center.x - hw, center.y, center.z + hl),
                ]
            }
            FootprintMeta::Circle {
                center,
                radius,
                segments,
            } => {
                let segments = (*segments).max(3);
                (0..segments)
                    .map(|i| {
                        let angle = TAU * i as Real / segments as Real;
                        Point3::new(
                            center.x + radius * angle.cos(),
                            center.y,
                            center.z + radius * angle.sin(),
                        )
                    })
                    .collect()
            }
            FootprintMeta::Polygon { vertices } => vertices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_match_their_parameters() {
        let rect = FootprintMeta::Rect {
            center: Point3::new(1.0, 2.0, 3.0),
            width: 4.0,
            length: 2.0,
        };
        let outline = rect.outline();
        assert_eq!(outline.len(), 4);
        assert!(outline.iter().all(|p| p.y == 2.0));
        assert!(outline.contains(&Point3::new(-1.0, 2.0, 2.0)));
        assert!(outline.contains(&Point3::new(3.0, 2.0, 4.0)));

        let circle = FootprintMeta::Circle {
            center: Point3::origin(),
            radius: 2.0,
            segments: 16,
        };
        let outline = circle.outline();
        assert_eq!(outline.len(), 16);
        for pt in &outline {
            assert_relative_eq!(pt.coords.norm(), 2.0, epsilon = 1.0e-12);
        }

        // Degenerate segment counts are clamped to a triangle.
        let tiny = FootprintMeta::Circle {
            center: Point3::origin(),
            radius: 1.0,
            segments: 0,
        };
        assert_eq!(tiny.outline().len(), 3);
    }
}
