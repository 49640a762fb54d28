//! Back-face culling by the sign of `view · normal`
//!
//! Normals are oriented away from a fixed scene center, so the test only
//! holds for convex shapes seen from outside.
use nalgebra::{Vector3, Vector4};

use crate::geometry::{Surface, Vertex};

/// Point every outward normal points away from
pub const SCENE_CENTER: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);

/// Tie-break applied when the view vector grazes a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingRule {
    /// Visible iff `view · normal >= 0`
    NonNegative,
    /// Visible iff `view · normal > 0`
    Positive,
}

impl FacingRule {
    /// NaN normals are never visible under either rule.
    pub fn is_visible(self, view: &Vector3<f32>, normal: &Vector3<f32>) -> bool {
        let dot = view.dot(normal);
        match self {
            FacingRule::NonNegative => dot >= 0.0,
            FacingRule::Positive => dot > 0.0,
        }
    }
}

/// Flips `normal` if it points from `anchor` towards `center`.
pub fn orient_outward(
    normal: Vector3<f32>,
    anchor: &Vector3<f32>,
    center: &Vector3<f32>,
) -> Vector3<f32> {
    if (center - anchor).dot(&normal) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Unit normal of a polygon from its first three vertices, `(v0 - v1) × (v2 - v1)`.
///
/// Polygons with fewer than three vertices yield a NaN normal.
pub fn polygon_normal(vertices: &[Vertex], center: &Vector3<f32>) -> Vector3<f32> {
    let [first, middle, last] = match vertices {
        [a, b, c, ..] => [a.xyz(), b.xyz(), c.xyz()],
        _ => return Vector3::from_element(f32::NAN),
    };

    let normal = (first - middle).cross(&(last - middle)).normalize();
    orient_outward(normal, &middle, center)
}

/// Unit normal of a triangle, `(middle - first) × (last - first)`.
///
/// Zero-area triangles yield a NaN normal.
pub fn triangle_normal(
    first: &Vector3<f32>,
    middle: &Vector3<f32>,
    last: &Vector3<f32>,
    center: &Vector3<f32>,
) -> Vector3<f32> {
    let normal = (middle - first).cross(&(last - first)).normalize();
    orient_outward(normal, middle, center)
}

/// Keeps the surfaces facing `view_point` under the inclusive rule.
pub fn cull_surfaces(surfaces: &[Surface], view_point: &Vector4<f32>) -> Vec<Surface> {
    let view = view_point.xyz();
    surfaces
        .iter()
        .filter(|surface| FacingRule::NonNegative.is_visible(&view, &surface.normal(&SCENE_CENTER)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SurfaceKind;

    fn square(z: f32, counter_clockwise: bool) -> Surface {
        let mut vertices = vec![
            Vertex::new(-1.0, -1.0, z),
            Vertex::new(1.0, -1.0, z),
            Vertex::new(1.0, 1.0, z),
            Vertex::new(-1.0, 1.0, z),
        ];
        if !counter_clockwise {
            vertices.reverse();
        }
        Surface::new(SurfaceKind::Base, vertices)
    }

    #[test]
    fn test_normal_points_away_from_center_regardless_of_winding() {
        for winding in [true, false] {
            let top = square(1.0, winding).normal(&SCENE_CENTER);
            assert!((top - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);

            let bottom = square(-1.0, winding).normal(&SCENE_CENTER);
            assert!((bottom - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_facing_rules_differ_only_at_grazing() {
        let view = Vector3::new(1.0, 0.0, 0.0);
        let grazing = Vector3::new(0.0, 1.0, 0.0);
        assert!(FacingRule::NonNegative.is_visible(&view, &grazing));
        assert!(!FacingRule::Positive.is_visible(&view, &grazing));

        let facing = Vector3::new(0.6, 0.8, 0.0);
        assert!(FacingRule::NonNegative.is_visible(&view, &facing));
        assert!(FacingRule::Positive.is_visible(&view, &facing));
        assert!(!FacingRule::NonNegative.is_visible(&view, &-facing));
    }

    #[test]
    fn test_nan_normal_is_hidden() {
        let degenerate = Vector3::new(1.0, 1.0, 1.0);
        let normal = triangle_normal(&degenerate, &degenerate, &degenerate, &SCENE_CENTER);
        assert!(normal.iter().any(|c| c.is_nan()));
        let view = Vector3::new(0.0, 0.0, 1.0);
        assert!(!FacingRule::Positive.is_visible(&view, &normal));
        assert!(!FacingRule::NonNegative.is_visible(&view, &normal));
    }

    #[test]
    fn test_short_polygon_is_culled() {
        let line = Surface::new(
            SurfaceKind::Base,
            vec![Vertex::new(0.0, 0.0, 1.0), Vertex::new(1.0, 0.0, 1.0)],
        );
        let kept = cull_surfaces(&[line], &Vector4::new(0.0, 0.0, 1.0, 1.0));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_triangle_normal_orientation() {
        let first = Vector3::new(1.0, 0.0, 1.0);
        let middle = Vector3::new(0.0, 1.0, 1.0);
        let last = Vector3::new(-1.0, -1.0, 1.0);
        let normal = triangle_normal(&first, &middle, &last, &SCENE_CENTER);
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        let reversed = triangle_normal(&last, &middle, &first, &SCENE_CENTER);
        assert!((reversed - normal).norm() < 1e-6);
    }

    #[test]
    fn test_cull_keeps_surfaces_facing_view() {
        let surfaces = [square(1.0, true), square(-1.0, true)];
        let kept = cull_surfaces(&surfaces, &Vector4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(kept.len(), 1);
        assert!(kept[0].vertices().iter().all(|v| v.xyz().z == 1.0));
    }
}
