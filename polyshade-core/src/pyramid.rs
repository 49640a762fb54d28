//! Truncated regular pyramid built from quadrilateral faces and two base rings
use log::debug;
use nalgebra::{Matrix4, Vector4};
use std::f32::consts::TAU;

use crate::error::{self, Result, ShapeError};
use crate::geometry::{Surface, SurfaceKind, Vertex};
use crate::visibility;

/// Truncated pyramid around the Z axis, base at `z = 0`, top at `z = height`.
///
/// Surfaces are generated once in local coordinates: `faces_count` side faces
/// first, then the bottom and the top base.
#[derive(Debug, Clone)]
pub struct Pyramid {
    faces_count: usize,
    base_radius: f32,
    top_radius: f32,
    height: f32,
    surfaces: Vec<Surface>,
}

impl Pyramid {
    pub fn new(faces_count: usize, base_radius: f32, top_radius: f32, height: f32) -> Self {
        let phi = TAU / faces_count as f32;
        let ring_vertex = |radius: f32, z: f32, i: usize| {
            let angle = i as f32 * phi;
            Vertex::new(radius * angle.cos(), radius * angle.sin(), z)
        };

        let mut surfaces = Vec::with_capacity(faces_count + 2);
        for i in 0..faces_count {
            surfaces.push(Surface::new(
                SurfaceKind::Face,
                vec![
                    ring_vertex(base_radius, 0.0, i),
                    ring_vertex(top_radius, height, i),
                    ring_vertex(top_radius, height, i + 1),
                    ring_vertex(base_radius, 0.0, i + 1),
                ],
            ));
        }

        let base = |radius: f32, z: f32| {
            let ring = (0..faces_count).map(|i| ring_vertex(radius, z, i)).collect();
            Surface::new(SurfaceKind::Base, ring)
        };
        surfaces.push(base(base_radius, 0.0));
        surfaces.push(base(top_radius, height));

        Self {
            faces_count,
            base_radius,
            top_radius,
            height,
            surfaces,
        }
    }

    /// Rejects parameters that would produce NaN or degenerate surfaces.
    pub fn validate(
        faces_count: usize,
        base_radius: f32,
        top_radius: f32,
        height: f32,
    ) -> Result<()> {
        if faces_count < 3 {
            return Err(ShapeError::TooFewSegments {
                shape: "pyramid",
                what: "faces",
                min: 3,
                actual: faces_count,
            });
        }
        error::positive("pyramid", "base radius", base_radius)?;
        error::positive("pyramid", "top radius", top_radius)?;
        error::positive("pyramid", "height", height)
    }

    pub fn faces_count(&self) -> usize {
        self.faces_count
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn top_radius(&self) -> f32 {
        self.top_radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Local-space surfaces
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Total number of vertices over all surfaces
    pub fn vertices_count(&self) -> usize {
        self.surfaces.iter().map(Surface::vertices_count).sum()
    }

    /// Transforms by `rotate_and_shift`, drops surfaces facing away from
    /// `view_point`, then transforms the rest by `proj_move_scale`.
    pub fn generate_vertices(
        &self,
        view_point: &Vector4<f32>,
        rotate_and_shift: &Matrix4<f32>,
        proj_move_scale: &Matrix4<f32>,
    ) -> Vec<Surface> {
        let world = Self::apply_matrix(&self.surfaces, rotate_and_shift);
        let visible = visibility::cull_surfaces(&world, view_point);
        debug!("pyramid: {} of {} surfaces visible", visible.len(), world.len());
        Self::apply_matrix(&visible, proj_move_scale)
    }

    fn apply_matrix(surfaces: &[Surface], matrix: &Matrix4<f32>) -> Vec<Surface> {
        surfaces.iter().map(|surface| surface.apply_matrix(matrix)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{RotationState, Transform};
    use crate::visibility::{FacingRule, SCENE_CENTER};

    fn octagonal() -> Pyramid {
        Pyramid::new(8, 0.6, 0.3, 0.9)
    }

    #[test]
    fn test_vertices_count() {
        for faces in 3..12 {
            let pyramid = Pyramid::new(faces, 1.0, 0.5, 1.0);
            assert_eq!(pyramid.vertices_count(), faces * 4 + faces * 2);
        }
        assert_eq!(octagonal().vertices_count(), 48);
    }

    #[test]
    fn test_surface_layout() {
        let pyramid = octagonal();
        let surfaces = pyramid.surfaces();
        assert_eq!(surfaces.len(), 10);
        assert!(surfaces[..8]
            .iter()
            .all(|s| s.kind() == SurfaceKind::Face && s.vertices_count() == 4));

        let bottom = &surfaces[8];
        let top = &surfaces[9];
        assert_eq!(bottom.kind(), SurfaceKind::Base);
        assert_eq!(top.kind(), SurfaceKind::Base);
        for vertex in bottom.vertices() {
            assert_eq!(vertex.xyz().z, 0.0);
            assert!((vertex.xyz().xy().norm() - 0.6).abs() < 1e-6);
        }
        for vertex in top.vertices() {
            assert_eq!(vertex.xyz().z, 0.9);
            assert!((vertex.xyz().xy().norm() - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn test_faces_share_edges() {
        let pyramid = octagonal();
        let faces = &pyramid.surfaces()[..8];
        for (i, face) in faces.iter().enumerate() {
            let next = &faces[(i + 1) % faces.len()];
            let edge = face.vertices()[3].xyz() - next.vertices()[0].xyz();
            assert!(edge.norm() < 1e-5);
        }
    }

    #[test]
    fn test_view_from_top() {
        let pyramid = octagonal();
        let identity = Matrix4::identity();
        let view = Vector4::new(0.0, 0.0, 1.0, 1.0);
        let visible = pyramid.generate_vertices(&view, &identity, &identity);

        assert_eq!(visible.len(), 9);
        let faces = visible.iter().filter(|s| s.kind() == SurfaceKind::Face).count();
        assert_eq!(faces, 8);
        let bases: Vec<&Surface> = visible
            .iter()
            .filter(|s| s.kind() == SurfaceKind::Base)
            .collect();
        assert_eq!(bases.len(), 1);
        assert!(bases[0].vertices().iter().all(|v| v.xyz().z == 0.9));
    }

    #[test]
    fn test_view_from_below() {
        let pyramid = octagonal();
        let identity = Matrix4::identity();
        let view = Vector4::new(0.0, 0.0, -1.0, 1.0);
        let visible = pyramid.generate_vertices(&view, &identity, &identity);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind(), SurfaceKind::Base);
        assert!(visible[0].vertices().iter().all(|v| v.xyz().z == 0.0));
    }

    #[test]
    fn test_opposite_views_split_surfaces() {
        let pyramid = octagonal();
        let rotation = RotationState::new(0.3, 0.7, 0.2);
        let rotate_and_shift = Transform::rotate_and_shift(&rotation, pyramid.height());
        let identity = Matrix4::identity();
        let view = Vector4::new(0.3, 0.5, 0.8, 1.0);
        let opposite = Vector4::new(-0.3, -0.5, -0.8, 1.0);

        let front = pyramid.generate_vertices(&view, &rotate_and_shift, &identity);
        let back = pyramid.generate_vertices(&opposite, &rotate_and_shift, &identity);
        assert_eq!(front.len() + back.len(), pyramid.surfaces().len());

        for surface in pyramid.surfaces() {
            let normal = surface.apply_matrix(&rotate_and_shift).normal(&SCENE_CENTER);
            let seen_front = FacingRule::NonNegative.is_visible(&view.xyz(), &normal);
            let seen_back = FacingRule::NonNegative.is_visible(&opposite.xyz(), &normal);
            assert_ne!(seen_front, seen_back);
        }
    }

    #[test]
    fn test_generate_is_a_pure_query() {
        let pyramid = octagonal();
        let before = pyramid.surfaces().to_vec();
        let rotation = RotationState::new(1.0, 2.0, 3.0);
        let rotate_and_shift = Transform::rotate_and_shift(&rotation, pyramid.height());
        let scale = Transform::scale_matrix(200, 100, 2.0);
        let view = Vector4::new(1.0, 1.0, 1.0, 1.0);
        let _ = pyramid.generate_vertices(&view, &rotate_and_shift, &scale);
        assert_eq!(pyramid.surfaces(), before.as_slice());
    }

    #[test]
    fn test_projection_applied_after_culling() {
        let pyramid = octagonal();
        let identity = Matrix4::identity();
        let flatten_z = crate::Projection::Orthographic(crate::Axis::Z).matrix();
        let view = Vector4::new(0.0, 0.0, 1.0, 1.0);
        let visible = pyramid.generate_vertices(&view, &identity, &flatten_z);
        // culling still saw the unprojected top base
        assert_eq!(visible.len(), 9);
        assert!(visible.iter().flat_map(|s| s.vertices()).all(|v| v.xyz().z == 0.0));
    }

    #[test]
    fn test_validate() {
        assert!(Pyramid::validate(8, 0.6, 0.3, 0.9).is_ok());
        assert!(matches!(
            Pyramid::validate(2, 0.6, 0.3, 0.9),
            Err(ShapeError::TooFewSegments { actual: 2, .. })
        ));
        assert!(matches!(
            Pyramid::validate(8, 0.6, 0.3, -1.0),
            Err(ShapeError::NonPositiveLength { name: "height", .. })
        ));
    }

    #[test]
    fn test_degenerate_parameters_do_not_panic() {
        let identity = Matrix4::identity();
        let view = Vector4::new(0.0, 0.0, 1.0, 1.0);
        for pyramid in [
            Pyramid::new(0, 0.6, 0.3, 0.9),
            Pyramid::new(2, 0.6, 0.3, 0.9),
            Pyramid::new(8, 0.0, 0.0, 0.0),
        ] {
            let _ = pyramid.generate_vertices(&view, &identity, &identity);
        }
    }
}
