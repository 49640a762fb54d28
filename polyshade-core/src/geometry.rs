//! Geometry primitives shared by the mesh generators
use nalgebra::{Matrix4, RowVector4, Vector3, Vector4};
use std::mem;

use crate::visibility;

/// RGBA given to vertices created without an explicit color.
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// A vertex with a homogeneous position and an RGBA color.
///
/// Positions are row vectors: transforms are applied as `position * matrix`,
/// so chained matrices read left to right.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    position: RowVector4<f32>,
    color: Vector4<f32>,
}

impl Vertex {
    /// Number of floats in the position and in the color attribute.
    pub const TUPLE_SIZE: usize = 4;
    /// Byte offset of the position attribute.
    pub const POSITION_OFFSET: usize = mem::offset_of!(Vertex, position);
    /// Byte offset of the color attribute.
    pub const COLOR_OFFSET: usize = mem::offset_of!(Vertex, color);
    /// Size in bytes of one vertex.
    pub const STRIDE: usize = mem::size_of::<Vertex>();

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self::homogeneous(x, y, z, 1.0)
    }

    pub fn planar(x: f32, y: f32) -> Self {
        Self::homogeneous(x, y, 0.0, 1.0)
    }

    pub fn homogeneous(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::from_position(RowVector4::new(x, y, z, w))
    }

    pub fn from_position(position: RowVector4<f32>) -> Self {
        Self::colored(position, Vector4::from(DEFAULT_COLOR))
    }

    pub fn colored(position: RowVector4<f32>, color: Vector4<f32>) -> Self {
        Self { position, color }
    }

    pub fn position(&self) -> RowVector4<f32> {
        self.position
    }

    pub fn color(&self) -> Vector4<f32> {
        self.color
    }

    /// Returns a copy carrying `color`; the position is untouched.
    pub fn with_color(self, color: Vector4<f32>) -> Self {
        Self { color, ..self }
    }

    /// Cartesian part of the position, ignoring `w`.
    pub fn xyz(&self) -> Vector3<f32> {
        Vector3::new(self.position[0], self.position[1], self.position[2])
    }

    /// Returns `position * matrix`, keeping the color.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            position: self.position * matrix,
            color: self.color,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Interleaves position and color of every vertex into one upload buffer.
pub fn flatten(vertices: &[Vertex]) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(vertices.len() * Vertex::TUPLE_SIZE * 2);
    for vertex in vertices {
        buffer.extend(vertex.position.iter());
        buffer.extend(vertex.color.iter());
    }
    buffer
}

/// Role of a polygon in a pyramid mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Base,
    Face,
}

/// A planar polygon of a pyramid; vertex order defines its winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    kind: SurfaceKind,
    vertices: Vec<Vertex>,
}

impl Surface {
    pub fn new(kind: SurfaceKind, vertices: Vec<Vertex>) -> Self {
        Self { kind, vertices }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_count(&self) -> usize {
        self.vertices.len()
    }

    /// Outward unit normal, oriented away from `center`.
    pub fn normal(&self, center: &Vector3<f32>) -> Vector3<f32> {
        visibility::polygon_normal(&self.vertices, center)
    }

    pub fn apply_matrix(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            kind: self.kind,
            vertices: self.vertices.iter().map(|v| v.transformed(matrix)).collect(),
        }
    }
}

/// One latitude band of an ellipsoid, stored as a flat triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    vertices: Vec<Vertex>,
}

impl Layer {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn items_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }

    pub fn apply_matrix(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v.transformed(matrix)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axis, Transform};

    fn assert_vertices_close(lhs: &[Vertex], rhs: &[Vertex]) {
        assert_eq!(lhs.len(), rhs.len());
        for (a, b) in lhs.iter().zip(rhs) {
            assert!((a.position() - b.position()).norm() < 1e-5);
            assert_eq!(a.color(), b.color());
        }
    }

    #[test]
    fn test_w_defaults_to_one() {
        assert_eq!(Vertex::planar(1.0, 2.0).position(), RowVector4::new(1.0, 2.0, 0.0, 1.0));
        assert_eq!(Vertex::new(1.0, 2.0, 3.0).position()[3], 1.0);
        assert_eq!(Vertex::homogeneous(1.0, 2.0, 3.0, 0.5).position()[3], 0.5);
    }

    #[test]
    fn test_with_color_keeps_position() {
        let vertex = Vertex::new(1.0, 2.0, 3.0);
        let blue = Vector4::new(0.0, 0.0, 1.0, 1.0);
        let colored = vertex.with_color(blue);
        assert_eq!(colored.position(), vertex.position());
        assert_eq!(colored.color(), blue);
        assert_eq!(vertex.color(), Vector4::from(DEFAULT_COLOR));
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(Vertex::POSITION_OFFSET, 0);
        assert_eq!(Vertex::COLOR_OFFSET, 4 * mem::size_of::<f32>());
        assert_eq!(Vertex::STRIDE, 8 * mem::size_of::<f32>());
        assert_eq!(Vertex::TUPLE_SIZE, 4);
    }

    #[test]
    fn test_flatten_interleaves_attributes() {
        let vertices = [
            Vertex::new(1.0, 2.0, 3.0),
            Vertex::new(4.0, 5.0, 6.0).with_color(Vector4::new(0.0, 0.0, 1.0, 1.0)),
        ];
        let buffer = flatten(&vertices);
        assert_eq!(buffer.len(), 16);
        let first: [f32; 8] = [1.0, 2.0, 3.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let second: [f32; 8] = [4.0, 5.0, 6.0, 1.0, 0.0, 0.0, 1.0, 1.0];
        assert_eq!(buffer[..8], first);
        assert_eq!(buffer[8..], second);
    }

    #[test]
    fn test_identity_leaves_surface_unchanged() {
        let surface = Surface::new(
            SurfaceKind::Face,
            vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(1.0, 0.0, 0.0),
                Vertex::new(0.0, 1.0, 0.0),
            ],
        );
        assert_eq!(surface.apply_matrix(&Matrix4::identity()), surface);
    }

    #[test]
    fn test_apply_matrix_composes_left_to_right() {
        let layer = Layer::new(vec![
            Vertex::new(0.3, -0.2, 0.5),
            Vertex::new(1.0, 0.4, -0.7),
            Vertex::new(-0.6, 0.9, 0.1),
        ]);
        let first = Transform::rotation(Axis::X, 0.7) * Transform::shift_matrix(0.9);
        let second = Transform::rotation(Axis::Z, 2.1) * Transform::scale_matrix(150, 300, 1.15);

        let chained = layer.apply_matrix(&first).apply_matrix(&second);
        let combined = layer.apply_matrix(&(first * second));
        assert_vertices_close(chained.vertices(), combined.vertices());
    }

    #[test]
    fn test_translation_uses_last_row() {
        let shifted = Vertex::new(1.0, 1.0, 1.0).transformed(&Transform::shift_matrix(2.0));
        assert_eq!(shifted.xyz(), Vector3::new(1.0, 1.0, 0.0));
    }
}
