//! Homogeneous transformation matrices and rotation/zoom state
//!
//! All matrices follow the row-vector convention: a point is transformed as
//! `v * M`, and `v * M1 * M2` applies `M1` first.
use nalgebra::Matrix4;
use std::f32::consts::TAU;

use crate::projection::Projection;

/// Side of the square reference image the scale matrix maps onto
pub const REFERENCE_IMAGE_SIZE: u32 = 300;

/// Factor applied per zoom step
pub const ZOOM_STEP: f32 = 1.15;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn angle(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, angle: f32) {
        match axis {
            Axis::X => self.x = angle,
            Axis::Y => self.y = angle,
            Axis::Z => self.z = angle,
        }
    }

    /// Rotate by delta amounts, keeping every angle in `[0, 2π)`
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x = (self.x + dx).rem_euclid(TAU);
        self.y = (self.y + dy).rem_euclid(TAU);
        self.z = (self.z + dz).rem_euclid(TAU);
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Cumulative user zoom; unbounded in both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    factor: f32,
}

impl Zoom {
    pub fn new() -> Self {
        Self { factor: 1.0 }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn zoom_in(&mut self) {
        self.factor *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.factor /= ZOOM_STEP;
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

#[rustfmt::skip]
impl Transform {
    /// Right-handed rotation about a single axis
    pub fn rotation(axis: Axis, angle: f32) -> Matrix4<f32> {
        let c = angle.cos();
        let s = angle.sin();
        match axis {
            Axis::X => Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, c,   s,   0.0,
                0.0, -s,  c,   0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            Axis::Y => Matrix4::new(
                c,   0.0, -s,  0.0,
                0.0, 1.0, 0.0, 0.0,
                s,   0.0, c,   0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            Axis::Z => Matrix4::new(
                c,   s,   0.0, 0.0,
                -s,  c,   0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Create a rotation matrix from a rotation state.
    /// Rotations apply in order: X, Y, Z
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        Self::rotation(Axis::X, rotation.x)
            * Self::rotation(Axis::Y, rotation.y)
            * Self::rotation(Axis::Z, rotation.z)
    }

    /// Translation along Z by `-height / 2`, centering a mesh of that height
    pub fn shift_matrix(height: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0,           0.0,
            0.0, 1.0, 0.0,           0.0,
            0.0, 0.0, 1.0,           0.0,
            0.0, 0.0, -height / 2.0, 1.0,
        )
    }

    /// Maps the reference image onto a `width` x `height` viewport,
    /// multiplied by the user zoom. Zero dimensions are treated as 1.
    pub fn scale_matrix(width: u32, height: u32, zoom: f32) -> Matrix4<f32> {
        let reference = REFERENCE_IMAGE_SIZE as f32;
        let sx = reference / width.max(1) as f32 * zoom;
        let sy = reference / height.max(1) as f32 * zoom;
        Matrix4::new(
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Local-space matrix applied before culling: shift first, then rotate
    pub fn rotate_and_shift(rotation: &RotationState, height: f32) -> Matrix4<f32> {
        Self::shift_matrix(height) * Self::rotation_matrix(rotation)
    }

    /// Screen-space matrix applied after culling: project, move onto XY, scale
    pub fn proj_move_scale(
        projection: Projection,
        width: u32,
        height: u32,
        zoom: f32,
    ) -> Matrix4<f32> {
        projection.matrix() * projection.move_to_xy() * Self::scale_matrix(width, height, zoom)
    }
}
