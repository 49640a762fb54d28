//! Parallel projections onto the viewing plane
use nalgebra::{Matrix4, Vector4};
use std::f32::consts::FRAC_PI_2;

use crate::transform::{Axis, Transform};

/// Sign combination of the two isometric base angles φ and θ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsometricVariant {
    NegPhiNegTheta,
    NegPhiPosTheta,
    PosPhiNegTheta,
    PosPhiPosTheta,
}

impl IsometricVariant {
    pub const ALL: [IsometricVariant; 4] = [
        IsometricVariant::NegPhiNegTheta,
        IsometricVariant::NegPhiPosTheta,
        IsometricVariant::PosPhiNegTheta,
        IsometricVariant::PosPhiPosTheta,
    ];

    /// Signed `(φ, θ)` for this variant
    pub fn angles(self) -> (f32, f32) {
        let phi = (2.0f32.sqrt() / 2.0).asin();
        let theta = (1.0f32 / 3.0).sqrt().asin();
        match self {
            IsometricVariant::NegPhiNegTheta => (-phi, -theta),
            IsometricVariant::NegPhiPosTheta => (-phi, theta),
            IsometricVariant::PosPhiNegTheta => (phi, -theta),
            IsometricVariant::PosPhiPosTheta => (phi, theta),
        }
    }
}

/// Projection applied after culling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Drops the given axis, projecting onto the plane orthogonal to it
    Orthographic(Axis),
    Isometric(IsometricVariant),
}

impl Projection {
    /// Every view, orthographic first
    pub const ALL: [Projection; 7] = [
        Projection::Orthographic(Axis::X),
        Projection::Orthographic(Axis::Y),
        Projection::Orthographic(Axis::Z),
        Projection::Isometric(IsometricVariant::NegPhiNegTheta),
        Projection::Isometric(IsometricVariant::NegPhiPosTheta),
        Projection::Isometric(IsometricVariant::PosPhiNegTheta),
        Projection::Isometric(IsometricVariant::PosPhiPosTheta),
    ];

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix4<f32> {
        match *self {
            Projection::Orthographic(axis) => {
                let mut matrix = Matrix4::identity();
                let i = axis.index();
                matrix[(i, i)] = 0.0;
                matrix
            }
            Projection::Isometric(variant) => {
                let (phi, theta) = variant.angles();
                Matrix4::new(
                    phi.cos(), phi.sin() * theta.sin(),  0.0, 0.0,
                    0.0,       theta.cos(),              0.0, 0.0,
                    phi.sin(), -phi.cos() * theta.sin(), 0.0, 0.0,
                    0.0,       0.0,                      0.0, 1.0,
                )
            }
        }
    }

    /// Rotates the projection plane onto XY
    pub fn move_to_xy(&self) -> Matrix4<f32> {
        match *self {
            Projection::Orthographic(Axis::X) => Transform::rotation(Axis::Y, -FRAC_PI_2),
            Projection::Orthographic(Axis::Y) => Transform::rotation(Axis::X, -FRAC_PI_2),
            Projection::Orthographic(Axis::Z) => Matrix4::identity(),
            Projection::Isometric(_) => Matrix4::identity(),
        }
    }

    /// View point the culling pass uses for this view
    pub fn default_view_point(&self) -> Vector4<f32> {
        use IsometricVariant::*;
        match *self {
            Projection::Orthographic(Axis::X) => Vector4::new(1.0, 0.0, 0.0, 1.0),
            Projection::Orthographic(Axis::Y) => Vector4::new(0.0, 1.0, 0.0, 1.0),
            Projection::Orthographic(Axis::Z) => Vector4::new(0.0, 0.0, 1.0, 1.0),
            Projection::Isometric(NegPhiNegTheta) => Vector4::new(1.0, -1.0, 1.0, 1.0),
            Projection::Isometric(NegPhiPosTheta) => Vector4::new(1.0, 1.0, 1.0, 1.0),
            Projection::Isometric(PosPhiNegTheta) => Vector4::new(1.0, 1.0, -1.0, 1.0),
            Projection::Isometric(PosPhiPosTheta) => Vector4::new(1.0, -1.0, -1.0, 1.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Projection::Orthographic(Axis::X) => "x = 0 (YZ)",
            Projection::Orthographic(Axis::Y) => "y = 0 (XZ)",
            Projection::Orthographic(Axis::Z) => "z = 0 (XY)",
            Projection::Isometric(IsometricVariant::NegPhiNegTheta) => "φ < 0, θ < 0",
            Projection::Isometric(IsometricVariant::NegPhiPosTheta) => "φ < 0, θ > 0",
            Projection::Isometric(IsometricVariant::PosPhiNegTheta) => "φ > 0, θ < 0",
            Projection::Isometric(IsometricVariant::PosPhiPosTheta) => "φ > 0, θ > 0",
        }
    }

    /// The view after this one in [`Projection::ALL`], wrapping around
    pub fn next(&self) -> Projection {
        let position = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(position + 1) % Self::ALL.len()]
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Orthographic(Axis::Z)
    }
}
