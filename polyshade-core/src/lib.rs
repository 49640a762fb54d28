//! polyshade core library - mesh generation and transform pipeline
//!
//! Builds a truncated pyramid and a triaxial ellipsoid in local coordinates,
//! runs them through rotate/shift, back-face culling, optional Phong
//! lighting and projection/scale, and hands the surviving vertices to a
//! rendering client.

pub mod ellipsoid;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod projection;
pub mod pyramid;
pub mod transform;
pub mod visibility;

// Re-export commonly used types
pub use ellipsoid::{Ellipsoid, HeightBand};
pub use error::ShapeError;
pub use geometry::{Layer, Surface, SurfaceKind, Vertex};
pub use lighting::Lighting;
pub use projection::{IsometricVariant, Projection};
pub use pyramid::Pyramid;
pub use transform::{Axis, RotationState, Transform, Zoom};
pub use visibility::FacingRule;
