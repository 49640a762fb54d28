//! Scene configuration loaded from TOML
//!
//! Every section and key is optional; missing values fall back to the
//! octagonal truncated pyramid and the blue ellipsoid of the default scene.
use clap::ValueEnum;
use nalgebra::{Vector3, Vector4};
use polyshade_core::{
    Axis, Ellipsoid, HeightBand, IsometricVariant, Lighting, Projection, Pyramid, ShapeError,
};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
}

impl From<ConfigError> for io::Error {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

/// Mesh shown by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Pyramid,
    Ellipsoid,
}

impl ShapeKind {
    pub fn toggled(self) -> Self {
        match self {
            ShapeKind::Pyramid => ShapeKind::Ellipsoid,
            ShapeKind::Ellipsoid => ShapeKind::Pyramid,
        }
    }
}

/// Name of a [`Projection`] in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionName {
    OrthoX,
    OrthoY,
    #[default]
    OrthoZ,
    #[serde(rename = "iso-1")]
    #[value(name = "iso-1")]
    Iso1,
    #[serde(rename = "iso-2")]
    #[value(name = "iso-2")]
    Iso2,
    #[serde(rename = "iso-3")]
    #[value(name = "iso-3")]
    Iso3,
    #[serde(rename = "iso-4")]
    #[value(name = "iso-4")]
    Iso4,
}

impl From<ProjectionName> for Projection {
    fn from(name: ProjectionName) -> Self {
        match name {
            ProjectionName::OrthoX => Projection::Orthographic(Axis::X),
            ProjectionName::OrthoY => Projection::Orthographic(Axis::Y),
            ProjectionName::OrthoZ => Projection::Orthographic(Axis::Z),
            ProjectionName::Iso1 => Projection::Isometric(IsometricVariant::NegPhiNegTheta),
            ProjectionName::Iso2 => Projection::Isometric(IsometricVariant::NegPhiPosTheta),
            ProjectionName::Iso3 => Projection::Isometric(IsometricVariant::PosPhiNegTheta),
            ProjectionName::Iso4 => Projection::Isometric(IsometricVariant::PosPhiPosTheta),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    pub faces: usize,
    pub base_radius: f32,
    pub top_radius: f32,
    pub height: f32,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            faces: 8,
            base_radius: 0.6,
            top_radius: 0.3,
            height: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EllipsoidConfig {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    /// Number of latitude bands
    pub bands: usize,
    /// Angular steps per band
    pub segments: usize,
    /// `[start, stop]` of the swept heights
    pub band: [f32; 2],
    /// Culling view point until the first projection change
    pub view_point: [f32; 3],
    pub color: [f32; 4],
}

impl Default for EllipsoidConfig {
    fn default() -> Self {
        Self {
            a: 0.6,
            b: 0.4,
            c: 0.2,
            bands: 20,
            segments: 40,
            band: [-0.2, 0.2],
            view_point: [0.0, 0.0, 1.0],
            color: [0.0, 0.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub enabled: bool,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub light_position: [f32; 3],
    pub view_direction: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ambient: 0.3,
            diffuse: 0.6,
            specular: 0.4,
            light_position: [1.0, 1.0, 1.0],
            view_direction: [0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub shape: ShapeKind,
    pub projection: ProjectionName,
    /// Initial angles about X, Y and Z, in radians
    pub rotation: [f32; 3],
    /// Overrides the projection's own view point when set
    pub view_point: Option<[f32; 4]>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub pyramid: PyramidConfig,
    pub ellipsoid: EllipsoidConfig,
    pub lighting: LightingConfig,
    pub view: ViewConfig,
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pyramid;
        Pyramid::validate(p.faces, p.base_radius, p.top_radius, p.height)?;
        let e = &self.ellipsoid;
        Ellipsoid::validate(e.a, e.b, e.c, e.bands, e.segments, &self.height_band())?;
        Ok(())
    }

    pub fn height_band(&self) -> HeightBand {
        HeightBand::new(self.ellipsoid.band[0], self.ellipsoid.band[1])
    }

    pub fn build_pyramid(&self) -> Pyramid {
        let p = &self.pyramid;
        Pyramid::new(p.faces, p.base_radius, p.top_radius, p.height)
    }

    pub fn build_ellipsoid(&self) -> Ellipsoid {
        let e = &self.ellipsoid;
        Ellipsoid::new(e.a, e.b, e.c, e.bands, e.segments, Vector3::from(e.view_point))
            .with_band(self.height_band())
            .with_color(Vector4::from(e.color))
    }

    pub fn build_lighting(&self) -> Lighting {
        let l = &self.lighting;
        Lighting::new(
            l.ambient,
            l.specular,
            l.diffuse,
            Vector3::from(l.light_position),
            Vector3::from(l.view_direction),
        )
    }
}
