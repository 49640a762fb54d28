//! Command line options
use clap::Parser;
use std::path::PathBuf;

use crate::config::{ConfigError, ProjectionName, SceneConfig, ShapeKind};

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "polyshade-terminal",
    version,
    about = "Shaded pyramid and ellipsoid viewer for the terminal"
)]
pub struct Cli {
    /// TOML scene configuration
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Shape shown first
    #[arg(long, value_enum)]
    pub shape: Option<ShapeKind>,

    /// Initial projection
    #[arg(long, value_enum)]
    pub projection: Option<ProjectionName>,

    /// Draw the ellipsoid in its flat color
    #[arg(long)]
    pub no_lighting: bool,

    /// Print one frame as text and exit
    #[arg(long)]
    pub dump: bool,

    /// Print every projection side by side and exit
    #[arg(long)]
    pub all_views: bool,

    /// Grid width for --dump, per panel with --all-views
    #[arg(long, default_value_t = 80)]
    pub cols: u16,

    /// Grid height for --dump, per panel with --all-views
    #[arg(long, default_value_t = 24)]
    pub rows: u16,
}

impl Cli {
    /// Loads the configured scene, or the default one, with the command
    /// line overrides applied.
    pub fn scene_config(&self) -> Result<SceneConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(shape) = self.shape {
            config.view.shape = shape;
        }
        if let Some(projection) = self.projection {
            config.view.projection = projection;
        }
        if self.no_lighting {
            config.lighting.enabled = false;
        }
        Ok(config)
    }
}
