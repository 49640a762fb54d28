//! polyshade terminal viewer
//!
//! Shows the truncated pyramid or the lit ellipsoid in the terminal.
//! Controls:
//!   - WASD / Arrow Keys: Rotate about X and Y
//!   - E/R: Rotate about Z
//!   - +/-: Zoom
//!   - P: Next projection
//!   - T: Toggle shape, L: Toggle lighting
//!   - Q/ESC: Quit

use clap::Parser;
use log::info;
use polyshade_terminal::{dump, dump_all_views, Cli, Scene, TerminalApp};
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.scene_config()?;
    let scene = Scene::from_config(&config)?;
    info!(
        "starting with {:?} in {} view",
        scene.shape(),
        scene.projection().label()
    );

    let (cols, rows) = (cli.cols as usize, cli.rows as usize);
    if cli.all_views {
        return dump_all_views(&scene, cols, rows, &mut io::stdout().lock());
    }
    if cli.dump {
        return dump(&scene, cols, rows, &mut io::stdout().lock());
    }

    let mut app = TerminalApp::new(scene)?;
    app.run()
}
