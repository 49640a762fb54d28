//! Terminal client for the polyshade pipeline

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use nalgebra::Vector4;
use polyshade_core::{
    geometry, Ellipsoid, Layer, Lighting, Projection, Pyramid, RotationState, Surface, Transform,
    Vertex, Zoom,
};
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod cli;
pub mod config;
pub mod renderer;

pub use cli::Cli;
pub use config::{ConfigError, SceneConfig, ShapeKind};
pub use renderer::AsciiRenderer;

/// Angle added per rotation key press, in radians
pub const ROTATION_STEP: f32 = 0.1;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const PANEL_SEPARATOR: &str = " | ";

const CONTROLS: &str = "WASD/Arrows/E/R=Rotate +/-=Zoom P=View T=Shape L=Light Q=Quit";

/// Output of one pass through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Pyramid(Vec<Surface>),
    Ellipsoid(Vec<Layer>),
}

impl Frame {
    /// Surfaces or non-empty layers in the frame
    pub fn primitive_count(&self) -> usize {
        match self {
            Frame::Pyramid(surfaces) => surfaces.len(),
            Frame::Ellipsoid(layers) => layers.len(),
        }
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        match self {
            Frame::Pyramid(surfaces) => surfaces
                .iter()
                .flat_map(|s| s.vertices().iter().copied())
                .collect(),
            Frame::Ellipsoid(layers) => layers
                .iter()
                .flat_map(|l| l.vertices().iter().copied())
                .collect(),
        }
    }

    /// Interleaved vertex buffer, as uploaded by a GPU client
    pub fn buffer(&self) -> Vec<f32> {
        geometry::flatten(&self.vertices())
    }
}

/// What a key press did to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Redraw,
    Quit,
    Ignored,
}

/// Meshes plus the interactive view state
#[derive(Debug, Clone)]
pub struct Scene {
    pyramid: Pyramid,
    ellipsoid: Ellipsoid,
    lighting: Lighting,
    lighting_enabled: bool,
    shape: ShapeKind,
    projection: Projection,
    view_point: Vector4<f32>,
    rotation: RotationState,
    zoom: Zoom,
}

impl Scene {
    pub fn from_config(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let projection = Projection::from(config.view.projection);
        let view_point = config
            .view
            .view_point
            .map(Vector4::from)
            .unwrap_or_else(|| projection.default_view_point());
        let [x, y, z] = config.view.rotation;

        Ok(Self {
            pyramid: config.build_pyramid(),
            ellipsoid: config.build_ellipsoid(),
            lighting: config.build_lighting(),
            lighting_enabled: config.lighting.enabled,
            shape: config.view.shape,
            projection,
            view_point,
            rotation: RotationState::new(x, y, z),
            zoom: Zoom::new(),
        })
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn view_point(&self) -> Vector4<f32> {
        self.view_point
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn lighting_enabled(&self) -> bool {
        self.lighting_enabled
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Switches to `projection` and to the view point that goes with it
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.view_point = projection.default_view_point();
        self.ellipsoid = self.ellipsoid.clone().with_view_point(self.view_point.xyz());
    }

    pub fn handle_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(ROTATION_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-ROTATION_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -ROTATION_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, ROTATION_STEP, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, ROTATION_STEP),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -ROTATION_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom.zoom_in(),
            KeyCode::Char('-') => self.zoom.zoom_out(),
            KeyCode::Char('p') => {
                self.set_projection(self.projection.next());
                info!("projection: {}", self.projection.label());
            }
            KeyCode::Char('t') => self.shape = self.shape.toggled(),
            KeyCode::Char('l') => self.lighting_enabled = !self.lighting_enabled,
            _ => return KeyAction::Ignored,
        }
        KeyAction::Redraw
    }

    /// Runs the current shape through the pipeline for a viewport of
    /// `width` x `height` pixels.
    pub fn frame(&self, width: u32, height: u32) -> Frame {
        let proj_move_scale =
            Transform::proj_move_scale(self.projection, width, height, self.zoom.factor());
        let frame = match self.shape {
            ShapeKind::Pyramid => {
                let rotate_and_shift =
                    Transform::rotate_and_shift(&self.rotation, self.pyramid.height());
                Frame::Pyramid(self.pyramid.generate_vertices(
                    &self.view_point,
                    &rotate_and_shift,
                    &proj_move_scale,
                ))
            }
            ShapeKind::Ellipsoid => {
                let rotate = Transform::rotation_matrix(&self.rotation);
                let lighting = self.lighting_enabled.then_some(&self.lighting);
                Frame::Ellipsoid(self.ellipsoid.generate_vertices(
                    &rotate,
                    &proj_move_scale,
                    lighting,
                ))
            }
        };
        debug!(
            "frame {}x{}: {} primitives",
            width,
            height,
            frame.primitive_count()
        );
        frame
    }

    pub fn status_line(&self) -> String {
        let shape = match self.shape {
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::Ellipsoid => "ellipsoid",
        };
        format!(
            "polyshade | {} | {} | zoom {:.2} | lighting {} | {}",
            shape,
            self.projection.label(),
            self.zoom.factor(),
            if self.lighting_enabled { "on" } else { "off" },
            CONTROLS,
        )
    }
}

/// Renders one frame into a `cols` x `rows` grid and writes it as plain
/// text, followed by a buffer summary.
pub fn dump<W: Write>(scene: &Scene, cols: usize, rows: usize, writer: &mut W) -> io::Result<()> {
    let mut renderer = AsciiRenderer::new(cols, rows);
    let (width, height) = renderer.viewport();
    let frame = scene.frame(width, height);
    render_frame(&mut renderer, &frame);

    for line in renderer.lines() {
        writeln!(writer, "{}", line.trim_end())?;
    }
    let vertices = frame.vertices().len();
    writeln!(
        writer,
        "{}: {} primitives, {} vertices, {} floats (stride {} bytes)",
        scene.projection().label(),
        frame.primitive_count(),
        vertices,
        frame.buffer().len(),
        Vertex::STRIDE,
    )
}

/// Renders every projection of the current shape as a grid of `cols` x
/// `rows` panels: the orthographic views side by side, then the isometric
/// ones. Each view culls from its own default view point.
pub fn dump_all_views<W: Write>(
    scene: &Scene,
    cols: usize,
    rows: usize,
    writer: &mut W,
) -> io::Result<()> {
    let views: &[Projection] = &Projection::ALL;
    let (orthographic, isometric) = views.split_at(3);
    for (i, group) in [orthographic, isometric].into_iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }

        let panels: Vec<Vec<String>> = group
            .iter()
            .map(|&projection| {
                let mut view = scene.clone();
                view.set_projection(projection);
                let mut renderer = AsciiRenderer::new(cols, rows);
                let (width, height) = renderer.viewport();
                render_frame(&mut renderer, &view.frame(width, height));
                renderer.lines().collect()
            })
            .collect();

        let labels: Vec<String> = group
            .iter()
            .map(|projection| {
                let label: String = projection.label().chars().take(cols).collect();
                format!("{:<width$}", label, width = cols)
            })
            .collect();
        writeln!(writer, "{}", labels.join(PANEL_SEPARATOR).trim_end())?;

        for row in 0..rows {
            let line: Vec<&str> = panels.iter().map(|panel| panel[row].as_str()).collect();
            writeln!(writer, "{}", line.join(PANEL_SEPARATOR).trim_end())?;
        }
    }
    Ok(())
}

fn render_frame(renderer: &mut AsciiRenderer, frame: &Frame) {
    renderer.clear();
    match frame {
        Frame::Pyramid(surfaces) => renderer.render_surfaces(surfaces),
        Frame::Ellipsoid(layers) => renderer.render_layers(layers),
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    dirty: bool,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            dirty: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }

            if event::poll(POLL_INTERVAL)? {
                self.handle_event(event::read()?);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match self.scene.handle_key(code) {
                KeyAction::Quit => self.running = false,
                KeyAction::Redraw => self.dirty = true,
                KeyAction::Ignored => {}
            },
            Event::Resize(width, height) => {
                debug!("resize to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = self.renderer.viewport();
        let frame = self.scene.frame(width, height);
        render_frame(&mut self.renderer, &frame);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout)?;

        // Status overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.scene.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
