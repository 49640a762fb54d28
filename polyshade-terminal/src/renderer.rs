//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use polyshade_core::{Layer, Surface, SurfaceKind, Vertex};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Pixels covered by one character cell; terminal cells are about twice as
/// tall as they are wide.
pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

const FACE_EDGE: char = '#';
const BASE_EDGE: char = '*';
const EDGE_COLOR: Color = Color::Cyan;

/// ASCII renderer that turns projected vertices into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    /// Viewport size in pixels, as fed to the scale matrix
    pub fn viewport(&self) -> (u32, u32) {
        (
            self.width as u32 * CELL_WIDTH,
            self.height as u32 * CELL_HEIGHT,
        )
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Maps XY in [-1, 1] to the character grid, Y pointing up
    pub fn to_screen(&self, vertex: &Vertex) -> (f32, f32) {
        let position = vertex.position();
        let x = (position[0] + 1.0) * 0.5 * self.width as f32;
        let y = (1.0 - position[1]) * 0.5 * self.height as f32;
        (x, y)
    }

    /// Draws every surface as a closed line loop
    pub fn render_surfaces(&mut self, surfaces: &[Surface]) {
        for surface in surfaces {
            let character = match surface.kind() {
                SurfaceKind::Face => FACE_EDGE,
                SurfaceKind::Base => BASE_EDGE,
            };
            let points: Vec<(f32, f32)> =
                surface.vertices().iter().map(|v| self.to_screen(v)).collect();
            for (i, &start) in points.iter().enumerate() {
                let end = points[(i + 1) % points.len()];
                self.draw_line(start, end, character, EDGE_COLOR);
            }
        }
    }

    /// Fills every triangle of every layer, shaded by its vertex colors
    pub fn render_layers(&mut self, layers: &[Layer]) {
        for layer in layers {
            for triangle in layer.triangles() {
                let coords: Vec<(f32, f32)> =
                    triangle.iter().map(|v| self.to_screen(v)).collect();
                let (character, color) = shade(triangle);
                self.rasterize_triangle(&coords, character, color);
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, character: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = character;
        self.color_buffer[idx] = color;
    }

    fn draw_line(&mut self, start: (f32, f32), end: (f32, f32), character: char, color: Color) {
        let bounds = (self.width as f32, self.height as f32);
        let Some((start, end)) = clip_segment(start, end, bounds) else {
            return;
        };
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let x = start.0 + dx * i as f32 / steps as f32;
            let y = start.1 + dy * i as f32 / steps as f32;
            self.plot(x.floor() as i32, y.floor() as i32, character, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32)], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, (px, py)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, character, color);
                    }
                }
            }
        }
    }

    /// Text rows of the character buffer, without colors
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Glyph and terminal color for a triangle, from its mean vertex color
fn shade(triangle: &[Vertex]) -> (char, Color) {
    let sum = triangle
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.color().xyz());
    let mean = sum / triangle.len().max(1) as f32;
    let mean = mean.map(|c| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 });

    let intensity = mean.max();
    // keep lit but dark triangles visible
    let index = 1 + (intensity * (LUMINOSITY_RAMP.len() - 2) as f32).round() as usize;
    let character = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];

    let channel = |c: f32| (c * 255.0).round() as u8;
    let color = Color::Rgb {
        r: channel(mean.x),
        g: channel(mean.y),
        b: channel(mean.z),
    };
    (character, color)
}

/// Liang-Barsky clip of a segment to `[0, width] x [0, height]`.
///
/// Returns `None` for segments entirely outside the grid or with
/// non-finite endpoints.
fn clip_segment(
    start: (f32, f32),
    end: (f32, f32),
    (width, height): (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![start.0, start.1, end.0, end.1].iter().all(|c| c.is_finite()) {
        return None;
    }
    // f64 keeps the clipped endpoints exact enough for far-away vertices
    let (x0, y0) = (start.0 as f64, start.1 as f64);
    let (dx, dy) = (end.0 as f64 - x0, end.1 as f64 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, x0),
        (dx, width as f64 - x0),
        (-dy, y0),
        (dy, height as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }

    let point = |t: f64| ((x0 + t * dx) as f32, (y0 + t * dy) as f32);
    Some((point(t0), point(t1)))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 || !denom.is_finite() {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
