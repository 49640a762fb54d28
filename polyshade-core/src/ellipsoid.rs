//! Triaxial ellipsoid swept as latitude bands of culled, lit triangles
use log::debug;
use nalgebra::{Matrix4, Vector3, Vector4};
use std::cmp::Ordering;
use std::f32::consts::TAU;

use crate::error::{self, Result, ShapeError};
use crate::geometry::{Layer, Vertex};
use crate::lighting::Lighting;
use crate::visibility::{self, FacingRule, SCENE_CENTER};

/// Color of an ellipsoid built without an explicit one (opaque blue)
pub const DEFAULT_ELLIPSOID_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Range of heights swept by [`Ellipsoid::generate_vertices`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    pub start: f32,
    pub stop: f32,
}

impl HeightBand {
    pub fn new(start: f32, stop: f32) -> Self {
        Self { start, stop }
    }

    /// Height of one of `bands` equal bands
    pub fn step(&self, bands: usize) -> f32 {
        (self.stop - self.start) / bands as f32
    }

    /// Lower edge of every band, bottom first
    pub fn heights(&self, bands: usize) -> impl Iterator<Item = f32> {
        let start = self.start;
        let step = self.step(bands);
        (0..bands).map(move |k| start + k as f32 * step)
    }
}

impl Default for HeightBand {
    fn default() -> Self {
        Self::new(-0.2, 0.2)
    }
}

/// Radius multiplier of the latitude ring at height `h`: `sqrt((c² - h²) / c²)`.
///
/// Zero at the poles `h = ±c`; heights beyond the poles also give zero.
pub fn latitude_scale(c: f32, h: f32) -> f32 {
    ((c * c - h * h).max(0.0) / (c * c)).sqrt()
}

/// Ellipsoid `x²/a² + y²/b² + z²/c² = 1`. Owns no mesh: every call to
/// [`Ellipsoid::generate_vertices`] rebuilds its layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    a: f32,
    b: f32,
    c: f32,
    delta_h: usize,
    n: usize,
    view_point: Vector3<f32>,
    band: HeightBand,
    color: Vector4<f32>,
}

impl Ellipsoid {
    /// `delta_h` is the number of latitude bands, `n` the number of angular
    /// steps around each of them.
    pub fn new(
        a: f32,
        b: f32,
        c: f32,
        delta_h: usize,
        n: usize,
        view_point: Vector3<f32>,
    ) -> Self {
        Self {
            a,
            b,
            c,
            delta_h,
            n,
            view_point,
            band: HeightBand::default(),
            color: Vector4::from(DEFAULT_ELLIPSOID_COLOR),
        }
    }

    pub fn with_band(self, band: HeightBand) -> Self {
        Self { band, ..self }
    }

    pub fn with_color(self, color: Vector4<f32>) -> Self {
        Self { color, ..self }
    }

    pub fn with_view_point(self, view_point: Vector3<f32>) -> Self {
        Self { view_point, ..self }
    }

    /// Rejects parameters that would produce NaN or empty geometry.
    pub fn validate(
        a: f32,
        b: f32,
        c: f32,
        delta_h: usize,
        n: usize,
        band: &HeightBand,
    ) -> Result<()> {
        error::positive("ellipsoid", "a", a)?;
        error::positive("ellipsoid", "b", b)?;
        error::positive("ellipsoid", "c", c)?;
        if delta_h < 1 {
            return Err(ShapeError::TooFewSegments {
                shape: "ellipsoid",
                what: "height bands",
                min: 1,
                actual: delta_h,
            });
        }
        if n < 3 {
            return Err(ShapeError::TooFewSegments {
                shape: "ellipsoid",
                what: "angular segments",
                min: 3,
                actual: n,
            });
        }
        match band.start.partial_cmp(&band.stop) {
            Some(Ordering::Less) => Ok(()),
            _ => Err(ShapeError::EmptyHeightBand {
                start: band.start,
                stop: band.stop,
            }),
        }
    }

    pub fn band(&self) -> HeightBand {
        self.band
    }

    pub fn color(&self) -> Vector4<f32> {
        self.color
    }

    pub fn view_point(&self) -> Vector3<f32> {
        self.view_point
    }

    /// Upper bound on the number of vertices a call can emit
    pub fn vertices_count(&self) -> usize {
        self.delta_h * self.n * 6
    }

    /// Local-space point `i` of the latitude ring at height `h`
    pub fn ring_point(&self, i: usize, h: f32) -> Vertex {
        let phi = i as f32 * TAU / self.n as f32;
        let k = latitude_scale(self.c, h);
        Vertex::new(self.a * k * phi.cos(), self.b * k * phi.sin(), h)
    }

    /// Builds the band between `h` and `h + step`, transformed by `rotate`.
    ///
    /// Each quad is split into two triangles that are culled on their own;
    /// surviving vertices get the lit color when `lighting` is given and the
    /// ellipsoid color otherwise.
    pub fn layer(
        &self,
        h: f32,
        step: f32,
        rotate: &Matrix4<f32>,
        lighting: Option<&Lighting>,
    ) -> Layer {
        let base = self.color.xyz();
        let mut vertices = Vec::new();

        let mut emit = |corners: [&Vertex; 3]| {
            let [first, middle, last] = corners.map(Vertex::xyz);
            let normal = visibility::triangle_normal(&first, &middle, &last, &SCENE_CENTER);
            if !FacingRule::Positive.is_visible(&self.view_point, &normal) {
                return;
            }
            for corner in corners {
                let color = match lighting {
                    Some(lighting) => lighting.calculate(&corner.xyz(), &normal, &base),
                    None => self.color,
                };
                vertices.push(corner.with_color(color));
            }
        };

        for i in 0..self.n {
            let first = self.ring_point(i, h).transformed(rotate);
            let second = self.ring_point(i, h + step).transformed(rotate);
            let third = self.ring_point(i + 1, h).transformed(rotate);
            let fourth = self.ring_point(i + 1, h + step).transformed(rotate);

            emit([&first, &second, &third]);
            emit([&second, &fourth, &third]);
        }

        Layer::new(vertices)
    }

    /// Sweeps every band through `rotate`, culls and lights it, drops empty
    /// layers, then transforms the rest by `scale_proj`.
    pub fn generate_vertices(
        &self,
        rotate: &Matrix4<f32>,
        scale_proj: &Matrix4<f32>,
        lighting: Option<&Lighting>,
    ) -> Vec<Layer> {
        let step = self.band.step(self.delta_h);
        let layers: Vec<Layer> = self
            .band
            .heights(self.delta_h)
            .map(|h| self.layer(h, step, rotate, lighting))
            .filter(|layer| !layer.is_empty())
            .collect();

        debug!(
            "ellipsoid: {} of {} layers visible, {} vertices",
            layers.len(),
            self.delta_h,
            layers.iter().map(Layer::items_count).sum::<usize>()
        );

        layers.iter().map(|layer| layer.apply_matrix(scale_proj)).collect()
    }
}
