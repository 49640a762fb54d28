//! Phong reflection model evaluated per vertex
use nalgebra::{Vector3, Vector4};

/// Specular exponent
pub const SHININESS: f32 = 10.0;

/// Ambient + diffuse + specular lighting with a single point light.
///
/// Holds no mutable state; [`Lighting::calculate`] is a pure function of its
/// arguments and the coefficients fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    ambient_coeff: f32,
    specular_coeff: f32,
    diffuse_coeff: f32,
    light_position: Vector3<f32>,
    view_direction: Vector3<f32>,
}

impl Lighting {
    pub fn new(
        ambient_coeff: f32,
        specular_coeff: f32,
        diffuse_coeff: f32,
        light_position: Vector3<f32>,
        view_direction: Vector3<f32>,
    ) -> Self {
        Self {
            ambient_coeff,
            specular_coeff,
            diffuse_coeff,
            light_position,
            view_direction,
        }
    }

    pub fn ambient_coeff(&self) -> f32 {
        self.ambient_coeff
    }

    pub fn specular_coeff(&self) -> f32 {
        self.specular_coeff
    }

    pub fn diffuse_coeff(&self) -> f32 {
        self.diffuse_coeff
    }

    pub fn light_position(&self) -> Vector3<f32> {
        self.light_position
    }

    pub fn view_direction(&self) -> Vector3<f32> {
        self.view_direction
    }

    /// RGBA color of `point` with unit `normal` and base `color`; alpha is 1.
    ///
    /// The light vector is not normalized and the specular base is not
    /// clamped, so the result is not limited to `[0, 1]`.
    pub fn calculate(
        &self,
        point: &Vector3<f32>,
        normal: &Vector3<f32>,
        color: &Vector3<f32>,
    ) -> Vector4<f32> {
        let ambient = self.ambient_coeff * color;

        let to_light = self.light_position - point;
        let diffuse = self.diffuse_coeff * to_light.dot(normal).max(0.0) * color;

        let reflected = 2.0 * normal.dot(&to_light) * normal - to_light;
        let specular =
            self.specular_coeff * reflected.dot(&self.view_direction).powf(SHININESS) * color;

        let sum = ambient + diffuse + specular;
        Vector4::new(sum.x, sum.y, sum.z, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue() -> Vector3<f32> {
        Vector3::new(0.0, 0.0, 1.0)
    }

    #[test]
    fn test_pure_ambient_returns_base_color() {
        let lighting = Lighting::new(
            1.0,
            0.0,
            0.0,
            Vector3::new(3.0, -2.0, 5.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        let base = Vector3::new(0.2, 0.5, 0.7);
        for (point, normal) in [
            (Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
            (Vector3::new(0.4, -0.1, 0.9), Vector3::new(1.0, 0.0, 0.0)),
        ] {
            let color = lighting.calculate(&point, &normal, &base);
            assert_eq!(color, Vector4::new(0.2, 0.5, 0.7, 1.0));
        }
    }

    #[test]
    fn test_diffuse_ignores_light_behind_surface() {
        let lighting = Lighting::new(
            0.0,
            0.0,
            1.0,
            Vector3::new(0.0, 0.0, -2.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        let color = lighting.calculate(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 1.0), &blue());
        assert_eq!(color, Vector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_diffuse_scales_with_unnormalized_light_vector() {
        let lighting = Lighting::new(
            0.0,
            0.0,
            0.5,
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let color = lighting.calculate(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 1.0), &blue());
        // 0.5 * (L · N = 2) * 1
        assert!((color.z - 1.0).abs() < 1e-6);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn test_specular_peaks_along_reflection() {
        let lighting = Lighting::new(
            0.0,
            1.0,
            0.0,
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        // light straight above reflects straight back: (R · V)^10 = 1
        let color = lighting.calculate(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 1.0), &blue());
        assert!((color.z - 1.0).abs() < 1e-6);

        let grazing = Lighting::new(
            0.0,
            1.0,
            0.0,
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let color = grazing.calculate(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 1.0), &blue());
        assert!(color.z.abs() < 1e-6);
    }

    #[test]
    fn test_alpha_is_always_one() {
        let lighting = Lighting::new(
            0.3,
            0.4,
            0.6,
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        let color = lighting.calculate(
            &Vector3::new(0.1, 0.2, 0.3),
            &Vector3::new(0.0, 0.6, 0.8),
            &Vector3::new(1.0, 0.5, 0.25),
        );
        assert_eq!(color.w, 1.0);
    }
}
