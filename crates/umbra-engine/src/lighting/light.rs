use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

use super::Rgba;

/// A point light in world space.
///
/// Only the RGB part of `color` is used; `intensity` scales it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightSource {
    pub position: Vec2,
    pub color: Rgba,
    pub intensity: f32,
}

impl LightSource {
    #[inline]
    pub const fn new(position: Vec2, color: Rgba, intensity: f32) -> Self {
        Self { position, color, intensity }
    }

    /// Color scaled by intensity, i.e. the contribution of a fully unshadowed pixel.
    #[inline]
    pub fn radiance(&self) -> [f32; 3] {
        [
            self.color.r * self.intensity,
            self.color.g * self.intensity,
            self.color.b * self.intensity,
        ]
    }
}

/// Uniform block bound at slot 2 of the accumulation pass.
///
/// `data` is `(r, g, b, intensity)`; `last.x > 0.0` marks the final light.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub data: [f32; 4],
    pub last: [f32; 4],
}

impl LightUniform {
    pub fn new(light: &LightSource, last: bool) -> Self {
        Self::from_parts(
            [light.color.r, light.color.g, light.color.b, light.intensity],
            last,
        )
    }

    #[inline]
    pub const fn from_parts(data: [f32; 4], last: bool) -> Self {
        Self {
            data,
            last: [if last { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.last[0] > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_two_vec4s() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
    }

    #[test]
    fn last_flag_uses_x_component() {
        let light = LightSource::new(Vec2::zero(), Rgba::rgb(1.0, 0.5, 0.0), 2.0);
        let u = LightUniform::new(&light, true);
        assert_eq!(u.data, [1.0, 0.5, 0.0, 2.0]);
        assert!(u.is_last());
        assert!(!LightUniform::new(&light, false).is_last());
    }

    #[test]
    fn radiance_scales_by_intensity() {
        let light = LightSource::new(Vec2::zero(), Rgba::rgb(0.5, 1.0, 0.25), 2.0);
        assert_eq!(light.radiance(), [1.0, 2.0, 0.5]);
    }
}
