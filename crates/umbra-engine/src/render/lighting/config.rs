use crate::lighting::Rgba;

/// How overlapping shadow volumes of one light combine in the red channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum MaskBlend {
    /// Keep the lowest mask (darkest shadow) under overlaps.
    #[default]
    Darkest,
    /// Last drawn volume wins.
    Replace,
}

/// Lighting renderer configuration.
#[derive(Debug, Clone)]
pub struct LightingConfig {
    /// Format of both accumulator targets. Must be renderable and filterable.
    ///
    /// A float format keeps accumulated light above 1.0 until the composite.
    pub accumulator_format: wgpu::TextureFormat,

    /// Light present everywhere regardless of shadows. Only RGB is used.
    pub ambient: Rgba,

    pub mask_blend: MaskBlend,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            accumulator_format: wgpu::TextureFormat::Rgba16Float,
            ambient: Rgba::rgb(0.05, 0.05, 0.08),
            mask_blend: MaskBlend::Darkest,
        }
    }
}
