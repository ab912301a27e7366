use crate::lighting::LightingError;

/// Two same-sized accumulator textures used alternately.
///
/// Light `i` reads [`source_index(i)`](Self::source_index) and writes
/// [`dest_index(i)`](Self::dest_index); a pass never samples the texture it renders to.
pub struct AccumulationTargets {
    size: (u32, u32),
    format: wgpu::TextureFormat,
    _textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    generation: u64,
}

impl AccumulationTargets {
    pub fn new(
        device: &wgpu::Device,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        generation: u64,
    ) -> Result<Self, LightingError> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(LightingError::ZeroSizedTarget { width, height });
        }

        let make = |label: &str| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
        };

        let textures = [make("umbra accumulator 0"), make("umbra accumulator 1")];
        let views = [
            textures[0].create_view(&wgpu::TextureViewDescriptor::default()),
            textures[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];

        log::debug!("accumulator targets allocated: {width}x{height} {format:?}");

        Ok(Self {
            size,
            format,
            _textures: textures,
            views,
            generation,
        })
    }

    #[inline]
    pub fn matches(&self, size: (u32, u32), format: wgpu::TextureFormat) -> bool {
        self.size == size && self.format == format
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Bumped every time the targets are reallocated; bind groups keyed on it go stale.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn source_index(light: usize) -> usize {
        light % 2
    }

    #[inline]
    pub fn dest_index(light: usize) -> usize {
        (light + 1) % 2
    }

    #[inline]
    pub fn view(&self, index: usize) -> &wgpu::TextureView {
        &self.views[index % 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_light_reads_what_the_previous_wrote() {
        for light in 1..8 {
            assert_eq!(
                AccumulationTargets::source_index(light),
                AccumulationTargets::dest_index(light - 1)
            );
            assert_ne!(
                AccumulationTargets::source_index(light),
                AccumulationTargets::dest_index(light)
            );
        }
    }
}
