use umbra_engine::coords::{Transform2d, Vec2};
use umbra_engine::lighting::{LightSource, LightingError, Occluder, Rgba, ShadowCaster};
use umbra_engine::render::RenderCtx;

/// A caster plus how it moves: `spin` radians per second around its own center.
struct Placed {
    caster: ShadowCaster,
    transform: Transform2d,
    spin: f32,
}

/// Demo layout: a handful of casters and two lights orbiting the origin.
pub struct Scene {
    casters: Vec<Placed>,
}

impl Scene {
    pub fn new() -> Result<Self, LightingError> {
        let wedge = ShadowCaster::triangles(
            vec![Vec2::new(-40.0, -30.0), Vec2::new(40.0, -30.0), Vec2::new(0.0, 40.0)],
            0.5,
        )?;

        let casters = vec![
            Placed {
                caster: ShadowCaster::rect(Vec2::new(40.0, 40.0), 0.0),
                transform: Transform2d::from_translation(Vec2::new(-250.0, 120.0)),
                spin: 0.4,
            },
            Placed {
                caster: ShadowCaster::rect(Vec2::new(70.0, 15.0), 0.0),
                transform: Transform2d::from_translation(Vec2::new(220.0, -90.0)),
                spin: -0.25,
            },
            Placed {
                caster: wedge,
                transform: Transform2d::from_translation(Vec2::new(0.0, -200.0)),
                spin: 0.0,
            },
            Placed {
                caster: ShadowCaster::polygon(
                    (0..6)
                        .map(|i| Vec2::new(30.0, 0.0).rotated(i as f32 * std::f32::consts::TAU / 6.0))
                        .collect(),
                    0.2,
                ),
                transform: Transform2d::from_translation(Vec2::new(120.0, 160.0)),
                spin: 0.8,
            },
        ];

        Ok(Self { casters })
    }

    pub fn occluders(&self, t: f32) -> Vec<Occluder> {
        self.casters
            .iter()
            .flat_map(|p| p.caster.occluders(&p.transform.with_rotation(p.spin * t)))
            .collect()
    }

    /// Orbiting lights, plus a white light at `cursor` when the pointer is inside the window.
    pub fn lights(&self, t: f32, cursor: Option<Vec2>) -> Vec<LightSource> {
        let mut lights = vec![
            LightSource::new(
                Vec2::new(180.0, 0.0).rotated(t * 0.5),
                Rgba::rgb(1.0, 0.55, 0.2),
                0.55,
            ),
            LightSource::new(
                Vec2::new(320.0, 0.0).rotated(-t * 0.3 + 2.0),
                Rgba::rgb(0.25, 0.45, 1.0),
                0.5,
            ),
        ];
        if let Some(p) = cursor {
            lights.push(LightSource::new(p, Rgba::WHITE, 0.35));
        }
        lights
    }
}

/// Checkerboard base texture the lights are composited onto.
pub struct Backdrop {
    size: (u32, u32),
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Backdrop {
    const CELL: u32 = 32;
    const DARK: [u8; 4] = [28, 28, 34, 255];
    const LIGHT: [u8; 4] = [44, 44, 52, 255];

    /// Returns the backdrop for the current surface size, recreating it on resize.
    pub fn ensure<'s>(slot: &'s mut Option<Backdrop>, ctx: &RenderCtx<'_>) -> &'s Backdrop {
        if slot.as_ref().is_some_and(|b| b.size != ctx.surface_size) {
            *slot = None;
        }
        slot.get_or_insert_with(|| Backdrop::new(ctx))
    }

    fn new(ctx: &RenderCtx<'_>) -> Self {
        let (width, height) = (ctx.surface_size.0.max(1), ctx.surface_size.1.max(1));
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra demo backdrop"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let even = ((x / Self::CELL) + (y / Self::CELL)) % 2 == 0;
                pixels.extend_from_slice(if even { &Self::DARK } else { &Self::LIGHT });
            }
        }

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            extent,
        );

        log::debug!("backdrop created: {width}x{height}");

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            size: ctx.surface_size,
            _texture: texture,
            view,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_engine::coords::Viewport;

    fn headless() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter.request_device(&wgpu::DeviceDescriptor::default()).await.ok()
        })
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn cursor_adds_a_third_light() {
        let scene = Scene::new().unwrap();
        assert_eq!(scene.lights(0.0, None).len(), 2);
        let lights = scene.lights(0.0, Some(Vec2::new(3.0, 4.0)));
        assert_eq!(lights.len(), 3);
        assert_eq!(lights[2].position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn every_caster_contributes_occluders() {
        let scene = Scene::new().unwrap();
        // two boxes, one triangle, one hexagon
        assert_eq!(scene.occluders(1.5).len(), 4 + 4 + 3 + 6);
    }

    // ── backdrop ──────────────────────────────────────────────────────────

    #[test]
    fn backdrop_is_reused_until_the_surface_resizes() {
        let Some((device, queue)) = headless() else {
            eprintln!("no wgpu adapter available, skipping");
            return;
        };
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;

        let mut slot = None;
        let small = RenderCtx::new(&device, &queue, format, Viewport::new(8.0, 8.0), (8, 8));
        assert_eq!(Backdrop::ensure(&mut slot, &small).size, (8, 8));
        assert_eq!(Backdrop::ensure(&mut slot, &small).size, (8, 8));

        let large = RenderCtx::new(&device, &queue, format, Viewport::new(16.0, 8.0), (16, 8));
        assert_eq!(Backdrop::ensure(&mut slot, &large).size, (16, 8));
        assert_eq!(slot.as_ref().map(|b| b.size), Some((16, 8)));
    }
}
