mod scene;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use umbra_engine::coords::{Camera2d, Vec2};
use umbra_engine::core::{App, AppControl, FrameCtx};
use umbra_engine::device::GpuInit;
use umbra_engine::lighting::Rgba;
use umbra_engine::logging::{init_logging, LoggingConfig};
use umbra_engine::render::lighting::{LightingConfig, LightingFrame, LightingRenderer, MaskBlend};
use umbra_engine::window::{Runtime, RuntimeConfig};

use scene::{Backdrop, Scene};

/// Fallback when the adapter cannot render and filter half floats.
const FALLBACK_ACCUMULATOR: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct Demo {
    renderer: LightingRenderer,
    scene: Scene,
    backdrop: Option<Backdrop>,
    camera: Camera2d,
    /// Physical cursor position.
    cursor: Option<(f64, f64)>,
    format_checked: bool,
}

impl Demo {
    fn new() -> Result<Self> {
        Ok(Self {
            renderer: LightingRenderer::new(LightingConfig::default()),
            scene: Scene::new()?,
            backdrop: None,
            camera: Camera2d::default(),
            cursor: None,
            format_checked: false,
        })
    }

    fn toggle_mask_blend(&mut self) {
        let mut config = self.renderer.config().clone();
        config.mask_blend = match config.mask_blend {
            MaskBlend::Darkest => MaskBlend::Replace,
            MaskBlend::Replace => MaskBlend::Darkest,
        };
        log::info!("mask blend: {:?}", config.mask_blend);
        self.renderer.set_config(config);
    }
}

impl App for Demo {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor = Some((position.x, position.y)),
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
                    PhysicalKey::Code(KeyCode::KeyM) if !event.repeat => self.toggle_mask_blend(),
                    _ => {}
                }
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.format_checked {
            self.format_checked = true;
            let format = self.renderer.config().accumulator_format;
            if !ctx.gpu.supports_accumulation_format(format) {
                log::warn!("{format:?} not usable as accumulator, using {FALLBACK_ACCUMULATOR:?}");
                let mut config = self.renderer.config().clone();
                config.accumulator_format = FALLBACK_ACCUMULATOR;
                self.renderer.set_config(config);
            }
        }

        let viewport = ctx.window.viewport();
        let scale = ctx.window.scale_factor();
        let cursor = self.cursor.map(|(x, y)| {
            let logical = Vec2::new((x / scale) as f32, (y / scale) as f32);
            self.camera.screen_to_world(logical, viewport)
        });

        let t = ctx.time.elapsed;
        let occluders = self.scene.occluders(t);
        let lights = self.scene.lights(t, cursor);
        let frame = LightingFrame {
            camera: self.camera,
            lights: &lights,
            occluders: &occluders,
        };

        let (renderer, backdrop) = (&mut self.renderer, &mut self.backdrop);
        ctx.render(Rgba::BLACK, |rctx, target| {
            let backdrop = Backdrop::ensure(backdrop, rctx);
            if let Err(e) = renderer.render(rctx, target, backdrop.view(), &frame) {
                log::warn!("lighting frame skipped: {e}");
            }
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("umbra demo: cursor places a light, M toggles mask blending, Esc quits");

    Runtime::run(
        RuntimeConfig {
            title: "umbra demo".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        Demo::new()?,
    )
}
