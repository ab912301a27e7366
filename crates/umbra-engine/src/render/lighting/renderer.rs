use crate::coords::Camera2d;
use crate::lighting::{FramePlan, LightSource, LightUniform, LightingError, Occluder, Pass};
use crate::render::{RenderCtx, RenderTarget};

use super::common::begin_pass;
use super::{AccumulationTargets, CompositePass, LightAccumPass, LightingConfig, ShadowMaskPass};

/// Per-frame lighting input.
#[derive(Debug, Copy, Clone)]
pub struct LightingFrame<'a> {
    pub camera: Camera2d,
    pub lights: &'a [LightSource],
    pub occluders: &'a [Occluder],
}

/// Records the full lighting sequence for a frame.
///
/// The caller provides the lit scene's base texture; the renderer owns the
/// accumulator targets and all pipelines.
pub struct LightingRenderer {
    config: LightingConfig,

    shadow_mask: ShadowMaskPass,
    light_accum: LightAccumPass,
    composite: CompositePass,

    targets: Option<AccumulationTargets>,
    target_generation: u64,
}

impl Default for LightingRenderer {
    fn default() -> Self {
        Self::new(LightingConfig::default())
    }
}

impl LightingRenderer {
    pub fn new(config: LightingConfig) -> Self {
        Self {
            config,
            shadow_mask: ShadowMaskPass::new(),
            light_accum: LightAccumPass::new(),
            composite: CompositePass::new(),
            targets: None,
            target_generation: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    /// Replaces the configuration; pipelines and targets are rebuilt lazily on the next frame.
    pub fn set_config(&mut self, config: LightingConfig) {
        self.config = config;
    }

    /// Records every pass of the frame into `target.encoder`.
    ///
    /// `scene` is composited with the lit accumulator onto `target.color_view`,
    /// which is loaded rather than cleared.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &wgpu::TextureView,
        frame: &LightingFrame<'_>,
    ) -> Result<(), LightingError> {
        let plan = FramePlan::for_lights(frame.lights.len(), self.config.ambient);
        plan.validate()?;

        self.ensure_targets(ctx)?;

        let format = self.config.accumulator_format;
        self.shadow_mask.ensure_pipeline(ctx.device, format, self.config.mask_blend);
        self.light_accum.ensure_pipeline(ctx.device, format);
        self.composite.ensure_pipeline(ctx.device, ctx.surface_format);

        let uniforms: Vec<LightUniform> = plan
            .passes()
            .iter()
            .filter_map(|pass| match *pass {
                Pass::Accumulate { light, last } => {
                    frame.lights.get(light).map(|l| LightUniform::new(l, last))
                }
                _ => None,
            })
            .collect();

        let Some(targets) = self.targets.as_ref() else { return Ok(()) };

        self.shadow_mask.upload(ctx, frame);
        self.light_accum.prepare(ctx.device, ctx.queue, targets, &uniforms);

        let mut current = 0usize;
        for pass in plan.passes() {
            match *pass {
                Pass::Clear { value } => {
                    let load = wgpu::LoadOp::Clear(value.to_wgpu());
                    let _rpass = begin_pass(target.encoder, "umbra accumulator clear", targets.view(0), load);
                    current = 0;
                }
                Pass::ShadowMask { light } => {
                    let view = targets.view(AccumulationTargets::source_index(light));
                    self.shadow_mask.record(target.encoder, view, light);
                }
                Pass::Accumulate { light, .. } => {
                    current = AccumulationTargets::dest_index(light);
                    self.light_accum.record(target.encoder, targets.view(current), light);
                }
                Pass::Composite => {
                    self.composite.record(
                        ctx.device,
                        target.encoder,
                        target.color_view,
                        scene,
                        targets.view(current),
                    );
                }
            }
        }

        Ok(())
    }

    fn ensure_targets(&mut self, ctx: &RenderCtx<'_>) -> Result<(), LightingError> {
        let format = self.config.accumulator_format;
        if self
            .targets
            .as_ref()
            .is_some_and(|t| t.matches(ctx.surface_size, format))
        {
            return Ok(());
        }

        self.target_generation += 1;
        self.targets = Some(AccumulationTargets::new(
            ctx.device,
            ctx.surface_size,
            format,
            self.target_generation,
        )?);
        Ok(())
    }
}
