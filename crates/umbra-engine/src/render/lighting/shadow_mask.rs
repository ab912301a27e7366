use std::ops::Range;

use crate::lighting::{build_shadow_volume, MaskVertex};
use crate::render::RenderCtx;

use super::common::{begin_pass, mask_blend_state, primitive_state};
use super::renderer::LightingFrame;
use super::shaders::SHADOW_MASK_WGSL;
use super::MaskBlend;

/// Draws each light's shadow volume into the red channel of an accumulator.
///
/// All lights' geometry is uploaded once per frame into a single vertex buffer;
/// `record` draws the range belonging to one light.
#[derive(Default)]
pub struct ShadowMaskPass {
    pipeline_key: Option<(wgpu::TextureFormat, MaskBlend)>,
    pipeline: Option<wgpu::RenderPipeline>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,

    ranges: Vec<Range<u32>>,
}

impl ShadowMaskPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn ensure_pipeline(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        blend: MaskBlend,
    ) {
        if self.pipeline_key == Some((format, blend)) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("umbra shadow mask shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_MASK_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("umbra shadow mask pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("umbra shadow mask pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MaskVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: mask_blend_state(blend),
                    // G/B/A hold parked light and must survive the mask write.
                    write_mask: wgpu::ColorWrites::RED,
                })],
            }),
            primitive: primitive_state(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("shadow mask pipeline created for {format:?} ({blend:?})");

        self.pipeline_key = Some((format, blend));
        self.pipeline = Some(pipeline);
    }

    /// Builds and uploads shadow volumes for every light in `frame`.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, frame: &LightingFrame<'_>) {
        self.ranges.clear();
        let mut vertices: Vec<MaskVertex> = Vec::new();

        for light in frame.lights {
            let start = vertices.len() as u32;
            vertices.extend(build_shadow_volume(light, frame.occluders, &frame.camera, ctx.viewport));
            self.ranges.push(start..vertices.len() as u32);
        }

        if vertices.is_empty() {
            return;
        }

        self.ensure_capacity(ctx.device, vertices.len());
        let Some(vbo) = self.vbo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
    }

    /// Records the mask draw for `light` into `view`. Lights without occluders draw nothing.
    pub(super) fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        light: usize,
    ) {
        let Some(range) = self.ranges.get(light).filter(|r| !r.is_empty()).cloned() else {
            return;
        };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        let mut rpass = begin_pass(encoder, "umbra shadow mask pass", view, wgpu::LoadOp::Load);
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(range, 0..1);
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, required_vertices: usize) {
        if required_vertices <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let new_cap = required_vertices.next_power_of_two().max(256);
        let new_size = (new_cap * std::mem::size_of::<MaskVertex>()) as u64;

        self.vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("umbra shadow mask vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}
