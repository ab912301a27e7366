use wgpu::util::DeviceExt;

use crate::lighting::LightUniform;

use super::common::{
    begin_pass, create_sampler, primitive_state, sampler_entry, texture_entry, QuadVertex,
    QUAD_INDICES, QUAD_VERTICES,
};
use super::shaders::LIGHT_ACCUM_WGSL;
use super::AccumulationTargets;

/// Adds one light into the accumulator, reading one target and writing the other.
///
/// Binding layout (group 0):
/// - 0: accumulator texture
/// - 1: sampler
/// - 2: `LightUniform`
///
/// Every light gets its own uniform buffer and bind group so all lights can be
/// recorded into one encoder before submission.
#[derive(Default)]
pub struct LightAccumPass {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    uniforms: Vec<wgpu::Buffer>,
    bind_groups: Vec<wgpu::BindGroup>,
    bound_generation: Option<u64>,
}

impl LightAccumPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("umbra light accumulation shader"),
            source: wgpu::ShaderSource::Wgsl(LIGHT_ACCUM_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra light accumulation bgl"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<LightUniform>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("umbra light accumulation pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("umbra light accumulation pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive_state(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("light accumulation pipeline created for {format:?}");

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_groups.clear();
        self.bound_generation = None;
    }

    /// Uploads one uniform per light and makes sure bind groups point at the
    /// current targets.
    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        targets: &AccumulationTargets,
        lights: &[LightUniform],
    ) {
        self.ensure_static_buffers(device);

        if self.sampler.is_none() {
            // Source and destination have identical sizes; nearest reads back exact texels.
            self.sampler = Some(create_sampler(
                device,
                "umbra accumulator sampler",
                wgpu::FilterMode::Nearest,
            ));
        }

        while self.uniforms.len() < lights.len() {
            let index = self.uniforms.len();
            self.uniforms.push(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("umbra light ubo {index}")),
                size: std::mem::size_of::<LightUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }

        let stale = self.bound_generation != Some(targets.generation())
            || self.bind_groups.len() < self.uniforms.len();
        if stale {
            self.rebuild_bind_groups(device, targets);
        }

        for (ubo, light) in self.uniforms.iter().zip(lights) {
            queue.write_buffer(ubo, 0, bytemuck::bytes_of(light));
        }
    }

    /// Records the accumulation for `light` into `view` (the destination target).
    pub(super) fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        light: usize,
    ) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_groups.get(light) else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        // Every texel is rewritten by the fullscreen quad.
        let load = wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT);
        let mut rpass = begin_pass(encoder, "umbra light accumulation pass", view, load);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    fn rebuild_bind_groups(&mut self, device: &wgpu::Device, targets: &AccumulationTargets) {
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        self.bind_groups = self
            .uniforms
            .iter()
            .enumerate()
            .map(|(light, ubo)| {
                let source = targets.view(AccumulationTargets::source_index(light));
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("umbra light accumulation bind group"),
                    layout: bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(source),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: ubo.as_entire_binding(),
                        },
                    ],
                })
            })
            .collect();

        self.bound_generation = Some(targets.generation());
    }

    fn ensure_static_buffers(&mut self, device: &wgpu::Device) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("umbra fullscreen quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("umbra fullscreen quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}
