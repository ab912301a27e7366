use super::common::{begin_pass, create_sampler, primitive_state, sampler_entry, texture_entry};
use super::shaders::composite_module_source;

/// Sums two textures onto the output target.
///
/// Binding layout (group 0): 0 texture A, 1 sampler A, 2 texture B, 3 sampler B.
/// The renderer binds the scene as A and the lit accumulator as B.
#[derive(Default)]
pub struct CompositePass {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler_a: Option<wgpu::Sampler>,
    sampler_b: Option<wgpu::Sampler>,
}

impl CompositePass {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let source = composite_module_source();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("umbra composite shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra composite bgl"),
            entries: &[texture_entry(0), sampler_entry(1), texture_entry(2), sampler_entry(3)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("umbra composite pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("umbra composite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fullscreen"),
                compilation_options: Default::default(),
                buffers: &[],
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

        log::debug!("composite pipeline created for {format:?}");

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        if self.sampler_a.is_none() {
            self.sampler_a = Some(create_sampler(device, "umbra composite sampler a", wgpu::FilterMode::Linear));
        }
        if self.sampler_b.is_none() {
            self.sampler_b = Some(create_sampler(device, "umbra composite sampler b", wgpu::FilterMode::Linear));
        }
    }

    /// Records `a + b` onto `target`.
    ///
    /// The bind group is rebuilt per call since `a` is owned by the caller and may
    /// change between frames.
    pub(super) fn record(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        a: &wgpu::TextureView,
        b: &wgpu::TextureView,
    ) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler_a) = self.sampler_a.as_ref() else { return };
        let Some(sampler_b) = self.sampler_b.as_ref() else { return };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("umbra composite bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(a),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler_a),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(b),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler_b),
                },
            ],
        });

        let mut rpass = begin_pass(encoder, "umbra composite pass", target, wgpu::LoadOp::Load);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
