use std::mem;
use std::ops::Range;

use log::debug;

use crate::{
    gpu, BindGroup, Engine, FrameInputs, GiBuffers, GiConfig, GiController,
    HostTexture, HostTextures,
};

#[derive(Debug)]
pub struct FrameCompositionPass {
    bg0: BindGroup,
    host: HostTextures,
    pipeline: wgpu::RenderPipeline,
}

impl FrameCompositionPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        config: &GiConfig,
        buffers: &GiBuffers,
    ) -> Self {
        debug!("Initializing pass: frame_composition");

        let levels = buffers.volume.levels();

        let bg0 = BindGroup::builder("frame_composition_bg0")
            .add(&buffers.frame)
            .add(&buffers.indirect.bind_readable())
            .add(&buffers.positions.bind_readable())
            .add(&levels[0].bind_readable())
            .add(&levels[1].bind_readable())
            .add(&levels[2].bind_readable())
            .add(&levels[3].bind_readable())
            .add(&levels[4].bind_readable())
            .build(device);

        let host = HostTextures::new(
            device,
            "frame_composition_host",
            [HostTexture::Color],
        );

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("pvgi_frame_composition_pipeline_layout"),
                bind_group_layouts: &[bg0.layout(), host.layout()],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::FRAGMENT,
                    range: Range {
                        start: 0,
                        end: mem::size_of::<gpu::FrameCompositionPassParams>()
                            as u32,
                    },
                }],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("pvgi_frame_composition_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &engine.shaders.frame_composition,
                    entry_point: "main_vs",
                    buffers: &[],
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &engine.shaders.frame_composition,
                    entry_point: "main_fs",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        Self {
            bg0,
            host,
            pipeline,
        }
    }

    pub fn run(
        &self,
        controller: &GiController,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        inputs: &FrameInputs,
        target: &wgpu::TextureView,
    ) {
        let host = self.host.bind(device, inputs);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pvgi_frame_composition_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });

        let params = gpu::FrameCompositionPassParams {
            mode: controller.config().composition_mode().serialize(),
        };

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.bg0.get(0), &[]);
        pass.set_bind_group(1, &host, &[]);
        pass.set_push_constants(
            wgpu::ShaderStages::FRAGMENT,
            0,
            bytemuck::bytes_of(&params),
        );
        pass.draw(0..3, 0..1);
    }
}
