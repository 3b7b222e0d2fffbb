use glam::uvec3;

use crate::{
    Engine, FrameInputs, GiBuffers, GiComputePass, GiConfig, GiController,
    HostTexture, HostTextures,
};

#[derive(Debug)]
pub struct SceneCapturePass {
    host: HostTextures,
    pass: GiComputePass,
}

impl SceneCapturePass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        _: &GiConfig,
        buffers: &GiBuffers,
    ) -> Self {
        let host = HostTextures::new(
            device,
            "scene_capture_host",
            [HostTexture::Color, HostTexture::Depth, HostTexture::Normals],
        );

        let pass = GiComputePass::builder("scene_capture")
            .bind([
                &buffers.frame,
                &buffers.lighting.bind_writable(),
                &buffers.positions.bind_writable(),
                &buffers.normals.bind_writable(),
            ])
            .bind_external(host.layout())
            .build(device, &engine.shaders.scene_capture);

        Self { host, pass }
    }

    pub fn run(
        &self,
        controller: &GiController,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        inputs: &FrameInputs,
    ) {
        let host = self.host.bind(device, inputs);
        let size = controller.config().injection_resolution;

        self.pass.run(
            encoder,
            0,
            &[&host],
            uvec3((size.x + 7) / 8, (size.y + 7) / 8, 1),
            (),
        );
    }
}
