use glam::uvec3;

use crate::{
    gpu, Engine, GiBuffers, GiComputePass, GiConfig, GiController, Variants,
};

/// Scatters injection buffers into all cascade levels, one dispatch per
/// level.
#[derive(Debug)]
pub struct VoxelInjectionPass {
    pass: GiComputePass<gpu::VoxelPassParams>,
}

impl VoxelInjectionPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        _: &GiConfig,
        buffers: &GiBuffers,
    ) -> Self {
        let levels = Variants::new(
            buffers
                .volume
                .levels()
                .iter()
                .map(|level| level.bind_storage()),
        );

        let pass = GiComputePass::builder("voxel_injection")
            .bind([
                &buffers.frame,
                &buffers.lighting.bind_readable(),
                &buffers.positions.bind_readable(),
            ])
            .bind([&levels])
            .build(device, &engine.shaders.voxel_injection);

        Self { pass }
    }

    pub fn run(
        &self,
        controller: &GiController,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let size = controller.config().injection_resolution;
        let cascade = controller.buffers().volume.cascade();

        for level in 0..cascade.levels() {
            self.pass.run(
                encoder,
                level as usize,
                &[],
                uvec3((size.x + 7) / 8, (size.y + 7) / 8, 1),
                gpu::VoxelPassParams {
                    level,
                    resolution: cascade.level_resolution(level),
                },
            );
        }
    }
}
