use std::array;

use glam::uvec3;

use crate::{gpu, Engine, GiBuffers, GiComputePass, GiConfig, GiController};

#[derive(Debug)]
pub struct VoxelTracingPass {
    pass: GiComputePass,
}

impl VoxelTracingPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        _: &GiConfig,
        buffers: &GiBuffers,
    ) -> Self {
        let levels: [_; gpu::CASCADE_LEVELS] = array::from_fn(|level| {
            buffers.volume.level(level as u32).bind_sampled()
        });

        let pass = GiComputePass::builder("voxel_tracing")
            .bind([
                &buffers.frame,
                &buffers.positions.bind_readable(),
                &buffers.normals.bind_readable(),
                &buffers.indirect.bind_writable(),
            ])
            .bind([
                &levels[0],
                &levels[1],
                &levels[2],
                &levels[3],
                &levels[4],
            ])
            .build(device, &engine.shaders.voxel_tracing);

        Self { pass }
    }

    pub fn run(
        &self,
        controller: &GiController,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let size = controller.config().resolution;

        self.pass.run(
            encoder,
            0,
            &[],
            uvec3((size.x + 7) / 8, (size.y + 7) / 8, 1),
            (),
        );
    }
}
