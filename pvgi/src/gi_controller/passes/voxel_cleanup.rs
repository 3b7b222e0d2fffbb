use glam::uvec3;

use crate::{
    gpu, Engine, GiBuffers, GiComputePass, GiConfig, GiController, Variants,
};

/// Fades out voxels of all cascade levels, one dispatch per level.
#[derive(Debug)]
pub struct VoxelCleanupPass {
    pass: GiComputePass<gpu::VoxelPassParams>,
}

impl VoxelCleanupPass {
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

        let pass = GiComputePass::builder("voxel_cleanup")
            .bind([&buffers.frame])
            .bind([&levels])
            .build(device, &engine.shaders.voxel_cleanup);

        Self { pass }
    }

    pub fn run(
        &self,
        controller: &GiController,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let cascade = controller.buffers().volume.cascade();

        for level in 0..cascade.levels() {
            let resolution = cascade.level_resolution(level);
            let groups = (resolution + 3) / 4;

            self.pass.run(
                encoder,
                level as usize,
                &[],
                uvec3(groups, groups, groups),
                gpu::VoxelPassParams { level, resolution },
            );
        }
    }
}
