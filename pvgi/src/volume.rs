use log::info;

use crate::{gpu, Error, Result, VolumeTexture};

/// Voxel cascade living on the GPU: one [`VolumeTexture`] per level, from the
/// finest to the coarsest one.
///
/// Volumes start zeroed (i.e. empty) and get cleared only by decay; dropping
/// the volume releases all of its textures.
#[derive(Debug)]
pub struct VoxelVolume {
    cascade: gpu::Cascade,
    levels: Vec<VolumeTexture>,
}

impl VoxelVolume {
    pub fn new(device: &wgpu::Device, cascade: gpu::Cascade) -> Result<Self> {
        let resolution = cascade.level_resolution(0);

        if !resolution.is_power_of_two()
            || resolution < gpu::MIN_VOXEL_RESOLUTION
        {
            return Err(Error::InvalidVoxelResolution(resolution));
        }

        let limit = device.limits().max_texture_dimension_3d;

        if resolution > limit {
            return Err(Error::VoxelResolutionExceedsLimit {
                resolution,
                limit,
            });
        }

        info!(
            "Allocating voxel volume; resolution={resolution}^3, levels={}, \
             boundary={}",
            cascade.levels(),
            cascade.boundary(),
        );

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let levels: Vec<_> = cascade
            .grids()
            .enumerate()
            .map(|(level, grid)| {
                VolumeTexture::new(
                    device,
                    format!("pvgi_voxels_l{level}"),
                    grid.resolution(),
                )
            })
            .collect();

        let validation_error = pollster::block_on(device.pop_error_scope());
        let oom_error = pollster::block_on(device.pop_error_scope());

        if let Some(err) = oom_error.or(validation_error) {
            return Err(Error::VolumeAllocation {
                label: "pvgi_voxels".into(),
                message: err.to_string(),
            });
        }

        Ok(Self { cascade, levels })
    }

    pub fn cascade(&self) -> gpu::Cascade {
        self.cascade
    }

    /// Moves the volume to another place in the world, keeping voxels as they
    /// are (they fade out over the next frames).
    ///
    /// # Panics
    ///
    /// Panics if `cascade` has a different resolution; changing it requires
    /// allocating a new volume.
    pub fn relocate(&mut self, cascade: gpu::Cascade) {
        assert_eq!(
            self.cascade.level_resolution(0),
            cascade.level_resolution(0)
        );

        self.cascade = cascade;
    }

    /// Returns textures of all levels, finest first.
    pub fn levels(&self) -> &[VolumeTexture] {
        &self.levels
    }

    pub fn level(&self, level: u32) -> &VolumeTexture {
        &self.levels[level as usize]
    }
}
