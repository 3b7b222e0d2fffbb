use glam::{UVec3, Vec3, Vec4, Vec4Swizzles};

use crate::{lerp, Voxel, VoxelGrid};

/// Single texel of the injection buffers, i.e. a lit surface point observed by
/// the camera this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InjectionSample {
    pub position: Vec3,
    pub color: Vec3,
}

impl InjectionSample {
    /// Decodes sample from the position- and lighting-buffers; returns `None`
    /// for background texels.
    pub fn new(position: Vec4, lighting: Vec4) -> Option<Self> {
        if position.w <= 0.0 {
            return None;
        }

        Some(Self {
            position: position.xyz(),
            color: lighting.xyz(),
        })
    }
}

/// Scatters injection samples into a single voxel grid.
///
/// Multiple samples can land in the same voxel within a single dispatch - each
/// invocation blends its sample with the value the voxel had when the dispatch
/// began and the last write wins.
#[derive(Clone, Copy, Debug)]
pub struct VoxelInjection {
    grid: VoxelGrid,
    temporal_blend: f32,
}

impl VoxelInjection {
    pub fn new(grid: VoxelGrid, temporal_blend: f32) -> Self {
        Self {
            grid,
            temporal_blend,
        }
    }

    /// Returns the voxel given sample should be written into, or `None` if the
    /// sample lays outside of the volume.
    pub fn target(&self, sample: &InjectionSample) -> Option<UVec3> {
        self.grid.voxel_id(sample.position)
    }

    /// Blends sample into voxel's previous value.
    ///
    /// Since both channels move towards the sample by the same amount, the
    /// result never exceeds `max(prev, sample)` - the volume can't accumulate
    /// light past what a single frame injects.
    pub fn inject(&self, prev: Voxel, sample: &InjectionSample) -> Voxel {
        let curr = Voxel::new(sample.color, 1.0);

        Voxel::deserialize(lerp(
            prev.serialize(),
            curr.serialize(),
            self.temporal_blend,
        ))
    }
}
