use glam::{UVec3, Vec3, Vec4};

use crate::gpu;

/// CPU counterpart of [`crate::VoxelVolume`]: a flat array of voxels per
/// cascade level, indexed with [`gpu::VoxelGrid::voxel_idx()`].
#[derive(Clone, Debug, PartialEq)]
pub struct CpuVolume {
    cascade: gpu::Cascade,
    levels: Vec<Vec<Vec4>>,
}

impl CpuVolume {
    /// Creates an empty volume.
    pub fn new(cascade: gpu::Cascade) -> Self {
        let levels = cascade
            .grids()
            .map(|grid| vec![Vec4::ZERO; grid.len()])
            .collect();

        Self { cascade, levels }
    }

    pub fn cascade(&self) -> gpu::Cascade {
        self.cascade
    }

    /// Moves the volume to another place in the world, keeping voxels as they
    /// are.
    ///
    /// # Panics
    ///
    /// Panics if `cascade` has a different resolution.
    pub fn relocate(&mut self, cascade: gpu::Cascade) {
        assert_eq!(
            self.cascade.level_resolution(0),
            cascade.level_resolution(0)
        );

        self.cascade = cascade;
    }

    pub fn get(&self, level: u32, id: UVec3) -> gpu::Voxel {
        let grid = self.cascade.grid(level);

        gpu::Voxel::deserialize(self.levels[level as usize][grid.voxel_idx(id)])
    }

    pub fn set(&mut self, level: u32, id: UVec3, voxel: gpu::Voxel) {
        let grid = self.cascade.grid(level);

        self.levels[level as usize][grid.voxel_idx(id)] = voxel.serialize();
    }

    /// Applies given function to every voxel of given level.
    pub fn update(
        &mut self,
        level: u32,
        mut f: impl FnMut(gpu::Voxel) -> gpu::Voxel,
    ) {
        for voxel in &mut self.levels[level as usize] {
            *voxel = f(gpu::Voxel::deserialize(*voxel)).serialize();
        }
    }

    /// Returns all voxels of given level.
    pub fn voxels(
        &self,
        level: u32,
    ) -> impl Iterator<Item = (UVec3, gpu::Voxel)> + '_ {
        let grid = self.cascade.grid(level);

        self.levels[level as usize]
            .iter()
            .enumerate()
            .map(move |(idx, voxel)| {
                (grid.voxel_id_from_idx(idx), gpu::Voxel::deserialize(*voxel))
            })
    }

    /// Returns whether all voxels of all levels are empty.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().flatten().all(|voxel| *voxel == Vec4::ZERO)
    }

    /// Returns the voxel containing given point, without any filtering; `None`
    /// outside the volume.
    pub fn lookup(&self, level: u32, pos: Vec3) -> Option<gpu::Voxel> {
        let id = self.cascade.grid(level).voxel_id(pos)?;

        Some(self.get(level, id))
    }
}

impl gpu::VoxelSampler for CpuVolume {
    /// Trilinear sampling that matches GPU's linear filtering with texel
    /// centers at `+0.5` and clamp-to-edge addressing; outside the volume
    /// everything's empty.
    fn sample(&self, level: u32, pos: Vec3) -> gpu::Voxel {
        let grid = self.cascade.grid(level);
        let uvw = grid.world_to_uvw(pos);

        if uvw.cmplt(Vec3::ZERO).any() || uvw.cmpgt(Vec3::ONE).any() {
            return Default::default();
        }

        let max = Vec3::splat((grid.resolution() - 1) as f32);
        let coord = uvw * grid.resolution() as f32 - Vec3::splat(0.5);
        let base = coord.floor();
        let frac = coord - base;
        let mut voxel = Vec4::ZERO;

        for corner in 0..8 {
            let offset = UVec3::new(corner & 1, (corner >> 1) & 1, corner >> 2);

            let weight = Vec3::select(
                offset.cmpeq(UVec3::ZERO),
                Vec3::ONE - frac,
                frac,
            );

            let id = (base + offset.as_vec3())
                .clamp(Vec3::ZERO, max)
                .as_uvec3();

            voxel += self.levels[level as usize][grid.voxel_idx(id)]
                * (weight.x * weight.y * weight.z);
        }

        gpu::Voxel::deserialize(voxel)
    }
}
