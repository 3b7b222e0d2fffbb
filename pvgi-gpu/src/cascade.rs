use glam::Vec3;

use crate::{VoxelGrid, CASCADE_LEVELS};

/// Ladder of voxel grids sharing the same world-space cube, each level having
/// half the resolution of the previous one.
///
/// Level 0 is the finest one; tracing moves towards coarser levels as the cone
/// widens, which gives finer near-field and coarser far-field lighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cascade {
    center: Vec3,
    boundary: f32,
    highest_resolution: u32,
}

impl Cascade {
    pub fn new(center: Vec3, boundary: f32, highest_resolution: u32) -> Self {
        Self {
            center,
            boundary,
            highest_resolution,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn boundary(&self) -> f32 {
        self.boundary
    }

    pub fn levels(&self) -> u32 {
        CASCADE_LEVELS as u32
    }

    pub fn level_resolution(&self, level: u32) -> u32 {
        self.highest_resolution >> level
    }

    pub fn grid(&self, level: u32) -> VoxelGrid {
        VoxelGrid::new(
            self.center,
            self.boundary,
            self.level_resolution(level),
        )
    }

    pub fn grids(&self) -> impl Iterator<Item = VoxelGrid> + '_ {
        (0..self.levels()).map(|level| self.grid(level))
    }

    pub fn finest_cell_size(&self) -> f32 {
        self.grid(0).cell_size()
    }

    /// Returns the level whose voxel size matches given diameter the closest;
    /// saturates at the coarsest level.
    pub fn level_for_diameter(&self, diameter: f32) -> u32 {
        let ratio = diameter / self.finest_cell_size();

        if ratio <= 1.0 {
            return 0;
        }

        ((ratio.log2() + 0.5).floor() as u32).min(self.levels() - 1)
    }
}
