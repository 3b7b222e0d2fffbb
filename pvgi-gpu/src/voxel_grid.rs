use glam::{UVec3, Vec3};

/// Maps world-space positions into a cubic grid of voxels and back.
///
/// The grid covers `[center - boundary / 2, center + boundary / 2]` on every
/// axis and splits it into `resolution` cells per axis. The mapping is purely
/// linear - it doesn't clamp nor reject positions laying outside the cube, so
/// callers that scatter into voxels should go through [`Self::voxel_id()`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelGrid {
    center: Vec3,
    boundary: f32,
    resolution: u32,
}

impl VoxelGrid {
    pub fn new(center: Vec3, boundary: f32, resolution: u32) -> Self {
        Self {
            center,
            boundary,
            resolution,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn boundary(&self) -> f32 {
        self.boundary
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the number of voxels in this grid.
    pub fn len(&self) -> usize {
        (self.resolution as usize).pow(3)
    }

    /// Returns length of a single voxel's edge, in world units.
    pub fn cell_size(&self) -> f32 {
        self.boundary / (self.resolution as f32)
    }

    /// Returns the world-space corner at voxel `(0, 0, 0)`.
    pub fn min(&self) -> Vec3 {
        self.center - Vec3::splat(0.5 * self.boundary)
    }

    /// Given a point in world-coordinates, returns it in voxel-coordinates,
    /// i.e. in `[0, resolution)` for points inside the grid.
    pub fn world_to_voxel(&self, pos: Vec3) -> Vec3 {
        (pos - self.min()) / self.cell_size()
    }

    /// Given a point in voxel-coordinates, returns it in world-coordinates.
    ///
    /// See: [`Self::world_to_voxel()`].
    pub fn voxel_to_world(&self, voxel: Vec3) -> Vec3 {
        self.min() + voxel * self.cell_size()
    }

    /// Given a point in world-coordinates, returns it in normalized texture
    /// coordinates (`[0, 1]` inside the grid).
    pub fn world_to_uvw(&self, pos: Vec3) -> Vec3 {
        (pos - self.min()) / self.boundary
    }

    /// Returns world-space center of given voxel.
    pub fn voxel_center(&self, id: UVec3) -> Vec3 {
        self.voxel_to_world(id.as_vec3() + Vec3::splat(0.5))
    }

    /// Returns the voxel containing given point, or `None` if the point lays
    /// outside the grid.
    pub fn voxel_id(&self, pos: Vec3) -> Option<UVec3> {
        let voxel = self.world_to_voxel(pos).floor();
        let resolution = self.resolution as f32;

        if voxel.cmpge(Vec3::ZERO).all()
            && voxel.cmplt(Vec3::splat(resolution)).all()
        {
            Some(voxel.as_uvec3())
        } else {
            None
        }
    }

    /// Returns a unique index for given voxel; used to index flat, CPU-side
    /// copies of the grid.
    pub fn voxel_idx(&self, id: UVec3) -> usize {
        let res = self.resolution as usize;

        (id.z as usize * res + id.y as usize) * res + id.x as usize
    }

    /// Inverse of [`Self::voxel_idx()`].
    pub fn voxel_id_from_idx(&self, idx: usize) -> UVec3 {
        let res = self.resolution as usize;

        UVec3::new(
            (idx % res) as u32,
            ((idx / res) % res) as u32,
            (idx / (res * res)) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec3, vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn grids() -> impl Iterator<Item = VoxelGrid> {
        [
            VoxelGrid::new(Vec3::ZERO, 10.0, 256),
            VoxelGrid::new(Vec3::ZERO, 10.0, 16),
            VoxelGrid::new(vec3(3.0, -1.5, 12.0), 25.0, 64),
            VoxelGrid::new(vec3(-100.0, 0.0, 0.5), 0.75, 32),
        ]
        .into_iter()
    }

    #[test]
    fn mapping() {
        let target = VoxelGrid::new(Vec3::ZERO, 10.0, 32);

        assert_eq!(Vec3::ZERO, target.world_to_voxel(vec3(-5.0, -5.0, -5.0)));
        assert_eq!(Vec3::splat(16.0), target.world_to_voxel(Vec3::ZERO));
        assert_eq!(Vec3::splat(32.0), target.world_to_voxel(Vec3::splat(5.0)));
        assert_eq!(0.3125, target.cell_size());

        assert_eq!(Some(uvec3(16, 16, 16)), target.voxel_id(Vec3::ZERO));
        assert_eq!(
            Some(uvec3(0, 31, 16)),
            target.voxel_id(vec3(-5.0, 4.9, 0.1))
        );
        assert_eq!(None, target.voxel_id(vec3(5.0, 0.0, 0.0)));
        assert_eq!(None, target.voxel_id(vec3(0.0, -5.1, 0.0)));
    }

    #[test]
    fn round_trip() {
        for target in grids() {
            let res = target.resolution();

            for id in [
                uvec3(0, 0, 0),
                uvec3(res - 1, 0, res / 2),
                uvec3(res / 3, res - 1, 1),
                uvec3(res - 1, res - 1, res - 1),
            ] {
                let voxel = id.as_vec3() + Vec3::splat(0.25);
                let actual =
                    target.world_to_voxel(target.voxel_to_world(voxel));

                assert_relative_eq!(voxel.x, actual.x, epsilon = 1e-3);
                assert_relative_eq!(voxel.y, actual.y, epsilon = 1e-3);
                assert_relative_eq!(voxel.z, actual.z, epsilon = 1e-3);

                assert_eq!(Some(id), target.voxel_id(target.voxel_center(id)));
            }
        }
    }

    #[test]
    fn points_inside_map_into_grid() {
        let mut rng = StdRng::seed_from_u64(1234);

        for target in grids() {
            let half = 0.5 * target.boundary() * (1.0 - 1e-4);
            let res = target.resolution() as f32;

            for _ in 0..2048 {
                let offset = vec3(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                );

                let voxel = target.world_to_voxel(target.center() + offset);

                assert!(voxel.cmpge(Vec3::ZERO).all(), "{voxel:?}");
                assert!(voxel.cmplt(Vec3::splat(res)).all(), "{voxel:?}");
                assert!(target.voxel_id(target.center() + offset).is_some());
            }
        }
    }

    #[test]
    fn voxel_idx() {
        let target = VoxelGrid::new(Vec3::ZERO, 1.0, 16);

        assert_eq!(0, target.voxel_idx(uvec3(0, 0, 0)));
        assert_eq!(1, target.voxel_idx(uvec3(1, 0, 0)));
        assert_eq!(16, target.voxel_idx(uvec3(0, 1, 0)));
        assert_eq!(256, target.voxel_idx(uvec3(0, 0, 1)));
        assert_eq!(target.len() - 1, target.voxel_idx(uvec3(15, 15, 15)));

        for idx in [0, 1, 17, 300, 4095] {
            assert_eq!(idx, target.voxel_idx(target.voxel_id_from_idx(idx)));
        }
    }
}
