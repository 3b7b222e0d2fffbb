use glam::{Vec3, Vec4, Vec4Swizzles};

/// Contents of a single voxel.
///
/// Color is stored premultiplied by occupancy - a voxel that's been observed
/// once with `temporal_blend = 0.5` holds half of the observed color and half
/// of the full occupancy - which lets tracing composite voxels front-to-back
/// without dividing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Voxel {
    pub color: Vec3,
    pub occupancy: f32,
}

impl Voxel {
    pub fn new(color: Vec3, occupancy: f32) -> Self {
        Self { color, occupancy }
    }

    pub fn serialize(&self) -> Vec4 {
        self.color.extend(self.occupancy)
    }

    pub fn deserialize(d0: Vec4) -> Self {
        Self {
            color: d0.xyz(),
            occupancy: d0.w,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy <= 0.0
    }
}
