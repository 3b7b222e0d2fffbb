use bytemuck::{Pod, Zeroable};

/// Push constants of passes dispatched once per cascade level.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct VoxelPassParams {
    pub level: u32,
    pub resolution: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct FrameCompositionPassParams {
    pub mode: u32,
}
