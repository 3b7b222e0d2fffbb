use glam::Mat4;

use crate::reference::CpuImage;

/// CPU counterpart of [`crate::FrameInputs`].
#[derive(Clone, Debug)]
pub struct HostFrame {
    /// Directly-lit image
    pub color: CpuImage,

    /// Depth buffer, in the `x` channel
    pub depth: CpuImage,

    /// View-space normals, in `xyz`
    pub normals: CpuImage,

    pub inverse_view: Mat4,
    pub inverse_projection: Mat4,
}
