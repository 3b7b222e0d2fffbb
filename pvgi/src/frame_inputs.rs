use glam::Mat4;

/// Per-frame inputs provided by the host.
///
/// All textures are expected to have the size of
/// [`crate::GiConfig::resolution`] and stay untouched by the renderer.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Directly-lit image (`texture_2d<f32>`, e.g. `Rgba16Float`)
    pub color: &'a wgpu::TextureView,

    /// Depth buffer (`texture_depth_2d`), `[0, 1]` with `1.0` being the far
    /// plane
    pub depth: &'a wgpu::TextureView,

    /// View-space normals (`texture_2d<f32>`)
    pub normals: &'a wgpu::TextureView,

    /// Camera-to-world transform
    pub inverse_view: Mat4,

    /// Clip-to-camera transform
    pub inverse_projection: Mat4,
}
