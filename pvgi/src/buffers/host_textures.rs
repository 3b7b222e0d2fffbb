use log::debug;

use crate::FrameInputs;

/// Texture provided by the host through [`FrameInputs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostTexture {
    Color,
    Depth,
    Normals,
}

impl HostTexture {
    fn sample_type(&self) -> wgpu::TextureSampleType {
        match self {
            HostTexture::Color | HostTexture::Normals => {
                wgpu::TextureSampleType::Float { filterable: false }
            }
            HostTexture::Depth => wgpu::TextureSampleType::Depth,
        }
    }

    fn view<'a>(&self, inputs: &FrameInputs<'a>) -> &'a wgpu::TextureView {
        match self {
            HostTexture::Color => inputs.color,
            HostTexture::Depth => inputs.depth,
            HostTexture::Normals => inputs.normals,
        }
    }
}

/// Bind group of textures owned by the host.
///
/// Host is free to hand over different textures each frame, so only the layout
/// is created up front and the bind group itself is rebuilt on every
/// [`HostTextures::bind()`].
#[derive(Debug)]
pub struct HostTextures {
    label: String,
    textures: Vec<HostTexture>,
    layout: wgpu::BindGroupLayout,
}

impl HostTextures {
    pub fn new(
        device: &wgpu::Device,
        label: impl ToString,
        textures: impl IntoIterator<Item = HostTexture>,
    ) -> Self {
        let label = format!("pvgi_{}", label.to_string());
        let textures: Vec<_> = textures.into_iter().collect();

        debug!("Initializing host textures `{label}`: {textures:?}");

        let entries: Vec<_> = textures
            .iter()
            .enumerate()
            .map(|(binding, texture)| wgpu::BindGroupLayoutEntry {
                binding: binding as _,
                visibility: wgpu::ShaderStages::FRAGMENT
                    | wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: texture.sample_type(),
                },
                count: None,
            })
            .collect();

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                entries: &entries,
            });

        Self {
            label,
            textures,
            layout,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind(
        &self,
        device: &wgpu::Device,
        inputs: &FrameInputs,
    ) -> wgpu::BindGroup {
        let entries: Vec<_> = self
            .textures
            .iter()
            .enumerate()
            .map(|(binding, texture)| wgpu::BindGroupEntry {
                binding: binding as _,
                resource: wgpu::BindingResource::TextureView(
                    texture.view(inputs),
                ),
            })
            .collect();

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&self.label),
            layout: &self.layout,
            entries: &entries,
        })
    }
}
