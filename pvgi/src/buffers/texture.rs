use glam::UVec2;
use log::debug;

use crate::Bindable;

/// Two-dimensional texture owned by the renderer (injection buffers, indirect
/// lighting).
#[derive(Debug)]
pub struct Texture {
    format: wgpu::TextureFormat,
    view: wgpu::TextureView,
}

impl Texture {
    pub fn builder(label: impl ToString) -> TextureBuilder {
        TextureBuilder {
            label: label.to_string(),
            size: None,
            format: None,
            usage: wgpu::TextureUsages::empty(),
        }
    }

    /// Creates an immutable texture binding that can be read with
    /// `textureLoad()`.
    pub fn bind_readable(&self) -> impl Bindable + '_ {
        TextureBinder {
            parent: self,
            access: None,
        }
    }

    /// Creates a write-only storage binding.
    pub fn bind_writable(&self) -> impl Bindable + '_ {
        TextureBinder {
            parent: self,
            access: Some(wgpu::StorageTextureAccess::WriteOnly),
        }
    }
}

pub struct TextureBuilder {
    label: String,
    size: Option<UVec2>,
    format: Option<wgpu::TextureFormat>,
    usage: wgpu::TextureUsages,
}

impl TextureBuilder {
    pub fn with_size(mut self, size: UVec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.usage |= usage;
        self
    }

    pub fn build(self, device: &wgpu::Device) -> Texture {
        let label = format!("pvgi_{}", self.label);
        let size = self.size.unwrap_or(UVec2::ONE).max(UVec2::ONE);
        let format = self.format.unwrap_or(wgpu::TextureFormat::Rgba16Float);

        debug!(
            "Allocating texture `{label}`; size={}x{}, format={format:?}",
            size.x, size.y
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: self.usage,
            view_formats: &[],
        });

        let view = texture.create_view(&Default::default());

        Texture { format, view }
    }
}

struct TextureBinder<'a> {
    parent: &'a Texture,
    access: Option<wgpu::StorageTextureAccess>,
}

impl Bindable for TextureBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let ty = if let Some(access) = self.access {
            wgpu::BindingType::StorageTexture {
                access,
                format: self.parent.format,
                view_dimension: wgpu::TextureViewDimension::D2,
            }
        } else {
            wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: false,
                },
            }
        };

        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty,
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(&self.parent.view);

        vec![(layout, resource)]
    }
}
