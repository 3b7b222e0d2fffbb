use log::debug;

use crate::Bindable;

/// Format of voxel volumes: premultiplied color in `rgb`, occupancy in `a`.
pub const VOLUME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Cubic, three-dimensional texture holding a single cascade level.
#[derive(Debug)]
pub struct VolumeTexture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl VolumeTexture {
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        resolution: u32,
    ) -> Self {
        let label = label.as_ref();

        debug!(
            "Allocating volume texture `{label}`; resolution={resolution}^3"
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: resolution,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: VOLUME_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&Default::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label}_sampler")),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { view, sampler }
    }

    /// Creates a read-write storage binding, for passes that update voxels
    /// in place.
    pub fn bind_storage(&self) -> impl Bindable + '_ {
        StorageVolumeBinder { parent: self }
    }

    /// Creates a texture binding readable with `textureLoad()`.
    pub fn bind_readable(&self) -> impl Bindable + '_ {
        ReadableVolumeBinder {
            parent: self,
            sampled: false,
        }
    }

    /// Creates a texture binding together with a trilinear sampler.
    pub fn bind_sampled(&self) -> impl Bindable + '_ {
        ReadableVolumeBinder {
            parent: self,
            sampled: true,
        }
    }
}

struct StorageVolumeBinder<'a> {
    parent: &'a VolumeTexture,
}

impl Bindable for StorageVolumeBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::ReadWrite,
                format: VOLUME_FORMAT,
                view_dimension: wgpu::TextureViewDimension::D3,
            },
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(&self.parent.view);

        vec![(layout, resource)]
    }
}

struct ReadableVolumeBinder<'a> {
    parent: &'a VolumeTexture,
    sampled: bool,
}

impl Bindable for ReadableVolumeBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let tex_layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D3,
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: self.sampled,
                },
            },
            count: None,
        };

        let tex_resource =
            wgpu::BindingResource::TextureView(&self.parent.view);

        if !self.sampled {
            return vec![(tex_layout, tex_resource)];
        }

        let sampler_layout = wgpu::BindGroupLayoutEntry {
            binding: binding + 1,
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let sampler_resource =
            wgpu::BindingResource::Sampler(&self.parent.sampler);

        vec![
            (tex_layout, tex_resource),
            (sampler_layout, sampler_resource),
        ]
    }
}
