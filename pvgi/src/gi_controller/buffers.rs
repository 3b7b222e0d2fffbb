use glam::{Mat4, UVec2};
use log::debug;

use crate::{
    gpu, Error, GiConfig, MappedUniformBuffer, Result, Texture, VoxelVolume,
};

#[derive(Debug)]
pub struct GiBuffers {
    pub frame: MappedUniformBuffer<gpu::Frame>,

    /// Host's color, resampled into the injection resolution
    pub lighting: Texture,

    /// World-space positions, `w = 1.0` for geometry and `0.0` for background
    pub positions: Texture,

    /// World-space normals
    pub normals: Texture,

    /// Output of voxel tracing: indirect light in `rgb`, visibility in `a`
    pub indirect: Texture,

    pub volume: VoxelVolume,
}

impl GiBuffers {
    pub fn new(device: &wgpu::Device, config: &GiConfig) -> Result<Self> {
        debug!("Initializing controller buffers");

        let limit = device.limits().max_texture_dimension_2d;

        for (label, size) in [
            ("output", config.resolution),
            ("injection", config.injection_resolution),
        ] {
            check_texture_size(label, size, limit)?;
        }

        let frame = MappedUniformBuffer::new(
            device,
            "pvgi_frame",
            config.serialize(Mat4::IDENTITY, Mat4::IDENTITY),
        );

        let injection_buffer = |label: &str| {
            Texture::builder(label)
                .with_size(config.injection_resolution)
                .with_format(wgpu::TextureFormat::Rgba32Float)
                .with_usage(wgpu::TextureUsages::TEXTURE_BINDING)
                .with_usage(wgpu::TextureUsages::STORAGE_BINDING)
                .build(device)
        };

        let lighting = injection_buffer("lighting");
        let positions = injection_buffer("positions");
        let normals = injection_buffer("normals");

        let indirect = Texture::builder("indirect")
            .with_size(config.resolution)
            .with_format(wgpu::TextureFormat::Rgba16Float)
            .with_usage(wgpu::TextureUsages::TEXTURE_BINDING)
            .with_usage(wgpu::TextureUsages::STORAGE_BINDING)
            .build(device);

        let volume = VoxelVolume::new(device, config.cascade())?;

        Ok(Self {
            frame,
            lighting,
            positions,
            normals,
            indirect,
            volume,
        })
    }
}

fn check_texture_size(
    label: &'static str,
    size: UVec2,
    limit: u32,
) -> Result<()> {
    if size.max_element() > limit {
        return Err(Error::TextureSizeExceedsLimit {
            label,
            width: size.x,
            height: size.y,
            limit,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn texture_size_limits() {
        assert!(check_texture_size("output", uvec2(8192, 8192), 8192).is_ok());
        assert!(check_texture_size("output", uvec2(1, 1), 8192).is_ok());

        let err = check_texture_size("injection", uvec2(16384, 720), 8192)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::TextureSizeExceedsLimit {
                label: "injection",
                width: 16384,
                height: 720,
                limit: 8192,
            }
        ));

        assert!(check_texture_size("output", uvec2(720, 8193), 8192).is_err());
    }
}
