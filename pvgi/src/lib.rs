//! Progressive voxel-based global illumination.
//!
//! Each frame the host hands over its already-lit image, depth and normals;
//! lit surfaces get scattered into a cascade of 3D voxel grids, which then get
//! cone-traced to estimate one bounce of diffuse indirect light that's added on
//! top of the host's image.
//!
//! Voxels are refined progressively: every frame blends new observations in
//! and fades everything out a bit, so the volume converges over a handful of
//! frames and forgets lighting that's no longer observed.

mod buffers;
mod config;
mod error;
mod frame_inputs;
mod gi_controller;
pub mod reference;
mod shaders;
mod utils;
mod volume;

use std::mem;

use log::info;
pub use pvgi_gpu as gpu;

pub(crate) use self::buffers::*;
pub use self::config::*;
pub use self::error::*;
pub use self::frame_inputs::*;
pub use self::gi_controller::*;
pub(crate) use self::shaders::*;
pub(crate) use self::utils::*;
pub use self::volume::*;

#[derive(Debug)]
pub struct Engine {
    shaders: Shaders,
}

impl Engine {
    /// Checks that the device (created from `adapter`) supports everything
    /// the renderer needs and compiles the programs.
    pub fn new(
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
    ) -> Result<Self> {
        info!("Initializing");

        let volume_format =
            adapter.get_texture_format_features(VOLUME_FORMAT);

        if !volume_format
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::STORAGE_READ_WRITE)
            || !volume_format
                .allowed_usages
                .contains(wgpu::TextureUsages::STORAGE_BINDING)
        {
            return Err(Error::UnsupportedVolumeFormat(VOLUME_FORMAT));
        }

        let missing_features =
            Self::features().difference(device.features());

        if !missing_features.is_empty() {
            return Err(Error::MissingFeatures(missing_features));
        }

        let push_constants = device.limits().max_push_constant_size;
        let required_push_constants = Self::limits().max_push_constant_size;

        if push_constants < required_push_constants {
            return Err(Error::PushConstantsTooSmall {
                required: required_push_constants,
                actual: push_constants,
            });
        }

        Ok(Self {
            shaders: Shaders::new(device),
        })
    }

    /// Features the device has to be created with.
    pub fn features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
            | wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES
    }

    /// Limits the device has to be created with.
    pub fn limits() -> wgpu::Limits {
        let push_constants = mem::size_of::<gpu::VoxelPassParams>()
            .max(mem::size_of::<gpu::FrameCompositionPassParams>());

        wgpu::Limits {
            max_push_constant_size: push_constants as u32,
            ..Default::default()
        }
    }

    /// Creates a controller that renders global illumination for a single
    /// view (output texture) of the host.
    pub fn create_controller(
        &self,
        device: &wgpu::Device,
        config: GiConfig,
    ) -> Result<GiController> {
        GiController::new(self, device, config)
    }
}
