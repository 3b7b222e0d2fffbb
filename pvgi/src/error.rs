use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("output resolution must be non-zero, got {0}x{1}")]
    InvalidResolution(u32, u32),

    #[error("injection resolution must be non-zero, got {0}x{1}")]
    InvalidInjectionResolution(u32, u32),

    #[error("volume boundary must be a positive, finite number, got {0}")]
    InvalidBoundary(f32),

    #[error("voxel resolution must be a power of two, at least 16, got {0}")]
    InvalidVoxelResolution(u32),

    #[error(
        "voxel resolution {resolution} exceeds device's limit of {limit} \
         texels per dimension"
    )]
    VoxelResolutionExceedsLimit { resolution: u32, limit: u32 },

    #[error("invalid `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("device is missing required features: {0:?}")]
    MissingFeatures(wgpu::Features),

    #[error("adapter doesn't support read-write storage access to {0:?}")]
    UnsupportedVolumeFormat(wgpu::TextureFormat),

    #[error(
        "{label} size {width}x{height} exceeds device's limit of {limit} \
         texels per dimension"
    )]
    TextureSizeExceedsLimit {
        label: &'static str,
        width: u32,
        height: u32,
        limit: u32,
    },

    #[error(
        "device supports {actual} bytes of push constants, but {required} are \
         required"
    )]
    PushConstantsTooSmall { required: u32, actual: u32 },

    #[error("couldn't allocate voxel volume `{label}`: {message}")]
    VolumeAllocation { label: String, message: String },
}
