//! Common structs, algorithms etc. used by PVGI's GPU programs and renderer.
//!
//! Every algorithm here has a WGSL twin in `pvgi/src/shaders`; keeping the
//! Rust version around lets the renderer's CPU reference pipeline (and the
//! tests) execute exactly the same math as the GPU does.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod cascade;
mod cleanup;
mod composition;
mod frame;
mod injection;
mod passes;
mod tracing;
mod utils;
mod voxel;
mod voxel_grid;

pub use self::cascade::*;
pub use self::cleanup::*;
pub use self::composition::*;
pub use self::frame::*;
pub use self::injection::*;
pub use self::passes::*;
pub use self::tracing::*;
pub use self::utils::*;
pub use self::voxel::*;
pub use self::voxel_grid::*;

/// Number of levels in the voxel cascade; level `n` has `1 / 2^n` of the
/// finest level's resolution along each axis.
pub const CASCADE_LEVELS: usize = 5;

/// Smallest finest-level resolution that can still be halved for every
/// cascade level.
pub const MIN_VOXEL_RESOLUTION: u32 = 1 << (CASCADE_LEVELS - 1);
