//! CPU implementation of the whole frame sequence.
//!
//! Runs the very same per-texel and per-voxel algorithms as the GPU programs
//! (shared through [`crate::gpu`]), just one stage after another and without
//! a device - handy for tests and for inspecting what the GPU is expected to
//! produce for given inputs.

mod host_frame;
mod image;
mod pipeline;
mod volume;

pub use self::host_frame::*;
pub use self::image::*;
pub use self::pipeline::*;
pub use self::volume::*;
