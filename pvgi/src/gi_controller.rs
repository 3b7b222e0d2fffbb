mod buffers;
mod pass;
mod passes;

use std::ops::DerefMut;

use log::{debug, info};

pub use self::buffers::*;
pub use self::pass::*;
pub use self::passes::*;
use crate::{measure, Engine, FrameInputs, GiConfig, Result};

/// Renders global illumination for a single view of the host.
///
/// Each frame goes through the same sequence of passes, recorded into the
/// host's command encoder:
///
/// - scene capture (host's textures -> injection buffers),
/// - voxel cleanup (once per cascade level),
/// - voxel injection (once per cascade level),
/// - voxel tracing,
/// - frame composition (-> host's output texture).
///
/// Voxels persist across frames, that's where the progressive refinement
/// comes from.
#[derive(Debug)]
pub struct GiController {
    config: GiConfig,
    buffers: GiBuffers,
    passes: GiPasses,
}

impl GiController {
    pub(crate) fn new(
        engine: &Engine,
        device: &wgpu::Device,
        config: GiConfig,
    ) -> Result<Self> {
        config.validate()?;

        info!("Creating controller: {}", config.describe());

        let buffers = GiBuffers::new(device, &config)?;
        let passes = GiPasses::new(engine, device, &config, &buffers);

        debug!("Controller created");

        Ok(Self {
            config,
            buffers,
            passes,
        })
    }

    pub fn config(&self) -> &GiConfig {
        &self.config
    }

    pub fn buffers(&self) -> &GiBuffers {
        &self.buffers
    }

    /// Switches controller into a new configuration.
    ///
    /// Changes of resolutions or of the voxel resolution reallocate all buffers
    /// (including the voxel volume, which starts empty again); everything else
    /// takes effect at the next [`Self::flush()`].
    ///
    /// On error the controller keeps its previous configuration and buffers.
    pub fn update(
        &mut self,
        engine: &Engine,
        device: &wgpu::Device,
        config: GiConfig,
    ) -> Result<()> {
        config.validate()?;

        if self.config.is_invalidated_by(&config) {
            self.rebuild(engine, device, config)?;
        } else {
            self.buffers.volume.relocate(config.cascade());
            self.config = config;
        }

        Ok(())
    }

    fn rebuild(
        &mut self,
        engine: &Engine,
        device: &wgpu::Device,
        config: GiConfig,
    ) -> Result<()> {
        debug!("Rebuilding buffers for controller: {}", config.describe());

        let buffers = GiBuffers::new(device, &config)?;

        debug!("Rebuilding passes for controller: {}", config.describe());

        let passes = GiPasses::new(engine, device, &config, &buffers);

        self.config = config;
        self.buffers = buffers;
        self.passes = passes;

        Ok(())
    }

    /// Uploads per-frame parameters; must be called before submitting the
    /// commands recorded by [`Self::render()`].
    pub fn flush(&mut self, queue: &wgpu::Queue, inputs: &FrameInputs) {
        *self.buffers.frame.deref_mut() = self
            .config
            .serialize(inputs.inverse_view, inputs.inverse_projection);

        self.buffers.frame.flush(queue);
    }

    pub fn render(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        inputs: &FrameInputs,
        target: &wgpu::TextureView,
    ) {
        measure("render", || {
            self.passes.scene_capture.run(self, device, encoder, inputs);
            self.passes.voxel_cleanup.run(self, encoder);
            self.passes.voxel_injection.run(self, encoder);

            if self.config.debug_view.is_none() {
                self.passes.voxel_tracing.run(self, encoder);
            }

            self.passes
                .frame_composition
                .run(self, device, encoder, inputs, target);
        });
    }
}

impl Drop for GiController {
    fn drop(&mut self) {
        info!("Deleting controller: {}", self.config.describe());
    }
}
