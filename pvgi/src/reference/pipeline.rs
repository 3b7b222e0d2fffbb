use fxhash::FxHashMap;
use glam::{UVec3, Vec4, Vec4Swizzles};
use log::debug;

use crate::reference::{texels, CpuImage, CpuVolume, HostFrame};
use crate::{gpu, GiConfig, Result};

/// CPU counterpart of the injection buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct CpuInjectionBuffers {
    pub lighting: CpuImage,
    pub positions: CpuImage,
    pub normals: CpuImage,
}

impl CpuInjectionBuffers {
    fn new(config: &GiConfig) -> Self {
        Self {
            lighting: CpuImage::new(config.injection_resolution),
            positions: CpuImage::new(config.injection_resolution),
            normals: CpuImage::new(config.injection_resolution),
        }
    }
}

/// CPU counterpart of [`crate::GiController`].
///
/// Within a single injection dispatch the GPU leaves it unspecified which of
/// the texels landing in the same voxel wins; here it's always the last one
/// in row-major order.
#[derive(Clone, Debug)]
pub struct ReferencePipeline {
    config: GiConfig,
    frame: gpu::Frame,
    injection: CpuInjectionBuffers,
    indirect: CpuImage,
    volume: CpuVolume,
}

impl ReferencePipeline {
    pub fn new(config: GiConfig) -> Result<Self> {
        config.validate()?;

        debug!("Creating reference pipeline: {}", config.describe());

        Ok(Self {
            frame: Default::default(),
            injection: CpuInjectionBuffers::new(&config),
            indirect: CpuImage::new(config.resolution),
            volume: CpuVolume::new(config.cascade()),
            config,
        })
    }

    pub fn config(&self) -> &GiConfig {
        &self.config
    }

    pub fn volume(&self) -> &CpuVolume {
        &self.volume
    }

    pub fn injection(&self) -> &CpuInjectionBuffers {
        &self.injection
    }

    pub fn indirect(&self) -> &CpuImage {
        &self.indirect
    }

    /// See: [`crate::GiController::update()`].
    pub fn update(&mut self, config: GiConfig) -> Result<()> {
        config.validate()?;

        if self.config.is_invalidated_by(&config) {
            *self = Self::new(config)?;
        } else {
            self.volume.relocate(config.cascade());
            self.config = config;
        }

        Ok(())
    }

    /// Renders a single frame, returning the composed image.
    ///
    /// # Panics
    ///
    /// Panics if any of host's images doesn't have the size of
    /// [`GiConfig::resolution`].
    pub fn render(&mut self, host: &HostFrame) -> CpuImage {
        for image in [&host.color, &host.depth, &host.normals] {
            assert_eq!(self.config.resolution, image.size());
        }

        self.frame = self
            .config
            .serialize(host.inverse_view, host.inverse_projection);

        self.capture(host);
        self.cleanup();
        self.inject();

        if self.config.debug_view.is_none() {
            self.trace();
        }

        self.compose(host)
    }

    fn capture(&mut self, host: &HostFrame) {
        let output_size = self.frame.output_size();
        let injection_size = self.frame.injection_size();

        for texel in texels(injection_size) {
            let uv = gpu::Frame::texel_to_uv(texel, injection_size);
            let host_texel = gpu::Frame::uv_to_texel(uv, output_size);

            let position = self
                .frame
                .reconstruct_position(uv, host.depth.get(host_texel).x);

            let normal = if position.w > 0.0 {
                self.frame
                    .reconstruct_normal(host.normals.get(host_texel).xyz())
                    .extend(1.0)
            } else {
                Vec4::ZERO
            };

            self.injection
                .lighting
                .set(texel, host.color.get(host_texel));

            self.injection.positions.set(texel, position);
            self.injection.normals.set(texel, normal);
        }
    }

    fn cleanup(&mut self) {
        let decay = self.frame.decay();

        for level in 0..self.volume.cascade().levels() {
            self.volume.update(level, |voxel| gpu::decay(voxel, decay));
        }
    }

    fn inject(&mut self) {
        let cascade = self.volume.cascade();
        let injection_size = self.frame.injection_size();

        for level in 0..cascade.levels() {
            let injection = gpu::VoxelInjection::new(
                cascade.grid(level),
                self.frame.temporal_blend(),
            );

            let mut writes: FxHashMap<UVec3, gpu::Voxel> = Default::default();

            for texel in texels(injection_size) {
                let Some(sample) = gpu::InjectionSample::new(
                    self.injection.positions.get(texel),
                    self.injection.lighting.get(texel),
                ) else {
                    continue;
                };

                let Some(id) = injection.target(&sample) else {
                    continue;
                };

                writes.insert(
                    id,
                    injection.inject(self.volume.get(level, id), &sample),
                );
            }

            for (id, voxel) in writes {
                self.volume.set(level, id, voxel);
            }
        }
    }

    fn trace(&mut self) {
        let tracer = self.frame.cone_tracer();
        let output_size = self.frame.output_size();
        let injection_size = self.frame.injection_size();

        let indirect = CpuImage::from_fn(output_size, |texel| {
            let uv = gpu::Frame::texel_to_uv(texel, output_size);
            let injection_texel = gpu::Frame::uv_to_texel(uv, injection_size);
            let position = self.injection.positions.get(injection_texel);

            if position.w <= 0.0 {
                return Vec4::ZERO;
            }

            let normal = self.injection.normals.get(injection_texel);

            tracer.trace(position.xyz(), normal.xyz(), &self.volume)
        });

        self.indirect = indirect;
    }

    fn compose(&self, host: &HostFrame) -> CpuImage {
        let mode = self.config.composition_mode();
        let strength = self.frame.indirect_lighting_strength();
        let output_size = self.frame.output_size();
        let injection_size = self.frame.injection_size();

        CpuImage::from_fn(output_size, |texel| {
            let voxel = if let gpu::CompositionMode::Grid(level) = mode {
                let uv = gpu::Frame::texel_to_uv(texel, output_size);
                let injection_texel =
                    gpu::Frame::uv_to_texel(uv, injection_size);
                let position = self.injection.positions.get(injection_texel);

                if position.w > 0.0 {
                    self.volume.lookup(level, position.xyz())
                } else {
                    None
                }
            } else {
                None
            };

            mode.compose(
                host.color.get(texel),
                self.indirect.get(texel),
                strength,
                voxel,
            )
        })
    }
}
