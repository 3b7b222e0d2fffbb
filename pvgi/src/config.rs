use std::f32::consts::PI;

use derivative::Derivative;
use glam::{uvec2, vec4, Mat4, UVec2, Vec3};

use crate::{gpu, Error, Result};

/// Configuration of a single [`crate::GiController`].
#[derive(Clone, Debug, PartialEq, Derivative)]
#[derivative(Default)]
pub struct GiConfig {
    /// Size of the host's textures and of the output
    #[derivative(Default(value = "uvec2(1280, 720)"))]
    pub resolution: UVec2,

    /// Format of the output texture
    #[derivative(Default(value = "wgpu::TextureFormat::Rgba8UnormSrgb"))]
    pub format: wgpu::TextureFormat,

    /// Size of the injection buffers; lower resolutions inject fewer samples
    /// per frame, trading convergence speed for performance
    #[derivative(Default(value = "uvec2(1280, 720)"))]
    pub injection_resolution: UVec2,

    /// Length of the volume's edge, in world units
    #[derivative(Default(value = "10.0"))]
    pub world_volume_boundary: f32,

    /// Center of the volume, in world coordinates
    pub volume_center: Vec3,

    /// Resolution of the finest cascade level
    #[derivative(Default(value = "256"))]
    pub highest_voxel_resolution: u32,

    /// Maximum number of samples taken by a single cone
    #[derivative(Default(value = "50"))]
    pub maximum_iterations: u32,

    /// Maximum distance travelled by a single cone, in world units
    #[derivative(Default(value = "10.0"))]
    pub ray_distance: f32,

    /// Full opening angle of cones, in radians
    #[derivative(Default(value = "PI / 3.0"))]
    pub cone_aperture: f32,

    /// Multiplier of the indirect lighting added on top of the host's image
    #[derivative(Default(value = "1.0"))]
    pub indirect_lighting_strength: f32,

    /// Fraction of voxels' contents faded out each frame, `[0, 1]`
    #[derivative(Default(value = "0.1"))]
    pub decay: f32,

    /// Weight of the new observation when blending it into a voxel, `(0, 1]`
    #[derivative(Default(value = "0.5"))]
    pub temporal_blend: f32,

    /// When set, raw contents of given cascade level get displayed instead of
    /// the lit image
    pub debug_view: Option<DebugView>,
}

impl GiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resolution.x == 0 || self.resolution.y == 0 {
            return Err(Error::InvalidResolution(
                self.resolution.x,
                self.resolution.y,
            ));
        }

        if self.injection_resolution.x == 0 || self.injection_resolution.y == 0
        {
            return Err(Error::InvalidInjectionResolution(
                self.injection_resolution.x,
                self.injection_resolution.y,
            ));
        }

        if !self.world_volume_boundary.is_finite()
            || self.world_volume_boundary <= 0.0
        {
            return Err(Error::InvalidBoundary(self.world_volume_boundary));
        }

        if !self.highest_voxel_resolution.is_power_of_two()
            || self.highest_voxel_resolution < gpu::MIN_VOXEL_RESOLUTION
        {
            return Err(Error::InvalidVoxelResolution(
                self.highest_voxel_resolution,
            ));
        }

        if !self.volume_center.is_finite() {
            return Err(Error::InvalidParameter {
                name: "volume_center",
                value: self.volume_center.max_element(),
            });
        }

        let params = [
            (
                "maximum_iterations",
                self.maximum_iterations as f32,
                self.maximum_iterations > 0,
            ),
            ("ray_distance", self.ray_distance, self.ray_distance > 0.0),
            (
                "cone_aperture",
                self.cone_aperture,
                self.cone_aperture > 0.0 && self.cone_aperture < PI,
            ),
            (
                "indirect_lighting_strength",
                self.indirect_lighting_strength,
                self.indirect_lighting_strength >= 0.0,
            ),
            (
                "decay",
                self.decay,
                self.decay >= 0.0 && self.decay <= 1.0,
            ),
            (
                "temporal_blend",
                self.temporal_blend,
                self.temporal_blend > 0.0 && self.temporal_blend <= 1.0,
            ),
        ];

        for (name, value, valid) in params {
            if !valid || !value.is_finite() {
                return Err(Error::InvalidParameter { name, value });
            }
        }

        Ok(())
    }

    /// Returns whether switching from this config into `other` requires
    /// reallocating buffers (and thus losing the accumulated lighting).
    pub fn is_invalidated_by(&self, other: &Self) -> bool {
        self.resolution != other.resolution
            || self.format != other.format
            || self.injection_resolution != other.injection_resolution
            || self.highest_voxel_resolution != other.highest_voxel_resolution
    }

    pub fn describe(&self) -> String {
        format!(
            "resolution={}x{}, injection-resolution={}x{}, voxels={}^3, \
             boundary={}, center={}",
            self.resolution.x,
            self.resolution.y,
            self.injection_resolution.x,
            self.injection_resolution.y,
            self.highest_voxel_resolution,
            self.world_volume_boundary,
            self.volume_center,
        )
    }

    pub fn cascade(&self) -> gpu::Cascade {
        gpu::Cascade::new(
            self.volume_center,
            self.world_volume_boundary,
            self.highest_voxel_resolution,
        )
    }

    pub fn composition_mode(&self) -> gpu::CompositionMode {
        match self.debug_view {
            Some(view) => gpu::CompositionMode::Grid(view.level()),
            None => gpu::CompositionMode::Image,
        }
    }

    pub fn serialize(
        &self,
        inverse_view: Mat4,
        inverse_projection: Mat4,
    ) -> gpu::Frame {
        gpu::Frame {
            inverse_view,
            inverse_projection,
            volume: self.volume_center.extend(self.world_volume_boundary),
            voxels: vec4(
                f32::from_bits(self.highest_voxel_resolution),
                self.decay,
                self.temporal_blend,
                0.0,
            ),
            tracing: vec4(
                f32::from_bits(self.maximum_iterations),
                self.ray_distance,
                self.cone_aperture,
                self.indirect_lighting_strength,
            ),
            screen: vec4(
                self.resolution.x as f32,
                self.resolution.y as f32,
                self.injection_resolution.x as f32,
                self.injection_resolution.y as f32,
            ),
        }
    }
}

/// Cascade level displayed instead of the lit image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DebugView {
    Grid1,
    Grid2,
    Grid3,
    Grid4,
    Grid5,
}

impl DebugView {
    pub const ALL: [Self; gpu::CASCADE_LEVELS] = [
        Self::Grid1,
        Self::Grid2,
        Self::Grid3,
        Self::Grid4,
        Self::Grid5,
    ];

    /// Returns the cascade level this view displays; `Grid1` is the finest
    /// one.
    pub fn level(&self) -> u32 {
        match self {
            DebugView::Grid1 => 0,
            DebugView::Grid2 => 1,
            DebugView::Grid3 => 2,
            DebugView::Grid4 => 3,
            DebugView::Grid5 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn default() {
        let target = GiConfig::default();

        assert_eq!(uvec2(1280, 720), target.resolution);
        assert_eq!(target.resolution, target.injection_resolution);
        assert_eq!(10.0, target.world_volume_boundary);
        assert_eq!(Vec3::ZERO, target.volume_center);
        assert_eq!(256, target.highest_voxel_resolution);
        assert_eq!(50, target.maximum_iterations);
        assert_eq!(target.world_volume_boundary, target.ray_distance);
        assert_eq!(None, target.debug_view);

        target.validate().unwrap();
    }

    #[test]
    fn validate() {
        let target = GiConfig::default();

        let err = GiConfig {
            resolution: uvec2(0, 720),
            ..target.clone()
        }
        .validate()
        .unwrap_err();

        assert!(matches!(err, Error::InvalidResolution(0, 720)));

        let err = GiConfig {
            injection_resolution: uvec2(640, 0),
            ..target.clone()
        }
        .validate()
        .unwrap_err();

        assert!(matches!(err, Error::InvalidInjectionResolution(640, 0)));

        for boundary in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = GiConfig {
                world_volume_boundary: boundary,
                ..target.clone()
            }
            .validate()
            .unwrap_err();

            assert!(matches!(err, Error::InvalidBoundary(_)));
        }

        for resolution in [0, 8, 100, 255] {
            let err = GiConfig {
                highest_voxel_resolution: resolution,
                ..target.clone()
            }
            .validate()
            .unwrap_err();

            assert!(matches!(
                err,
                Error::InvalidVoxelResolution(r) if r == resolution
            ));
        }

        for resolution in [16, 32, 64, 512] {
            GiConfig {
                highest_voxel_resolution: resolution,
                ..target.clone()
            }
            .validate()
            .unwrap();
        }

        let invalid = [
            GiConfig {
                maximum_iterations: 0,
                ..target.clone()
            },
            GiConfig {
                ray_distance: 0.0,
                ..target.clone()
            },
            GiConfig {
                cone_aperture: PI,
                ..target.clone()
            },
            GiConfig {
                indirect_lighting_strength: -0.5,
                ..target.clone()
            },
            GiConfig {
                decay: 1.5,
                ..target.clone()
            },
            GiConfig {
                temporal_blend: 0.0,
                ..target.clone()
            },
            GiConfig {
                volume_center: vec3(f32::NAN, 0.0, 0.0),
                ..target.clone()
            },
        ];

        for config in invalid {
            let err = config.validate().unwrap_err();

            assert!(matches!(err, Error::InvalidParameter { .. }), "{err}");
        }
    }

    #[test]
    fn is_invalidated_by() {
        let target = GiConfig::default();

        assert!(!target.is_invalidated_by(&GiConfig {
            decay: 0.5,
            indirect_lighting_strength: 2.0,
            debug_view: Some(DebugView::Grid3),
            ..target.clone()
        }));

        assert!(target.is_invalidated_by(&GiConfig {
            highest_voxel_resolution: 128,
            ..target.clone()
        }));

        assert!(target.is_invalidated_by(&GiConfig {
            injection_resolution: uvec2(640, 360),
            ..target.clone()
        }));
    }

    #[test]
    fn serialize() {
        let target = GiConfig {
            volume_center: vec3(1.0, 2.0, 3.0),
            injection_resolution: uvec2(640, 360),
            ..Default::default()
        };

        let frame = target.serialize(Mat4::IDENTITY, Mat4::IDENTITY);

        assert_eq!(vec3(1.0, 2.0, 3.0), frame.volume_center());
        assert_eq!(10.0, frame.volume_boundary());
        assert_eq!(256, frame.highest_voxel_resolution());
        assert_eq!(50, frame.maximum_iterations());
        assert_eq!(0.1, frame.decay());
        assert_eq!(0.5, frame.temporal_blend());
        assert_eq!(uvec2(1280, 720), frame.output_size());
        assert_eq!(uvec2(640, 360), frame.injection_size());
        assert_eq!(target.cascade(), frame.cascade());
    }

    #[test]
    fn debug_views() {
        for (level, view) in DebugView::ALL.into_iter().enumerate() {
            let target = GiConfig {
                debug_view: Some(view),
                ..Default::default()
            };

            assert_eq!(level as u32, view.level());

            assert_eq!(
                gpu::CompositionMode::Grid(level as u32),
                target.composition_mode()
            );
        }

        assert_eq!(
            gpu::CompositionMode::Image,
            GiConfig::default().composition_mode()
        );
    }
}
