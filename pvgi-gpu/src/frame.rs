use bytemuck::{Pod, Zeroable};
use glam::{vec3, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Cascade, ConeTracer};

/// Per-frame parameters shared by all passes.
///
/// Built once per frame on the host and uploaded into a single uniform buffer
/// before any pass runs, so that every pass within a frame observes the very
/// same values.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct Frame {
    pub inverse_view: Mat4,
    pub inverse_projection: Mat4,

    /// x, y, z - volume's center
    /// w - volume's boundary (length of cube's edge, in world units)
    pub volume: Vec4,

    /// x - finest voxel resolution (as bits)
    /// y - decay applied by the cleanup pass
    /// z - temporal blend applied by the injection pass
    /// w - unused
    pub voxels: Vec4,

    /// x - maximum number of steps per cone (as bits)
    /// y - maximum distance travelled by a cone
    /// z - cone aperture, in radians
    /// w - indirect lighting strength
    pub tracing: Vec4,

    /// x, y - output size
    /// z, w - injection buffers' size
    pub screen: Vec4,
}

impl Frame {
    pub fn volume_center(&self) -> Vec3 {
        self.volume.xyz()
    }

    pub fn volume_boundary(&self) -> f32 {
        self.volume.w
    }

    pub fn highest_voxel_resolution(&self) -> u32 {
        self.voxels.x.to_bits()
    }

    pub fn decay(&self) -> f32 {
        self.voxels.y
    }

    pub fn temporal_blend(&self) -> f32 {
        self.voxels.z
    }

    pub fn maximum_iterations(&self) -> u32 {
        self.tracing.x.to_bits()
    }

    pub fn ray_distance(&self) -> f32 {
        self.tracing.y
    }

    pub fn cone_aperture(&self) -> f32 {
        self.tracing.z
    }

    pub fn indirect_lighting_strength(&self) -> f32 {
        self.tracing.w
    }

    pub fn output_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    pub fn injection_size(&self) -> UVec2 {
        self.screen.zw().as_uvec2()
    }

    pub fn cascade(&self) -> Cascade {
        Cascade::new(
            self.volume_center(),
            self.volume_boundary(),
            self.highest_voxel_resolution(),
        )
    }

    pub fn cone_tracer(&self) -> ConeTracer {
        ConeTracer::new(
            self.cascade(),
            self.maximum_iterations(),
            self.ray_distance(),
            self.cone_aperture(),
        )
    }

    /// Returns UV of the center of given texel of an image with given size.
    pub fn texel_to_uv(texel: UVec2, size: UVec2) -> Vec2 {
        (texel.as_vec2() + Vec2::splat(0.5)) / size.as_vec2()
    }

    /// Returns texel of an image with given size that covers given UV.
    pub fn uv_to_texel(uv: Vec2, size: UVec2) -> UVec2 {
        (uv * size.as_vec2())
            .as_uvec2()
            .min(size.max(UVec2::ONE) - UVec2::ONE)
    }

    /// Reconstructs world-space position from screen-space UV and depth
    /// (`[0, 1]`, with `1.0` being the far plane).
    ///
    /// Returns `w = 1.0` for geometry and a zeroed vector for background.
    pub fn reconstruct_position(&self, uv: Vec2, depth: f32) -> Vec4 {
        if depth >= 1.0 {
            return Vec4::ZERO;
        }

        let ndc = vec3(2.0 * uv.x - 1.0, 1.0 - 2.0 * uv.y, depth);
        let view = self.inverse_projection.project_point3(ndc);

        self.inverse_view.transform_point3(view).extend(1.0)
    }

    /// Rotates a view-space normal into world-space.
    pub fn reconstruct_normal(&self, normal: Vec3) -> Vec3 {
        self.inverse_view.transform_vector3(normal).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec2, vec4};

    use super::*;

    fn frame() -> (Frame, Mat4, Mat4) {
        let view = Mat4::look_at_rh(
            vec3(1.0, 2.0, 6.0),
            vec3(0.0, 0.5, 0.0),
            Vec3::Y,
        );

        let projection =
            Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);

        let frame = Frame {
            inverse_view: view.inverse(),
            inverse_projection: projection.inverse(),
            volume: vec4(0.0, 0.0, 0.0, 10.0),
            voxels: vec4(f32::from_bits(256), 0.1, 0.5, 0.0),
            tracing: vec4(f32::from_bits(50), 10.0, 1.0, 1.0),
            screen: vec4(1280.0, 720.0, 640.0, 360.0),
        };

        (frame, view, projection)
    }

    #[test]
    fn accessors() {
        let (target, _, _) = frame();

        assert_eq!(256, target.highest_voxel_resolution());
        assert_eq!(50, target.maximum_iterations());
        assert_eq!(10.0, target.volume_boundary());
        assert_eq!(UVec2::new(1280, 720), target.output_size());
        assert_eq!(UVec2::new(640, 360), target.injection_size());
        assert_eq!(128, target.cascade().level_resolution(1));
    }

    #[test]
    fn texels() {
        let size = UVec2::new(640, 360);

        for texel in [UVec2::ZERO, UVec2::new(10, 20), UVec2::new(639, 359)] {
            assert_eq!(
                texel,
                Frame::uv_to_texel(Frame::texel_to_uv(texel, size), size)
            );
        }

        // Output is twice as large as the injection buffers
        let uv =
            Frame::texel_to_uv(UVec2::new(1279, 719), UVec2::new(1280, 720));

        assert_eq!(UVec2::new(639, 359), Frame::uv_to_texel(uv, size));
        assert_eq!(UVec2::new(639, 359), Frame::uv_to_texel(Vec2::ONE, size));
    }

    #[test]
    fn reconstruct_position() {
        let (target, view, projection) = frame();

        for point in [
            vec3(0.0, 0.0, 0.0),
            vec3(1.5, -0.5, 2.0),
            vec3(-3.0, 1.0, -4.0),
        ] {
            let clip = projection * view * point.extend(1.0);
            let ndc = clip.xyz() / clip.w;
            let uv = vec2(0.5 * ndc.x + 0.5, 0.5 - 0.5 * ndc.y);
            let actual = target.reconstruct_position(uv, ndc.z);

            assert_relative_eq!(point.x, actual.x, epsilon = 1e-2);
            assert_relative_eq!(point.y, actual.y, epsilon = 1e-2);
            assert_relative_eq!(point.z, actual.z, epsilon = 1e-2);
            assert_eq!(1.0, actual.w);
        }

        assert_eq!(
            Vec4::ZERO,
            target.reconstruct_position(vec2(0.5, 0.5), 1.0)
        );
    }

    #[test]
    fn reconstruct_normal() {
        let (target, view, _) = frame();
        let normal = vec3(0.0, 1.0, 0.0);
        let actual =
            target.reconstruct_normal(view.transform_vector3(normal));

        assert_relative_eq!(normal.x, actual.x, epsilon = 1e-4);
        assert_relative_eq!(normal.y, actual.y, epsilon = 1e-4);
        assert_relative_eq!(normal.z, actual.z, epsilon = 1e-4);
    }
}
