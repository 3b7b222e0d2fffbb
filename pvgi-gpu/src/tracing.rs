use glam::{Vec3, Vec4};

use crate::{Cascade, F32Ext, Voxel};

/// Number of cones traced per pixel: one along the normal and the rest
/// spread evenly around it.
pub const CONE_COUNT: usize = 5;

/// Angle between the normal and the side cones (60 degrees), as cosine.
const SIDE_CONE_COS: f32 = 0.5;

/// Accumulated occupancy after which a cone stops marching.
pub const CONE_SATURATION: f32 = 0.95;

/// Object that can be sampled when tracing cones - the GPU samples voxel
/// textures, the CPU reference pipeline samples its own copies.
pub trait VoxelSampler {
    /// Samples given cascade level at given world-space position, using
    /// trilinear filtering.
    fn sample(&self, level: u32, pos: Vec3) -> Voxel;
}

impl<T> VoxelSampler for &T
where
    T: VoxelSampler + ?Sized,
{
    fn sample(&self, level: u32, pos: Vec3) -> Voxel {
        T::sample(self, level, pos)
    }
}

/// Result of marching a single cone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConeTrace {
    /// Light gathered along the cone
    pub color: Vec3,

    /// Occupancy gathered along the cone, `[0, 1]`
    pub occlusion: f32,

    /// Number of samples taken
    pub steps: u32,

    /// Distance of the last sample from cone's origin
    pub distance: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct ConeTracer {
    cascade: Cascade,
    maximum_iterations: u32,
    ray_distance: f32,
    aperture: f32,
}

impl ConeTracer {
    pub fn new(
        cascade: Cascade,
        maximum_iterations: u32,
        ray_distance: f32,
        aperture: f32,
    ) -> Self {
        Self {
            cascade,
            maximum_iterations,
            ray_distance,
            aperture,
        }
    }

    /// Estimates indirect light arriving at given surface point.
    ///
    /// Returns gathered light in `xyz` and the fraction of the hemisphere that
    /// is not occluded by voxels in `w`.
    ///
    /// No sample lands further than `ray_distance` away from `position`.
    pub fn trace(
        &self,
        position: Vec3,
        normal: Vec3,
        sampler: impl VoxelSampler,
    ) -> Vec4 {
        // Start one voxel away, so that the surface doesn't occlude itself;
        // that offset counts towards the distance travelled
        let offset = self.cascade.finest_cell_size();
        let origin = position + normal * offset;

        let tracer = Self {
            ray_distance: self.ray_distance - offset,
            ..*self
        };

        let mut color = Vec3::ZERO;
        let mut visibility = 0.0;
        let mut weights = 0.0;

        for (direction, weight) in Self::cones(normal) {
            let cone = tracer.trace_cone(origin, direction, &sampler);

            color += cone.color * weight;
            visibility += (1.0 - cone.occlusion) * weight;
            weights += weight;
        }

        (color / weights).extend(visibility / weights)
    }

    /// Marches a single cone through the cascade, front-to-back.
    ///
    /// Stops after `maximum_iterations` samples, before sampling further than
    /// `ray_distance` away from `origin`, or once the cone gets saturated.
    pub fn trace_cone(
        &self,
        origin: Vec3,
        direction: Vec3,
        sampler: impl VoxelSampler,
    ) -> ConeTrace {
        let cell_size = self.cascade.finest_cell_size();
        let spread = 2.0 * (0.5 * self.aperture).tan();
        let mut cone = ConeTrace::default();
        let mut t = cell_size;

        while cone.steps < self.maximum_iterations
            && t <= self.ray_distance
            && cone.occlusion < CONE_SATURATION
        {
            let diameter = (spread * t).max(cell_size);
            let level = self.cascade.level_for_diameter(diameter);
            let voxel = sampler.sample(level, origin + direction * t);
            let transmittance = 1.0 - cone.occlusion;

            cone.color += voxel.color * transmittance;
            cone.occlusion += voxel.occupancy.saturate() * transmittance;
            cone.distance = t;
            cone.steps += 1;

            t += 0.5 * diameter;
        }

        cone
    }

    /// Returns directions and cosine weights of cones traced around given
    /// normal.
    pub fn cones(normal: Vec3) -> [(Vec3, f32); CONE_COUNT] {
        let (tangent, bitangent) = orthonormal_basis(normal);
        let sin = (1.0 - SIDE_CONE_COS * SIDE_CONE_COS).sqrt();

        let side = |tangent: Vec3| {
            let direction = normal * SIDE_CONE_COS + tangent * sin;

            (direction.normalize(), SIDE_CONE_COS)
        };

        [
            (normal, 1.0),
            side(tangent),
            side(-tangent),
            side(bitangent),
            side(-bitangent),
        ]
    }
}

/// Returns two vectors that, together with given unit-vector, form an
/// orthonormal basis.
///
/// See: https://graphics.pixar.com/library/OrthonormalB/paper.pdf
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    (
        Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x),
        Vec3::new(b, sign + n.y * n.y * a, -n.y),
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use approx::assert_relative_eq;
    use glam::vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Sampler that returns a constant voxel and records every lookup.
    struct RecordingSampler {
        voxel: Voxel,
        samples: RefCell<Vec<(u32, Vec3)>>,
    }

    impl RecordingSampler {
        fn new(voxel: Voxel) -> Self {
            Self {
                voxel,
                samples: Default::default(),
            }
        }
    }

    impl VoxelSampler for RecordingSampler {
        fn sample(&self, level: u32, pos: Vec3) -> Voxel {
            self.samples.borrow_mut().push((level, pos));
            self.voxel
        }
    }

    fn tracer(maximum_iterations: u32, ray_distance: f32) -> ConeTracer {
        ConeTracer::new(
            Cascade::new(Vec3::ZERO, 10.0, 64),
            maximum_iterations,
            ray_distance,
            60f32.to_radians(),
        )
    }

    #[test]
    fn respects_limits() {
        let mut rng = StdRng::seed_from_u64(4321);

        for (maximum_iterations, ray_distance) in
            [(1, 100.0), (8, 100.0), (50, 3.0), (50, 0.5), (500, 10.0)]
        {
            let target = tracer(maximum_iterations, ray_distance);

            for _ in 0..64 {
                let origin = vec3(
                    rng.gen_range(-4.0..4.0),
                    rng.gen_range(-4.0..4.0),
                    rng.gen_range(-4.0..4.0),
                );

                let direction = vec3(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
                .normalize_or_zero();

                if direction == Vec3::ZERO {
                    continue;
                }

                let sampler = RecordingSampler::new(Voxel::default());
                let cone = target.trace_cone(origin, direction, &sampler);
                let samples = sampler.samples.into_inner();

                assert!(cone.steps <= maximum_iterations);
                assert_eq!(cone.steps as usize, samples.len());

                for (_, pos) in samples {
                    assert!(pos.distance(origin) <= ray_distance + 1e-4);
                }
            }
        }
    }

    #[test]
    fn respects_ray_distance_from_surface() {
        let mut rng = StdRng::seed_from_u64(1234);

        // Finest voxels are 0.625 wide, i.e. a large chunk of the distance
        let cascade = Cascade::new(Vec3::ZERO, 10.0, 16);

        for ray_distance in [0.5, 1.0, 2.5, 10.0] {
            let target = ConeTracer::new(cascade, 500, ray_distance, 1.0);

            for _ in 0..16 {
                let position = vec3(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                );

                let normal = vec3(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
                .normalize_or_zero();

                if normal == Vec3::ZERO {
                    continue;
                }

                let sampler = RecordingSampler::new(Voxel::default());

                target.trace(position, normal, &sampler);

                for (_, pos) in sampler.samples.into_inner() {
                    assert!(
                        pos.distance(position) <= ray_distance + 1e-4,
                        "sample at {pos} is too far from {position}"
                    );
                }
            }
        }

        // Cones that'd start past their budget don't sample at all
        let target = ConeTracer::new(cascade, 500, 0.5, 1.0);
        let sampler = RecordingSampler::new(Voxel::default());

        target.trace(Vec3::ZERO, Vec3::Y, &sampler);

        assert!(sampler.samples.into_inner().is_empty());
    }

    #[test]
    fn moves_towards_coarser_levels() {
        let target = tracer(500, 10.0);
        let sampler = RecordingSampler::new(Voxel::default());

        target.trace_cone(Vec3::ZERO, Vec3::X, &sampler);

        let levels: Vec<_> = sampler
            .samples
            .into_inner()
            .into_iter()
            .map(|(level, _)| level)
            .collect();

        assert_eq!(Some(&0), levels.first());
        assert_eq!(Some(&4), levels.last());
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn stops_when_saturated() {
        let target = tracer(500, 10.0);
        let sampler = RecordingSampler::new(Voxel::new(Vec3::ONE, 1.0));
        let cone = target.trace_cone(Vec3::ZERO, Vec3::X, &sampler);

        assert_eq!(1, cone.steps);
        assert_eq!(1.0, cone.occlusion);
        assert_eq!(Vec3::ONE, cone.color);
    }

    #[test]
    fn empty_volume() {
        let target = tracer(50, 10.0);
        let sampler = RecordingSampler::new(Voxel::default());
        let indirect = target.trace(Vec3::ZERO, Vec3::Y, &sampler);

        assert_eq!(Vec3::ZERO, indirect.truncate());
        assert_eq!(1.0, indirect.w);
    }

    #[test]
    fn orthonormal_basis() {
        let normals =
            [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::Z, vec3(0.3, -0.9, 0.2)];

        for normal in normals {
            let normal = normal.normalize();
            let (tangent, bitangent) = super::orthonormal_basis(normal);

            assert_relative_eq!(1.0, tangent.length(), epsilon = 1e-5);
            assert_relative_eq!(1.0, bitangent.length(), epsilon = 1e-5);
            assert_relative_eq!(0.0, tangent.dot(normal), epsilon = 1e-5);
            assert_relative_eq!(0.0, bitangent.dot(normal), epsilon = 1e-5);
            assert_relative_eq!(0.0, tangent.dot(bitangent), epsilon = 1e-5);
        }
    }

    #[test]
    fn cones() {
        let normal = vec3(0.3, 0.9, -0.1).normalize();

        for (direction, weight) in ConeTracer::cones(normal) {
            assert_relative_eq!(1.0, direction.length(), epsilon = 1e-5);
            assert_relative_eq!(weight, direction.dot(normal), epsilon = 1e-5);
        }
    }
}
