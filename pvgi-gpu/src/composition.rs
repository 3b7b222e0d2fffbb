use glam::{Vec4, Vec4Swizzles};

use crate::{Voxel, CASCADE_LEVELS};

/// What the frame-composition pass outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositionMode {
    /// Direct lighting with indirect lighting added on top
    Image,

    /// Raw contents of given cascade level, looked up at each pixel's
    /// world-space position
    Grid(u32),
}

impl CompositionMode {
    pub fn serialize(&self) -> u32 {
        match self {
            CompositionMode::Image => 0,
            CompositionMode::Grid(level) => 1 + level,
        }
    }

    pub fn deserialize(d0: u32) -> Self {
        if d0 == 0 || d0 > CASCADE_LEVELS as u32 {
            CompositionMode::Image
        } else {
            CompositionMode::Grid(d0 - 1)
        }
    }

    /// Composes a single pixel.
    ///
    /// `voxel` is the pixel's voxel at the inspected cascade level; it's
    /// consulted only by [`CompositionMode::Grid`], and is `None` for
    /// background pixels.
    pub fn compose(
        &self,
        direct: Vec4,
        indirect: Vec4,
        strength: f32,
        voxel: Option<Voxel>,
    ) -> Vec4 {
        match (self, voxel) {
            (CompositionMode::Image, _) => {
                (direct.xyz() + indirect.xyz() * strength).extend(direct.w)
            }

            (CompositionMode::Grid(_), Some(voxel)) => voxel.serialize(),
            (CompositionMode::Grid(_), None) => direct,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, vec4};

    use super::*;

    #[test]
    fn serialization() {
        for mode in [
            CompositionMode::Image,
            CompositionMode::Grid(0),
            CompositionMode::Grid(4),
        ] {
            assert_eq!(mode, CompositionMode::deserialize(mode.serialize()));
        }

        assert_eq!(CompositionMode::Image, CompositionMode::deserialize(6));
    }

    #[test]
    fn image() {
        let direct = vec4(0.25, 0.5, 0.75, 1.0);
        let indirect = vec4(0.5, 0.5, 0.5, 0.8);

        assert_eq!(
            vec4(0.5, 0.75, 1.0, 1.0),
            CompositionMode::Image.compose(direct, indirect, 0.5, None)
        );

        assert_eq!(
            direct,
            CompositionMode::Image.compose(direct, indirect, 0.0, None)
        );
    }

    #[test]
    fn grid() {
        let direct = vec4(0.2, 0.4, 0.6, 1.0);
        let indirect = vec4(0.5, 0.5, 0.5, 0.8);
        let voxel = Voxel::new(vec3(0.1, 0.2, 0.3), 0.75);

        for level in 0..(CASCADE_LEVELS as u32) {
            let mode = CompositionMode::Grid(level);

            for strength in [0.0, 1.0, 3.0] {
                assert_eq!(
                    voxel.serialize(),
                    mode.compose(direct, indirect, strength, Some(voxel))
                );
            }

            assert_eq!(direct, mode.compose(direct, indirect, 1.0, None));
        }
    }
}
