use glam::{uvec2, UVec2, Vec4};

/// Two-dimensional, four-channel float image.
#[derive(Clone, Debug, PartialEq)]
pub struct CpuImage {
    size: UVec2,
    texels: Vec<Vec4>,
}

impl CpuImage {
    /// Creates a zeroed image.
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            texels: vec![Vec4::ZERO; (size.x * size.y) as usize],
        }
    }

    pub fn from_fn(size: UVec2, mut f: impl FnMut(UVec2) -> Vec4) -> Self {
        Self {
            size,
            texels: texels(size).map(&mut f).collect(),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn get(&self, texel: UVec2) -> Vec4 {
        self.texels[self.idx(texel)]
    }

    pub fn set(&mut self, texel: UVec2, value: Vec4) {
        let idx = self.idx(texel);

        self.texels[idx] = value;
    }

    /// Returns all texels, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (UVec2, Vec4)> + '_ {
        texels(self.size).zip(self.texels.iter().copied())
    }

    fn idx(&self, texel: UVec2) -> usize {
        assert!(
            texel.x < self.size.x && texel.y < self.size.y,
            "texel {texel} is out of bounds of image of size {}",
            self.size
        );

        (texel.y * self.size.x + texel.x) as usize
    }
}

/// Returns all texels of an image with given size, row by row - i.e. in the
/// order the reference pipeline processes them.
pub fn texels(size: UVec2) -> impl Iterator<Item = UVec2> {
    (0..size.y).flat_map(move |y| (0..size.x).map(move |x| uvec2(x, y)))
}

#[cfg(test)]
mod tests {
    use glam::vec4;

    use super::*;

    #[test]
    fn smoke() {
        let mut target = CpuImage::from_fn(uvec2(3, 2), |texel| {
            vec4(texel.x as f32, texel.y as f32, 0.0, 1.0)
        });

        assert_eq!(vec4(2.0, 1.0, 0.0, 1.0), target.get(uvec2(2, 1)));

        target.set(uvec2(0, 1), Vec4::ONE);

        assert_eq!(Vec4::ONE, target.get(uvec2(0, 1)));

        let order: Vec<_> = target.iter().map(|(texel, _)| texel).collect();

        assert_eq!(
            vec![
                uvec2(0, 0),
                uvec2(1, 0),
                uvec2(2, 0),
                uvec2(0, 1),
                uvec2(1, 1),
                uvec2(2, 1),
            ],
            order
        );
    }

    #[test]
    #[should_panic]
    fn out_of_bounds() {
        CpuImage::new(uvec2(4, 4)).get(uvec2(4, 0));
    }
}
