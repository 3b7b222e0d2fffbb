use crate::{F32Ext, Voxel};

/// Occupancy below which the cleanup pass clears voxel entirely.
pub const CLEANUP_THRESHOLD: f32 = 1.0 / 256.0;

/// Attenuates voxel's contents before this frame's injection.
///
/// Voxels that are not observed anymore fade out over a couple of frames
/// instead of keeping stale light forever.
pub fn decay(voxel: Voxel, decay: f32) -> Voxel {
    let voxel =
        Voxel::deserialize(voxel.serialize() * (1.0 - decay.saturate()));

    if voxel.occupancy < CLEANUP_THRESHOLD {
        Voxel::default()
    } else {
        voxel
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn attenuates() {
        let voxel = Voxel::new(vec3(1.0, 0.5, 0.25), 1.0);

        assert_eq!(
            Voxel::new(vec3(0.5, 0.25, 0.125), 0.5),
            decay(voxel, 0.5)
        );

        assert_eq!(voxel, decay(voxel, 0.0));
        assert_eq!(Voxel::default(), decay(voxel, 1.0));
    }

    #[test]
    fn clears_stale_voxels() {
        let mut voxel = Voxel::new(vec3(8.0, 8.0, 8.0), 1.0);
        let mut frames = 0;

        while !voxel.is_empty() {
            voxel = decay(voxel, 0.1);
            frames += 1;

            assert!(frames < 100);
        }

        assert_eq!(Voxel::default(), voxel);
    }
}
