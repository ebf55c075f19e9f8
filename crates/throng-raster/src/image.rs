//! Multi-channel feature image assembly.

use throng_core::{GridDims, GridPoint};

use crate::grid::Grid;
use crate::planes::VELOCITY_NEUTRAL;

/// Number of feature channels, in order: velocity-x, velocity-z,
/// deviation-from-goal, group, connectivity.
pub const CHANNELS: usize = 5;

/// A W×H×5 feature image in channel-last row-major `f32` layout.
///
/// The layout matches what the downstream convolutional regressor
/// consumes; `data[(z * width + x) * CHANNELS + c]` addresses pixel
/// `(x, z)` of channel `c`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureImage {
    dims: GridDims,
    data: Vec<f32>,
}

impl FeatureImage {
    /// Stack the five planes into one image.
    ///
    /// All planes must share the same dimensions; the builders derive
    /// them from one configuration, so a mismatch is a programming
    /// error.
    pub fn from_planes(vx: &Grid, vz: &Grid, dfg: &Grid, group: &Grid, connect: &Grid) -> Self {
        let dims = vx.dims();
        debug_assert!(
            [vz, dfg, group, connect].iter().all(|g| g.dims() == dims),
            "feature planes must share dimensions"
        );

        let planes = [vx, vz, dfg, group, connect];
        let mut data = Vec::with_capacity(dims.len() * CHANNELS);
        for z in 0..dims.height {
            for x in 0..dims.width {
                let p = GridPoint { x, z };
                for plane in planes {
                    data.push(plane.at(p) as f32);
                }
            }
        }
        Self { dims, data }
    }

    /// Image dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Raw channel-last data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Rebuild an image from raw parts (codec reader side).
    ///
    /// Returns `None` when the buffer length does not match the
    /// dimensions.
    pub fn from_raw(dims: GridDims, data: Vec<f32>) -> Option<Self> {
        if data.len() != dims.len() * CHANNELS {
            return None;
        }
        Some(Self { dims, data })
    }

    /// Value of channel `c` at pixel `p`.
    pub fn get(&self, p: GridPoint, c: usize) -> f32 {
        self.data[(p.z as usize * self.dims.width as usize + p.x as usize) * CHANNELS + c]
    }

    /// Fraction of velocity-x pixels that deviate from the neutral 0.5.
    ///
    /// Untouched pixels hold exactly 0.5 by construction, so an exact
    /// comparison separates observed from unobserved traffic.
    pub fn traffic_fraction(&self) -> f64 {
        let total = self.dims.len();
        if total == 0 {
            return 0.0;
        }
        let active = self
            .data
            .chunks_exact(CHANNELS)
            .filter(|px| f64::from(px[0]) != VELOCITY_NEUTRAL)
            .count();
        active as f64 / total as f64
    }

    /// True when the observed-traffic fraction reaches `threshold`.
    pub fn is_valid(&self, threshold: f64) -> bool {
        self.traffic_fraction() > threshold
    }

    /// Extract a rectangular tile. The window must lie inside the image.
    pub fn crop(&self, origin: GridPoint, dims: GridDims) -> FeatureImage {
        debug_assert!(origin.x + dims.width <= self.dims.width);
        debug_assert!(origin.z + dims.height <= self.dims.height);
        let mut data = Vec::with_capacity(dims.len() * CHANNELS);
        for z in 0..dims.height {
            for x in 0..dims.width {
                let p = GridPoint {
                    x: origin.x + x,
                    z: origin.z + z,
                };
                let base = (p.z as usize * self.dims.width as usize + p.x as usize) * CHANNELS;
                data.extend_from_slice(&self.data[base..base + CHANNELS]);
            }
        }
        FeatureImage { dims, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planes(dims: GridDims) -> [Grid; 5] {
        [
            Grid::new(dims, 0.5),
            Grid::new(dims, 0.5),
            Grid::new(dims, 0.0),
            Grid::new(dims, 0.0),
            Grid::new(dims, 0.0),
        ]
    }

    #[test]
    fn channel_order_is_preserved() {
        let dims = GridDims::new(4, 4);
        let [vx, vz, mut dfg, group, connect] = planes(dims);
        dfg.set(GridPoint { x: 1, z: 2 }, 0.75);
        let img = FeatureImage::from_planes(&vx, &vz, &dfg, &group, &connect);
        assert_eq!(img.get(GridPoint { x: 1, z: 2 }, 2), 0.75);
        assert_eq!(img.get(GridPoint { x: 1, z: 2 }, 0), 0.5);
        assert_eq!(img.get(GridPoint { x: 1, z: 2 }, 3), 0.0);
    }

    #[test]
    fn untouched_image_has_zero_traffic_and_is_masked() {
        let dims = GridDims::new(8, 8);
        let [vx, vz, dfg, group, connect] = planes(dims);
        let img = FeatureImage::from_planes(&vx, &vz, &dfg, &group, &connect);
        assert_eq!(img.traffic_fraction(), 0.0);
        assert!(!img.is_valid(0.02));
    }

    #[test]
    fn traffic_fraction_counts_non_neutral_pixels() {
        let dims = GridDims::new(8, 8);
        let [mut vx, vz, dfg, group, connect] = planes(dims);
        vx.set(GridPoint { x: 0, z: 0 }, 0.7);
        vx.set(GridPoint { x: 1, z: 0 }, 0.3);
        let img = FeatureImage::from_planes(&vx, &vz, &dfg, &group, &connect);
        assert!((img.traffic_fraction() - 2.0 / 64.0).abs() < 1e-12);
        assert!(img.is_valid(0.02));
    }

    #[test]
    fn crop_extracts_expected_tile() {
        let dims = GridDims::new(8, 8);
        let [mut vx, vz, dfg, group, connect] = planes(dims);
        vx.set(GridPoint { x: 5, z: 6 }, 0.9);
        let img = FeatureImage::from_planes(&vx, &vz, &dfg, &group, &connect);
        let tile = img.crop(GridPoint { x: 4, z: 4 }, GridDims::new(4, 4));
        assert_eq!(tile.dims(), GridDims::new(4, 4));
        assert_eq!(tile.get(GridPoint { x: 1, z: 2 }, 0), 0.9);
    }

    #[test]
    fn raw_roundtrip_validates_length() {
        let dims = GridDims::new(2, 2);
        assert!(FeatureImage::from_raw(dims, vec![0.0; 20]).is_some());
        assert!(FeatureImage::from_raw(dims, vec![0.0; 19]).is_none());
    }
}
