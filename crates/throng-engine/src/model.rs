//! The weight-model boundary.
//!
//! The convolutional regressor itself lives outside this workspace; the
//! pipeline talks to it through [`WeightModel`], handing over a batch
//! of feature images with their validity flags and receiving six raw
//! outputs per valid image. The fixed reconstruction that turns those
//! six numbers into a four-weight profile is pure and implemented here.

use std::fmt;

use throng_core::WeightProfile;
use throng_raster::FeatureImage;

/// The six raw regressor outputs for one image: three ranking scores,
/// two pairwise margins, and the connection weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawOutput(pub [f32; 6]);

/// Errors from a model backend.
#[derive(Debug)]
pub enum ModelError {
    /// The backend failed to produce outputs.
    Inference {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The backend returned the wrong number of outputs.
    BatchMismatch {
        /// Images handed to the backend.
        expected: usize,
        /// Outputs it returned.
        found: usize,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inference { reason } => write!(f, "inference failed: {reason}"),
            Self::BatchMismatch { expected, found } => {
                write!(f, "batch mismatch: {expected} images, {found} outputs")
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// A batch weight regressor.
///
/// Implementations receive every image of a run in one call, paired
/// with validity flags; they must return one entry per image, `None`
/// for images flagged invalid.
pub trait WeightModel {
    /// Predict raw outputs for a batch of feature images.
    fn predict(
        &self,
        images: &[FeatureImage],
        valid: &[bool],
    ) -> Result<Vec<Option<RawOutput>>, ModelError>;
}

/// Round to four decimal places.
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Reconstruct a weight profile from six raw outputs.
///
/// The first three outputs rank the goal/group/interaction weights;
/// outputs four and five are the margins between the winner and the
/// other two. The winner takes `(1 + v1 + v2) / 3`, the runner-up that
/// minus `v1`, the last that minus `v2`. The three weights then shift
/// by the magnitude of their minimum and renormalize to sum to one;
/// connection passes through. Everything rounds to four decimals.
pub fn reconstruct_profile(raw: &RawOutput) -> WeightProfile {
    let scores = [f64::from(raw.0[0]), f64::from(raw.0[1]), f64::from(raw.0[2])];
    let v1 = f64::from(raw.0[3]);
    let v2 = f64::from(raw.0[4]);
    let connection = f64::from(raw.0[5]);

    // Rank indices by score, descending; ties break toward the lower
    // index so the ranking is total.
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let base = (1.0 + v1 + v2) / 3.0;
    let mut weights = [0.0f64; 3];
    weights[order[0]] = base;
    weights[order[1]] = base - v1;
    weights[order[2]] = base - v2;

    let min = weights[0].min(weights[1]).min(weights[2]);
    for w in &mut weights {
        *w += min.abs();
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    } else {
        weights = [1.0 / 3.0; 3];
    }

    WeightProfile::new(
        round4(weights[0]),
        round4(weights[1]),
        round4(weights[2]),
        round4(connection),
    )
}

/// The stand-in backend used when no trained regressor is wired up.
///
/// Emits, for every valid image, the raw outputs that reconstruct to
/// the fallback profile. Swap in a real backend by implementing
/// [`WeightModel`] over the trained network.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProfileModel;

impl WeightModel for DefaultProfileModel {
    fn predict(
        &self,
        images: &[FeatureImage],
        valid: &[bool],
    ) -> Result<Vec<Option<RawOutput>>, ModelError> {
        if images.len() != valid.len() {
            return Err(ModelError::BatchMismatch {
                expected: images.len(),
                found: valid.len(),
            });
        }
        let fallback = WeightProfile::fallback();
        Ok(valid
            .iter()
            .map(|&ok| {
                ok.then_some(RawOutput([
                    1.0,
                    0.0,
                    0.0,
                    1.0,
                    1.0,
                    fallback.connection as f32,
                ]))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_takes_the_base_weight() {
        // Goal ranked first, group second: order goal, group, interaction.
        let profile = reconstruct_profile(&RawOutput([0.9, 0.5, 0.1, 0.2, 0.4, 0.7]));
        assert!(profile.goal > profile.group);
        assert!(profile.group > profile.interaction);
        assert!((profile.goal + profile.group + profile.interaction - 1.0).abs() < 1e-9);
        assert_eq!(profile.connection, 0.7);
    }

    #[test]
    fn each_ranking_permutation_orders_weights() {
        let cases: [([f32; 3], [usize; 3]); 6] = [
            ([0.9, 0.5, 0.1], [0, 1, 2]),
            ([0.9, 0.1, 0.5], [0, 2, 1]),
            ([0.5, 0.9, 0.1], [1, 0, 2]),
            ([0.1, 0.9, 0.5], [1, 2, 0]),
            ([0.5, 0.1, 0.9], [2, 0, 1]),
            ([0.1, 0.5, 0.9], [2, 1, 0]),
        ];
        for (scores, expected_order) in cases {
            let profile = reconstruct_profile(&RawOutput([
                scores[0], scores[1], scores[2], 0.1, 0.3, 0.5,
            ]));
            let weights = [profile.goal, profile.group, profile.interaction];
            assert!(
                weights[expected_order[0]] >= weights[expected_order[1]],
                "scores {scores:?} gave {weights:?}"
            );
            assert!(
                weights[expected_order[1]] >= weights[expected_order[2]],
                "scores {scores:?} gave {weights:?}"
            );
        }
    }

    #[test]
    fn weights_always_form_a_convex_combination() {
        let raws = [
            RawOutput([0.2, 0.8, 0.5, 0.9, 1.5, 0.3]),
            RawOutput([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            RawOutput([1.0, 1.0, 1.0, 2.0, 2.0, 1.0]),
        ];
        for raw in &raws {
            let p = reconstruct_profile(raw);
            assert!((p.goal + p.group + p.interaction - 1.0).abs() < 2e-4);
            assert!(p.goal >= 0.0 && p.group >= 0.0 && p.interaction >= 0.0);
        }
    }

    proptest::proptest! {
        /// Whatever the regressor emits, the reconstructed weights form
        /// a convex combination and connection passes through rounded.
        #[test]
        fn reconstruction_is_always_convex(
            raw in proptest::array::uniform6(-2.0f32..2.0)
        ) {
            let p = reconstruct_profile(&RawOutput(raw));
            proptest::prop_assert!((p.goal + p.group + p.interaction - 1.0).abs() < 2e-4);
            proptest::prop_assert!(p.goal >= 0.0 && p.group >= 0.0 && p.interaction >= 0.0);
            proptest::prop_assert!(p.goal.is_finite() && p.connection.is_finite());
        }
    }

    #[test]
    fn default_model_reconstructs_to_the_fallback_profile() {
        let raw = DefaultProfileModel
            .predict(&[], &[])
            .and_then(|_| DefaultProfileModel.predict(&[], &[]))
            .unwrap();
        assert!(raw.is_empty());

        let output = RawOutput([1.0, 0.0, 0.0, 1.0, 1.0, 0.75]);
        let profile = reconstruct_profile(&output);
        assert_eq!(profile, WeightProfile::fallback());
    }

    #[test]
    fn default_model_skips_invalid_images() {
        use throng_core::GridDims;
        use throng_raster::{FeatureImage, Grid};
        let dims = GridDims::new(4, 4);
        let plane = Grid::new(dims, 0.5);
        let zero = Grid::new(dims, 0.0);
        let image = FeatureImage::from_planes(&plane, &plane, &zero, &zero, &zero);
        let outputs = DefaultProfileModel
            .predict(&[image.clone(), image], &[true, false])
            .unwrap();
        assert!(outputs[0].is_some());
        assert!(outputs[1].is_none());
    }
}
