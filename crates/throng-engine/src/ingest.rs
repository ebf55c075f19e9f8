//! Field-recording derivation and normalization.
//!
//! Camera tracks arrive as raw `(frame, x, z)` records in capture
//! units. This stage derives per-sample speed and velocity from
//! consecutive deltas, fences positional outliers with the
//! interquartile-range rule computed over the whole recording, and
//! normalizes positions into the unit square and speeds by the
//! recording's maximum speed.

use throng_core::Position;
use throng_io::{EnvExtent, RawTrajectory};

/// One derived, normalized sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedSample {
    /// Timestamp, in seconds.
    pub frame: f64,
    /// Position in unit coordinates.
    pub position: Position,
    /// Speed, normalized by the recording maximum.
    pub speed: f64,
    /// x velocity component, normalized by the recording maximum speed.
    pub velocity_x: f64,
    /// z velocity component, normalized by the recording maximum speed.
    pub velocity_z: f64,
}

/// One trajectory after derivation and normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedTrajectory {
    /// Samples, in time order.
    pub samples: Vec<NormalizedSample>,
}

/// Linear-interpolation quantile of a sorted slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let t = pos - lo as f64;
        sorted[lo] * (1.0 - t) + sorted[hi] * t
    }
}

/// IQR fences over `values` using the given quantile pair.
fn iqr_bounds(values: &mut Vec<f64>, low_q: f64, high_q: f64) -> (f64, f64) {
    // Non-finite samples were dropped during derivation, so a total
    // order exists.
    values.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile_sorted(values, low_q);
    let q3 = quantile_sorted(values, high_q);
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

/// Wide quantile pair for the positional outlier fences.
///
/// Tracker glitches produce isolated positions far off the walkable
/// area; the 0.2/0.8 quantiles with 1.5 IQR fences drop those without
/// touching dense traffic.
const FENCE_LOW_QUANTILE: f64 = 0.2;
const FENCE_HIGH_QUANTILE: f64 = 0.8;

struct Derived {
    frame: f64,
    x: f64,
    z: f64,
    speed: f64,
    velocity_x: f64,
    velocity_z: f64,
}

/// Derive speed/velocity and normalize a recording's trajectories.
///
/// Trajectories that lose every sample to the fences come back empty
/// rather than disappearing, so indices stay aligned with the input.
pub fn derive_and_normalize(
    raw: &[RawTrajectory],
    extent: &EnvExtent,
) -> Vec<NormalizedTrajectory> {
    // Pass 1: per-sample derivation from consecutive deltas. The first
    // record of each trajectory has no delta and is dropped; records
    // with a non-increasing timestamp would divide by zero and are
    // dropped the same way.
    let derived: Vec<Vec<Derived>> = raw
        .iter()
        .map(|trajectory| {
            trajectory
                .samples
                .windows(2)
                .filter_map(|pair| {
                    let dt = pair[1].timestamp - pair[0].timestamp;
                    let finite = pair[1].x.is_finite() && pair[1].z.is_finite() && dt.is_finite();
                    if dt <= 0.0 || !finite {
                        return None;
                    }
                    let dx = pair[1].x - pair[0].x;
                    let dz = pair[1].z - pair[0].z;
                    Some(Derived {
                        frame: pair[1].timestamp,
                        x: pair[1].x,
                        z: pair[1].z,
                        speed: (dx * dx + dz * dz).sqrt() / dt,
                        velocity_x: dx / dt,
                        velocity_z: dz / dt,
                    })
                })
                .collect()
        })
        .collect();

    // Pass 2: recording-wide statistics.
    let mut all_x: Vec<f64> = derived.iter().flatten().map(|s| s.x).collect();
    let mut all_z: Vec<f64> = derived.iter().flatten().map(|s| s.z).collect();
    let max_speed = derived
        .iter()
        .flatten()
        .map(|s| s.speed)
        .fold(0.0_f64, f64::max);
    let (x_lo, x_hi) = iqr_bounds(&mut all_x, FENCE_LOW_QUANTILE, FENCE_HIGH_QUANTILE);
    let (z_lo, z_hi) = iqr_bounds(&mut all_z, FENCE_LOW_QUANTILE, FENCE_HIGH_QUANTILE);

    // Pass 3: fence and normalize.
    let width = extent.width();
    let height = extent.height();
    derived
        .into_iter()
        .map(|samples| NormalizedTrajectory {
            samples: samples
                .into_iter()
                .filter(|s| s.x >= x_lo && s.x <= x_hi && s.z >= z_lo && s.z <= z_hi)
                .map(|s| NormalizedSample {
                    frame: s.frame,
                    position: Position::new(
                        (s.x - extent.min_x) / width,
                        (s.z - extent.min_z) / height,
                    ),
                    speed: if max_speed > 0.0 { s.speed / max_speed } else { 0.0 },
                    velocity_x: if max_speed > 0.0 {
                        s.velocity_x / max_speed
                    } else {
                        0.0
                    },
                    velocity_z: if max_speed > 0.0 {
                        s.velocity_z / max_speed
                    } else {
                        0.0
                    },
                })
                .collect(),
        })
        .collect()
}
