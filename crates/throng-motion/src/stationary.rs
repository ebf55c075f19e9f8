//! Stationary-interval detection.
//!
//! Walks an agent's samples in time order and emits the contiguous
//! low-speed episodes as ordered, non-overlapping intervals. Grouping
//! consumes these intervals; an agent that never pauses yields an empty
//! list and can never appear in a group.

use smallvec::SmallVec;
use throng_core::config::{StationaryConfig, WarmupSkip};
use throng_core::{distance, Position};

use crate::agent::Agent;

/// One contiguous low-speed episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopInterval {
    /// Episode start time, in seconds.
    pub start: f64,
    /// Episode end time, in seconds.
    pub end: f64,
    /// Last position recorded while the episode was open.
    pub position: Position,
}

impl StopInterval {
    /// Temporal overlap with another interval, zero when disjoint.
    pub fn overlap(&self, other: &StopInterval) -> f64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0.0)
    }
}

/// Detect an agent's stationary intervals.
///
/// Samples are examined every `cfg.stride` steps; each examined sample
/// is classified by the mean speed over the next `cfg.speed_window`
/// samples. A stationary sample opens or extends the current interval;
/// drifting at least `cfg.drift_threshold` from the interval's recorded
/// position closes it and opens a new one at the current timestamp; a
/// moving sample closes the open interval. Leading/trailing samples are
/// skipped per `cfg.warmup`.
///
/// `timestep` is the sampling period; a freshly opened interval starts
/// one period before the sample that opened it.
pub fn detect_stop_intervals(
    agent: &Agent,
    cfg: &StationaryConfig,
    timestep: f64,
) -> SmallVec<[StopInterval; 4]> {
    let mut intervals: SmallVec<[StopInterval; 4]> = SmallVec::new();
    let mut open: Option<StopInterval> = None;

    let times = agent.timesteps();
    let positions = agent.positions();
    let speeds = agent.speeds();
    let n = positions.len();

    let mut index = 0;
    while index < n {
        let skip = match cfg.warmup {
            WarmupSkip::TimeBefore(t0) => times[index] <= t0,
            WarmupSkip::Edges { head, tail } => index < head || index >= n.saturating_sub(tail),
        };
        if skip {
            index += cfg.stride;
            continue;
        }

        let window_end = (index + cfg.speed_window).min(n);
        let window = &speeds[index..window_end];
        let avg_speed = window.iter().sum::<f64>() / window.len() as f64;

        let time = times[index];
        let position = positions[index];

        if avg_speed < cfg.speed_threshold {
            match open.as_mut() {
                None => {
                    open = Some(StopInterval {
                        start: time - timestep,
                        end: time,
                        position,
                    });
                }
                Some(interval) => {
                    if distance(position, interval.position) >= cfg.drift_threshold {
                        intervals.push(*interval);
                        open = Some(StopInterval {
                            start: time - timestep,
                            end: time,
                            position,
                        });
                    } else {
                        interval.end = time;
                        interval.position = position;
                    }
                }
            }
        } else if let Some(interval) = open.take() {
            intervals.push(interval);
        }

        index += cfg.stride;
    }

    if let Some(interval) = open {
        intervals.push(interval);
    }
    intervals
}
