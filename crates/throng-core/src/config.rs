//! Pipeline configuration and validation.
//!
//! Every constant that tunes the feature-synthesis pipeline lives here,
//! in an explicit [`PipelineConfig`] passed to each engine at call time.
//! The two data sources (synthetic simulation exports and field camera
//! tracks) use different coordinate conventions, thresholds, and scaling
//! constants; [`PipelineConfig::synthetic`] and [`PipelineConfig::field`]
//! produce the two variants, and [`validate()`](PipelineConfig::validate)
//! checks structural invariants before a run starts.

use std::error::Error;
use std::fmt;

use crate::geom::{BoundsPolicy, GridDims, Projection};

// ── Sub-configs ────────────────────────────────────────────────────

/// Savitzky-Golay smoothing parameters.
///
/// Applied to the timestamp, x, and z series of each raw trajectory
/// before sampling. Series shorter than one window pass through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SavgolConfig {
    /// Convolution window length in samples. Must be odd.
    pub window: usize,
    /// Fitted polynomial order. Must be less than `window`.
    pub poly_order: usize,
}

/// Trajectory ingestion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IngestConfig {
    /// Seconds between two consecutive retained samples.
    pub timestep: f64,
    /// Upper clamp for derived per-sample speed.
    pub max_speed: f64,
    /// Speed assigned to an agent's first sample (no delta available).
    pub initial_speed: f64,
    /// Keep every `row_step`-th row of a trajectory file.
    pub row_step: usize,
    /// Trajectory files with fewer data rows are skipped whole.
    pub min_rows: usize,
    /// Optional smoothing applied before sampling.
    pub smoothing: Option<SavgolConfig>,
}

/// Which leading/trailing samples the stationary detector ignores.
///
/// Trackers produce noisy spawn and despawn segments; both variants skip
/// them, but by different criteria.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WarmupSkip {
    /// Skip samples whose timestamp is at or below this many seconds.
    TimeBefore(f64),
    /// Skip a fixed number of samples at each end of the series.
    Edges {
        /// Samples skipped at the start.
        head: usize,
        /// Samples skipped at the end.
        tail: usize,
    },
}

/// Stationary-interval detection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationaryConfig {
    /// Examine every `stride`-th sample.
    pub stride: usize,
    /// Number of samples averaged for the speed test.
    pub speed_window: usize,
    /// Mean speed below this value classifies a sample as stationary.
    pub speed_threshold: f64,
    /// Positional drift that closes the open interval and starts a new one.
    pub drift_threshold: f64,
    /// Leading/trailing samples to ignore.
    pub warmup: WarmupSkip,
}

/// Grouping-engine parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupingConfig {
    /// Maximum distance between two stop positions that still counts as
    /// pausing together.
    pub group_distance: f64,
    /// Overlap duration mapped to full group-plane intensity.
    pub max_duration: f64,
}

/// Similarity-clustering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusteringConfig {
    /// Positional tolerance for a matched sample pair.
    pub distance_threshold: f64,
    /// Matched fraction above which a pair of agents is similar.
    pub similarity_threshold: f64,
    /// Timestamp tolerance when searching for a matching sample.
    pub time_tolerance: f64,
    /// Interpersonal distance mapped to zero connectivity.
    pub connect_max_distance: f64,
}

/// Rasterization parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterConfig {
    /// Output plane dimensions.
    pub dims: GridDims,
    /// Continuous-to-pixel projection.
    pub projection: Projection,
    /// Out-of-bounds handling for rasterized line endpoints.
    pub bounds_policy: BoundsPolicy,
    /// Velocity components are divided by this before the `[-0.5, 0.5]`
    /// remap; a full-speed agent maps to the plane extremes.
    pub velocity_norm: f64,
    /// Velocity deviations with magnitude below this receive the bias.
    pub low_velocity_epsilon: f64,
    /// Deterministic bias added to near-zero velocity deviations so
    /// observed-but-slow traffic stays distinguishable from no data.
    pub low_velocity_bias: f64,
    /// Normalization constant for average perpendicular deviation.
    pub max_dfg_distance: f64,
    /// Normalization constant for spawn-to-goal path distance.
    pub max_path_distance: f64,
    /// Minimum fraction of non-neutral velocity-x pixels for a cell to
    /// count as observed.
    pub valid_traffic_fraction: f64,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`PipelineConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Grid width or height is zero.
    EmptyGrid,
    /// Timestep is NaN, infinite, zero, or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// A threshold or scale constant is not finite and positive.
    InvalidThreshold {
        /// Name of the offending field.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A fraction field is outside `[0, 1]`.
    InvalidFraction {
        /// Name of the offending field.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// Smoothing window/order combination is unusable.
    InvalidSmoothing {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// A stride or window count is zero.
    ZeroStride {
        /// Name of the offending field.
        name: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid dimensions must be non-zero"),
            Self::InvalidTimestep { value } => {
                write!(f, "timestep must be finite and positive, got {value}")
            }
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidFraction { name, value } => {
                write!(f, "{name} must be in [0, 1], got {value}")
            }
            Self::InvalidSmoothing { reason } => write!(f, "invalid smoothing: {reason}"),
            Self::ZeroStride { name } => write!(f, "{name} must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── PipelineConfig ─────────────────────────────────────────────────

/// Complete configuration for one feature-synthesis run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Ingestion parameters.
    pub ingest: IngestConfig,
    /// Stationary-interval detection parameters.
    pub stationary: StationaryConfig,
    /// Grouping-engine parameters.
    pub grouping: GroupingConfig,
    /// Similarity-clustering parameters.
    pub clustering: ClusteringConfig,
    /// Rasterization parameters.
    pub raster: RasterConfig,
}

impl PipelineConfig {
    /// Variant for synthetic simulation exports.
    ///
    /// World coordinates over a 13 m square arena, heavy smoothing of the
    /// physics-rate samples, clamped rasterization, and thresholds tuned
    /// to metre-scale distances.
    pub fn synthetic() -> Self {
        let interval = 0.04;
        let row_step = 2;
        Self {
            ingest: IngestConfig {
                timestep: interval * row_step as f64,
                max_speed: 2.5,
                initial_speed: 1.0,
                row_step,
                min_rows: 2,
                smoothing: Some(SavgolConfig {
                    window: 191,
                    poly_order: 4,
                }),
            },
            stationary: StationaryConfig {
                stride: 1,
                speed_window: 1,
                speed_threshold: 0.5,
                drift_threshold: 4.0,
                warmup: WarmupSkip::TimeBefore(3.0),
            },
            grouping: GroupingConfig {
                group_distance: 3.6,
                max_duration: 18.0,
            },
            clustering: ClusteringConfig {
                distance_threshold: 2.5,
                similarity_threshold: 0.6,
                time_tolerance: 2.0,
                connect_max_distance: 3.6,
            },
            raster: RasterConfig {
                dims: GridDims::new(64, 64),
                projection: Projection::World { half_extent: 6.5 },
                bounds_policy: BoundsPolicy::Clamp,
                velocity_norm: 2.5,
                low_velocity_epsilon: 0.01,
                low_velocity_bias: 0.05,
                max_dfg_distance: 5.0,
                max_path_distance: 15.0,
                valid_traffic_fraction: 0.01,
            },
        }
    }

    /// Variant for field camera tracks.
    ///
    /// Positions are pre-normalized into the unit square (cell-local
    /// after assignment), so segments with out-of-range endpoints are
    /// dropped rather than clamped and all scale constants shrink to
    /// unit-space magnitudes.
    ///
    /// `framerate` is the capture rate in frames per second; `row_step`
    /// is the row subsampling applied while reading.
    pub fn field(framerate: f64, row_step: usize) -> Self {
        Self {
            ingest: IngestConfig {
                timestep: row_step as f64 / framerate,
                max_speed: 1.0,
                initial_speed: 1.0,
                row_step,
                min_rows: 20,
                smoothing: None,
            },
            stationary: StationaryConfig {
                stride: 5,
                speed_window: 5,
                speed_threshold: 0.1,
                drift_threshold: 1.0,
                warmup: WarmupSkip::Edges { head: 10, tail: 10 },
            },
            grouping: GroupingConfig {
                group_distance: 0.25,
                max_duration: 15.0,
            },
            clustering: ClusteringConfig {
                distance_threshold: 0.2,
                similarity_threshold: 0.8,
                time_tolerance: 2.0,
                connect_max_distance: 0.25,
            },
            raster: RasterConfig {
                dims: GridDims::new(64, 64),
                projection: Projection::Unit,
                bounds_policy: BoundsPolicy::Filter,
                velocity_norm: 0.5,
                low_velocity_epsilon: 0.01,
                low_velocity_bias: 0.05,
                max_dfg_distance: 1.0,
                max_path_distance: 1.0,
                valid_traffic_fraction: 0.02,
            },
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.raster.dims.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        let ts = self.ingest.timestep;
        if !ts.is_finite() || ts <= 0.0 {
            return Err(ConfigError::InvalidTimestep { value: ts });
        }
        if self.ingest.row_step == 0 {
            return Err(ConfigError::ZeroStride { name: "row_step" });
        }
        if self.stationary.stride == 0 {
            return Err(ConfigError::ZeroStride { name: "stride" });
        }
        if self.stationary.speed_window == 0 {
            return Err(ConfigError::ZeroStride {
                name: "speed_window",
            });
        }

        let thresholds: [(&'static str, f64); 9] = [
            ("max_speed", self.ingest.max_speed),
            ("speed_threshold", self.stationary.speed_threshold),
            ("drift_threshold", self.stationary.drift_threshold),
            ("group_distance", self.grouping.group_distance),
            ("max_duration", self.grouping.max_duration),
            ("cluster_distance", self.clustering.distance_threshold),
            ("connect_max_distance", self.clustering.connect_max_distance),
            ("velocity_norm", self.raster.velocity_norm),
            ("max_dfg_distance", self.raster.max_dfg_distance),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if !self.raster.max_path_distance.is_finite() || self.raster.max_path_distance <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "max_path_distance",
                value: self.raster.max_path_distance,
            });
        }

        let fractions: [(&'static str, f64); 2] = [
            (
                "similarity_threshold",
                self.clustering.similarity_threshold,
            ),
            (
                "valid_traffic_fraction",
                self.raster.valid_traffic_fraction,
            ),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidFraction { name, value });
            }
        }

        if let Some(sg) = self.ingest.smoothing {
            if sg.window % 2 == 0 {
                return Err(ConfigError::InvalidSmoothing {
                    reason: format!("window {} must be odd", sg.window),
                });
            }
            if sg.poly_order >= sg.window {
                return Err(ConfigError::InvalidSmoothing {
                    reason: format!(
                        "poly_order {} must be less than window {}",
                        sg.poly_order, sg.window
                    ),
                });
            }
        }
        Ok(())
    }
}
