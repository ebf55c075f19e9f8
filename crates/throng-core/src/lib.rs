//! Core types and configuration for the Throng crowd-analysis pipeline.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Throng workspace:
//! typed identifiers, 2D geometry and rasterization primitives, and the
//! pipeline configuration structures shared by every engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod geom;
pub mod id;
pub mod weights;

pub use config::{
    ClusteringConfig, ConfigError, GroupingConfig, IngestConfig, PipelineConfig, RasterConfig,
    SavgolConfig, StationaryConfig, WarmupSkip,
};
pub use geom::{
    bresenham, distance, normalize, project_point, project_segment, BoundsPolicy, GridDims,
    GridPoint, Position, Projection,
};
pub use id::{AgentId, ClusterId};
pub use weights::WeightProfile;
