//! Throng: pedestrian-trajectory to crowd-behavior raster synthesis.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Throng sub-crates. For most users, adding `throng` as a
//! single dependency is sufficient.
//!
//! The pipeline turns per-agent `(timestamp, x, z)` trajectory logs
//! into fixed-size five-channel feature images (velocity-x, velocity-z,
//! deviation-from-goal, group, connectivity) describing local crowd
//! behavior, for consumption by an external convolutional weight
//! regressor.
//!
//! # Quick start
//!
//! ```rust
//! use throng::prelude::*;
//!
//! // Two agents walking the same corridor, unit coordinates.
//! let cfg = PipelineConfig::field(25.0, 1);
//! let mut agents = Vec::new();
//! for (id, z) in [(0u32, 0.48), (1u32, 0.52)] {
//!     let mut agent = Agent::new(AgentId(id));
//!     for i in 0..100 {
//!         let t = f64::from(i) * 0.04;
//!         let x = 0.05 + 0.9 * f64::from(i) / 99.0;
//!         agent.push_derived(t, Position::new(x, z), 0.04, 1.0, 1.0);
//!     }
//!     agents.push(agent);
//! }
//!
//! // Build the cell's five feature planes in one call.
//! let built = build_cell(&agents, None, &cfg);
//! assert_eq!(built.image.dims(), GridDims::new(64, 64));
//! assert!(built.valid);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`config`] | `throng-core` | pipeline configuration, geometry, ids |
//! | [`motion`] | `throng-motion` | agent model, smoothing, stop detection |
//! | [`social`] | `throng-social` | grouping and similarity clustering |
//! | [`raster`] | `throng-raster` | feature planes and image assembly |
//! | [`io`] | `throng-io` | trajectory/descriptor/tensor/label files |
//! | [`engine`] | `throng-engine` | cell assignment, drivers, worker pool |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Configuration, geometry, and identifier types.
pub mod config {
    pub use throng_core::*;
}

/// Agent trajectory model, smoothing, and stationary detection.
pub mod motion {
    pub use throng_motion::*;
}

/// Grouping and similarity clustering engines.
pub mod social {
    pub use throng_social::*;
}

/// Feature-plane rasterization and image assembly.
pub mod raster {
    pub use throng_raster::*;
}

/// File I/O: trajectories, descriptors, tensors, labels.
pub mod io {
    pub use throng_io::*;
}

/// Scenario pipelines and the dataset driver.
pub mod engine {
    pub use throng_engine::*;
}

/// The common imports for working with the pipeline.
pub mod prelude {
    pub use throng_core::{
        AgentId, BoundsPolicy, GridDims, GridPoint, PipelineConfig, Position, Projection,
        WeightProfile,
    };
    pub use throng_engine::{
        analyze_scenario, build_cell, process_scenario, synthesize_dataset, AnalyzeOptions,
        DefaultProfileModel, WeightModel,
    };
    pub use throng_motion::Agent;
    pub use throng_raster::{FeatureImage, CHANNELS};
}
