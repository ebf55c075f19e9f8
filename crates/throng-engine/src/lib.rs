//! Scenario pipelines and the dataset-scale driver.
//!
//! This crate ties the lower layers together: it assigns trajectory
//! samples to cells and time windows, builds every cell's feature
//! planes, and drives whole datasets through a fixed-size worker pool.
//! Two end-to-end pipelines exist: [`synthesize`](scenario) turns
//! simulation exports into training tensors plus a label map, and
//! [`analyze`](analyze) turns field recordings into predicted
//! weight-profile documents via the [`WeightModel`] boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analyze;
pub mod assign;
pub mod cell;
pub mod error;
pub mod ingest;
pub mod model;
pub mod pool;
pub mod profiles;
pub mod registry;
pub mod report;
pub mod scenario;

pub use analyze::{analyze_scenario, write_reference_tensors, AnalyzeOptions, AnalyzeOutput};
pub use assign::{assign_to_cells, grid_separation, CellPartition, TimeWindow};
pub use cell::{build_cell, BuiltCell};
pub use error::PipelineError;
pub use ingest::{derive_and_normalize, NormalizedSample, NormalizedTrajectory};
pub use model::{reconstruct_profile, DefaultProfileModel, ModelError, RawOutput, WeightModel};
pub use pool::{resolved_worker_count, run_parallel};
pub use profiles::{assign_profiles, cluster_profiles};
pub use registry::{build_registry, RegistryParams};
pub use report::RunReport;
pub use scenario::{process_scenario, synthesize_dataset, ScenarioOutput};
