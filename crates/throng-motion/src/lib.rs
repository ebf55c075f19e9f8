//! Agent trajectory model, smoothing, and stationary detection.
//!
//! An [`Agent`] is one trajectory fragment confined to a single cell and
//! time window. Its sample series are append-only and index-aligned;
//! derived quantities (path distance, deviation from the spawn-goal
//! line, stationary intervals) are pure functions over the finalized
//! series.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod savgol;
pub mod stationary;

pub use agent::Agent;
pub use savgol::SavgolFilter;
pub use stationary::{detect_stop_intervals, StopInterval};
