//! Reusable trajectory and scenario fixtures.
//!
//! Everything here is seeded: the same seed always yields the same
//! samples, so fixtures are safe to use in determinism tests.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fixtures;

pub use fixtures::{
    jittered_line_samples, samples_to_csv, walker_agent, write_synthetic_scenario,
};
