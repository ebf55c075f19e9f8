//! Social structure extraction: grouping and similarity clustering.
//!
//! Two independent engines consume a cell's agent set:
//!
//! - the grouping engine joins agents whose stationary episodes overlap
//!   in time and space (people pausing together);
//! - the clustering engine joins agents whose whole trajectories run
//!   close together in time and space (people walking together), and
//!   derives per-cluster interpersonal-distance and centre-of-mass
//!   series for the connectivity plane.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod clustering;
pub mod grouping;

pub use cluster::ClusterStats;
pub use clustering::{cluster_agents, similar_trajectory};
pub use grouping::{group_agents, Group};
