//! Rasterization of crowd behavior onto fixed-size feature planes.
//!
//! Five planes describe one cell's traffic: velocity-x, velocity-z,
//! deviation-from-goal, group, and connectivity. Every plane goes
//! through the same accumulate-then-average primitive ([`Accumulator`]),
//! so rebuilding from the same agent set is bit-reproducible and no
//! pixel can ever hold NaN or leave its documented range.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accum;
pub mod env;
pub mod grid;
pub mod image;
pub mod planes;

pub use accum::Accumulator;
pub use env::{build_env_grid, EnvObject};
pub use grid::Grid;
pub use image::{FeatureImage, CHANNELS};
pub use planes::{
    build_connect_plane, build_dfg_plane, build_group_plane, build_velocity_planes,
};
