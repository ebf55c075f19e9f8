//! File I/O for the Throng pipeline.
//!
//! Covers the four on-disk artifacts: per-agent trajectory files
//! (semicolon-separated records), environment descriptors (JSON),
//! compressed feature tensors (gzip-wrapped binary), and the label /
//! analysis JSON outputs. All readers validate their input and report
//! malformed data with file and line context; all writers are
//! deterministic for identical inputs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod env;
pub mod error;
pub mod labels;
pub mod tensor;
pub mod trajectory;

pub use env::{read_field_env, read_synthetic_env, EnvExtent, FieldEnvironment};
pub use error::{CodecError, JsonError, ReadError};
pub use labels::{
    write_analysis, write_labels, AgentRecord, AnalysisDocument, AnalysisEnvironment, LabelMap,
    ProfileDoc,
};
pub use tensor::{
    read_tensor, read_tensor_file, write_tensor, write_tensor_file, FORMAT_VERSION, MAGIC,
};
pub use trajectory::{list_trajectory_files, read_trajectory, RawSample, RawTrajectory};
