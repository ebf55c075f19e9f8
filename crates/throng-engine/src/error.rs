//! Error types for the pipeline layer.

use std::error::Error;
use std::fmt;

use throng_core::config::ConfigError;
use throng_io::{CodecError, JsonError, ReadError};

use crate::model::ModelError;

/// Errors from running a scenario pipeline or the dataset driver.
#[derive(Debug)]
pub enum PipelineError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// A trajectory file or descriptor could not be read.
    Read(ReadError),
    /// A feature tensor could not be written or read back.
    Codec(CodecError),
    /// A JSON output could not be written.
    Json(JsonError),
    /// The weight model failed on a batch.
    Model(ModelError),
    /// A worker thread panicked while processing an item.
    WorkerPanicked {
        /// Panic payload, when it was a string.
        detail: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Read(e) => write!(f, "read: {e}"),
            Self::Codec(e) => write!(f, "tensor codec: {e}"),
            Self::Json(e) => write!(f, "json output: {e}"),
            Self::Model(e) => write!(f, "model: {e}"),
            Self::WorkerPanicked { detail } => write!(f, "worker panicked: {detail}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Read(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::WorkerPanicked { .. } => None,
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ReadError> for PipelineError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

impl From<CodecError> for PipelineError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<JsonError> for PipelineError {
    fn from(e: JsonError) -> Self {
        Self::Json(e)
    }
}

impl From<ModelError> for PipelineError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}
