//! Error types for the I/O layer.

use std::fmt;
use std::io;

/// Errors from reading trajectory files and environment descriptors.
#[derive(Debug)]
pub enum ReadError {
    /// An I/O error occurred during read.
    Io(io::Error),
    /// A record could not be parsed.
    MalformedRow {
        /// File the row came from.
        path: String,
        /// 1-based line number.
        line: usize,
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// An environment descriptor failed to deserialize.
    MalformedDescriptor {
        /// File the descriptor came from.
        path: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
    /// A descriptor is structurally valid JSON but semantically unusable.
    InvalidDescriptor {
        /// File the descriptor came from.
        path: String,
        /// Description of the missing or inconsistent content.
        detail: String,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MalformedRow { path, line, detail } => {
                write!(f, "{path}:{line}: malformed row: {detail}")
            }
            Self::MalformedDescriptor { path, source } => {
                write!(f, "{path}: malformed descriptor: {source}")
            }
            Self::InvalidDescriptor { path, detail } => {
                write!(f, "{path}: invalid descriptor: {detail}")
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::MalformedDescriptor { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors from the feature-tensor codec.
#[derive(Debug)]
pub enum CodecError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with the expected magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// The header describes dimensions the payload does not match.
    DimensionMismatch {
        /// Description of the mismatch.
        detail: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"TRFI\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported tensor format version {found}")
            }
            Self::DimensionMismatch { detail } => write!(f, "dimension mismatch: {detail}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors from writing JSON outputs.
#[derive(Debug)]
pub enum JsonError {
    /// An I/O error occurred during write.
    Io(io::Error),
    /// Serialization failed.
    Serialize(serde_json::Error),
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for JsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
