//! Per-agent trajectory file reading.
//!
//! One file per agent: a header line followed by semicolon-separated
//! records `timestamp;x;z[;extra...]`. Extra columns are ignored. Files
//! with too few rows are skipped whole rather than producing a partial
//! agent.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::ReadError;

/// One raw trajectory record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawSample {
    /// Record timestamp, in seconds.
    pub timestamp: f64,
    /// Horizontal position.
    pub x: f64,
    /// Depth position.
    pub z: f64,
}

/// A whole trajectory file, in record order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTrajectory {
    /// Retained samples, in time order.
    pub samples: Vec<RawSample>,
}

/// List the trajectory files (`*.csv`) in a scenario directory.
///
/// Sorted by file name so the downstream agent numbering does not
/// depend on directory iteration order.
pub fn list_trajectory_files(dir: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("csv")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Read one trajectory file.
///
/// The header line is skipped; of the remaining data rows, every
/// `row_step`-th is retained. Returns `Ok(None)` when fewer than
/// `min_rows` rows survive, the caller's signal to skip the file whole.
pub fn read_trajectory(
    path: &Path,
    row_step: usize,
    min_rows: usize,
) -> Result<Option<RawTrajectory>, ReadError> {
    let reader = BufReader::new(File::open(path)?);
    let display = path.display().to_string();
    let mut samples = Vec::new();

    let mut data_row = 0usize;
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line_index == 0 || line.trim().is_empty() {
            continue;
        }
        let keep = data_row % row_step == 0;
        data_row += 1;
        if !keep {
            continue;
        }

        let mut fields = line.split(';');
        let mut parse_field = |name: &str| -> Result<f64, ReadError> {
            let raw = fields.next().ok_or_else(|| ReadError::MalformedRow {
                path: display.clone(),
                line: line_index + 1,
                detail: format!("missing {name} field"),
            })?;
            raw.trim().parse::<f64>().map_err(|e| ReadError::MalformedRow {
                path: display.clone(),
                line: line_index + 1,
                detail: format!("bad {name} value {raw:?}: {e}"),
            })
        };

        samples.push(RawSample {
            timestamp: parse_field("timestamp")?,
            x: parse_field("x")?,
            z: parse_field("z")?,
        });
    }

    if samples.len() < min_rows {
        return Ok(None);
    }
    Ok(Some(RawTrajectory { samples }))
}
