//! Label and analysis JSON outputs.
//!
//! Training-data generation emits one `labels.json` mapping each image
//! key to its four ground-truth weights. Analysis mode emits one
//! document per recording: environment parameters, per-window-per-cell
//! predicted profiles, the clustered representative profiles, and the
//! agent registry. Maps keep insertion order so identical runs produce
//! identical bytes.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use throng_core::WeightProfile;

use crate::error::JsonError;

/// Image key to ground-truth weights, in insertion order.
pub type LabelMap = IndexMap<String, WeightProfile>;

#[derive(Serialize)]
struct LabelEntryDoc {
    wg: f64,
    wgr: f64,
    wi: f64,
    wc: f64,
}

impl From<&WeightProfile> for LabelEntryDoc {
    fn from(p: &WeightProfile) -> Self {
        Self {
            wg: p.goal,
            wgr: p.group,
            wi: p.interaction,
            wc: p.connection,
        }
    }
}

/// Write the training label map.
pub fn write_labels(path: &Path, labels: &LabelMap) -> Result<(), JsonError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let doc: IndexMap<&String, LabelEntryDoc> =
        labels.iter().map(|(k, v)| (k, v.into())).collect();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Serialized weight profile, by component name.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ProfileDoc {
    /// Goal-seeking weight.
    pub goal: f64,
    /// Social-grouping weight.
    pub group: f64,
    /// Interaction weight.
    pub interaction: f64,
    /// Connectivity weight.
    pub connection: f64,
}

impl From<WeightProfile> for ProfileDoc {
    fn from(p: WeightProfile) -> Self {
        Self {
            goal: p.goal,
            group: p.group,
            interaction: p.interaction,
            connection: p.connection,
        }
    }
}

/// Analysis-run spatial and temporal parameters.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct AnalysisEnvironment {
    /// Cell columns.
    pub width: u32,
    /// Cell rows.
    pub height: u32,
    /// Frames per analysis window.
    pub frame_interval: u64,
    /// Capture framerate.
    pub framerate: f64,
}

/// One agent's registry entry: where and when it entered and left, and
/// the entry group it was assigned to.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct AgentRecord {
    /// Frame at which the agent appeared.
    pub spawn_frame: u64,
    /// Entry position x, unit coordinates.
    pub spawn_x: f64,
    /// Entry position z, unit coordinates.
    pub spawn_z: f64,
    /// Frame at which the agent left.
    pub goal_frame: u64,
    /// Exit position x, unit coordinates.
    pub goal_x: f64,
    /// Exit position z, unit coordinates.
    pub goal_z: f64,
    /// Entry group id assigned by the registry.
    pub entry_group: u32,
}

/// The complete analysis output document.
#[derive(Debug, Serialize)]
pub struct AnalysisDocument {
    /// Run parameters.
    #[serde(rename = "Environment")]
    pub environment: AnalysisEnvironment,
    /// Predicted profiles: window key to cell key to profile.
    #[serde(rename = "Classes")]
    pub classes: IndexMap<String, IndexMap<String, ProfileDoc>>,
    /// Representative profiles after clustering.
    #[serde(rename = "Clusters")]
    pub clusters: Vec<ProfileDoc>,
    /// Agent registry, keyed by spawn frame.
    #[serde(rename = "Agents")]
    pub agents: IndexMap<String, Vec<AgentRecord>>,
}

/// Write the analysis document.
pub fn write_analysis(path: &Path, doc: &AnalysisDocument) -> Result<(), JsonError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, doc)?;
    Ok(())
}
