//! The field-recording analysis pipeline.
//!
//! Turns one recording (camera tracks plus environment descriptor)
//! into per-window, per-cell feature images, hands the batch to the
//! [`WeightModel`] boundary, and assembles the analysis document:
//! predicted profiles, representative profile clusters, and the agent
//! registry.

use std::path::Path;

use throng_core::config::PipelineConfig;
use throng_core::{GridDims, GridPoint, Projection, WeightProfile};
use throng_io::{
    list_trajectory_files, read_field_env, read_trajectory, write_tensor_file, AnalysisDocument,
    AnalysisEnvironment, ProfileDoc, RawTrajectory,
};
use throng_raster::{build_env_grid, FeatureImage};

use crate::assign::{assign_to_cells, grid_separation, CellPartition, TimeWindow};
use crate::cell::build_cell;
use crate::error::PipelineError;
use crate::ingest::derive_and_normalize;
use crate::model::{reconstruct_profile, ModelError, WeightModel};
use crate::profiles::{assign_profiles, cluster_profiles};
use crate::registry::{build_registry, RegistryParams};

/// Parameters of one analysis run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzeOptions {
    /// Frames per analysis window.
    pub frame_interval: u64,
    /// Capture framerate, frames per second.
    pub framerate: f64,
    /// Capture width, used only for the cell aspect ratio.
    pub video_width: u32,
    /// Capture height, used only for the cell aspect ratio.
    pub video_height: u32,
    /// Scale of the cell partition (larger side cell count).
    pub grid_multiplier: u32,
    /// Entry-registry thresholds.
    pub registry: RegistryParams,
    /// Eps for the representative-profile clustering.
    pub profile_cluster_eps: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            frame_interval: 250,
            framerate: 25.0,
            video_width: 60,
            video_height: 48,
            grid_multiplier: 4,
            registry: RegistryParams::default(),
            profile_cluster_eps: 0.125,
        }
    }
}

/// Everything one analysis run produces.
#[derive(Debug)]
pub struct AnalyzeOutput {
    /// The assembled output document.
    pub document: AnalysisDocument,
    /// Every cell image, in window-then-row-major order.
    pub images: Vec<FeatureImage>,
    /// Per-image traffic validity, parallel to `images`.
    pub valid: Vec<bool>,
    /// The cell partition used.
    pub partition: CellPartition,
    /// Last frame covered by any window.
    pub max_frame: u64,
}

/// Analyze one recording directory.
pub fn analyze_scenario(
    dir: &Path,
    cfg: &PipelineConfig,
    opts: &AnalyzeOptions,
    model: &dyn WeightModel,
) -> Result<AnalyzeOutput, PipelineError> {
    cfg.validate().map_err(PipelineError::Config)?;
    let partition = grid_separation(opts.video_width, opts.video_height, opts.grid_multiplier);

    let env = read_field_env(&dir.join("env.json"))?;
    let mut raw: Vec<RawTrajectory> = Vec::new();
    for path in list_trajectory_files(dir)? {
        if let Some(trajectory) =
            read_trajectory(&path, cfg.ingest.row_step, cfg.ingest.min_rows)?
        {
            raw.push(trajectory);
        }
    }

    let normalized = derive_and_normalize(&raw, &env.extent);
    let registry = build_registry(&normalized, opts.framerate, &opts.registry);

    let mosaic = GridDims::new(
        cfg.raster.dims.width * partition.cols,
        cfg.raster.dims.height * partition.rows,
    );
    let env_grid = build_env_grid(&env.objects, mosaic, Projection::Unit);

    let max_time = normalized
        .iter()
        .flat_map(|t| t.samples.iter().map(|s| s.frame))
        .fold(0.0_f64, f64::max);
    let max_frame = (max_time * opts.framerate).ceil() as u64;

    // One pass per window: assign, build every cell, collect images in
    // window-then-row-major order. Agent ids stay unique across windows.
    let mut images = Vec::new();
    let mut valid = Vec::new();
    let mut next_agent_id = 0u32;
    let mut window_start = 0u64;
    while window_start < max_frame {
        let window = TimeWindow {
            start: window_start as f64 / opts.framerate,
            end: (window_start + opts.frame_interval) as f64 / opts.framerate,
        };
        let cells = assign_to_cells(&normalized, &partition, window, &mut next_agent_id);
        for (row, row_cells) in cells.iter().enumerate() {
            for (col, agents) in row_cells.iter().enumerate() {
                let origin = GridPoint {
                    x: col as u32 * cfg.raster.dims.width,
                    z: row as u32 * cfg.raster.dims.height,
                };
                let env_view = env_grid.view(origin, cfg.raster.dims);
                let built = build_cell(agents, Some(&env_view), cfg);
                images.push(built.image);
                valid.push(built.valid);
            }
        }
        window_start += opts.frame_interval;
    }

    let raw_outputs = model.predict(&images, &valid)?;
    if raw_outputs.len() != images.len() {
        return Err(PipelineError::Model(ModelError::BatchMismatch {
            expected: images.len(),
            found: raw_outputs.len(),
        }));
    }
    let predictions: Vec<Option<WeightProfile>> = raw_outputs
        .iter()
        .map(|output| output.as_ref().map(reconstruct_profile))
        .collect();

    let classes = assign_profiles(&predictions, &partition, opts.frame_interval, max_frame);
    let observed: Vec<WeightProfile> = predictions.iter().filter_map(|p| *p).collect();
    let clusters: Vec<ProfileDoc> = cluster_profiles(&observed, opts.profile_cluster_eps, 1)
        .into_iter()
        .map(ProfileDoc::from)
        .collect();

    let document = AnalysisDocument {
        environment: AnalysisEnvironment {
            width: partition.cols,
            height: partition.rows,
            frame_interval: opts.frame_interval,
            framerate: opts.framerate,
        },
        classes,
        clusters,
        agents: registry,
    };

    Ok(AnalyzeOutput {
        document,
        images,
        valid,
        partition,
        max_frame,
    })
}

/// Write every cell image of an analysis run as a reference tensor.
///
/// Files are keyed `<window_start>_<row>_<col>.trf`, matching the keys
/// of the output document.
pub fn write_reference_tensors(
    out_dir: &Path,
    output: &AnalyzeOutput,
    frame_interval: u64,
) -> Result<u64, PipelineError> {
    let mut written = 0u64;
    let mut index = 0usize;
    let mut window_start = 0u64;
    'windows: while window_start < output.max_frame {
        for row in 0..output.partition.rows {
            for col in 0..output.partition.cols {
                if index >= output.images.len() {
                    break 'windows;
                }
                let name = format!("{window_start}_{row}_{col}.trf");
                write_tensor_file(&out_dir.join(name), &output.images[index])?;
                index += 1;
                written += 1;
            }
        }
        window_start += frame_interval;
    }
    Ok(written)
}
