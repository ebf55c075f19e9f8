//! The training-data generation pipeline.
//!
//! One scenario directory holds a simulation export: an `env.json`
//! descriptor (ground-truth weights plus environment objects) and one
//! trajectory file per simulated agent. Processing a scenario smooths
//! and samples the trajectories, builds the feature planes over the
//! whole arena, crops to model tiles, and writes every tile with
//! enough observed traffic as a compressed tensor keyed into the label
//! map. [`synthesize_dataset`] drives a directory of scenarios through
//! the worker pool and merges the per-scenario label maps.

use std::path::{Path, PathBuf};

use throng_core::config::PipelineConfig;
use throng_core::{AgentId, GridPoint, Position};
use throng_io::{
    list_trajectory_files, read_synthetic_env, read_trajectory, write_labels, write_tensor_file,
    LabelMap,
};
use throng_motion::{Agent, SavgolFilter};
use throng_raster::build_env_grid;

use crate::cell::build_cell;
use crate::error::PipelineError;
use crate::pool::{resolved_worker_count, run_parallel};
use crate::report::RunReport;

/// Result of processing one scenario.
#[derive(Clone, Debug, Default)]
pub struct ScenarioOutput {
    /// Image key to ground-truth weights for every tile written.
    pub labels: LabelMap,
    /// Tensors written to disk.
    pub tensors_written: u64,
    /// Tiles dropped for insufficient traffic.
    pub cells_masked: u64,
}

/// Load one trajectory file into an agent.
///
/// The raw series are smoothed when a filter is configured, then
/// sampled every `row_step` rows starting after the first (whose
/// derivatives are undefined); speed and velocity derive from
/// consecutive retained samples.
fn load_agent(
    path: &Path,
    id: AgentId,
    smoother: Option<&SavgolFilter>,
    cfg: &PipelineConfig,
) -> Result<Option<Agent>, PipelineError> {
    let Some(raw) = read_trajectory(path, 1, cfg.ingest.min_rows)? else {
        return Ok(None);
    };

    let times: Vec<f64> = raw.samples.iter().map(|s| s.timestamp).collect();
    let xs: Vec<f64> = raw.samples.iter().map(|s| s.x).collect();
    let zs: Vec<f64> = raw.samples.iter().map(|s| s.z).collect();
    let (times, xs, zs) = match smoother {
        Some(filter) => (filter.smooth(&times), filter.smooth(&xs), filter.smooth(&zs)),
        None => (times, xs, zs),
    };

    let mut agent = Agent::new(id);
    for i in 1..times.len() {
        if i % cfg.ingest.row_step != 0 {
            continue;
        }
        agent.push_derived(
            times[i],
            Position::new(xs[i], zs[i]),
            cfg.ingest.timestep,
            cfg.ingest.max_speed,
            cfg.ingest.initial_speed,
        );
    }
    Ok((!agent.is_empty()).then_some(agent))
}

/// Process one scenario directory end-to-end.
///
/// Tensors land under `images_out`; the returned label map keys every
/// written tile by `img_<scenario>_<crop_x>_<crop_z>`, which is stable
/// across reruns.
pub fn process_scenario(
    scenario_dir: &Path,
    images_out: &Path,
    cfg: &PipelineConfig,
) -> Result<ScenarioOutput, PipelineError> {
    let scenario_name = scenario_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("scenario")
        .to_string();

    let (weights, objects) = read_synthetic_env(&scenario_dir.join("env.json"))?;
    let env_grid = build_env_grid(&objects, cfg.raster.dims, cfg.raster.projection);

    let smoother = match cfg.ingest.smoothing {
        Some(sg) => Some(SavgolFilter::new(sg).map_err(PipelineError::Config)?),
        None => None,
    };

    let mut agents = Vec::new();
    for (index, path) in list_trajectory_files(scenario_dir)?.iter().enumerate() {
        if let Some(agent) = load_agent(path, AgentId(index as u32), smoother.as_ref(), cfg)? {
            agents.push(agent);
        }
    }

    let built = build_cell(&agents, Some(&env_grid), cfg);

    let mut output = ScenarioOutput::default();
    let image_dims = built.image.dims();
    let tile = cfg.raster.dims;
    let mut z0 = 0;
    while z0 + tile.height <= image_dims.height {
        let mut x0 = 0;
        while x0 + tile.width <= image_dims.width {
            let crop = built.image.crop(GridPoint { x: x0, z: z0 }, tile);
            if crop.is_valid(cfg.raster.valid_traffic_fraction) {
                let key = format!("img_{scenario_name}_{x0}_{z0}");
                write_tensor_file(&images_out.join(format!("{key}.trf")), &crop)?;
                output.labels.insert(key, weights);
                output.tensors_written += 1;
            } else {
                output.cells_masked += 1;
            }
            x0 += tile.width;
        }
        z0 += tile.height;
    }
    Ok(output)
}

/// Drive a dataset of scenario directories through the worker pool.
///
/// Scenario directories are processed independently; a failing item is
/// recorded in the report and never aborts its siblings. The merged
/// label map is written to `labels_path` after all items finish.
pub fn synthesize_dataset(
    input_dir: &Path,
    images_out: &Path,
    labels_path: &Path,
    cfg: &PipelineConfig,
    workers: Option<usize>,
) -> Result<RunReport, PipelineError> {
    cfg.validate().map_err(PipelineError::Config)?;

    let mut scenario_dirs: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .map_err(|e| PipelineError::Read(e.into()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    scenario_dirs.sort();

    let results = run_parallel(
        scenario_dirs.clone(),
        resolved_worker_count(workers),
        |dir| process_scenario(&dir, images_out, cfg),
    );

    let mut report = RunReport::default();
    let mut labels = LabelMap::new();
    for (dir, result) in scenario_dirs.iter().zip(results) {
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("scenario")
            .to_string();
        match result {
            Ok(output) => {
                report.items_processed += 1;
                report.tensors_written += output.tensors_written;
                report.cells_masked += output.cells_masked;
                labels.extend(output.labels);
            }
            Err(error) => report.failures.push((name, error.to_string())),
        }
    }

    write_labels(labels_path, &labels)?;
    Ok(report)
}
