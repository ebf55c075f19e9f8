//! Building one cell's feature image from its agent set.

use throng_core::config::PipelineConfig;
use throng_core::AgentId;
use throng_motion::{detect_stop_intervals, Agent, StopInterval};
use throng_raster::{
    build_connect_plane, build_dfg_plane, build_group_plane, build_velocity_planes, FeatureImage,
    Grid,
};
use throng_social::{cluster_agents, group_agents, ClusterStats};

/// One cell's finished feature image plus its traffic validity flag.
#[derive(Clone, Debug)]
pub struct BuiltCell {
    /// The stacked five-channel image.
    pub image: FeatureImage,
    /// True when the cell saw enough traffic to be trusted downstream.
    pub valid: bool,
}

/// Build all five planes for one cell.
///
/// The planes are derived, never authoritative: rebuilding from the
/// same agent set produces bit-identical values. `env` is the cell's
/// slice of the environment grid, overlaid onto the group plane.
pub fn build_cell(agents: &[Agent], env: Option<&Grid>, cfg: &PipelineConfig) -> BuiltCell {
    let (velocity_x, velocity_z) = build_velocity_planes(agents, &cfg.raster);
    let dfg = build_dfg_plane(agents, &cfg.raster);

    let stops: Vec<(AgentId, Vec<StopInterval>)> = agents
        .iter()
        .map(|agent| {
            let intervals =
                detect_stop_intervals(agent, &cfg.stationary, cfg.ingest.timestep).into_vec();
            (agent.id(), intervals)
        })
        .collect();
    let groups = group_agents(&stops, &cfg.grouping);
    let group = build_group_plane(&groups, env, &cfg.grouping, &cfg.raster);

    let clusters = cluster_agents(agents, &cfg.clustering);
    let stats: Vec<ClusterStats> = clusters
        .values()
        .map(|members| {
            let refs: Vec<&Agent> = agents
                .iter()
                .filter(|agent| members.contains(&agent.id()))
                .collect();
            ClusterStats::new(&refs)
        })
        .collect();
    let connect = build_connect_plane(&stats, &cfg.clustering, &cfg.raster);

    let image = FeatureImage::from_planes(&velocity_x, &velocity_z, &dfg, &group, &connect);
    let valid = image.is_valid(cfg.raster.valid_traffic_fraction);
    BuiltCell { image, valid }
}
