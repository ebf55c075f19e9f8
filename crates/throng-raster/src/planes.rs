//! The five feature-plane builders.
//!
//! Each builder folds one aspect of a cell's traffic into an
//! [`Accumulator`]: velocity planes from raw samples, the
//! deviation-from-goal plane from spawn-goal lines, the group plane from
//! stop-overlap polylines, and the connectivity plane from cluster
//! centre-of-mass tracks.

use throng_core::config::{ClusteringConfig, GroupingConfig, RasterConfig};
use throng_core::{normalize, project_point, project_segment};
use throng_motion::Agent;
use throng_social::{ClusterStats, Group};

use crate::accum::Accumulator;
use crate::grid::Grid;

/// Neutral value for the velocity planes.
pub(crate) const VELOCITY_NEUTRAL: f64 = 0.5;

/// Build the velocity-x and velocity-z planes.
///
/// Every sample contributes its velocity component, scaled by
/// `velocity_norm` and remapped into `[-0.5, 0.5]` around the neutral
/// 0.5. Near-zero contributions receive a small positive bias so a
/// pixel that saw slow traffic stays distinguishable from one that saw
/// none. Samples projecting outside the grid are dropped.
pub fn build_velocity_planes(agents: &[Agent], cfg: &RasterConfig) -> (Grid, Grid) {
    let mut acc_x = Accumulator::new(cfg.dims, VELOCITY_NEUTRAL);
    let mut acc_z = Accumulator::new(cfg.dims, VELOCITY_NEUTRAL);

    for agent in agents {
        for (i, &pos) in agent.positions().iter().enumerate() {
            let Some(pixel) = project_point(pos, cfg.projection, cfg.dims) else {
                continue;
            };
            let mut vx = normalize(agent.velocity_x()[i] / cfg.velocity_norm, -1.0, 1.0, -0.5, 0.5);
            let mut vz = normalize(agent.velocity_z()[i] / cfg.velocity_norm, -1.0, 1.0, -0.5, 0.5);
            if vx.abs() < cfg.low_velocity_epsilon {
                vx += cfg.low_velocity_bias;
            }
            if vz.abs() < cfg.low_velocity_epsilon {
                vz += cfg.low_velocity_bias;
            }
            acc_x.add(pixel, vx);
            acc_z.add(pixel, vz);
        }
    }
    (acc_x.finalize(), acc_z.finalize())
}

/// Build the deviation-from-goal plane.
///
/// Each agent's spawn-goal line carries a single directness score:
/// high when the agent went straight to a nearby goal, low when it
/// wandered or crossed the whole cell.
pub fn build_dfg_plane(agents: &[Agent], cfg: &RasterConfig) -> Grid {
    let mut acc = Accumulator::new(cfg.dims, 0.0);

    for agent in agents {
        let Some((spawn, goal)) = agent.endpoints() else {
            continue;
        };
        let avg_deviation = agent.average_deviation() / cfg.max_dfg_distance;
        let path = agent.path_distance() / cfg.max_path_distance;
        let dfg = (0.3 * avg_deviation + 0.7 * path) / 2.0;
        let value = (1.0 - dfg).clamp(0.0, 1.0);

        for pixel in project_segment(spawn, goal, cfg.projection, cfg.bounds_policy, cfg.dims) {
            acc.add(pixel, value);
        }
    }
    acc.finalize()
}

/// Build the group plane, then overlay the environment.
///
/// Each group's deduplicated stop points rasterize as a connected
/// polyline whose pixels accumulate the group's normalized duration;
/// groups with fewer than two points draw nothing. After averaging,
/// non-zero environment pixels take precedence over computed values.
pub fn build_group_plane(
    groups: &[Group],
    env: Option<&Grid>,
    grouping: &GroupingConfig,
    cfg: &RasterConfig,
) -> Grid {
    let mut acc = Accumulator::new(cfg.dims, 0.0);

    for group in groups {
        if group.points.len() < 2 {
            continue;
        }
        let value = (group.duration / grouping.max_duration).clamp(0.0, 1.0);
        for pair in group.points.windows(2) {
            for pixel in
                project_segment(pair[0], pair[1], cfg.projection, cfg.bounds_policy, cfg.dims)
            {
                acc.add(pixel, value);
            }
        }
    }

    let mut plane = acc.finalize();
    if let Some(env) = env {
        debug_assert_eq!(env.dims(), cfg.dims);
        let points: Vec<_> = plane.points().collect();
        for p in points {
            let obstacle = env.at(p);
            if obstacle > 0.0 {
                plane.set(p, obstacle.clamp(0.0, 1.0));
            }
        }
    }
    plane
}

/// Build the connectivity plane.
///
/// Each cluster's centre-of-mass track rasterizes segment by segment
/// (skipping segments with an undefined endpoint); pixels accumulate an
/// inverted, `[0.1, 1]`-scaled interpersonal distance, so tighter
/// clusters paint stronger connectivity.
pub fn build_connect_plane(
    clusters: &[ClusterStats],
    clustering: &ClusteringConfig,
    cfg: &RasterConfig,
) -> Grid {
    let mut acc = Accumulator::new(cfg.dims, 0.0);
    let max_distance = clustering.connect_max_distance;

    for cluster in clusters {
        for i in 0..cluster.center_of_mass.len().saturating_sub(1) {
            let (Some(start), Some(end)) =
                (cluster.center_of_mass[i], cluster.center_of_mass[i + 1])
            else {
                continue;
            };
            let d = cluster.interpersonal_distances[i].clamp(0.0, max_distance);
            let closeness = 1.0 - d / max_distance;
            let value = normalize(closeness, 0.0, 1.0, 0.1, 1.0);
            for pixel in project_segment(start, end, cfg.projection, cfg.bounds_policy, cfg.dims) {
                acc.add(pixel, value);
            }
        }
    }
    acc.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use throng_core::config::PipelineConfig;
    use throng_core::{AgentId, GridPoint, Position};
    use throng_motion::StopInterval;

    fn cfg() -> PipelineConfig {
        PipelineConfig::field(25.0, 1)
    }

    fn walker(id: u32, from: (f64, f64), to: (f64, f64), n: usize) -> Agent {
        let mut agent = Agent::new(AgentId(id));
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            let pos = Position::new(
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
            );
            agent.push_derived(i as f64 * 0.04, pos, 0.04, 1.0, 1.0);
        }
        agent
    }

    #[test]
    fn empty_cell_velocity_planes_are_neutral() {
        let (vx, vz) = build_velocity_planes(&[], &cfg().raster);
        assert!(vx.as_slice().iter().all(|&v| v == 0.5));
        assert!(vz.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn rightward_walker_raises_velocity_x() {
        let agents = [walker(0, (0.1, 0.5), (0.9, 0.5), 50)];
        let (vx, _) = build_velocity_planes(&agents, &cfg().raster);
        let touched: Vec<f64> = vx
            .as_slice()
            .iter()
            .copied()
            .filter(|&v| v != 0.5)
            .collect();
        assert!(!touched.is_empty());
        assert!(touched.iter().all(|&v| v > 0.5));
    }

    #[test]
    fn stationary_walker_gets_bias_not_neutral() {
        let mut agent = Agent::new(AgentId(0));
        for i in 0..10 {
            agent.push_sample(i as f64 * 0.04, Position::new(0.5, 0.5), 0.0, 0.0, 0.0);
        }
        let (vx, _) = build_velocity_planes(&[agent], &cfg().raster);
        let pixel = vx.at(GridPoint { x: 32, z: 32 });
        assert!((pixel - 0.55).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_samples_are_dropped() {
        let agents = [walker(0, (1.5, 1.5), (2.0, 2.0), 20)];
        let (vx, _) = build_velocity_planes(&agents, &cfg().raster);
        assert!(vx.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn direct_short_path_paints_high_dfg() {
        let agents = [walker(0, (0.4, 0.5), (0.6, 0.5), 20)];
        let plane = build_dfg_plane(&agents, &cfg().raster);
        // Straight line, short path: dfg is small, painted value near 1.
        let v = plane.at(GridPoint { x: 32, z: 32 });
        assert!(v > 0.9, "got {v}");
    }

    #[test]
    fn empty_cell_dfg_plane_is_zero() {
        let plane = build_dfg_plane(&[], &cfg().raster);
        assert!(plane.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn group_polyline_paints_duration() {
        let config = cfg();
        let stops = vec![
            (
                AgentId(0),
                vec![StopInterval {
                    start: 1.0,
                    end: 8.5,
                    position: Position::new(0.25, 0.5),
                }],
            ),
            (
                AgentId(1),
                vec![StopInterval {
                    start: 1.0,
                    end: 8.5,
                    position: Position::new(0.3, 0.5),
                }],
            ),
        ];
        let groups = throng_social::group_agents(&stops, &config.grouping);
        let plane = build_group_plane(&groups, None, &config.grouping, &config.raster);
        // Overlap 7.5 s over a 15 s scale: intensity 0.5 along the line.
        let v = plane.at(GridPoint { x: 17, z: 32 });
        assert!((v - 0.5).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn environment_overlays_group_plane() {
        let config = cfg();
        let mut env = Grid::new(config.raster.dims, 0.0);
        env.set(GridPoint { x: 5, z: 5 }, 1.0);
        let plane = build_group_plane(&[], Some(&env), &config.grouping, &config.raster);
        assert_eq!(plane.at(GridPoint { x: 5, z: 5 }), 1.0);
        assert_eq!(plane.at(GridPoint { x: 6, z: 5 }), 0.0);
    }

    #[test]
    fn tight_cluster_paints_strong_connectivity() {
        let config = cfg();
        let a = walker(0, (0.1, 0.5), (0.9, 0.5), 30);
        let b = walker(1, (0.1, 0.52), (0.9, 0.52), 30);
        let stats = ClusterStats::new(&[&a, &b]);
        let plane = build_connect_plane(&[stats], &config.clustering, &config.raster);
        let touched: Vec<f64> = plane
            .as_slice()
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .collect();
        assert!(!touched.is_empty());
        // Separation 0.02 against a 0.25 scale: closeness 0.92, scaled
        // into [0.1, 1] gives 0.928.
        for v in touched {
            assert!((v - 0.928).abs() < 1e-6, "got {v}");
        }
    }

    #[test]
    fn all_planes_stay_in_unit_range() {
        let config = cfg();
        let agents = [
            walker(0, (0.1, 0.1), (0.9, 0.9), 40),
            walker(1, (0.9, 0.1), (0.1, 0.9), 40),
        ];
        let (vx, vz) = build_velocity_planes(&agents, &config.raster);
        let dfg = build_dfg_plane(&agents, &config.raster);
        for plane in [&vx, &vz, &dfg] {
            for &v in plane.as_slice() {
                assert!(v.is_finite());
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
