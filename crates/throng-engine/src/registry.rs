//! The agent entry registry.
//!
//! Analysis output carries a registry of every tracked agent: when and
//! where it entered and left the area, and a greedy "entry group"
//! assignment joining agents that appeared and disappeared together
//! (people arriving as a party). Grouping here is over whole
//! trajectories, unlike the per-cell stop grouping.

use indexmap::IndexMap;
use throng_io::AgentRecord;

use crate::ingest::NormalizedTrajectory;

/// Thresholds for the greedy entry-group assignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegistryParams {
    /// Maximum combined spawn/goal distance for two agents to share a
    /// group.
    pub dist_threshold: f64,
    /// Maximum combined spawn/goal frame difference.
    pub frame_threshold: f64,
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            dist_threshold: 0.25,
            frame_threshold: 25.0,
        }
    }
}

/// Combined Euclidean distance over both endpoints.
fn endpoint_distance(a: &AgentRecord, b: &AgentRecord) -> f64 {
    let dx = a.spawn_x - b.spawn_x;
    let dz = a.spawn_z - b.spawn_z;
    let gx = a.goal_x - b.goal_x;
    let gz = a.goal_z - b.goal_z;
    (dx * dx + dz * dz + gx * gx + gz * gz).sqrt()
}

/// Combined spawn/goal frame difference.
fn frame_difference(a: &AgentRecord, b: &AgentRecord) -> f64 {
    let spawn = a.spawn_frame.abs_diff(b.spawn_frame);
    let goal = a.goal_frame.abs_diff(b.goal_frame);
    (spawn + goal) as f64
}

/// Build the registry from normalized trajectories.
///
/// Agents are visited in spawn-frame order; each joins the first
/// existing group containing a member close in both endpoint distance
/// and frame difference, or founds a new group. The result maps spawn
/// frame (as text, for the JSON output) to the records that spawned
/// there.
pub fn build_registry(
    trajectories: &[NormalizedTrajectory],
    framerate: f64,
    params: &RegistryParams,
) -> IndexMap<String, Vec<AgentRecord>> {
    let mut records: Vec<AgentRecord> = trajectories
        .iter()
        .filter_map(|trajectory| {
            let first = trajectory.samples.first()?;
            let last = trajectory.samples.last()?;
            Some(AgentRecord {
                spawn_frame: (first.frame * framerate).round() as u64,
                spawn_x: first.position.x,
                spawn_z: first.position.z,
                goal_frame: (last.frame * framerate).round() as u64,
                goal_x: last.position.x,
                goal_z: last.position.z,
                entry_group: 0,
            })
        })
        .collect();
    records.sort_by_key(|r| r.spawn_frame);

    let mut groups: Vec<Vec<AgentRecord>> = Vec::new();
    for record in &mut records {
        let found = groups.iter().position(|members| {
            members.iter().any(|m| {
                endpoint_distance(m, record) < params.dist_threshold
                    && frame_difference(m, record) < params.frame_threshold
            })
        });
        let gid = match found {
            Some(gid) => gid,
            None => {
                groups.push(Vec::new());
                groups.len() - 1
            }
        };
        record.entry_group = gid as u32;
        groups[gid].push(*record);
    }

    let mut registry: IndexMap<String, Vec<AgentRecord>> = IndexMap::new();
    for record in records {
        registry
            .entry(record.spawn_frame.to_string())
            .or_default()
            .push(record);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::NormalizedSample;
    use throng_core::Position;

    fn trajectory(samples: Vec<(f64, f64, f64)>) -> NormalizedTrajectory {
        NormalizedTrajectory {
            samples: samples
                .into_iter()
                .map(|(frame, x, z)| NormalizedSample {
                    frame,
                    position: Position::new(x, z),
                    speed: 0.5,
                    velocity_x: 0.0,
                    velocity_z: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn companions_share_an_entry_group() {
        let trajectories = vec![
            trajectory(vec![(0.0, 0.1, 0.1), (4.0, 0.9, 0.9)]),
            trajectory(vec![(0.04, 0.12, 0.1), (4.04, 0.92, 0.9)]),
        ];
        let registry = build_registry(&trajectories, 25.0, &RegistryParams::default());
        let records: Vec<&AgentRecord> = registry.values().flatten().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entry_group, records[1].entry_group);
    }

    #[test]
    fn strangers_get_distinct_groups() {
        let trajectories = vec![
            trajectory(vec![(0.0, 0.1, 0.1), (4.0, 0.9, 0.9)]),
            trajectory(vec![(40.0, 0.8, 0.2), (44.0, 0.1, 0.6)]),
        ];
        let registry = build_registry(&trajectories, 25.0, &RegistryParams::default());
        let records: Vec<&AgentRecord> = registry.values().flatten().collect();
        assert_ne!(records[0].entry_group, records[1].entry_group);
    }

    #[test]
    fn registry_is_keyed_by_spawn_frame_in_order() {
        let trajectories = vec![
            trajectory(vec![(2.0, 0.5, 0.5), (3.0, 0.6, 0.6)]),
            trajectory(vec![(0.0, 0.1, 0.1), (1.0, 0.2, 0.2)]),
        ];
        let registry = build_registry(&trajectories, 25.0, &RegistryParams::default());
        let keys: Vec<&String> = registry.keys().collect();
        assert_eq!(keys, vec!["0", "50"]);
    }

    #[test]
    fn empty_trajectories_are_ignored() {
        let trajectories = vec![trajectory(vec![]), trajectory(vec![(0.0, 0.5, 0.5)])];
        let registry = build_registry(&trajectories, 25.0, &RegistryParams::default());
        let records: Vec<&AgentRecord> = registry.values().flatten().collect();
        assert_eq!(records.len(), 1);
    }
}
