//! The grouping engine.
//!
//! Joins agents into social groups from their stationary intervals: two
//! agents that pause concurrently within `group_distance` of each other
//! belong together. Membership is transitive; a later overlap that
//! connects two existing groups merges them.

use indexmap::IndexSet;
use throng_core::config::GroupingConfig;
use throng_core::{distance, AgentId, Position};
use throng_motion::StopInterval;

/// One social group: its members, the stop positions where overlaps
/// occurred, and the accumulated overlapping stationary time.
#[derive(Clone, Debug)]
pub struct Group {
    /// Member agent ids, in first-joined order.
    pub members: IndexSet<AgentId>,
    /// Stop positions contributing to the group, deduplicated in
    /// first-insertion order.
    pub points: Vec<Position>,
    /// Total overlapping stationary time, in seconds.
    pub duration: f64,
}

impl Group {
    fn new(a: AgentId, b: AgentId, pa: Position, pb: Position, duration: f64) -> Self {
        let mut members = IndexSet::new();
        members.insert(a);
        members.insert(b);
        let mut group = Self {
            members,
            points: Vec::new(),
            duration,
        };
        group.push_point(pa);
        group.push_point(pb);
        group
    }

    /// Append a point unless an identical one is already present.
    ///
    /// Positions compare by exact bit pattern: duplicates here come from
    /// the same interval being revisited, which reproduces the same
    /// float values exactly.
    fn push_point(&mut self, p: Position) {
        let key = (p.x.to_bits(), p.z.to_bits());
        if !self
            .points
            .iter()
            .any(|q| (q.x.to_bits(), q.z.to_bits()) == key)
        {
            self.points.push(p);
        }
    }
}

/// Index of the group containing `id`, if any.
fn find_group(groups: &[Group], id: AgentId) -> Option<usize> {
    groups.iter().position(|g| g.members.contains(&id))
}

/// Run the grouping engine over a cell's agents.
///
/// `stops` pairs each agent id with its stationary intervals; agents
/// with no intervals can never join a group. Pairs are examined in
/// insertion order (`i < j`); the *set* of final groups does not depend
/// on that order, though point order and floating `duration`
/// accumulation order may.
pub fn group_agents(stops: &[(AgentId, Vec<StopInterval>)], cfg: &GroupingConfig) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for (i, (id_a, intervals_a)) in stops.iter().enumerate() {
        for interval_a in intervals_a {
            for (id_b, intervals_b) in stops.iter().skip(i + 1) {
                for interval_b in intervals_b {
                    let overlap = interval_a.overlap(interval_b);
                    if overlap <= 0.0
                        || distance(interval_a.position, interval_b.position)
                            > cfg.group_distance
                    {
                        continue;
                    }

                    let group_a = find_group(&groups, *id_a);
                    let group_b = find_group(&groups, *id_b);
                    match (group_a, group_b) {
                        (None, None) => {
                            groups.push(Group::new(
                                *id_a,
                                *id_b,
                                interval_a.position,
                                interval_b.position,
                                overlap,
                            ));
                        }
                        (Some(ga), None) => {
                            groups[ga].members.insert(*id_b);
                            groups[ga].push_point(interval_b.position);
                        }
                        (None, Some(gb)) => {
                            groups[gb].members.insert(*id_a);
                            groups[gb].push_point(interval_a.position);
                        }
                        (Some(ga), Some(gb)) if ga != gb => {
                            // A later overlap revealed the two groups to
                            // be one; absorb the younger into the older.
                            let absorbed = groups.remove(gb.max(ga));
                            let keep = &mut groups[gb.min(ga)];
                            for id in absorbed.members {
                                keep.members.insert(id);
                            }
                            for p in absorbed.points {
                                keep.push_point(p);
                            }
                            keep.duration += overlap;
                        }
                        (Some(_), Some(_)) => {}
                    }
                }
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(start: f64, end: f64, x: f64, z: f64) -> StopInterval {
        StopInterval {
            start,
            end,
            position: Position::new(x, z),
        }
    }

    fn cfg() -> GroupingConfig {
        GroupingConfig {
            group_distance: 3.6,
            max_duration: 18.0,
        }
    }

    #[test]
    fn two_cohabiting_agents_form_one_group() {
        let stops = vec![
            (AgentId(0), vec![stop(0.0, 5.0, 1.0, 1.0)]),
            (AgentId(1), vec![stop(0.0, 5.0, 1.0, 1.0)]),
        ];
        let groups = group_agents(&stops, &cfg());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
        assert!(groups[0].members.contains(&AgentId(0)));
        assert!(groups[0].members.contains(&AgentId(1)));
        assert!((groups[0].duration - 5.0).abs() < 1e-12);
    }

    #[test]
    fn identical_points_deduplicate() {
        let stops = vec![
            (AgentId(0), vec![stop(0.0, 5.0, 1.0, 1.0)]),
            (AgentId(1), vec![stop(0.0, 5.0, 1.0, 1.0)]),
        ];
        let groups = group_agents(&stops, &cfg());
        assert_eq!(groups[0].points.len(), 1);
    }

    #[test]
    fn distant_agents_never_group() {
        let stops = vec![
            (AgentId(0), vec![stop(0.0, 5.0, 0.0, 0.0)]),
            (AgentId(1), vec![stop(0.0, 5.0, 10.0, 0.0)]),
        ];
        assert!(group_agents(&stops, &cfg()).is_empty());
    }

    #[test]
    fn disjoint_times_never_group() {
        let stops = vec![
            (AgentId(0), vec![stop(0.0, 1.0, 0.0, 0.0)]),
            (AgentId(1), vec![stop(2.0, 3.0, 0.0, 0.0)]),
        ];
        assert!(group_agents(&stops, &cfg()).is_empty());
    }

    #[test]
    fn agent_without_intervals_never_grouped() {
        let stops = vec![
            (AgentId(0), vec![]),
            (AgentId(1), vec![stop(0.0, 5.0, 0.0, 0.0)]),
            (AgentId(2), vec![stop(0.0, 5.0, 0.0, 0.0)]),
        ];
        let groups = group_agents(&stops, &cfg());
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].members.contains(&AgentId(0)));
    }

    #[test]
    fn chained_overlap_is_transitive() {
        // 0 overlaps 1, 1 overlaps 2, but 0 and 2 are out of range of
        // each other. One group of three.
        let stops = vec![
            (AgentId(0), vec![stop(0.0, 5.0, 0.0, 0.0)]),
            (AgentId(1), vec![stop(0.0, 5.0, 3.0, 0.0)]),
            (AgentId(2), vec![stop(0.0, 5.0, 6.0, 0.0)]),
        ];
        let groups = group_agents(&stops, &cfg());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 3);
    }

    #[test]
    fn late_overlap_merges_existing_groups() {
        // {0, 1, 4} form around the origin, {2, 3} at x = 30; the
        // second intervals of agents 2 and 4 then overlap at x = 50,
        // which must fuse the two groups into one.
        let stops = vec![
            (AgentId(0), vec![stop(0.0, 2.0, 0.0, 0.0)]),
            (AgentId(1), vec![stop(0.0, 2.0, 0.5, 0.0)]),
            (
                AgentId(2),
                vec![stop(10.0, 12.0, 30.0, 0.0), stop(20.0, 22.0, 50.0, 0.0)],
            ),
            (AgentId(3), vec![stop(10.0, 12.0, 30.5, 0.0)]),
            (
                AgentId(4),
                vec![stop(0.0, 2.0, 1.0, 0.0), stop(20.0, 22.0, 50.5, 0.0)],
            ),
        ];
        let groups = group_agents(&stops, &cfg());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 5);
    }

    proptest::proptest! {
        /// No agent ever lands in two groups, whatever the interval
        /// layout.
        #[test]
        fn membership_is_exclusive(
            intervals in proptest::collection::vec(
                proptest::collection::vec(
                    (0.0f64..20.0, 0.1f64..5.0, -6.0f64..6.0, -6.0f64..6.0),
                    0..3,
                ),
                0..6,
            )
        ) {
            let stops: Vec<(AgentId, Vec<StopInterval>)> = intervals
                .into_iter()
                .enumerate()
                .map(|(i, list)| {
                    let intervals = list
                        .into_iter()
                        .map(|(start, len, x, z)| stop(start, start + len, x, z))
                        .collect();
                    (AgentId(i as u32), intervals)
                })
                .collect();
            let groups = group_agents(&stops, &cfg());
            let mut seen = std::collections::HashSet::new();
            for group in &groups {
                proptest::prop_assert!(group.members.len() >= 2);
                proptest::prop_assert!(group.duration > 0.0);
                for id in &group.members {
                    proptest::prop_assert!(seen.insert(*id), "agent {id} in two groups");
                }
            }
        }
    }

    #[test]
    fn final_membership_is_order_independent() {
        let forward = vec![
            (AgentId(0), vec![stop(0.0, 5.0, 0.0, 0.0)]),
            (AgentId(1), vec![stop(0.0, 5.0, 1.0, 0.0)]),
            (AgentId(2), vec![stop(0.0, 5.0, 2.0, 0.0)]),
            (AgentId(3), vec![stop(8.0, 9.0, 30.0, 0.0)]),
            (AgentId(4), vec![stop(8.0, 9.0, 30.5, 0.0)]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let canonical = |groups: Vec<Group>| -> Vec<Vec<AgentId>> {
            let mut sets: Vec<Vec<AgentId>> = groups
                .into_iter()
                .map(|g| {
                    let mut ids: Vec<AgentId> = g.members.into_iter().collect();
                    ids.sort();
                    ids
                })
                .collect();
            sets.sort();
            sets
        };

        assert_eq!(
            canonical(group_agents(&forward, &cfg())),
            canonical(group_agents(&reversed, &cfg())),
        );
    }
}
