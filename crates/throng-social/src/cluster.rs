//! Per-cluster statistics for the connectivity plane.

use throng_core::{distance, Position};
use throng_motion::Agent;

/// Derived statistics for one similarity cluster.
///
/// Built once from the member agents and never mutated. Series are
/// indexed by sample step; a member is "alive" at step `t` while its
/// trajectory still has a sample there, so both series span the longest
/// member trajectory.
#[derive(Clone, Debug)]
pub struct ClusterStats {
    /// Mean pairwise distance between alive members per step; 0 when
    /// fewer than two members are alive.
    pub interpersonal_distances: Vec<f64>,
    /// Mean alive-member position per step; `None` when no member is
    /// alive.
    pub center_of_mass: Vec<Option<Position>>,
}

impl ClusterStats {
    /// Compute the statistics for a set of member agents.
    pub fn new(members: &[&Agent]) -> Self {
        let max_len = members.iter().map(|a| a.len()).max().unwrap_or(0);
        let mut interpersonal_distances = Vec::with_capacity(max_len);
        let mut center_of_mass = Vec::with_capacity(max_len);

        for step in 0..max_len {
            let alive: Vec<Position> = members
                .iter()
                .filter(|a| a.len() > step)
                .map(|a| a.positions()[step])
                .collect();

            let mut total = 0.0;
            let mut pairs = 0usize;
            for (i, &p) in alive.iter().enumerate() {
                for &q in alive.iter().skip(i + 1) {
                    total += distance(p, q);
                    pairs += 1;
                }
            }
            interpersonal_distances.push(if pairs > 0 { total / pairs as f64 } else { 0.0 });

            if alive.is_empty() {
                center_of_mass.push(None);
            } else {
                let n = alive.len() as f64;
                let sum = alive.iter().fold((0.0, 0.0), |acc, p| {
                    (acc.0 + p.x, acc.1 + p.z)
                });
                center_of_mass.push(Some(Position::new(sum.0 / n, sum.1 / n)));
            }
        }

        Self {
            interpersonal_distances,
            center_of_mass,
        }
    }

    /// Number of steps covered (the longest member trajectory).
    pub fn len(&self) -> usize {
        self.center_of_mass.len()
    }

    /// True when the cluster covers no steps.
    pub fn is_empty(&self) -> bool {
        self.center_of_mass.is_empty()
    }
}
