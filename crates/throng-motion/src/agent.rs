//! The per-fragment agent trajectory model.

use throng_core::{distance, AgentId, Position};

/// One agent's trajectory fragment within a single cell and time window.
///
/// All sample series are parallel and index-aligned: `timesteps[i]`,
/// `positions[i]`, `speeds[i]`, `velocity_x[i]`, and `velocity_z[i]`
/// describe the same sample. Series only ever grow, in time order.
/// `spawn_pos` is fixed by the first sample; `goal_pos` tracks the most
/// recent one and is only final once the fragment ends.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    spawn_pos: Option<Position>,
    goal_pos: Option<Position>,
    timesteps: Vec<f64>,
    positions: Vec<Position>,
    speeds: Vec<f64>,
    velocity_x: Vec<f64>,
    velocity_z: Vec<f64>,
}

impl Agent {
    /// Create an empty agent fragment.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            spawn_pos: None,
            goal_pos: None,
            timesteps: Vec::new(),
            positions: Vec::new(),
            speeds: Vec::new(),
            velocity_x: Vec::new(),
            velocity_z: Vec::new(),
        }
    }

    /// This fragment's identifier.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Append a sample with pre-derived speed and velocity components.
    ///
    /// Used by the field pipeline, where speed and velocity come from
    /// frame deltas computed at read time.
    pub fn push_sample(&mut self, timestep: f64, position: Position, speed: f64, vx: f64, vz: f64) {
        if self.spawn_pos.is_none() {
            self.spawn_pos = Some(position);
        }
        self.goal_pos = Some(position);
        self.timesteps.push(timestep);
        self.positions.push(position);
        self.speeds.push(speed);
        self.velocity_x.push(vx);
        self.velocity_z.push(vz);
        debug_assert_eq!(self.timesteps.len(), self.positions.len());
        debug_assert_eq!(self.positions.len(), self.speeds.len());
        debug_assert_eq!(self.speeds.len(), self.velocity_x.len());
        debug_assert_eq!(self.velocity_x.len(), self.velocity_z.len());
    }

    /// Append a sample, deriving speed and velocity from the previous
    /// position over `timestep_len` seconds.
    ///
    /// The first sample gets zero velocity and `initial_speed`; later
    /// samples get the step distance over the timestep, clamped to
    /// `max_speed`.
    pub fn push_derived(
        &mut self,
        timestep: f64,
        position: Position,
        timestep_len: f64,
        max_speed: f64,
        initial_speed: f64,
    ) {
        let (speed, vx, vz) = match self.positions.last() {
            Some(&prev) => {
                let speed = (distance(prev, position) / timestep_len).clamp(0.0, max_speed);
                let vx = (position.x - prev.x) / timestep_len;
                let vz = (position.z - prev.z) / timestep_len;
                (speed, vx, vz)
            }
            None => (initial_speed.clamp(0.0, max_speed), 0.0, 0.0),
        };
        self.push_sample(timestep, position, speed, vx, vz);
    }

    /// Number of samples recorded so far.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sample timestamps, in time order.
    pub fn timesteps(&self) -> &[f64] {
        &self.timesteps
    }

    /// Sample positions, index-aligned with [`timesteps`](Self::timesteps).
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Per-sample speeds.
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Per-sample x velocity components.
    pub fn velocity_x(&self) -> &[f64] {
        &self.velocity_x
    }

    /// Per-sample z velocity components.
    pub fn velocity_z(&self) -> &[f64] {
        &self.velocity_z
    }

    /// The spawn and current goal positions, or `None` for an empty
    /// fragment.
    pub fn endpoints(&self) -> Option<(Position, Position)> {
        Some((self.spawn_pos?, self.goal_pos?))
    }

    /// Straight-line distance from spawn to the current goal.
    pub fn path_distance(&self) -> f64 {
        match self.endpoints() {
            Some((spawn, goal)) => distance(spawn, goal),
            None => 0.0,
        }
    }

    /// Perpendicular distance of `position` from the spawn-goal line.
    ///
    /// A degenerate line (coincident endpoints) yields 0 rather than a
    /// division by zero.
    pub fn deviation(&self, position: Position) -> f64 {
        let Some((spawn, goal)) = self.endpoints() else {
            return 0.0;
        };
        let a = goal.z - spawn.z;
        let b = spawn.x - goal.x;
        let norm = (a * a + b * b).sqrt();
        if norm < 1e-9 {
            return 0.0;
        }
        let c = goal.x * spawn.z - spawn.x * goal.z;
        (a * position.x + b * position.z + c).abs() / norm
    }

    /// Mean perpendicular deviation of all samples from the spawn-goal
    /// line. Zero for an empty fragment.
    pub fn average_deviation(&self) -> f64 {
        if self.positions.is_empty() {
            return 0.0;
        }
        let total: f64 = self.positions.iter().map(|&p| self.deviation(p)).sum();
        total / self.positions.len() as f64
    }
}
