//! Cell partitioning and per-window agent assignment.
//!
//! The tracked area splits into a uniform grid of cells whose aspect
//! ratio follows the capture format; the time axis splits into
//! fixed-width windows. Every contiguous visit of one trajectory to one
//! cell becomes its own [`Agent`]: leaving and re-entering the same
//! cell later produces two separate agents, never merged.

use throng_core::{normalize, AgentId, Position};
use throng_motion::Agent;

use crate::ingest::NormalizedTrajectory;

/// A uniform R×C spatial partition of the unit square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPartition {
    /// Cell columns.
    pub cols: u32,
    /// Cell rows.
    pub rows: u32,
}

impl CellPartition {
    /// Total cell count.
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

/// Derive the cell partition from the capture format.
///
/// Reduces `width:height` by their greatest common divisor, scales so
/// the larger side equals `multiplier`, and floors: a 60×48 capture
/// with multiplier 4 yields 4×3 cells.
pub fn grid_separation(video_width: u32, video_height: u32, multiplier: u32) -> CellPartition {
    fn gcd(a: u32, b: u32) -> u32 {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }
    let divisor = gcd(video_width, video_height).max(1);
    let mut w = f64::from(video_width / divisor);
    let mut h = f64::from(video_height / divisor);
    let larger = w.max(h);
    w /= larger;
    h /= larger;
    CellPartition {
        cols: (f64::from(multiplier) * w).floor() as u32,
        rows: (f64::from(multiplier) * h).floor() as u32,
    }
}

/// A half-open time window `[start, end)`, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    /// Inclusive window start.
    pub start: f64,
    /// Exclusive window end.
    pub end: f64,
}

impl TimeWindow {
    /// True when `time` falls inside the window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

/// Assign one window's trajectory samples to cells.
///
/// Returns `cells[row][col]`, each holding the agents created inside
/// that cell. Sample positions are renormalized to cell-local unit
/// coordinates (with the z axis flipped to image orientation) before
/// being appended; agent ids are drawn from `next_agent_id`, which
/// persists across windows so ids stay unique per scenario.
pub fn assign_to_cells(
    trajectories: &[NormalizedTrajectory],
    partition: &CellPartition,
    window: TimeWindow,
    next_agent_id: &mut u32,
) -> Vec<Vec<Vec<Agent>>> {
    let mut cells: Vec<Vec<Vec<Agent>>> = (0..partition.rows)
        .map(|_| (0..partition.cols).map(|_| Vec::new()).collect())
        .collect();

    for trajectory in trajectories {
        let mut current_cell: Option<(usize, usize)> = None;

        for sample in &trajectory.samples {
            if !window.contains(sample.frame) {
                continue;
            }
            // Flip z into image orientation before locating the cell.
            let point = Position::new(sample.position.x, 1.0 - sample.position.z);
            let col = ((point.x * f64::from(partition.cols)).floor() as i64)
                .clamp(0, i64::from(partition.cols) - 1) as usize;
            let row = ((point.z * f64::from(partition.rows)).floor() as i64)
                .clamp(0, i64::from(partition.rows) - 1) as usize;

            if current_cell != Some((row, col)) {
                let agent = Agent::new(AgentId(*next_agent_id));
                *next_agent_id += 1;
                cells[row][col].push(agent);
                current_cell = Some((row, col));
            }

            let col_f = col as f64;
            let row_f = row as f64;
            let cols_f = f64::from(partition.cols);
            let rows_f = f64::from(partition.rows);
            let local = Position::new(
                normalize(point.x, col_f / cols_f, (col_f + 1.0) / cols_f, 0.0, 1.0),
                normalize(point.z, row_f / rows_f, (row_f + 1.0) / rows_f, 0.0, 1.0),
            );

            let agent = cells[row][col]
                .last_mut()
                .expect("cell has an agent after the visit check");
            agent.push_sample(
                sample.frame,
                local,
                sample.speed,
                sample.velocity_x,
                sample.velocity_z,
            );
        }
    }

    cells
}
