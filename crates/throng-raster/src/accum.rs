//! The accumulate-then-average rasterization primitive.

use throng_core::{GridDims, GridPoint};

use crate::grid::Grid;

/// Accumulates per-pixel contributions and averages them on finalize.
///
/// Each contribution adds a raw value (a velocity deviation, a group
/// intensity) and bumps the pixel's contribution count. Finalizing
/// produces `neutral + sum / count` for touched pixels and `neutral`
/// for untouched ones, clamped to `[0, 1]`, so a finalized plane can
/// never contain NaN or out-of-range values regardless of what was
/// accumulated.
#[derive(Clone, Debug)]
pub struct Accumulator {
    sums: Grid,
    counts: Vec<u32>,
    neutral: f64,
}

impl Accumulator {
    /// New accumulator with the given neutral fill (0.5 for velocity
    /// planes, 0.0 for the rest).
    pub fn new(dims: GridDims, neutral: f64) -> Self {
        Self {
            sums: Grid::new(dims, 0.0),
            counts: vec![0; dims.len()],
            neutral,
        }
    }

    /// Add one contribution at `p`.
    pub fn add(&mut self, p: GridPoint, value: f64) {
        let i = p.z as usize * self.sums.dims().width as usize + p.x as usize;
        self.sums.add(p, value);
        self.counts[i] += 1;
    }

    /// Average every touched pixel and clamp the plane to `[0, 1]`.
    pub fn finalize(self) -> Grid {
        let dims = self.sums.dims();
        let neutral = self.neutral.clamp(0.0, 1.0);
        let mut out = Grid::new(dims, neutral);
        for z in 0..dims.height {
            for x in 0..dims.width {
                let p = GridPoint { x, z };
                let i = z as usize * dims.width as usize + x as usize;
                let count = self.counts[i];
                if count > 0 {
                    let mean = self.neutral + self.sums.at(p) / f64::from(count);
                    let value = if mean.is_finite() { mean.clamp(0.0, 1.0) } else { neutral };
                    out.set(p, value);
                }
            }
        }
        out
    }
}
