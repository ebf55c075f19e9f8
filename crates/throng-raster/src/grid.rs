//! Dense 2D scalar grid storage.

use throng_core::{GridDims, GridPoint};

/// A dense row-major `f64` grid.
///
/// Indexed by [`GridPoint`], which is in bounds by construction, so
/// element access never fails.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dims: GridDims,
    data: Vec<f64>,
}

impl Grid {
    /// Allocate a grid filled with `fill`.
    pub fn new(dims: GridDims, fill: f64) -> Self {
        Self {
            dims,
            data: vec![fill; dims.len()],
        }
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    fn index(&self, p: GridPoint) -> usize {
        p.z as usize * self.dims.width as usize + p.x as usize
    }

    /// Value at `p`.
    pub fn at(&self, p: GridPoint) -> f64 {
        self.data[self.index(p)]
    }

    /// Set the value at `p`.
    pub fn set(&mut self, p: GridPoint, value: f64) {
        let i = self.index(p);
        self.data[i] = value;
    }

    /// Add `value` to the pixel at `p`.
    pub fn add(&mut self, p: GridPoint, value: f64) {
        let i = self.index(p);
        self.data[i] += value;
    }

    /// Row-major backing slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Iterate all pixel coordinates in row-major order.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let dims = self.dims;
        (0..dims.height)
            .flat_map(move |z| (0..dims.width).map(move |x| GridPoint { x, z }))
    }

    /// Extract a rectangular sub-grid. The window must lie inside the
    /// grid; the caller computes windows from the grid's own dimensions.
    pub fn view(&self, origin: GridPoint, dims: GridDims) -> Grid {
        debug_assert!(origin.x + dims.width <= self.dims.width);
        debug_assert!(origin.z + dims.height <= self.dims.height);
        let mut out = Grid::new(dims, 0.0);
        for z in 0..dims.height {
            for x in 0..dims.width {
                let src = GridPoint {
                    x: origin.x + x,
                    z: origin.z + z,
                };
                out.set(GridPoint { x, z }, self.at(src));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_uniformly_filled() {
        let g = Grid::new(GridDims::new(4, 3), 0.5);
        assert_eq!(g.as_slice().len(), 12);
        assert!(g.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn set_and_read_back() {
        let mut g = Grid::new(GridDims::new(4, 4), 0.0);
        let p = GridPoint { x: 2, z: 3 };
        g.set(p, 1.5);
        g.add(p, 0.25);
        assert_eq!(g.at(p), 1.75);
        assert_eq!(g.at(GridPoint { x: 3, z: 2 }), 0.0);
    }

    #[test]
    fn points_cover_grid_in_row_major_order() {
        let g = Grid::new(GridDims::new(2, 2), 0.0);
        let points: Vec<_> = g.points().collect();
        assert_eq!(
            points,
            vec![
                GridPoint { x: 0, z: 0 },
                GridPoint { x: 1, z: 0 },
                GridPoint { x: 0, z: 1 },
                GridPoint { x: 1, z: 1 },
            ]
        );
    }

    #[test]
    fn view_extracts_window() {
        let mut g = Grid::new(GridDims::new(4, 4), 0.0);
        g.set(GridPoint { x: 2, z: 1 }, 7.0);
        let v = g.view(GridPoint { x: 2, z: 1 }, GridDims::new(2, 2));
        assert_eq!(v.at(GridPoint { x: 0, z: 0 }), 7.0);
        assert_eq!(v.at(GridPoint { x: 1, z: 1 }), 0.0);
    }
}
