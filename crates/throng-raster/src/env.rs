//! Static environment grid construction.

use throng_core::{GridDims, GridPoint, Position, Projection};

use crate::grid::Grid;

/// One rectangular environment object (obstacle or region of interest).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvObject {
    /// Rectangle centre, in the scenario's coordinate convention.
    pub center: Position,
    /// Full extent along x, in continuous units.
    pub scale_x: f64,
    /// Full extent along z, in continuous units.
    pub scale_z: f64,
    /// Object type value stamped into the grid, clamped to `[0, 1]`.
    pub value: f64,
}

/// Stamp environment rectangles into a grid.
///
/// Each object fills the axis-aligned pixel block around its projected
/// centre, with half-extents derived from the object's scale and the
/// projection's pixel density. Centres are clamped into range and the
/// block is clipped to the grid, so noisy descriptors cannot index out
/// of bounds.
pub fn build_env_grid(objects: &[EnvObject], dims: GridDims, projection: Projection) -> Grid {
    let mut grid = Grid::new(dims, 0.0);
    let (sx, sz) = projection.pixel_scale(dims);

    for obj in objects {
        let center = match projection {
            Projection::World { half_extent } => (
                ((obj.center.x + half_extent) * sx).floor(),
                ((obj.center.z + half_extent) * sz).floor(),
            ),
            Projection::Unit => ((obj.center.x * sx).floor(), (obj.center.z * sz).floor()),
        };
        let cx = (center.0 as i64).clamp(0, i64::from(dims.width) - 1);
        let cz = (center.1 as i64).clamp(0, i64::from(dims.height) - 1);
        let rx = ((obj.scale_x * sx) / 2.0).floor() as i64;
        let rz = ((obj.scale_z * sz) / 2.0).floor() as i64;
        let value = obj.value.clamp(0.0, 1.0);

        let x_lo = (cx - rx).max(0);
        let x_hi = (cx + rx).min(i64::from(dims.width) - 1);
        let z_lo = (cz - rz).max(0);
        let z_hi = (cz + rz).min(i64::from(dims.height) - 1);
        for z in z_lo..=z_hi {
            for x in x_lo..=x_hi {
                grid.set(
                    GridPoint {
                        x: x as u32,
                        z: z as u32,
                    },
                    value,
                );
            }
        }
    }
    grid
}
