//! 2D geometry and discrete rasterization primitives.
//!
//! Positions live in continuous space (world or unit coordinates,
//! depending on the pipeline variant); [`Projection`] maps them onto the
//! integer raster grid by truncation, and [`BoundsPolicy`] decides what
//! happens when a projected endpoint falls outside the grid. Everything
//! downstream of [`project_point`] / [`project_segment`] holds in-bounds
//! [`GridPoint`]s only, so grid indexing can never go out of range.

use smallvec::SmallVec;

/// A 2D position in continuous space.
///
/// The horizontal axis is `x`, the depth axis is `z` (the ground plane of
/// the tracked area; trajectories carry no height).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Depth coordinate.
    pub z: f64,
}

impl Position {
    /// Construct a position from its two coordinates.
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Affine remap of `value` from `[min, max]` to `[new_min, new_max]`.
///
/// The input range must be non-degenerate (`max != min`); every call site
/// in this workspace passes constant ranges, so this is a caller contract
/// rather than a runtime check.
pub fn normalize(value: f64, min: f64, max: f64, new_min: f64, new_max: f64) -> f64 {
    ((value - min) / (max - min)) * (new_max - new_min) + new_min
}

/// Raster grid dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    /// Width in pixels (x axis).
    pub width: u32,
    /// Height in pixels (z axis).
    pub height: u32,
}

impl GridDims {
    /// Construct grid dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An in-bounds integer pixel coordinate.
///
/// Only ever produced by [`project_point`] / [`project_segment`] (or by
/// iterating a grid), which guarantee `x < width` and `z < height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPoint {
    /// Pixel column.
    pub x: u32,
    /// Pixel row.
    pub z: u32,
}

/// Maps continuous positions to raster pixels by truncation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// World coordinates in `[-half_extent, +half_extent]` on both axes.
    ///
    /// A coordinate `p` maps to `floor((p + half_extent) * width / (2 * half_extent))`.
    World {
        /// Half the world extent along each axis.
        half_extent: f64,
    },
    /// Unit coordinates in `[0, 1]` on both axes: `p` maps to `floor(p * width)`.
    Unit,
}

impl Projection {
    /// Project a position to raw (possibly out-of-bounds) pixel indices.
    fn to_raw(&self, p: Position, dims: GridDims) -> (i64, i64) {
        match *self {
            Projection::World { half_extent } => {
                let sx = f64::from(dims.width) / (2.0 * half_extent);
                let sz = f64::from(dims.height) / (2.0 * half_extent);
                (
                    ((p.x + half_extent) * sx).floor() as i64,
                    ((p.z + half_extent) * sz).floor() as i64,
                )
            }
            Projection::Unit => (
                (p.x * f64::from(dims.width)).floor() as i64,
                (p.z * f64::from(dims.height)).floor() as i64,
            ),
        }
    }

    /// Per-axis scale factor from continuous units to pixels, used when
    /// stamping environment rectangles.
    pub fn pixel_scale(&self, dims: GridDims) -> (f64, f64) {
        match *self {
            Projection::World { half_extent } => (
                f64::from(dims.width) / (2.0 * half_extent),
                f64::from(dims.height) / (2.0 * half_extent),
            ),
            Projection::Unit => (f64::from(dims.width), f64::from(dims.height)),
        }
    }
}

/// What to do with a projected line endpoint that falls outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Clamp the endpoint into range (synthetic-data convention).
    Clamp,
    /// Drop the whole segment (field-data convention for noisy tracks).
    Filter,
}

/// Project a single sample position, dropping it when out of bounds.
///
/// Individual trajectory samples are always filtered, regardless of the
/// variant's line policy: a sample outside the grid contributes nothing.
pub fn project_point(p: Position, proj: Projection, dims: GridDims) -> Option<GridPoint> {
    let (x, z) = proj.to_raw(p, dims);
    if x < 0 || z < 0 || x >= i64::from(dims.width) || z >= i64::from(dims.height) {
        return None;
    }
    Some(GridPoint {
        x: x as u32,
        z: z as u32,
    })
}

/// Resolve a raw projected axis value under the bounds policy.
///
/// Returns `None` when the policy is `Filter` and the value is out of
/// range, mirroring how an absorbing grid edge drops a neighbour.
fn resolve_axis(val: i64, len: u32, policy: BoundsPolicy) -> Option<i64> {
    let n = i64::from(len);
    if val >= 0 && val < n {
        return Some(val);
    }
    match policy {
        BoundsPolicy::Filter => None,
        BoundsPolicy::Clamp => Some(val.clamp(0, n - 1)),
    }
}

/// 8-connected discrete line from `(x1, z1)` to `(x2, z2)`, inclusive.
///
/// Deterministic, includes both endpoints, and contains exactly
/// `max(|dx|, |dz|) + 1` points with no gap larger than one cell between
/// consecutive points.
pub fn bresenham(x1: i64, z1: i64, x2: i64, z2: i64) -> Vec<(i64, i64)> {
    let mut points = Vec::with_capacity(((x2 - x1).abs().max((z2 - z1).abs()) + 1) as usize);
    let dx = (x2 - x1).abs();
    let dz = (z2 - z1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sz = if z1 < z2 { 1 } else { -1 };
    let mut err = dx - dz;
    let (mut x, mut z) = (x1, z1);

    loop {
        points.push((x, z));
        if x == x2 && z == z2 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dz {
            err -= dz;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            z += sz;
        }
    }
    points
}

/// Project a segment's endpoints and rasterize the line between them.
///
/// Under [`BoundsPolicy::Clamp`] both endpoints are clamped into range;
/// under [`BoundsPolicy::Filter`] the whole segment is dropped (empty
/// result) when either endpoint projects outside the grid. Every returned
/// point is in bounds.
pub fn project_segment(
    a: Position,
    b: Position,
    proj: Projection,
    policy: BoundsPolicy,
    dims: GridDims,
) -> SmallVec<[GridPoint; 8]> {
    let (ax_raw, az_raw) = proj.to_raw(a, dims);
    let (bx_raw, bz_raw) = proj.to_raw(b, dims);

    let resolved = (
        resolve_axis(ax_raw, dims.width, policy),
        resolve_axis(az_raw, dims.height, policy),
        resolve_axis(bx_raw, dims.width, policy),
        resolve_axis(bz_raw, dims.height, policy),
    );
    let (Some(ax), Some(az), Some(bx), Some(bz)) = resolved else {
        return SmallVec::new();
    };

    bresenham(ax, az, bx, bz)
        .into_iter()
        .map(|(x, z)| GridPoint {
            x: x as u32,
            z: z as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DIMS: GridDims = GridDims {
        width: 64,
        height: 64,
    };

    #[test]
    fn distance_matches_pythagoras() {
        let d = distance(Position::new(0.0, 0.0), Position::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_fixed_points() {
        assert_eq!(normalize(0.5, 0.0, 1.0, -0.5, 0.5), 0.0);
        assert_eq!(normalize(0.0, 0.0, 1.0, -0.5, 0.5), -0.5);
        assert_eq!(normalize(1.0, 0.0, 1.0, -0.5, 0.5), 0.5);
    }

    #[test]
    fn unit_projection_truncates() {
        let p = project_point(Position::new(0.5, 0.999), Projection::Unit, DIMS).unwrap();
        assert_eq!(p, GridPoint { x: 32, z: 63 });
    }

    #[test]
    fn unit_projection_filters_exact_one() {
        // 1.0 * 64 = 64, one past the last valid pixel.
        assert!(project_point(Position::new(1.0, 0.5), Projection::Unit, DIMS).is_none());
    }

    #[test]
    fn world_projection_centers_origin() {
        let proj = Projection::World { half_extent: 6.5 };
        let p = project_point(Position::new(0.0, 0.0), proj, DIMS).unwrap();
        assert_eq!(p, GridPoint { x: 32, z: 32 });
    }

    #[test]
    fn clamp_policy_pulls_endpoint_inside() {
        let points = project_segment(
            Position::new(-10.0, 0.0),
            Position::new(0.0, 0.0),
            Projection::World { half_extent: 6.5 },
            BoundsPolicy::Clamp,
            DIMS,
        );
        assert!(!points.is_empty());
        assert_eq!(points[0], GridPoint { x: 0, z: 32 });
    }

    #[test]
    fn filter_policy_drops_segment_with_oob_endpoint() {
        let points = project_segment(
            Position::new(1.5, 0.5),
            Position::new(0.5, 0.5),
            Projection::Unit,
            BoundsPolicy::Filter,
            DIMS,
        );
        assert!(points.is_empty());
    }

    #[test]
    fn bresenham_horizontal_length() {
        let line = bresenham(0, 0, 5, 0);
        assert_eq!(line.len(), 6);
        assert_eq!(line[0], (0, 0));
        assert_eq!(line[5], (5, 0));
    }

    #[test]
    fn bresenham_single_point() {
        assert_eq!(bresenham(3, 3, 3, 3), vec![(3, 3)]);
    }

    proptest! {
        #[test]
        fn bresenham_endpoints_and_connectivity(
            x1 in 0i64..64, z1 in 0i64..64, x2 in 0i64..64, z2 in 0i64..64,
        ) {
            let line = bresenham(x1, z1, x2, z2);
            prop_assert_eq!(line[0], (x1, z1));
            prop_assert_eq!(*line.last().unwrap(), (x2, z2));
            prop_assert_eq!(line.len() as i64, (x2 - x1).abs().max((z2 - z1).abs()) + 1);
            for pair in line.windows(2) {
                prop_assert!((pair[1].0 - pair[0].0).abs() <= 1);
                prop_assert!((pair[1].1 - pair[0].1).abs() <= 1);
            }
        }

        #[test]
        fn projected_segments_stay_in_bounds(
            ax in -2.0f64..2.0, az in -2.0f64..2.0,
            bx in -2.0f64..2.0, bz in -2.0f64..2.0,
        ) {
            for policy in [BoundsPolicy::Clamp, BoundsPolicy::Filter] {
                let points = project_segment(
                    Position::new(ax, az),
                    Position::new(bx, bz),
                    Projection::Unit,
                    policy,
                    DIMS,
                );
                for p in &points {
                    prop_assert!(p.x < DIMS.width);
                    prop_assert!(p.z < DIMS.height);
                }
            }
        }
    }
}
