//! Profile assignment and representative clustering.
//!
//! Predicted profiles come back as one optional entry per (window,
//! cell); assignment lays them out into the nested JSON map, filling
//! masked cells with the fallback profile. A density-based clustering
//! pass then reduces the run's profiles to a small representative set.

use indexmap::IndexMap;
use throng_core::WeightProfile;
use throng_io::ProfileDoc;

use crate::assign::CellPartition;

/// Lay out per-cell predictions into the window/cell map.
///
/// `predictions` holds one entry per (window, row, col) in row-major
/// window order, exactly as the analysis loop produced them; `None`
/// entries (masked cells) receive the fallback profile. Windows beyond
/// the prediction list are omitted.
pub fn assign_profiles(
    predictions: &[Option<WeightProfile>],
    partition: &CellPartition,
    frame_interval: u64,
    max_frame: u64,
) -> IndexMap<String, IndexMap<String, ProfileDoc>> {
    let mut classes = IndexMap::new();
    let mut index = 0usize;

    let mut window_start = 0u64;
    while window_start < max_frame {
        let window_key = format!("{}_{}", window_start, window_start + frame_interval);
        let mut window_map = IndexMap::new();
        for row in 0..partition.rows {
            for col in 0..partition.cols {
                if index >= predictions.len() {
                    break;
                }
                let profile = predictions[index].unwrap_or_else(WeightProfile::fallback);
                window_map.insert(format!("{row}_{col}"), ProfileDoc::from(profile));
                index += 1;
            }
        }
        if !window_map.is_empty() {
            classes.insert(window_key, window_map);
        }
        window_start += frame_interval;
    }
    classes
}

/// Density-based clustering over weight profiles (Euclidean metric).
///
/// Returns one representative per cluster: the first member found in
/// input order, so the result is deterministic. With `min_samples` of
/// 1 every profile is a core point and clusters are the connected
/// components of the eps-neighborhood graph.
pub fn cluster_profiles(
    profiles: &[WeightProfile],
    eps: f64,
    min_samples: usize,
) -> Vec<WeightProfile> {
    let points: Vec<[f64; 4]> = profiles.iter().map(|p| p.to_array()).collect();
    let dist = |a: &[f64; 4], b: &[f64; 4]| -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    };
    let neighbours = |i: usize| -> Vec<usize> {
        (0..points.len())
            .filter(|&j| dist(&points[i], &points[j]) <= eps)
            .collect()
    };

    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut cluster = 0usize;
    let mut representatives = Vec::new();

    for start in 0..points.len() {
        if labels[start].is_some() {
            continue;
        }
        let seed = neighbours(start);
        if seed.len() < min_samples {
            continue;
        }
        labels[start] = Some(cluster);
        representatives.push(profiles[start]);

        let mut frontier = seed;
        while let Some(i) = frontier.pop() {
            if labels[i].is_some() {
                continue;
            }
            labels[i] = Some(cluster);
            let reach = neighbours(i);
            if reach.len() >= min_samples {
                frontier.extend(reach.into_iter().filter(|&j| labels[j].is_none()));
            }
        }
        cluster += 1;
    }
    representatives
}
