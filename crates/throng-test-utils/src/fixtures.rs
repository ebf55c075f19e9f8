//! Fixture builders.

use std::io::Write;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use throng_core::{AgentId, Position};
use throng_motion::Agent;

/// Generate `(timestamp, x, z)` records along a straight line with
/// seeded positional jitter.
///
/// The same seed always produces the same records, so scenarios built
/// from these are reproducible across runs and platforms.
pub fn jittered_line_samples(
    seed: u64,
    from: (f64, f64),
    to: (f64, f64),
    rows: usize,
    interval: f64,
    jitter: f64,
) -> Vec<(f64, f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..rows)
        .map(|i| {
            let t = i as f64 / (rows.max(2) - 1) as f64;
            let jx = if jitter > 0.0 {
                rng.random_range(-jitter..jitter)
            } else {
                0.0
            };
            let jz = if jitter > 0.0 {
                rng.random_range(-jitter..jitter)
            } else {
                0.0
            };
            (
                i as f64 * interval,
                from.0 + (to.0 - from.0) * t + jx,
                from.1 + (to.1 - from.1) * t + jz,
            )
        })
        .collect()
}

/// Render records as a trajectory file body (header plus
/// semicolon-separated rows).
pub fn samples_to_csv(samples: &[(f64, f64, f64)]) -> String {
    let mut out = String::from("timestep;pos_x;pos_z\n");
    for (t, x, z) in samples {
        out.push_str(&format!("{t:.6};{x:.6};{z:.6}\n"));
    }
    out
}

/// Write a synthetic scenario directory: `env.json` with the given
/// ground-truth weights (and no environment objects) plus one
/// trajectory file per sample list.
pub fn write_synthetic_scenario(
    dir: &Path,
    weights: (f64, f64, f64, f64),
    trajectories: &[Vec<(f64, f64, f64)>],
) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let env = format!(
        concat!(
            "{{\"ParametersGrid\": [{{\"goal\": {}, \"group\": {}, ",
            "\"interaction\": {}, \"interconn\": {}}}], \"EnvironmentGrid\": []}}"
        ),
        weights.0, weights.1, weights.2, weights.3
    );
    std::fs::write(dir.join("env.json"), env)?;
    for (index, samples) in trajectories.iter().enumerate() {
        let mut file = std::fs::File::create(dir.join(format!("agent_{index:03}.csv")))?;
        file.write_all(samples_to_csv(samples).as_bytes())?;
    }
    Ok(())
}

/// Build an agent walking a straight line, with derived speeds.
pub fn walker_agent(
    id: u32,
    from: (f64, f64),
    to: (f64, f64),
    samples: usize,
    timestep: f64,
    max_speed: f64,
) -> Agent {
    let mut agent = Agent::new(AgentId(id));
    for i in 0..samples {
        let t = i as f64 / (samples.max(2) - 1) as f64;
        agent.push_derived(
            i as f64 * timestep,
            Position::new(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t),
            timestep,
            max_speed,
            1.0,
        );
    }
    agent
}
