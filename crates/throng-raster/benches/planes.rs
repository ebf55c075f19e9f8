//! Plane-builder benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};
use throng_core::config::PipelineConfig;
use throng_core::{AgentId, Position};
use throng_motion::Agent;
use throng_raster::{build_dfg_plane, build_velocity_planes};

fn crossing_agents(count: u32, samples: usize) -> Vec<Agent> {
    (0..count)
        .map(|id| {
            let mut agent = Agent::new(AgentId(id));
            let offset = f64::from(id) / f64::from(count);
            for i in 0..samples {
                let t = i as f64 / (samples - 1) as f64;
                let pos = Position::new(0.05 + 0.9 * t, 0.05 + 0.9 * offset);
                agent.push_derived(i as f64 * 0.04, pos, 0.04, 1.0, 1.0);
            }
            agent
        })
        .collect()
}

fn bench_planes(c: &mut Criterion) {
    let cfg = PipelineConfig::field(25.0, 1);
    let agents = crossing_agents(50, 200);

    c.bench_function("velocity_planes_50x200", |b| {
        b.iter(|| build_velocity_planes(&agents, &cfg.raster))
    });
    c.bench_function("dfg_plane_50x200", |b| {
        b.iter(|| build_dfg_plane(&agents, &cfg.raster))
    });
}

criterion_group!(benches, bench_planes);
criterion_main!(benches);
