use criterion::{criterion_group, criterion_main, Criterion};
use kgflow_core::config::RunConfig;
use kgflow_planner::build_plan;
use serde_json::json;

fn make_config() -> RunConfig {
    RunConfig::from_json(json!({
        "text_embed": {
            "batch_size": 16,
            "strategy": {"type": "openai_embedding", "model": "text-embedding-3-small"}
        },
        "entity_name_embed": {
            "strategy": {"type": "openai_embedding", "vector_store": {"type": "lancedb"}}
        }
    }))
    .unwrap()
}

fn bench_build_plan(c: &mut Criterion) {
    let config = make_config();
    c.bench_function("build_plan", |b| {
        b.iter(|| {
            let _ = build_plan(&config);
        })
    });
    c.bench_function("build_plan_descriptors", |b| {
        b.iter(|| {
            let _ = build_plan(&config).descriptors();
        })
    });
}

criterion_group!(planning, bench_build_plan);
criterion_main!(planning);
