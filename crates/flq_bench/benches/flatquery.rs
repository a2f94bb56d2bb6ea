#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flq_core::{Query, deflatten, filter_json, flat_filter, flatten};
use serde_json::Value;

const VILLAGES_JSON: &str = include_str!("../data/villages.json");
const WIDE_JSON: &str = include_str!("../data/wide.json");
const DEEP_JSON: &str = include_str!("../data/deep.json");

fn bench_flatten(c: &mut Criterion) {
    let villages: Value = serde_json::from_str(VILLAGES_JSON).unwrap();
    let wide: Value = serde_json::from_str(WIDE_JSON).unwrap();
    let deep: Value = serde_json::from_str(DEEP_JSON).unwrap();

    let mut group = c.benchmark_group("flatten");

    group.throughput(Throughput::Bytes(VILLAGES_JSON.len() as u64));
    group.bench_function("villages", |b| b.iter(|| flatten(black_box(&villages))));

    group.throughput(Throughput::Bytes(WIDE_JSON.len() as u64));
    group.bench_function("wide", |b| b.iter(|| flatten(black_box(&wide))));

    group.throughput(Throughput::Bytes(DEEP_JSON.len() as u64));
    group.bench_function("deep", |b| b.iter(|| flatten(black_box(&deep))));

    group.finish();
}

fn bench_deflatten(c: &mut Criterion) {
    let wide: Value = serde_json::from_str(WIDE_JSON).unwrap();
    let deep: Value = serde_json::from_str(DEEP_JSON).unwrap();
    let wide_flat = flatten(&wide);
    let deep_flat = flatten(&deep);

    let mut group = c.benchmark_group("deflatten");

    group.bench_function("wide", |b| b.iter(|| deflatten(black_box(&wide_flat))));
    group.bench_function("deep", |b| b.iter(|| deflatten(black_box(&deep_flat))));

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let wide: Value = serde_json::from_str(WIDE_JSON).unwrap();

    c.bench_function("round_trip/wide", |b| {
        b.iter(|| deflatten(&flatten(black_box(&wide))))
    });
}

fn bench_filters(c: &mut Criterion) {
    let villages: Value = serde_json::from_str(VILLAGES_JSON).unwrap();

    let mut group = c.benchmark_group("filters");

    let queries = [
        ("tunnel_shallow", r#"{"houses.color": "yellow"}"#),
        ("tunnel_deep", r#"{"houses.boxes.apples.status": "rotten"}"#),
        ("explicit_index", r#"{"houses[0].color": "blue"}"#),
        ("not", r#"{"$not": {"houses.boxes.apples.status": "rotten"}}"#),
        (
            "elem_match",
            r#"{"houses": {"$elemMatch": {"color": "yellow", "boxes.apples.status": "rotten"}}}"#,
        ),
        (
            "combinators",
            r#"{"$or": [{"houses.color": "white"}, {"$and": [{"houses.color": "red"}, {"houses.boxes.apples.status": "rotten"}]}]}"#,
        ),
    ];

    for (name, query_str) in queries {
        let query = Query::parse(&serde_json::from_str(query_str).unwrap()).unwrap();
        group.bench_with_input(BenchmarkId::new("villages", name), &query, |b, q| {
            b.iter(|| flat_filter(black_box(&villages), black_box(q)))
        });
    }

    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let villages: Value = serde_json::from_str(VILLAGES_JSON).unwrap();

    let mut group = c.benchmark_group("deep_scan");

    // flq with query compilation per call
    group.bench_function("flq/rotten", |b| {
        b.iter(|| {
            filter_json(
                black_box(r#"{"houses.boxes.apples.status": "rotten"}"#),
                black_box(VILLAGES_JSON),
            )
        })
    });

    // flq pre-compiled (fair comparison against a pre-parsed path)
    let rotten = Query::parse(&serde_json::json!({"houses.boxes.apples.status": "rotten"})).unwrap();
    group.bench_function("flq_parsed/rotten", |b| {
        b.iter(|| flat_filter(black_box(&villages), black_box(&rotten)))
    });

    // serde_json_path (pre-parsed) scanning for the same rotten apples
    let sjp = serde_json_path::JsonPath::parse(r#"$..apples[?@.status == "rotten"]"#).unwrap();
    group.bench_function("serde_json_path/rotten", |b| {
        b.iter(|| sjp.query(black_box(&villages)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_flatten,
    bench_deflatten,
    bench_round_trip,
    bench_filters,
    bench_comparison,
);
criterion_main!(benches);
