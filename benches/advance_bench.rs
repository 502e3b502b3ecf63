//! Benchmarks for router advance calls.
//!
//! Run with: `cargo bench --bench advance_bench`
//!
//! Times a full `advance` over one minute of rainfall on rasters of
//! increasing size, from a pre-wetted state.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use overland_rs::{
    ModelGrid, NodeStatus, OverlandFlowConfig, OverlandFlowRouter, RasterMeshBuilder,
    SURFACE_WATER_DEPTH, SideBoundaries, TOPOGRAPHIC_ELEVATION,
};

/// Setup a tilted catchment draining west.
fn setup_catchment(n: usize) -> (OverlandFlowRouter, ModelGrid) {
    let mesh = RasterMeshBuilder::new(n, n)
        .with_spacing(5.0, 5.0)
        .with_side_status(
            SideBoundaries::uniform(NodeStatus::Closed).with_west(NodeStatus::FixedValue),
        )
        .build()
        .unwrap();
    let mut grid = ModelGrid::new(mesh);
    grid.add_field_at_node_from(TOPOGRAPHIC_ELEVATION, |x, y| {
        0.002 * x + 0.001 * (0.05 * y).sin()
    })
    .unwrap();

    let core: Vec<usize> = grid.mesh().core_nodes().collect();
    let depth = grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap();
    for node in core {
        depth[node] = 0.005;
    }

    let router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();
    (router, grid)
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_60s");

    for &n in &[32, 64, 128] {
        let (router, grid) = setup_catchment(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || (router.clone(), grid.clone()),
                |(mut router, mut grid)| {
                    let report = router.advance(&mut grid, black_box(60.0)).unwrap();
                    black_box(report.n_substeps)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_stability_limit(c: &mut Criterion) {
    let (router, grid) = setup_catchment(128);
    c.bench_function("stability_limit_128", |b| {
        b.iter(|| black_box(router.stability_limit(black_box(&grid)).unwrap()))
    });
}

criterion_group!(benches, bench_advance, bench_stability_limit);
criterion_main!(benches);
