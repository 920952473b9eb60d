//! Criterion micro-benchmarks for lookup, resolution, and junction walking.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::DVec3;
use trackway_bench::{query_positions, rail_grid_profile, BENCH_WORLD};
use trackway_core::GridCell;
use trackway_track::{NavigationState, TrackConfig};

/// Benchmark: resolve 10K positions over a warm 64x64 grid cache.
fn bench_resolve_cached_10k(c: &mut Criterion) {
    let lookup = rail_grid_profile(64, TrackConfig::default());
    let positions = query_positions(10_000, 64);
    for &p in &positions {
        lookup.find_piece(BENCH_WORLD, p);
    }

    c.bench_function("resolve_cached_10k", |b| {
        b.iter(|| {
            for &p in &positions {
                let mut state = NavigationState::at(BENCH_WORLD, p, DVec3::X);
                black_box(lookup.resolve(&mut state));
            }
        });
    });
}

/// Benchmark: candidate lookups with a cache too small to hold the grid.
fn bench_candidates_thrashing(c: &mut Criterion) {
    let config = TrackConfig {
        max_cached_cells: 256,
        ..TrackConfig::default()
    };
    let lookup = rail_grid_profile(64, config);
    let cells: Vec<GridCell> = query_positions(4_096, 64)
        .into_iter()
        .map(|p| GridCell::containing(BENCH_WORLD, p))
        .collect();

    c.bench_function("candidates_thrashing_4k", |b| {
        b.iter(|| {
            for &cell in &cells {
                black_box(lookup.candidates(cell));
            }
        });
    });
}

/// Benchmark: uncached registry matching for every cell of a 64x64 plane.
fn bench_match_cell_uncached(c: &mut Criterion) {
    let lookup = rail_grid_profile(64, TrackConfig::default());

    c.bench_function("track_type_at_4k", |b| {
        b.iter(|| {
            for x in 0..64 {
                for z in 0..64 {
                    black_box(lookup.track_type_at(GridCell::new(BENCH_WORLD, x, 0, z)));
                }
            }
        });
    });
}

/// Benchmark: walk a 256-cell rail line end to end through junctions.
fn bench_junction_walk_256(c: &mut Criterion) {
    let lookup = rail_grid_profile(256, TrackConfig::default());
    let Some(start) = lookup.find_piece(BENCH_WORLD, DVec3::new(0.5, 0.1, 0.5)) else {
        panic!("no rail at the grid origin");
    };

    c.bench_function("junction_walk_256", |b| {
        b.iter(|| {
            let mut piece = start.clone();
            let mut steps = 0u32;
            loop {
                let Some(east) = lookup
                    .junctions(&piece)
                    .into_iter()
                    .find(|j| j.name() == "east")
                else {
                    break;
                };
                let Some(next) = lookup.take_junction(&piece, &east) else {
                    break;
                };
                let Some(p) = next.piece() else {
                    break;
                };
                piece = p.clone();
                steps += 1;
            }
            black_box(steps)
        });
    });
}

criterion_group!(
    benches,
    bench_resolve_cached_10k,
    bench_candidates_thrashing,
    bench_match_cell_uncached,
    bench_junction_walk_256
);
criterion_main!(benches);
