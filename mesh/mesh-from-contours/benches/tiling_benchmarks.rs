//! Benchmarks for contour tiling.
//!
//! Run with: cargo bench -p mesh-from-contours
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-from-contours -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-from-contours -- --baseline main

#![allow(
    missing_docs,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_from_contours::{
    AmalgamateParams, Contour, Point3, TileParams, Vector3, amalgamate_contours, tile_contours,
};

// =============================================================================
// Test Contour Generation
// =============================================================================

/// Create a wavy ring with `n` vertices, roughly like an organ outline.
fn create_ring(n: usize, radius: f64, z: f64, phase: f64) -> Contour {
    let points = (0..n)
        .map(|i| {
            let t = phase + i as f64 * std::f64::consts::TAU / n as f64;
            let r = radius * (1.0 + 0.15 * (5.0 * t).sin());
            Point3::new(r * t.cos(), r * t.sin(), z)
        })
        .collect();
    Contour::new(points)
}

fn create_pair(n: usize) -> (Contour, Contour) {
    (
        create_ring(n, 10.0, 0.0, 0.0),
        create_ring(n + n / 3, 9.0, 2.5, 0.2),
    )
}

// =============================================================================
// Pair Tiling Benchmarks
// =============================================================================

fn bench_optimal(c: &mut Criterion) {
    let mut group = c.benchmark_group("Optimal");

    for n in [16, 64, 256] {
        let (a, b) = create_pair(n);
        group.throughput(Throughput::Elements((a.len() + b.len()) as u64));

        group.bench_with_input(BenchmarkId::new("tile_optimal", n), &(a, b), |bench, (a, b)| {
            let params = TileParams::optimal();
            bench.iter(|| tile_contours(black_box(a), black_box(b), black_box(&params)));
        });
    }

    group.finish();
}

fn bench_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("Greedy");

    for n in [16, 64, 256, 1024] {
        let (a, b) = create_pair(n);
        group.throughput(Throughput::Elements((a.len() + b.len()) as u64));

        group.bench_with_input(BenchmarkId::new("tile_greedy", n), &(a, b), |bench, (a, b)| {
            let params = TileParams::fast();
            bench.iter(|| tile_contours(black_box(a), black_box(b), black_box(&params)));
        });
    }

    group.finish();
}

// =============================================================================
// Amalgamation Benchmarks
// =============================================================================

fn bench_amalgamate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Amalgamate");

    for count in [2, 4, 8] {
        let contours: Vec<Contour> = (0..count)
            .map(|i| {
                create_ring(48, 4.0, 0.0, 0.0).translated(&Vector3::new(12.0 * i as f64, 0.0, 0.0))
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("amalgamate_contours", count),
            &contours,
            |bench, contours| {
                let params = AmalgamateParams::default();
                bench.iter(|| amalgamate_contours(black_box(contours), black_box(&params)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_optimal, bench_greedy, bench_amalgamate);

criterion_main!(benches);
