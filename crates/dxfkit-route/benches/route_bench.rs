//! Benchmarks for path joining and route optimization.
//!
//! Measures joining of touching segments, space-filling-curve ordering,
//! and the full optimization loop at various scene sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dxfkit_core::{Path, Point2, Vec2};
use dxfkit_route::{join_paths, optimize_route, route_optimized, sierpinski_index, RouteOptions};

/// Segments arranged in rows of eight, each row joining into one chain.
fn touching_segments(n: usize) -> Vec<Path> {
    (0..n)
        .map(|i| {
            let row = (i / 8) as f64;
            let col = (i % 8) as f64;
            Path {
                points: vec![
                    Point2::new(col, row * 5.0),
                    Point2::new(col + 1.0, row * 5.0),
                ],
                ..Path::default()
            }
        })
        .collect()
}

/// Short disconnected segments scattered over a 100x100 area.
fn scattered_lines(n: usize) -> Vec<Path> {
    (0..n)
        .map(|i| {
            let x = ((i * 37) % 100) as f64;
            let y = ((i * 53) % 100) as f64;
            Path {
                points: vec![Point2::new(x, y), Point2::new(x + 1.0, y + 0.5)],
                ..Path::default()
            }
        })
        .collect()
}

fn bench_join_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_paths");

    for &n in &[64, 256, 1024] {
        let paths = touching_segments(n);
        group.bench_with_input(BenchmarkId::new("touching_rows", n), &paths, |b, paths| {
            b.iter(|| black_box(join_paths(black_box(paths), 0.01)))
        });
    }
    group.finish();
}

fn bench_route_seed(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_optimized");

    for &n in &[64, 256, 1024] {
        let paths = scattered_lines(n);
        group.bench_with_input(BenchmarkId::new("scattered", n), &paths, |b, paths| {
            b.iter(|| black_box(route_optimized(black_box(paths))))
        });
    }
    group.finish();
}

fn bench_optimize_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_route");
    group.sample_size(10);

    for &n in &[32, 128] {
        let paths = scattered_lines(n);
        let options = RouteOptions {
            optimize_direction: true,
            optimize_start: true,
        };
        group.bench_with_input(BenchmarkId::new("scattered", n), &paths, |b, paths| {
            b.iter(|| black_box(optimize_route(black_box(paths.clone()), options)))
        });
    }
    group.finish();
}

fn bench_sierpinski_index(c: &mut Criterion) {
    c.bench_function("sierpinski_index", |b| {
        b.iter(|| sierpinski_index(black_box(Vec2::new(0.375, 0.8125))))
    });
}

criterion_group!(
    benches,
    bench_join_paths,
    bench_route_seed,
    bench_optimize_route,
    bench_sierpinski_index
);
criterion_main!(benches);
