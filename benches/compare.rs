//! Criterion benchmarks for image comparison
//!
//! Covers the three shapes of input that drive the per-pixel cost:
//! - Identical images (fast path without a diff buffer)
//! - Fully differing images (every pixel written as a diff)
//! - Antialiased edges (classifier runs on every edge pixel)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use pixelmatch::{pixelmatch, ImageView, ImageViewMut, Options};

// =============================================================================
// Test Data Generators
// =============================================================================

fn solid(size: u32, value: u8) -> RgbaImage {
    RgbaImage::from_pixel(size, size, Rgba([value, value, value, 255]))
}

/// Diagonal stripes with a soft one-pixel ramp between bands
fn striped(size: u32, offset: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let v = match (x + y + offset) % 16 {
            0..=6 => 0,
            7 => 128,
            _ => 255,
        };
        Rgba([v, v, v, 255])
    })
}

fn run(a: &RgbaImage, b: &RgbaImage, diff: Option<&mut RgbaImage>, options: &Options) -> usize {
    pixelmatch(
        ImageView::from_image(a),
        ImageView::from_image(b),
        diff.map(ImageViewMut::from_image),
        options,
    )
    .unwrap_or(0)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_compare(c: &mut Criterion) {
    let options = Options::default();
    let cases = [
        ("identical", solid(512, 200), solid(512, 200)),
        ("all_different", solid(512, 0), solid(512, 255)),
        ("antialiased", striped(512, 0), striped(512, 1)),
    ];

    let mut group = c.benchmark_group("compare");
    group.throughput(Throughput::Elements(512 * 512));
    for (name, a, b) in &cases {
        group.bench_with_input(BenchmarkId::new("count", name), &(a, b), |bench, (a, b)| {
            bench.iter(|| run(black_box(a), black_box(b), None, &options))
        });
        let mut diff = RgbaImage::new(a.width(), a.height());
        group.bench_with_input(BenchmarkId::new("with_diff", name), &(a, b), |bench, (a, b)| {
            bench.iter(|| run(black_box(a), black_box(b), Some(&mut diff), &options))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);
