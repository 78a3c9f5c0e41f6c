use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use bookfold_core::cache::{PageResourceCache, ResourceFactory};
use bookfold_core::document::{BoxKind, PageGeometry, StaticPage};
use bookfold_core::geometry::Rect;
use bookfold_core::layout::{Alignment, Orientation, PageTransform, SpreadAssembler};

struct Handles;

impl ResourceFactory for Handles {
    type Resource = usize;

    fn create(&self, index: usize) -> bookfold_core::Result<usize> {
        Ok(index)
    }

    fn blank(&self) -> usize {
        0
    }
}

/// Deterministic focus sequence mixing sequential turns and far jumps.
fn focus_path(total: usize, steps: usize) -> Vec<usize> {
    let mut state = 0x9e37_79b9_7f4a_7c15_u64;
    let mut focus = 1;
    (0..steps)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            focus = if state % 8 == 0 {
                (state as usize % total) + 1
            } else {
                (focus % total) + 1
            };
            focus
        })
        .collect()
}

fn bench_spreads(c: &mut Criterion) {
    let mut group = c.benchmark_group("spread_compute");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(3));

    for &total in &[100usize, 1000] {
        group.throughput(Throughput::Elements(total as u64));
        group.bench_with_input(BenchmarkId::new("landscape_cover", total), &total, |b, &n| {
            let assembler = SpreadAssembler::new(true);
            b.iter(|| {
                for focus in 1..=n {
                    black_box(assembler.compute(focus, n, Orientation::Landscape));
                }
            })
        });
    }

    group.finish();
}

fn bench_cache_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_window");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(3));

    let total = 500;
    for &radius in &[2usize, 4, 8] {
        let path = focus_path(total, 1000);
        group.throughput(Throughput::Elements(path.len() as u64));
        group.bench_with_input(BenchmarkId::new("radius", radius), &path, |b, path| {
            b.iter(|| {
                let mut cache = PageResourceCache::new(Handles, radius, radius);
                for &focus in path {
                    black_box(cache.window(focus, total));
                }
            })
        });
    }

    group.finish();
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_transform");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(3));

    let dest = Rect::new(0.0, 0.0, 512.0, 768.0);
    for rotation in [0, 90, 180, 270] {
        let page = StaticPage::sized(612.0, 792.0)
            .with_crop_box(Rect::new(18.0, 18.0, 576.0, 756.0))
            .with_rotation(rotation);
        let Some(geometry) = PageGeometry::from_page(&page, BoxKind::Crop) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("rotation", rotation), &geometry, |b, g| {
            b.iter(|| black_box(PageTransform::compute(g, dest, Alignment::Center)))
        });
    }

    group.finish();
}

criterion_group!(
    name = window_benches;
    config = Criterion::default().configure_from_args();
    targets = bench_spreads, bench_cache_window, bench_transforms
);
criterion_main!(window_benches);
