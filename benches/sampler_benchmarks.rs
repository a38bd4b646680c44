use bgclip_cli::{ClipLength, SegmentSampler};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_sampler");

    group.bench_function("ten_minutes_5x30s", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| {
            SegmentSampler::sample(black_box(600.0), ClipLength::Thirty, 5, 0, &mut rng)
        })
    });

    group.bench_function("three_hours_50x60s", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| {
            SegmentSampler::sample(black_box(10_800.0), ClipLength::Sixty, 50, 12, &mut rng)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sample);
criterion_main!(benches);
