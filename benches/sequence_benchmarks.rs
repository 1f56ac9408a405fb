use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tseq::{Config, Interpolation, Sequence, SequenceBuilder};
use tseq_types::{FloatRange, GeoPoint, Instant, Period, Value, ValueKind};

fn wave(n: usize, interp: Interpolation) -> Sequence {
    let instants: Vec<Instant> = (0..n)
        .map(|i| Instant::new((i as f64 * 0.1).sin() * 10.0, i as i64 * 1_000))
        .collect();
    Sequence::make(instants, true, true, interp, false).unwrap()
}

fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [100, 1_000, 10_000] {
        let instants: Vec<Instant> = (0..size)
            .map(|i| Instant::new((i / 10) as f64, i as i64))
            .collect();
        group.bench_with_input(BenchmarkId::new("make_normalized", size), &instants, |b, run| {
            b.iter(|| {
                Sequence::make(black_box(run.clone()), true, true, Interpolation::Linear, true).unwrap()
            })
        });
    }

    group.bench_function("builder_points_1000", |b| {
        b.iter(|| {
            SequenceBuilder::new()
                .config(Config::default().with_precompute_trajectory(true))
                .extend((0..1_000).map(|i| {
                    let f = i as f64;
                    Instant::new(GeoPoint::new(f * 0.01, (f * 0.05).cos()), i)
                }))
                .build()
                .unwrap()
        })
    });

    group.finish();
}

fn benchmark_restriction(c: &mut Criterion) {
    let mut group = c.benchmark_group("restriction");

    for size in [100, 1_000, 10_000] {
        let seq = wave(size, Interpolation::Linear);
        let range = FloatRange::new(-2.0, 5.0, true, false).unwrap();
        group.bench_with_input(BenchmarkId::new("at_value", size), &seq, |b, seq| {
            b.iter(|| seq.at_value(black_box(&Value::Float(3.0))))
        });
        group.bench_with_input(BenchmarkId::new("at_range", size), &seq, |b, seq| {
            b.iter(|| seq.at_range(black_box(&range)))
        });
        group.bench_with_input(BenchmarkId::new("minus_range", size), &seq, |b, seq| {
            b.iter(|| seq.minus_range(black_box(&range)))
        });
        let mid = seq.period().upper / 2;
        let period = Period::new(mid / 2, mid + mid / 2, true, false).unwrap();
        group.bench_with_input(BenchmarkId::new("at_period", size), &seq, |b, seq| {
            b.iter(|| seq.at_period(black_box(&period)))
        });
    }

    group.finish();
}

fn benchmark_synchronize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronize");

    for size in [100, 1_000, 10_000] {
        let a = wave(size, Interpolation::Linear);
        let b = a.shift(500);
        group.bench_with_input(BenchmarkId::new("with_crossings", size), &(a, b), |bench, (a, b)| {
            bench.iter(|| a.synchronize(black_box(b), true))
        });
    }

    group.finish();
}

fn benchmark_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let seq = wave(10_000, Interpolation::Step);
    let bytes = seq.encode();
    let config = Config::default().with_normalize(false);

    group.bench_function("encode_10000", |b| b.iter(|| black_box(&seq).encode()));
    group.bench_function("decode_10000", |b| {
        b.iter(|| Sequence::decode(&mut bytes.clone(), ValueKind::Float, &config).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_restriction,
    benchmark_synchronize,
    benchmark_codec
);
criterion_main!(benches);
