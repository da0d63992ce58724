use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sumvalve::hashing::ChecksumEngine;
use sumvalve::sums::KnownSums;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

// 1. Engine throughput per algorithm
fn bench_checksum(c: &mut Criterion) {
    let engine = ChecksumEngine::with_default_algorithms();
    let mut group = c.benchmark_group("checksum");

    for size_kb in [4, 64, 1024] {
        let data = payload(size_kb * 1024);
        for algorithm in ["md5", "sha256", "blake3"] {
            group.bench_function(format!("{algorithm}_{size_kb}kb"), |b| {
                b.iter(|| {
                    let sum = engine.checksum(algorithm, black_box(&data)).unwrap();
                    black_box(sum);
                })
            });
        }
    }
    group.finish();
}

// 2. Pool behavior: repeated small checksums reuse accumulator state
fn bench_pooled_reuse(c: &mut Criterion) {
    let engine = ChecksumEngine::with_default_algorithms();
    let data = payload(256);

    c.bench_function("pooled_sha256_small_inputs", |b| {
        b.iter(|| {
            for _ in 0..64 {
                let sum = engine.checksum("sha256", black_box(&data)).unwrap();
                black_box(sum);
            }
        })
    });
}

// 3. Store validation with a handful of records per name
fn bench_store_validate(c: &mut Criterion) {
    let store = KnownSums::new(ChecksumEngine::with_default_algorithms());
    let data = payload(64 * 1024);
    for algorithm in ["md5", "sha1", "sha256"] {
        store.add("release", algorithm, &data).unwrap();
    }

    c.bench_function("validate_three_records", |b| {
        b.iter(|| {
            let ok = store.validate("release", None, black_box(&data)).unwrap();
            black_box(ok);
        })
    });
}

criterion_group!(
    benches,
    bench_checksum,
    bench_pooled_reuse,
    bench_store_validate
);
criterion_main!(benches);
