use adpolicy_sdk_core::crypto::{lm_hash, nt_hash};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const PASSWORDS: [&str; 3] = ["", "cactus", "M45Z*65M45Z*65"];

fn bench_lm(c: &mut Criterion) {
    let mut group = c.benchmark_group("lm_hash");
    for password in PASSWORDS {
        group.bench_with_input(
            BenchmarkId::from_parameter(password.len()),
            password,
            |b, password| b.iter(|| lm_hash(black_box(password))),
        );
    }
    group.finish();
}

fn bench_nt(c: &mut Criterion) {
    let mut group = c.benchmark_group("nt_hash");
    for password in PASSWORDS {
        group.bench_with_input(
            BenchmarkId::from_parameter(password.len()),
            password,
            |b, password| b.iter(|| nt_hash(black_box(password))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_lm, bench_nt);
criterion_main!(benches);
