use bbmph::{BuildConfig, Builder, DEFAULT_SEEDS};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;

const N_KEYS: usize = 100_000;
const GAMMAS: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

fn gen_unique_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = HashSet::with_capacity(n * 2);
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        if set.insert(buf) {
            keys.push(buf.to_vec());
        }
    }
    keys
}

fn bench_build(c: &mut Criterion) {
    let keys = gen_unique_keys(N_KEYS, 42);
    let mut group = c.benchmark_group("build");
    group.sample_size(10);
    for gamma in GAMMAS {
        group.bench_with_input(BenchmarkId::from_parameter(gamma), &gamma, |b, &gamma| {
            b.iter(|| {
                Builder::new()
                    .with_config(BuildConfig { gamma, seeds: DEFAULT_SEEDS })
                    .build(keys.iter().map(|k| k.as_slice()))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let keys = gen_unique_keys(N_KEYS, 42);
    let mut group = c.benchmark_group("query");
    for gamma in GAMMAS {
        let mph = Builder::new()
            .with_config(BuildConfig { gamma, seeds: DEFAULT_SEEDS })
            .build(keys.iter().map(|k| k.as_slice()))
            .unwrap();
        // What the original harness recorded alongside latency.
        eprintln!(
            "gamma {gamma}: {} level bits, {} fallback entries",
            mph.bit_size(),
            mph.fallback_len()
        );
        group.bench_with_input(BenchmarkId::from_parameter(gamma), &mph, |b, mph| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(mph.index(&keys[i]))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
