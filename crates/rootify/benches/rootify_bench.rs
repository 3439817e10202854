//! Criterion benchmarks for the rootification strategies.
//! Focus sizes: n in {3, 4, 5, 6} (dense random matrices).
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p rootify

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rootify::prelude::*;

fn random_graph(order: usize, seed: u64) -> Graph<Numeric> {
    let cfg = RandomMatrixCfg {
        order,
        ..RandomMatrixCfg::default()
    };
    let m = draw_matrix(cfg, ReplayToken { seed, index: 0 }).expect("valid sampler config");
    build_graph(&m).numeric()
}

fn bench_rootify(c: &mut Criterion) {
    let mut group = c.benchmark_group("rootify");
    for &n in &[3usize, 4, 5, 6] {
        for strategy in [
            Strategy::Sequential,
            Strategy::Partitioned,
            Strategy::MarkedPath { start: Vertex(1) },
        ] {
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &n, |b, &n| {
                b.iter_batched(
                    || random_graph(n, 43),
                    |g| {
                        let mut sum = DeterminantSum::new();
                        let cfg = RootifyCfg {
                            strategy,
                            ..RootifyCfg::default()
                        };
                        let _stats = rootify(&g, &NumericSum, &mut sum, cfg).unwrap();
                        sum.total
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_with_input(BenchmarkId::new("lu", n), &n, |b, &n| {
            let cfg = RandomMatrixCfg {
                order: n,
                ..RandomMatrixCfg::default()
            };
            let m = draw_matrix(cfg, ReplayToken { seed: 44, index: 0 }).unwrap();
            b.iter(|| m.lu_determinant())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rootify);
criterion_main!(benches);
