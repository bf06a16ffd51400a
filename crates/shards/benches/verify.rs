//! split + exhaustive verification benchmarks
//!
//! Usage:
//!   cargo bench -p shards                # all share counts
//!   cargo bench -p shards -- 10-of-20    # one configuration

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use shards::{binomial, Shamir, ShareCodec, SplitOptions, Splitter};

const PHRASE: &str = "cabin journey merry actor derive blanket crowd infant dove window mixture story monitor cloth increase defy erupt chair voice hood immense wire awkward fluid";

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    group.sample_size(10);

    for (n, k) in [(3, 2), (5, 3), (10, 5), (20, 10)] {
        for parallel in [false, true] {
            let splitter = Splitter::new(
                Shamir::from_rng(ChaCha20Rng::seed_from_u64(0)),
                ShareCodec::default(),
            )
            .with_options(SplitOptions {
                parallel,
                ..SplitOptions::default()
            });

            let mode = if parallel { "parallel" } else { "sequential" };
            println!("{k}-of-{n}: {} subsets", binomial(n, k));
            group.bench_function(BenchmarkId::new(mode, format!("{k}-of-{n}")), |b| {
                b.iter(|| {
                    let set = splitter.split(black_box(PHRASE), n, k).unwrap();
                    black_box(set)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
