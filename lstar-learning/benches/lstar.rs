use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lstar_core::{prelude::*, random::generate_random_dfa};
use lstar_learning::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn targets(size: usize) -> Vec<DFA> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    (0..8)
        .map(|_| generate_random_dfa(3, size, &mut rng).unwrap())
        .collect()
}

fn learn_random_targets(c: &mut Criterion) {
    let mut group = c.benchmark_group("lstar");

    for size in [5, 10, 20, 40] {
        let targets = targets(size);
        for processing in [
            CounterexampleProcessing::Prefixes,
            CounterexampleProcessing::Suffixes,
        ] {
            let config = LStarConfig::default().with_counterexample_processing(processing);
            group.bench_with_input(
                BenchmarkId::new(format!("{processing:?}"), size),
                &targets,
                |b, targets| {
                    b.iter(|| {
                        for target in targets {
                            let learned = LStar::new(
                                MooreSul::new(target.clone()),
                                target.alphabet().clone(),
                                PerfectKnowledgeOracle::new(target.clone()),
                            )
                            .and_then(|learner| learner.with_config(config).infer())
                            .unwrap();
                            black_box(learned);
                        }
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, learn_random_targets);
criterion_main!(benches);
