use lstar_core::{prelude::*, random::generate_random_dfa, random::generate_random_moore};
use lstar_learning::{experiment::run_experiment, prelude::*};
use rand::{rngs::StdRng, SeedableRng};

fn four_state_target() -> DFA {
    MooreMachine::builder(alphabet!('a', 'b'))
        .with_state_colors([false, false, true, false])
        .with_transitions([
            (0, 'a', 1),
            (0, 'b', 2),
            (1, 'a', 0),
            (1, 'b', 3),
            (2, 'a', 3),
            (2, 'b', 0),
            (3, 'a', 2),
            (3, 'b', 1),
        ])
        .into_moore(0)
        .unwrap()
}

/// Counts the `1`s modulo 3 and outputs the remainder.
fn mod_three() -> MooreMachine<u8, u32> {
    MooreMachine::builder(alphabet!(0u8, 1))
        .with_state_colors([0, 1, 2])
        .with_transitions([
            (0, 0, 0),
            (0, 1, 1),
            (1, 0, 1),
            (1, 1, 2),
            (2, 0, 2),
            (2, 1, 0),
        ])
        .into_moore(0)
        .unwrap()
}

#[test_log::test]
fn fixed_target_with_perfect_knowledge() {
    let target = four_state_target();
    let hypothesis = lstar(
        MooreSul::new(target.clone()),
        alphabet!('a', 'b'),
        PerfectKnowledgeOracle::new(target.clone()),
    )
    .unwrap();
    assert_eq!(hypothesis.size(), 4);
    assert!(hypothesis.equivalent(&target));
    for word in ["", "b", "ab", "bab", "abba", "bbbbb"] {
        let word = Word::from(word);
        assert_eq!(hypothesis.accepts(&word), target.accepts(&word));
    }
}

#[test_log::test]
fn fixed_target_with_random_walk() {
    let target = four_state_target();
    let oracle = RandomWalkOracle::new(
        MooreSul::new(target.clone()),
        RandomWalkConfig::default().with_seed(42),
    );
    let learned = LStar::new(MooreSul::new(target.clone()), alphabet!('a', 'b'), oracle)
        .unwrap()
        .infer()
        .unwrap();
    assert!(learned.hypothesis.equivalent(&target));
    assert!(learned.statistics.equivalence_queries >= 2);
}

#[test_log::test]
fn random_targets() {
    let mut rng = StdRng::seed_from_u64(7);
    for size in [1, 3, 6, 12] {
        let target = generate_random_dfa(3, size, &mut rng).unwrap();
        let mut learner = LStar::new(
            MooreSul::new(target.clone()),
            target.alphabet().clone(),
            PerfectKnowledgeOracle::new(target.clone()),
        )
        .unwrap();
        let learned = learner.infer().unwrap();

        assert!(learned.hypothesis.equivalent(&target));
        assert!(learned.hypothesis.size() <= target.size());
        assert_eq!(
            learned.hypothesis.transitions().count(),
            learned.hypothesis.size() * target.alphabet().size()
        );
        assert!(learner.table().is_closed());
        assert!(learner.table().is_consistent());
    }
}

#[test_log::test]
fn moore_targets() {
    let target = mod_three();
    let learned = LStar::new(
        MooreSul::new(target.clone()),
        target.alphabet().clone(),
        PerfectKnowledgeOracle::new(target.clone()),
    )
    .unwrap()
    .infer()
    .unwrap();
    assert_eq!(learned.hypothesis.size(), 3);
    assert!(learned.hypothesis.equivalent(&target));
    assert_eq!(learned.hypothesis.output(&Word::from(vec![1, 0, 1, 1])), Some(&0));

    let mut rng = StdRng::seed_from_u64(11);
    let target = generate_random_moore(2, 10, 3, &mut rng).unwrap();
    let learned = LStar::new(
        MooreSul::new(target.clone()),
        target.alphabet().clone(),
        PerfectKnowledgeOracle::new(target.clone()),
    )
    .unwrap()
    .with_config(
        LStarConfig::default().with_counterexample_processing(CounterexampleProcessing::Suffixes),
    )
    .infer()
    .unwrap();
    assert!(learned.hypothesis.equivalent(&target));
}

#[test_log::test]
fn both_processing_strategies_agree() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..5 {
        let target = generate_random_dfa(2, 8, &mut rng).unwrap();
        let learn = |processing| {
            LStar::new(
                MooreSul::new(target.clone()),
                target.alphabet().clone(),
                PerfectKnowledgeOracle::new(target.clone()),
            )
            .unwrap()
            .with_config(LStarConfig::default().with_counterexample_processing(processing))
            .infer()
            .unwrap()
            .hypothesis
        };
        let prefixes = learn(CounterexampleProcessing::Prefixes);
        let suffixes = learn(CounterexampleProcessing::Suffixes);
        assert!(prefixes.equivalent(&suffixes));
        assert_eq!(prefixes.size(), suffixes.size());
    }
}

/// Accepts every hypothesis except the ones that reject `b`, and then claims `a` is the problem.
struct Misleading;

impl EquivalenceOracle for Misleading {
    type Symbol = char;
    type Output = bool;

    fn find_counterexample(&mut self, hypothesis: &DFA) -> Option<Word<char>> {
        (!hypothesis.accepts(&Word::from("b"))).then(|| Word::from("a"))
    }
}

#[test_log::test]
fn bogus_counterexamples_hit_the_round_limit() {
    let target: DFA = MooreMachine::builder(alphabet!('a', 'b'))
        .with_state_colors([false, false])
        .with_transitions([(0, 'a', 1), (0, 'b', 0), (1, 'a', 0), (1, 'b', 1)])
        .into_moore(0)
        .unwrap();
    let mut learner = LStar::new(MooreSul::new(target), alphabet!('a', 'b'), Misleading)
        .unwrap()
        .with_config(LStarConfig::default().with_max_rounds(3));
    assert_eq!(learner.infer(), Err(LearningError::RoundLimitExceeded(3)));
}

#[test_log::test]
fn experiments() {
    for (states, symbols, seed) in [(4, 2, 0), (10, 3, 1), (25, 2, 2)] {
        let statistics = run_experiment(states, symbols, seed).unwrap();
        assert!(statistics.membership_queries >= statistics.rows);
        assert!(statistics.representatives >= 1);
        assert!(statistics.separators >= 1);
        assert_eq!(statistics.rounds + 1, statistics.equivalence_queries);
    }
}
