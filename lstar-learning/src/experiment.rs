use lstar_core::random::generate_random_dfa;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::{
    active::{LStar, LearningStatistics, RandomWalkConfig, RandomWalkOracle},
    config::LStarConfig,
    sul::MooreSul,
    LearningError,
};

/// Draws a random DFA with `num_states` states over an alphabet of `alphabet_size` letters and
/// learns it with [`LStar`], where equivalence queries are answered by a [`RandomWalkOracle`]
/// with default parameters. Both the target and the random walk are determined by `seed`.
///
/// The returned statistics contain the number of membership and equivalence queries as well as
/// the sizes of `S` and `E` at the time the last hypothesis was built. Unreachable states of the
/// drawn DFA are removed, so the target may be smaller than `num_states`. If `num_states` or
/// `alphabet_size` is zero, no target can be drawn and [`LearningError::Target`] is returned.
pub fn run_experiment(
    num_states: usize,
    alphabet_size: usize,
    seed: u64,
) -> Result<LearningStatistics, LearningError> {
    run_experiment_with(num_states, alphabet_size, seed, LStarConfig::default())
}

/// Works like [`run_experiment`], but uses the given configuration for the learner.
pub fn run_experiment_with(
    num_states: usize,
    alphabet_size: usize,
    seed: u64,
    config: LStarConfig,
) -> Result<LearningStatistics, LearningError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let target = generate_random_dfa(alphabet_size, num_states, &mut rng)?;
    let oracle = RandomWalkOracle::new(
        MooreSul::new(target.clone()),
        RandomWalkConfig::default().with_seed(seed),
    );

    let learned = LStar::new(MooreSul::new(target.clone()), target.alphabet().clone(), oracle)?
        .with_config(config)
        .infer()?;
    info!(
        "target with {} states over {} symbols: {}",
        target.size(),
        alphabet_size,
        learned.statistics
    );
    Ok(learned.statistics)
}

#[cfg(test)]
mod tests {
    use lstar_core::prelude::*;

    use super::run_experiment;
    use crate::LearningError;

    #[test_log::test]
    fn experiments_are_reproducible() {
        let first = run_experiment(6, 2, 3).unwrap();
        let second = run_experiment(6, 2, 3).unwrap();
        assert_eq!(first.membership_queries, second.membership_queries);
        assert_eq!(first.equivalence_queries, second.equivalence_queries);
        assert_eq!(first.representatives, second.representatives);
        assert_eq!(first.separators, second.separators);

        assert!(first.equivalence_queries >= 1);
        assert!(first.representatives <= first.rows);
        assert!(first.separators >= 1);
    }

    #[test_log::test]
    fn alphabet_sizes() {
        let wide = run_experiment(3, 30, 0).unwrap();
        assert!(wide.rows > wide.representatives);
        assert_eq!(
            run_experiment(3, 0, 0),
            Err(LearningError::Target(AutomatonError::Alphabet(
                AlphabetError::Empty
            )))
        );
        assert_eq!(
            run_experiment(0, 2, 0),
            Err(LearningError::Target(AutomatonError::NoStates))
        );
    }
}
