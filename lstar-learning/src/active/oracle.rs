use lstar_core::prelude::*;
use tracing::debug;

/// The equivalence part of a minimally adequate teacher. Given a hypothesis, it either confirms
/// that the hypothesis is behaviorally equivalent to the system under learning or produces a
/// word on which the two differ.
///
/// The answer of an oracle is taken as authoritative. An oracle that keeps returning words on
/// which the hypothesis is actually correct prevents the learner from terminating, which is
/// caught by the round limit of [`crate::active::LStar`].
pub trait EquivalenceOracle {
    /// The type of input symbols.
    type Symbol: Symbol;
    /// The type of observations.
    type Output: Color;

    /// Returns `None` if `hypothesis` is equivalent to the system and a counterexample otherwise.
    fn find_counterexample(
        &mut self,
        hypothesis: &MooreMachine<Self::Symbol, Self::Output>,
    ) -> Option<Word<Self::Symbol>>;
}

impl<Q: EquivalenceOracle + ?Sized> EquivalenceOracle for &mut Q {
    type Symbol = Q::Symbol;
    type Output = Q::Output;

    fn find_counterexample(
        &mut self,
        hypothesis: &MooreMachine<Self::Symbol, Self::Output>,
    ) -> Option<Word<Self::Symbol>> {
        Q::find_counterexample(self, hypothesis)
    }
}

/// An oracle that knows the target machine. Counterexamples are the shortest words on which
/// target and hypothesis produce different outputs, see [`MooreMachine::separate`].
#[derive(Debug, Clone)]
pub struct PerfectKnowledgeOracle<S, O> {
    target: MooreMachine<S, O>,
}

impl<S: Symbol, O: Color> PerfectKnowledgeOracle<S, O> {
    /// Creates an oracle for the given target.
    pub fn new(target: MooreMachine<S, O>) -> Self {
        Self { target }
    }

    /// The machine against which hypotheses are compared.
    pub fn target(&self) -> &MooreMachine<S, O> {
        &self.target
    }
}

impl<S: Symbol, O: Color> EquivalenceOracle for PerfectKnowledgeOracle<S, O> {
    type Symbol = S;
    type Output = O;

    fn find_counterexample(&mut self, hypothesis: &MooreMachine<S, O>) -> Option<Word<S>> {
        let counterexample = self.target.separate(hypothesis);
        match &counterexample {
            Some(word) => debug!("target and hypothesis differ on {}", word.as_string()),
            None => debug!("hypothesis is equivalent to the target"),
        }
        counterexample
    }
}

#[cfg(feature = "random")]
mod random_walk {
    use lstar_core::prelude::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use tracing::{debug, trace};

    use super::EquivalenceOracle;
    use crate::sul::Sul;

    /// Parameters of a [`RandomWalkOracle`].
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct RandomWalkConfig {
        /// Maximal number of symbols fed to the system per equivalence query.
        pub num_steps: usize,
        /// Probability with which the walk restarts from the initial state before each step.
        /// Values outside of `[0, 1]` are clamped.
        pub reset_probability: f64,
        /// Seed of the random number generator.
        pub seed: u64,
    }

    impl Default for RandomWalkConfig {
        fn default() -> Self {
            Self {
                num_steps: 5000,
                reset_probability: 0.09,
                seed: 0,
            }
        }
    }

    impl RandomWalkConfig {
        /// Sets the number of steps.
        pub fn with_num_steps(mut self, num_steps: usize) -> Self {
            self.num_steps = num_steps;
            self
        }

        /// Sets the reset probability.
        pub fn with_reset_probability(mut self, reset_probability: f64) -> Self {
            self.reset_probability = reset_probability;
            self
        }

        /// Sets the seed.
        pub fn with_seed(mut self, seed: u64) -> Self {
            self.seed = seed;
            self
        }
    }

    /// An oracle that has no knowledge of the target and instead performs a random walk on its
    /// own copy of the system under learning, running the hypothesis alongside. The first
    /// position where outputs disagree yields the counterexample, which is the word walked since
    /// the last reset. If no disagreement shows up within the configured number of steps, the
    /// hypothesis is accepted.
    #[derive(Debug, Clone)]
    pub struct RandomWalkOracle<T> {
        sul: T,
        rng: StdRng,
        config: RandomWalkConfig,
    }

    impl<T: Sul> RandomWalkOracle<T> {
        /// Creates an oracle that walks on `sul`.
        pub fn new(sul: T, config: RandomWalkConfig) -> Self {
            Self {
                sul,
                rng: StdRng::seed_from_u64(config.seed),
                config,
            }
        }

        /// The configuration this oracle was created with.
        pub fn config(&self) -> &RandomWalkConfig {
            &self.config
        }
    }

    impl<T: Sul> EquivalenceOracle for RandomWalkOracle<T> {
        type Symbol = T::Symbol;
        type Output = T::Output;

        fn find_counterexample(
            &mut self,
            hypothesis: &MooreMachine<T::Symbol, T::Output>,
        ) -> Option<Word<T::Symbol>> {
            let reset_probability = self.config.reset_probability.clamp(0.0, 1.0);
            let mut walked = vec![];
            let mut state = hypothesis.initial();
            self.sul.reset();

            for _ in 0..self.config.num_steps {
                if self.rng.gen_bool(reset_probability) {
                    trace!("resetting random walk");
                    self.sul.reset();
                    walked.clear();
                    state = hypothesis.initial();
                }

                let symbol = hypothesis.alphabet().symbols().choose(&mut self.rng)?.clone();
                let observed = self.sul.step(&symbol);
                let predicted = hypothesis.successor(state, &symbol).and_then(|next| {
                    state = next;
                    hypothesis.state_output(next)
                });
                walked.push(symbol);
                if predicted != Some(&observed) {
                    let counterexample = Word::from(walked);
                    debug!(
                        "random walk found counterexample {}, hypothesis gives {:?} but system gives {:?}",
                        counterexample.as_string(),
                        predicted,
                        observed
                    );
                    return Some(counterexample);
                }
            }

            debug!(
                "no counterexample within {} random steps",
                self.config.num_steps
            );
            None
        }
    }
}

#[cfg(feature = "random")]
pub use random_walk::{RandomWalkConfig, RandomWalkOracle};

#[cfg(test)]
mod tests {
    use lstar_core::prelude::*;

    use super::{EquivalenceOracle, PerfectKnowledgeOracle};

    fn ends_with_b() -> DFA {
        MooreMachine::builder(alphabet!('a', 'b'))
            .with_state_colors([false, true])
            .with_transitions([(0, 'a', 0), (0, 'b', 1), (1, 'a', 0), (1, 'b', 1)])
            .into_moore(0)
            .unwrap()
    }

    fn rejects_all() -> DFA {
        MooreMachine::builder(alphabet!('a', 'b'))
            .with_state_colors([false])
            .with_transitions([(0, 'a', 0), (0, 'b', 0)])
            .into_moore(0)
            .unwrap()
    }

    #[test_log::test]
    fn perfect_knowledge() {
        let mut oracle = PerfectKnowledgeOracle::new(ends_with_b());
        assert_eq!(
            oracle.find_counterexample(&rejects_all()),
            Some(Word::from("b"))
        );
        assert_eq!(oracle.find_counterexample(&ends_with_b()), None);
    }

    fn counterexample_of<Q: EquivalenceOracle<Symbol = char, Output = bool>>(
        mut oracle: Q,
        hypothesis: &DFA,
    ) -> Option<Word<char>> {
        oracle.find_counterexample(hypothesis)
    }

    #[test]
    fn works_through_mutable_references() {
        let mut oracle = PerfectKnowledgeOracle::new(ends_with_b());
        assert_eq!(
            counterexample_of(&mut oracle, &rejects_all()),
            Some(Word::from("b"))
        );
        assert_eq!(counterexample_of(&mut oracle, &ends_with_b()), None);
        assert_eq!(oracle.target(), &ends_with_b());
    }

    #[cfg(feature = "random")]
    #[test_log::test]
    fn random_walk() {
        use super::{RandomWalkConfig, RandomWalkOracle};
        use crate::sul::MooreSul;

        let config = RandomWalkConfig::default().with_seed(17);
        let mut oracle = RandomWalkOracle::new(MooreSul::new(ends_with_b()), config);

        let counterexample = oracle.find_counterexample(&rejects_all()).unwrap();
        assert_eq!(counterexample.last(), Some(&'b'));
        assert!(ends_with_b().accepts(&counterexample));
        assert!(!rejects_all().accepts(&counterexample));

        assert_eq!(oracle.find_counterexample(&ends_with_b()), None);

        let mut idle = RandomWalkOracle::new(
            MooreSul::new(ends_with_b()),
            config.with_num_steps(0),
        );
        assert_eq!(idle.find_counterexample(&rejects_all()), None);
    }
}
