use std::fmt::{Debug, Display};

use lstar_core::prelude::*;
use owo_colors::OwoColorize;
use tracing::{debug, info, trace};

use super::{oracle::EquivalenceOracle, ObservationTable};
use crate::{
    config::{CounterexampleProcessing, LStarConfig},
    sul::Sul,
    LearningError,
};

/// The capabilities of an observation table that [`LStar`] relies on. It is implemented by
/// [`ObservationTable`], see there for the semantics of the individual operations.
pub trait LearningTable {
    /// The type of input symbols.
    type Symbol: Symbol;
    /// The type of observations.
    type Output: Color;

    /// Repairs the table until it is closed and consistent.
    fn make_closed_and_consistent(&mut self) -> Result<(), LearningError>;

    /// Builds a hypothesis from a closed table.
    fn construct_hypothesis(
        &self,
    ) -> Result<MooreMachine<Self::Symbol, Self::Output>, LearningError>;

    /// Adds the prefixes of a counterexample as representatives.
    fn process_counterexample(
        &mut self,
        counterexample: &Word<Self::Symbol>,
    ) -> Result<(), LearningError>;

    /// Adds the suffixes of a counterexample as separators.
    fn process_counterexample_suffixes(
        &mut self,
        counterexample: &Word<Self::Symbol>,
    ) -> Result<(), LearningError>;

    /// Number of representatives.
    fn number_representatives(&self) -> usize;
    /// Number of separators.
    fn number_separators(&self) -> usize;
    /// Number of rows.
    fn number_rows(&self) -> usize;
    /// Number of membership queries that were sent to the system.
    fn queries(&self) -> usize;
}

impl<T: Sul> LearningTable for ObservationTable<T> {
    type Symbol = T::Symbol;
    type Output = T::Output;

    fn make_closed_and_consistent(&mut self) -> Result<(), LearningError> {
        ObservationTable::make_closed_and_consistent(self)
    }

    fn construct_hypothesis(&self) -> Result<MooreMachine<T::Symbol, T::Output>, LearningError> {
        ObservationTable::construct_hypothesis(self)
    }

    fn process_counterexample(
        &mut self,
        counterexample: &Word<T::Symbol>,
    ) -> Result<(), LearningError> {
        ObservationTable::process_counterexample(self, counterexample)
    }

    fn process_counterexample_suffixes(
        &mut self,
        counterexample: &Word<T::Symbol>,
    ) -> Result<(), LearningError> {
        ObservationTable::process_counterexample_suffixes(self, counterexample)
    }

    fn number_representatives(&self) -> usize {
        ObservationTable::number_representatives(self)
    }

    fn number_separators(&self) -> usize {
        ObservationTable::number_separators(self)
    }

    fn number_rows(&self) -> usize {
        ObservationTable::number_rows(self)
    }

    fn queries(&self) -> usize {
        ObservationTable::queries(self)
    }
}

/// Counts the work that a learner has done since it was created, across all calls of
/// [`LStar::infer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LearningStatistics {
    /// membership queries sent to the system through the table
    pub membership_queries: usize,
    /// hypotheses handed to the equivalence oracle
    pub equivalence_queries: usize,
    /// counterexamples that were processed
    pub rounds: usize,
    /// size of `S` at the end
    pub representatives: usize,
    /// size of `E` at the end
    pub separators: usize,
    /// number of rows at the end
    pub rows: usize,
    /// wall-clock time spent in all calls of [`LStar::infer`]
    pub duration: std::time::Duration,
}

impl Display for LearningStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} membership and {} equivalence queries in {} rounds, |S| = {}, |E| = {}, {} rows, took {}",
            self.membership_queries,
            self.equivalence_queries,
            self.rounds,
            self.representatives,
            self.separators,
            self.rows,
            show_duration(self.duration)
        )
    }
}

/// The outcome of a successful run of [`LStar`].
#[derive(Debug, Clone, PartialEq)]
pub struct Learned<S, O> {
    /// the hypothesis that the oracle accepted
    pub hypothesis: MooreMachine<S, O>,
    /// what it took to get there
    pub statistics: LearningStatistics,
}

enum Phase<S, O> {
    Refine,
    Hypothesize,
    Test(MooreMachine<S, O>),
    Done(MooreMachine<S, O>),
}

/// An implementation of the L* algorithm. The learner alternates between repairing its table,
/// building a hypothesis from it and asking the oracle about that hypothesis. A counterexample
/// is fed back into the table according to the configured [`CounterexampleProcessing`] and the
/// next round starts.
pub struct LStar<L, Q> {
    table: L,
    oracle: Q,
    config: LStarConfig,
    equivalence_queries: usize,
    rounds: usize,
    elapsed: std::time::Duration,
}

impl<T, Q> LStar<ObservationTable<T>, Q>
where
    T: Sul,
    Q: EquivalenceOracle<Symbol = T::Symbol, Output = T::Output>,
{
    /// Creates a learner for `sul` over `alphabet` with a fresh table and the default
    /// configuration.
    pub fn new(sul: T, alphabet: Alphabet<T::Symbol>, oracle: Q) -> Result<Self, LearningError> {
        Ok(Self::with_table(ObservationTable::new(sul, alphabet)?, oracle))
    }
}

impl<L, Q> LStar<L, Q>
where
    L: LearningTable,
    Q: EquivalenceOracle<Symbol = L::Symbol, Output = L::Output>,
{
    /// Creates a learner that continues from the given table.
    pub fn with_table(table: L, oracle: Q) -> Self {
        Self {
            table,
            oracle,
            config: LStarConfig::default(),
            equivalence_queries: 0,
            rounds: 0,
            elapsed: std::time::Duration::ZERO,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: LStarConfig) -> Self {
        self.config = config;
        self
    }

    /// The table of the learner.
    pub fn table(&self) -> &L {
        &self.table
    }

    /// The configuration of the learner.
    pub fn config(&self) -> &LStarConfig {
        &self.config
    }

    /// Runs the learning loop until the oracle accepts a hypothesis. The returned statistics
    /// cover everything this learner has done, including earlier calls of `infer` and the
    /// queries issued while the table was initialized.
    ///
    /// Fails with [`LearningError::RoundLimitExceeded`] if the oracle still produces a
    /// counterexample after [`LStarConfig::max_rounds`] have been processed. Errors of the table
    /// are passed on.
    pub fn infer(&mut self) -> Result<Learned<L::Symbol, L::Output>, LearningError> {
        let start = std::time::Instant::now();
        let outcome = self.run();
        self.elapsed += start.elapsed();
        let hypothesis = outcome?;

        let statistics = self.statistics();
        info!(
            "learned {} with {} states: {statistics}",
            "hypothesis".green(),
            hypothesis.size()
        );
        debug!("accepted hypothesis\n{hypothesis}");
        Ok(Learned {
            hypothesis,
            statistics,
        })
    }

    /// The statistics of everything this learner has done so far.
    pub fn statistics(&self) -> LearningStatistics {
        LearningStatistics {
            membership_queries: self.table.queries(),
            equivalence_queries: self.equivalence_queries,
            rounds: self.rounds,
            representatives: self.table.number_representatives(),
            separators: self.table.number_separators(),
            rows: self.table.number_rows(),
            duration: self.elapsed,
        }
    }

    fn run(&mut self) -> Result<MooreMachine<L::Symbol, L::Output>, LearningError> {
        let mut phase = Phase::Refine;

        loop {
            phase = match phase {
                Phase::Refine => {
                    trace!("refining table in round {}", self.rounds);
                    self.table.make_closed_and_consistent()?;
                    Phase::Hypothesize
                }
                Phase::Hypothesize => Phase::Test(self.table.construct_hypothesis()?),
                Phase::Test(hypothesis) => {
                    self.equivalence_queries += 1;
                    match self.oracle.find_counterexample(&hypothesis) {
                        None => Phase::Done(hypothesis),
                        Some(counterexample) => {
                            if self.rounds >= self.config.max_rounds {
                                return Err(LearningError::RoundLimitExceeded(
                                    self.config.max_rounds,
                                ));
                            }
                            self.rounds += 1;
                            info!(
                                "round {}: hypothesis with {} states refuted by {}",
                                self.rounds,
                                hypothesis.size(),
                                counterexample.as_string().red()
                            );
                            match self.config.counterexample_processing {
                                CounterexampleProcessing::Prefixes => {
                                    self.table.process_counterexample(&counterexample)?
                                }
                                CounterexampleProcessing::Suffixes => {
                                    self.table.process_counterexample_suffixes(&counterexample)?
                                }
                            }
                            Phase::Refine
                        }
                    }
                }
                Phase::Done(hypothesis) => return Ok(hypothesis),
            }
        }
    }
}

impl<L: LearningTable + Debug, Q> Debug for LStar<L, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "L* after {} rounds and {} equivalence queries",
            self.rounds, self.equivalence_queries
        )?;
        write!(f, "{:?}", self.table)
    }
}

/// Learns the behavior of `sul` over `alphabet` with a fresh [`LStar`] whose configuration is
/// read from the environment, see [`LStarConfig::from_env`].
pub fn lstar<T, Q>(
    sul: T,
    alphabet: Alphabet<T::Symbol>,
    oracle: Q,
) -> Result<MooreMachine<T::Symbol, T::Output>, LearningError>
where
    T: Sul,
    Q: EquivalenceOracle<Symbol = T::Symbol, Output = T::Output>,
{
    let config = LStarConfig::from_env()?;
    Ok(LStar::new(sul, alphabet, oracle)?
        .with_config(config)
        .infer()?
        .hypothesis)
}

#[cfg(test)]
mod tests {
    use lstar_core::prelude::*;

    use super::LStar;
    use crate::{
        active::{EquivalenceOracle, ObservationTable, PerfectKnowledgeOracle},
        config::{CounterexampleProcessing, LStarConfig},
        sul::MooreSul,
        LearningError,
    };

    fn target() -> DFA {
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

    #[test_log::test]
    fn learns_the_target() {
        let target = target();
        let mut learner = LStar::new(
            MooreSul::new(target.clone()),
            alphabet!('a', 'b'),
            PerfectKnowledgeOracle::new(target.clone()),
        )
        .unwrap();
        let learned = learner.infer().unwrap();

        assert!(learned.hypothesis.equivalent(&target));
        assert_eq!(learned.hypothesis.size(), 4);
        assert_eq!(learned.statistics.rounds, 1);
        assert_eq!(learned.statistics.equivalence_queries, 2);
        assert_eq!(
            learned.statistics.membership_queries,
            learner.table().queries()
        );
        assert_eq!(learned.statistics.rows, learner.table().number_rows());
        assert!(format!("{learner:?}").contains("1 rounds"));
    }

    #[test_log::test]
    fn suffix_processing() {
        let target = target();
        let mut learner = LStar::new(
            MooreSul::new(target.clone()),
            alphabet!('a', 'b'),
            PerfectKnowledgeOracle::new(target.clone()),
        )
        .unwrap()
        .with_config(
            LStarConfig::default().with_counterexample_processing(CounterexampleProcessing::Suffixes),
        );
        let learned = learner.infer().unwrap();
        assert!(learned.hypothesis.equivalent(&target));
        assert_eq!(learned.statistics.representatives, 4);
    }

    /// Claims that `a` is a counterexample, no matter what.
    struct Stubborn;

    impl EquivalenceOracle for Stubborn {
        type Symbol = char;
        type Output = bool;

        fn find_counterexample(&mut self, _hypothesis: &DFA) -> Option<Word<char>> {
            Some(Word::from("a"))
        }
    }

    #[test_log::test]
    fn round_limit() {
        let table = ObservationTable::new(MooreSul::new(target()), alphabet!('a', 'b')).unwrap();
        let mut learner =
            LStar::with_table(table, Stubborn).with_config(LStarConfig::default().with_max_rounds(5));
        assert_eq!(learner.infer(), Err(LearningError::RoundLimitExceeded(5)));
        assert_eq!(learner.config().max_rounds, 5);
    }

    #[test_log::test]
    fn statistics_accumulate_over_calls() {
        let target = target();
        let mut learner = LStar::new(
            MooreSul::new(target.clone()),
            alphabet!('a', 'b'),
            PerfectKnowledgeOracle::new(target.clone()),
        )
        .unwrap();
        let first = learner.infer().unwrap().statistics;
        let second = learner.infer().unwrap().statistics;

        assert_eq!(second.membership_queries, first.membership_queries);
        assert_eq!(second.rounds, first.rounds);
        assert_eq!(second.representatives, first.representatives);
        assert_eq!(second.rows, first.rows);
        assert_eq!(second.equivalence_queries, first.equivalence_queries + 1);
        assert!(second.duration >= first.duration);
        assert_eq!(learner.statistics().duration, second.duration);
    }

    #[test_log::test]
    fn failed_calls_are_counted() {
        let table = ObservationTable::new(MooreSul::new(target()), alphabet!('a', 'b')).unwrap();
        let mut learner =
            LStar::with_table(table, Stubborn).with_config(LStarConfig::default().with_max_rounds(2));
        assert!(learner.infer().is_err());
        let statistics = learner.statistics();
        assert_eq!(statistics.rounds, 2);
        assert_eq!(statistics.equivalence_queries, 3);
        assert_eq!(statistics.membership_queries, learner.table().queries());
    }
}
