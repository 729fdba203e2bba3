//! Active learning of deterministic finite automata and Moore machines.
//!
//! The learner only interacts with the system under learning ([`Sul`]) through membership
//! queries, and with an [`EquivalenceOracle`] that either confirms a hypothesis or produces a
//! counterexample. Membership queries are organized in an [`ObservationTable`], which is driven
//! by [`LStar`] until the oracle accepts a hypothesis.
//!
//! ```
//! use lstar_core::prelude::*;
//! use lstar_learning::prelude::*;
//!
//! let target: DFA = MooreMachine::builder(alphabet!('a', 'b'))
//!     .with_state_colors([true, false])
//!     .with_transitions([(0, 'a', 1), (0, 'b', 0), (1, 'a', 0), (1, 'b', 1)])
//!     .into_moore(0)
//!     .unwrap();
//! let oracle = PerfectKnowledgeOracle::new(target.clone());
//! let learned = LStar::new(MooreSul::new(target.clone()), target.alphabet().clone(), oracle)
//!     .unwrap()
//!     .infer()
//!     .unwrap();
//! assert_eq!(learned.hypothesis.size(), 2);
//! assert!(learned.hypothesis.equivalent(&target));
//! ```
#![deny(missing_docs)]

/// The prelude re-exports everything that is needed for running a learner.
pub mod prelude {
    pub use super::{
        active::{
            lstar, CounterexampleProcessing, EquivalenceOracle, Inconsistency, LStar, Learned,
            LearningStatistics, LearningTable, ObservationTable, PerfectKnowledgeOracle, Row,
        },
        config::{ConfigError, LStarConfig},
        sul::{membership_query, MooreSul, Sul},
        LearningError,
    };

    #[cfg(feature = "random")]
    pub use super::active::{RandomWalkConfig, RandomWalkOracle};
}

mod error;
pub use error::LearningError;

/// Configuration of the learning loop.
pub mod config;

/// The boundary to the system under learning.
pub mod sul;

/// Deals with active learning algorithms such as L*.
pub mod active;

/// Runs L* against randomly drawn targets and reports how much work it took.
#[cfg(feature = "random")]
pub mod experiment;
