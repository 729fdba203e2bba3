use lstar_core::prelude::AutomatonError;
use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can go wrong while learning. Words, symbols and observations are rendered
/// to strings, which keeps the error independent of the symbol and output types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LearningError {
    /// A hypothesis was requested from a table that is not closed.
    #[error("table is not closed, boundary row `{word}` matches no representative")]
    IncompleteTable {
        /// the boundary word whose row has no matching representative
        word: String,
    },
    /// A word refers to a symbol that is not part of the alphabet of the table.
    #[error("symbol `{symbol}` of word `{word}` is not part of the alphabet")]
    UnknownSymbol {
        /// the offending symbol
        symbol: String,
        /// the word in which it occurs
        word: String,
    },
    /// An operation was called on rows that do not satisfy its precondition.
    #[error("table invariant violated: {0}")]
    InvariantViolated(String),
    /// Querying the same word twice produced different observations.
    #[error("system under learning is not deterministic: `{word}` produced {expected} and later {observed}")]
    NonDeterministic {
        /// the queried word
        word: String,
        /// the observation that was recorded first
        expected: String,
        /// the observation that contradicts it
        observed: String,
    },
    /// The learner did not converge within the configured number of rounds.
    #[error("no hypothesis was accepted within {0} rounds")]
    RoundLimitExceeded(usize),
    /// The configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A machine to learn from could not be built.
    #[error("could not build target machine: {0}")]
    Target(#[from] AutomatonError),
}
