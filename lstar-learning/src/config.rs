use std::str::FromStr;

use thiserror::Error;

/// Default upper bound on the number of counterexamples that [`crate::active::LStar`] processes
/// before giving up.
pub const ITERATION_THRESHOLD: usize = if cfg!(debug_assertions) { 300 } else { 200000 };

/// Environment variable that overrides [`LStarConfig::max_rounds`].
pub const MAX_ITERATIONS_VAR: &str = "MAX_ITERATIONS";
/// Environment variable that overrides [`LStarConfig::counterexample_processing`].
pub const COUNTEREXAMPLE_VAR: &str = "LSTAR_CEX";

/// Errors arising from malformed configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The round limit is not a number.
    #[error("could not parse `{value}` given for {variable} as a round limit")]
    InvalidRoundLimit {
        /// the variable that was read
        variable: &'static str,
        /// its value
        value: String,
    },
    /// The requested way of processing counterexamples does not exist.
    #[error("unknown counterexample processing `{0}`, expected `prefixes` or `suffixes`")]
    UnknownProcessing(String),
}

/// Determines how a counterexample is incorporated into the observation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterexampleProcessing {
    /// Every non-empty prefix of the counterexample becomes a representative.
    #[default]
    Prefixes,
    /// Every non-empty suffix of the counterexample becomes a separator.
    Suffixes,
}

impl FromStr for CounterexampleProcessing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefixes" | "prefix" => Ok(Self::Prefixes),
            "suffixes" | "suffix" => Ok(Self::Suffixes),
            _ => Err(ConfigError::UnknownProcessing(s.to_string())),
        }
    }
}

/// Parameters of a run of [`crate::active::LStar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LStarConfig {
    /// Maximal number of counterexamples that are processed.
    pub max_rounds: usize,
    /// How counterexamples are added to the table.
    pub counterexample_processing: CounterexampleProcessing,
}

impl Default for LStarConfig {
    fn default() -> Self {
        Self {
            max_rounds: ITERATION_THRESHOLD,
            counterexample_processing: CounterexampleProcessing::default(),
        }
    }
}

impl LStarConfig {
    /// Reads the configuration from the environment, see [`MAX_ITERATIONS_VAR`] and
    /// [`COUNTEREXAMPLE_VAR`]. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary source of variables.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(MAX_ITERATIONS_VAR) {
            config.max_rounds =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidRoundLimit {
                        variable: MAX_ITERATIONS_VAR,
                        value,
                    })?;
        }
        if let Some(value) = lookup(COUNTEREXAMPLE_VAR) {
            config.counterexample_processing = value.parse()?;
        }
        Ok(config)
    }

    /// Sets the round limit.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets the way counterexamples are processed.
    pub fn with_counterexample_processing(mut self, processing: CounterexampleProcessing) -> Self {
        self.counterexample_processing = processing;
        self
    }
}
