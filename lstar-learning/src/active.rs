mod table;
pub use table::{Inconsistency, ObservationTable, Row};

mod oracle;
pub use oracle::{EquivalenceOracle, PerfectKnowledgeOracle};
#[cfg(feature = "random")]
pub use oracle::{RandomWalkConfig, RandomWalkOracle};

mod lstar;
pub use lstar::{lstar, LStar, Learned, LearningStatistics, LearningTable};

pub use crate::config::CounterexampleProcessing;
