//! taskrank-core: priority scoring engine for task batches.
//!
//! A batch is first checked for dependency cycles, then every task gets a
//! 0-100 score from a weighting [`Strategy`] and a short explanation.

pub mod analysis;
pub mod cycles;
pub mod error;
pub mod explain;
pub mod factors;
pub mod scorer;
pub mod strategy;
pub mod task;

pub use analysis::{analyze, AnalysisReport};
pub use cycles::{detect_circular_dependencies, ensure_acyclic};
pub use error::{Result, ScoringError};
pub use explain::explain;
pub use factors::{
    dependency_score, effort_score, field_warnings, importance_score, raw_urgency, urgency_score,
    FieldParseWarning,
};
pub use scorer::{PriorityLevel, PriorityScorer, ScoredTask, SubScores};
pub use strategy::{Strategy, SubScore};
pub use task::{FieldValue, RawDate, Task, TaskId};
