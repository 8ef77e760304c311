use crate::task::TaskId;
use thiserror::Error;

/// Batch-level failures. Bad field values never end up here; see
/// [`crate::factors::FieldParseWarning`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("unknown strategy '{name}' (expected one of: smart_balance, fastest_wins, high_impact, deadline_driven)")]
    UnknownStrategy { name: String },

    #[error("circular dependencies detected: {}", format_cycles(.cycles))]
    DependencyCycle { cycles: Vec<Vec<TaskId>> },
}

pub type Result<T> = std::result::Result<T, ScoringError>;

fn format_cycles(cycles: &[Vec<TaskId>]) -> String {
    cycles
        .iter()
        .map(|c| {
            c.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_paths() {
        let err = ScoringError::DependencyCycle {
            cycles: vec![vec![1.into(), 2.into(), 1.into()]],
        };
        assert_eq!(err.to_string(), "circular dependencies detected: 1 -> 2 -> 1");
    }
}
