//! Batch entry point: cycle gate, scoring, stable ranking.

use crate::cycles::ensure_acyclic;
use crate::error::Result;
use crate::factors::field_warnings;
use crate::scorer::{PriorityScorer, ScoredTask};
use crate::strategy::Strategy;
use crate::task::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Highest score first; equal scores keep input order.
    pub tasks: Vec<ScoredTask>,
    pub strategy_used: Strategy,
    pub total_tasks: usize,
}

impl AnalysisReport {
    /// The first `n` ranked tasks.
    pub fn top(&self, n: usize) -> &[ScoredTask] {
        &self.tasks[..n.min(self.tasks.len())]
    }
}

impl PriorityScorer {
    /// Score a whole batch. Fails without scoring anything if the batch has
    /// dependency cycles.
    pub fn analyze(&self, tasks: &[Task]) -> Result<AnalysisReport> {
        ensure_acyclic(tasks)?;

        let today = self.today();
        let mut scored: Vec<ScoredTask> = tasks
            .iter()
            .map(|task| {
                for warning in field_warnings(task) {
                    tracing::debug!(task = ?task.id, %warning, "field normalized");
                }
                self.score_task_on(task, tasks, today)
            })
            .collect();

        // sort_by is stable, so ties keep their input order.
        scored.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

        tracing::debug!(
            strategy = %self.strategy(),
            total = scored.len(),
            %today,
            "batch scored"
        );

        Ok(AnalysisReport {
            total_tasks: scored.len(),
            tasks: scored,
            strategy_used: self.strategy(),
        })
    }

    /// The `count` best tasks to work on next.
    pub fn suggest(&self, tasks: &[Task], count: usize) -> Result<Vec<ScoredTask>> {
        let mut report = self.analyze(tasks)?;
        report.tasks.truncate(count);
        Ok(report.tasks)
    }
}

/// Score a batch with a strategy given by name, as an external caller would.
pub fn analyze(tasks: &[Task], strategy: &str) -> Result<AnalysisReport> {
    PriorityScorer::from_name(strategy)?.analyze(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::task::TaskId;
    use chrono::{Duration, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn scorer() -> PriorityScorer {
        PriorityScorer::new(Strategy::SmartBalance).with_today(today())
    }

    #[test]
    fn test_empty_batch() {
        let report = scorer().analyze(&[]).unwrap();
        assert!(report.tasks.is_empty());
        assert_eq!(report.total_tasks, 0);
    }

    #[test]
    fn test_sorted_descending() {
        let tasks = vec![
            Task::new(1).with_due_date(today() + Duration::days(60)).with_hours(20),
            Task::new(2).with_due_date(today() - Duration::days(1)).with_importance(9),
            Task::new(3).with_due_date(today() + Duration::days(5)),
        ];
        let report = scorer().analyze(&tasks).unwrap();
        let order: Vec<_> = report.tasks.iter().map(|t| t.task.id.clone().unwrap()).collect();
        assert_eq!(order, vec![TaskId::Num(2), TaskId::Num(3), TaskId::Num(1)]);
        for w in report.tasks.windows(2) {
            assert!(w[0].priority_score >= w[1].priority_score);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tasks: Vec<Task> = ["c", "a", "b"].iter().map(|id| Task::new(*id)).collect();
        let report = scorer().analyze(&tasks).unwrap();
        let order: Vec<String> = report
            .tasks
            .iter()
            .map(|t| t.task.id.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_cycle_blocks_scoring() {
        let tasks = vec![
            Task::new(1).with_dependencies([2]),
            Task::new(2).with_dependencies([1]),
        ];
        assert!(matches!(
            scorer().analyze(&tasks),
            Err(ScoringError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn test_unknown_strategy_by_name() {
        assert!(matches!(
            analyze(&[], "most_fun"),
            Err(ScoringError::UnknownStrategy { .. })
        ));
    }

    #[test]
    fn test_suggest_truncates() {
        let tasks: Vec<Task> = (1i64..=5).map(|i| Task::new(i).with_importance(i as i32)).collect();
        let top = scorer().suggest(&tasks, 3).unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].task.id, Some(TaskId::Num(5)));
    }

    #[test]
    fn test_malformed_fields_do_not_sink_the_batch() {
        let json = r#"[
            {"id": 1, "due_date": 20260310, "dependencies": null},
            {"id": 1.5, "importance": 9},
            {"id": true, "dependencies": [1]},
            {"id": 2, "dependencies": [null, 1, {}]},
            {"id": 3, "due_date": "2026-03-10"}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        let report = scorer().analyze(&tasks).unwrap();
        assert_eq!(report.total_tasks, 5);

        // Task 1 still blocks the others, so it outranks a lone copy of itself.
        let first = report.tasks.iter().find(|t| t.task.id == Some(TaskId::Num(1))).unwrap();
        let alone = scorer().score(&Task::new(1), &[]);
        assert!(first.priority_score > alone);
        assert_eq!(report.tasks[0].task.id, Some(TaskId::Num(3)));
    }

    #[test]
    fn test_report_top_clamps() {
        let report = scorer().analyze(&[Task::new(1)]).unwrap();
        assert_eq!(report.top(3).len(), 1);
    }
}
