//! Priority scorer: combines sub-scores according to a strategy.

use crate::error::Result;
use crate::explain::explain;
use crate::factors::{dependency_score, effort_score, importance_score, urgency_score};
use crate::strategy::{Strategy, SubScore};
use crate::task::Task;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Display band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            PriorityLevel::High
        } else if score >= 50.0 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
        }
    }
}

/// Component values for one task. Sub-scores the strategy ignores stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub urgency: Option<f64>,
    pub importance: Option<f64>,
    pub effort: Option<f64>,
    pub dependency: Option<f64>,
}

impl SubScores {
    pub fn get(&self, sub: SubScore) -> Option<f64> {
        match sub {
            SubScore::Urgency => self.urgency,
            SubScore::Importance => self.importance,
            SubScore::Effort => self.effort,
            SubScore::Dependency => self.dependency,
        }
    }
}

/// A task with its score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub priority_score: f64,
    pub explanation: String,
    pub priority_level: PriorityLevel,
}

/// Immutable once built; safe to share between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityScorer {
    strategy: Strategy,
    today: Option<NaiveDate>,
}

impl PriorityScorer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            today: None,
        }
    }

    /// Build from a strategy name, rejecting anything unrecognized.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(Strategy::parse(name)?))
    }

    /// Pin the reference date used for urgency. Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Compute the sub-scores the strategy needs. `batch` is only consulted
    /// for dependency pressure.
    pub fn sub_scores(&self, task: &Task, batch: &[Task]) -> SubScores {
        self.sub_scores_on(task, batch, self.today())
    }

    fn sub_scores_on(&self, task: &Task, batch: &[Task], today: NaiveDate) -> SubScores {
        let mut out = SubScores::default();
        for (sub, _) in self.strategy.weights() {
            match sub {
                SubScore::Urgency => out.urgency = Some(urgency_score(task, today)),
                SubScore::Importance => out.importance = Some(importance_score(task)),
                SubScore::Effort => out.effort = Some(effort_score(task)),
                SubScore::Dependency => out.dependency = Some(dependency_score(task, batch)),
            }
        }
        out
    }

    /// Final 0-100 score, rounded to two decimals.
    pub fn score(&self, task: &Task, batch: &[Task]) -> f64 {
        self.score_on(task, batch, self.today())
    }

    fn score_on(&self, task: &Task, batch: &[Task], today: NaiveDate) -> f64 {
        let subs = self.sub_scores_on(task, batch, today);
        let total: f64 = self
            .strategy
            .weights()
            .iter()
            .map(|(sub, w)| subs.get(*sub).unwrap_or(0.0) * w)
            .sum();
        round2(total.clamp(0.0, 100.0))
    }

    pub fn score_task(&self, task: &Task, batch: &[Task]) -> ScoredTask {
        self.score_task_on(task, batch, self.today())
    }

    pub(crate) fn score_task_on(&self, task: &Task, batch: &[Task], today: NaiveDate) -> ScoredTask {
        let priority_score = self.score_on(task, batch, today);
        ScoredTask {
            task: task.clone(),
            priority_score,
            explanation: explain(task, today),
            priority_level: PriorityLevel::from_score(priority_score),
        }
    }
}

/// Two decimals, rounding the exact stored value with ties to even.
fn round2(x: f64) -> f64 {
    let scaled = x * 100.0;
    // What the multiply lost; decides ties that exist only after rounding.
    let residual = x.mul_add(100.0, -scaled);
    let cents = if (scaled - scaled.trunc()).abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };
    cents / 100.0
}
