//! Sub-score calculators.
//!
//! Each calculator maps one aspect of a task onto 0-100 and never fails: bad
//! field values fall back to the neutral score of 50.

use crate::task::Task;
use chrono::NaiveDate;
use std::fmt;

pub const NEUTRAL_SCORE: f64 = 50.0;

const IMPORTANCE_MIN: f64 = 1.0;
const IMPORTANCE_MAX: f64 = 10.0;
const IMPORTANCE_CURVE: f64 = 1.2;
const IMPORTANCE_SCALE: f64 = 7.5;

/// Score for a task that blocks nothing.
pub const DEPENDENCY_BASELINE: f64 = 40.0;

/// Recoverable problems with a task's fields. Logged, never returned as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldParseWarning {
    UnparseableDueDate(String),
    NonNumericImportance,
    ImportanceOutOfRange(f64),
    InvalidEstimatedHours,
}

impl fmt::Display for FieldParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldParseWarning::UnparseableDueDate(raw) => {
                write!(f, "unparseable due_date '{raw}', using neutral urgency")
            }
            FieldParseWarning::NonNumericImportance => {
                f.write_str("non-numeric importance, using neutral score")
            }
            FieldParseWarning::ImportanceOutOfRange(v) => {
                write!(f, "importance {v} outside 1-10, clamped")
            }
            FieldParseWarning::InvalidEstimatedHours => {
                f.write_str("estimated_hours not a positive number, using neutral score")
            }
        }
    }
}

/// Collect every field problem the calculators will silently paper over.
pub fn field_warnings(task: &Task) -> Vec<FieldParseWarning> {
    let mut out = Vec::new();

    if let Some(raw) = &task.due_date {
        if task.due().is_none() {
            out.push(FieldParseWarning::UnparseableDueDate(raw.to_string()));
        }
    }

    match task.importance_value() {
        None => out.push(FieldParseWarning::NonNumericImportance),
        Some(v) if !(IMPORTANCE_MIN..=IMPORTANCE_MAX).contains(&v) => {
            out.push(FieldParseWarning::ImportanceOutOfRange(v))
        }
        Some(_) => {}
    }

    match task.hours_value() {
        Some(h) if h > 0.0 => {}
        _ => out.push(FieldParseWarning::InvalidEstimatedHours),
    }

    out
}

/// Urgency before clamping. Overdue tasks exceed 100 and keep rising.
pub fn raw_urgency(days_until_due: i64) -> f64 {
    let d = days_until_due as f64;
    match days_until_due {
        n if n < 0 => 100.0 + 5.0 * d.abs(),
        0 => 95.0,
        1..=7 => 90.0 - 5.0 * d,
        8..=14 => 60.0 - 3.0 * (d - 7.0),
        15..=30 => 40.0 - 1.5 * (d - 14.0),
        _ => (40.0 - 0.5 * (d - 30.0)).max(10.0),
    }
}

pub fn urgency_score(task: &Task, today: NaiveDate) -> f64 {
    match task.days_until_due(today) {
        Some(days) => raw_urgency(days).min(100.0),
        None => NEUTRAL_SCORE,
    }
}

/// Importance on the convex curve `7.5 * r^1.2`, rescaled by its value at
/// rating 10 so the result spans 6.31 (rating 1) to 100 (rating 10) rather
/// than 7.5 to 118.9.
pub fn importance_score(task: &Task) -> f64 {
    let Some(rating) = task.importance_value() else {
        return NEUTRAL_SCORE;
    };
    let rating = rating.clamp(IMPORTANCE_MIN, IMPORTANCE_MAX);
    let ceiling = IMPORTANCE_MAX.powf(IMPORTANCE_CURVE) * IMPORTANCE_SCALE;
    rating.powf(IMPORTANCE_CURVE) * IMPORTANCE_SCALE / ceiling * 100.0
}

/// Smaller tasks score higher; long ones floor at 30 so they stay visible.
pub fn effort_score(task: &Task) -> f64 {
    let hours = match task.hours_value() {
        Some(h) if h > 0.0 => h,
        _ => return NEUTRAL_SCORE,
    };

    if hours <= 2.0 {
        80.0
    } else if hours <= 8.0 {
        70.0 - 3.0 * (hours - 2.0)
    } else {
        (50.0 - 2.0 * (hours - 8.0)).max(30.0)
    }
}

/// Number of other tasks in `batch` that list `task` as a dependency.
pub fn blocked_count(task: &Task, batch: &[Task]) -> usize {
    let Some(id) = &task.id else { return 0 };
    batch
        .iter()
        .filter(|other| other.id.as_ref() != Some(id) && other.depends_on(id))
        .count()
}

pub fn dependency_score_for_count(blocked: usize) -> f64 {
    match blocked {
        0 => DEPENDENCY_BASELINE,
        1 => 60.0,
        2 => 75.0,
        n => (75.0 + 10.0 * (n - 2) as f64).min(100.0),
    }
}

pub fn dependency_score(task: &Task, batch: &[Task]) -> f64 {
    dependency_score_for_count(blocked_count(task, batch))
}
