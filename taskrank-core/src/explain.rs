//! Human-readable reasons behind a score.
//!
//! Reads the task fields directly rather than the computed sub-scores, so the
//! text stays stable when strategy weights change.

use crate::task::Task;
use chrono::NaiveDate;

pub const SEPARATOR: &str = " • ";
pub const FALLBACK: &str = "Balanced priority";

const SOON_DAYS: i64 = 3;
const HIGH_IMPORTANCE: f64 = 8.0;
const QUICK_WIN_HOURS: f64 = 2.0;
const LARGE_TASK_HOURS: f64 = 10.0;

pub fn reasons(task: &Task, today: NaiveDate) -> Vec<String> {
    let mut out = Vec::new();

    match task.days_until_due(today) {
        Some(d) if d < 0 => out.push(format!("Overdue by {} days", -d)),
        Some(0) => out.push("Due today".to_string()),
        Some(d) if d <= SOON_DAYS => out.push(format!("Due in {d} days")),
        _ => {}
    }

    if let Some(importance) = task.importance_value() {
        if importance.clamp(1.0, 10.0) >= HIGH_IMPORTANCE {
            out.push("High importance".to_string());
        }
    }

    match task.hours_value() {
        Some(h) if h > 0.0 && h <= QUICK_WIN_HOURS => out.push("Quick win".to_string()),
        Some(h) if h >= LARGE_TASK_HOURS => out.push("Large task".to_string()),
        _ => {}
    }

    out
}

/// Join the matching reasons, or fall back to a neutral phrase.
pub fn explain(task: &Task, today: NaiveDate) -> String {
    let reasons = reasons(task, today);
    if reasons.is_empty() {
        FALLBACK.to_string()
    } else {
        reasons.join(SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_overdue_important_quick() {
        let t = Task::new(1)
            .with_due_date(today() - Duration::days(4))
            .with_importance(9)
            .with_hours(1.5);
        assert_eq!(
            explain(&t, today()),
            "Overdue by 4 days • High importance • Quick win"
        );
    }

    #[test]
    fn test_due_windows() {
        let today_task = Task::new(1).with_due_date(today()).with_hours(4);
        assert_eq!(explain(&today_task, today()), "Due today");

        let soon = Task::new(1).with_due_date(today() + Duration::days(3)).with_hours(4);
        assert_eq!(explain(&soon, today()), "Due in 3 days");

        let later = Task::new(1).with_due_date(today() + Duration::days(4)).with_hours(4);
        assert_eq!(explain(&later, today()), FALLBACK);
    }

    #[test]
    fn test_large_task() {
        let t = Task::new(1).with_hours(12).with_importance(3);
        assert_eq!(explain(&t, today()), "Large task");
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let t = Task::new(1)
            .with_raw_due_date("2026-13-45")
            .with_importance("urgent")
            .with_hours("a while");
        assert_eq!(explain(&t, today()), FALLBACK);
    }

    #[test]
    fn test_out_of_range_importance_is_clamped() {
        let t = Task::new(1).with_importance(42).with_hours(5);
        assert_eq!(reasons(&t, today()), vec!["High importance".to_string()]);
    }
}
