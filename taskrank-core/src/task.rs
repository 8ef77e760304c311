//! Task records as handed to the engine by callers.
//!
//! Records are lenient: every field may be missing or carry the wrong JSON
//! type without failing the batch. Ids and dependency entries that cannot be
//! used as ids decode to nothing; dates and numeric fields keep their raw
//! value and are normalized in `crate::factors`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Date format accepted for `due_date`.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Rating assumed when a task carries no `importance` field.
pub const DEFAULT_IMPORTANCE: f64 = 5.0;

/// Hours assumed when a task carries no `estimated_hours` field.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 5.0;

/// Largest float that still holds every integer exactly (2^53).
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Opaque task identifier. Integer and string ids never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Num(i64),
    Name(String),
}

impl TaskId {
    /// Read an id out of arbitrary JSON. Integers (including integral floats
    /// such as `3.0`) and strings qualify; anything else yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(TaskId::Name(s.clone())),
            Value::Number(n) => n.as_i64().map(TaskId::Num).or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT)
                    .map(|f| TaskId::Num(f as i64))
            }),
            _ => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Num(n) => write!(f, "{n}"),
            TaskId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Num(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Name(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Name(s)
    }
}

/// A numeric field as it arrived on the wire: either a number or something
/// that should have been one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Other(serde_json::Value),
}

impl FieldValue {
    /// The numeric value, if this field holds a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Other(serde_json::Value::String(s.to_string()))
    }
}

/// A `due_date` as it arrived: normally text, but any other JSON value is kept
/// so it can degrade to neutral urgency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    Other(Value),
}

impl RawDate {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawDate::Text(s) => Some(s),
            RawDate::Other(_) => None,
        }
    }
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::Text(s) => f.write_str(s),
            RawDate::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for RawDate {
    fn from(s: &str) -> Self {
        RawDate::Text(s.to_string())
    }
}

impl From<String> for RawDate {
    fn from(s: String) -> Self {
        RawDate::Text(s)
    }
}

impl From<Value> for RawDate {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => RawDate::Text(s),
            other => RawDate::Other(other),
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TaskId>, D::Error> {
    Ok(TaskId::from_value(&Value::deserialize(d)?))
}

fn lenient_title<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// `null` or a non-list means no dependencies; unusable entries are dropped.
fn lenient_dependencies<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<TaskId>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items.iter().filter_map(TaskId::from_value).collect(),
        _ => Vec::new(),
    })
}

/// Core task record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Absent when the record had no usable id.
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<TaskId>,

    #[serde(
        default,
        deserialize_with = "lenient_title",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// `YYYY-MM-DD`; kept raw so a bad value degrades to neutral urgency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<RawDate>,

    /// 1-10 rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<FieldValue>,

    /// Hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<FieldValue>,

    /// Ids of tasks that must complete before this one can start.
    #[serde(default, deserialize_with = "lenient_dependencies")]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// A task with no id. It takes no part in dependency scoring or cycle checks.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(RawDate::Text(date.format(DUE_DATE_FORMAT).to_string()));
        self
    }

    pub fn with_raw_due_date(mut self, raw: impl Into<RawDate>) -> Self {
        self.due_date = Some(raw.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<FieldValue>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    pub fn with_hours(mut self, hours: impl Into<FieldValue>) -> Self {
        self.estimated_hours = Some(hours.into());
        self
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Parsed due date. `None` when absent or malformed.
    pub fn due(&self) -> Option<NaiveDate> {
        let raw = self.due_date.as_ref()?.as_str()?;
        NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).ok()
    }

    /// Whole days from `today` until the due date (negative when overdue).
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due().map(|d| (d - today).num_days())
    }

    /// Importance after defaulting, or `None` when the field is not numeric.
    pub fn importance_value(&self) -> Option<f64> {
        match &self.importance {
            None => Some(DEFAULT_IMPORTANCE),
            Some(v) => v.as_f64(),
        }
    }

    /// Estimated hours after defaulting, or `None` when the field is not numeric.
    pub fn hours_value(&self) -> Option<f64> {
        match &self.estimated_hours {
            None => Some(DEFAULT_ESTIMATED_HOURS),
            Some(v) => v.as_f64(),
        }
    }

    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.iter().any(|d| d == id)
    }
}
