//! Reading task batches from disk or stdin.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use taskrank_core::Task;

/// Either a bare array of tasks or `{ "tasks": [...], "strategy": "..." }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Bare(Vec<Task>),
    Wrapped {
        tasks: Vec<Task>,
        #[serde(default)]
        strategy: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub tasks: Vec<Task>,
    /// Strategy named inside the file, if any.
    pub strategy: Option<String>,
}

pub fn parse_batch(raw: &str) -> Result<Batch> {
    let file: BatchFile = serde_json::from_str(raw)
        .context("expected a JSON array of tasks or an object with a \"tasks\" array")?;
    Ok(match file {
        BatchFile::Bare(tasks) => Batch { tasks, strategy: None },
        BatchFile::Wrapped { tasks, strategy } => Batch { tasks, strategy },
    })
}

/// Load a batch from `path`, or from stdin when `path` is `-`.
pub fn read_batch(path: &Path) -> Result<Batch> {
    let raw = if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read tasks from stdin")?;
        s
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    parse_batch(&raw).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::TaskId;

    #[test]
    fn test_bare_array() {
        let b = parse_batch(r#"[{"id": 1}, {"id": "two", "dependencies": [1]}]"#).unwrap();
        assert_eq!(b.tasks.len(), 2);
        assert_eq!(b.strategy, None);
        assert_eq!(b.tasks[1].dependencies, vec![TaskId::Num(1)]);
    }

    #[test]
    fn test_wrapped_object() {
        let b = parse_batch(r#"{"strategy": "high_impact", "tasks": [{"title": "x"}]}"#).unwrap();
        assert_eq!(b.strategy.as_deref(), Some("high_impact"));
        assert!(b.tasks[0].id.is_none());
    }

    #[test]
    fn test_badly_typed_fields_keep_the_batch() {
        let b = parse_batch(
            r#"{"tasks": [
                {"id": 1, "due_date": 20260310},
                {"id": 1.5, "dependencies": null},
                {"id": 2, "dependencies": [null, 1]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(b.tasks.len(), 3);
        assert!(b.tasks[0].due().is_none());
        assert!(b.tasks[1].id.is_none());
        assert_eq!(b.tasks[2].dependencies, vec![TaskId::Num(1)]);
    }

    #[test]
    fn test_rejects_non_batch_json() {
        assert!(parse_batch(r#"{"items": []}"#).is_err());
        assert!(parse_batch("not json").is_err());
    }
}
