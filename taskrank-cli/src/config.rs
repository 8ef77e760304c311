use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use taskrank_core::Strategy;

use crate::state::ensure_taskrank_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Used when neither the command line nor the input file names a strategy.
    pub default_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Rows printed by `analyze` (0 = all).
    pub limit: usize,
    /// Rows printed by `suggest`.
    pub suggest_count: usize,
    /// Emit the JSON report instead of a table.
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::default().name().to_string(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            limit: 0,
            suggest_count: 3,
            json: false,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Configured default strategy. A bad name here is a user error, not a
    /// silent fallback.
    pub fn default_strategy(&self) -> Result<Strategy> {
        Strategy::parse(&self.scoring.default_strategy)
            .context("invalid [scoring] default_strategy in config.toml")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskrank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.default_strategy().unwrap(), Strategy::SmartBalance);
        assert_eq!(cfg.output.suggest_count, 3);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let cfg = parse_config(
            r#"
[scoring]
default_strategy = "deadline_driven"
"#,
        )
        .unwrap();
        assert_eq!(cfg.default_strategy().unwrap(), Strategy::DeadlineDriven);
        assert_eq!(cfg.output, OutputSection::default());
    }

    #[test]
    fn test_bad_strategy_is_reported() {
        let cfg = parse_config("[scoring]\ndefault_strategy = \"vibes\"\n").unwrap();
        assert!(cfg.default_strategy().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(parse_config(&s).unwrap(), cfg);
    }
}
