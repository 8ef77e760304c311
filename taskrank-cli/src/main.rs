use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use taskrank_core::{
    detect_circular_dependencies, AnalysisReport, PriorityScorer, ScoredTask, ScoringError,
    Strategy, TaskId,
};

mod config;
mod input;
mod logging;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")"),
    about = "Rank tasks by urgency, importance, effort and blocked work"
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every task in a batch
    Analyze {
        /// JSON batch file (`-` for stdin)
        #[arg(long, short)]
        input: PathBuf,

        /// smart_balance | fastest_wins | high_impact | deadline_driven
        #[arg(long, short)]
        strategy: Option<String>,

        /// Only print the first N tasks
        #[arg(long)]
        limit: Option<usize>,

        /// Print the JSON report instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the few tasks to work on next
    Suggest {
        #[arg(long, short)]
        input: PathBuf,

        #[arg(long, short)]
        strategy: Option<String>,

        /// How many tasks to suggest (default from config: 3)
        #[arg(long, short)]
        count: Option<usize>,
    },

    /// Only check the batch for circular dependencies
    Check {
        #[arg(long, short)]
        input: PathBuf,
    },

    /// List the available strategies and their weights
    Strategies,

    /// Manage ~/.taskrank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init_logger(&cfg.logging.level, cli.verbose);

    match cli.command {
        Command::Analyze {
            input,
            strategy,
            limit,
            json,
        } => {
            let batch = input::read_batch(&input)?;
            let strategy = resolve_strategy(strategy, batch.strategy.as_deref(), &cfg)?;
            tracing::info!(tasks = batch.tasks.len(), %strategy, "analyzing {}", input.display());

            let report = match PriorityScorer::new(strategy).analyze(&batch.tasks) {
                Ok(r) => r,
                Err(e) => return report_scoring_error(e),
            };

            let limit = limit.unwrap_or(cfg.output.limit);
            if json || cfg.output.json {
                print_json(&report, limit)?;
            } else {
                print_report(&report, limit);
            }
        }

        Command::Suggest {
            input,
            strategy,
            count,
        } => {
            let batch = input::read_batch(&input)?;
            let strategy = resolve_strategy(strategy, batch.strategy.as_deref(), &cfg)?;
            let count = count.unwrap_or(cfg.output.suggest_count);

            let top = match PriorityScorer::new(strategy).suggest(&batch.tasks, count) {
                Ok(t) => t,
                Err(e) => return report_scoring_error(e),
            };

            if top.is_empty() {
                println!("No tasks to suggest.");
            } else {
                println!("Work on these next ({strategy}):\n");
                for (i, t) in top.iter().enumerate() {
                    println!("{}. {}", i + 1, task_label(t));
                    println!("   score {:.2} | {}", t.priority_score, t.explanation);
                }
            }
        }

        Command::Check { input } => {
            let batch = input::read_batch(&input)?;
            let cycles = detect_circular_dependencies(&batch.tasks);
            if !cycles.is_empty() {
                return report_scoring_error(ScoringError::DependencyCycle { cycles });
            }
            println!("No circular dependencies in {} tasks.", batch.tasks.len());
        }

        Command::Strategies => {
            for s in Strategy::ALL {
                let weights: Vec<String> = s
                    .weights()
                    .iter()
                    .map(|(sub, w)| format!("{} {:.0}%", sub.label(), w * 100.0))
                    .collect();
                println!("{:<16} {}", s.name(), s.description());
                println!("{:<16} {}", "", weights.join(", "));
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// Command line beats the input file, which beats the config default.
fn resolve_strategy(cli: Option<String>, file: Option<&str>, cfg: &Config) -> Result<Strategy> {
    match cli.as_deref().or(file) {
        Some(name) => Ok(Strategy::parse(name)?),
        None => cfg.default_strategy(),
    }
}

fn report_scoring_error(err: ScoringError) -> Result<ExitCode> {
    if let ScoringError::DependencyCycle { cycles } = &err {
        tracing::warn!(count = cycles.len(), "refusing to score a batch with cycles");
        eprintln!("Circular dependencies detected:");
        for c in cycles {
            eprintln!("  {}", format_cycle(c));
        }
        return Ok(ExitCode::FAILURE);
    }
    Err(err.into())
}

fn format_cycle(cycle: &[TaskId]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn task_label(t: &ScoredTask) -> String {
    match (&t.task.id, &t.task.title) {
        (Some(id), Some(title)) => format!("[{id}] {title}"),
        (Some(id), None) => format!("[{id}]"),
        (None, Some(title)) => title.clone(),
        (None, None) => "(untitled)".to_string(),
    }
}

fn shown(report: &AnalysisReport, limit: usize) -> &[ScoredTask] {
    if limit == 0 {
        &report.tasks
    } else {
        report.top(limit)
    }
}

fn print_report(report: &AnalysisReport, limit: usize) {
    println!(
        "# {} tasks ranked with {}\n",
        report.total_tasks, report.strategy_used
    );
    for t in shown(report, limit) {
        println!(
            "{:>6.2}  {:<6}  {}",
            t.priority_score,
            t.priority_level.label(),
            task_label(t)
        );
        println!("{:>16}{}", "", t.explanation);
    }
}

fn print_json(report: &AnalysisReport, limit: usize) -> Result<()> {
    let trimmed = AnalysisReport {
        tasks: shown(report, limit).to_vec(),
        strategy_used: report.strategy_used,
        total_tasks: report.total_tasks,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&trimmed).context("serialize report")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_precedence() {
        let cfg = Config::default();
        assert_eq!(
            resolve_strategy(Some("high_impact".into()), Some("fastest_wins"), &cfg).unwrap(),
            Strategy::HighImpact
        );
        assert_eq!(
            resolve_strategy(None, Some("fastest_wins"), &cfg).unwrap(),
            Strategy::FastestWins
        );
        assert_eq!(resolve_strategy(None, None, &cfg).unwrap(), Strategy::SmartBalance);
    }

    #[test]
    fn test_unknown_strategy_fails() {
        let cfg = Config::default();
        assert!(resolve_strategy(Some("shortest_first".into()), None, &cfg).is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "taskrank", "analyze", "--input", "tasks.json", "--strategy", "fastest_wins", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze { strategy, json, .. } => {
                assert_eq!(strategy.as_deref(), Some("fastest_wins"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_long_version_carries_build_sha() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let long = cmd.get_long_version().unwrap_or_default();
        assert!(long.starts_with(env!("CARGO_PKG_VERSION")), "{long}");
        assert!(long.ends_with(concat!("(", env!("TASKRANK_BUILD_SHA"), ")")), "{long}");
        assert!(!env!("TASKRANK_BUILD_SHA").is_empty());
    }

    #[test]
    fn test_format_cycle() {
        let c = vec![TaskId::Num(1), TaskId::from("b"), TaskId::Num(1)];
        assert_eq!(format_cycle(&c), "1 -> b -> 1");
    }
}
