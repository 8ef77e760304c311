//! Weighting strategies.
//!
//! A strategy is a row in a static table: which sub-scores it reads and how
//! much each one weighs. Adding a strategy means adding a variant and a row.

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubScore {
    Urgency,
    Importance,
    Effort,
    Dependency,
}

impl SubScore {
    pub fn label(&self) -> &'static str {
        match self {
            SubScore::Urgency => "urgency",
            SubScore::Importance => "importance",
            SubScore::Effort => "effort",
            SubScore::Dependency => "dependency",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    SmartBalance,
    FastestWins,
    HighImpact,
    DeadlineDriven,
}

struct Profile {
    strategy: Strategy,
    name: &'static str,
    description: &'static str,
    weights: &'static [(SubScore, f64)],
}

static PROFILES: [Profile; 4] = [
    Profile {
        strategy: Strategy::SmartBalance,
        name: "smart_balance",
        description: "Balances deadline, importance, effort and blocked work",
        weights: &[
            (SubScore::Urgency, 0.35),
            (SubScore::Importance, 0.30),
            (SubScore::Effort, 0.20),
            (SubScore::Dependency, 0.15),
        ],
    },
    Profile {
        strategy: Strategy::FastestWins,
        name: "fastest_wins",
        description: "Quick, low-effort tasks first",
        weights: &[(SubScore::Effort, 0.70), (SubScore::Importance, 0.30)],
    },
    Profile {
        strategy: Strategy::HighImpact,
        name: "high_impact",
        description: "Importance above all, deadline as a tiebreaker",
        weights: &[(SubScore::Importance, 0.75), (SubScore::Urgency, 0.25)],
    },
    Profile {
        strategy: Strategy::DeadlineDriven,
        name: "deadline_driven",
        description: "Nearest due date first",
        weights: &[(SubScore::Urgency, 0.80), (SubScore::Importance, 0.20)],
    },
];

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    fn profile(self) -> &'static Profile {
        match self {
            Strategy::SmartBalance => &PROFILES[0],
            Strategy::FastestWins => &PROFILES[1],
            Strategy::HighImpact => &PROFILES[2],
            Strategy::DeadlineDriven => &PROFILES[3],
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn description(self) -> &'static str {
        self.profile().description
    }

    /// Sub-scores this strategy reads, with their weights. Weights sum to 1.
    pub fn weights(self) -> &'static [(SubScore, f64)] {
        self.profile().weights
    }

    pub fn uses(self, sub: SubScore) -> bool {
        self.weights().iter().any(|(s, _)| *s == sub)
    }

    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
    }
}

impl FromStr for Strategy {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        PROFILES
            .iter()
            .find(|p| p.name == wanted)
            .map(|p| p.strategy)
            .ok_or_else(|| ScoringError::UnknownStrategy { name: s.to_string() })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::parse(s.name()).unwrap(), s);
        }
        assert_eq!("high_impact".parse::<Strategy>().unwrap(), Strategy::HighImpact);
    }

    #[test]
    fn test_unknown_strategy_is_an_error() {
        let err = Strategy::parse("random_pick").unwrap_err();
        assert_eq!(
            err,
            ScoringError::UnknownStrategy {
                name: "random_pick".to_string()
            }
        );
    }

    #[test]
    fn test_weights_sum_to_one() {
        for s in Strategy::ALL {
            let total: f64 = s.weights().iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9, "{s}: {total}");
        }
    }

    #[test]
    fn test_only_smart_balance_reads_dependencies() {
        for s in Strategy::ALL {
            assert_eq!(s.uses(SubScore::Dependency), s == Strategy::SmartBalance);
        }
    }

    #[test]
    fn test_table_rows_match_variants() {
        for s in Strategy::ALL {
            assert_eq!(s.profile().strategy, s);
        }
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Strategy::DeadlineDriven).unwrap();
        assert_eq!(json, "\"deadline_driven\"");
        let back: Strategy = serde_json::from_str("\"fastest_wins\"").unwrap();
        assert_eq!(back, Strategy::FastestWins);
    }
}
