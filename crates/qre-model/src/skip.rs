use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::QuestionId;

/// Comparison applied by a skip-logic rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipCondition {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
}

impl SkipCondition {
    /// Evaluate the condition against an accepted raw value.
    ///
    /// When both sides parse as decimal numbers the comparison is numeric
    /// (so "3.0" equals "3"); otherwise it falls back to lexicographic
    /// comparison of the trimmed strings.
    pub fn matches(&self, value: &str, comparison: &str) -> bool {
        let value = value.trim();
        let comparison = comparison.trim();
        if let (Ok(left), Ok(right)) = (value.parse::<f64>(), comparison.parse::<f64>()) {
            return match self {
                SkipCondition::Equals => left == right,
                SkipCondition::NotEquals => left != right,
                SkipCondition::GreaterThan => left > right,
                SkipCondition::LessThan => left < right,
            };
        }
        match self {
            SkipCondition::Equals => value == comparison,
            SkipCondition::NotEquals => value != comparison,
            SkipCondition::GreaterThan => value > comparison,
            SkipCondition::LessThan => value < comparison,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkipCondition::Equals => "equals",
            SkipCondition::NotEquals => "not_equals",
            SkipCondition::GreaterThan => "greater_than",
            SkipCondition::LessThan => "less_than",
        }
    }
}

impl fmt::Display for SkipCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SkipCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equals" => Ok(SkipCondition::Equals),
            "not_equals" => Ok(SkipCondition::NotEquals),
            "greater_than" => Ok(SkipCondition::GreaterThan),
            "less_than" => Ok(SkipCondition::LessThan),
            _ => Err(format!("Unknown skip condition: {}", s)),
        }
    }
}

/// Conditional redirect from one question to another.
///
/// Rules are evaluated in declaration order; the first satisfied rule wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipLogicRule {
    pub source: QuestionId,
    pub target: QuestionId,
    pub condition: SkipCondition,
    pub comparison: String,
}
