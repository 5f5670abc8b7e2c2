use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::concept::ConceptDomain;
use crate::grid::GridDefinition;
use crate::ids::{ConceptCode, QuestionId, QuestionnaireId};

/// Closed set of answerable question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Boolean,
    SingleChoice,
    MultiChoice,
    Grid,
    Loop,
    FreeText,
    Numeric,
    Datetime,
}

impl QuestionType {
    /// Returns true for types whose accepted answers come from a controlled
    /// value set and therefore participate in response-concept mapping.
    pub fn is_controlled(&self) -> bool {
        matches!(
            self,
            QuestionType::Boolean
                | QuestionType::SingleChoice
                | QuestionType::MultiChoice
                | QuestionType::Grid
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Boolean => "boolean",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultiChoice => "multi_choice",
            QuestionType::Grid => "grid",
            QuestionType::Loop => "loop",
            QuestionType::FreeText => "free_text",
            QuestionType::Numeric => "numeric",
            QuestionType::Datetime => "datetime",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" => Ok(QuestionType::Boolean),
            "single_choice" => Ok(QuestionType::SingleChoice),
            "multi_choice" => Ok(QuestionType::MultiChoice),
            "grid" => Ok(QuestionType::Grid),
            "loop" => Ok(QuestionType::Loop),
            "free_text" => Ok(QuestionType::FreeText),
            "numeric" => Ok(QuestionType::Numeric),
            "datetime" => Ok(QuestionType::Datetime),
            _ => Err(format!("Unknown question type: {}", s)),
        }
    }
}

/// Questionnaire lifecycle status. Published questionnaires are immutable
/// except for metadata; any structural edit produces a new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireStatus {
    Draft,
    Published,
    Archived,
}

/// Inclusive numeric bounds, also used for grid column rating scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
}

impl NumericBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Inclusive date bounds for datetime questions. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: Option<chrono::NaiveDate>,
    pub max: Option<chrono::NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        if let Some(min) = self.min
            && date < min
        {
            return false;
        }
        if let Some(max) = self.max
            && date > max
        {
            return false;
        }
        true
    }
}

/// One selectable option of a single- or multi-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub value: String,
    pub display_order: u32,
    #[serde(default)]
    pub concept: Option<ConceptCode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
    /// Unique within the questionnaire; drives sequential navigation.
    pub display_order: u32,
    #[serde(default)]
    pub concept: Option<ConceptCode>,
    /// Clinical domain the question belongs to, if declared by the author.
    #[serde(default)]
    pub domain: Option<ConceptDomain>,
    /// When set, `Schema::load` demands a question-kind concept mapping and
    /// `validate` demands response/pair mappings for controlled answers.
    #[serde(default)]
    pub requires_mapping: bool,
    /// Structural parent for nested questions (e.g. grid-row questions).
    #[serde(default)]
    pub parent: Option<QuestionId>,
    /// Set iff this question repeats inside a loop.
    #[serde(default)]
    pub loop_parent: Option<QuestionId>,
    /// Position among the loop's children.
    #[serde(default)]
    pub loop_position: Option<u32>,
    /// Fixed iteration count for loop questions. A loop without one repeats
    /// until the caller signals the session that the loop is finished.
    #[serde(default)]
    pub loop_count: Option<u32>,
    #[serde(default)]
    pub numeric_bounds: Option<NumericBounds>,
    /// chrono format string for datetime questions (default `%Y-%m-%d`).
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub date_bounds: Option<DateBounds>,
    /// Element delimiter for multi-choice raw values (default `;`).
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub grid: Option<GridDefinition>,
}

impl Question {
    pub fn is_loop_child(&self) -> bool {
        self.loop_parent.is_some()
    }

    /// Ordered options, by declared display order.
    pub fn ordered_options(&self) -> Vec<&AnswerOption> {
        let mut ordered: Vec<&AnswerOption> = self.options.iter().collect();
        ordered.sort_by_key(|option| option.display_order);
        ordered
    }

    pub fn option_by_value(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn multi_choice_delimiter(&self) -> char {
        self.delimiter.unwrap_or(';')
    }
}

/// A fully resolved questionnaire definition as handed over by the
/// authoring/storage layer. This is the input document of `Schema::load`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Questionnaire {
    pub id: QuestionnaireId,
    pub title: String,
    pub version: String,
    pub status: QuestionnaireStatus,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub skip_rules: Vec<crate::skip::SkipLogicRule>,
    #[serde(default)]
    pub mappings: Vec<crate::concept::ConceptMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_round_trips_through_str() {
        for ty in [
            QuestionType::Boolean,
            QuestionType::SingleChoice,
            QuestionType::MultiChoice,
            QuestionType::Grid,
            QuestionType::Loop,
            QuestionType::FreeText,
            QuestionType::Numeric,
            QuestionType::Datetime,
        ] {
            assert_eq!(ty.as_str().parse::<QuestionType>().unwrap(), ty);
        }
        assert!("matrix".parse::<QuestionType>().is_err());
    }

    #[test]
    fn controlled_types() {
        assert!(QuestionType::Boolean.is_controlled());
        assert!(QuestionType::Grid.is_controlled());
        assert!(!QuestionType::FreeText.is_controlled());
        assert!(!QuestionType::Numeric.is_controlled());
    }

    #[test]
    fn date_bounds_open_sides() {
        let bounds = DateBounds {
            min: Some(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            max: None,
        };
        assert!(bounds.contains(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(!bounds.contains(chrono::NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()));
    }
}
