use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::ids::{ConceptCode, QuestionId, VocabularyId};

/// Clinical domain a concept belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConceptDomain {
    Condition,
    Measurement,
    Drug,
    Observation,
}

impl ConceptDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptDomain::Condition => "Condition",
            ConceptDomain::Measurement => "Measurement",
            ConceptDomain::Drug => "Drug",
            ConceptDomain::Observation => "Observation",
        }
    }
}

impl fmt::Display for ConceptDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConceptDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CONDITION" => Ok(ConceptDomain::Condition),
            "MEASUREMENT" => Ok(ConceptDomain::Measurement),
            "DRUG" => Ok(ConceptDomain::Drug),
            "OBSERVATION" => Ok(ConceptDomain::Observation),
            _ => Err(format!("Unknown concept domain: {}", s)),
        }
    }
}

/// What a concept mapping attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// The question itself carries the concept.
    Question,
    /// A standalone response value carries the concept.
    Response,
    /// A specific (question, response value) pair carries the concept.
    Pair,
}

/// Association between a questionnaire element and a standardized
/// vocabulary entry. The vocabulary content itself is assumed pre-loaded;
/// the core only checks existence and consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptMapping {
    pub kind: MappingKind,
    #[serde(default)]
    pub question: Option<QuestionId>,
    /// Raw response value the mapping applies to (kinds `response`/`pair`).
    #[serde(default)]
    pub response_value: Option<String>,
    pub concept: ConceptCode,
    pub vocabulary: VocabularyId,
    pub domain: ConceptDomain,
}

impl ConceptMapping {
    /// Check the kind-shape invariant: `question` needs a question ref only,
    /// `response` a response value only, `pair` both.
    pub fn check_shape(&self) -> Result<(), SchemaError> {
        let malformed = |reason: &str| SchemaError::MalformedMapping {
            concept: self.concept.clone(),
            reason: reason.to_string(),
        };
        match self.kind {
            MappingKind::Question => {
                if self.question.is_none() {
                    return Err(malformed("question-kind mapping needs a question reference"));
                }
                if self.response_value.is_some() {
                    return Err(malformed("question-kind mapping must not carry a response value"));
                }
            }
            MappingKind::Response => {
                if self.response_value.is_none() {
                    return Err(malformed("response-kind mapping needs a response value"));
                }
                if self.question.is_some() {
                    return Err(malformed("response-kind mapping must not reference a question"));
                }
            }
            MappingKind::Pair => {
                if self.question.is_none() || self.response_value.is_none() {
                    return Err(malformed(
                        "pair-kind mapping needs both a question reference and a response value",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(kind: MappingKind, question: Option<&str>, value: Option<&str>) -> ConceptMapping {
        ConceptMapping {
            kind,
            question: question.map(|q| QuestionId::new(q).unwrap()),
            response_value: value.map(str::to_string),
            concept: ConceptCode::new("3004249").unwrap(),
            vocabulary: VocabularyId::new("SNOMED").unwrap(),
            domain: ConceptDomain::Condition,
        }
    }

    #[test]
    fn kind_shapes() {
        assert!(mapping(MappingKind::Question, Some("q1"), None).check_shape().is_ok());
        assert!(mapping(MappingKind::Response, None, Some("true")).check_shape().is_ok());
        assert!(mapping(MappingKind::Pair, Some("q1"), Some("true")).check_shape().is_ok());

        assert!(mapping(MappingKind::Question, None, None).check_shape().is_err());
        assert!(mapping(MappingKind::Question, Some("q1"), Some("x")).check_shape().is_err());
        assert!(mapping(MappingKind::Response, Some("q1"), Some("x")).check_shape().is_err());
        assert!(mapping(MappingKind::Pair, Some("q1"), None).check_shape().is_err());
    }

    #[test]
    fn domain_parses_case_insensitively() {
        assert_eq!("measurement".parse::<ConceptDomain>().unwrap(), ConceptDomain::Measurement);
        assert!("Procedure".parse::<ConceptDomain>().is_err());
    }
}
