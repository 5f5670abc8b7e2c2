use thiserror::Error;

use crate::ids::{ConceptCode, QuestionId};

/// Authoring-time schema defects.
///
/// Every variant is fatal: `Schema::load` aborts on the first defect and
/// nothing is collected against a malformed questionnaire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("duplicate question id {0}")]
    DuplicateQuestionId(QuestionId),
    #[error("questions {first} and {second} share display order {order}")]
    DuplicateDisplayOrder {
        order: u32,
        first: QuestionId,
        second: QuestionId,
    },
    #[error("option value {value:?} appears more than once in question {question}")]
    DuplicateOptionValue {
        question: QuestionId,
        value: String,
    },
    #[error("grid question {0} must declare at least one row and one column")]
    IncompleteGridDefinition(QuestionId),
    #[error("question {question} declares a grid definition but is of type {found}")]
    UnexpectedGridDefinition {
        question: QuestionId,
        found: String,
    },
    #[error("question {child} references unknown loop parent {parent}")]
    UnknownLoopParent {
        child: QuestionId,
        parent: QuestionId,
    },
    #[error("question {child} names {parent} as loop parent, but {parent} is not a loop question")]
    LoopParentNotLoop {
        child: QuestionId,
        parent: QuestionId,
    },
    #[error("skip rule references question {0} which is not part of the questionnaire")]
    SkipRuleUnknownQuestion(QuestionId),
    #[error("skip rules form a cycle through question {0}")]
    SkipCycle(QuestionId),
    #[error("concept mapping {concept} is malformed: {reason}")]
    MalformedMapping { concept: ConceptCode, reason: String },
    #[error("concept mapping references unknown question {0}")]
    MappingUnknownQuestion(QuestionId),
    #[error("question {0} requires a standardized mapping but no question-kind mapping exists")]
    MissingQuestionMapping(QuestionId),
    #[error("question {0} not found in schema")]
    UnknownQuestion(QuestionId),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
