use serde::Serialize;

use crate::concept::ConceptDomain;
use crate::ids::QuestionId;

/// Outcome of validating one candidate response.
///
/// Rejections are data, not errors: the session continues and the caller
/// decides whether to re-prompt. Every variant carries enough structure to
/// reconstruct a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    /// The raw value does not satisfy the question type's shape rules.
    InvalidResponseShape {
        question: QuestionId,
        value: String,
        constraint: String,
    },
    /// The grid question cannot accept responses yet (no rows or columns).
    IncompleteGridDefinition { question: QuestionId },
    /// A loop child was submitted without an instance, or a non-loop
    /// question was submitted with one.
    LoopInstanceMismatch {
        question: QuestionId,
        loop_child: bool,
        provided: Option<u32>,
    },
    /// No response- or pair-kind concept mapping exists for this value.
    UnmappedResponseValue {
        question: QuestionId,
        value: String,
    },
    /// The pair mapping's domain contradicts the question's declared domain.
    DomainMismatch {
        question: QuestionId,
        expected: ConceptDomain,
        found: ConceptDomain,
    },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The question the verdict refers to, if it is a rejection.
    pub fn question(&self) -> Option<&QuestionId> {
        match self {
            Verdict::Accepted => None,
            Verdict::InvalidResponseShape { question, .. }
            | Verdict::IncompleteGridDefinition { question }
            | Verdict::LoopInstanceMismatch { question, .. }
            | Verdict::UnmappedResponseValue { question, .. }
            | Verdict::DomainMismatch { question, .. } => Some(question),
        }
    }
}

/// Session-level completeness, evaluated on request (never at submit time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "completion", rename_all = "snake_case")]
pub enum Completion {
    Complete,
    /// Required questions (including required loop children per requested
    /// instance) without an accepted response, reported collectively.
    Incomplete { missing: Vec<QuestionId> },
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }
}
