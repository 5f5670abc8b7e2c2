//! Shape validation, one check per question type.
//!
//! Each check is a small pure function over the question metadata and the
//! candidate raw value. Dispatch is a closed match over `QuestionType`;
//! adding a type means adding an arm, not a trait impl.

use qre_model::{Question, QuestionType};

mod boolean;
mod choice;
mod datetime;
mod grid;
mod numeric;

/// Why a candidate value failed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShapeFailure {
    /// Value does not satisfy the type's rules; `constraint` names the
    /// expectation that was violated.
    Invalid { constraint: String },
    /// The grid definition has no rows or no columns.
    IncompleteGrid,
}

impl ShapeFailure {
    pub(crate) fn invalid(constraint: impl Into<String>) -> Self {
        ShapeFailure::Invalid {
            constraint: constraint.into(),
        }
    }
}

/// Run the type-specific shape check. `None` means the value passes.
pub(crate) fn check(question: &Question, value: &str) -> Option<ShapeFailure> {
    match question.question_type {
        QuestionType::Boolean => boolean::check(value),
        QuestionType::SingleChoice => choice::check_single(question, value),
        QuestionType::MultiChoice => choice::check_multi(question, value),
        QuestionType::Grid => grid::check(question, value),
        QuestionType::Numeric => numeric::check(question, value),
        QuestionType::Datetime => datetime::check(question, value),
        // Free text always passes shape validation; emptiness only matters
        // for required-completeness, which is a session-level concern.
        QuestionType::FreeText => None,
        // A loop question holds no value of its own.
        QuestionType::Loop => Some(ShapeFailure::invalid(
            "loop questions hold no value; answer the loop's child questions",
        )),
    }
}
