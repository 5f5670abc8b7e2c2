//! Concept-mapping integrity checks.
//!
//! Question-level mapping completeness is enforced once at `Schema::load`;
//! this module covers the per-response side: a controlled answer submitted
//! for a question flagged `requires_mapping` must resolve to a response- or
//! pair-kind mapping, and a pair mapping's domain must agree with the
//! question's declared domain. Only existence and consistency are checked
//! here; vocabulary content is assumed pre-loaded into the schema.

use qre_model::{Question, QuestionType, Schema, Verdict};

/// Check mapping integrity for one candidate value. `None` means no
/// objection; `Some` carries the rejecting verdict to propagate.
pub(crate) fn check(schema: &Schema, question: &Question, value: &str) -> Option<Verdict> {
    if !question.requires_mapping || !question.question_type.is_controlled() {
        return None;
    }

    if question.question_type == QuestionType::MultiChoice {
        let delimiter = question.multi_choice_delimiter();
        return value
            .split(delimiter)
            .map(str::trim)
            .filter(|element| !element.is_empty())
            .find_map(|element| check_value(schema, question, element));
    }

    check_value(schema, question, value)
}

fn check_value(schema: &Schema, question: &Question, value: &str) -> Option<Verdict> {
    if let Some(mapping) = schema.pair_mapping(&question.id, value) {
        if let Some(expected) = question.domain
            && mapping.domain != expected
        {
            return Some(Verdict::DomainMismatch {
                question: question.id.clone(),
                expected,
                found: mapping.domain,
            });
        }
        return None;
    }
    if schema.response_mapping(value).is_some() {
        return None;
    }
    Some(Verdict::UnmappedResponseValue {
        question: question.id.clone(),
        value: value.to_string(),
    })
}
