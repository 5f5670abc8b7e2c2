//! Single- and multi-choice shape checks.

use std::collections::BTreeSet;

use qre_model::Question;

use super::ShapeFailure;

const MAX_LISTED_OPTIONS: usize = 5;

/// The value must equal exactly one existing option value.
pub(crate) fn check_single(question: &Question, value: &str) -> Option<ShapeFailure> {
    let trimmed = value.trim();
    if question.option_by_value(trimmed).is_some() {
        return None;
    }
    Some(ShapeFailure::invalid(format!(
        "expected one of the declared option values ({})",
        option_sample(question)
    )))
}

/// The value is a delimited set; every element must be a distinct existing
/// option value. An empty set is allowed only when the question is not
/// required.
pub(crate) fn check_multi(question: &Question, value: &str) -> Option<ShapeFailure> {
    let delimiter = question.multi_choice_delimiter();
    let elements: Vec<&str> = value
        .split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if elements.is_empty() {
        if question.required {
            return Some(ShapeFailure::invalid(
                "at least one selection is required for this question",
            ));
        }
        return None;
    }

    let mut seen = BTreeSet::new();
    for element in elements {
        if question.option_by_value(element).is_none() {
            return Some(ShapeFailure::invalid(format!(
                "{element:?} is not a declared option value ({})",
                option_sample(question)
            )));
        }
        if !seen.insert(element) {
            return Some(ShapeFailure::invalid(format!(
                "option value {element:?} was selected more than once"
            )));
        }
    }
    None
}

fn option_sample(question: &Question) -> String {
    let values: Vec<&str> = question
        .ordered_options()
        .into_iter()
        .take(MAX_LISTED_OPTIONS)
        .map(|option| option.value.as_str())
        .collect();
    if question.options.len() > MAX_LISTED_OPTIONS {
        format!("{}, ...", values.join(", "))
    } else {
        values.join(", ")
    }
}
