//! Numeric shape check: decimal parse plus optional inclusive bounds.

use qre_model::Question;

use super::ShapeFailure;

pub(crate) fn check(question: &Question, value: &str) -> Option<ShapeFailure> {
    let trimmed = value.trim();
    let Ok(number) = trimmed.parse::<f64>() else {
        return Some(ShapeFailure::invalid("expected a decimal number"));
    };
    if !number.is_finite() {
        return Some(ShapeFailure::invalid("expected a finite decimal number"));
    }
    if let Some(bounds) = question.numeric_bounds
        && !bounds.contains(number)
    {
        return Some(ShapeFailure::invalid(format!(
            "value must be within [{}, {}]",
            bounds.min, bounds.max
        )));
    }
    None
}
