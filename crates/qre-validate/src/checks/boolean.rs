//! Boolean shape check.
//!
//! Values case-normalize to the boolean literals; yes/no answers are
//! accepted as spellings of true/false since that is what collection
//! front-ends submit for boolean questions.

use super::ShapeFailure;

const ACCEPTED: [&str; 4] = ["true", "false", "yes", "no"];

pub(crate) fn check(value: &str) -> Option<ShapeFailure> {
    let normalized = value.trim().to_ascii_lowercase();
    if ACCEPTED.contains(&normalized.as_str()) {
        return None;
    }
    Some(ShapeFailure::invalid(
        "expected a boolean answer (true/false/yes/no)",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boolean_spellings() {
        for value in ["true", "FALSE", " Yes ", "no"] {
            assert_eq!(check(value), None, "{value:?} should pass");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for value in ["", "1", "maybe", "truelish"] {
            assert!(check(value).is_some(), "{value:?} should fail");
        }
    }
}
