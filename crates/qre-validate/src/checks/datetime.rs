//! Datetime shape check.
//!
//! The value must parse under the question's single declared format
//! (default `%Y-%m-%d`); the parse is attempted with a time component
//! first, then as a plain date. Declared date bounds are inclusive and
//! compared on the date part.

use chrono::{NaiveDate, NaiveDateTime};
use qre_model::Question;

use super::ShapeFailure;

const DEFAULT_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn check(question: &Question, value: &str) -> Option<ShapeFailure> {
    let format = question.date_format.as_deref().unwrap_or(DEFAULT_FORMAT);
    let trimmed = value.trim();

    let date = match parse_date(trimmed, format) {
        Some(date) => date,
        None => {
            return Some(ShapeFailure::invalid(format!(
                "expected a date matching format {format:?}"
            )));
        }
    };

    if let Some(bounds) = question.date_bounds
        && !bounds.contains(date)
    {
        return Some(ShapeFailure::invalid(format!(
            "date must fall between {} and {}",
            bounds
                .min
                .map_or_else(|| "the beginning of time".to_string(), |d| d.to_string()),
            bounds
                .max
                .map_or_else(|| "the end of time".to_string(), |d| d.to_string()),
        )));
    }
    None
}

fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(value, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_and_custom_formats() {
        assert!(parse_date("2024-06-01", DEFAULT_FORMAT).is_some());
        assert!(parse_date("06/01/2024", DEFAULT_FORMAT).is_none());
        assert!(parse_date("06/01/2024", "%m/%d/%Y").is_some());
        assert!(parse_date("2024-06-01T10:30:00", "%Y-%m-%dT%H:%M:%S").is_some());
    }
}
