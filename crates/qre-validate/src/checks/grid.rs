//! Grid cell shape check.
//!
//! A grid raw value addresses one cell as `row|column` or, when the column
//! declares a rating scale, `row|column|value`. Row and column are matched
//! against the codes of the question's grid definition.

use qre_model::Question;

use super::ShapeFailure;

pub(crate) fn check(question: &Question, value: &str) -> Option<ShapeFailure> {
    let grid = match &question.grid {
        Some(grid) if grid.is_complete() => grid,
        // Defense in depth: Schema::load already rejects incomplete grids.
        _ => return Some(ShapeFailure::IncompleteGrid),
    };

    let mut parts = value.splitn(3, '|');
    let (Some(row_code), Some(column_code)) =
        (parts.next().map(str::trim), parts.next().map(str::trim))
    else {
        return Some(ShapeFailure::invalid(
            "expected a grid cell address of the form row|column[|value]",
        ));
    };
    let cell_value = parts.next().map(str::trim);

    if grid.row(row_code).is_none() {
        return Some(ShapeFailure::invalid(format!(
            "{row_code:?} is not a declared grid row"
        )));
    }
    let Some(column) = grid.column(column_code) else {
        return Some(ShapeFailure::invalid(format!(
            "{column_code:?} is not a declared grid column"
        )));
    };

    if let Some(bounds) = column.bounds {
        let Some(cell_value) = cell_value.filter(|v| !v.is_empty()) else {
            return Some(ShapeFailure::invalid(format!(
                "column {column_code:?} requires a rating within [{}, {}]",
                bounds.min, bounds.max
            )));
        };
        let Ok(rating) = cell_value.parse::<f64>() else {
            return Some(ShapeFailure::invalid(format!(
                "rating {cell_value:?} for column {column_code:?} is not a number"
            )));
        };
        if !bounds.contains(rating) {
            return Some(ShapeFailure::invalid(format!(
                "rating {rating} for column {column_code:?} must be within [{}, {}]",
                bounds.min, bounds.max
            )));
        }
    }
    None
}
