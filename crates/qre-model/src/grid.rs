use serde::{Deserialize, Serialize};

use crate::ids::ConceptCode;
use crate::question::NumericBounds;

/// One row or column of a grid question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridAxisEntry {
    /// Stable code used to address the entry in raw response values.
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub concept: Option<ConceptCode>,
    /// Rating/scale bounds. Only meaningful on columns; a cell value
    /// submitted for a bounded column must fall inside them.
    #[serde(default)]
    pub bounds: Option<NumericBounds>,
}

/// Matrix structure of a grid question. Rows and columns keep their
/// authored order; a grid must have at least one of each before the
/// question can be activated for collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridDefinition {
    pub rows: Vec<GridAxisEntry>,
    pub columns: Vec<GridAxisEntry>,
}

impl GridDefinition {
    pub fn is_complete(&self) -> bool {
        !self.rows.is_empty() && !self.columns.is_empty()
    }

    pub fn row(&self, code: &str) -> Option<&GridAxisEntry> {
        self.rows.iter().find(|entry| entry.code == code)
    }

    pub fn column(&self, code: &str) -> Option<&GridAxisEntry> {
        self.columns.iter().find(|entry| entry.code == code)
    }
}
