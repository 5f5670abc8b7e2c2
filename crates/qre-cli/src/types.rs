//! Result types shared between command execution and summary printing.

use qre_model::{Completion, QuestionId, Verdict};
use qre_nav::Prompt;

/// Outcome of `qre check`.
pub struct CheckResult {
    pub questionnaire_id: String,
    pub title: String,
    pub version: String,
    pub question_count: usize,
    pub rule_count: usize,
    pub mapping_count: usize,
}

/// One validated response row for the replay table.
pub struct ReplayRow {
    pub question: QuestionId,
    pub loop_instance: Option<u32>,
    pub value: String,
    pub verdict: Verdict,
}

/// Outcome of `qre replay`.
pub struct ReplayResult {
    pub questionnaire_id: String,
    pub title: String,
    pub rows: Vec<ReplayRow>,
    pub prompts: Vec<Prompt>,
    pub completion: Completion,
    pub has_rejections: bool,
}
