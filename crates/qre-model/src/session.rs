use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::QuestionId;

/// A single accepted response as recorded by the caller.
///
/// Responses are append-only: an amendment is a later response with a later
/// timestamp, never a mutation of an earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub question: QuestionId,
    pub value: String,
    /// Present iff the question is a loop child.
    #[serde(default)]
    pub loop_instance: Option<u32>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(
        "response to {question} at {later} is earlier than the previous response at {earlier}"
    )]
    OutOfOrder {
        question: QuestionId,
        earlier: DateTime<Utc>,
        later: DateTime<Utc>,
    },
}

/// One respondent's pass through a questionnaire.
///
/// The engine holds no state of its own; the caller passes the session
/// history into every `validate`/`next` call. Timestamps must be
/// non-decreasing, enforced at `record`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    responses: Vec<RecordedResponse>,
    /// Loops for which the caller has recorded the external exit signal
    /// ("no more iterations").
    finished_loops: BTreeSet<QuestionId>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted response, enforcing timestamp monotonicity.
    pub fn record(&mut self, response: RecordedResponse) -> Result<(), SessionError> {
        if let Some(last) = self.responses.last()
            && response.recorded_at < last.recorded_at
        {
            return Err(SessionError::OutOfOrder {
                question: response.question.clone(),
                earlier: last.recorded_at,
                later: response.recorded_at,
            });
        }
        self.responses.push(response);
        Ok(())
    }

    /// Record the external "loop is finished" signal for a loop question.
    pub fn finish_loop(&mut self, loop_question: QuestionId) {
        self.finished_loops.insert(loop_question);
    }

    pub fn loop_finished(&self, loop_question: &QuestionId) -> bool {
        self.finished_loops.contains(loop_question)
    }

    pub fn responses(&self) -> &[RecordedResponse] {
        &self.responses
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn has_response(&self, question: &QuestionId, loop_instance: Option<u32>) -> bool {
        self.responses
            .iter()
            .any(|r| r.question == *question && r.loop_instance == loop_instance)
    }

    /// Latest recorded value for a (question, loop instance) pair.
    /// Later responses supersede earlier ones.
    pub fn last_value(&self, question: &QuestionId, loop_instance: Option<u32>) -> Option<&str> {
        self.responses
            .iter()
            .rev()
            .find(|r| r.question == *question && r.loop_instance == loop_instance)
            .map(|r| r.value.as_str())
    }

    /// Highest loop instance recorded for any of the given loop children.
    pub fn max_instance<'a>(
        &self,
        children: impl IntoIterator<Item = &'a QuestionId>,
    ) -> Option<u32> {
        let children: BTreeSet<&QuestionId> = children.into_iter().collect();
        self.responses
            .iter()
            .filter(|r| children.contains(&r.question))
            .filter_map(|r| r.loop_instance)
            .max()
    }

    /// All loop instances recorded for any of the given loop children,
    /// ascending and de-duplicated.
    pub fn instances<'a>(&self, children: impl IntoIterator<Item = &'a QuestionId>) -> Vec<u32> {
        let children: BTreeSet<&QuestionId> = children.into_iter().collect();
        let set: BTreeSet<u32> = self
            .responses
            .iter()
            .filter(|r| children.contains(&r.question))
            .filter_map(|r| r.loop_instance)
            .collect();
        set.into_iter().collect()
    }
}
