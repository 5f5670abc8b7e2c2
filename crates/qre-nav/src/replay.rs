//! Deterministic re-derivation of a session's prompting order.
//!
//! Walking a recorded session through the same transition function that
//! produced it must reproduce the identical prompt sequence. The walk
//! carries a (question, loop instance) visited set: a schema whose rules
//! send navigation back to an already-visited prompt within one pass can
//! never loop indefinitely — it fails with `CycleDetected` instead, which
//! is surfaced to schema authors, not respondents.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug_span;

use qre_model::{QuestionId, QuestionType, Schema, SessionHistory};

use crate::engine::{NavError, NextState, step};

/// One entry of the prompting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub question: QuestionId,
    pub loop_instance: Option<u32>,
}

/// Replay the session from the first question, following recorded answers.
///
/// The walk ends at the first unanswered prompt (the session's frontier) or
/// when navigation completes; the frontier prompt is included in the
/// result. Loop parents are presented but hold no value, so they never
/// require a recorded answer to pass through.
pub fn replay(schema: &Schema, session: &SessionHistory) -> Result<Vec<Prompt>, NavError> {
    let span = debug_span!("replay", questionnaire = %schema.questionnaire().id);
    let _guard = span.enter();

    let mut prompts = Vec::new();
    let mut visited: BTreeSet<(QuestionId, Option<u32>)> = BTreeSet::new();

    let Some(first) = schema.first_question() else {
        return Ok(prompts);
    };
    let mut current = first;
    // the first question is never a loop child
    let mut instance: Option<u32> = None;

    loop {
        if !visited.insert((current.id.clone(), instance)) {
            return Err(NavError::CycleDetected(current.id.clone()));
        }
        prompts.push(Prompt {
            question: current.id.clone(),
            loop_instance: instance,
        });

        let value = if current.question_type == QuestionType::Loop {
            // loop parents carry no answer; the loop decision is read from
            // the session's instances and exit signal
            String::new()
        } else {
            match session.last_value(&current.id, instance) {
                Some(value) => value.to_string(),
                None => break,
            }
        };

        match step(schema, current, instance, &value, session)? {
            NextState::Completed => break,
            NextState::Question { id, loop_instance } => {
                current = schema
                    .question(&id)
                    .ok_or(NavError::UnknownQuestion(id))?;
                instance = loop_instance;
            }
        }
    }
    Ok(prompts)
}
