//! Next-question state machine.
//!
//! `next` is a pure function of (schema, current question, accepted value,
//! session history). Precedence: skip rules in declaration order, then loop
//! machinery, then ascending display order. Past the last question the
//! state becomes `Completed`.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use qre_model::{Question, QuestionId, QuestionType, Schema, SessionHistory};

/// Fatal navigation failures. Both indicate authoring or integration
/// defects, never respondent input problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("question {0} not found in schema")]
    UnknownQuestion(QuestionId),
    #[error("navigation revisited question {0} within the same pass")]
    CycleDetected(QuestionId),
}

/// Where navigation lands after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NextState {
    Question {
        id: QuestionId,
        /// Set when the target is a loop child.
        loop_instance: Option<u32>,
    },
    Completed,
}

/// Compute the question to present after `current` was answered with
/// `accepted_value`. The current loop instance, where relevant, is derived
/// from the latest recorded response for `current`.
pub fn next(
    schema: &Schema,
    current: &QuestionId,
    accepted_value: &str,
    session: &SessionHistory,
) -> Result<NextState, NavError> {
    let question = schema
        .question(current)
        .ok_or_else(|| NavError::UnknownQuestion(current.clone()))?;
    let instance = current_instance(question, session);
    step(schema, question, instance, accepted_value, session)
}

/// Loop instance the current question was last answered under, defaulting
/// to 1 for a loop child with nothing recorded yet.
fn current_instance(question: &Question, session: &SessionHistory) -> Option<u32> {
    if !question.is_loop_child() {
        return None;
    }
    session
        .responses()
        .iter()
        .rev()
        .find(|r| r.question == question.id)
        .and_then(|r| r.loop_instance)
        .or(Some(1))
}

/// One transition with an explicit loop instance. `replay` drives this
/// directly so it can walk historical instances instead of the latest one.
pub(crate) fn step(
    schema: &Schema,
    question: &Question,
    instance: Option<u32>,
    accepted_value: &str,
    session: &SessionHistory,
) -> Result<NextState, NavError> {
    // Skip rules fire first; ties go to the earliest-declared rule.
    for rule in schema.rules_from(&question.id) {
        if rule.condition.matches(accepted_value, &rule.comparison) {
            debug!(
                source = %rule.source,
                target = %rule.target,
                condition = %rule.condition,
                "skip rule fired"
            );
            let target = schema
                .question(&rule.target)
                .ok_or_else(|| NavError::UnknownQuestion(rule.target.clone()))?;
            return Ok(NextState::Question {
                id: target.id.clone(),
                loop_instance: instance_for_target(schema, target, question, instance, session),
            });
        }
    }

    if question.question_type == QuestionType::Loop {
        return Ok(enter_or_pass_loop(schema, question, session));
    }

    if let Some(parent) = &question.loop_parent {
        return loop_child_step(schema, question, parent, instance.unwrap_or(1), session);
    }

    Ok(advance_in_order(schema, question.display_order))
}

/// Instance to tag a rule target with: same-loop jumps keep the current
/// instance; a jump into another loop lands on its latest recorded
/// instance (or 1).
fn instance_for_target(
    schema: &Schema,
    target: &Question,
    current: &Question,
    current_instance: Option<u32>,
    session: &SessionHistory,
) -> Option<u32> {
    let parent = target.loop_parent.as_ref()?;
    if current.loop_parent.as_ref() == Some(parent) {
        return current_instance.or(Some(1));
    }
    let children = schema.loop_children(parent);
    Some(
        session
            .max_instance(children.iter().map(|child| &child.id))
            .unwrap_or(1),
    )
}

/// Arriving at a loop parent: enter the loop body at instance 1 unless the
/// loop was declared empty or already dismissed. Iteration-to-iteration
/// stepping happens at the last child, so entry always starts the first
/// instance — which is also what makes replaying a recorded session walk
/// every historical iteration again.
fn enter_or_pass_loop(schema: &Schema, loop_question: &Question, session: &SessionHistory) -> NextState {
    let children = schema.loop_children(&loop_question.id);
    if children.is_empty() {
        return advance_in_order(schema, loop_question.display_order);
    }
    let instance_started = children
        .iter()
        .any(|child| session.has_response(&child.id, Some(1)));
    let dismissed = match loop_question.loop_count {
        Some(count) => count == 0,
        None => session.loop_finished(&loop_question.id),
    };
    if !instance_started && dismissed {
        debug!(loop_question = %loop_question.id, "loop dismissed, passing over");
        return advance_in_order(schema, loop_question.display_order);
    }
    NextState::Question {
        id: children[0].id.clone(),
        loop_instance: Some(1),
    }
}

/// Inside the loop body: advance to the next child of the same instance,
/// or decide at the last child whether another iteration starts or
/// navigation resumes after the loop parent.
fn loop_child_step(
    schema: &Schema,
    question: &Question,
    parent: &QuestionId,
    instance: u32,
    session: &SessionHistory,
) -> Result<NextState, NavError> {
    let children = schema.loop_children(parent);
    let Some(position) = children.iter().position(|child| child.id == question.id) else {
        return Err(NavError::UnknownQuestion(question.id.clone()));
    };

    if position + 1 < children.len() {
        return Ok(NextState::Question {
            id: children[position + 1].id.clone(),
            loop_instance: Some(instance),
        });
    }

    let parent_question = schema
        .question(parent)
        .ok_or_else(|| NavError::UnknownQuestion(parent.clone()))?;
    let repeat = match parent_question.loop_count {
        Some(count) => instance < count,
        None => {
            let next_instance_started = children
                .iter()
                .any(|child| session.has_response(&child.id, Some(instance + 1)));
            next_instance_started || !session.loop_finished(parent)
        }
    };
    if repeat {
        debug!(loop_question = %parent, next_instance = instance + 1, "starting loop iteration");
        return Ok(NextState::Question {
            id: children[0].id.clone(),
            loop_instance: Some(instance + 1),
        });
    }
    debug!(loop_question = %parent, "loop finished, resuming after parent");
    Ok(advance_in_order(schema, parent_question.display_order))
}

/// Default transition: next question by ascending display order, skipping
/// loop bodies. Past the last question the session is complete.
fn advance_in_order(schema: &Schema, after: u32) -> NextState {
    match schema.next_prompt_after(after) {
        Some(question) => NextState::Question {
            id: question.id.clone(),
            loop_instance: None,
        },
        None => NextState::Completed,
    }
}
