//! Response validation engine.
//!
//! Single entry points for the caller (the storage/API layer):
//! [`validate`] for one candidate response, [`completion`] for the
//! session-level required-question scan. Neither has side effects; the
//! caller persists the response itself on `Accepted`.

use tracing::debug;

use qre_model::{
    Completion, Question, QuestionId, QuestionType, Result, Schema, SessionHistory, Verdict,
};

use crate::checks::{self, ShapeFailure};
use crate::concept;

/// Validate one candidate response against the schema.
///
/// Steps, in order: type-specific shape check, grid completeness,
/// loop-instance presence, concept-mapping integrity. The first objection
/// wins and is returned as a [`Verdict`] — rejections never abort the
/// session. Required-completeness is deliberately not checked here; it is
/// a session-level concern evaluated by [`completion`], which is why the
/// session history is unused today but part of the call contract.
///
/// `Err` is reserved for caller bugs (an unknown question id), which are
/// schema-level defects rather than respondent input problems.
pub fn validate(
    schema: &Schema,
    question_id: &QuestionId,
    value: &str,
    loop_instance: Option<u32>,
    _session: &SessionHistory,
) -> Result<Verdict> {
    let question = schema.require_question(question_id)?;

    if let Some(failure) = checks::check(question, value) {
        let verdict = match failure {
            ShapeFailure::Invalid { constraint } => {
                debug!(question = %question_id, %constraint, "shape validation failed");
                Verdict::InvalidResponseShape {
                    question: question_id.clone(),
                    value: value.to_string(),
                    constraint,
                }
            }
            ShapeFailure::IncompleteGrid => {
                debug!(question = %question_id, "grid definition incomplete");
                Verdict::IncompleteGridDefinition {
                    question: question_id.clone(),
                }
            }
        };
        return Ok(verdict);
    }

    let loop_child = question.is_loop_child();
    if loop_child != loop_instance.is_some() {
        debug!(
            question = %question_id,
            loop_child,
            ?loop_instance,
            "loop instance mismatch"
        );
        return Ok(Verdict::LoopInstanceMismatch {
            question: question_id.clone(),
            loop_child,
            provided: loop_instance,
        });
    }

    if let Some(verdict) = concept::check(schema, question, value) {
        debug!(question = %question_id, "concept mapping check failed");
        return Ok(verdict);
    }

    Ok(Verdict::Accepted)
}

/// Evaluate session completeness: every required question — including every
/// required loop child across its requested loop instances — must have at
/// least one accepted response. Missing questions are reported collectively,
/// in display order, each listed once.
pub fn completion(schema: &Schema, session: &SessionHistory) -> Completion {
    let mut ordered: Vec<&Question> = schema.questions().iter().collect();
    ordered.sort_by_key(|question| question.display_order);

    let mut missing = Vec::new();
    for question in ordered {
        if !question.required {
            continue;
        }
        // A loop question holds no value; its requirements live on the
        // children.
        if question.question_type == QuestionType::Loop {
            continue;
        }

        let complete = match &question.loop_parent {
            Some(parent) => loop_child_complete(schema, session, question, parent),
            None => session.has_response(&question.id, None),
        };
        if !complete {
            missing.push(question.id.clone());
        }
    }

    if missing.is_empty() {
        Completion::Complete
    } else {
        debug!(missing = missing.len(), "session incomplete");
        Completion::Incomplete { missing }
    }
}

/// A required loop child is complete when every requested instance of its
/// loop has a response for it. A fixed-count loop requests instances
/// `1..=count`; an open loop requests exactly the instances the session has
/// touched.
fn loop_child_complete(
    schema: &Schema,
    session: &SessionHistory,
    question: &Question,
    parent: &QuestionId,
) -> bool {
    let requested: Vec<u32> = match schema.question(parent).and_then(|p| p.loop_count) {
        Some(count) => (1..=count).collect(),
        None => {
            let children = schema.loop_children(parent);
            session.instances(children.iter().map(|child| &child.id))
        }
    };
    requested
        .into_iter()
        .all(|instance| session.has_response(&question.id, Some(instance)))
}
