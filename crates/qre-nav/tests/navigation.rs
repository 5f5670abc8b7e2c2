//! Skip-logic, loop iteration, and replay behavior.

use chrono::{TimeZone, Utc};
use proptest::prelude::proptest;
use qre_model::{
    Question, QuestionId, QuestionType, Questionnaire, QuestionnaireId, QuestionnaireStatus,
    RecordedResponse, Schema, SessionHistory, SkipCondition, SkipLogicRule,
};
use qre_nav::{NavError, NextState, Prompt, next, replay};

fn qid(s: &str) -> QuestionId {
    QuestionId::new(s).unwrap()
}

fn question(id: &str, question_type: QuestionType, display_order: u32) -> Question {
    Question {
        id: qid(id),
        text: format!("Question {id}"),
        question_type,
        required: false,
        display_order,
        concept: None,
        domain: None,
        requires_mapping: false,
        parent: None,
        loop_parent: None,
        loop_position: None,
        loop_count: None,
        numeric_bounds: None,
        date_format: None,
        date_bounds: None,
        delimiter: None,
        options: Vec::new(),
        grid: None,
    }
}

fn schema_of(questions: Vec<Question>, skip_rules: Vec<SkipLogicRule>) -> Schema {
    Schema::load(Questionnaire {
        id: QuestionnaireId::new("symptoms").unwrap(),
        title: "Symptoms".to_string(),
        version: "1".to_string(),
        status: QuestionnaireStatus::Published,
        questions,
        skip_rules,
        mappings: Vec::new(),
    })
    .unwrap()
}

fn rule(source: &str, target: &str, condition: SkipCondition, comparison: &str) -> SkipLogicRule {
    SkipLogicRule {
        source: qid(source),
        target: qid(target),
        condition,
        comparison: comparison.to_string(),
    }
}

fn record(session: &mut SessionHistory, q: &str, value: &str, instance: Option<u32>, secs: i64) {
    session
        .record(RecordedResponse {
            question: qid(q),
            value: value.to_string(),
            loop_instance: instance,
            recorded_at: Utc.timestamp_opt(secs, 0).unwrap(),
        })
        .unwrap();
}

fn at(id: &str, instance: Option<u32>) -> NextState {
    NextState::Question {
        id: qid(id),
        loop_instance: instance,
    }
}

/// pain-level question, two fillers, then a symptom grid target.
fn pain_schema() -> Schema {
    schema_of(
        vec![
            question("pain", QuestionType::Numeric, 1),
            question("sleep", QuestionType::Numeric, 2),
            question("mood", QuestionType::Numeric, 3),
            question("symptom-grid", QuestionType::FreeText, 4),
        ],
        vec![rule("pain", "symptom-grid", SkipCondition::Equals, "3")],
    )
}

#[test]
fn matching_rule_bypasses_intermediate_questions() {
    let schema = pain_schema();
    let session = SessionHistory::new();

    assert_eq!(
        next(&schema, &qid("pain"), "3", &session).unwrap(),
        at("symptom-grid", None)
    );
}

#[test]
fn non_matching_rule_falls_back_to_display_order() {
    let schema = pain_schema();
    let session = SessionHistory::new();

    assert_eq!(
        next(&schema, &qid("pain"), "1", &session).unwrap(),
        at("sleep", None)
    );
}

#[test]
fn earliest_declared_rule_wins() {
    let schema = schema_of(
        vec![
            question("pain", QuestionType::Numeric, 1),
            question("a", QuestionType::FreeText, 2),
            question("b", QuestionType::FreeText, 3),
        ],
        vec![
            rule("pain", "b", SkipCondition::GreaterThan, "2"),
            rule("pain", "a", SkipCondition::GreaterThan, "1"),
        ],
    );
    let session = SessionHistory::new();

    // both rules match "5"; the first declared one decides
    assert_eq!(
        next(&schema, &qid("pain"), "5", &session).unwrap(),
        at("b", None)
    );
}

#[test]
fn past_the_last_question_navigation_completes() {
    let schema = pain_schema();
    let session = SessionHistory::new();

    assert_eq!(
        next(&schema, &qid("symptom-grid"), "none", &session).unwrap(),
        NextState::Completed
    );
}

#[test]
fn unknown_current_question_is_an_error() {
    let schema = pain_schema();
    let session = SessionHistory::new();

    assert_eq!(
        next(&schema, &qid("nope"), "1", &session).unwrap_err(),
        NavError::UnknownQuestion(qid("nope"))
    );
}

/// Medication loop: parent at order 10, children name/dose, then a
/// follow-up question at order 20.
fn medication_schema(loop_count: Option<u32>) -> Schema {
    let mut meds = question("meds", QuestionType::Loop, 10);
    meds.loop_count = loop_count;
    let mut name = question("name", QuestionType::FreeText, 11);
    name.loop_parent = Some(qid("meds"));
    name.loop_position = Some(1);
    let mut dose = question("dose", QuestionType::Numeric, 12);
    dose.loop_parent = Some(qid("meds"));
    dose.loop_position = Some(2);
    let follow_up = question("follow-up", QuestionType::Boolean, 20);
    schema_of(vec![meds, name, dose, follow_up], Vec::new())
}

#[test]
fn loop_parent_enters_first_child_with_fresh_instance() {
    let schema = medication_schema(Some(2));
    let session = SessionHistory::new();

    assert_eq!(
        next(&schema, &qid("meds"), "", &session).unwrap(),
        at("name", Some(1))
    );
}

#[test]
fn loop_children_step_in_position_order() {
    let schema = medication_schema(Some(2));
    let mut session = SessionHistory::new();
    record(&mut session, "name", "aspirin", Some(1), 1);

    assert_eq!(
        next(&schema, &qid("name"), "aspirin", &session).unwrap(),
        at("dose", Some(1))
    );
}

#[test]
fn fixed_count_loop_repeats_then_exits() {
    let schema = medication_schema(Some(2));
    let mut session = SessionHistory::new();
    record(&mut session, "name", "aspirin", Some(1), 1);
    record(&mut session, "dose", "100", Some(1), 2);

    // first iteration done, count not reached: repeat
    assert_eq!(
        next(&schema, &qid("dose"), "100", &session).unwrap(),
        at("name", Some(2))
    );

    record(&mut session, "name", "ibuprofen", Some(2), 3);
    record(&mut session, "dose", "200", Some(2), 4);

    // count reached: resume after the loop parent, skipping its body
    assert_eq!(
        next(&schema, &qid("dose"), "200", &session).unwrap(),
        at("follow-up", None)
    );
}

#[test]
fn open_loop_repeats_until_exit_signal() {
    let schema = medication_schema(None);
    let mut session = SessionHistory::new();
    record(&mut session, "name", "aspirin", Some(1), 1);
    record(&mut session, "dose", "100", Some(1), 2);

    // no exit signal recorded: keep prompting
    assert_eq!(
        next(&schema, &qid("dose"), "100", &session).unwrap(),
        at("name", Some(2))
    );

    session.finish_loop(qid("meds"));
    assert_eq!(
        next(&schema, &qid("dose"), "100", &session).unwrap(),
        at("follow-up", None)
    );
}

#[test]
fn finished_loop_is_passed_over_on_arrival() {
    let schema = medication_schema(None);
    let mut session = SessionHistory::new();
    session.finish_loop(qid("meds"));

    assert_eq!(
        next(&schema, &qid("meds"), "", &session).unwrap(),
        at("follow-up", None)
    );
}

#[test]
fn replay_reproduces_loop_prompting_order() {
    let schema = medication_schema(Some(2));
    let mut session = SessionHistory::new();
    // answers precede the loop parent: first question is "meds" itself
    record(&mut session, "name", "aspirin", Some(1), 1);
    record(&mut session, "dose", "100", Some(1), 2);
    record(&mut session, "name", "ibuprofen", Some(2), 3);
    record(&mut session, "dose", "200", Some(2), 4);
    record(&mut session, "follow-up", "true", None, 5);

    let prompt = |q: &str, instance: Option<u32>| Prompt {
        question: qid(q),
        loop_instance: instance,
    };
    let expected = vec![
        prompt("meds", None),
        prompt("name", Some(1)),
        prompt("dose", Some(1)),
        prompt("name", Some(2)),
        prompt("dose", Some(2)),
        prompt("follow-up", None),
    ];

    let first = replay(&schema, &session).unwrap();
    assert_eq!(first, expected);
    // deterministic: a second replay over the same history is identical
    assert_eq!(replay(&schema, &session).unwrap(), expected);
}

#[test]
fn replay_stops_at_the_frontier() {
    let schema = pain_schema();
    let mut session = SessionHistory::new();
    record(&mut session, "pain", "1", None, 1);

    let prompts = replay(&schema, &session).unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[1].question, qid("sleep"));
}

#[test]
fn backward_rule_is_caught_by_the_replay_cycle_guard() {
    // a -> b -> c with a conditional jump back to a; the rule graph itself
    // is acyclic, so the schema loads, but one pass must never revisit a
    let schema = schema_of(
        vec![
            question("a", QuestionType::Numeric, 1),
            question("b", QuestionType::Numeric, 2),
            question("c", QuestionType::Numeric, 3),
        ],
        vec![rule("c", "a", SkipCondition::Equals, "again")],
    );
    let mut session = SessionHistory::new();
    record(&mut session, "a", "1", None, 1);
    record(&mut session, "b", "2", None, 2);
    record(&mut session, "c", "again", None, 3);

    assert_eq!(
        replay(&schema, &session).unwrap_err(),
        NavError::CycleDetected(qid("a"))
    );
}

proptest! {
    #[test]
    fn next_is_deterministic(value in "[0-9]{1,3}") {
        let schema = pain_schema();
        let session = SessionHistory::new();
        let first = next(&schema, &qid("pain"), &value, &session).unwrap();
        let second = next(&schema, &qid("pain"), &value, &session).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn replay_is_idempotent_over_loop_iterations(iterations in 1u32..4) {
        let schema = medication_schema(Some(iterations));
        let mut session = SessionHistory::new();
        let mut clock = 0i64;
        for instance in 1..=iterations {
            clock += 1;
            record(&mut session, "name", "med", Some(instance), clock);
            clock += 1;
            record(&mut session, "dose", "10", Some(instance), clock);
        }
        record(&mut session, "follow-up", "true", None, clock + 1);

        let first = replay(&schema, &session).unwrap();
        let second = replay(&schema, &session).unwrap();
        assert_eq!(first, second);
        // one parent prompt, two prompts per iteration, one follow-up
        assert_eq!(first.len() as u32, 1 + iterations * 2 + 1);
    }
}
