//! Session-level required-completeness scans.

use chrono::{TimeZone, Utc};
use qre_model::{
    Completion, Question, QuestionId, QuestionType, Questionnaire, QuestionnaireId,
    QuestionnaireStatus, RecordedResponse, Schema, SessionHistory,
};
use qre_validate::completion;

fn qid(s: &str) -> QuestionId {
    QuestionId::new(s).unwrap()
}

fn question(id: &str, question_type: QuestionType, display_order: u32, required: bool) -> Question {
    Question {
        id: qid(id),
        text: format!("Question {id}"),
        question_type,
        required,
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

fn schema_of(questions: Vec<Question>) -> Schema {
    Schema::load(Questionnaire {
        id: QuestionnaireId::new("medications").unwrap(),
        title: "Medications".to_string(),
        version: "1".to_string(),
        status: QuestionnaireStatus::Published,
        questions,
        skip_rules: Vec::new(),
        mappings: Vec::new(),
    })
    .unwrap()
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

/// Medication loop with children name/dose/frequency, as authored.
fn medication_schema(loop_count: Option<u32>) -> Schema {
    let mut meds = question("meds", QuestionType::Loop, 1, false);
    meds.loop_count = loop_count;
    let children = ["name", "dose", "frequency"];
    let mut questions = vec![meds];
    for (index, child) in children.iter().enumerate() {
        let mut q = question(child, QuestionType::FreeText, 2 + index as u32, true);
        q.loop_parent = Some(qid("meds"));
        q.loop_position = Some(index as u32 + 1);
        questions.push(q);
    }
    questions.push(question("smoker", QuestionType::Boolean, 10, true));
    schema_of(questions)
}

#[test]
fn complete_when_all_loop_instances_answered() {
    let schema = medication_schema(None);
    let mut session = SessionHistory::new();
    let mut clock = 0;
    for instance in [1, 2] {
        for child in ["name", "dose", "frequency"] {
            clock += 1;
            record(&mut session, child, "x", Some(instance), clock);
        }
    }
    record(&mut session, "smoker", "false", None, clock + 1);

    assert_eq!(completion(&schema, &session), Completion::Complete);
}

#[test]
fn missing_loop_child_instance_is_reported_once() {
    let schema = medication_schema(None);
    let mut session = SessionHistory::new();
    record(&mut session, "name", "aspirin", Some(1), 1);
    record(&mut session, "dose", "100mg", Some(1), 2);
    record(&mut session, "frequency", "daily", Some(1), 3);
    // second iteration started but left unfinished
    record(&mut session, "name", "ibuprofen", Some(2), 4);
    record(&mut session, "smoker", "false", None, 5);

    let Completion::Incomplete { missing } = completion(&schema, &session) else {
        panic!("expected incomplete session");
    };
    assert_eq!(missing, vec![qid("dose"), qid("frequency")]);
}

#[test]
fn fixed_count_loop_requests_all_instances() {
    let schema = medication_schema(Some(2));
    let mut session = SessionHistory::new();
    // only the first of two requested instances is answered
    record(&mut session, "name", "aspirin", Some(1), 1);
    record(&mut session, "dose", "100mg", Some(1), 2);
    record(&mut session, "frequency", "daily", Some(1), 3);
    record(&mut session, "smoker", "false", None, 4);

    let Completion::Incomplete { missing } = completion(&schema, &session) else {
        panic!("expected incomplete session");
    };
    assert_eq!(missing, vec![qid("name"), qid("dose"), qid("frequency")]);
}

#[test]
fn untouched_open_loop_requests_no_instances() {
    let schema = medication_schema(None);
    let mut session = SessionHistory::new();
    record(&mut session, "smoker", "false", None, 1);

    assert_eq!(completion(&schema, &session), Completion::Complete);
}

#[test]
fn missing_plain_required_question() {
    let schema = schema_of(vec![
        question("age", QuestionType::Numeric, 1, true),
        question("notes", QuestionType::FreeText, 2, false),
    ]);
    let session = SessionHistory::new();

    assert_eq!(
        completion(&schema, &session),
        Completion::Incomplete {
            missing: vec![qid("age")]
        }
    );
}

#[test]
fn optional_questions_never_block_completion() {
    let schema = schema_of(vec![
        question("age", QuestionType::Numeric, 1, true),
        question("notes", QuestionType::FreeText, 2, false),
    ]);
    let mut session = SessionHistory::new();
    record(&mut session, "age", "44", None, 1);

    assert_eq!(completion(&schema, &session), Completion::Complete);
}
