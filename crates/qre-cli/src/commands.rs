use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use qre_model::{Questionnaire, Schema, SessionHistory};
use qre_nav::replay;
use qre_validate::{completion, validate};

use crate::cli::{CheckArgs, ReplayArgs};
use crate::types::{CheckResult, ReplayResult, ReplayRow};

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let schema = load_schema(&args.definition)?;
    let questionnaire = schema.questionnaire();
    info!(
        questionnaire = %questionnaire.id,
        question_count = questionnaire.questions.len(),
        "definition loaded cleanly"
    );
    Ok(CheckResult {
        questionnaire_id: questionnaire.id.to_string(),
        title: questionnaire.title.clone(),
        version: questionnaire.version.clone(),
        question_count: questionnaire.questions.len(),
        rule_count: questionnaire.skip_rules.len(),
        mapping_count: questionnaire.mappings.len(),
    })
}

pub fn run_replay(args: &ReplayArgs) -> Result<ReplayResult> {
    let schema = load_schema(&args.definition)?;
    let session = load_session(&args.session)?;
    let questionnaire = schema.questionnaire();
    let span = info_span!("replay", questionnaire = %questionnaire.id);
    let _guard = span.enter();

    // Re-validate every recorded response in recorded order. The session
    // file claims these were accepted; disagreement shows up as a
    // rejection row, not a hard error.
    let mut rows = Vec::with_capacity(session.responses().len());
    for response in session.responses() {
        let verdict = validate(
            &schema,
            &response.question,
            &response.value,
            response.loop_instance,
            &session,
        )
        .with_context(|| format!("validate response to {}", response.question))?;
        rows.push(ReplayRow {
            question: response.question.clone(),
            loop_instance: response.loop_instance,
            value: response.value.clone(),
            verdict,
        });
    }

    let prompts = replay(&schema, &session).context("derive prompting order")?;
    let completion = completion(&schema, &session);
    let has_rejections = rows.iter().any(|row| !row.verdict.is_accepted());
    info!(
        response_count = rows.len(),
        prompt_count = prompts.len(),
        complete = completion.is_complete(),
        "replay finished"
    );

    Ok(ReplayResult {
        questionnaire_id: questionnaire.id.to_string(),
        title: questionnaire.title.clone(),
        rows,
        prompts,
        completion,
        has_rejections,
    })
}

fn load_schema(path: &Path) -> Result<Schema> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read definition {}", path.display()))?;
    let questionnaire: Questionnaire = serde_json::from_str(&raw)
        .with_context(|| format!("parse definition {}", path.display()))?;
    Schema::load(questionnaire).context("load questionnaire definition")
}

fn load_session(path: &Path) -> Result<SessionHistory> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read session {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse session {}", path.display()))
}
