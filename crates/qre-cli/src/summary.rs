use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use qre_model::{Completion, Verdict};

use crate::types::{CheckResult, ReplayResult};

pub fn print_check_summary(result: &CheckResult) {
    println!(
        "Definition OK: {} v{} ({})",
        result.title, result.version, result.questionnaire_id
    );
    println!(
        "{} questions, {} skip rules, {} concept mappings",
        result.question_count, result.rule_count, result.mapping_count
    );
}

pub fn print_replay_summary(result: &ReplayResult, show_prompts: bool) {
    println!("Questionnaire: {} ({})", result.title, result.questionnaire_id);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Question"),
        header_cell("Instance"),
        header_cell("Value"),
        header_cell("Verdict"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut rejections = 0usize;
    for row in &result.rows {
        if !row.verdict.is_accepted() {
            rejections += 1;
        }
        let (verdict, detail) = verdict_cells(&row.verdict);
        table.add_row(vec![
            Cell::new(row.question.as_str()),
            instance_cell(row.loop_instance),
            Cell::new(&row.value),
            verdict,
            detail,
        ]);
    }
    println!("{table}");
    println!(
        "{} responses, {} rejected",
        result.rows.len(),
        rejections
    );

    match &result.completion {
        Completion::Complete => println!("Session complete."),
        Completion::Incomplete { missing } => {
            let names: Vec<&str> = missing.iter().map(|id| id.as_str()).collect();
            println!("Session incomplete, missing: {}", names.join(", "));
        }
    }

    if show_prompts {
        println!();
        println!("Prompting order:");
        for prompt in &result.prompts {
            match prompt.loop_instance {
                Some(instance) => println!("- {} [{instance}]", prompt.question),
                None => println!("- {}", prompt.question),
            }
        }
    }
}

fn verdict_cells(verdict: &Verdict) -> (Cell, Cell) {
    match verdict {
        Verdict::Accepted => (
            Cell::new("ACCEPTED")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
        ),
        Verdict::InvalidResponseShape { constraint, .. } => {
            (rejected_cell("INVALID"), Cell::new(constraint))
        }
        Verdict::IncompleteGridDefinition { .. } => (
            rejected_cell("INVALID"),
            Cell::new("grid has no rows or columns"),
        ),
        Verdict::LoopInstanceMismatch {
            loop_child,
            provided,
            ..
        } => {
            let detail = if *loop_child {
                "loop child answered without an instance".to_string()
            } else {
                format!("instance {provided:?} on a non-loop question")
            };
            (rejected_cell("INVALID"), Cell::new(detail))
        }
        Verdict::UnmappedResponseValue { value, .. } => (
            rejected_cell("UNMAPPED"),
            Cell::new(format!("no concept mapping covers {value:?}")),
        ),
        Verdict::DomainMismatch {
            expected, found, ..
        } => (
            rejected_cell("MISMATCH"),
            Cell::new(format!("mapping domain {found}, question declares {expected}")),
        ),
    }
}

fn rejected_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Red)
        .add_attribute(Attribute::Bold)
}

fn instance_cell(instance: Option<u32>) -> Cell {
    match instance {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
