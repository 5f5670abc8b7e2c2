//! Load-validated, indexed view of a questionnaire.
//!
//! `Schema::load` runs every authoring-time check once; after a successful
//! load the schema is immutable and safe to share across sessions (wrap it
//! in an `Arc` to run sessions in parallel). All lookups are read-only.

use std::collections::BTreeMap;

use crate::concept::{ConceptMapping, MappingKind};
use crate::error::{Result, SchemaError};
use crate::grid::GridDefinition;
use crate::ids::QuestionId;
use crate::question::{AnswerOption, Question, QuestionType, Questionnaire};
use crate::skip::SkipLogicRule;

/// Normalized lookup key for raw response values.
fn value_key(value: &str) -> String {
    value.trim().to_uppercase()
}

#[derive(Debug)]
pub struct Schema {
    questionnaire: Questionnaire,
    by_id: BTreeMap<QuestionId, usize>,
    order_index: BTreeMap<u32, QuestionId>,
    rules_from: BTreeMap<QuestionId, Vec<usize>>,
    loop_children: BTreeMap<QuestionId, Vec<QuestionId>>,
    question_mappings: BTreeMap<QuestionId, Vec<usize>>,
    response_mappings: BTreeMap<String, Vec<usize>>,
    pair_mappings: BTreeMap<(QuestionId, String), Vec<usize>>,
}

impl Schema {
    /// Build the indexed schema, failing on the first authoring defect.
    ///
    /// Checks performed here (and never again per response): unique question
    /// ids and display orders, unique option values per question, grid
    /// completeness, loop-parent typing, skip-rule membership and acyclicity,
    /// concept-mapping shape and question references, and the presence of a
    /// question-kind mapping for every question flagged `requires_mapping`.
    pub fn load(questionnaire: Questionnaire) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        let mut order_index = BTreeMap::new();

        for (index, question) in questionnaire.questions.iter().enumerate() {
            if by_id.insert(question.id.clone(), index).is_some() {
                return Err(SchemaError::DuplicateQuestionId(question.id.clone()));
            }
        }
        for question in &questionnaire.questions {
            if let Some(first) = order_index.insert(question.display_order, question.id.clone()) {
                return Err(SchemaError::DuplicateDisplayOrder {
                    order: question.display_order,
                    first,
                    second: question.id.clone(),
                });
            }
        }

        for question in &questionnaire.questions {
            check_options(question)?;
            check_grid(question)?;
            check_loop_parent(question, &by_id, &questionnaire.questions)?;
        }

        let rules_from = index_rules(&questionnaire.skip_rules, &by_id)?;
        detect_rule_cycles(&questionnaire.skip_rules, &by_id)?;

        let loop_children = index_loop_children(&questionnaire.questions);
        let (question_mappings, response_mappings, pair_mappings) =
            index_mappings(&questionnaire.mappings, &by_id)?;

        for question in &questionnaire.questions {
            if question.requires_mapping && !question_mappings.contains_key(&question.id) {
                return Err(SchemaError::MissingQuestionMapping(question.id.clone()));
            }
        }

        Ok(Self {
            questionnaire,
            by_id,
            order_index,
            rules_from,
            loop_children,
            question_mappings,
            response_mappings,
            pair_mappings,
        })
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn questions(&self) -> &[Question] {
        &self.questionnaire.questions
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.by_id
            .get(id)
            .map(|&index| &self.questionnaire.questions[index])
    }

    /// Question lookup that treats an unknown id as a schema defect.
    pub fn require_question(&self, id: &QuestionId) -> Result<&Question> {
        self.question(id)
            .ok_or_else(|| SchemaError::UnknownQuestion(id.clone()))
    }

    pub fn options_for(&self, id: &QuestionId) -> &[AnswerOption] {
        self.question(id).map(|q| q.options.as_slice()).unwrap_or(&[])
    }

    pub fn grid_for(&self, id: &QuestionId) -> Option<&GridDefinition> {
        self.question(id).and_then(|q| q.grid.as_ref())
    }

    /// Skip rules whose source is the given question, in declaration order.
    pub fn rules_from(&self, id: &QuestionId) -> Vec<&SkipLogicRule> {
        self.rules_from
            .get(id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.questionnaire.skip_rules[i])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Children of a loop question, ordered by loop position.
    pub fn loop_children(&self, id: &QuestionId) -> Vec<&Question> {
        self.loop_children
            .get(id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|child| self.question(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Concept mappings of kind `question` for the given question.
    pub fn question_mappings(&self, id: &QuestionId) -> Vec<&ConceptMapping> {
        self.question_mappings
            .get(id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.questionnaire.mappings[i])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First response-kind mapping matching the (normalized) raw value.
    pub fn response_mapping(&self, value: &str) -> Option<&ConceptMapping> {
        self.response_mappings
            .get(&value_key(value))
            .and_then(|indices| indices.first())
            .map(|&i| &self.questionnaire.mappings[i])
    }

    /// First pair-kind mapping matching the question and (normalized) value.
    pub fn pair_mapping(&self, id: &QuestionId, value: &str) -> Option<&ConceptMapping> {
        self.pair_mappings
            .get(&(id.clone(), value_key(value)))
            .and_then(|indices| indices.first())
            .map(|&i| &self.questionnaire.mappings[i])
    }

    /// First question of the questionnaire by display order, skipping loop
    /// children (those are only reachable through their loop).
    pub fn first_question(&self) -> Option<&Question> {
        self.order_index
            .values()
            .filter_map(|id| self.question(id))
            .find(|q| !q.is_loop_child())
    }

    /// Next question strictly after `order`, including loop children.
    pub fn next_in_order(&self, order: u32) -> Option<&Question> {
        self.order_index
            .range(order.saturating_add(1)..)
            .next()
            .and_then(|(_, id)| self.question(id))
    }

    /// Next promptable question strictly after `order`: loop children are
    /// skipped because sequential navigation never enters a loop body
    /// directly.
    pub fn next_prompt_after(&self, order: u32) -> Option<&Question> {
        self.order_index
            .range(order.saturating_add(1)..)
            .filter_map(|(_, id)| self.question(id))
            .find(|q| !q.is_loop_child())
    }
}

fn check_options(question: &Question) -> Result<()> {
    let mut seen = BTreeMap::new();
    for option in &question.options {
        if seen.insert(option.value.as_str(), ()).is_some() {
            return Err(SchemaError::DuplicateOptionValue {
                question: question.id.clone(),
                value: option.value.clone(),
            });
        }
    }
    Ok(())
}

fn check_grid(question: &Question) -> Result<()> {
    match (question.question_type, &question.grid) {
        (QuestionType::Grid, Some(grid)) if grid.is_complete() => Ok(()),
        (QuestionType::Grid, _) => Err(SchemaError::IncompleteGridDefinition(question.id.clone())),
        (other, Some(_)) => Err(SchemaError::UnexpectedGridDefinition {
            question: question.id.clone(),
            found: other.to_string(),
        }),
        (_, None) => Ok(()),
    }
}

fn check_loop_parent(
    question: &Question,
    by_id: &BTreeMap<QuestionId, usize>,
    questions: &[Question],
) -> Result<()> {
    let Some(parent_id) = &question.loop_parent else {
        return Ok(());
    };
    let Some(&parent_index) = by_id.get(parent_id) else {
        return Err(SchemaError::UnknownLoopParent {
            child: question.id.clone(),
            parent: parent_id.clone(),
        });
    };
    if questions[parent_index].question_type != QuestionType::Loop {
        return Err(SchemaError::LoopParentNotLoop {
            child: question.id.clone(),
            parent: parent_id.clone(),
        });
    }
    Ok(())
}

fn index_rules(
    rules: &[SkipLogicRule],
    by_id: &BTreeMap<QuestionId, usize>,
) -> Result<BTreeMap<QuestionId, Vec<usize>>> {
    let mut rules_from: BTreeMap<QuestionId, Vec<usize>> = BTreeMap::new();
    for (index, rule) in rules.iter().enumerate() {
        for endpoint in [&rule.source, &rule.target] {
            if !by_id.contains_key(endpoint) {
                return Err(SchemaError::SkipRuleUnknownQuestion(endpoint.clone()));
            }
        }
        rules_from
            .entry(rule.source.clone())
            .or_default()
            .push(index);
    }
    Ok(rules_from)
}

/// Detect cycles in the skip-rule graph with an iterative three-color DFS
/// over rule edges. Navigation must terminate, so any question on a rule
/// cycle is an authoring defect.
fn detect_rule_cycles(rules: &[SkipLogicRule], by_id: &BTreeMap<QuestionId, usize>) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut edges: BTreeMap<&QuestionId, Vec<&QuestionId>> = BTreeMap::new();
    for rule in rules {
        edges.entry(&rule.source).or_default().push(&rule.target);
    }

    let mut colors: BTreeMap<&QuestionId, Color> =
        by_id.keys().map(|id| (id, Color::White)).collect();

    for start in by_id.keys() {
        if colors[start] != Color::White {
            continue;
        }
        // stack of (node, next child index)
        let mut stack: Vec<(&QuestionId, usize)> = vec![(start, 0)];
        colors.insert(start, Color::Gray);
        while let Some((node, child_index)) = stack.pop() {
            let children = edges.get(node).map(Vec::as_slice).unwrap_or(&[]);
            if child_index < children.len() {
                stack.push((node, child_index + 1));
                let child = children[child_index];
                match colors[child] {
                    Color::Gray => return Err(SchemaError::SkipCycle(child.clone())),
                    Color::White => {
                        colors.insert(child, Color::Gray);
                        stack.push((child, 0));
                    }
                    Color::Black => {}
                }
            } else {
                colors.insert(node, Color::Black);
            }
        }
    }
    Ok(())
}

fn index_loop_children(questions: &[Question]) -> BTreeMap<QuestionId, Vec<QuestionId>> {
    let mut children: BTreeMap<QuestionId, Vec<&Question>> = BTreeMap::new();
    for question in questions {
        if let Some(parent) = &question.loop_parent {
            children.entry(parent.clone()).or_default().push(question);
        }
    }
    children
        .into_iter()
        .map(|(parent, mut list)| {
            list.sort_by_key(|q| (q.loop_position.unwrap_or(u32::MAX), q.display_order));
            (parent, list.into_iter().map(|q| q.id.clone()).collect())
        })
        .collect()
}

type MappingIndexes = (
    BTreeMap<QuestionId, Vec<usize>>,
    BTreeMap<String, Vec<usize>>,
    BTreeMap<(QuestionId, String), Vec<usize>>,
);

fn index_mappings(
    mappings: &[ConceptMapping],
    by_id: &BTreeMap<QuestionId, usize>,
) -> Result<MappingIndexes> {
    let mut question_mappings: BTreeMap<QuestionId, Vec<usize>> = BTreeMap::new();
    let mut response_mappings: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut pair_mappings: BTreeMap<(QuestionId, String), Vec<usize>> = BTreeMap::new();

    for (index, mapping) in mappings.iter().enumerate() {
        mapping.check_shape()?;
        if let Some(question) = &mapping.question
            && !by_id.contains_key(question)
        {
            return Err(SchemaError::MappingUnknownQuestion(question.clone()));
        }
        match (mapping.kind, &mapping.question, &mapping.response_value) {
            (MappingKind::Question, Some(question), _) => {
                question_mappings
                    .entry(question.clone())
                    .or_default()
                    .push(index);
            }
            (MappingKind::Response, _, Some(value)) => {
                response_mappings
                    .entry(value_key(value))
                    .or_default()
                    .push(index);
            }
            (MappingKind::Pair, Some(question), Some(value)) => {
                pair_mappings
                    .entry((question.clone(), value_key(value)))
                    .or_default()
                    .push(index);
            }
            // unreachable: check_shape rejected every other combination
            _ => {}
        }
    }
    Ok((question_mappings, response_mappings, pair_mappings))
}
