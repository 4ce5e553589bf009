// ABOUTME: Expands a program's static schedule into dated workout drafts
// ABOUTME: Batch-resolves templates up front, then expands purely in memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Schedule Expansion
//!
//! Deterministic: one draft per schedule item, in schedule order, dated
//! `start_date + day_offset` with plain calendar addition (no clamping,
//! offsets may cross month and year boundaries). Items sharing a day
//! offset are all kept; same-day duplicates are legal.
//!
//! Template resolution is fault-isolated per item. A template that is
//! missing or unreachable downgrades its draft to an empty-exercise
//! fallback and never fails the whole expansion.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::constants::defaults;
use crate::models::{Program, ScheduleItem, WorkoutInstanceDraft};
use crate::store::{TemplateOutcome, TemplateResolver};

fn generated_label(program_title: &str) -> String {
    format!("Part of the {program_title} program")
}

fn draft_for_item(
    program: &Program,
    index: usize,
    item: &ScheduleItem,
    date: NaiveDate,
    resolved: Option<&TemplateOutcome>,
) -> WorkoutInstanceDraft {
    let mut draft = WorkoutInstanceDraft {
        name: item.workout_title.clone(),
        scheduled_date: date,
        exercises: Vec::new(),
        category: program.category.clone(),
        subcategory: None,
        notes: None,
        program_id: program.id.clone(),
        schedule_index: index,
        day_offset: item.day_offset,
        template_missing: false,
    };

    let template_note = match resolved {
        Some(TemplateOutcome::Found(template)) => {
            draft.exercises = template.exercises.clone();
            draft.category = template.category.clone();
            draft.subcategory = template.subcategory.clone();
            template.note.clone()
        }
        Some(TemplateOutcome::Missing | TemplateOutcome::Failed { .. }) => {
            draft.category = defaults::FALLBACK_CATEGORY.to_owned();
            draft.template_missing = true;
            None
        }
        None => None,
    };

    draft.notes = item
        .description
        .clone()
        .or(template_note)
        .or_else(|| Some(generated_label(&program.title)));
    draft
}

/// Expand `program.schedule` into dated drafts relative to `start_date`.
///
/// Distinct template ids are resolved with one concurrent fan-out
/// before expansion; resolution failures are logged per item and
/// surfaced only through each draft's `template_missing` marker.
pub async fn expand<R: TemplateResolver>(
    program: &Program,
    start_date: NaiveDate,
    resolver: &R,
) -> Vec<WorkoutInstanceDraft> {
    let mut distinct_ids: Vec<String> = program
        .schedule
        .iter()
        .filter_map(|item| item.workout_template_id.clone())
        .collect();
    distinct_ids.sort_unstable();
    distinct_ids.dedup();

    let resolved: HashMap<String, TemplateOutcome> = if distinct_ids.is_empty() {
        HashMap::new()
    } else {
        resolver.resolve_many(&distinct_ids).await
    };

    program
        .schedule
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let date = start_date
                .checked_add_days(Days::new(u64::from(item.day_offset)))
                .unwrap_or(start_date);
            let outcome = item
                .workout_template_id
                .as_deref()
                .and_then(|id| resolved.get(id));
            if let Some(TemplateOutcome::Missing | TemplateOutcome::Failed { .. }) = outcome {
                warn!(
                    program_id = %program.id,
                    schedule_index = index,
                    template_id = ?item.workout_template_id,
                    "template unresolved, emitting fallback draft"
                );
            }
            draft_for_item(program, index, item, date, outcome)
        })
        .collect()
}
