// ABOUTME: Core data models for programs, workout instances, and personal records
// ABOUTME: Defines the documents this core reads and writes through the store boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Data Model
//!
//! All times crossing into this core are normalized at the store-adapter
//! boundary: scheduled days are `chrono::NaiveDate` (calendar-day
//! semantics, no time-of-day), event timestamps are `DateTime<Utc>`.
//! Core logic never branches on a store-specific timestamp wrapper.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a program's schedule relates to calendar time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    /// One schedule item per day, back to back
    Daily,
    /// Items spread over a longer period with gaps
    Period,
}

/// One entry in a program's static schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleItem {
    /// Days after the enrollment start date this item is due
    pub day_offset: u32,
    /// Optional link to a reusable workout template
    pub workout_template_id: Option<String>,
    /// Display title for the resulting workout instance
    pub workout_title: String,
    /// Item-level note, preferred over the template's note
    pub description: Option<String>,
}

/// A named, reusable training plan. Immutable from this core's point of
/// view; edited only by admin tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// Stable program id
    pub id: String,
    /// Display title
    pub title: String,
    /// Human-readable duration ("6 weeks")
    pub duration_label: String,
    /// Schedule shape
    pub program_type: ProgramType,
    /// Training category ("strength", "running", ...)
    pub category: String,
    /// Static schedule, day offsets relative to enrollment start
    pub schedule: Vec<ScheduleItem>,
}

/// One set within an exercise, as logged by the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    /// Weight lifted, in kilograms
    pub weight_kg: f64,
    /// Repetitions performed
    pub reps: u32,
    /// Whether the user marked this set done
    pub is_completed: bool,
}

/// An exercise with its logged sets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    /// Stable exercise id, the personal-record ledger key
    pub exercise_id: String,
    /// Display name
    pub exercise_name: String,
    /// Logged sets in order
    pub sets: Vec<ExerciseSet>,
}

/// Read-only snapshot of a reusable workout template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTemplateSnapshot {
    /// Exercises the template prescribes
    pub exercises: Vec<WorkoutExercise>,
    /// Training category
    pub category: String,
    /// Optional subcategory
    pub subcategory: Option<String>,
    /// Template-level note, used when the schedule item has none
    pub note: Option<String>,
}

/// Lifecycle status of a workout instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    /// Created but not started; the only state restart cleanup deletes
    Planned,
    /// Started but not finished
    InProgress,
    /// Finished; never touched by enrollment or restart
    Completed,
}

impl WorkoutStatus {
    /// Wire representation, matching the serde rename
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// A concrete, per-user, dated occurrence of a workout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutInstance {
    /// Document id
    pub id: String,
    /// Owning user
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Lifecycle status
    pub status: WorkoutStatus,
    /// Calendar day this instance is scheduled on. `None` when the
    /// stored date was missing or unparseable; the reconciler always
    /// treats that as needing reassignment.
    pub scheduled_date: Option<NaiveDate>,
    /// Exercises, possibly empty for template-less items
    pub exercises: Vec<WorkoutExercise>,
    /// Training category
    pub category: String,
    /// Optional subcategory
    pub subcategory: Option<String>,
    /// Program this instance was expanded from, if any
    pub program_id: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Expander output: a workout instance minus identity, plus a
/// soft-failure marker for the caller to log
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutInstanceDraft {
    /// Display name, from the schedule item title
    pub name: String,
    /// Enrollment start plus the item's day offset
    pub scheduled_date: NaiveDate,
    /// Exercises merged from the resolved template
    pub exercises: Vec<WorkoutExercise>,
    /// Category from the template, or the fallback
    pub category: String,
    /// Subcategory from the template
    pub subcategory: Option<String>,
    /// Item description, template note, or a generated label
    pub notes: Option<String>,
    /// Source program
    pub program_id: String,
    /// Position of the source item within the program schedule
    pub schedule_index: usize,
    /// Day offset of the source item
    pub day_offset: u32,
    /// True when the item referenced a template that could not be
    /// resolved and the draft fell back to empty exercises
    pub template_missing: bool,
}

/// The record that a user is currently following a program.
/// One per (user, program); merge-upserted on every follow or restart,
/// never deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveProgramMembership {
    /// Program being followed
    pub program_id: String,
    /// When the latest follow or restart happened
    pub started_at: DateTime<Utc>,
    /// Program title, denormalized for display
    pub title: String,
}

/// Best-ever completed lift for one exercise. At most one live document
/// per (user, exercise); replaced wholesale, never merged, when a
/// strictly greater weight is observed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalRecord {
    /// Ledger key
    pub exercise_id: String,
    /// Display name at the time of the record
    pub exercise_name: String,
    /// Record weight in kilograms; non-decreasing over the ledger's life
    pub weight_kg: f64,
    /// Reps achieved at that weight (first occurrence on ties)
    pub reps: u32,
    /// When the record was set
    pub date: DateTime<Utc>,
    /// Workout instance the record came from
    pub workout_id: String,
}

/// One element of the UI-held, ordered 7-day calendar sequence.
///
/// Invariant: exactly one `Header` per calendar day in the window, and
/// every workout belongs to the nearest preceding header in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarListItem {
    /// Day separator
    Header {
        /// The day this header labels
        date: NaiveDate,
    },
    /// A workout displayed under the preceding header
    Workout(WorkoutInstance),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn workout_status_wire_form_matches_serde() {
        for status in [
            WorkoutStatus::Planned,
            WorkoutStatus::InProgress,
            WorkoutStatus::Completed,
        ] {
            let value = serde_json::to_value(status).unwrap();
            assert_eq!(value.as_str().unwrap(), status.as_str());
        }
    }

    #[test]
    fn scheduled_date_serializes_as_plain_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3);
        let value = serde_json::json!({ "scheduled_date": date });
        assert_eq!(value["scheduled_date"], "2024-06-03");
    }
}
