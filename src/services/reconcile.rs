// ABOUTME: Diffs a drag-reordered week against stored dates into minimal updates
// ABOUTME: Pure planning over an immutable snapshot, concurrent per-document apply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Weekly Reconciliation
//!
//! Drag gestures fire on *any* reorder, including ones that never cross
//! a day boundary. Planning therefore stages an update only for items
//! whose effective day actually changed, which avoids needless writes
//! and keeps completion timestamps of unmoved items intact.
//!
//! Planning is a pure function over the UI's list snapshot; this core
//! never mutates UI-held state. Applying fans the staged updates out as
//! independent per-document calls — each targets a disjoint document,
//! so no cross-document atomicity is needed — and aggregates every
//! failure into one error without retrying or reverting the rest.

use chrono::NaiveDate;
use futures_util::future::join_all;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::collections;
use crate::errors::{CoreError, CoreResult, ReconcileFailure};
use crate::models::CalendarListItem;
use crate::store::{doc_path, DocumentStore};

/// One staged date change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateReassignment {
    /// Workout to move
    pub workout_id: String,
    /// Stored date, `None` when missing or unparseable
    pub from: Option<NaiveDate>,
    /// Day of the header the workout now sits under
    pub to: NaiveDate,
}

/// Output of planning one 7-day window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Minimal set of date changes, in list order
    pub reassignments: Vec<DateReassignment>,
    /// Workouts that appeared before any header and were left untouched
    pub skipped_orphans: usize,
}

impl ReconcilePlan {
    /// Whether nothing needs writing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reassignments.is_empty()
    }
}

/// Walk the ordered list once and stage a change for every workout
/// whose stored calendar day differs from the nearest preceding header.
///
/// A workout with no stored date always counts as different and is
/// force-assigned to its header. Workouts before the first header get
/// no date reassignment; that is an accepted edge case, not an error.
#[must_use]
pub fn plan(items: &[CalendarListItem]) -> ReconcilePlan {
    let mut current_header: Option<NaiveDate> = None;
    let mut plan = ReconcilePlan::default();

    for item in items {
        match item {
            CalendarListItem::Header { date } => current_header = Some(*date),
            CalendarListItem::Workout(workout) => {
                let Some(header_date) = current_header else {
                    debug!(workout_id = %workout.id, "workout before first header, skipping");
                    plan.skipped_orphans += 1;
                    continue;
                };
                if workout.scheduled_date != Some(header_date) {
                    plan.reassignments.push(DateReassignment {
                        workout_id: workout.id.clone(),
                        from: workout.scheduled_date,
                        to: header_date,
                    });
                }
            }
        }
    }
    plan
}

/// Outcome of a fully applied plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Number of per-document updates applied
    pub updated: usize,
}

/// Applies reconciliation plans against a store
#[derive(Debug, Clone)]
pub struct WeeklyReconciler<S> {
    store: S,
}

impl<S: DocumentStore> WeeklyReconciler<S> {
    /// Create a reconciler over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Plan and apply in one step
    ///
    /// # Errors
    ///
    /// As [`Self::apply`].
    pub async fn reconcile(
        &self,
        user_id: Uuid,
        items: &[CalendarListItem],
    ) -> CoreResult<ReconcileOutcome> {
        self.apply(user_id, &plan(items)).await
    }

    /// Issue every staged update concurrently and await them together.
    ///
    /// # Errors
    ///
    /// `ReconcileFailed` aggregating each failed update when any subset
    /// fails; the updates that succeeded stay applied.
    pub async fn apply(
        &self,
        user_id: Uuid,
        plan: &ReconcilePlan,
    ) -> CoreResult<ReconcileOutcome> {
        if plan.is_empty() {
            return Ok(ReconcileOutcome { updated: 0 });
        }

        let workouts = collections::workouts(user_id);
        let updates = plan.reassignments.iter().map(|change| {
            let path = doc_path(&workouts, &change.workout_id);
            let partial = json!({ "scheduled_date": change.to });
            async move {
                self.store
                    .update(&path, partial)
                    .await
                    .map_err(|err| ReconcileFailure {
                        workout_id: change.workout_id.clone(),
                        message: err.to_string(),
                    })
            }
        });

        let mut failed = Vec::new();
        for result in join_all(updates).await {
            if let Err(failure) = result {
                failed.push(failure);
            }
        }

        let updated = plan.reassignments.len() - failed.len();
        if failed.is_empty() {
            info!(user_id = %user_id, updated, "week reconciled");
            Ok(ReconcileOutcome { updated })
        } else {
            Err(CoreError::ReconcileFailed {
                succeeded: updated,
                failed,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{WorkoutInstance, WorkoutStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn workout(id: &str, scheduled: Option<NaiveDate>) -> CalendarListItem {
        CalendarListItem::Workout(WorkoutInstance {
            id: id.into(),
            user_id: Uuid::nil(),
            name: id.into(),
            status: WorkoutStatus::Planned,
            scheduled_date: scheduled,
            exercises: Vec::new(),
            category: "strength".into(),
            subcategory: None,
            program_id: None,
            notes: None,
        })
    }

    fn header(d: NaiveDate) -> CalendarListItem {
        CalendarListItem::Header { date: d }
    }

    #[test]
    fn single_cross_day_move_stages_exactly_one_update() {
        let tue = date(2024, 6, 4);
        let wed = date(2024, 6, 5);
        // w1 dragged from Tuesday to Wednesday; w2 untouched
        let items = vec![
            header(tue),
            workout("w2", Some(tue)),
            header(wed),
            workout("w1", Some(tue)),
        ];

        let plan = plan(&items);
        assert_eq!(plan.reassignments.len(), 1);
        assert_eq!(
            plan.reassignments[0],
            DateReassignment {
                workout_id: "w1".into(),
                from: Some(tue),
                to: wed,
            }
        );
    }

    #[test]
    fn same_day_reorder_stages_nothing() {
        let tue = date(2024, 6, 4);
        let items = vec![
            header(tue),
            workout("w2", Some(tue)),
            workout("w1", Some(tue)),
        ];
        assert!(plan(&items).is_empty());
    }

    #[test]
    fn missing_stored_date_is_always_reassigned() {
        let tue = date(2024, 6, 4);
        let items = vec![header(tue), workout("w1", None)];
        let plan = plan(&items);
        assert_eq!(plan.reassignments.len(), 1);
        assert_eq!(plan.reassignments[0].from, None);
        assert_eq!(plan.reassignments[0].to, tue);
    }

    #[test]
    fn workouts_before_first_header_are_skipped() {
        let tue = date(2024, 6, 4);
        let items = vec![workout("stray", Some(tue)), header(tue), workout("w1", Some(tue))];
        let plan = plan(&items);
        assert!(plan.is_empty());
        assert_eq!(plan.skipped_orphans, 1);
    }

    #[test]
    fn full_week_with_no_moves_is_a_no_op() {
        let monday = date(2024, 6, 3);
        let mut items = Vec::new();
        for offset in 0..7 {
            let day = monday.checked_add_days(chrono::Days::new(offset)).unwrap();
            items.push(header(day));
            items.push(workout(&format!("w{offset}"), Some(day)));
        }
        assert!(plan(&items).is_empty());
    }
}
