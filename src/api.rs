// ABOUTME: Facade over the domain services, the surface the boundary layer consumes
// ABOUTME: One entry point wiring enrollment, reconciliation, and the PR ledger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Core Surface
//!
//! The boundary layer (UI, transport, whatever embeds this crate)
//! talks to [`TrainingCore`] and the two week helpers; everything else
//! in this crate is plumbing behind it.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::errors::CoreResult;
use crate::models::{CalendarListItem, PersonalRecord, Program, WorkoutExercise};
use crate::services::calendar;
use crate::services::enrollment::{EnrollmentManager, FollowCheckpoint, FollowOutcome};
use crate::services::reconcile::{ReconcileOutcome, WeeklyReconciler};
use crate::services::records::PersonalRecordLedger;
use crate::store::{DocumentStore, TemplateResolver};

/// Entry point for the scheduling core.
///
/// None of the operations accept a cancellation signal: once a store
/// call is in flight it runs to completion, so the effects are
/// at-least-once from the caller's perspective.
#[derive(Debug, Clone)]
pub struct TrainingCore<S, R> {
    enrollment: EnrollmentManager<S, R>,
    reconciler: WeeklyReconciler<S>,
    ledger: PersonalRecordLedger<S>,
}

impl<S: DocumentStore, R: TemplateResolver> TrainingCore<S, R> {
    /// Wire the services with default configuration
    pub fn new(store: S, resolver: R) -> Self {
        Self::with_config(store, resolver, &CoreConfig::default())
    }

    /// Wire the services with explicit configuration
    pub fn with_config(store: S, resolver: R, config: &CoreConfig) -> Self {
        Self {
            enrollment: EnrollmentManager::new(store.clone(), resolver)
                .with_max_batch(config.max_batch),
            reconciler: WeeklyReconciler::new(store.clone()),
            ledger: PersonalRecordLedger::new(store),
        }
    }

    /// Follow a program (or restart it if already followed), expanding
    /// its schedule into dated planned workout instances.
    ///
    /// # Errors
    ///
    /// See [`EnrollmentManager::follow`].
    pub async fn follow_program(
        &self,
        user_id: Uuid,
        program: &Program,
        start_date: NaiveDate,
    ) -> CoreResult<FollowOutcome> {
        self.enrollment.follow(user_id, program, start_date).await
    }

    /// Resume a follow whose earlier chunks already committed.
    ///
    /// # Errors
    ///
    /// See [`EnrollmentManager::follow_resuming`].
    pub async fn resume_follow_program(
        &self,
        user_id: Uuid,
        program: &Program,
        start_date: NaiveDate,
        checkpoint: FollowCheckpoint,
    ) -> CoreResult<FollowOutcome> {
        self.enrollment
            .follow_resuming(user_id, program, start_date, Some(checkpoint))
            .await
    }

    /// Reconcile a drag-reordered 7-day window into the minimal set of
    /// date updates and persist them.
    ///
    /// # Errors
    ///
    /// See [`WeeklyReconciler::apply`].
    pub async fn reconcile_week(
        &self,
        user_id: Uuid,
        items: &[CalendarListItem],
    ) -> CoreResult<ReconcileOutcome> {
        self.reconciler.reconcile(user_id, items).await
    }

    /// Update the personal-record ledger from a finished workout,
    /// returning a label per new record.
    ///
    /// # Errors
    ///
    /// See [`PersonalRecordLedger::record_completion`].
    pub async fn record_completion(
        &self,
        user_id: Uuid,
        exercises: &[WorkoutExercise],
        existing: &HashMap<String, PersonalRecord>,
        workout_id: &str,
    ) -> CoreResult<Vec<String>> {
        self.ledger
            .record_completion(user_id, exercises, existing, workout_id)
            .await
    }

    /// ISO-8601 week number of `date`
    #[must_use]
    pub fn week_number_of(date: NaiveDate) -> u32 {
        calendar::week_number_of(date)
    }

    /// Monday..Sunday span containing `date`
    #[must_use]
    pub fn week_dates_of(date: NaiveDate) -> [NaiveDate; 7] {
        calendar::week_dates_of(date)
    }
}
