// ABOUTME: Maintains the one-entry-per-exercise best-lift ledger
// ABOUTME: Strictly monotonic weights, wholesale replacement, concurrent writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Personal Records
//!
//! The ledger keeps only the current best per exercise: a record is
//! replaced wholesale when a strictly greater completed weight is
//! observed, an equal weight never counts, and prior values are
//! discarded (no PR history).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tracing::info;
use uuid::Uuid;

use crate::constants::collections;
use crate::errors::{CoreError, CoreResult};
use crate::models::{PersonalRecord, WorkoutExercise};
use crate::store::{doc_path, DocumentStore, WriteBatch};

/// Best completed set of one exercise: the maximum completed weight and
/// the reps of the first completed set achieving it
fn best_completed_set(exercise: &WorkoutExercise) -> Option<(f64, u32)> {
    let mut best: Option<(f64, u32)> = None;
    for set in exercise.sets.iter().filter(|s| s.is_completed) {
        match best {
            Some((weight, _)) if set.weight_kg <= weight => {}
            _ => best = Some((set.weight_kg, set.reps)),
        }
    }
    best.filter(|(weight, _)| *weight > 0.0)
}

/// Compute the ledger replacements a completed workout produces.
///
/// Pure: one candidate record per exercise whose best completed weight
/// strictly beats the existing entry (or that has no entry yet).
#[must_use]
pub fn improvements(
    exercises: &[WorkoutExercise],
    existing: &HashMap<String, PersonalRecord>,
    workout_id: &str,
    now: DateTime<Utc>,
) -> Vec<PersonalRecord> {
    let mut new_records = Vec::new();
    for exercise in exercises {
        let Some((weight_kg, reps)) = best_completed_set(exercise) else {
            continue;
        };
        let beats_existing = existing
            .get(&exercise.exercise_id)
            .is_none_or(|record| weight_kg > record.weight_kg);
        if beats_existing {
            new_records.push(PersonalRecord {
                exercise_id: exercise.exercise_id.clone(),
                exercise_name: exercise.exercise_name.clone(),
                weight_kg,
                reps,
                date: now,
                workout_id: workout_id.to_owned(),
            });
        }
    }
    new_records
}

/// Display label for a freshly set record
fn record_label(record: &PersonalRecord) -> String {
    format!("{}: {}kg", record.exercise_name, record.weight_kg)
}

/// Best-lift ledger over a document store
#[derive(Debug, Clone)]
pub struct PersonalRecordLedger<S> {
    store: S,
}

impl<S: DocumentStore> PersonalRecordLedger<S> {
    /// Create a ledger over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Update the ledger from a completed workout's exercises.
    ///
    /// All replacement writes are issued concurrently and awaited
    /// together before returning. Returns one `"<name>: <weight>kg"`
    /// label per record actually beaten.
    ///
    /// # Errors
    ///
    /// Store write failures propagate unmasked; records whose writes
    /// succeeded stay written.
    pub async fn record_completion(
        &self,
        user_id: Uuid,
        exercises: &[WorkoutExercise],
        existing: &HashMap<String, PersonalRecord>,
        workout_id: &str,
    ) -> CoreResult<Vec<String>> {
        let new_records = improvements(exercises, existing, workout_id, Utc::now());
        if new_records.is_empty() {
            return Ok(Vec::new());
        }

        let records_collection = collections::personal_records(user_id);
        let writes = new_records.iter().map(|record| {
            let path = doc_path(&records_collection, &record.exercise_id);
            async move {
                // Full replace, not merge: old reps/date must not
                // survive under the new weight
                let doc = serde_json::to_value(record).map_err(anyhow::Error::from)?;
                let mut batch = self.store.batch();
                batch.set(&path, doc, false);
                batch.commit().await
            }
        });

        for result in join_all(writes).await {
            result.map_err(CoreError::store)?;
        }

        let labels: Vec<String> = new_records.iter().map(record_label).collect();
        info!(user_id = %user_id, new_records = labels.len(), "personal records updated");
        Ok(labels)
    }
}
