// ABOUTME: Orchestrates following and restarting a training program
// ABOUTME: Delete-before-create cleanup, chunked sequential batch writes, resumable checkpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Program Enrollment
//!
//! `follow` expands a program into workout instances and persists them
//! in chunks of at most the store's batch limit. Restart cleanup is
//! fully awaited before any creation begins, so a restart can never
//! delete instances created by the same call.
//!
//! Instance ids are deterministic (a hash of user, program, schedule
//! index, and day offset), so every chunk write is an upsert and the
//! whole operation is idempotent end to end: retrying a first-time
//! follow after a partial failure overwrites the same documents instead
//! of duplicating them.
//!
//! Two enrollments racing for the same (user, program) are not
//! detected or prevented; the store's per-document writes keep the
//! outcome well-formed but which `started_at` wins is unspecified.

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::{collections, limits};
use crate::errors::{CoreError, CoreResult};
use crate::models::{
    ActiveProgramMembership, Program, WorkoutInstance, WorkoutInstanceDraft, WorkoutStatus,
};
use crate::services::schedule;
use crate::store::{doc_path, DocumentStore, Filter, TemplateResolver, WriteBatch};

/// Result of a follow or restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    /// Instances written by this call
    pub created: usize,
    /// Stale planned instances deleted by this call
    pub cleaned: usize,
}

/// Resume point for a partially committed follow.
///
/// Built from [`CoreError::PartialCommit`]: passing the error's
/// `succeeded_chunks` back as `chunk_index` re-runs the follow while
/// skipping the chunks already known to have committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowCheckpoint {
    /// First chunk index that still needs committing
    pub chunk_index: usize,
}

/// Deterministic instance id: stable across retries of the same
/// (user, program, item), which is what makes follow idempotent
fn instance_id(user_id: Uuid, program_id: &str, schedule_index: usize, day_offset: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(program_id.as_bytes());
    hasher.update((schedule_index as u64).to_le_bytes());
    hasher.update(day_offset.to_le_bytes());
    hex::encode(&hasher.finalize()[..16])
}

/// Follow/restart orchestrator over a store and template resolver
#[derive(Debug, Clone)]
pub struct EnrollmentManager<S, R> {
    store: S,
    resolver: R,
    max_batch: usize,
}

impl<S: DocumentStore, R: TemplateResolver> EnrollmentManager<S, R> {
    /// Create a manager using the store's standard batch limit
    pub fn new(store: S, resolver: R) -> Self {
        Self {
            store,
            resolver,
            max_batch: limits::max_batch(),
        }
    }

    /// Override the chunk size (tests drive this down to force
    /// multi-chunk commits)
    #[must_use]
    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(2);
        self
    }

    /// Follow a program, restarting it when a membership already
    /// exists. See [`Self::follow_resuming`] for the write protocol.
    ///
    /// # Errors
    ///
    /// `EmptySchedule` for a schedule-less program (no writes);
    /// `PartialCommit` when a chunk after the first fails;
    /// `Store` when cleanup or the first chunk fails.
    pub async fn follow(
        &self,
        user_id: Uuid,
        program: &Program,
        start_date: NaiveDate,
    ) -> CoreResult<FollowOutcome> {
        self.follow_resuming(user_id, program, start_date, None).await
    }

    /// Follow with an optional resume checkpoint.
    ///
    /// Write protocol: restart cleanup (fully awaited), then instance
    /// chunks of at most the batch limit, committed strictly
    /// sequentially. The membership merge-upsert rides in the first
    /// chunk so membership and the first slice of instances commit
    /// together. Chunks are not linked by any cross-chunk transaction:
    /// a failure after chunk 0 leaves earlier chunks committed, and the
    /// returned `PartialCommit` carries the checkpoint to resume from.
    ///
    /// With a checkpoint, cleanup is skipped — the original call
    /// already performed it, and re-running it would delete the
    /// instances committed by the chunks being skipped.
    ///
    /// No cancellation signal is accepted; in-flight store calls run to
    /// completion even if the caller goes away.
    ///
    /// # Errors
    ///
    /// As [`Self::follow`].
    pub async fn follow_resuming(
        &self,
        user_id: Uuid,
        program: &Program,
        start_date: NaiveDate,
        checkpoint: Option<FollowCheckpoint>,
    ) -> CoreResult<FollowOutcome> {
        if program.schedule.is_empty() {
            return Err(CoreError::EmptySchedule {
                program_id: program.id.clone(),
            });
        }

        let membership_path = doc_path(&collections::active_programs(user_id), &program.id);
        let start_chunk = checkpoint.map_or(0, |c| c.chunk_index);

        let mut cleaned = 0;
        if start_chunk == 0 {
            let is_restart = self
                .store
                .get(&membership_path)
                .await
                .map_err(CoreError::store)?
                .is_some();
            if is_restart {
                cleaned = self.clean_planned_instances(user_id, &program.id).await?;
            }
        }

        let drafts = schedule::expand(program, start_date, &self.resolver).await;
        let chunks = self.build_chunks(user_id, program, &drafts)?;
        let total_chunks = chunks.len();

        let membership = ActiveProgramMembership {
            program_id: program.id.clone(),
            started_at: Utc::now(),
            title: program.title.clone(),
        };
        let membership_doc =
            serde_json::to_value(&membership).map_err(|e| CoreError::store(e.into()))?;

        let mut created = 0;
        for (chunk_index, chunk) in chunks.into_iter().enumerate() {
            if chunk_index < start_chunk {
                continue;
            }
            let chunk_len = chunk.len();
            let mut batch = self.store.batch();
            if chunk_index == 0 {
                batch.set(&membership_path, membership_doc.clone(), true);
            }
            for (path, doc) in chunk {
                batch.set(&path, doc, false);
            }
            if let Err(source) = batch.commit().await {
                if chunk_index == 0 {
                    return Err(CoreError::Store { source });
                }
                return Err(CoreError::PartialCommit {
                    succeeded_chunks: chunk_index,
                    failed_at_chunk: chunk_index,
                    created_so_far: created,
                    source,
                });
            }
            debug!(
                program_id = %program.id,
                chunk_index,
                chunk_len,
                "enrollment chunk committed"
            );
            created += chunk_len;
        }

        info!(
            user_id = %user_id,
            program_id = %program.id,
            created,
            cleaned,
            total_chunks,
            resumed_from = start_chunk,
            "program follow complete"
        );
        Ok(FollowOutcome { created, cleaned })
    }

    /// Delete every Planned instance of this program, fully awaited.
    /// Completed and InProgress instances are never touched.
    async fn clean_planned_instances(
        &self,
        user_id: Uuid,
        program_id: &str,
    ) -> CoreResult<usize> {
        let workouts = collections::workouts(user_id);
        let filters = [
            Filter::eq("program_id", program_id),
            Filter::eq("status", WorkoutStatus::Planned.as_str()),
        ];
        let stale = self
            .store
            .query(&workouts, &filters)
            .await
            .map_err(CoreError::store)?;

        // Paths must outlive the borrowed delete futures
        let paths: Vec<String> = stale
            .iter()
            .map(|doc| doc_path(&workouts, &doc.id))
            .collect();
        let deletions = paths.iter().map(|path| self.store.delete(path));
        for result in futures_util::future::join_all(deletions).await {
            result.map_err(CoreError::store)?;
        }
        debug!(program_id, cleaned = stale.len(), "restart cleanup done");
        Ok(stale.len())
    }

    /// Slice instance writes into commit-sized chunks. The first chunk
    /// reserves one slot for the membership upsert.
    fn build_chunks(
        &self,
        user_id: Uuid,
        program: &Program,
        drafts: &[WorkoutInstanceDraft],
    ) -> CoreResult<Vec<Vec<(String, Value)>>> {
        let workouts = collections::workouts(user_id);
        let mut docs = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = instance_id(user_id, &program.id, draft.schedule_index, draft.day_offset);
            let instance = WorkoutInstance {
                id: id.clone(),
                user_id,
                name: draft.name.clone(),
                status: WorkoutStatus::Planned,
                scheduled_date: Some(draft.scheduled_date),
                exercises: draft.exercises.clone(),
                category: draft.category.clone(),
                subcategory: draft.subcategory.clone(),
                program_id: Some(program.id.clone()),
                notes: draft.notes.clone(),
            };
            let doc = serde_json::to_value(&instance).map_err(|e| CoreError::store(e.into()))?;
            docs.push((doc_path(&workouts, &id), doc));
        }

        let first_len = docs.len().min(self.max_batch - 1);
        let rest = docs.split_off(first_len);
        let mut chunks = vec![docs];
        for chunk in rest.chunks(self.max_batch) {
            chunks.push(chunk.to_vec());
        }
        Ok(chunks)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_stable_and_distinct() {
        let user = Uuid::from_u128(7);
        let a = instance_id(user, "p1", 0, 0);
        let b = instance_id(user, "p1", 0, 0);
        let c = instance_id(user, "p1", 1, 0);
        let d = instance_id(Uuid::from_u128(8), "p1", 0, 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.len(), 32);
    }
}
