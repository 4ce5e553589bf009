// ABOUTME: Unified error taxonomy for enrollment, reconciliation, and record tracking
// ABOUTME: Distinguishes full failure, partial commits, and aggregated fan-out failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Error Handling
//!
//! Every top-level operation must let the boundary layer distinguish
//! "fully succeeded", "partially succeeded with N of M writes applied",
//! and "failed with no writes applied". The variants here carry the
//! counts needed for that distinction; nothing is masked or rolled back
//! on the caller's behalf.

use thiserror::Error;

/// A single failed per-document update inside a reconciliation fan-out
#[derive(Debug)]
pub struct ReconcileFailure {
    /// Id of the workout whose date update failed
    pub workout_id: String,
    /// Store-reported failure message
    pub message: String,
}

/// Unified error type for the scheduling core
#[derive(Debug, Error)]
pub enum CoreError {
    /// A program with no schedule items cannot be followed
    #[error("program '{program_id}' has an empty schedule")]
    EmptySchedule {
        /// Id of the offending program
        program_id: String,
    },

    /// A referenced document (template, instance, membership) is absent
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable name of the missing resource
        resource: String,
    },

    /// Network or timeout failure at the store boundary; safe to retry
    #[error("transient store failure: {message}")]
    TransientStore {
        /// What the store reported
        message: String,
    },

    /// Some enrollment chunks committed before a later one failed.
    ///
    /// Committed chunks stay committed; there is no compensating
    /// rollback. `succeeded_chunks` is exactly the checkpoint a caller
    /// needs to resume the follow without rewriting earlier chunks.
    #[error(
        "enrollment partially committed: {succeeded_chunks} chunk(s) applied, chunk {failed_at_chunk} failed"
    )]
    PartialCommit {
        /// Number of chunks whose commits resolved before the failure
        succeeded_chunks: usize,
        /// Zero-based index of the chunk that failed
        failed_at_chunk: usize,
        /// Instances written by the chunks that did commit
        created_so_far: usize,
        /// Underlying commit failure
        #[source]
        source: anyhow::Error,
    },

    /// A subset of the reconciler's per-document updates failed.
    ///
    /// The updates are independent and unordered; the ones that
    /// succeeded are not reverted.
    #[error("week reconciliation applied {succeeded} update(s), {} failed", failed.len())]
    ReconcileFailed {
        /// Updates that were applied
        succeeded: usize,
        /// Updates that were not, with per-document messages
        failed: Vec<ReconcileFailure>,
    },

    /// Any other store-level failure
    #[error("store operation failed")]
    Store {
        /// Underlying store error
        #[from]
        source: anyhow::Error,
    },
}

impl CoreError {
    /// Wrap a raw store error
    pub fn store(source: anyhow::Error) -> Self {
        Self::Store { source }
    }

    /// Missing-resource convenience constructor
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Whether a retry of the whole operation is known to be safe
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStore { .. })
    }
}

/// Result type alias for convenience
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_commit_reports_counts() {
        let err = CoreError::PartialCommit {
            succeeded_chunks: 2,
            failed_at_chunk: 2,
            created_so_far: 800,
            source: anyhow::anyhow!("commit refused"),
        };
        let text = err.to_string();
        assert!(text.contains("2 chunk(s) applied"));
        assert!(text.contains("chunk 2 failed"));
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(CoreError::TransientStore {
            message: "timeout".into()
        }
        .is_retryable());
        assert!(!CoreError::EmptySchedule {
            program_id: "p1".into()
        }
        .is_retryable());
    }
}
