// ABOUTME: System-wide constants for the scheduling core
// ABOUTME: Batch limits, collection path builders, and environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Constants Module
//!
//! Hardcoded limits, store collection paths, and their environment
//! variable overrides.

use uuid::Uuid;

/// Write limits imposed by the document-store contract
pub mod limits {
    use std::env;

    /// Maximum operations a single store batch accepts. Batches are
    /// atomic only within themselves and are never chained into a
    /// larger transaction.
    pub const MAX_BATCH: usize = 400;

    /// Get the batch limit from environment or default
    #[must_use]
    pub fn max_batch() -> usize {
        env::var("STRIDE_MAX_BATCH")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(MAX_BATCH)
    }
}

/// Per-user collection paths in the document store
pub mod collections {
    use super::Uuid;

    /// Collection of a user's workout instances
    #[must_use]
    pub fn workouts(user_id: Uuid) -> String {
        format!("users/{user_id}/workouts")
    }

    /// Collection of a user's active program memberships
    #[must_use]
    pub fn active_programs(user_id: Uuid) -> String {
        format!("users/{user_id}/active_programs")
    }

    /// Collection of a user's personal records, one doc per exercise
    #[must_use]
    pub fn personal_records(user_id: Uuid) -> String {
        format!("users/{user_id}/personal_records")
    }
}

/// Fallback values used when reference data is unavailable
pub mod defaults {
    /// Category assigned to a draft whose template could not be resolved
    pub const FALLBACK_CATEGORY: &str = "other";
}
