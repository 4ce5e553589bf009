// ABOUTME: Environment-based configuration for the scheduling core
// ABOUTME: Defaults overridable through STRIDE_* environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! Environment-first configuration, no config files

use std::env;

use crate::constants::limits;

/// Runtime configuration for the core
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Maximum operations per store batch commit
    pub max_batch: usize,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_batch: limits::MAX_BATCH,
            log_level: "info".into(),
        }
    }
}

impl CoreConfig {
    /// Load configuration from the environment, falling back to
    /// defaults for anything unset or unparseable
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_batch: limits::max_batch(),
            log_level: env::var("STRIDE_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }
}
