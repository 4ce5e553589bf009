// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: Configures log levels, formatters, and output destinations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! Structured logging built on `tracing`
//!
//! The core itself only emits `tracing` events; this module is the
//! opt-in subscriber setup for binaries and test harnesses embedding
//! the core.

use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Build a configuration from `STRIDE_LOG_LEVEL` and
    /// `STRIDE_LOG_FORMAT` (json|pretty|compact)
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("STRIDE_LOG_LEVEL").unwrap_or_else(|_| "info".into());
        let format = match env::var("STRIDE_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }

    /// Install a global subscriber for this configuration.
    ///
    /// # Errors
    ///
    /// Fails when a global subscriber is already installed.
    pub fn init(&self) -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.clone()));
        let registry = tracing_subscriber::registry().with(filter);
        match self.format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
            LogFormat::Compact => registry.with(fmt::layer().compact()).try_init()?,
        }
        Ok(())
    }
}

/// Install logging straight from the environment
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_from_env() -> anyhow::Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_pretty_info() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn every_format_builds_a_layer() {
        // Constructing (not installing) each formatter keeps the
        // required subscriber features honest
        let _json = fmt::layer::<tracing_subscriber::Registry>().json();
        let _pretty = fmt::layer::<tracing_subscriber::Registry>().pretty();
        let _compact = fmt::layer::<tracing_subscriber::Registry>().compact();
    }
}
