// ABOUTME: Main library entry point for the stride scheduling core
// ABOUTME: Program enrollment, weekly calendar reconciliation, and PR tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

#![deny(unsafe_code)]

//! # Stride Core
//!
//! The scheduling heart of a multi-week training application:
//!
//! - **Expansion**: deterministically turn a program's static schedule
//!   into dated, per-user workout instances
//! - **Enrollment**: follow and restart programs without disturbing
//!   completed history, with chunked, resumable, idempotent writes
//! - **Reconciliation**: reduce a drag-reordered week to the minimal
//!   set of date changes
//! - **Records**: keep a strictly monotonic best-lift ledger
//!
//! Screens, auth, chat, and the concrete store SDK live outside this
//! crate; services speak the [`store`] traits and nothing else.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use stride_core::api::TrainingCore;
//! use stride_core::errors::CoreResult;
//! use stride_core::models::{Program, ProgramType, ScheduleItem};
//! use stride_core::store::memory::MemoryStore;
//! use stride_core::store::TemplateResolver;
//!
//! async fn follow<R: TemplateResolver>(resolver: R) -> CoreResult<()> {
//!     let core = TrainingCore::new(MemoryStore::new(), resolver);
//!     let program = Program {
//!         id: "5k-base".into(),
//!         title: "5K Base".into(),
//!         duration_label: "1 week".into(),
//!         program_type: ProgramType::Period,
//!         category: "running".into(),
//!         schedule: vec![ScheduleItem {
//!             day_offset: 0,
//!             workout_template_id: None,
//!             workout_title: "Easy run".into(),
//!             description: None,
//!         }],
//!     };
//!     let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default();
//!     let outcome = core
//!         .follow_program(uuid::Uuid::new_v4(), &program, start)
//!         .await?;
//!     println!("created {} workouts", outcome.created);
//!     Ok(())
//! }
//! ```

/// Facade surface consumed by the boundary layer
pub mod api;

/// Environment-based runtime configuration
pub mod config;

/// Batch limits and store collection paths
pub mod constants;

/// Unified error taxonomy with partial-failure reporting
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain data models
pub mod models;

/// Domain services: expansion, enrollment, reconciliation, records
pub mod services;

/// Document-store and template-resolver abstraction, plus the
/// in-memory backend
pub mod store;

pub use api::TrainingCore;
pub use errors::{CoreError, CoreResult};
