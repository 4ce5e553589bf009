// ABOUTME: Domain service layer for the scheduling core
// ABOUTME: Pure planning functions plus orchestrators over the store traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! Domain service layer
//!
//! Each service owns one of the core's algorithmic concerns and speaks
//! only the store traits, so the same logic serves any boundary layer.

/// ISO week numbers and Monday-start week spans
pub mod calendar;

/// Follow/restart orchestration with chunked, resumable writes
pub mod enrollment;

/// Minimal-diff reconciliation of a reordered week
pub mod reconcile;

/// Strictly monotonic personal-record ledger
pub mod records;

/// Program schedule expansion into dated drafts
pub mod schedule;
