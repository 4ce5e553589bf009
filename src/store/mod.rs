// ABOUTME: Document-store and template-resolver abstraction for the scheduling core
// ABOUTME: Pluggable async traits so backends can be swapped without touching services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Store Abstraction
//!
//! The document store is the only shared mutable resource in this core.
//! Services speak these traits and never a concrete SDK; timestamps are
//! normalized to `chrono` types before they cross this boundary.
//!
//! `commit()` on a batch is atomic only within that one batch. Batches
//! are never chained into a larger transaction, and a single batch
//! accepts at most [`crate::constants::limits::MAX_BATCH`] operations.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::Value;

use crate::models::WorkoutTemplateSnapshot;

pub mod memory;

/// A document returned from a collection query
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Id within its collection
    pub id: String,
    /// Raw document body
    pub data: Value,
}

/// A predicate applied server-side to a collection query
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Top-level field equality
    Eq {
        /// Field name
        field: String,
        /// Expected value
        value: Value,
    },
}

impl Filter {
    /// Equality filter on a top-level field
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Build a document path from its collection and id
#[must_use]
pub fn doc_path(collection: &str, id: &str) -> String {
    format!("{collection}/{id}")
}

/// A staged set of writes committed atomically as one unit
#[async_trait]
pub trait WriteBatch: Send {
    /// Stage a full-document write. With `merge` the write folds
    /// top-level fields into an existing document instead of replacing
    /// it, and creates the document when absent.
    fn set(&mut self, path: &str, data: Value, merge: bool);

    /// Stage a partial update; commit fails if the document is absent
    fn update(&mut self, path: &str, partial: Value);

    /// Stage a deletion
    fn delete(&mut self, path: &str);

    /// Number of staged operations
    fn len(&self) -> usize;

    /// Whether nothing is staged
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Commit all staged operations atomically.
    ///
    /// # Errors
    ///
    /// Fails without applying anything if the batch exceeds the store's
    /// operation limit or the backend rejects the commit.
    async fn commit(self) -> Result<()>
    where
        Self: Sized;
}

/// Core document-store abstraction.
///
/// All backends implement this trait to give the service layer a
/// consistent interface; every call is one network round trip on a real
/// backend, so callers fan out explicitly where ordering allows it.
#[async_trait]
pub trait DocumentStore: Send + Sync + Clone + 'static {
    /// Batch type produced by this backend
    type Batch: WriteBatch;

    /// Fetch a single document, `None` when absent
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Query a collection with conjunctive filters
    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>>;

    /// Add a document with a store-generated id, returning the id
    async fn add(&self, collection: &str, data: Value) -> Result<String>;

    /// Partially update an existing document.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the document is absent.
    async fn update(&self, path: &str, partial: Value) -> Result<()>;

    /// Delete a document; deleting an absent document is a no-op
    async fn delete(&self, path: &str) -> Result<()>;

    /// Start a new write batch
    fn batch(&self) -> Self::Batch;
}

/// Outcome of resolving one template id
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateOutcome {
    /// Template exists
    Found(WorkoutTemplateSnapshot),
    /// Resolver reported not-found (returned `None`, did not fail)
    Missing,
    /// Transport failure while resolving
    Failed {
        /// What the resolver reported
        message: String,
    },
}

/// Read-only access to reusable workout templates.
///
/// Implementations must return `Ok(None)` for "not found" and reserve
/// `Err` for transport failures.
#[async_trait]
pub trait TemplateResolver: Send + Sync {
    /// Resolve one template id
    async fn resolve(&self, template_id: &str) -> Result<Option<WorkoutTemplateSnapshot>>;

    /// Resolve many ids with one concurrent fan-out, preserving per-id
    /// fault isolation: one failed id never poisons the others.
    async fn resolve_many(&self, template_ids: &[String]) -> HashMap<String, TemplateOutcome> {
        let lookups = template_ids.iter().map(|id| async move {
            let outcome = match self.resolve(id).await {
                Ok(Some(snapshot)) => TemplateOutcome::Found(snapshot),
                Ok(None) => TemplateOutcome::Missing,
                Err(err) => TemplateOutcome::Failed {
                    message: err.to_string(),
                },
            };
            (id.clone(), outcome)
        });
        join_all(lookups).await.into_iter().collect()
    }
}
