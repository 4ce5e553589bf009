// ABOUTME: In-memory document-store backend over DashMap
// ABOUTME: Backs integration tests and demos, plus a fault-injecting decorator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # In-Memory Backend
//!
//! A [`DocumentStore`] over a concurrent map. Documents live under
//! `collection/id` keys; queries scan one collection level. Batch
//! commits validate every staged operation before applying any, so a
//! rejected commit leaves the store untouched, matching the atomicity
//! the real backend promises per batch.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::Value;

use crate::constants::limits;

use super::{DocumentStore, Filter, Document, WriteBatch};

/// Fold the top-level fields of `partial` into `existing`
fn merge_fields(existing: &mut Value, partial: &Value) {
    if let (Value::Object(target), Value::Object(fields)) = (existing, partial) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn matches_filters(data: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| match filter {
        Filter::Eq { field, value } => data.get(field) == Some(value),
    })
}

/// DashMap-backed [`DocumentStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: Arc<DashMap<String, Value>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held, across all collections
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the store holds no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn apply(&self, op: &BatchOp) -> Result<()> {
        match op {
            BatchOp::Set { path, data, merge } => {
                if *merge {
                    let mut entry = self
                        .docs
                        .entry(path.clone())
                        .or_insert_with(|| Value::Object(serde_json::Map::new()));
                    merge_fields(entry.value_mut(), data);
                } else {
                    self.docs.insert(path.clone(), data.clone());
                }
            }
            BatchOp::Update { path, partial } => {
                let mut entry = self
                    .docs
                    .get_mut(path)
                    .ok_or_else(|| anyhow!("document not found: {path}"))?;
                merge_fields(entry.value_mut(), partial);
            }
            BatchOp::Delete { path } => {
                self.docs.remove(path);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    type Batch = MemoryBatch;

    async fn get(&self, path: &str) -> Result<Option<Value>> {
        Ok(self.docs.get(path).map(|entry| entry.value().clone()))
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        let prefix = format!("{collection}/");
        let mut results: Vec<Document> = self
            .docs
            .iter()
            .filter_map(|entry| {
                let id = entry.key().strip_prefix(&prefix)?;
                // Direct children only, not nested subcollections
                if id.contains('/') {
                    return None;
                }
                matches_filters(entry.value(), filters).then(|| Document {
                    id: id.to_owned(),
                    data: entry.value().clone(),
                })
            })
            .collect();
        results.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(results)
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String> {
        let id = format!("gen-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.docs.insert(format!("{collection}/{id}"), data);
        Ok(id)
    }

    async fn update(&self, path: &str, partial: Value) -> Result<()> {
        self.apply(&BatchOp::Update {
            path: path.to_owned(),
            partial,
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.docs.remove(path);
        Ok(())
    }

    fn batch(&self) -> MemoryBatch {
        MemoryBatch {
            store: self.clone(),
            ops: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum BatchOp {
    Set {
        path: String,
        data: Value,
        merge: bool,
    },
    Update {
        path: String,
        partial: Value,
    },
    Delete {
        path: String,
    },
}

/// Staged writes against a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryBatch {
    store: MemoryStore,
    ops: Vec<BatchOp>,
}

#[async_trait]
impl WriteBatch for MemoryBatch {
    fn set(&mut self, path: &str, data: Value, merge: bool) {
        self.ops.push(BatchOp::Set {
            path: path.to_owned(),
            data,
            merge,
        });
    }

    fn update(&mut self, path: &str, partial: Value) {
        self.ops.push(BatchOp::Update {
            path: path.to_owned(),
            partial,
        });
    }

    fn delete(&mut self, path: &str) {
        self.ops.push(BatchOp::Delete {
            path: path.to_owned(),
        });
    }

    fn len(&self) -> usize {
        self.ops.len()
    }

    async fn commit(self) -> Result<()> {
        if self.ops.len() > limits::max_batch() {
            bail!(
                "batch of {} operations exceeds the {} limit",
                self.ops.len(),
                limits::max_batch()
            );
        }
        // Validate update targets up front so a rejected commit applies
        // nothing at all
        for op in &self.ops {
            if let BatchOp::Update { path, .. } = op {
                if !self.store.docs.contains_key(path) {
                    bail!("document not found: {path}");
                }
            }
        }
        for op in &self.ops {
            self.store.apply(op)?;
        }
        Ok(())
    }
}

/// Fault-injecting decorator around any [`DocumentStore`].
///
/// Fails the Nth batch commit issued through it and any per-document
/// update whose path was registered, which is how the tests exercise
/// partial-commit and aggregated-failure semantics.
#[derive(Debug, Clone)]
pub struct FlakyStore<S: DocumentStore> {
    inner: S,
    commits_seen: Arc<AtomicUsize>,
    fail_commit_at: Arc<AtomicUsize>,
    failing_update_paths: Arc<DashSet<String>>,
}

impl<S: DocumentStore> FlakyStore<S> {
    /// Wrap a store with no faults armed
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            commits_seen: Arc::new(AtomicUsize::new(0)),
            fail_commit_at: Arc::new(AtomicUsize::new(0)),
            failing_update_paths: Arc::new(DashSet::new()),
        }
    }

    /// Arm a failure for the `n`th commit (1-based); other commits pass
    /// straight through
    pub fn fail_commit_number(&self, n: usize) {
        self.fail_commit_at.store(n, Ordering::SeqCst);
    }

    /// Arm a permanent failure for updates targeting `path`
    pub fn fail_updates_for(&self, path: impl Into<String>) {
        self.failing_update_paths.insert(path.into());
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FlakyStore<S> {
    type Batch = FlakyBatch<S::Batch>;

    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.inner.get(path).await
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        self.inner.query(collection, filters).await
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String> {
        self.inner.add(collection, data).await
    }

    async fn update(&self, path: &str, partial: Value) -> Result<()> {
        if self.failing_update_paths.contains(path) {
            bail!("injected update failure: {path}");
        }
        self.inner.update(path, partial).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.inner.delete(path).await
    }

    fn batch(&self) -> Self::Batch {
        FlakyBatch {
            inner: self.inner.batch(),
            commits_seen: Arc::clone(&self.commits_seen),
            fail_commit_at: Arc::clone(&self.fail_commit_at),
        }
    }
}

/// Batch wrapper counting commits for [`FlakyStore`]
#[derive(Debug)]
pub struct FlakyBatch<B: WriteBatch> {
    inner: B,
    commits_seen: Arc<AtomicUsize>,
    fail_commit_at: Arc<AtomicUsize>,
}

#[async_trait]
impl<B: WriteBatch> WriteBatch for FlakyBatch<B> {
    fn set(&mut self, path: &str, data: Value, merge: bool) {
        self.inner.set(path, data, merge);
    }

    fn update(&mut self, path: &str, partial: Value) {
        self.inner.update(path, partial);
    }

    fn delete(&mut self, path: &str) {
        self.inner.delete(path);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    async fn commit(self) -> Result<()> {
        let sequence = self.commits_seen.fetch_add(1, Ordering::SeqCst) + 1;
        if sequence == self.fail_commit_at.load(Ordering::SeqCst) {
            bail!("injected commit failure at commit {sequence}");
        }
        self.inner.commit().await
    }
}
