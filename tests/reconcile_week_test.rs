// ABOUTME: Integration tests for weekly calendar reconciliation
// ABOUTME: Minimal-diff updates, aggregated failures, and persisted date changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use stride_core::errors::CoreError;
use stride_core::models::{CalendarListItem, WorkoutInstance, WorkoutStatus};
use stride_core::store::memory::{FlakyStore, MemoryStore};
use stride_core::store::{DocumentStore, WriteBatch};
use stride_core::TrainingCore;

struct NoTemplates;

#[async_trait::async_trait]
impl stride_core::store::TemplateResolver for NoTemplates {
    async fn resolve(
        &self,
        _template_id: &str,
    ) -> anyhow::Result<Option<stride_core::models::WorkoutTemplateSnapshot>> {
        Ok(None)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn instance(id: &str, user: Uuid, scheduled: NaiveDate) -> WorkoutInstance {
    WorkoutInstance {
        id: id.into(),
        user_id: user,
        name: id.into(),
        status: WorkoutStatus::Planned,
        scheduled_date: Some(scheduled),
        exercises: Vec::new(),
        category: "strength".into(),
        subcategory: None,
        program_id: None,
        notes: None,
    }
}

async fn seed<S: DocumentStore>(store: &S, user: Uuid, workouts: &[WorkoutInstance]) {
    let mut batch = store.batch();
    for workout in workouts {
        batch.set(
            &format!("users/{user}/workouts/{}", workout.id),
            serde_json::to_value(workout).unwrap(),
            false,
        );
    }
    batch.commit().await.unwrap();
}

/// Seven headers Monday..Sunday with the given workouts interleaved
/// under the day each should now sit on
fn window(
    monday: NaiveDate,
    placements: &[(&WorkoutInstance, NaiveDate)],
) -> Vec<CalendarListItem> {
    let mut items = Vec::new();
    for offset in 0..7 {
        let day = monday.checked_add_days(chrono::Days::new(offset)).unwrap();
        items.push(CalendarListItem::Header { date: day });
        for (workout, placed_on) in placements {
            if *placed_on == day {
                items.push(CalendarListItem::Workout((*workout).clone()));
            }
        }
    }
    items
}

#[tokio::test]
async fn tuesday_to_wednesday_move_updates_exactly_one_document() {
    let store = MemoryStore::new();
    let core = TrainingCore::new(store.clone(), NoTemplates);
    let user = Uuid::new_v4();
    let monday = date(2024, 6, 3);
    let tuesday = date(2024, 6, 4);
    let wednesday = date(2024, 6, 5);

    let moved = instance("moved", user, tuesday);
    let stays = instance("stays", user, monday);
    seed(&store, user, &[moved.clone(), stays.clone()]).await;

    let items = window(monday, &[(&stays, monday), (&moved, wednesday)]);
    let outcome = core.reconcile_week(user, &items).await.unwrap();
    assert_eq!(outcome.updated, 1);

    let doc = store
        .get(&format!("users/{user}/workouts/moved"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["scheduled_date"], "2024-06-05");

    let untouched = store
        .get(&format!("users/{user}/workouts/stays"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched["scheduled_date"], "2024-06-03");
}

#[tokio::test]
async fn unmoved_week_issues_no_writes() {
    let store = MemoryStore::new();
    let core = TrainingCore::new(store.clone(), NoTemplates);
    let user = Uuid::new_v4();
    let monday = date(2024, 6, 3);

    let a = instance("a", user, monday);
    let b = instance("b", user, date(2024, 6, 6));
    seed(&store, user, &[a.clone(), b.clone()]).await;

    let items = window(monday, &[(&a, monday), (&b, date(2024, 6, 6))]);
    let outcome = core.reconcile_week(user, &items).await.unwrap();
    assert_eq!(outcome.updated, 0);
}

#[tokio::test]
async fn failed_subset_is_aggregated_and_successes_stay_applied() {
    let store = FlakyStore::new(MemoryStore::new());
    let core = TrainingCore::new(store.clone(), NoTemplates);
    let user = Uuid::new_v4();
    let monday = date(2024, 6, 3);
    let friday = date(2024, 6, 7);

    let ok = instance("ok", user, monday);
    let bad = instance("bad", user, monday);
    seed(&store, user, &[ok.clone(), bad.clone()]).await;
    store.fail_updates_for(format!("users/{user}/workouts/bad"));

    let items = window(monday, &[(&ok, friday), (&bad, friday)]);
    let err = core.reconcile_week(user, &items).await.unwrap_err();

    let CoreError::ReconcileFailed { succeeded, failed } = err else {
        panic!("expected ReconcileFailed, got {err}");
    };
    assert_eq!(succeeded, 1);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].workout_id, "bad");

    // The successful update is not reverted
    let doc = store
        .get(&format!("users/{user}/workouts/ok"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["scheduled_date"], "2024-06-07");
    let unchanged = store
        .get(&format!("users/{user}/workouts/bad"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged["scheduled_date"], "2024-06-03");
}

#[tokio::test]
async fn update_only_touches_the_date_field() {
    let store = MemoryStore::new();
    let core = TrainingCore::new(store.clone(), NoTemplates);
    let user = Uuid::new_v4();
    let monday = date(2024, 6, 3);

    let mut workout = instance("w", user, monday);
    workout.notes = Some("keep me".into());
    seed(&store, user, &[workout.clone()]).await;

    // Drag onto Thursday
    let items = window(monday, &[(&workout, date(2024, 6, 6))]);
    core.reconcile_week(user, &items).await.unwrap();

    let doc = store
        .get(&format!("users/{user}/workouts/w"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["scheduled_date"], "2024-06-06");
    assert_eq!(doc["notes"], "keep me");
    assert_eq!(doc["status"], "planned");
}

#[tokio::test]
async fn stray_pre_header_workout_is_left_alone() {
    let store = MemoryStore::new();
    let core = TrainingCore::new(store.clone(), NoTemplates);
    let user = Uuid::new_v4();
    let monday = date(2024, 6, 3);

    let stray = instance("stray", user, date(2024, 5, 1));
    seed(&store, user, &[stray.clone()]).await;

    let mut items = vec![CalendarListItem::Workout(stray)];
    items.extend(window(monday, &[]));
    let outcome = core.reconcile_week(user, &items).await.unwrap();
    assert_eq!(outcome.updated, 0);

    let doc = store
        .get(&format!("users/{user}/workouts/stray"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["scheduled_date"], "2024-05-01");
}

#[tokio::test]
async fn seeding_helper_roundtrip_sanity() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    let workout = instance("w", user, date(2024, 6, 3));
    seed(&store, user, &[workout]).await;
    let doc = store
        .get(&format!("users/{user}/workouts/w"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc, json!({
        "id": "w",
        "user_id": user,
        "name": "w",
        "status": "planned",
        "scheduled_date": "2024-06-03",
        "exercises": [],
        "category": "strength",
        "subcategory": null,
        "program_id": null,
        "notes": null,
    }));
}
