// ABOUTME: Integration tests for ISO week numbering and week spans
// ABOUTME: Year-boundary weeks and Monday-start windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Datelike, NaiveDate, Weekday};

use stride_core::services::calendar::{week_dates_of, week_number_of};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn week_one_starts_on_the_first_monday_of_2024() {
    assert_eq!(week_number_of(date(2024, 1, 1)), 1);
}

#[test]
fn sunday_new_year_belongs_to_previous_iso_year() {
    assert_eq!(week_number_of(date(2023, 1, 1)), 52);
}

#[test]
fn january_head_can_carry_week_53() {
    // ISO year 2020 has 53 weeks; Jan 1-3 2021 still belong to it
    assert_eq!(week_number_of(date(2021, 1, 1)), 53);
    assert_eq!(week_number_of(date(2021, 1, 3)), 53);
    assert_eq!(week_number_of(date(2021, 1, 4)), 1);
}

#[test]
fn week_span_is_monday_through_sunday() {
    let span = week_dates_of(date(2024, 6, 5)); // a Wednesday
    assert_eq!(span[0], date(2024, 6, 3));
    assert_eq!(span[6], date(2024, 6, 9));
    assert_eq!(span[0].weekday(), Weekday::Mon);
    assert_eq!(span[6].weekday(), Weekday::Sun);
}

#[test]
fn sunday_reference_does_not_slide_into_next_week() {
    // Sunday is weekday 7, not 0: the span must open on the Monday
    // six days earlier, not the next day
    let span = week_dates_of(date(2024, 6, 9));
    assert_eq!(span[0], date(2024, 6, 3));
    assert_eq!(span[6], date(2024, 6, 9));
}

#[test]
fn week_span_crosses_the_year_boundary() {
    let span = week_dates_of(date(2025, 1, 1)); // a Wednesday
    assert_eq!(span[0], date(2024, 12, 30));
    assert_eq!(span[6], date(2025, 1, 5));
}

#[test]
fn every_day_of_a_span_maps_to_the_same_week_number() {
    let span = week_dates_of(date(2024, 6, 5));
    let number = week_number_of(span[0]);
    for day in span {
        assert_eq!(week_number_of(day), number);
    }
}
