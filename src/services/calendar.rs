// ABOUTME: ISO-8601 week arithmetic for labeling and windowing the calendar
// ABOUTME: Week numbers computed in UTC to avoid local-timezone drift
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stride Labs

//! # Week Calendar
//!
//! Pure date arithmetic. Weeks start Monday; week 1 is the week that
//! contains the year's first Thursday, so the boundary days of a year
//! can belong to the other year's numbering: Dec 31 may be week 1 of
//! the next year, Jan 1-3 may be week 52/53 of the previous one.

use chrono::{Datelike, Days, NaiveDate, Weekday};

fn iso_weekday(weekday: Weekday) -> i64 {
    i64::from(weekday.number_from_monday())
}

/// ISO-8601 week number of `date`.
///
/// The date is shifted onto the Thursday of its ISO week, and the week
/// number is counted from Jan 1 of the *shifted* date's year. Using the
/// input date's year instead would misnumber year-boundary weeks.
#[must_use]
pub fn week_number_of(date: NaiveDate) -> u32 {
    let shift = 4 - iso_weekday(date.weekday());
    let thursday = if shift >= 0 {
        date.checked_add_days(Days::new(shift as u64))
    } else {
        date.checked_sub_days(Days::new(shift.unsigned_abs()))
    };
    // Shifting at most 3 days never leaves chrono's representable range
    // for any date that itself is representable
    let thursday = thursday.unwrap_or(date);
    thursday.ordinal().div_ceil(7)
}

/// The Monday..Sunday span containing `reference`, Monday first.
///
/// Sunday counts as weekday 7, never 0, so the span always opens on
/// Monday regardless of where in the week the reference falls.
#[must_use]
pub fn week_dates_of(reference: NaiveDate) -> [NaiveDate; 7] {
    let back = iso_weekday(reference.weekday()) as u64 - 1;
    let monday = reference
        .checked_sub_days(Days::new(back))
        .unwrap_or(reference);
    std::array::from_fn(|i| {
        monday
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(monday)
    })
}
