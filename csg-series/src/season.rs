//! Season and season-year accounting.
//!
//! Every date belongs to exactly one of two seasons and to one season-year.
//! A season-year pairs the Mar-Aug spring/summer span of calendar year Y
//! with the Sep(Y)-Feb(Y+1) fall/winter span under the single label Y, so
//! January and February count toward the previous calendar year. This is
//! the accounting period over which precipitation mass is conserved.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Half-year season a date belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// March through August
    SpringSummer,
    /// September through February
    FallWinter,
}

/// Season for a calendar month (1-12).
pub fn season_for_month(month: u32) -> Season {
    match month {
        3..=8 => Season::SpringSummer,
        _ => Season::FallWinter,
    }
}

/// Season-year label for a date.
/// e.g., Sep 1 2020 -> 2020, Jan 15 2021 -> 2020, Jun 1 2020 -> 2020
pub fn season_year_for_date(date: &NaiveDate) -> i32 {
    let month = date.month();
    let year = date.year();
    if month <= 2 {
        year - 1
    } else {
        year
    }
}

/// The full accounting key for a date: (season, season-year).
pub fn season_key(date: &NaiveDate) -> (Season, i32) {
    (season_for_month(date.month()), season_year_for_date(date))
}
