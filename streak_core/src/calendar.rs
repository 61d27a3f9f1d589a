//! Calendar rules and date helpers.
//!
//! Weekends and fixed-date holidays are "rest days": they never break a
//! streak and never require a check-in. Everything here works on plain
//! `NaiveDate` values in the user's local calendar, so a check-in made at
//! 23:59 belongs to that civil day regardless of timezone offsets.

use crate::error::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Fixed-date holidays as (day, month) pairs, Brazilian national calendar
/// plus Christmas Eve and New Year's Eve
pub const FIXED_HOLIDAYS: [(u32, u32); 10] = [
    (1, 1),   // Confraternização Universal
    (21, 4),  // Tiradentes
    (1, 5),   // Dia do Trabalho
    (7, 9),   // Independência
    (12, 10), // Nossa Senhora Aparecida
    (2, 11),  // Finados
    (15, 11), // Proclamação da República
    (24, 12), // Véspera de Natal
    (25, 12), // Natal
    (31, 12), // Véspera de Ano Novo
];

/// Cached built-in holiday set - built once and reused across all calendars
static BUILTIN_HOLIDAYS: Lazy<BTreeSet<(u32, u32)>> =
    Lazy::new(|| FIXED_HOLIDAYS.iter().copied().collect());

/// Fixed-date holiday calendar
///
/// Holidays recur every year on the same day and month. The built-in set can
/// be extended with user-configured dates (see `Config`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HolidayCalendar {
    days: BTreeSet<(u32, u32)>,
}

impl HolidayCalendar {
    /// Calendar with only the built-in holidays
    pub fn builtin() -> Self {
        HolidayCalendar {
            days: BUILTIN_HOLIDAYS.clone(),
        }
    }

    /// Calendar with the built-in holidays plus extra (day, month) pairs
    pub fn with_extra(extra: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut days = BUILTIN_HOLIDAYS.clone();
        days.extend(extra);
        HolidayCalendar { days }
    }

    /// Whether the given date falls on a holiday
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.days.contains(&(date.day(), date.month()))
    }

    /// Whether the given date is a rest day (weekend or holiday)
    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        is_weekend(date) || self.is_holiday(date)
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        HolidayCalendar::builtin()
    }
}

/// Whether the given date falls on a Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Format a date as an ISO `YYYY-MM-DD` string
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an ISO `YYYY-MM-DD` string back into a date
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Parse a `DD-MM` holiday string (e.g. "24-12") into a (day, month) pair
pub fn parse_day_month(text: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 2 {
        return Err(Error::Config(format!(
            "invalid holiday '{}': expected DD-MM",
            text
        )));
    }
    let day: u32 = parts[0]
        .parse()
        .map_err(|_| Error::Config(format!("invalid holiday day in '{}'", text)))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| Error::Config(format!("invalid holiday month in '{}'", text)))?;
    if day == 0 || day > 31 || month == 0 || month > 12 {
        return Err(Error::Config(format!("holiday '{}' is out of range", text)));
    }
    Ok((day, month))
}

/// Time remaining until the next local midnight
pub fn time_until_midnight(now: NaiveDateTime) -> Duration {
    let midnight = now
        .date()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0));
    match midnight {
        Some(midnight) => midnight.signed_duration_since(now),
        None => Duration::zero(),
    }
}

/// Format a duration as an `HH:MM:SS` countdown
pub fn format_countdown(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// Weekday offset of the first day of the month, counted from Sunday
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}
