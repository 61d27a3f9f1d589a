//! The check-in event log.
//!
//! Two independent sets of calendar days: days the user checked in, and days
//! protected by a streak block. Sets make repeated writes for the same day
//! naturally idempotent. Nothing here touches the filesystem; persistence
//! lives in the `store` module.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Every check-in and streak block ever recorded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckinLog {
    pub checked: BTreeSet<NaiveDate>,
    pub blocked: BTreeSet<NaiveDate>,
}

impl CheckinLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a check-in; returns false if the day was already checked
    pub fn add_checkin(&mut self, date: NaiveDate) -> bool {
        self.checked.insert(date)
    }

    /// Remove a check-in; returns false if the day was not checked
    pub fn remove_checkin(&mut self, date: NaiveDate) -> bool {
        self.checked.remove(&date)
    }

    /// Record a streak block; returns false if the day was already blocked
    pub fn add_block(&mut self, date: NaiveDate) -> bool {
        self.blocked.insert(date)
    }

    /// Remove a streak block; returns false if the day was not blocked
    pub fn remove_block(&mut self, date: NaiveDate) -> bool {
        self.blocked.remove(&date)
    }

    pub fn has_checkin(&self, date: NaiveDate) -> bool {
        self.checked.contains(&date)
    }

    pub fn has_block(&self, date: NaiveDate) -> bool {
        self.blocked.contains(&date)
    }

    /// Whether the day carries any entry at all (check-in or block)
    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.has_checkin(date) || self.has_block(date)
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty() && self.blocked.is_empty()
    }

    /// Earliest recorded day across both sets
    pub fn earliest_entry(&self) -> Option<NaiveDate> {
        match (self.checked.first(), self.blocked.first()) {
            (Some(checked), Some(blocked)) => Some(*checked.min(blocked)),
            (Some(checked), None) => Some(*checked),
            (None, Some(blocked)) => Some(*blocked),
            (None, None) => None,
        }
    }

    /// All recorded days merged across both sets, ascending, without duplicates
    pub fn merged_dates(&self) -> Vec<NaiveDate> {
        self.checked.union(&self.blocked).copied().collect()
    }

    /// Number of check-ins that fall within the given month
    pub fn checkins_in_month(&self, year: i32, month: u32) -> usize {
        self.checked
            .iter()
            .filter(|date| date.year() == year && date.month() == month)
            .count()
    }
}
