//! Core domain types for the Brasa streak system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their weight history
//! - Edit-mode toggle outcomes
//! - Streak block denial reasons

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Section label used for exercises that carry no section of their own
pub const UNCATEGORIZED_SECTION: &str = "uncategorized";

// ============================================================================
// Exercise Types
// ============================================================================

/// One logged weight for an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub date: DateTime<Utc>,
    pub weight: f64,
}

/// A tracked exercise with its full weight history
///
/// `section` is `None` for records migrated from the legacy single-weight
/// layout, which carried no grouping information.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub history: Vec<WeightEntry>,
}

impl Exercise {
    /// Most recently logged weight, or 0.0 when the history is empty
    pub fn latest_weight(&self) -> f64 {
        self.history.last().map(|entry| entry.weight).unwrap_or(0.0)
    }

    /// Section label for display and grouping
    pub fn section_label(&self) -> &str {
        match &self.section {
            Some(section) => section,
            None => UNCATEGORIZED_SECTION,
        }
    }
}

// ============================================================================
// Engine Outcome Types
// ============================================================================

/// Result of toggling a calendar day in edit mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The day had no entry and is now checked
    Checked,
    /// The day was checked and the check-in was removed
    Unchecked,
    /// The day was blocked and the block was removed
    Unblocked,
    /// The day lies in the future and was left untouched
    FutureDate,
}

/// Reason a streak block could not be placed today
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockDenial {
    AlreadyBlocked,
    AlreadyChecked,
    Weekend,
    Holiday,
    NoActiveStreak,
    NoGems,
}

impl BlockDenial {
    /// Short human-readable reason for the denial
    pub fn reason(&self) -> &'static str {
        match self {
            BlockDenial::AlreadyBlocked => "a block is already placed today",
            BlockDenial::AlreadyChecked => "today is already checked in",
            BlockDenial::Weekend => "weekends never break a streak",
            BlockDenial::Holiday => "holidays never break a streak",
            BlockDenial::NoActiveStreak => "there is no active streak to protect",
            BlockDenial::NoGems => "no gems available",
        }
    }
}
