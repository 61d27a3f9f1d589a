#![forbid(unsafe_code)]

//! Core domain model and business logic for the Brasa streak tracker.
//!
//! This crate provides:
//! - Domain types (check-in log, exercises, outcomes)
//! - Calendar rules (weekends, fixed-date holidays)
//! - Streak and gem engine
//! - Key-value persistence with atomic writes
//! - Exercise load progression and CSV export

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod log;
pub mod logging;
pub mod progression;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use calendar::{is_weekend, HolidayCalendar};
pub use config::Config;
pub use engine::{
    block_denial, check_in, crossed_milestone, current_streak, gems_available, in_current_streak,
    milestone_progress, milestone_window, streak_start, toggle_day, use_block,
};
pub use error::{Error, Result};
pub use export::write_history_csv;
pub use log::CheckinLog;
pub use progression::ExerciseBook;
pub use store::Store;
pub use types::*;
