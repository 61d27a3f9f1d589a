//! Streak and gem engine.
//!
//! All values here are recomputed from the check-in log on every call; the
//! log is the single source of truth and nothing is cached between calls.
//!
//! Core rules:
//! - A streak is a run of checked days ending today (or yesterday, when
//!   today has no entry yet)
//! - Weekends and holidays never break a streak and never count toward it
//! - A blocked day keeps a streak alive without counting toward it
//! - One gem is earned per `interval` consecutive run days; every placed
//!   block consumes one gem

use crate::calendar::{is_weekend, HolidayCalendar};
use crate::log::CheckinLog;
use crate::types::{BlockDenial, ToggleOutcome};
use chrono::NaiveDate;

/// Length of the current streak in checked days
///
/// Walks backward from today (or yesterday, when today carries no entry)
/// until a weekday with no entry is found. Checked days count; blocked
/// days, weekends and holidays are stepped over without counting. The walk
/// never goes below the earliest recorded entry, which bounds it even for
/// sparse logs spanning years.
pub fn current_streak(log: &CheckinLog, calendar: &HolidayCalendar, today: NaiveDate) -> u32 {
    let floor = match log.earliest_entry() {
        Some(date) => date,
        None => return 0,
    };

    let mut cursor = if log.has_entry(today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while cursor >= floor {
        if log.has_checkin(cursor) {
            streak += 1;
        } else if is_weekend(cursor) || calendar.is_holiday(cursor) {
            // rest day, walk through
        } else if log.has_block(cursor) {
            // protected day, keeps the run alive without counting
        } else {
            break;
        }
        cursor = match cursor.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    tracing::debug!("current streak is {} as of {}", streak, today);
    streak
}

/// First recorded day of the current streak, or None when no streak is active
///
/// Walks backward over qualifying days (entries, weekends, holidays) to find
/// where the run breaks, then forward to the first actual entry. Rest days
/// leading into the streak are not part of it.
pub fn streak_start(
    log: &CheckinLog,
    calendar: &HolidayCalendar,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if current_streak(log, calendar, today) == 0 {
        return None;
    }
    let floor = log.earliest_entry()?;

    let mut cursor = if log.has_entry(today) {
        today
    } else {
        today.pred_opt()?
    };

    while cursor >= floor {
        if log.has_entry(cursor) || is_weekend(cursor) || calendar.is_holiday(cursor) {
            cursor = match cursor.pred_opt() {
                Some(previous) => previous,
                None => break,
            };
        } else {
            break;
        }
    }

    // cursor now sits on the day that broke the run (or just below the
    // earliest entry); the streak starts at the first entry after it
    let mut candidate = cursor.succ_opt()?;
    while candidate <= today {
        if log.has_entry(candidate) {
            return Some(candidate);
        }
        candidate = candidate.succ_opt()?;
    }
    None
}

/// Whether a day falls within the span of the current streak
///
/// Future days are never part of a streak. When no streak is active, no day
/// qualifies.
pub fn in_current_streak(
    log: &CheckinLog,
    calendar: &HolidayCalendar,
    today: NaiveDate,
    date: NaiveDate,
) -> bool {
    if date > today {
        return false;
    }
    match streak_start(log, calendar, today) {
        Some(start) => date >= start,
        None => false,
    }
}

/// Gems currently available to spend
///
/// Replays the entire merged log in date order, counting consecutive run
/// days (check-ins and blocks alike). Two entries are consecutive when every
/// day between them is a weekend or holiday. Each time the run count crosses
/// a new multiple of `interval`, one gem is earned; a gap on a plain weekday
/// resets both the run count and the milestone watermark. Every block ever
/// placed consumes one gem, and the result never goes below zero.
pub fn gems_available(log: &CheckinLog, calendar: &HolidayCalendar, interval: u32) -> u32 {
    let dates = log.merged_dates();
    if dates.is_empty() {
        return 0;
    }
    let interval = interval.max(1);

    let mut total_earned: u32 = 0;
    let mut run_length: u32 = 0;
    let mut last_milestone: u32 = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        match previous {
            Some(prev) if gap_breaks_run(prev, date, calendar) => {
                run_length = 1;
                last_milestone = 0;
            }
            Some(_) => run_length += 1,
            None => run_length = 1,
        }

        let milestone = run_length / interval;
        if milestone > last_milestone {
            total_earned += milestone - last_milestone;
            last_milestone = milestone;
        }
        previous = Some(date);
    }

    let spent = log.blocked.len() as u32;
    let available = total_earned.saturating_sub(spent);
    tracing::debug!(
        "gem replay: {} earned, {} spent, {} available",
        total_earned,
        spent,
        available
    );
    available
}

/// Whether the gap between two recorded days breaks a run
///
/// True when any day strictly between them is a plain weekday (not a
/// weekend, not a holiday).
fn gap_breaks_run(previous: NaiveDate, next: NaiveDate, calendar: &HolidayCalendar) -> bool {
    let mut day = previous.succ_opt();
    while let Some(current) = day {
        if current >= next {
            return false;
        }
        if !is_weekend(current) && !calendar.is_holiday(current) {
            return true;
        }
        day = current.succ_opt();
    }
    false
}

/// Whether a check-in can still be made today
pub fn can_check_in(log: &CheckinLog, today: NaiveDate) -> bool {
    !log.has_checkin(today) && !log.has_block(today)
}

/// Record today's check-in
///
/// Returns false without touching the log when today is already checked or
/// blocked. Weekends and holidays accept check-ins like any other day.
pub fn check_in(log: &mut CheckinLog, today: NaiveDate) -> bool {
    if !can_check_in(log, today) {
        return false;
    }
    log.add_checkin(today)
}

/// Why a block cannot be placed today, or None when it can
///
/// Denials are checked in a fixed order: day already blocked, day already
/// checked, weekend, holiday, no active streak, no gems.
pub fn block_denial(
    log: &CheckinLog,
    calendar: &HolidayCalendar,
    today: NaiveDate,
    gems: u32,
) -> Option<BlockDenial> {
    if log.has_block(today) {
        return Some(BlockDenial::AlreadyBlocked);
    }
    if log.has_checkin(today) {
        return Some(BlockDenial::AlreadyChecked);
    }
    if is_weekend(today) {
        return Some(BlockDenial::Weekend);
    }
    if calendar.is_holiday(today) {
        return Some(BlockDenial::Holiday);
    }
    if current_streak(log, calendar, today) == 0 {
        return Some(BlockDenial::NoActiveStreak);
    }
    if gems == 0 {
        return Some(BlockDenial::NoGems);
    }
    None
}

/// Spend a gem to protect today's streak
///
/// `gems` is the caller's current gem count for the same log, normally from
/// [`gems_available`].
pub fn use_block(
    log: &mut CheckinLog,
    calendar: &HolidayCalendar,
    today: NaiveDate,
    gems: u32,
) -> std::result::Result<(), BlockDenial> {
    if let Some(denial) = block_denial(log, calendar, today, gems) {
        tracing::debug!("block denied: {}", denial.reason());
        return Err(denial);
    }
    log.add_block(today);
    Ok(())
}

/// Toggle a past day between checked and clear (edit mode)
///
/// A day with no entry gains a check-in; a checked day loses it; a blocked
/// day loses the block. Future days are refused and left untouched. Note
/// that removing a block this way does not refund the gem it consumed: the
/// gem replay counts blocks still present in the log, so the spend
/// disappears with the block.
pub fn toggle_day(log: &mut CheckinLog, today: NaiveDate, date: NaiveDate) -> ToggleOutcome {
    if date > today {
        return ToggleOutcome::FutureDate;
    }
    if log.has_checkin(date) {
        log.remove_checkin(date);
        ToggleOutcome::Unchecked
    } else if log.has_block(date) {
        log.remove_block(date);
        ToggleOutcome::Unblocked
    } else {
        log.add_checkin(date);
        ToggleOutcome::Checked
    }
}

/// Milestone marks surrounding the given streak: base plus three waypoints
/// up to the next gem
///
/// With the default interval of 15, a streak of 12 yields [0, 5, 10, 15]
/// and a streak of 17 yields [15, 20, 25, 30].
pub fn milestone_window(streak: u32, interval: u32) -> [u32; 4] {
    let interval = interval.max(1);
    let base = (streak / interval) * interval;
    let step = interval / 3;
    [base, base + step, base + 2 * step, base + interval]
}

/// Fraction of the way from the window base to the next milestone, 0.0..=1.0
pub fn milestone_progress(streak: u32, interval: u32) -> f64 {
    let interval = interval.max(1);
    let base = (streak / interval) * interval;
    (f64::from(streak - base) / f64::from(interval)).clamp(0.0, 1.0)
}

/// Whether the given streak sits exactly on a gem milestone
pub fn crossed_milestone(streak: u32, interval: u32) -> bool {
    let interval = interval.max(1);
    streak > 0 && streak % interval == 0
}
