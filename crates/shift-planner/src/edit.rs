//! Voluntary Time Off (VTO) and Voluntary Extra Time (VET) edits.
//!
//! Both edits target one date inside the editable window: from today through
//! the coming Saturday. Dates past the end of the stored week are seeded
//! before the edit is applied. An edit that fails leaves the week untouched.

use chrono::NaiveDate;
use tracing::debug;

use crate::clock::ClockTime;
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::shift::{sort_shifts, Shift};
use crate::week::{format_date, week_bounds, Week};

/// A single change to the WORK schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Add or extend WORK on `date`.
    Vet {
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    },
    /// Remove WORK on `date`.
    Vto { date: NaiveDate, scope: VtoScope },
}

/// How much of a day a VTO removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtoScope {
    /// Clear the whole day.
    Full,
    /// Cut `[start, end]` out of the shift that contains it.
    Partial { start: ClockTime, end: ClockTime },
}

impl Edit {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Vet { date, .. } | Self::Vto { date, .. } => *date,
        }
    }
}

/// Check that `date` lies between `today` and the coming Saturday.
///
/// # Errors
///
/// [`PlannerError::PastDate`] before today, [`PlannerError::OutOfRange`]
/// after the Saturday ending the current week.
pub fn validate_target(date: NaiveDate, today: NaiveDate) -> Result<(), PlannerError> {
    if date < today {
        return Err(PlannerError::PastDate(format!(
            "{} is before {}",
            format_date(date),
            format_date(today)
        )));
    }
    let (_, saturday) = week_bounds(today);
    if date > saturday {
        return Err(PlannerError::OutOfRange(format!(
            "{} is after {}",
            format_date(date),
            format_date(saturday)
        )));
    }
    Ok(())
}

/// Apply `edit` to `week`. On error the week is unchanged.
pub fn apply_edit(
    week: &mut Week,
    edit: &Edit,
    today: NaiveDate,
    config: &PlannerConfig,
) -> Result<(), PlannerError> {
    match *edit {
        Edit::Vet { date, start, end } => apply_vet(week, date, start, end, today, config),
        Edit::Vto { date, scope } => apply_vto(week, date, scope, today, config),
    }
}

/// Merge `[start, end]` into the WORK on `date`.
///
/// Every shift overlapping or touching the interval is folded into one WORK
/// shift covering the union. Shifts that do not touch it are kept. If none
/// touch it, the interval becomes a WORK shift of its own.
pub fn apply_vet(
    week: &mut Week,
    date: NaiveDate,
    start: ClockTime,
    end: ClockTime,
    today: NaiveDate,
    config: &PlannerConfig,
) -> Result<(), PlannerError> {
    validate_target(date, today)?;
    let requested = Shift::work(start, end).map_err(|e| PlannerError::InvalidRange(e.to_string()))?;

    let mut working = week.clone();
    working.fill_through(date, config)?;

    let mut merged = requested;
    let mut kept = Vec::new();
    for shift in working.day(date).unwrap_or_default() {
        if shift.touches(requested.start_time, requested.end_time) {
            merged.start_time = merged.start_time.min(shift.start_time);
            merged.end_time = merged.end_time.max(shift.end_time);
        } else {
            kept.push(*shift);
        }
    }
    kept.push(merged);
    sort_shifts(&mut kept);

    debug!(date = %format_date(date), work = %merged, "applied VET");
    working.set_day(date, kept);
    *week = working;
    Ok(())
}

/// Remove WORK from `date`.
///
/// A full VTO empties the day. A partial VTO finds the first shift that
/// contains `[start, end]` and replaces the day with what is left of that
/// shift on either side of the interval.
///
/// # Errors
///
/// Besides the date checks, [`PlannerError::NoMatchingShift`] if no shift
/// contains the interval.
pub fn apply_vto(
    week: &mut Week,
    date: NaiveDate,
    scope: VtoScope,
    today: NaiveDate,
    config: &PlannerConfig,
) -> Result<(), PlannerError> {
    validate_target(date, today)?;
    // An end of 12:00 AM means the end of the day.
    let scope = match scope {
        VtoScope::Full => VtoScope::Full,
        VtoScope::Partial { start, end } => {
            let requested =
                Shift::work(start, end).map_err(|e| PlannerError::InvalidRange(e.to_string()))?;
            VtoScope::Partial {
                start: requested.start_time,
                end: requested.end_time,
            }
        }
    };

    let mut working = week.clone();
    working.fill_through(date, config)?;

    let remaining = match scope {
        VtoScope::Full => Vec::new(),
        VtoScope::Partial { start, end } => {
            let day = working.day(date).unwrap_or_default();
            let target = day.iter().find(|s| s.contains(start, end)).ok_or_else(|| {
                PlannerError::NoMatchingShift(format!(
                    "no shift on {} contains {} - {}",
                    format_date(date),
                    start,
                    end
                ))
            })?;
            cut_out(target, start, end)
        }
    };

    debug!(date = %format_date(date), ?scope, left = remaining.len(), "applied VTO");
    working.set_day(date, remaining);
    *week = working;
    Ok(())
}

/// The parts of `shift` before and after `[start, end]`.
fn cut_out(shift: &Shift, start: ClockTime, end: ClockTime) -> Vec<Shift> {
    let mut parts = Vec::with_capacity(2);
    if start > shift.start_time {
        parts.push(Shift {
            end_time: start,
            ..*shift
        });
    }
    if end < shift.end_time {
        parts.push(Shift {
            start_time: end,
            ..*shift
        });
    }
    parts
}
