//! Shifts: typed, same-day time intervals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::PlannerError;

/// What a block of time is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Work,
    Sleep,
    Meal,
    Commute,
    JobSearch,
    Shower,
    Prep,
}

impl ShiftKind {
    /// The label used in the schedule file and in printed schedules.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Sleep => "SLEEP",
            Self::Meal => "MEAL",
            Self::Commute => "COMMUTE",
            Self::JobSearch => "JOB_SEARCH",
            Self::Shower => "SHOWER",
            Self::Prep => "PREP",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed interval within a single day.
///
/// Invariant: `start_time < end_time`. An end of `12:00 AM` is read as the
/// end of the day, so a shift may run up to midnight but never past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShift")]
pub struct Shift {
    #[serde(rename = "type")]
    pub kind: ShiftKind,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

/// Wire form of a shift, before the interval invariant is checked.
#[derive(Deserialize)]
struct RawShift {
    #[serde(rename = "type")]
    kind: ShiftKind,
    start_time: ClockTime,
    end_time: ClockTime,
}

impl TryFrom<RawShift> for Shift {
    type Error = PlannerError;

    fn try_from(raw: RawShift) -> Result<Self, Self::Error> {
        Shift::new(raw.kind, raw.start_time, raw.end_time)
    }
}

impl Shift {
    /// Create a shift, reading an end of midnight as the end of the day.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidShift`] if the start is not strictly
    /// before the end.
    pub fn new(kind: ShiftKind, start: ClockTime, end: ClockTime) -> Result<Self, PlannerError> {
        let end = if end == ClockTime::MIDNIGHT {
            ClockTime::END_OF_DAY
        } else {
            end
        };
        if start >= end {
            return Err(PlannerError::InvalidShift(format!(
                "{kind} {start} - {end}: start must be before end"
            )));
        }
        Ok(Self {
            kind,
            start_time: start,
            end_time: end,
        })
    }

    /// Shorthand for a WORK shift.
    pub fn work(start: ClockTime, end: ClockTime) -> Result<Self, PlannerError> {
        Self::new(ShiftKind::Work, start, end)
    }

    pub fn is_work(&self) -> bool {
        self.kind == ShiftKind::Work
    }

    pub fn duration_minutes(&self) -> i64 {
        self.start_time.minutes_until(self.end_time)
    }

    /// True when `[start, end]` lies entirely inside this shift.
    pub fn contains(&self, start: ClockTime, end: ClockTime) -> bool {
        start >= self.start_time && end <= self.end_time
    }

    /// True when `[start, end]` overlaps this shift or touches one of its ends.
    pub fn touches(&self, start: ClockTime, end: ClockTime) -> bool {
        start <= self.end_time && end >= self.start_time
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.kind, self.start_time, self.end_time)
    }
}

/// Sort a day's shifts by start time. The sort is stable, so shifts that
/// start together keep their insertion order.
pub fn sort_shifts(shifts: &mut [Shift]) {
    shifts.sort_by_key(|s| s.start_time);
}
