//! Read-only views over a [`Week`].
//!
//! - [`job_search_report`] — JOB_SEARCH hours per day and for the week
//! - [`ScheduleView`] — the whole week, one shift per line

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::shift::ShiftKind;
use crate::week::{format_date, serialize_date, week_bounds, Week};

/// JOB_SEARCH time for one stored day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayHours {
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub weekday: String,
    pub minutes: u32,
    pub hours: f64,
}

/// JOB_SEARCH totals for the Sunday–Saturday week around a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSearchReport {
    pub days: Vec<DayHours>,
    pub total_minutes: u32,
    pub total_hours: f64,
}

/// Sum JOB_SEARCH time for each stored day of the week containing `today`.
/// Days missing from the week are left out.
pub fn job_search_report(week: &Week, today: NaiveDate) -> JobSearchReport {
    let (sunday, saturday) = week_bounds(today);

    let days: Vec<DayHours> = week
        .iter()
        .filter(|(date, _)| *date >= sunday && *date <= saturday)
        .map(|(date, shifts)| {
            let minutes: u32 = shifts
                .iter()
                .filter(|s| s.kind == ShiftKind::JobSearch)
                .map(|s| u32::try_from(s.duration_minutes()).unwrap_or(0))
                .sum();
            DayHours {
                date,
                weekday: weekday_name(date),
                minutes,
                hours: to_hours(minutes),
            }
        })
        .collect();

    let total_minutes = days.iter().map(|d| d.minutes).sum();
    JobSearchReport {
        days,
        total_minutes,
        total_hours: to_hours(total_minutes),
    }
}

fn to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / 60.0
}

fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

impl fmt::Display for JobSearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in &self.days {
            writeln!(
                f,
                "{} ({}): {:.2} hr",
                day.weekday,
                format_date(day.date),
                day.hours
            )?;
        }
        write!(f, "Total weekly job search time (hr): {:.2}", self.total_hours)
    }
}

/// Printable form of a whole week.
pub struct ScheduleView<'a>(pub &'a Week);

impl fmt::Display for ScheduleView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weekly Schedule:")?;
        for (date, shifts) in self.0.iter() {
            writeln!(f)?;
            writeln!(f, "{}, {}:", weekday_name(date), format_date(date))?;
            if shifts.is_empty() {
                writeln!(f, "  No shifts scheduled.")?;
            }
            for shift in shifts {
                writeln!(f, "  {shift}")?;
            }
        }
        Ok(())
    }
}
