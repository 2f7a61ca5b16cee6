//! The rolling Sunday–Saturday week.
//!
//! A [`Week`] maps calendar dates to each day's shifts. Dates are real
//! [`NaiveDate`] keys in a `BTreeMap`, so iteration is chronological. The
//! schedule file still uses `MM/DD/YYYY` strings as keys.
//!
//! Nothing here reads the system clock. The caller passes "today".

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::shift::{sort_shifts, Shift};

/// Date key format used in the schedule file and in printed output.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse an `MM/DD/YYYY` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| PlannerError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Format a date as `MM/DD/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The Sunday and Saturday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let sunday = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    (sunday, sunday + Duration::days(6))
}

/// Ordered mapping from date to that day's shifts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Week {
    #[serde(with = "date_keys")]
    days: BTreeMap<NaiveDate, Vec<Shift>>,
}

impl Week {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh Sunday–Saturday week around `today`, with the default WORK
    /// shift on every designated work-day.
    pub fn current(today: NaiveDate, config: &PlannerConfig) -> Result<Self, PlannerError> {
        let (sunday, _) = week_bounds(today);
        let mut week = Self::new();
        for date in sunday.iter_days().take(7) {
            week.days.insert(date, seed_day(date, config)?);
        }
        Ok(week)
    }

    /// Fit a stored week onto the current window.
    ///
    /// Stored days inside the window are kept and days outside it are
    /// dropped. Missing days are seeded. Any designated work-day left
    /// without WORK gets the default shift appended.
    pub fn reconcile(
        mut stored: Week,
        today: NaiveDate,
        config: &PlannerConfig,
    ) -> Result<Self, PlannerError> {
        let fresh = Self::current(today, config)?;
        let default_shift = config.default_work_shift()?;

        let mut week = Self::new();
        for (date, seeded) in fresh.days {
            let mut shifts = stored.days.remove(&date).unwrap_or(seeded);
            if config.is_work_day(date.weekday()) && !shifts.iter().any(Shift::is_work) {
                shifts.push(default_shift);
            }
            sort_shifts(&mut shifts);
            week.days.insert(date, shifts);
        }
        Ok(week)
    }

    /// Drop every non-WORK shift on days from `today` on. Earlier days are
    /// left as they are.
    pub fn strip_non_work(&mut self, today: NaiveDate) {
        for shifts in self.days.range_mut(today..).map(|(_, shifts)| shifts) {
            shifts.retain(Shift::is_work);
        }
    }

    /// Make sure `target` exists. If it lies past the last stored date,
    /// every date after the last one up to and including `target` is seeded
    /// from the Default Work Template rule first.
    pub fn fill_through(
        &mut self,
        target: NaiveDate,
        config: &PlannerConfig,
    ) -> Result<(), PlannerError> {
        let first_missing = match self.last_date() {
            Some(last) if last >= target => None,
            Some(last) => last.succ_opt(),
            None => Some(target),
        };
        if let Some(first) = first_missing {
            for date in first.iter_days().take_while(|d| *d <= target) {
                self.days.insert(date, seed_day(date, config)?);
            }
        }
        self.days.entry(target).or_default();
        Ok(())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&[Shift]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub(crate) fn day_mut(&mut self, date: NaiveDate) -> Option<&mut Vec<Shift>> {
        self.days.get_mut(&date)
    }

    /// Replace a day's shifts, keeping them sorted.
    pub fn set_day(&mut self, date: NaiveDate, mut shifts: Vec<Shift>) {
        sort_shifts(&mut shifts);
        self.days.insert(date, shifts);
    }

    /// All dates in chronological order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Shift])> {
        self.days.iter().map(|(d, s)| (*d, s.as_slice()))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// The stored date immediately before `date`, regardless of calendar gaps.
    pub fn previous_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.days.range(..date).next_back().map(|(d, _)| *d)
    }

    /// The stored date immediately after `date`, regardless of calendar gaps.
    pub fn next_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.days
            .range((Bound::Excluded(date), Bound::Unbounded))
            .next()
            .map(|(d, _)| *d)
    }

    /// Whether `date` is stored and holds at least one WORK shift.
    pub fn has_work(&self, date: NaiveDate) -> bool {
        self.day(date)
            .is_some_and(|shifts| shifts.iter().any(Shift::is_work))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Shifts for a newly created day: the default WORK shift on work-days.
fn seed_day(date: NaiveDate, config: &PlannerConfig) -> Result<Vec<Shift>, PlannerError> {
    if config.is_work_day(date.weekday()) {
        Ok(vec![config.default_work_shift()?])
    } else {
        Ok(Vec::new())
    }
}

/// Serialize a `NaiveDate` as `MM/DD/YYYY`.
pub(crate) fn serialize_date<S: serde::Serializer>(
    date: &NaiveDate,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

/// `MM/DD/YYYY`-keyed map encoding, written in chronological order.
mod date_keys {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_date, parse_date};
    use crate::shift::{sort_shifts, Shift};

    pub fn serialize<S: Serializer>(
        days: &BTreeMap<NaiveDate, Vec<Shift>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(days.iter().map(|(date, shifts)| (format_date(*date), shifts)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<NaiveDate, Vec<Shift>>, D::Error> {
        let raw = BTreeMap::<String, Vec<Shift>>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, mut shifts)| {
                let date = parse_date(&key).map_err(D::Error::custom)?;
                sort_shifts(&mut shifts);
                Ok((date, shifts))
            })
            .collect()
    }
}
