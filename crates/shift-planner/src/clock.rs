//! Wall-clock times of day in 12-hour notation.
//!
//! A [`ClockTime`] carries no date. It has minute resolution and ranges from
//! `00:00` to `24:00`, where `24:00` exists only as the end-of-day bound of a
//! shift that runs up to midnight. Both `00:00` and `24:00` format as
//! `"12:00 AM"`.
//!
//! # Functions
//!
//! - [`ClockTime::parse`] — `"HH:MM AM/PM"` → [`ClockTime`]
//! - [`ClockTime::add_hours`] — signed fractional-hour arithmetic, wrapping at 24h
//! - [`ClockTime::add_minutes_with_rollover`] — the same arithmetic, reporting
//!   how many midnights were crossed

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlannerError;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// chrono format used for both parsing and display.
const CLOCK_FORMAT: &str = "%I:%M %p";

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// `12:00 AM`, the start of a day.
    pub const MIDNIGHT: ClockTime = ClockTime { minutes: 0 };

    /// `24:00`, the end of a day. Formats as `12:00 AM`.
    pub const END_OF_DAY: ClockTime = ClockTime {
        minutes: MINUTES_PER_DAY,
    };

    /// Build a time from a 24-hour `hour` and `minute`.
    ///
    /// Values past `24:00` saturate to [`ClockTime::END_OF_DAY`].
    pub const fn from_hm(hour: u16, minute: u16) -> Self {
        let minutes = hour.saturating_mul(60).saturating_add(minute);
        if minutes > MINUTES_PER_DAY {
            Self::END_OF_DAY
        } else {
            Self { minutes }
        }
    }

    /// Build a time from minutes since midnight, `0..=1440`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.minutes
    }

    /// Signed number of minutes from `self` to `later`.
    pub fn minutes_until(self, later: ClockTime) -> i64 {
        i64::from(later.minutes) - i64::from(self.minutes)
    }

    /// Parse a 12-hour clock string such as `"03:00 AM"` or `"3:00 pm"`.
    ///
    /// An hour written as `00` with `AM` is read as midnight (`12:xx AM`).
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidTime`] if the string is not a valid
    /// 12-hour time.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_planner::clock::ClockTime;
    ///
    /// let t = ClockTime::parse("00:00 AM").unwrap();
    /// assert_eq!(t, ClockTime::MIDNIGHT);
    /// assert_eq!(t.to_string(), "12:00 AM");
    /// ```
    pub fn parse(s: &str) -> Result<Self, PlannerError> {
        let trimmed = s.trim();
        let normalized = match trimmed.strip_prefix("00:") {
            Some(rest) if rest.to_ascii_uppercase().ends_with("AM") => format!("12:{rest}"),
            _ => trimmed.to_string(),
        };

        let time = NaiveTime::parse_from_str(&normalized, CLOCK_FORMAT)
            .map_err(|e| PlannerError::InvalidTime(format!("'{}': {}", s, e)))?;

        // NaiveTime hours are 0..=23 and minutes 0..=59, so this cannot overflow.
        Ok(Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        })
    }

    /// Add a signed, possibly fractional number of hours, rounded to the
    /// minute. The result wraps around the clock face; crossing midnight is
    /// not reported. Use [`ClockTime::add_minutes_with_rollover`] when the
    /// caller needs to know.
    pub fn add_hours(self, hours: f64) -> Self {
        let minutes = (hours * 60.0).round() as i64;
        self.add_minutes_with_rollover(minutes).0
    }

    /// Add a signed number of minutes, returning the wrapped time of day and
    /// the number of days crossed (negative when moving before midnight).
    ///
    /// ```
    /// use shift_planner::clock::ClockTime;
    ///
    /// let (t, days) = ClockTime::from_hm(23, 0).add_minutes_with_rollover(90);
    /// assert_eq!(t, ClockTime::from_hm(0, 30));
    /// assert_eq!(days, 1);
    /// ```
    pub fn add_minutes_with_rollover(self, minutes: i64) -> (Self, i64) {
        let day = i64::from(MINUTES_PER_DAY);
        let total = i64::from(self.minutes) + minutes;
        let wrapped = total.rem_euclid(day) as u16;
        (Self { minutes: wrapped }, total.div_euclid(day))
    }

    fn to_naive(self) -> NaiveTime {
        let minutes = u32::from(self.minutes % MINUTES_PER_DAY);
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_naive().format(CLOCK_FORMAT))
    }
}

impl FromStr for ClockTime {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
