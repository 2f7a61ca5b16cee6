//! Planner configuration.
//!
//! Every constant the planner relies on lives in [`PlannerConfig`] and is
//! passed explicitly into each stage. `Default` reproduces the stock
//! schedule; a TOML file may override any subset of fields:
//!
//! ```toml
//! work_days = ["Sat", "Sun", "Mon", "Tue", "Wed"]
//!
//! [default_shift]
//! start = "03:00 AM"
//! end = "11:30 AM"
//!
//! [job_search]
//! weekly_goal_minutes = 2400
//! ```

use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::PlannerError;
use crate::shift::{Shift, ShiftKind};

/// Top-level planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// WORK shift seeded on designated work-days.
    pub default_shift: ShiftTemplate,

    /// Weekdays that carry the default WORK shift.
    pub work_days: Vec<Weekday>,

    /// Durations and anchors for routine derivation.
    pub routine: RoutineConfig,

    /// Weekly job-search quota and the limits it must respect.
    pub job_search: JobSearchConfig,
}

/// A start/end pair used to stamp out WORK shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// One fixed block of a rest-day routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineBlock {
    #[serde(rename = "type")]
    pub kind: ShiftKind,
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineConfig {
    /// Nap before the first shift starts this long before work.
    pub nap_lead_minutes: u16,
    pub nap_minutes: u16,
    /// PREP starts this long before work.
    pub prep_lead_minutes: u16,
    pub prep_minutes: u16,
    pub commute_minutes: u16,
    pub meal_minutes: u16,
    pub shower_minutes: u16,
    /// Post-work sleep length when the next day works.
    pub sleep_minutes: u16,
    /// Earliest post-work sleep start when the next day works.
    pub earliest_sleep_start: ClockTime,
    /// Fixed post-work sleep end when the next day is off.
    pub rest_eve_wake: ClockTime,
    /// Fixed schedule for days without WORK.
    pub rest_day: Vec<RoutineBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSearchConfig {
    pub weekly_goal_minutes: u32,
    pub block_minutes: u16,
    /// SLEEP is never trimmed below this.
    pub min_sleep_minutes: u16,
    /// No job search is placed after this time of day.
    pub day_cutoff: ClockTime,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_shift: ShiftTemplate {
                start: ClockTime::from_hm(3, 0),
                end: ClockTime::from_hm(11, 30),
            },
            work_days: vec![
                Weekday::Sat,
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
            ],
            routine: RoutineConfig::default(),
            job_search: JobSearchConfig::default(),
        }
    }
}

impl Default for RoutineConfig {
    fn default() -> Self {
        let block = |kind, start: (u16, u16), end: (u16, u16)| RoutineBlock {
            kind,
            start: ClockTime::from_hm(start.0, start.1),
            end: ClockTime::from_hm(end.0, end.1),
        };
        Self {
            nap_lead_minutes: 180,
            nap_minutes: 120,
            prep_lead_minutes: 60,
            prep_minutes: 45,
            commute_minutes: 15,
            meal_minutes: 60,
            shower_minutes: 60,
            sleep_minutes: 480,
            earliest_sleep_start: ClockTime::from_hm(15, 0),
            rest_eve_wake: ClockTime::from_hm(18, 30),
            rest_day: vec![
                block(ShiftKind::Sleep, (2, 0), (10, 0)),
                block(ShiftKind::Meal, (10, 0), (10, 30)),
                block(ShiftKind::Meal, (13, 0), (14, 0)),
                block(ShiftKind::Meal, (19, 0), (20, 0)),
                block(ShiftKind::Shower, (20, 0), (21, 0)),
            ],
        }
    }
}

impl Default for JobSearchConfig {
    fn default() -> Self {
        Self {
            weekly_goal_minutes: 40 * 60,
            block_minutes: 30,
            min_sleep_minutes: 390,
            day_cutoff: ClockTime::from_hm(23, 50),
        }
    }
}

impl PlannerConfig {
    /// Parse a TOML document, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] if the document is not valid TOML for
    /// this schema or fails [`PlannerConfig::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self, PlannerError> {
        let config: Self = toml::from_str(s).map_err(|e| PlannerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlannerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PlannerError::Config(format!("'{}': {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Reject values the planner cannot work with.
    pub fn validate(&self) -> Result<(), PlannerError> {
        self.default_work_shift()?;
        for block in &self.routine.rest_day {
            Shift::new(block.kind, block.start, block.end)
                .map_err(|e| PlannerError::Config(format!("rest_day: {e}")))?;
        }

        let js = &self.job_search;
        if js.block_minutes == 0 {
            return Err(PlannerError::Config(
                "job_search.block_minutes must be positive".to_string(),
            ));
        }
        if js.min_sleep_minutes > self.routine.sleep_minutes {
            return Err(PlannerError::Config(format!(
                "job_search.min_sleep_minutes ({}) exceeds routine.sleep_minutes ({})",
                js.min_sleep_minutes, self.routine.sleep_minutes
            )));
        }
        if self.routine.prep_minutes > self.routine.prep_lead_minutes {
            return Err(PlannerError::Config(
                "routine.prep_minutes exceeds routine.prep_lead_minutes".to_string(),
            ));
        }
        Ok(())
    }

    /// The Default Work Template as a [`Shift`].
    pub fn default_work_shift(&self) -> Result<Shift, PlannerError> {
        Shift::work(self.default_shift.start, self.default_shift.end)
            .map_err(|e| PlannerError::Config(format!("default_shift: {e}")))
    }

    pub fn is_work_day(&self, weekday: Weekday) -> bool {
        self.work_days.contains(&weekday)
    }
}
