//! The edit-and-optimize cycle.
//!
//! [`Planner`] owns a validated [`PlannerConfig`] and drives the fixed
//! sequence every change to the schedule goes through:
//!
//! 1. strip derived shifts from today on, keeping WORK
//! 2. apply at most one VET or VTO edit
//! 3. derive the daily routine, then allocate job-search time
//!
//! The cycle runs on a working copy of the week. The caller's week is only
//! replaced when every step succeeds.

use chrono::NaiveDate;
use tracing::info;

use crate::config::PlannerConfig;
use crate::edit::{self, Edit};
use crate::error::PlannerError;
use crate::job_search::{allocate_job_search, AllocationSummary};
use crate::report::{self, JobSearchReport};
use crate::routine::optimize_routine;
use crate::week::{format_date, Week};

#[derive(Debug, Clone, PartialEq)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] if `config` fails validation.
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// A fresh week around `today`.
    pub fn current_week(&self, today: NaiveDate) -> Result<Week, PlannerError> {
        Week::current(today, &self.config)
    }

    /// Fit a stored week onto the week around `today`.
    pub fn reconcile(&self, stored: Week, today: NaiveDate) -> Result<Week, PlannerError> {
        Week::reconcile(stored, today, &self.config)
    }

    /// Derive the routine, then allocate job search, for days from `today` on.
    ///
    /// Days from `today` on are expected to hold only WORK.
    pub fn optimize(&self, week: &mut Week, today: NaiveDate) -> AllocationSummary {
        optimize_routine(week, today, &self.config);
        allocate_job_search(week, today, &self.config)
    }

    /// Strip and optimize again without an edit.
    pub fn reoptimize(&self, week: &mut Week, today: NaiveDate) -> AllocationSummary {
        week.strip_non_work(today);
        self.optimize(week, today)
    }

    /// Run one full cycle around `edit`.
    ///
    /// # Errors
    ///
    /// Any error from the edit. `week` is left exactly as it was.
    pub fn apply_edit(
        &self,
        week: &mut Week,
        edit: &Edit,
        today: NaiveDate,
    ) -> Result<AllocationSummary, PlannerError> {
        let mut working = week.clone();
        working.strip_non_work(today);
        edit::apply_edit(&mut working, edit, today, &self.config)?;
        let summary = self.optimize(&mut working, today);

        info!(
            date = %format_date(edit.date()),
            unmet = summary.unmet_minutes,
            "edit applied and schedule optimized"
        );
        *week = working;
        Ok(summary)
    }

    /// JOB_SEARCH hours for the week around `today`.
    pub fn job_search_report(&self, week: &Week, today: NaiveDate) -> JobSearchReport {
        report::job_search_report(week, today)
    }
}
