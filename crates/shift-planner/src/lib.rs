//! # shift-planner
//!
//! Weekly schedule planning around variable work shifts.
//!
//! Given the WORK shifts of a Sunday–Saturday week, shift-planner derives a
//! daily routine (prep, commute, meals, shower, sleep) around them and then
//! spreads a weekly job-search quota over the time that is left, trimming
//! sleep down to a floor when free time runs out. Work can be added (VET) or
//! removed (VTO) one edit at a time, each followed by a fresh optimization.
//!
//! ## Modules
//!
//! - [`clock`] — 12-hour wall-clock times and rollover arithmetic
//! - [`shift`] — Typed intervals within a day
//! - [`week`] — The date-keyed week, seeding and reconciliation
//! - [`edit`] — VET and VTO edits
//! - [`routine`] — Sleep and daily-routine derivation
//! - [`job_search`] — Weekly job-search allocation and sleep reclamation
//! - [`report`] — Job-search hours and printable schedule views
//! - [`planner`] — The strip → edit → optimize cycle
//! - [`store`] — JSON schedule file persistence
//! - [`config`] — Planner configuration
//! - [`error`] — Error types

pub mod clock;
pub mod config;
pub mod edit;
pub mod error;
pub mod job_search;
pub mod planner;
pub mod report;
pub mod routine;
pub mod shift;
pub mod store;
pub mod week;

pub use clock::ClockTime;
pub use config::{JobSearchConfig, PlannerConfig, RoutineBlock, RoutineConfig, ShiftTemplate};
pub use edit::{apply_edit, apply_vet, apply_vto, validate_target, Edit, VtoScope};
pub use error::{PlannerError, Result};
pub use job_search::{allocate_job_search, free_gaps, AllocationSummary, Gap};
pub use planner::Planner;
pub use report::{job_search_report, DayHours, JobSearchReport, ScheduleView};
pub use routine::optimize_routine;
pub use shift::{sort_shifts, Shift, ShiftKind};
pub use week::{format_date, parse_date, week_bounds, Week};
