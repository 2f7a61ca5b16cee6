//! Sleep and daily-routine derivation.
//!
//! For every day from today on, derives PREP, COMMUTE, MEAL, SHOWER and
//! SLEEP around the day's WORK. A day without WORK gets the fixed rest-day
//! routine instead.
//!
//! Derivation runs in two phases. The first phase plans every day from a
//! read-only view of the week. The second phase merges each plan into its
//! day and sorts the day once.
//!
//! # Day boundary
//!
//! Derived times are computed with
//! [`ClockTime::add_minutes_with_rollover`]. An interval reaching before
//! midnight is clamped to start at `12:00 AM`. An interval running past
//! midnight is clamped to end at the end of the day. An interval left empty
//! by clamping is dropped. Every clamp is logged as a warning.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::clock::ClockTime;
use crate::config::{PlannerConfig, RoutineConfig};
use crate::shift::{sort_shifts, Shift, ShiftKind};
use crate::week::{format_date, Week};

/// Derive routine shifts for every day on or after `today`.
///
/// Expects days from `today` on to hold only WORK (see
/// [`Week::strip_non_work`]).
pub fn optimize_routine(week: &mut Week, today: NaiveDate, config: &PlannerConfig) {
    let plans: Vec<(NaiveDate, Vec<Shift>)> = week
        .dates()
        .filter(|date| *date >= today)
        .map(|date| (date, plan_day(week, date, config)))
        .collect();

    for (date, derived) in plans {
        if let Some(day) = week.day_mut(date) {
            day.extend(derived);
            sort_shifts(day);
        }
    }
}

/// Shifts to add to `date`, without touching the week.
fn plan_day(week: &Week, date: NaiveDate, config: &PlannerConfig) -> Vec<Shift> {
    let mut work: Vec<Shift> = week
        .day(date)
        .unwrap_or_default()
        .iter()
        .filter(|s| s.is_work())
        .copied()
        .collect();
    sort_shifts(&mut work);

    let mut plan = DayPlan::new(date);
    match (work.first(), work.last()) {
        (Some(first), Some(last)) => {
            let previous_works = week.previous_date(date).is_some_and(|d| week.has_work(d));
            let next_works = week.next_date(date).is_some_and(|d| week.has_work(d));
            debug!(
                date = %format_date(date),
                shifts = work.len(),
                previous_works,
                next_works,
                "planning work day"
            );
            plan.work_day(
                first.start_time,
                last.end_time,
                previous_works,
                next_works,
                &config.routine,
            );
        }
        _ => {
            debug!(date = %format_date(date), "planning rest day");
            for block in &config.routine.rest_day {
                plan.push(block.kind, Moment::at(block.start), Moment::at(block.end));
            }
        }
    }
    plan.shifts
}

/// A derived instant: a clock time plus the number of midnights crossed
/// relative to the planned day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Moment {
    days: i64,
    time: ClockTime,
}

impl Moment {
    fn at(time: ClockTime) -> Self {
        Self { days: 0, time }
    }

    fn offset(anchor: ClockTime, minutes: i64) -> Self {
        Self::at(anchor).plus(minutes)
    }

    fn plus(self, minutes: i64) -> Self {
        let (time, days) = self.time.add_minutes_with_rollover(minutes);
        Self {
            days: self.days + days,
            time,
        }
    }

    /// The same instant expressed within the planned day, if it falls there.
    fn within_day(self) -> Option<ClockTime> {
        match self.days {
            0 => Some(self.time),
            1 if self.time == ClockTime::MIDNIGHT => Some(ClockTime::END_OF_DAY),
            _ => None,
        }
    }

    fn clamped(self) -> ClockTime {
        match self.within_day() {
            Some(time) => time,
            None if self.days < 0 => ClockTime::MIDNIGHT,
            None => ClockTime::END_OF_DAY,
        }
    }
}

struct DayPlan {
    date: NaiveDate,
    shifts: Vec<Shift>,
}

impl DayPlan {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            shifts: Vec::new(),
        }
    }

    /// Derive the routine around WORK from `start` to `end`.
    fn work_day(
        &mut self,
        start: ClockTime,
        end: ClockTime,
        previous_works: bool,
        next_works: bool,
        routine: &RoutineConfig,
    ) {
        let mins = |m: u16| i64::from(m);

        if !previous_works {
            let nap = Moment::offset(start, -mins(routine.nap_lead_minutes));
            self.push(ShiftKind::Sleep, nap, nap.plus(mins(routine.nap_minutes)));
        }

        let prep = Moment::offset(start, -mins(routine.prep_lead_minutes));
        self.push(ShiftKind::Prep, prep, prep.plus(mins(routine.prep_minutes)));
        self.push(
            ShiftKind::Commute,
            Moment::offset(start, -mins(routine.commute_minutes)),
            Moment::at(start),
        );

        let home = Moment::offset(end, mins(routine.commute_minutes));
        self.push(ShiftKind::Commute, Moment::at(end), home);

        let meal_end = home.plus(mins(routine.meal_minutes));
        self.push(ShiftKind::Meal, home, meal_end);

        let shower_end = meal_end.plus(mins(routine.shower_minutes));
        self.push(ShiftKind::Shower, meal_end, shower_end);

        let (sleep_start, sleep_end) = if next_works {
            let start = shower_end.max(Moment::at(routine.earliest_sleep_start));
            (start, start.plus(mins(routine.sleep_minutes)))
        } else {
            (shower_end, Moment::at(routine.rest_eve_wake))
        };
        if self.push(ShiftKind::Sleep, sleep_start, sleep_end) {
            self.push(
                ShiftKind::Meal,
                sleep_end,
                sleep_end.plus(mins(routine.meal_minutes)),
            );
        }
    }

    /// Add `[from, to)` clamped to the day. Returns whether anything was added.
    fn push(&mut self, kind: ShiftKind, from: Moment, to: Moment) -> bool {
        let (start, end) = (from.clamped(), to.clamped());
        if start >= end {
            warn!(
                date = %format_date(self.date),
                %kind,
                "dropped {kind}: nothing left within the day"
            );
            return false;
        }
        if from.within_day().is_none() || to.within_day().is_none() {
            warn!(
                date = %format_date(self.date),
                %kind,
                %start,
                %end,
                "clamped {kind} to the day boundary"
            );
        }
        self.shifts.push(Shift {
            kind,
            start_time: start,
            end_time: end,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u16, m: u16) -> ClockTime {
        ClockTime::from_hm(h, m)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn shift(kind: ShiftKind, start: ClockTime, end: ClockTime) -> Shift {
        Shift::new(kind, start, end).unwrap()
    }

    fn of_kind(day: &[Shift], kind: ShiftKind) -> Vec<Shift> {
        day.iter().filter(|s| s.kind == kind).copied().collect()
    }

    fn default_work() -> Shift {
        Shift::work(t(3, 0), t(11, 30)).unwrap()
    }

    /// Three consecutive stored days with the given WORK.
    fn three_days(prev: Vec<Shift>, day: Vec<Shift>, next: Vec<Shift>) -> Week {
        let mut week = Week::new();
        week.set_day(date(15), prev);
        week.set_day(date(16), day);
        week.set_day(date(17), next);
        week
    }

    // ── work day tests ──────────────────────────────────────────────────

    #[test]
    fn test_single_shift_day_between_work_days() {
        let config = PlannerConfig::default();
        let mut week = three_days(vec![default_work()], vec![default_work()], vec![default_work()]);
        optimize_routine(&mut week, date(16), &config);

        let day = week.day(date(16)).unwrap();
        assert_eq!(of_kind(day, ShiftKind::Prep), vec![shift(ShiftKind::Prep, t(2, 0), t(2, 45))]);
        assert_eq!(
            of_kind(day, ShiftKind::Commute),
            vec![
                shift(ShiftKind::Commute, t(2, 45), t(3, 0)),
                shift(ShiftKind::Commute, t(11, 30), t(11, 45)),
            ]
        );
        assert_eq!(
            of_kind(day, ShiftKind::Meal),
            vec![
                shift(ShiftKind::Meal, t(11, 45), t(12, 45)),
                shift(ShiftKind::Meal, t(23, 0), ClockTime::END_OF_DAY),
            ]
        );
        assert_eq!(
            of_kind(day, ShiftKind::Shower),
            vec![shift(ShiftKind::Shower, t(12, 45), t(13, 45))]
        );
        // Previous day works, so no nap; sleep waits until 3 PM.
        assert_eq!(
            of_kind(day, ShiftKind::Sleep),
            vec![shift(ShiftKind::Sleep, t(15, 0), t(23, 0))]
        );
    }

    #[test]
    fn test_day_is_sorted_after_planning() {
        let config = PlannerConfig::default();
        let mut week = three_days(Vec::new(), vec![default_work()], Vec::new());
        optimize_routine(&mut week, date(16), &config);

        let day = week.day(date(16)).unwrap();
        assert!(day.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        assert!(day.windows(2).all(|w| w[0].end_time <= w[1].start_time));
    }

    #[test]
    fn test_nap_when_previous_day_is_off() {
        let config = PlannerConfig::default();
        let mut week = three_days(Vec::new(), vec![default_work()], Vec::new());
        optimize_routine(&mut week, date(16), &config);

        let sleeps = of_kind(week.day(date(16)).unwrap(), ShiftKind::Sleep);
        assert_eq!(sleeps[0], shift(ShiftKind::Sleep, t(0, 0), t(2, 0)));
        // Next day is off: sleep from shower end until 6:30 PM.
        assert_eq!(sleeps[1], shift(ShiftKind::Sleep, t(13, 45), t(18, 30)));
        let meals = of_kind(week.day(date(16)).unwrap(), ShiftKind::Meal);
        assert_eq!(meals[1], shift(ShiftKind::Meal, t(18, 30), t(19, 30)));
    }

    #[test]
    fn test_first_stored_day_gets_nap() {
        let config = PlannerConfig::default();
        let mut week = Week::new();
        week.set_day(date(16), vec![Shift::work(t(8, 0), t(16, 0)).unwrap()]);
        optimize_routine(&mut week, date(16), &config);

        let sleeps = of_kind(week.day(date(16)).unwrap(), ShiftKind::Sleep);
        assert_eq!(sleeps[0], shift(ShiftKind::Sleep, t(5, 0), t(7, 0)));
    }

    #[test]
    fn test_multiple_shifts_wrap_outer_edges() {
        let config = PlannerConfig::default();
        let mut week = three_days(
            vec![default_work()],
            vec![
                Shift::work(t(4, 0), t(8, 0)).unwrap(),
                Shift::work(t(9, 0), t(12, 0)).unwrap(),
            ],
            vec![default_work()],
        );
        optimize_routine(&mut week, date(16), &config);

        let day = week.day(date(16)).unwrap();
        assert_eq!(of_kind(day, ShiftKind::Work).len(), 2);
        assert_eq!(of_kind(day, ShiftKind::Prep), vec![shift(ShiftKind::Prep, t(3, 0), t(3, 45))]);
        let commutes = of_kind(day, ShiftKind::Commute);
        assert_eq!(commutes[0].end_time, t(4, 0));
        assert_eq!(commutes[1].start_time, t(12, 0));
        // Nothing scheduled between the two shifts.
        assert!(!day
            .iter()
            .any(|s| !s.is_work() && s.start_time >= t(8, 0) && s.start_time < t(9, 0)));
    }

    #[test]
    fn test_late_shower_pushes_sleep_past_three() {
        let config = PlannerConfig::default();
        let mut week = three_days(
            vec![default_work()],
            vec![Shift::work(t(6, 0), t(14, 0)).unwrap()],
            vec![default_work()],
        );
        optimize_routine(&mut week, date(16), &config);

        let sleeps = of_kind(week.day(date(16)).unwrap(), ShiftKind::Sleep);
        // Shower ends 4:15 PM; 8h would end 12:15 AM, clamped to end of day.
        assert_eq!(sleeps, vec![shift(ShiftKind::Sleep, t(16, 15), ClockTime::END_OF_DAY)]);
        // No room left for the trailing meal.
        assert_eq!(of_kind(week.day(date(16)).unwrap(), ShiftKind::Meal).len(), 1);
    }

    #[test]
    fn test_early_shift_clamps_to_midnight() {
        let config = PlannerConfig::default();
        let mut week = Week::new();
        week.set_day(date(16), vec![Shift::work(t(0, 30), t(8, 0)).unwrap()]);
        optimize_routine(&mut week, date(16), &config);

        let day = week.day(date(16)).unwrap();
        // Nap would be 9:30 PM - 11:30 PM the day before: dropped entirely.
        assert!(!day.iter().any(|s| s.kind == ShiftKind::Sleep && s.end_time <= t(0, 30)));
        assert_eq!(of_kind(day, ShiftKind::Prep), vec![shift(ShiftKind::Prep, t(0, 0), t(0, 15))]);
    }

    #[test]
    fn test_no_sleep_when_shower_ends_after_wake_time() {
        let config = PlannerConfig::default();
        let mut week = three_days(
            vec![default_work()],
            vec![Shift::work(t(10, 0), t(17, 0)).unwrap()],
            Vec::new(),
        );
        optimize_routine(&mut week, date(16), &config);

        let day = week.day(date(16)).unwrap();
        assert!(of_kind(day, ShiftKind::Sleep).is_empty());
        assert_eq!(of_kind(day, ShiftKind::Meal).len(), 1);
    }

    // ── rest day / window tests ─────────────────────────────────────────

    #[test]
    fn test_rest_day_routine() {
        let config = PlannerConfig::default();
        let mut week = three_days(vec![default_work()], Vec::new(), vec![default_work()]);
        optimize_routine(&mut week, date(16), &config);

        let day = week.day(date(16)).unwrap();
        assert_eq!(
            day,
            &[
                shift(ShiftKind::Sleep, t(2, 0), t(10, 0)),
                shift(ShiftKind::Meal, t(10, 0), t(10, 30)),
                shift(ShiftKind::Meal, t(13, 0), t(14, 0)),
                shift(ShiftKind::Meal, t(19, 0), t(20, 0)),
                shift(ShiftKind::Shower, t(20, 0), t(21, 0)),
            ]
        );
    }

    #[test]
    fn test_days_before_today_untouched() {
        let config = PlannerConfig::default();
        let mut week = three_days(vec![default_work()], vec![default_work()], Vec::new());
        optimize_routine(&mut week, date(16), &config);
        assert_eq!(week.day(date(15)).unwrap(), &[default_work()]);
    }

    #[test]
    fn test_moment_ordering_spans_days() {
        let late = Moment::offset(t(23, 0), 120);
        assert!(late > Moment::at(t(15, 0)));
        assert_eq!(late.clamped(), ClockTime::END_OF_DAY);
        assert_eq!(Moment::offset(t(23, 0), 60).within_day(), Some(ClockTime::END_OF_DAY));
        assert_eq!(Moment::offset(t(1, 0), -180).clamped(), ClockTime::MIDNIGHT);
    }
}
