//! Weekly job-search allocation.
//!
//! Fills free time from today on with JOB_SEARCH blocks until the weekly
//! goal is met. Time already spent earlier in the week counts toward the
//! goal. Blocks are handed out round-robin across days so the load spreads
//! evenly. If free time runs out first, the longest SLEEP blocks are trimmed
//! from the end, never below the sleep floor. Missing the goal after that is
//! an accepted outcome.

use std::cmp::Reverse;
use std::collections::{BTreeMap, VecDeque};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::clock::ClockTime;
use crate::config::{JobSearchConfig, PlannerConfig};
use crate::shift::{sort_shifts, Shift, ShiftKind};
use crate::week::{week_bounds, Week};

/// What one allocation pass achieved, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    /// Spent on days earlier this week, before today.
    pub already_minutes: u32,
    /// Placed into free gaps.
    pub gap_minutes: u32,
    /// Taken from sleep.
    pub reclaimed_minutes: u32,
    /// Still short of the weekly goal.
    pub unmet_minutes: u32,
}

/// A free interval of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Gap {
    pub fn minutes(&self) -> i64 {
        self.start.minutes_until(self.end)
    }
}

/// Allocate JOB_SEARCH time on days from `today` on.
pub fn allocate_job_search(
    week: &mut Week,
    today: NaiveDate,
    config: &PlannerConfig,
) -> AllocationSummary {
    let js = &config.job_search;
    let already = minutes_spent_before(week, today);
    let mut summary = AllocationSummary {
        already_minutes: already,
        ..Default::default()
    };

    let mut remaining = i64::from(js.weekly_goal_minutes) - i64::from(already);
    if remaining <= 0 {
        info!(already, "weekly job-search goal already met");
        return summary;
    }

    let placed = fill_gaps(week, today, js, &mut remaining);
    for (date, blocks) in placed {
        if let Some(day) = week.day_mut(date) {
            summary.gap_minutes += blocks.iter().map(minutes_of).sum::<u32>();
            day.extend(blocks);
            sort_shifts(day);
        }
    }

    if remaining > 0 {
        info!(remaining, "free time exhausted, reclaiming sleep for job search");
        summary.reclaimed_minutes = reclaim_sleep(week, today, js, &mut remaining);
    }

    summary.unmet_minutes = u32::try_from(remaining.max(0)).unwrap_or(u32::MAX);
    info!(
        already = summary.already_minutes,
        gaps = summary.gap_minutes,
        reclaimed = summary.reclaimed_minutes,
        unmet = summary.unmet_minutes,
        "job-search allocation finished"
    );
    summary
}

/// JOB_SEARCH minutes on days from this week's Sunday up to, not including, `today`.
pub fn minutes_spent_before(week: &Week, today: NaiveDate) -> u32 {
    let (sunday, _) = week_bounds(today);
    week.iter()
        .filter(|(date, _)| *date >= sunday && *date < today)
        .flat_map(|(_, shifts)| shifts.iter())
        .filter(|s| s.kind == ShiftKind::JobSearch)
        .map(minutes_of)
        .sum()
}

/// The complement of `shifts` within `[00:00, cutoff]`, earliest first.
pub fn free_gaps(shifts: &[Shift], cutoff: ClockTime) -> Vec<Gap> {
    let mut busy: Vec<(ClockTime, ClockTime)> =
        shifts.iter().map(|s| (s.start_time, s.end_time)).collect();
    busy.sort();

    let mut gaps = Vec::new();
    let mut cursor = ClockTime::MIDNIGHT;
    for (start, end) in busy {
        let gap_end = start.min(cutoff);
        if cursor < gap_end {
            gaps.push(Gap {
                start: cursor,
                end: gap_end,
            });
        }
        cursor = cursor.max(end);
    }
    if cursor < cutoff {
        gaps.push(Gap {
            start: cursor,
            end: cutoff,
        });
    }
    gaps
}

/// Round-robin one block per visit across dates with usable gaps.
/// Returns the new JOB_SEARCH shifts per date.
fn fill_gaps(
    week: &Week,
    today: NaiveDate,
    js: &JobSearchConfig,
    remaining: &mut i64,
) -> BTreeMap<NaiveDate, Vec<Shift>> {
    let block = i64::from(js.block_minutes);

    let mut gaps: BTreeMap<NaiveDate, VecDeque<Gap>> = week
        .iter()
        .filter(|(date, _)| *date >= today)
        .map(|(date, shifts)| (date, free_gaps(shifts, js.day_cutoff).into()))
        .filter(|(_, gaps): &(NaiveDate, VecDeque<Gap>)| !gaps.is_empty())
        .collect();
    let mut queue: VecDeque<NaiveDate> = gaps.keys().copied().collect();
    let mut placed: BTreeMap<NaiveDate, Vec<Shift>> = BTreeMap::new();

    while *remaining > 0 {
        let Some(date) = queue.pop_front() else {
            break;
        };
        let Some(day_gaps) = gaps.get_mut(&date) else {
            continue;
        };

        while let Some(gap) = day_gaps.front_mut() {
            if gap.minutes() < block {
                day_gaps.pop_front();
                continue;
            }
            let len = block.min(*remaining);
            let (end, _) = gap.start.add_minutes_with_rollover(len);
            merge_job_search(placed.entry(date).or_default(), gap.start, end);
            gap.start = end;
            *remaining -= len;
            break;
        }

        if !day_gaps.is_empty() {
            queue.push_back(date);
        }
    }
    placed
}

/// A SLEEP shift that may still give up time.
struct SleepBlock {
    date: NaiveDate,
    index: usize,
    start: ClockTime,
    end: ClockTime,
}

impl SleepBlock {
    fn minutes(&self) -> i64 {
        self.start.minutes_until(self.end)
    }
}

/// Trim the longest SLEEP blocks from the end, one block at a time, and put
/// JOB_SEARCH in the freed time. Returns the minutes reclaimed.
fn reclaim_sleep(
    week: &mut Week,
    today: NaiveDate,
    js: &JobSearchConfig,
    remaining: &mut i64,
) -> u32 {
    let floor = i64::from(js.min_sleep_minutes);
    let block = i64::from(js.block_minutes);

    let mut candidates: Vec<SleepBlock> = week
        .iter()
        .filter(|(date, _)| *date >= today)
        .flat_map(|(date, shifts)| {
            shifts
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind == ShiftKind::Sleep)
                .map(move |(index, s)| SleepBlock {
                    date,
                    index,
                    start: s.start_time,
                    end: s.end_time,
                })
        })
        .filter(|b| b.minutes() > floor)
        .collect();

    let mut reclaimed = 0;
    let mut touched = Vec::new();
    while *remaining > 0 {
        let len = block.min(*remaining);
        let Some(longest) = candidates
            .iter_mut()
            .filter(|b| b.minutes() - len >= floor)
            .max_by_key(|b| (b.minutes(), Reverse(b.date), Reverse(b.start)))
        else {
            break;
        };

        let Some(day) = week.day_mut(longest.date) else {
            break;
        };
        let (new_end, _) = longest.end.add_minutes_with_rollover(-len);
        let freed_until = longest.end;
        if let Some(sleep) = day.get_mut(longest.index) {
            sleep.end_time = new_end;
        }
        merge_job_search(day, new_end, freed_until);

        longest.end = new_end;
        touched.push(longest.date);
        *remaining -= len;
        reclaimed += len;
    }

    touched.sort();
    touched.dedup();
    for date in touched {
        if let Some(day) = week.day_mut(date) {
            sort_shifts(day);
        }
    }
    u32::try_from(reclaimed).unwrap_or(u32::MAX)
}

/// Add JOB_SEARCH `[start, end)` to `day`, joining a JOB_SEARCH shift that
/// ends at `start` or begins at `end`. Existing shifts keep their positions.
fn merge_job_search(day: &mut Vec<Shift>, start: ClockTime, end: ClockTime) {
    let is_job_search = |s: &Shift| s.kind == ShiftKind::JobSearch;
    if let Some(i) = day.iter().position(|s| is_job_search(s) && s.end_time == start) {
        day[i].end_time = end;
    } else if let Some(i) = day.iter().position(|s| is_job_search(s) && s.start_time == end) {
        day[i].start_time = start;
    } else {
        day.push(Shift {
            kind: ShiftKind::JobSearch,
            start_time: start,
            end_time: end,
        });
    }
}

fn minutes_of(shift: &Shift) -> u32 {
    u32::try_from(shift.duration_minutes()).unwrap_or(0)
}
