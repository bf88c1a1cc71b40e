//! Recurrence expansion
//!
//! Turns a recurrence rule into its ordered sequence of concrete
//! occurrence dates, then plans which occurrences can be materialized
//! against the room's committed bookings. Occurrences that conflict are
//! skipped and reported; they never fail the run. The plan threads an
//! accumulator of committed intervals forward so that occurrences
//! admitted earlier in the same run are visible to later checks.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::conflict::has_conflict;
use super::interval::Interval;
use crate::models::{RecurrenceRule, RecurrenceType};

/// Why an occurrence was not materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    Conflict,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Conflict => write!(f, "conflict"),
        }
    }
}

/// One occurrence that could not be materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedOccurrence {
    pub date: NaiveDate,
    pub reason: SkipReason,
}

/// Outcome of planning one expansion run
#[derive(Debug, Clone)]
pub struct ExpansionPlan {
    /// Conflict-free candidate intervals, in date order
    pub to_create: Vec<Interval>,
    /// Occurrences rejected by the conflict check, in date order
    pub skipped: Vec<SkippedOccurrence>,
}

/// All candidate occurrence dates for a rule, ascending, from `anchor`
/// through the rule's end date (inclusive).
pub fn occurrence_dates(rule: &RecurrenceRule, anchor: NaiveDate) -> Vec<NaiveDate> {
    match rule.kind {
        RecurrenceType::Daily => anchor
            .iter_days()
            .take_while(|d| *d <= rule.end_date)
            .collect(),
        RecurrenceType::Weekly => anchor
            .iter_days()
            .take_while(|d| *d <= rule.end_date)
            .filter(|d| rule.weekdays.contains(&d.weekday()))
            .collect(),
        RecurrenceType::Biweekly => biweekly_dates(rule, anchor),
        RecurrenceType::Monthly => monthly_dates(rule, anchor),
    }
}

/// Monday of the week containing `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Weekday-filtered dates in alternating weeks, with week parity
/// anchored at the week of the first matching date.
fn biweekly_dates(rule: &RecurrenceRule, anchor: NaiveDate) -> Vec<NaiveDate> {
    let matching: Vec<NaiveDate> = anchor
        .iter_days()
        .take_while(|d| *d <= rule.end_date)
        .filter(|d| rule.weekdays.contains(&d.weekday()))
        .collect();

    let Some(first) = matching.first().copied() else {
        return Vec::new();
    };
    let anchor_week = week_start(first);

    matching
        .into_iter()
        .filter(|d| (week_start(*d) - anchor_week).num_days() / 7 % 2 == 0)
        .collect()
}

/// Same day-of-month as the anchor, one per month; months lacking that
/// day (e.g. the 31st in a 30-day month) yield no occurrence.
fn monthly_dates(rule: &RecurrenceRule, anchor: NaiveDate) -> Vec<NaiveDate> {
    let day = anchor.day();
    let mut dates = Vec::new();
    let (mut year, mut month) = (anchor.year(), anchor.month());

    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            if date > rule.end_date {
                break;
            }
            if date >= anchor {
                dates.push(date);
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
        // Stop once the next month starts past the end date
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(first_of_month) if first_of_month <= rule.end_date => {}
            _ => break,
        }
    }
    dates
}

/// Plan an expansion run: fold over the occurrence dates in order,
/// checking each candidate against the existing bookings plus every
/// occurrence already admitted in this run.
pub fn plan_occurrences(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    existing: &[Interval],
) -> ExpansionPlan {
    let mut committed: Vec<Interval> = existing.to_vec();
    let mut to_create = Vec::new();
    let mut skipped = Vec::new();

    for date in occurrence_dates(rule, anchor) {
        let candidate = rule.occurrence_interval(date);
        if has_conflict(&candidate, &committed) {
            skipped.push(SkippedOccurrence {
                date,
                reason: SkipReason::Conflict,
            });
        } else {
            committed.push(candidate);
            to_create.push(candidate);
        }
    }

    ExpansionPlan { to_create, skipped }
}
