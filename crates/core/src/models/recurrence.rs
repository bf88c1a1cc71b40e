//! Recurrence rule model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::schedule::Interval;

/// How often a recurring booking repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    /// Every other week, anchored at the first matching week
    Biweekly,
    /// Same day-of-month as the anchor date; months without that day
    /// produce no occurrence
    Monthly,
}

impl RecurrenceType {
    /// Whether the weekday set applies to this recurrence type
    pub fn uses_weekdays(&self) -> bool {
        matches!(self, RecurrenceType::Weekly | RecurrenceType::Biweekly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Biweekly => "biweekly",
            RecurrenceType::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(RecurrenceType::Daily),
            "weekly" => Some(RecurrenceType::Weekly),
            "biweekly" => Some(RecurrenceType::Biweekly),
            "monthly" => Some(RecurrenceType::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring booking definition.
///
/// The rule carries a wall-clock time window (no date) and expands into
/// concrete occurrences between its creation date and `end_date`
/// (inclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: RecurrenceType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Last date on which an occurrence may fall (inclusive)
    pub end_date: NaiveDate,
    /// Only meaningful for weekly/biweekly rules
    pub weekdays: Vec<Weekday>,
    pub participants: u32,
    pub created_at: DateTime<Utc>,
}

impl RecurrenceRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        room_id: Uuid,
        title: String,
        kind: RecurrenceType,
        start_time: NaiveTime,
        end_time: NaiveTime,
        end_date: NaiveDate,
        participants: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            room_id,
            title,
            description: String::new(),
            kind,
            start_time,
            end_time,
            end_date,
            weekdays: Vec::new(),
            participants,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.weekdays = weekdays;
        self.weekdays.dedup();
        self
    }

    /// First candidate date of the expansion
    pub fn anchor_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Check structural validity before any expansion work
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("rule title must not be empty".into()));
        }
        if self.end_time <= self.start_time {
            return Err(Error::Validation(
                "rule end time must be after start time".into(),
            ));
        }
        if self.participants == 0 {
            return Err(Error::Validation(
                "participant count must be at least 1".into(),
            ));
        }
        if self.kind.uses_weekdays() && self.weekdays.is_empty() {
            return Err(Error::Validation(format!(
                "{} recurrence requires at least one weekday",
                self.kind
            )));
        }
        Ok(())
    }

    /// The concrete candidate interval for one occurrence date
    pub fn occurrence_interval(&self, date: NaiveDate) -> Interval {
        Interval::new_unchecked(
            date.and_time(self.start_time).and_utc(),
            date.and_time(self.end_time).and_utc(),
        )
    }
}
