//! Booking model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::Interval;

/// A committed reservation of a room for a time range.
///
/// Bookings are never edited in place; an edit is modelled as
/// delete + recreate. Bookings materialized from a recurrence rule
/// carry the rule id but are otherwise ordinary and independently
/// deletable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub participants: u32,
    /// Set when this booking was materialized from a recurrence rule
    pub recurring_rule_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        room_id: Uuid,
        user_id: Uuid,
        title: String,
        interval: Interval,
        participants: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            title,
            description: String::new(),
            start_time: interval.start(),
            end_time: interval.end(),
            participants,
            recurring_rule_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn from_rule(mut self, rule_id: Uuid) -> Self {
        self.recurring_rule_id = Some(rule_id);
        self
    }

    /// The booked time range
    pub fn interval(&self) -> Interval {
        Interval::new_unchecked(self.start_time, self.end_time)
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    /// Booking length in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}
