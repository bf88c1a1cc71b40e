//! Aggregate booking statistics
//!
//! Computed over an in-memory snapshot of bookings and rooms, so the
//! numbers reflect exactly the slice the caller fetched.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Booking, Room};

/// How often a single room was booked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUsage {
    pub room_id: Uuid,
    pub room_name: String,
    pub bookings: u32,
}

/// Bookings created on a single day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub bookings: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BookingStats {
    pub total_bookings: u32,
    pub upcoming_bookings: u32,
    pub total_participants: u32,
    pub average_duration_minutes: u32,
    /// Name of the most-booked room, if any bookings exist
    pub top_room: Option<String>,
    /// Up to five rooms, most-booked first
    pub room_usage: Vec<RoomUsage>,
    /// One entry per day for the last seven days, oldest first
    pub daily_trend: Vec<DailyCount>,
}

const ROOM_USAGE_LIMIT: usize = 5;
const TREND_DAYS: i64 = 7;

pub fn compute_stats(bookings: &[Booking], rooms: &[Room], now: DateTime<Utc>) -> BookingStats {
    if bookings.is_empty() {
        return BookingStats {
            daily_trend: empty_trend(now),
            ..BookingStats::default()
        };
    }

    let total_bookings = bookings.len() as u32;
    let upcoming_bookings = bookings.iter().filter(|b| b.is_upcoming(now)).count() as u32;
    let total_participants = bookings.iter().map(|b| b.participants).sum();
    let total_minutes: i64 = bookings.iter().map(|b| b.duration_minutes()).sum();
    let average_duration_minutes = (total_minutes / bookings.len() as i64) as u32;

    let mut counts: HashMap<Uuid, u32> = HashMap::new();
    for booking in bookings {
        *counts.entry(booking.room_id).or_default() += 1;
    }
    let names: HashMap<Uuid, &str> = rooms.iter().map(|r| (r.id, r.name.as_str())).collect();

    let mut room_usage: Vec<RoomUsage> = counts
        .into_iter()
        .map(|(room_id, bookings)| RoomUsage {
            room_id,
            room_name: names.get(&room_id).unwrap_or(&"unknown").to_string(),
            bookings,
        })
        .collect();
    // Secondary sort on name keeps equal counts deterministic
    room_usage.sort_by(|a, b| {
        b.bookings
            .cmp(&a.bookings)
            .then_with(|| a.room_name.cmp(&b.room_name))
    });
    room_usage.truncate(ROOM_USAGE_LIMIT);

    let top_room = room_usage.first().map(|u| u.room_name.clone());

    let mut daily_trend = empty_trend(now);
    for booking in bookings {
        let day = booking.created_at.date_naive();
        if let Some(entry) = daily_trend.iter_mut().find(|e| e.date == day) {
            entry.bookings += 1;
        }
    }

    BookingStats {
        total_bookings,
        upcoming_bookings,
        total_participants,
        average_duration_minutes,
        top_room,
        room_usage,
        daily_trend,
    }
}

/// Zeroed counts for the seven days ending today, oldest first
fn empty_trend(now: DateTime<Utc>) -> Vec<DailyCount> {
    let today = now.date_naive();
    (0..TREND_DAYS)
        .rev()
        .map(|offset| DailyCount {
            date: today - Duration::days(offset),
            bookings: 0,
        })
        .collect()
}
