//! Booking export formatting
//!
//! Pure string builders for CSV and ICS (iCalendar) output. Writing the
//! result to disk or offering it as a download is the caller's job.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Booking, Room};

/// A booking flattened for export, with display fields resolved
#[derive(Debug, Clone)]
pub struct BookingExport {
    pub title: String,
    pub description: String,
    pub room: String,
    pub floor: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub participants: u32,
    pub organizer: String,
}

impl BookingExport {
    /// Flatten a booking with its room and an organizer display name
    pub fn from_booking(booking: &Booking, room: &Room, organizer: &str) -> Self {
        Self {
            title: booking.title.clone(),
            description: booking.description.clone(),
            room: room.name.clone(),
            floor: room.floor.clone(),
            date: booking.start_time.format("%Y-%m-%d").to_string(),
            start_time: booking.start_time.format("%H:%M").to_string(),
            end_time: booking.end_time.format("%H:%M").to_string(),
            participants: booking.participants,
            organizer: organizer.to_string(),
        }
    }
}

const CSV_HEADERS: &[&str] = &[
    "Title",
    "Description",
    "Room",
    "Floor",
    "Date",
    "Start",
    "End",
    "Participants",
    "Organizer",
];

/// Render bookings as CSV with a header row. Every cell is quoted;
/// embedded quotes are doubled.
pub fn to_csv(bookings: &[BookingExport]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADERS.join(","));
    out.push('\n');

    for b in bookings {
        let row = [
            b.title.as_str(),
            b.description.as_str(),
            b.room.as_str(),
            b.floor.as_str(),
            b.date.as_str(),
            b.start_time.as_str(),
            b.end_time.as_str(),
            &b.participants.to_string(),
            b.organizer.as_str(),
        ]
        .map(csv_cell)
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render one booking as an iCalendar VEVENT wrapped in a VCALENDAR
pub fn to_ics(booking: &Booking, room: &Room, organizer: &str) -> String {
    let uid = Uuid::new_v4();
    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Roomboard//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}@roomboard.local\r\n\
         DTSTAMP:{stamp}\r\n\
         DTSTART:{start}\r\n\
         DTEND:{end}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         LOCATION:{location}\r\n\
         ORGANIZER;CN={organizer}:MAILTO:noreply@roomboard.local\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
        stamp = ics_timestamp(Utc::now()),
        start = ics_timestamp(booking.start_time),
        end = ics_timestamp(booking.end_time),
        summary = ics_text(&booking.title),
        description = ics_text(&booking.description),
        location = ics_text(&format!("{}, {}", room.name, room.floor)),
    )
}

/// UTC timestamp in iCalendar basic format, e.g. 20240110T093000Z
fn ics_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape text per RFC 5545 (commas, semicolons, newlines, backslashes)
fn ics_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}
