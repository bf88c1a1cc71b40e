//! Booking storage operations
//!
//! Timestamps are stored as RFC3339 TEXT in UTC; with a fixed format
//! lexicographic comparison matches chronological order, which the
//! range queries below rely on.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, parse_uuid_opt, OptionalExt};
use crate::error::Result;
use crate::models::Booking;

pub struct BookingStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookingStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Persist a new booking
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, room_id = %booking.room_id))]
    pub fn create(&self, booking: &Booking) -> Result<()> {
        self.conn.execute(
            "INSERT INTO bookings (id, room_id, user_id, title, description, start_time,
                                   end_time, participants, recurring_rule_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                booking.id.to_string(),
                booking.room_id.to_string(),
                booking.user_id.to_string(),
                booking.title,
                booking.description,
                booking.start_time.to_rfc3339(),
                booking.end_time.to_rfc3339(),
                booking.participants,
                booking.recurring_rule_id.map(|r| r.to_string()),
                booking.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find booking by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookings WHERE id = ?1",
            Self::COLUMNS
        ))?;

        let booking = stmt
            .query_row(params![id.to_string()], Self::row_to_booking)
            .optional()?;

        Ok(booking)
    }

    /// Bookings for a room whose interval strictly overlaps `[from, to)`
    #[instrument(skip(self))]
    pub fn list_for_room_between(
        &self,
        room_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookings
             WHERE room_id = ?1 AND start_time < ?2 AND end_time > ?3
             ORDER BY start_time",
            Self::COLUMNS
        ))?;

        let bookings = stmt
            .query_map(
                params![room_id.to_string(), to.to_rfc3339(), from.to_rfc3339()],
                Self::row_to_booking,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bookings)
    }

    /// All bookings owned by a user, soonest first
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookings WHERE user_id = ?1 ORDER BY start_time",
            Self::COLUMNS
        ))?;

        let bookings = stmt
            .query_map(params![user_id.to_string()], Self::row_to_booking)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bookings)
    }

    /// All bookings starting in `[from, to)`, across rooms
    #[instrument(skip(self))]
    pub fn list_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookings
             WHERE start_time >= ?1 AND start_time < ?2
             ORDER BY start_time",
            Self::COLUMNS
        ))?;

        let bookings = stmt
            .query_map(
                params![from.to_rfc3339(), to.to_rfc3339()],
                Self::row_to_booking,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bookings)
    }

    /// Delete a booking
    #[instrument(skip(self))]
    pub fn delete(&self, booking_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM bookings WHERE id = ?1",
            params![booking_id.to_string()],
        )?;
        Ok(())
    }

    /// Count bookings for a room
    #[instrument(skip(self))]
    pub fn count_for_room(&self, room_id: Uuid) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE room_id = ?1",
            params![room_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    const COLUMNS: &'static str = "id, room_id, user_id, title, description, start_time, \
                                   end_time, participants, recurring_rule_id, created_at";

    fn row_to_booking(row: &rusqlite::Row<'_>) -> std::result::Result<Booking, rusqlite::Error> {
        Ok(Booking {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            room_id: parse_uuid(&row.get::<_, String>(1)?)?,
            user_id: parse_uuid(&row.get::<_, String>(2)?)?,
            title: row.get(3)?,
            description: row.get(4)?,
            start_time: parse_datetime(&row.get::<_, String>(5)?)?,
            end_time: parse_datetime(&row.get::<_, String>(6)?)?,
            participants: row.get(7)?,
            recurring_rule_id: parse_uuid_opt(row.get::<_, Option<String>>(8)?)?,
            created_at: parse_datetime(&row.get::<_, String>(9)?)?,
        })
    }
}
