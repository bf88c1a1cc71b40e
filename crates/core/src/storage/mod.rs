//! SQLite storage layer for Roomboard

mod bookings;
mod migrations;
mod notifications;
mod parse;
mod rooms;
mod rules;
mod traits;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, Notification, RecurrenceRule, Room};
use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

pub use bookings::BookingStore;
pub use notifications::NotificationStore;
pub use rooms::RoomStore;
pub use rules::RuleStore;
pub use traits::{
    BookingRepository, NotificationRepository, RoomRepository, RuleRepository, Storage,
};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get room store
    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    /// Get booking store
    pub fn bookings(&self) -> BookingStore<'_> {
        BookingStore::new(&self.conn)
    }

    /// Get recurrence rule store
    pub fn rules(&self) -> RuleStore<'_> {
        RuleStore::new(&self.conn)
    }

    /// Get notification store
    pub fn notifications(&self) -> NotificationStore<'_> {
        NotificationStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl RoomRepository for Database {
    fn create_room(&self, room: &Room) -> Result<()> {
        self.rooms().create(room)
    }

    fn find_room_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        self.rooms().find_by_id(id)
    }

    fn update_room(&self, room: &Room) -> Result<()> {
        self.rooms().update(room)
    }

    fn delete_room(&self, room_id: Uuid) -> Result<()> {
        self.rooms().delete(room_id)
    }

    fn list_rooms(&self) -> Result<Vec<Room>> {
        self.rooms().list_all()
    }
}

impl BookingRepository for Database {
    fn create_booking(&self, booking: &Booking) -> Result<()> {
        self.bookings().create(booking)
    }

    fn find_booking_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        self.bookings().find_by_id(id)
    }

    fn list_bookings_for_room_between(
        &self,
        room_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        self.bookings().list_for_room_between(room_id, from, to)
    }

    fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        self.bookings().list_for_user(user_id)
    }

    fn list_bookings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        self.bookings().list_between(from, to)
    }

    fn delete_booking(&self, booking_id: Uuid) -> Result<()> {
        self.bookings().delete(booking_id)
    }

    fn count_bookings_for_room(&self, room_id: Uuid) -> Result<u64> {
        self.bookings().count_for_room(room_id)
    }
}

impl RuleRepository for Database {
    fn create_rule(&self, rule: &RecurrenceRule) -> Result<()> {
        self.rules().create(rule)
    }

    fn find_rule_by_id(&self, id: Uuid) -> Result<Option<RecurrenceRule>> {
        self.rules().find_by_id(id)
    }

    fn list_rules_for_user(&self, user_id: Uuid) -> Result<Vec<RecurrenceRule>> {
        self.rules().list_for_user(user_id)
    }

    fn delete_rule(&self, rule_id: Uuid) -> Result<()> {
        self.rules().delete(rule_id)
    }
}

impl NotificationRepository for Database {
    fn create_notification(&self, notification: &Notification) -> Result<()> {
        self.notifications().create(notification)
    }

    fn list_notifications_for_user(&self, user_id: Uuid, limit: u32) -> Result<Vec<Notification>> {
        self.notifications().list_for_user(user_id, limit)
    }

    fn unread_notification_count(&self, user_id: Uuid) -> Result<u64> {
        self.notifications().unread_count(user_id)
    }

    fn mark_notification_read(&self, notification_id: Uuid) -> Result<()> {
        self.notifications().mark_read(notification_id)
    }

    fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        self.notifications().mark_all_read(user_id)
    }

    fn delete_notification(&self, notification_id: Uuid) -> Result<()> {
        self.notifications().delete(notification_id)
    }
}
