//! Storage repository traits
//!
//! These traits define the persistence interface, allowing for
//! different implementations (SQLite, mock, future network backend).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, Notification, RecurrenceRule, Room};

/// Room inventory operations
pub trait RoomRepository {
    /// Create a new room
    fn create_room(&self, room: &Room) -> Result<()>;

    /// Find room by ID
    fn find_room_by_id(&self, id: Uuid) -> Result<Option<Room>>;

    /// Update a room
    fn update_room(&self, room: &Room) -> Result<()>;

    /// Delete a room (cascades to its bookings)
    fn delete_room(&self, room_id: Uuid) -> Result<()>;

    /// List the full room catalog
    fn list_rooms(&self) -> Result<Vec<Room>>;
}

/// Booking operations
pub trait BookingRepository {
    /// Persist a new booking
    fn create_booking(&self, booking: &Booking) -> Result<()>;

    /// Find booking by ID
    fn find_booking_by_id(&self, id: Uuid) -> Result<Option<Booking>>;

    /// List bookings for a room whose interval overlaps `[from, to)`
    fn list_bookings_for_room_between(
        &self,
        room_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>>;

    /// List all bookings owned by a user, soonest first
    fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>>;

    /// List all bookings starting in `[from, to)` across rooms
    fn list_bookings_between(&self, from: DateTime<Utc>, to: DateTime<Utc>)
        -> Result<Vec<Booking>>;

    /// Delete a booking
    fn delete_booking(&self, booking_id: Uuid) -> Result<()>;

    /// Count bookings for a room
    fn count_bookings_for_room(&self, room_id: Uuid) -> Result<u64>;
}

/// Recurrence rule operations
pub trait RuleRepository {
    /// Persist a recurrence rule definition
    fn create_rule(&self, rule: &RecurrenceRule) -> Result<()>;

    /// Find rule by ID
    fn find_rule_by_id(&self, id: Uuid) -> Result<Option<RecurrenceRule>>;

    /// List rules owned by a user
    fn list_rules_for_user(&self, user_id: Uuid) -> Result<Vec<RecurrenceRule>>;

    /// Delete a rule (materialized bookings survive)
    fn delete_rule(&self, rule_id: Uuid) -> Result<()>;
}

/// Notification record operations
pub trait NotificationRepository {
    /// Store a notification
    fn create_notification(&self, notification: &Notification) -> Result<()>;

    /// List a user's latest notifications, newest first
    fn list_notifications_for_user(&self, user_id: Uuid, limit: u32) -> Result<Vec<Notification>>;

    /// Count unread notifications for a user
    fn unread_notification_count(&self, user_id: Uuid) -> Result<u64>;

    /// Mark one notification as read
    fn mark_notification_read(&self, notification_id: Uuid) -> Result<()>;

    /// Mark all of a user's notifications as read
    fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64>;

    /// Delete a notification
    fn delete_notification(&self, notification_id: Uuid) -> Result<()>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or network.
pub trait Storage:
    RoomRepository + BookingRepository + RuleRepository + NotificationRepository
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: RoomRepository + BookingRepository + RuleRepository + NotificationRepository
{
}
