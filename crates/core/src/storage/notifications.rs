//! Notification storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Notification;

pub struct NotificationStore<'a> {
    conn: &'a Connection,
}

impl<'a> NotificationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Store a notification
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, kind = %notification.kind))]
    pub fn create(&self, notification: &Notification) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notifications (id, user_id, kind, title, message, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                notification.id.to_string(),
                notification.user_id.to_string(),
                notification.kind,
                notification.title,
                notification.message,
                notification.read as i32,
                notification.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find notification by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, kind, title, message, is_read, created_at
             FROM notifications WHERE id = ?1",
        )?;

        let notification = stmt
            .query_row(params![id.to_string()], Self::row_to_notification)
            .optional()?;

        Ok(notification)
    }

    /// Latest notifications for a user, newest first
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: Uuid, limit: u32) -> Result<Vec<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, kind, title, message, is_read, created_at
             FROM notifications WHERE user_id = ?1
             ORDER BY created_at DESC LIMIT ?2",
        )?;

        let notifications = stmt
            .query_map(
                params![user_id.to_string(), limit],
                Self::row_to_notification,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    /// Count unread notifications for a user
    #[instrument(skip(self))]
    pub fn unread_count(&self, user_id: Uuid) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Mark one notification as read
    #[instrument(skip(self))]
    pub fn mark_read(&self, notification_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![notification_id.to_string()],
        )?;
        Ok(())
    }

    /// Mark all of a user's notifications as read; returns rows changed
    #[instrument(skip(self))]
    pub fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let changed = self.conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            params![user_id.to_string()],
        )?;
        Ok(changed as u64)
    }

    /// Delete a notification
    #[instrument(skip(self))]
    pub fn delete(&self, notification_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM notifications WHERE id = ?1",
            params![notification_id.to_string()],
        )?;
        Ok(())
    }

    fn row_to_notification(
        row: &rusqlite::Row<'_>,
    ) -> std::result::Result<Notification, rusqlite::Error> {
        Ok(Notification {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            user_id: parse_uuid(&row.get::<_, String>(1)?)?,
            kind: row.get(2)?,
            title: row.get(3)?,
            message: row.get(4)?,
            read: row.get::<_, i32>(5)? != 0,
            created_at: parse_datetime(&row.get::<_, String>(6)?)?,
        })
    }
}
