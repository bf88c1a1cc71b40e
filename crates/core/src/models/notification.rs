//! Notification model
//!
//! Stored notification records shown to users. Delivery transport
//! (realtime channels, email) is handled outside the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Machine-readable kind, e.g. "booking_confirmed"
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, kind: &str, title: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: kind.to_string(),
            title,
            message,
            read: false,
            created_at: Utc::now(),
        }
    }
}
