//! User roles

use serde::{Deserialize, Serialize};

/// Application roles in priority order (highest to lowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UserRole {
    /// Manages the room inventory and any booking
    Admin = 2,
    /// Standard user - books rooms, manages own bookings
    Member = 1,
}

impl UserRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Member => "Member",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == UserRole::Admin
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
