//! Room model - the bookable inventory unit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A meeting room managed by administrators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    /// Maximum number of participants
    pub capacity: u32,
    /// Floor label, e.g. "2nd floor" or "Piano Terra"
    pub floor: String,
    /// Equipment tags (unique, order-insensitive)
    pub equipment: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(name: String, capacity: u32, floor: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            capacity,
            floor,
            equipment: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_equipment(mut self, equipment: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.equipment = equipment;
        self.equipment.retain(|e| seen.insert(e.clone()));
        self
    }

    pub fn has_equipment(&self, tag: &str) -> bool {
        self.equipment.iter().any(|e| e == tag)
    }
}
