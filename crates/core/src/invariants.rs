//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{Booking, RecurrenceRule, Room};
use crate::schedule::GridConfig;

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(
        !room.name.trim().is_empty(),
        "Room {} has empty name",
        room.id
    );

    debug_assert!(room.capacity >= 1, "Room {} has zero capacity", room.id);

    // Equipment tags are unique
    let mut tags: Vec<&String> = room.equipment.iter().collect();
    tags.sort();
    tags.dedup();
    debug_assert!(
        tags.len() == room.equipment.len(),
        "Room {} has duplicate equipment tags",
        room.id
    );
}

/// Validate that a booking is well-formed
pub fn assert_booking_invariants(booking: &Booking) {
    debug_assert!(
        booking.end_time > booking.start_time,
        "Booking {} ends at or before its start",
        booking.id
    );

    debug_assert!(
        booking.participants >= 1,
        "Booking {} has no participants",
        booking.id
    );
}

/// Validate that a recurrence rule is well-formed
pub fn assert_rule_invariants(rule: &RecurrenceRule) {
    debug_assert!(
        rule.end_time > rule.start_time,
        "Rule {} has inverted time window",
        rule.id
    );

    debug_assert!(
        !rule.kind.uses_weekdays() || !rule.weekdays.is_empty(),
        "Rule {} is {} but has no weekdays",
        rule.id,
        rule.kind
    );
}

/// Validate grid settings before building slots
pub fn assert_grid_invariants(grid: &GridConfig) {
    debug_assert!(
        grid.close_hour > grid.open_hour,
        "Grid closes ({}) at or before it opens ({})",
        grid.close_hour,
        grid.open_hour
    );

    debug_assert!(grid.slot_minutes > 0, "Grid has zero-length slots");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Interval;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_room() -> Room {
        Room::new("Test Room".to_string(), 8, "1st floor".to_string())
    }

    #[test]
    fn test_valid_room() {
        assert_room_invariants(&make_room());
    }

    #[test]
    #[should_panic(expected = "duplicate equipment")]
    fn test_duplicate_equipment_detected() {
        let mut room = make_room();
        room.equipment = vec!["tv".to_string(), "tv".to_string()];
        assert_room_invariants(&room);
    }

    #[test]
    fn test_valid_booking() {
        let now = Utc::now();
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Review".to_string(),
            Interval::new(now, now + chrono::Duration::hours(1)).unwrap(),
            3,
        );
        assert_booking_invariants(&booking);
    }

    #[test]
    fn test_default_grid_valid() {
        assert_grid_invariants(&GridConfig::default());
    }

    #[test]
    #[should_panic(expected = "at or before it opens")]
    fn test_inverted_grid_detected() {
        assert_grid_invariants(&GridConfig {
            open_hour: 22,
            close_hour: 7,
            slot_minutes: 60,
        });
    }
}
