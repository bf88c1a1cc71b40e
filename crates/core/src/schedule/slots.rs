//! Daily slot grid for the availability view

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::conflict::has_conflict;
use super::interval::Interval;

/// Bookable-hours grid settings.
///
/// Defaults to hourly slots from 07:00 to 22:00 (15 slots). Comes from
/// application configuration, not hardcoded at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub open_hour: u32,
    pub close_hour: u32,
    pub slot_minutes: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            open_hour: 7,
            close_hour: 22,
            slot_minutes: 60,
        }
    }
}

/// One grid cell: a fixed-duration window and whether it is free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: NaiveTime,
    pub available: bool,
}

/// Build the day's grid for one room.
///
/// Each slot covers `[start, start + slot_minutes)`; a slot is available
/// iff no booked interval overlaps it. A booking that partially covers a
/// slot marks the whole slot busy. Recomputed fresh on every call.
pub fn day_grid(date: NaiveDate, grid: &GridConfig, booked: &[Interval]) -> Vec<Slot> {
    let (Some(open), Some(close)) = (
        date.and_hms_opt(grid.open_hour, 0, 0),
        date.and_hms_opt(grid.close_hour, 0, 0),
    ) else {
        return Vec::new();
    };
    if grid.slot_minutes == 0 {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(grid.slot_minutes));
    let mut slots = Vec::new();
    let mut cursor = open;
    while cursor + step <= close {
        let slot = Interval::new_unchecked(cursor.and_utc(), (cursor + step).and_utc());
        slots.push(Slot {
            start: cursor.time(),
            available: !has_conflict(&slot, booked),
        });
        cursor += step;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        date().and_hms_opt(hour, min, 0).unwrap().and_utc()
    }

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_default_grid_has_fifteen_slots() {
        let slots = day_grid(date(), &GridConfig::default(), &[]);
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0].start, time(7));
        assert_eq!(slots[14].start, time(21));
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_slot_count_unchanged_by_bookings() {
        let booked = [
            Interval::new(at(8, 0), at(12, 0)).unwrap(),
            Interval::new(at(14, 0), at(15, 0)).unwrap(),
        ];
        let slots = day_grid(date(), &GridConfig::default(), &booked);
        assert_eq!(slots.len(), 15);
    }

    #[test]
    fn test_exact_booking_blocks_single_slot() {
        let booked = [Interval::new(at(10, 0), at(11, 0)).unwrap()];
        let slots = day_grid(date(), &GridConfig::default(), &booked);
        for slot in &slots {
            assert_eq!(slot.available, slot.start != time(10), "{:?}", slot.start);
        }
    }

    #[test]
    fn test_partial_overlap_blocks_whole_slot() {
        // 10:30-11:30 straddles two slots; both become unavailable
        let booked = [Interval::new(at(10, 30), at(11, 30)).unwrap()];
        let slots = day_grid(date(), &GridConfig::default(), &booked);
        for slot in &slots {
            let busy = slot.start == time(10) || slot.start == time(11);
            assert_eq!(slot.available, !busy, "{:?}", slot.start);
        }
    }

    #[test]
    fn test_booking_ending_at_slot_start_leaves_slot_free() {
        let booked = [Interval::new(at(8, 0), at(9, 0)).unwrap()];
        let slots = day_grid(date(), &GridConfig::default(), &booked);
        let nine = slots.iter().find(|s| s.start == time(9)).unwrap();
        assert!(nine.available);
    }

    #[test]
    fn test_custom_grid() {
        let grid = GridConfig {
            open_hour: 9,
            close_hour: 12,
            slot_minutes: 30,
        };
        let slots = day_grid(date(), &grid, &[]);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[1].start, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn test_degenerate_grid_is_empty() {
        let grid = GridConfig {
            open_hour: 10,
            close_hour: 10,
            slot_minutes: 60,
        };
        assert!(day_grid(date(), &grid, &[]).is_empty());
    }
}
