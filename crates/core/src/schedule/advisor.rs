//! Room fit advisor
//!
//! Classifies a room selection for a participant count and suggests
//! better-fitting alternatives. Advisory only - never blocks a booking.
//! The room catalog is passed explicitly to keep this pure and testable.

use serde::Serialize;

use crate::models::Room;

/// Threshold below which a selection counts as under-utilized
const UNDER_UTILIZATION_RATIO: f64 = 0.30;

/// How many alternatives to offer per classification
const OVER_CAPACITY_SUGGESTIONS: usize = 3;
const UNDER_UTILIZED_SUGGESTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitClassification {
    /// Participants exceed the selected room's capacity
    OverCapacity,
    /// Selection uses less than 30% of capacity and smaller rooms exist
    UnderUtilized,
    /// Neither condition holds
    Adequate,
}

/// Advisory outcome for a room selection
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub classification: FitClassification,
    /// `round(participants / capacity * 100)` for the selected room
    pub utilization_percent: u32,
    /// Alternative rooms, tightest capacity fit first
    pub suggestions: Vec<Room>,
}

/// Classify `selected` for `participants` and rank alternatives from
/// `catalog`.
pub fn suggest_rooms(selected: &Room, participants: u32, catalog: &[Room]) -> FitReport {
    let ratio = f64::from(participants) / f64::from(selected.capacity.max(1));
    let utilization_percent = (ratio * 100.0).round() as u32;

    if participants > selected.capacity {
        let suggestions = ranked_alternatives(catalog, selected, |r| r.capacity >= participants);
        return FitReport {
            classification: FitClassification::OverCapacity,
            utilization_percent,
            suggestions: truncated(suggestions, OVER_CAPACITY_SUGGESTIONS),
        };
    }

    if ratio < UNDER_UTILIZATION_RATIO && catalog.len() > 1 {
        let suggestions = ranked_alternatives(catalog, selected, |r| {
            r.capacity >= participants && r.capacity < selected.capacity
        });
        return FitReport {
            classification: FitClassification::UnderUtilized,
            utilization_percent,
            suggestions: truncated(suggestions, UNDER_UTILIZED_SUGGESTIONS),
        };
    }

    FitReport {
        classification: FitClassification::Adequate,
        utilization_percent,
        suggestions: Vec::new(),
    }
}

fn ranked_alternatives<F>(catalog: &[Room], selected: &Room, keep: F) -> Vec<Room>
where
    F: Fn(&Room) -> bool,
{
    let mut rooms: Vec<Room> = catalog
        .iter()
        .filter(|r| r.id != selected.id && keep(r))
        .cloned()
        .collect();
    rooms.sort_by_key(|r| r.capacity);
    rooms
}

fn truncated(mut rooms: Vec<Room>, limit: usize) -> Vec<Room> {
    rooms.truncate(limit);
    rooms
}
