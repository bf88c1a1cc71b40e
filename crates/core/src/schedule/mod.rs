//! Scheduling engine
//!
//! Pure availability logic: the interval overlap model, conflict
//! checking, the daily slot grid, recurrence expansion, and the room
//! fit advisor. Nothing in here touches storage; callers supply the
//! existing bookings and the room catalog explicitly.

mod advisor;
mod conflict;
mod expand;
mod interval;
mod slots;

pub use advisor::{suggest_rooms, FitClassification, FitReport};
pub use conflict::{first_conflict, has_conflict};
pub use expand::{occurrence_dates, plan_occurrences, ExpansionPlan, SkipReason, SkippedOccurrence};
pub use interval::Interval;
pub use slots::{day_grid, GridConfig, Slot};
