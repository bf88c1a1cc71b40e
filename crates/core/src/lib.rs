//! Roomboard Core Library
//!
//! Core models, scheduling engine, permissions, and storage for the
//! Roomboard meeting-room booking platform.

pub mod config;
pub mod error;
pub mod export;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod schedule;
pub mod service;
pub mod stats;
pub mod storage;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use models::*;
pub use permissions::*;
pub use schedule::{
    day_grid, has_conflict, occurrence_dates, suggest_rooms, ExpansionPlan, FitClassification,
    FitReport, GridConfig, Interval, SkipReason, SkippedOccurrence, Slot,
};
pub use service::{BookingRequest, BookingService, ExpansionReport};
pub use storage::{
    BookingRepository, Database, NotificationRepository, RoomRepository, RuleRepository, Storage,
};
