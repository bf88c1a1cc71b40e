//! Booking service
//!
//! Orchestrates the scheduling engine over a storage backend: conflict
//! checking on create, recurrence expansion, availability grids, fit
//! advice, and permission-guarded room management. The conflict check
//! and the insert run on the same connection, so a single-process
//! deployment gets check-then-insert atomicity for free.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::export::{self, BookingExport};
use crate::invariants;
use crate::models::{Booking, Notification, RecurrenceRule, Room, UserRole};
use crate::permissions::{BookingAction, PermissionMatrix};
use crate::schedule::{
    day_grid, first_conflict, plan_occurrences, suggest_rooms, FitReport, GridConfig, Interval,
    SkippedOccurrence, Slot,
};
use crate::stats::{compute_stats, BookingStats};
use crate::storage::Storage;

/// Input for a single booking attempt
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub participants: u32,
}

/// Outcome of one recurrence expansion run
#[derive(Debug)]
pub struct ExpansionReport {
    pub rule_id: Uuid,
    /// Bookings materialized this run, in date order
    pub created: Vec<Booking>,
    /// Occurrences that conflicted and were not materialized
    pub skipped: Vec<SkippedOccurrence>,
}

/// Application service over a storage backend
pub struct BookingService<S: Storage> {
    storage: S,
    grid: GridConfig,
}

impl<S: Storage> BookingService<S> {
    pub fn new(storage: S) -> Self {
        Self::with_grid(storage, GridConfig::default())
    }

    pub fn with_grid(storage: S, grid: GridConfig) -> Self {
        Self { storage, grid }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The day's slot grid for a room, with booked slots marked busy
    #[instrument(skip(self))]
    pub fn check_availability(&self, room_id: Uuid, date: NaiveDate) -> Result<Vec<Slot>> {
        invariants::assert_grid_invariants(&self.grid);
        self.require_room(room_id)?;
        let booked = self.room_intervals_on(room_id, date)?;
        Ok(day_grid(date, &self.grid, &booked))
    }

    /// Validate, conflict-check, and persist a single booking.
    ///
    /// Back-to-back bookings are allowed; a shared boundary instant is
    /// not a conflict.
    #[instrument(skip(self, request), fields(room_id = %request.room_id))]
    pub fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
        if request.title.trim().is_empty() {
            return Err(Error::Validation("booking title must not be empty".into()));
        }
        if request.participants == 0 {
            return Err(Error::Validation(
                "participant count must be at least 1".into(),
            ));
        }
        let interval = Interval::new(request.start_time, request.end_time)?;

        let room = self.require_room(request.room_id)?;
        if request.participants > room.capacity {
            return Err(Error::Capacity {
                participants: request.participants,
                capacity: room.capacity,
            });
        }

        let existing: Vec<Interval> = self
            .storage
            .list_bookings_for_room_between(room.id, interval.start(), interval.end())?
            .iter()
            .map(Booking::interval)
            .collect();
        if let Some(blocking) = first_conflict(&interval, &existing) {
            return Err(Error::Conflict {
                room_id: room.id,
                start: blocking.start(),
                end: blocking.end(),
            });
        }

        let booking = Booking::new(
            room.id,
            request.user_id,
            request.title.clone(),
            interval,
            request.participants,
        )
        .with_description(request.description.clone());
        invariants::assert_booking_invariants(&booking);
        self.storage.create_booking(&booking)?;

        self.storage.create_notification(&Notification::new(
            booking.user_id,
            "booking_confirmed",
            "Booking confirmed".to_string(),
            format!(
                "{} is booked in {} on {}",
                booking.title,
                room.name,
                booking.start_time.format("%Y-%m-%d %H:%M")
            ),
        ))?;

        info!(booking_id = %booking.id, "booking created");
        Ok(booking)
    }

    /// Persist a recurrence rule and materialize its occurrences.
    ///
    /// Conflicting occurrences are skipped and reported rather than
    /// failing the run. The rule record is stored even when every
    /// occurrence is skipped.
    #[instrument(skip(self, rule), fields(rule_id = %rule.id, kind = %rule.kind))]
    pub fn expand_recurring(&self, rule: &RecurrenceRule) -> Result<ExpansionReport> {
        rule.validate()?;
        invariants::assert_rule_invariants(rule);
        let room = self.require_room(rule.room_id)?;
        if rule.participants > room.capacity {
            return Err(Error::Capacity {
                participants: rule.participants,
                capacity: room.capacity,
            });
        }

        self.storage.create_rule(rule)?;

        let anchor = rule.anchor_date();
        let existing = self.room_intervals_between(room.id, anchor, rule.end_date)?;
        let plan = plan_occurrences(rule, anchor, &existing);

        let mut created = Vec::with_capacity(plan.to_create.len());
        for interval in plan.to_create {
            let booking = Booking::new(
                room.id,
                rule.user_id,
                rule.title.clone(),
                interval,
                rule.participants,
            )
            .with_description(rule.description.clone())
            .from_rule(rule.id);
            self.storage.create_booking(&booking)?;
            created.push(booking);
        }

        self.storage.create_notification(&Notification::new(
            rule.user_id,
            "recurring_bookings_created",
            "Recurring bookings created".to_string(),
            format!(
                "{}: {} bookings created, {} skipped due to conflicts",
                rule.title,
                created.len(),
                plan.skipped.len()
            ),
        ))?;

        info!(
            created = created.len(),
            skipped = plan.skipped.len(),
            "recurrence expanded"
        );
        Ok(ExpansionReport {
            rule_id: rule.id,
            created,
            skipped: plan.skipped,
        })
    }

    /// Fit advice for holding a meeting of `participants` in a room
    #[instrument(skip(self))]
    pub fn room_fit(&self, room_id: Uuid, participants: u32) -> Result<FitReport> {
        let selected = self.require_room(room_id)?;
        let catalog = self.storage.list_rooms()?;
        Ok(suggest_rooms(&selected, participants, &catalog))
    }

    /// Delete a booking, enforcing ownership rules
    #[instrument(skip(self))]
    pub fn delete_booking(&self, booking_id: Uuid, user_id: Uuid, role: UserRole) -> Result<()> {
        let booking = self
            .storage
            .find_booking_by_id(booking_id)?
            .ok_or_else(|| Error::NotFound(format!("booking {booking_id}")))?;

        let is_owner = booking.user_id == user_id;
        if !PermissionMatrix::can_delete_booking(role, is_owner) {
            return Err(Error::PermissionDenied(
                "only admins may delete other users' bookings".into(),
            ));
        }

        self.storage.delete_booking(booking_id)?;
        info!(%booking_id, "booking deleted");
        Ok(())
    }

    #[instrument(skip(self, room), fields(room_id = %room.id))]
    pub fn create_room(&self, role: UserRole, room: &Room) -> Result<()> {
        Self::require_permission(role, BookingAction::CreateRoom)?;
        Self::validate_room(room)?;
        invariants::assert_room_invariants(room);
        self.storage.create_room(room)
    }

    #[instrument(skip(self, room), fields(room_id = %room.id))]
    pub fn update_room(&self, role: UserRole, room: &Room) -> Result<()> {
        Self::require_permission(role, BookingAction::EditRoom)?;
        Self::validate_room(room)?;
        self.require_room(room.id)?;
        self.storage.update_room(room)
    }

    /// Delete a room; its bookings go with it
    #[instrument(skip(self))]
    pub fn delete_room(&self, role: UserRole, room_id: Uuid) -> Result<()> {
        Self::require_permission(role, BookingAction::DeleteRoom)?;
        self.require_room(room_id)?;
        self.storage.delete_room(room_id)
    }

    /// Aggregate statistics over bookings starting in `[from, to)`
    #[instrument(skip(self))]
    pub fn stats_between(
        &self,
        role: UserRole,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<BookingStats> {
        Self::require_permission(role, BookingAction::ViewAnalytics)?;
        let bookings = self.storage.list_bookings_between(from, to)?;
        let rooms = self.storage.list_rooms()?;
        Ok(compute_stats(&bookings, &rooms, now))
    }

    /// All of a user's bookings as CSV, soonest first
    #[instrument(skip(self))]
    pub fn export_user_bookings_csv(
        &self,
        role: UserRole,
        user_id: Uuid,
        organizer: &str,
    ) -> Result<String> {
        Self::require_permission(role, BookingAction::ExportBookings)?;
        let bookings = self.storage.list_bookings_for_user(user_id)?;

        let mut rows = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            let room = self.require_room(booking.room_id)?;
            rows.push(BookingExport::from_booking(booking, &room, organizer));
        }
        Ok(export::to_csv(&rows))
    }

    /// One booking as an iCalendar event
    #[instrument(skip(self))]
    pub fn export_booking_ics(&self, booking_id: Uuid, organizer: &str) -> Result<String> {
        let booking = self
            .storage
            .find_booking_by_id(booking_id)?
            .ok_or_else(|| Error::NotFound(format!("booking {booking_id}")))?;
        let room = self.require_room(booking.room_id)?;
        Ok(export::to_ics(&booking, &room, organizer))
    }

    fn require_room(&self, room_id: Uuid) -> Result<Room> {
        self.storage
            .find_room_by_id(room_id)?
            .ok_or_else(|| Error::NotFound(format!("room {room_id}")))
    }

    fn require_permission(role: UserRole, action: BookingAction) -> Result<()> {
        if PermissionMatrix::can_perform(role, action) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{role:?} may not perform {action:?}"
            )))
        }
    }

    fn validate_room(room: &Room) -> Result<()> {
        if room.name.trim().is_empty() {
            return Err(Error::Validation("room name must not be empty".into()));
        }
        if room.capacity == 0 {
            return Err(Error::Validation("room capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Booked intervals for a room on one calendar day
    fn room_intervals_on(&self, room_id: Uuid, date: NaiveDate) -> Result<Vec<Interval>> {
        let Some(start) = date.and_hms_opt(0, 0, 0) else {
            return Ok(Vec::new());
        };
        let from = start.and_utc();
        self.room_intervals_window(room_id, from, from + Duration::days(1))
    }

    /// Booked intervals for a room across a date span (both ends inclusive)
    fn room_intervals_between(
        &self,
        room_id: Uuid,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<Interval>> {
        let (Some(from), Some(to)) = (from_date.and_hms_opt(0, 0, 0), to_date.and_hms_opt(0, 0, 0))
        else {
            return Ok(Vec::new());
        };
        if to_date < from_date {
            return Ok(Vec::new());
        }
        self.room_intervals_window(room_id, from.and_utc(), to.and_utc() + Duration::days(1))
    }

    fn room_intervals_window(
        &self,
        room_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Interval>> {
        Ok(self
            .storage
            .list_bookings_for_room_between(room_id, from, to)?
            .iter()
            .map(Booking::interval)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecurrenceType;
    use crate::schedule::FitClassification;
    use crate::storage::{
        BookingRepository, Database, NotificationRepository, RuleRepository,
    };
    use chrono::{NaiveTime, TimeZone};

    fn service() -> BookingService<Database> {
        BookingService::new(Database::open_in_memory().unwrap())
    }

    fn add_room(service: &BookingService<Database>, name: &str, capacity: u32) -> Room {
        let room = Room::new(name.to_string(), capacity, "1st floor".to_string());
        service.create_room(UserRole::Admin, &room).unwrap();
        room
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn request(room: &Room, user_id: Uuid, start: DateTime<Utc>, hours: i64) -> BookingRequest {
        BookingRequest {
            room_id: room.id,
            user_id,
            title: "Planning".to_string(),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::hours(hours),
            participants: 4,
        }
    }

    #[test]
    fn test_create_booking_persists_and_notifies() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let user = Uuid::new_v4();

        let booking = service
            .create_booking(&request(&room, user, at(2024, 1, 10, 9), 1))
            .unwrap();

        let found = service.storage().find_booking_by_id(booking.id).unwrap();
        assert!(found.is_some());
        assert_eq!(service.storage().unread_notification_count(user).unwrap(), 1);
    }

    #[test]
    fn test_overlapping_booking_rejected() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let user = Uuid::new_v4();

        service
            .create_booking(&request(&room, user, at(2024, 1, 10, 9), 2))
            .unwrap();
        let err = service
            .create_booking(&request(&room, user, at(2024, 1, 10, 10), 2))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { room_id, .. } if room_id == room.id));
    }

    #[test]
    fn test_back_to_back_bookings_allowed() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let user = Uuid::new_v4();

        service
            .create_booking(&request(&room, user, at(2024, 1, 10, 9), 1))
            .unwrap();
        service
            .create_booking(&request(&room, user, at(2024, 1, 10, 10), 1))
            .unwrap();
    }

    #[test]
    fn test_same_time_different_rooms_allowed() {
        let service = service();
        let alpha = add_room(&service, "Alpha", 8);
        let beta = add_room(&service, "Beta", 8);
        let user = Uuid::new_v4();

        service
            .create_booking(&request(&alpha, user, at(2024, 1, 10, 9), 1))
            .unwrap();
        service
            .create_booking(&request(&beta, user, at(2024, 1, 10, 9), 1))
            .unwrap();
    }

    #[test]
    fn test_capacity_exceeded_rejected() {
        let service = service();
        let room = add_room(&service, "Small", 3);
        let mut req = request(&room, Uuid::new_v4(), at(2024, 1, 10, 9), 1);
        req.participants = 4;

        let err = service.create_booking(&req).unwrap_err();
        assert!(matches!(
            err,
            Error::Capacity {
                participants: 4,
                capacity: 3
            }
        ));
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let mut req = request(&room, Uuid::new_v4(), at(2024, 1, 10, 9), 1);
        req.end_time = req.start_time;

        assert!(matches!(
            service.create_booking(&req),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_room_rejected() {
        let service = service();
        let ghost = Room::new("Ghost".to_string(), 8, "1st floor".to_string());
        let err = service
            .create_booking(&request(&ghost, Uuid::new_v4(), at(2024, 1, 10, 9), 1))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_availability_marks_booked_slot() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        service
            .create_booking(&request(&room, Uuid::new_v4(), at(2024, 1, 10, 9), 1))
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let slots = service.check_availability(room.id, date).unwrap();

        assert_eq!(slots.len(), 15);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        for slot in &slots {
            assert_eq!(slot.available, slot.start != nine, "slot {}", slot.start);
        }
    }

    fn daily_rule(room: &Room, anchor: NaiveDate, end: NaiveDate) -> RecurrenceRule {
        let mut rule = RecurrenceRule::new(
            Uuid::new_v4(),
            room.id,
            "Standup".to_string(),
            RecurrenceType::Daily,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end,
            4,
        );
        rule.created_at = Utc.from_utc_datetime(&anchor.and_hms_opt(0, 0, 0).unwrap());
        rule
    }

    #[test]
    fn test_expansion_skips_conflicting_occurrence() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        // Pre-existing booking collides with occurrence 3 of 5
        service
            .create_booking(&request(&room, Uuid::new_v4(), at(2024, 1, 3, 9), 1))
            .unwrap();

        let rule = daily_rule(
            &room,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        let report = service.expand_recurring(&rule).unwrap();

        assert_eq!(report.created.len(), 4);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            report.skipped[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert!(report.created.iter().all(|b| b.recurring_rule_id == Some(rule.id)));

        // Rule and bookings are both persisted
        assert!(service.storage().find_rule_by_id(rule.id).unwrap().is_some());
        assert_eq!(service.storage().count_bookings_for_room(room.id).unwrap(), 5);
    }

    #[test]
    fn test_expansion_summary_notification() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let rule = daily_rule(
            &room,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        service.expand_recurring(&rule).unwrap();

        let notes = service
            .storage()
            .list_notifications_for_user(rule.user_id, 10)
            .unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("3 bookings created"));
    }

    #[test]
    fn test_expansion_rejects_over_capacity_rule() {
        let service = service();
        let room = add_room(&service, "Small", 3);
        let mut rule = daily_rule(
            &room,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        rule.participants = 5;

        assert!(matches!(
            service.expand_recurring(&rule),
            Err(Error::Capacity { .. })
        ));
        // Nothing persisted on upfront rejection
        assert!(service.storage().find_rule_by_id(rule.id).unwrap().is_none());
    }

    #[test]
    fn test_room_fit_over_capacity() {
        let service = service();
        let small = add_room(&service, "Small", 4);
        add_room(&service, "Mid", 10);
        add_room(&service, "Big", 20);

        let report = service.room_fit(small.id, 6).unwrap();
        assert_eq!(report.classification, FitClassification::OverCapacity);
        assert_eq!(report.suggestions[0].name, "Mid");
    }

    #[test]
    fn test_delete_booking_ownership() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let booking = service
            .create_booking(&request(&room, owner, at(2024, 1, 10, 9), 1))
            .unwrap();

        let err = service
            .delete_booking(booking.id, stranger, UserRole::Member)
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));

        service
            .delete_booking(booking.id, stranger, UserRole::Admin)
            .unwrap();
        assert!(service.storage().find_booking_by_id(booking.id).unwrap().is_none());
    }

    #[test]
    fn test_member_cannot_manage_rooms() {
        let service = service();
        let room = Room::new("Alpha".to_string(), 8, "1st floor".to_string());
        assert!(matches!(
            service.create_room(UserRole::Member, &room),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_stats_over_window() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let user = Uuid::new_v4();
        service
            .create_booking(&request(&room, user, at(2024, 1, 10, 9), 1))
            .unwrap();
        service
            .create_booking(&request(&room, user, at(2024, 1, 11, 9), 2))
            .unwrap();

        let stats = service
            .stats_between(
                UserRole::Member,
                at(2024, 1, 1, 0),
                at(2024, 2, 1, 0),
                at(2024, 1, 10, 12),
            )
            .unwrap();
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.upcoming_bookings, 1);
        assert_eq!(stats.top_room.as_deref(), Some("Alpha"));
    }

    #[test]
    fn test_csv_export_lists_user_bookings() {
        let service = service();
        let room = add_room(&service, "Alpha", 8);
        let user = Uuid::new_v4();
        service
            .create_booking(&request(&room, user, at(2024, 1, 10, 9), 1))
            .unwrap();
        service
            .create_booking(&request(&room, Uuid::new_v4(), at(2024, 1, 11, 9), 1))
            .unwrap();

        let csv = service
            .export_user_bookings_csv(UserRole::Member, user, "alice")
            .unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"Alpha\""));
    }
}
