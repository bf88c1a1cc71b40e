//! Recurrence rule storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_date, parse_datetime, parse_recurrence_type, parse_time, parse_uuid, parse_weekdays,
    weekdays_to_string, OptionalExt,
};
use crate::error::Result;
use crate::models::RecurrenceRule;

pub struct RuleStore<'a> {
    conn: &'a Connection,
}

impl<'a> RuleStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Persist a rule definition
    #[instrument(skip(self, rule), fields(rule_id = %rule.id, kind = %rule.kind))]
    pub fn create(&self, rule: &RecurrenceRule) -> Result<()> {
        self.conn.execute(
            "INSERT INTO recurring_rules (id, user_id, room_id, title, description, kind,
                                          start_time, end_time, end_date, weekdays,
                                          participants, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                rule.id.to_string(),
                rule.user_id.to_string(),
                rule.room_id.to_string(),
                rule.title,
                rule.description,
                rule.kind.as_str(),
                rule.start_time.format("%H:%M:%S").to_string(),
                rule.end_time.format("%H:%M:%S").to_string(),
                rule.end_date.format("%Y-%m-%d").to_string(),
                weekdays_to_string(&rule.weekdays),
                rule.participants,
                rule.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find rule by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<RecurrenceRule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM recurring_rules WHERE id = ?1",
            Self::COLUMNS
        ))?;

        let rule = stmt
            .query_row(params![id.to_string()], Self::row_to_rule)
            .optional()?;

        Ok(rule)
    }

    /// List rules owned by a user, newest first
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RecurrenceRule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM recurring_rules WHERE user_id = ?1 ORDER BY created_at DESC",
            Self::COLUMNS
        ))?;

        let rules = stmt
            .query_map(params![user_id.to_string()], Self::row_to_rule)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    /// Delete a rule; bookings materialized from it survive
    #[instrument(skip(self))]
    pub fn delete(&self, rule_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM recurring_rules WHERE id = ?1",
            params![rule_id.to_string()],
        )?;
        Ok(())
    }

    const COLUMNS: &'static str = "id, user_id, room_id, title, description, kind, \
                                   start_time, end_time, end_date, weekdays, participants, \
                                   created_at";

    fn row_to_rule(row: &rusqlite::Row<'_>) -> std::result::Result<RecurrenceRule, rusqlite::Error> {
        Ok(RecurrenceRule {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            user_id: parse_uuid(&row.get::<_, String>(1)?)?,
            room_id: parse_uuid(&row.get::<_, String>(2)?)?,
            title: row.get(3)?,
            description: row.get(4)?,
            kind: parse_recurrence_type(&row.get::<_, String>(5)?)?,
            start_time: parse_time(&row.get::<_, String>(6)?)?,
            end_time: parse_time(&row.get::<_, String>(7)?)?,
            end_date: parse_date(&row.get::<_, String>(8)?)?,
            weekdays: parse_weekdays(&row.get::<_, String>(9)?)?,
            participants: row.get(10)?,
            created_at: parse_datetime(&row.get::<_, String>(11)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use crate::models::{RecurrenceType, Room};
    use crate::storage::Database;

    fn setup() -> (Database, Room) {
        let db = Database::open_in_memory().unwrap();
        let room = Room::new("Sala Bianca".to_string(), 8, "2nd floor".to_string());
        db.rooms().create(&room).unwrap();
        (db, room)
    }

    fn weekly_rule(room: &Room) -> RecurrenceRule {
        RecurrenceRule::new(
            Uuid::new_v4(),
            room.id,
            "Weekly sync".to_string(),
            RecurrenceType::Weekly,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            5,
        )
        .with_weekdays(vec![Weekday::Mon, Weekday::Thu])
    }

    #[test]
    fn test_rule_round_trip() {
        let (db, room) = setup();
        let rule = weekly_rule(&room);
        db.rules().create(&rule).unwrap();

        let found = db.rules().find_by_id(rule.id).unwrap().unwrap();
        assert_eq!(found.kind, RecurrenceType::Weekly);
        assert_eq!(found.start_time, rule.start_time);
        assert_eq!(found.end_time, rule.end_time);
        assert_eq!(found.end_date, rule.end_date);
        assert_eq!(found.weekdays, vec![Weekday::Mon, Weekday::Thu]);
        assert_eq!(found.participants, 5);
    }

    #[test]
    fn test_list_for_user() {
        let (db, room) = setup();
        let rule = weekly_rule(&room);
        db.rules().create(&rule).unwrap();
        db.rules().create(&weekly_rule(&room)).unwrap();

        let mine = db.rules().list_for_user(rule.user_id).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, rule.id);
    }

    #[test]
    fn test_delete_rule_keeps_materialized_bookings() {
        use crate::models::Booking;

        let (db, room) = setup();
        let rule = weekly_rule(&room);
        db.rules().create(&rule).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let booking = Booking::new(
            room.id,
            rule.user_id,
            rule.title.clone(),
            rule.occurrence_interval(date),
            rule.participants,
        )
        .from_rule(rule.id);
        db.bookings().create(&booking).unwrap();

        db.rules().delete(rule.id).unwrap();

        // ON DELETE SET NULL: the booking survives, detached
        let survivor = db.bookings().find_by_id(booking.id).unwrap().unwrap();
        assert_eq!(survivor.recurring_rule_id, None);
    }
}
