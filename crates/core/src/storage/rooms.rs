//! Room storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_equipment, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Room;

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new room
    #[instrument(skip(self, room), fields(room_name = %room.name))]
    pub fn create(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "INSERT INTO rooms (id, name, capacity, floor, equipment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                room.id.to_string(),
                room.name,
                room.capacity,
                room.floor,
                serde_json::to_string(&room.equipment)?,
                room.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find room by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, capacity, floor, equipment, created_at
             FROM rooms WHERE id = ?1",
        )?;

        let room = stmt
            .query_row(params![id.to_string()], Self::row_to_room)
            .optional()?;

        Ok(room)
    }

    /// Update a room
    #[instrument(skip(self, room), fields(room_id = %room.id))]
    pub fn update(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "UPDATE rooms SET name = ?1, capacity = ?2, floor = ?3, equipment = ?4
             WHERE id = ?5",
            params![
                room.name,
                room.capacity,
                room.floor,
                serde_json::to_string(&room.equipment)?,
                room.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a room
    #[instrument(skip(self))]
    pub fn delete(&self, room_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM rooms WHERE id = ?1",
            params![room_id.to_string()],
        )?;
        Ok(())
    }

    /// List the whole catalog, ordered by name
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, capacity, floor, equipment, created_at
             FROM rooms ORDER BY name",
        )?;

        let rooms = stmt
            .query_map([], Self::row_to_room)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rooms)
    }

    fn row_to_room(row: &rusqlite::Row<'_>) -> std::result::Result<Room, rusqlite::Error> {
        Ok(Room {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            name: row.get(1)?,
            capacity: row.get(2)?,
            floor: row.get(3)?,
            equipment: parse_equipment(&row.get::<_, String>(4)?)?,
            created_at: parse_datetime(&row.get::<_, String>(5)?)?,
        })
    }
}
