use crate::domain::{Room, RoomId};
use crate::ports::room_repository::{RoomRepository as RoomRepositoryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory implementation of RoomRepository
///
/// Rooms are kept in insertion order. `save` overwrites a room with the
/// same id in place, otherwise appends it.
pub struct RoomRepository {
    rooms: Mutex<Vec<Room>>,
}

impl RoomRepository {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(Vec::new()),
        }
    }

    /// Create a repository seeded with the given rooms
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        Self {
            rooms: Mutex::new(rooms.into_iter().collect()),
        }
    }
}

impl Default for RoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepositoryTrait for RoomRepository {
    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.iter().find(|r| r.id() == room_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.lock().unwrap().clone())
    }

    async fn save(&self, room: &Room) -> Result<()> {
        let mut rooms = self.rooms.lock().unwrap();
        match rooms.iter_mut().find(|r| r.id() == room.id()) {
            Some(existing) => *existing = room.clone(),
            None => rooms.push(room.clone()),
        }
        Ok(())
    }
}
