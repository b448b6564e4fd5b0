use crate::error::{EngineError, EngineResult};
use crate::store::RoomStore;
use crate::types::{RankedOption, ResultId, Room, RoomId, RoomState, Scores, VoteResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Room table plus a code index, kept consistent under one lock
#[derive(Default)]
struct RoomTable {
    by_id: HashMap<RoomId, Room>,
    by_code: HashMap<String, RoomId>,
}

impl RoomTable {
    fn get_mut(&mut self, id: &str) -> EngineResult<&mut Room> {
        self.by_id.get_mut(id).ok_or_else(|| room_not_found(id))
    }
}

/// In-process `RoomStore` backed by `RwLock`-guarded tables.
///
/// Every mutation acquires the lock(s) it needs up front and then runs
/// check-then-commit with no await points, so each operation is atomic
/// and a caller cancelled mid-flight has either fully committed or not
/// touched anything at all. `create_result` spans both tables and takes
/// both write locks (rooms first, then results) before mutating either.
pub struct MemoryStore {
    rooms: RwLock<RoomTable>,
    results: RwLock<HashMap<ResultId, VoteResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(RoomTable::default()),
            results: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn room_not_found(id: &str) -> EngineError {
    EngineError::NotFound(format!("room {}", id))
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn insert_room(&self, room: Room) -> EngineResult<Room> {
        let mut rooms = self.rooms.write().await;
        if rooms.by_code.contains_key(&room.code) {
            return Err(EngineError::Conflict(format!(
                "code {} is already taken",
                room.code
            )));
        }
        rooms.by_code.insert(room.code.clone(), room.id.clone());
        rooms.by_id.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn find_room(&self, id: &str) -> EngineResult<Room> {
        self.rooms
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| room_not_found(id))
    }

    async fn find_room_by_code(&self, code: &str) -> EngineResult<Room> {
        let rooms = self.rooms.read().await;
        rooms
            .by_code
            .get(code)
            .and_then(|id| rooms.by_id.get(id))
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("room with code {}", code)))
    }

    async fn append_participant(&self, id: &str, username: &str) -> EngineResult<Room> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(id)?;
        if !room.is_open() {
            return Err(EngineError::RoomClosed);
        }
        // Append-if-absent: a repeat join is a success, not a duplicate
        if !room.is_participant(username) {
            room.participants.push(username.to_string());
        }
        Ok(room.clone())
    }

    async fn append_option(&self, id: &str, option: &str) -> EngineResult<Vec<String>> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(id)?;
        if !room.is_open() {
            return Err(EngineError::RoomClosed);
        }
        if room.has_option(option) {
            return Err(EngineError::Conflict(format!(
                "option {:?} already exists",
                option
            )));
        }
        room.options.push(option.to_string());
        Ok(room.options.clone())
    }

    async fn upsert_vote(&self, id: &str, username: &str, scores: Scores) -> EngineResult<()> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(id)?;
        if !room.is_open() {
            return Err(EngineError::RoomClosed);
        }
        if room.is_locked_in(username) {
            return Err(EngineError::Locked(username.to_string()));
        }
        // Full overwrite, never a merge
        room.votes.insert(username.to_string(), scores);
        Ok(())
    }

    async fn add_lock_in(&self, id: &str, username: &str) -> EngineResult<()> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(id)?;
        if !room.is_open() {
            return Err(EngineError::RoomClosed);
        }
        room.locked_in.insert(username.to_string());
        Ok(())
    }

    async fn close_room(&self, id: &str) -> EngineResult<Room> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(id)?;
        if !room.is_open() {
            // Another close already won
            return Err(EngineError::RoomClosed);
        }
        room.state = RoomState::Closed;
        Ok(room.clone())
    }

    async fn create_result(
        &self,
        room_id: &str,
        created_by: &str,
        ranking: Vec<RankedOption>,
    ) -> EngineResult<VoteResult> {
        // Both locks before any mutation: cancellation at either acquire
        // leaves both tables untouched, and the room pointer and the
        // stored result commit together or not at all
        let mut rooms = self.rooms.write().await;
        let mut results = self.results.write().await;

        let room = rooms.get_mut(room_id)?;
        if room.is_open() {
            return Err(EngineError::Conflict(format!(
                "room {} is still open",
                room_id
            )));
        }
        if room.result_id.is_some() {
            return Err(EngineError::Conflict(format!(
                "room {} already has a result",
                room_id
            )));
        }

        let result = VoteResult {
            id: ulid::Ulid::new().to_string(),
            created_by: created_by.to_string(),
            ranking,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        room.result_id = Some(result.id.clone());
        results.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    async fn find_result(&self, id: &str) -> EngineResult<VoteResult> {
        self.results
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("result {}", id)))
    }
}
