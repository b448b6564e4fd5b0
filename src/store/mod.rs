mod memory;

pub use memory::MemoryStore;

use crate::error::EngineResult;
use crate::types::{RankedOption, Room, Scores, VoteResult};
use async_trait::async_trait;

/// Persistence contract the engine is written against.
///
/// Every mutating method is a single atomic conditional operation: the
/// guard (room open, entry absent, user not locked in) is checked inside
/// the implementation's own critical section, never by the caller as a
/// separate read. Two interleaved callers can therefore never lose an
/// update. The engine's own pre-checks exist only to pick a precise
/// error kind; the store is the authority.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Insert a freshly created room. Fails with `Conflict` if the join
    /// code is already taken, so the caller can regenerate.
    async fn insert_room(&self, room: Room) -> EngineResult<Room>;

    async fn find_room(&self, id: &str) -> EngineResult<Room>;

    async fn find_room_by_code(&self, code: &str) -> EngineResult<Room>;

    /// Append a participant if absent. No-op success when already
    /// present; `RoomClosed` when the room is not open.
    async fn append_participant(&self, id: &str, username: &str) -> EngineResult<Room>;

    /// Append an option if absent. `Conflict` when already present;
    /// `RoomClosed` when the room is not open. Returns the updated
    /// option sequence so the caller can render it without a re-read.
    async fn append_option(&self, id: &str, option: &str) -> EngineResult<Vec<String>>;

    /// Set a participant's submission, replacing any previous one.
    /// `Locked` when the participant has locked in; `RoomClosed` when
    /// the room is not open.
    async fn upsert_vote(&self, id: &str, username: &str, scores: Scores) -> EngineResult<()>;

    /// Mark a participant's submission as frozen. Idempotent;
    /// `RoomClosed` when the room is not open.
    async fn add_lock_in(&self, id: &str, username: &str) -> EngineResult<()>;

    /// Transition `open -> closed`. Fails with `RoomClosed` when the
    /// room is already closed (the double-close race loser). Returns
    /// the closed snapshot, which is immutable from here on.
    async fn close_room(&self, id: &str) -> EngineResult<Room>;

    /// Record the ranking for a closed room and point the room at it.
    /// At most one result ever exists per room.
    async fn create_result(
        &self,
        room_id: &str,
        created_by: &str,
        ranking: Vec<RankedOption>,
    ) -> EngineResult<VoteResult>;

    async fn find_result(&self, id: &str) -> EngineResult<VoteResult>;
}
