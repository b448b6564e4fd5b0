use super::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::{Room, RoomState, VoteResult};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Safe character set for join codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// How many code collisions to tolerate before giving up on a create
const MAX_CODE_ATTEMPTS: usize = 16;

/// Generate a random join code of the given length
fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

impl Engine {
    /// Create a new open room owned by `owner`. The owner is the first
    /// participant; the join code is unique across all rooms.
    pub async fn create_room(&self, owner: &str) -> EngineResult<Room> {
        if owner.is_empty() {
            return Err(EngineError::InvalidInput(
                "owner must not be empty".to_string(),
            ));
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let room = Room {
                id: ulid::Ulid::new().to_string(),
                code: generate_code(self.config().code_length),
                owner: owner.to_string(),
                participants: vec![owner.to_string()],
                options: Vec::new(),
                votes: HashMap::new(),
                locked_in: HashSet::new(),
                state: RoomState::Open,
                result_id: None,
                created_at: chrono::Utc::now().to_rfc3339(),
            };

            match self.store().insert_room(room).await {
                Ok(room) => {
                    tracing::info!(
                        "room {} created by {} with code {}",
                        room.id,
                        room.owner,
                        room.code
                    );
                    return Ok(room);
                }
                // Code collision - regenerate and retry (rare with 24M combinations)
                Err(EngineError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        // Every attempt collided; the code space is effectively exhausted
        tracing::warn!(
            "gave up creating a room for {} after {} code collisions",
            owner,
            MAX_CODE_ATTEMPTS
        );
        Err(EngineError::StoreUnavailable(
            "could not allocate a unique join code".to_string(),
        ))
    }

    /// Close a room and compute its result. Owner only.
    ///
    /// The `open -> closed` transition is a single conditional store
    /// operation: of any number of concurrent closes exactly one wins,
    /// the losers get `RoomClosed`, and the ranking is computed exactly
    /// once, from the snapshot that transition committed.
    pub async fn close(&self, room_id: &str, username: &str) -> EngineResult<VoteResult> {
        let room = self.store().find_room(room_id).await?;
        if room.owner != username {
            tracing::warn!("{} tried to close room {} without owning it", username, room_id);
            return Err(EngineError::Forbidden(format!(
                "{} is not the owner of room {}",
                username, room_id
            )));
        }

        let snapshot = self.store().close_room(room_id).await?;
        let ranking = super::ranking::rank_options(&snapshot.options, &snapshot.votes);
        let result = self.store().create_result(room_id, username, ranking).await?;

        tracing::info!(
            "room {} closed by {}, result {} ({} options, {} votes)",
            room_id,
            username,
            result.id,
            snapshot.options.len(),
            snapshot.votes.len()
        );
        Ok(result)
    }
}
