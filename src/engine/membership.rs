use super::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::Room;

impl Engine {
    /// Join a room by its code. Idempotent by membership: joining a room
    /// you are already in succeeds without mutation.
    pub async fn join(&self, code: &str, username: &str) -> EngineResult<Room> {
        if username.is_empty() {
            return Err(EngineError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }

        let room = self.store().find_room_by_code(code).await?;
        if !room.is_open() {
            return Err(EngineError::RoomClosed);
        }

        // Append-if-absent happens inside the store's critical section,
        // so concurrent joins cannot produce duplicates
        let room = self.store().append_participant(&room.id, username).await?;
        tracing::info!(
            "{} joined room {} ({} participants)",
            username,
            room.id,
            room.participants.len()
        );
        Ok(room)
    }

    /// Propose an option in an open room. Participants only; duplicates
    /// (exact, case-sensitive) are rejected. Returns the updated option
    /// sequence so the caller can render it without a second read.
    pub async fn add_option(
        &self,
        room_id: &str,
        username: &str,
        option: &str,
    ) -> EngineResult<Vec<String>> {
        if option.is_empty() {
            return Err(EngineError::InvalidInput(
                "option must not be empty".to_string(),
            ));
        }
        if option.chars().count() > self.config().max_option_chars {
            return Err(EngineError::InvalidInput(format!(
                "option exceeds {} characters",
                self.config().max_option_chars
            )));
        }

        let room = self.store().find_room(room_id).await?;
        if !room.is_open() {
            return Err(EngineError::RoomClosed);
        }
        if !room.is_participant(username) {
            return Err(EngineError::Forbidden(format!(
                "{} is not a participant of room {}",
                username, room_id
            )));
        }

        // The store re-checks the duplicate under its own lock; losing
        // that race surfaces as the same Conflict
        let options = self.store().append_option(room_id, option).await?;
        tracing::debug!(
            "option {:?} added to room {} by {} ({} total)",
            option,
            room_id,
            username,
            options.len()
        );
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::engine;
    use crate::error::EngineError;

    #[tokio::test]
    async fn test_join_appends_participant() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        let room = engine.join(&room.code, "bob").await.unwrap();
        assert_eq!(room.participants, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        engine.join(&room.code, "bob").await.unwrap();
        let room = engine.join(&room.code, "bob").await.unwrap();
        assert_eq!(room.participants, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_join_unknown_code() {
        let engine = engine();
        let result = engine.join("ZZZZZ", "bob").await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_join_closed_room_fails() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();
        engine.close(&room.id, "alice").await.unwrap();

        let result = engine.join(&room.code, "bob").await;
        assert!(matches!(result, Err(EngineError::RoomClosed)));
    }

    #[tokio::test]
    async fn test_add_option_preserves_insertion_order() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        engine.add_option(&room.id, "alice", "pizza").await.unwrap();
        let options = engine.add_option(&room.id, "alice", "sushi").await.unwrap();
        assert_eq!(options, vec!["pizza", "sushi"]);
    }

    #[tokio::test]
    async fn test_add_option_rejects_duplicate() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        engine.add_option(&room.id, "alice", "pizza").await.unwrap();
        let result = engine.add_option(&room.id, "alice", "pizza").await;
        assert!(matches!(result, Err(EngineError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_option_is_case_sensitive() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        engine.add_option(&room.id, "alice", "pizza").await.unwrap();
        let options = engine.add_option(&room.id, "alice", "Pizza").await.unwrap();
        assert_eq!(options, vec!["pizza", "Pizza"]);
    }

    #[tokio::test]
    async fn test_add_option_by_non_participant_fails() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        let result = engine.add_option(&room.id, "mallory", "pizza").await;
        assert!(matches!(result, Err(EngineError::Forbidden(_))));

        // Options unchanged
        let room = engine.room(&room.id).await.unwrap();
        assert!(room.options.is_empty());
    }

    #[tokio::test]
    async fn test_add_option_rejects_empty() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        let result = engine.add_option(&room.id, "alice", "").await;
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_add_option_rejects_overlong() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();

        let long = "x".repeat(201);
        let result = engine.add_option(&room.id, "alice", &long).await;
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_add_option_on_closed_room_fails() {
        let engine = engine();
        let room = engine.create_room("alice").await.unwrap();
        engine.close(&room.id, "alice").await.unwrap();

        let result = engine.add_option(&room.id, "alice", "pizza").await;
        assert!(matches!(result, Err(EngineError::RoomClosed)));
    }
}
