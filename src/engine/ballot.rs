use super::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::Scores;

impl Engine {
    /// Submit a participant's scores, replacing any previous submission
    /// wholesale. Every key in `scores` must name a current option;
    /// options left out read as 0 at aggregation time.
    pub async fn submit_vote(
        &self,
        room_id: &str,
        username: &str,
        scores: Scores,
    ) -> EngineResult<()> {
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
        if room.is_locked_in(username) {
            return Err(EngineError::Locked(username.to_string()));
        }
        for option in scores.keys() {
            if !room.has_option(option) {
                return Err(EngineError::InvalidInput(format!(
                    "unknown option {:?}",
                    option
                )));
            }
        }

        self.store().upsert_vote(room_id, username, scores).await?;
        tracing::debug!("{} submitted a vote in room {}", username, room_id);
        Ok(())
    }

    /// Freeze a participant's submission. Requires that a submission
    /// exists (an all-zero or empty one counts); idempotent once locked.
    pub async fn lock_in(&self, room_id: &str, username: &str) -> EngineResult<()> {
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
        if !room.votes.contains_key(username) {
            return Err(EngineError::InvalidInput(format!(
                "{} has not submitted a vote yet",
                username
            )));
        }

        self.store().add_lock_in(room_id, username).await?;
        tracing::info!("{} locked in for room {}", username, room_id);
        Ok(())
    }
}
