use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Opaque ID types for type safety
pub type RoomId = String;
pub type ResultId = String;
pub type Username = String;

/// One participant's score submission: option name -> non-negative score.
/// Options added after the submission simply have no key and read as 0.
pub type Scores = HashMap<String, u32>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Open,
    Closed,
}

/// A single voting session: one set of participants, one set of options,
/// at most one submission per participant. Mutable only while `Open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Short human-shareable join token, unique across all rooms
    pub code: String,
    pub owner: Username,
    /// Insertion order, no duplicates, owner always first
    pub participants: Vec<Username>,
    /// Insertion order, no duplicates (case-sensitive exact match)
    pub options: Vec<String>,
    pub votes: HashMap<Username, Scores>,
    /// Participants who have frozen their submission
    pub locked_in: HashSet<Username>,
    pub state: RoomState,
    /// Set exactly once, when the room closes
    pub result_id: Option<ResultId>,
    pub created_at: String,
}

impl Room {
    pub fn is_open(&self) -> bool {
        self.state == RoomState::Open
    }

    /// The owner is a participant by construction
    pub fn is_participant(&self, username: &str) -> bool {
        self.participants.iter().any(|p| p == username)
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn is_locked_in(&self, username: &str) -> bool {
        self.locked_in.contains(username)
    }
}

/// One entry of a final ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankedOption {
    pub option: String,
    pub score: u64,
}

/// The immutable ranked outcome, computed exactly once when a room closes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResult {
    pub id: ResultId,
    pub created_by: Username,
    /// Descending by score; equal scores keep option insertion order
    pub ranking: Vec<RankedOption>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub code_length: usize,
    pub max_option_chars: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            code_length: 5,
            max_option_chars: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RoomState::Open).unwrap(), "\"open\"");
        assert_eq!(
            serde_json::to_string(&RoomState::Closed).unwrap(),
            "\"closed\""
        );
    }

    #[test]
    fn test_membership_helpers() {
        let room = Room {
            id: "room1".to_string(),
            code: "ABCDE".to_string(),
            owner: "alice".to_string(),
            participants: vec!["alice".to_string(), "bob".to_string()],
            options: vec!["pizza".to_string()],
            votes: HashMap::new(),
            locked_in: HashSet::from(["bob".to_string()]),
            state: RoomState::Open,
            result_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        assert!(room.is_open());
        assert!(room.is_participant("alice"));
        assert!(!room.is_participant("mallory"));
        assert!(room.has_option("pizza"));
        assert!(!room.has_option("Pizza")); // case-sensitive
        assert!(room.is_locked_in("bob"));
        assert!(!room.is_locked_in("alice"));
    }
}
