mod ballot;
mod membership;
mod ranking;
mod room;

pub use ranking::rank_options;

use crate::error::EngineResult;
use crate::store::RoomStore;
use crate::types::{Room, RoomConfig, VoteResult};
use std::sync::Arc;

/// Room lifecycle and vote aggregation engine.
///
/// All mutation goes through single atomic conditional operations on the
/// [`RoomStore`], so concurrent callers on the same room can never lose
/// an update to each other. The engine itself holds no room state.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn RoomStore>,
    config: RoomConfig,
}

impl Engine {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self::with_config(store, RoomConfig::default())
    }

    pub fn with_config(store: Arc<dyn RoomStore>, config: RoomConfig) -> Self {
        Self { store, config }
    }

    pub(crate) fn store(&self) -> &dyn RoomStore {
        self.store.as_ref()
    }

    pub(crate) fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Fetch a room snapshot by id. Closed rooms are readable; they are
    /// just immutable.
    pub async fn room(&self, room_id: &str) -> EngineResult<Room> {
        self.store.find_room(room_id).await
    }

    /// Fetch a room snapshot by join code
    pub async fn room_by_code(&self, code: &str) -> EngineResult<Room> {
        self.store.find_room_by_code(code).await
    }

    /// Fetch a result by id
    pub async fn result(&self, result_id: &str) -> EngineResult<VoteResult> {
        self.store.find_result(result_id).await
    }
}
