// Room lifecycle & vote aggregation core. HTTP routing, auth, and
// rendering live in consumers of this crate.

pub mod engine;
pub mod error;
pub mod store;
pub mod types;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use store::{MemoryStore, RoomStore};
