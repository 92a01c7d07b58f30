//! The room/mailbox relay: rooms, the locked store, the background
//! reaper, and the JSON transport adapter on top of it.

pub mod clock;
pub mod handlers;
pub mod reaper;
pub mod room;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reaper::{spawn_reaper, ReaperHandle};
pub use room::{Message, Room, BROADCAST, HOST_SENTINEL};
pub use store::{RelayConfig, RelayStore};
