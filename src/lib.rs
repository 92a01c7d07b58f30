// Library crate for the partyline relay server
// This file exposes the public API for integration tests

pub mod relay;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use relay::{Clock, ManualClock, RelayConfig, RelayStore, SystemClock};
pub use shared::{AppError, AppState};
