use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use serde_json::Value;

use super::clock::Clock;
use super::room::{Message, Room, BROADCAST, HOST_SENTINEL};
use crate::shared::AppError;

/// Retention and sweep settings for the relay store.
///
/// The defaults match the deployed behavior: rooms idle for half an hour
/// are reaped, messages live for one minute, the sweep runs every 30s.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// How long a room may exist with no player activity before deletion.
    pub room_timeout: Duration,
    /// Maximum retention for a message, delivered or not.
    pub msg_ttl: Duration,
    /// How often the reaper runs a sweep.
    pub sweep_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            room_timeout: Duration::from_secs(30 * 60),
            msg_ttl: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy)]
pub struct JoinOutcome {
    /// Whether the joining name matches the room's host-of-record.
    pub is_host: bool,
}

/// Result of a successful poll: the messages addressed to the caller and
/// the cursor to pass as `since` on the next poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub messages: Vec<Message>,
    pub max_ts: i64,
}

/// Counts reported by a sweep, for logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepStats {
    pub rooms_removed: usize,
    pub messages_dropped: usize,
}

/// In-memory room/mailbox store.
///
/// All state lives behind one coarse mutex; every operation locks, does
/// pure in-memory work, and unlocks. Nothing awaits or touches I/O while
/// holding the lock, so the short critical sections are safe to call
/// from async handlers. The store is constructed where the process (or
/// test) wires its dependencies and shared via [`Arc`]; it is not a
/// process-wide singleton.
pub struct RelayStore {
    rooms: Mutex<HashMap<String, Room>>,
    clock: Arc<dyn Clock>,
    config: RelayConfig,
}

impl RelayStore {
    pub fn new(clock: Arc<dyn Clock>, config: RelayConfig) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Creates a room with the caller as host and sole player.
    ///
    /// The caller already knows it created the room, so there is no host
    /// flag in the success result.
    #[instrument(skip(self))]
    pub fn create(&self, code: &str, name: &str) -> Result<(), AppError> {
        if code.is_empty() || name.is_empty() {
            return Err(AppError::InvalidArgument("room or name"));
        }

        let now = self.clock.now_ms();
        let mut rooms = self.rooms.lock().unwrap();
        if rooms.contains_key(code) {
            warn!(room_code = %code, "Room already exists");
            return Err(AppError::RoomExists);
        }
        rooms.insert(code.to_string(), Room::new(code.to_string(), name.to_string(), now));

        info!(room_code = %code, host_name = %name, "Room created");
        Ok(())
    }

    /// Adds a player to a room, or refreshes their last-seen timestamp if
    /// they are already in it. Rejoining never errors.
    #[instrument(skip(self))]
    pub fn join(&self, code: &str, name: &str) -> Result<JoinOutcome, AppError> {
        if code.is_empty() || name.is_empty() {
            return Err(AppError::InvalidArgument("room or name"));
        }

        let now = self.clock.now_ms();
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(code).ok_or(AppError::RoomNotFound)?;
        room.touch(name, now);

        let is_host = name == room.host;
        info!(
            room_code = %code,
            player_name = %name,
            is_host = is_host,
            player_count = room.players.len(),
            "Player joined room"
        );

        Ok(JoinOutcome { is_host })
    }

    /// Appends a message to a room's log.
    ///
    /// The host sentinel is resolved to the literal host name here, at
    /// send time, not at poll time. No check that `from` or `to` are
    /// current members: sends are fire-and-forget.
    #[instrument(skip(self, payload))]
    pub fn send(&self, code: &str, from: &str, to: &str, payload: Value) -> Result<(), AppError> {
        if code.is_empty() || from.is_empty() {
            return Err(AppError::InvalidArgument("fields"));
        }

        let now = self.clock.now_ms();
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(code).ok_or(AppError::RoomNotFound)?;

        let to = if to == HOST_SENTINEL {
            room.host.clone()
        } else {
            to.to_string()
        };

        debug!(room_code = %code, from = %from, to = %to, ts = now, "Message queued");
        room.messages.push(Message {
            ts: now,
            from: from.to_string(),
            to,
            msg: payload,
        });

        Ok(())
    }

    /// Returns the messages addressed to `name` newer than `since_ms`,
    /// and refreshes the caller's last-seen timestamp: polling doubles
    /// as the liveness heartbeat, which is why an idle-but-polling
    /// player is never reaped.
    ///
    /// A broadcast is never delivered back to its own sender. The
    /// returned cursor `max_ts` covers every entry newer than `since_ms`
    /// regardless of recipient, so the caller's next poll skips past
    /// messages meant for someone else instead of re-scanning them
    /// forever.
    #[instrument(skip(self))]
    pub fn poll(&self, code: &str, name: &str, since_ms: i64) -> Result<PollOutcome, AppError> {
        if code.is_empty() || name.is_empty() {
            return Err(AppError::InvalidArgument("fields"));
        }

        let now = self.clock.now_ms();
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(code).ok_or(AppError::RoomNotFound)?;
        room.touch(name, now);

        let mut messages = Vec::new();
        let mut max_ts = since_ms;
        for message in &room.messages {
            if message.ts <= since_ms {
                continue;
            }
            if message.to == BROADCAST || message.to == name {
                let own_broadcast = message.from == name && message.to == BROADCAST;
                if !own_broadcast {
                    messages.push(message.clone());
                }
            }
            if message.ts > max_ts {
                max_ts = message.ts;
            }
        }

        debug!(
            room_code = %code,
            player_name = %name,
            since_ms = since_ms,
            delivered = messages.len(),
            max_ts = max_ts,
            "Poll served"
        );

        Ok(PollOutcome { messages, max_ts })
    }

    /// Removes a player from a room. If that empties the roster, the
    /// room is deleted immediately rather than waiting for the reaper.
    ///
    /// Leaving a room that is already gone is fine: it is a successful
    /// no-op, never `RoomNotFound`.
    #[instrument(skip(self))]
    pub fn leave(&self, code: &str, name: &str) -> Result<(), AppError> {
        if code.is_empty() || name.is_empty() {
            return Err(AppError::InvalidArgument("fields"));
        }

        let mut rooms = self.rooms.lock().unwrap();
        if let Some(room) = rooms.get_mut(code) {
            room.players.remove(name);
            if room.is_empty() {
                rooms.remove(code);
                info!(room_code = %code, "Deleted empty room");
            } else {
                info!(room_code = %code, player_name = %name, "Player left room");
            }
        }

        Ok(())
    }

    /// One garbage-collection pass, normally driven by the reaper.
    ///
    /// Deletes rooms that are both past the idle timeout and have no
    /// recently-seen player, then drops expired messages from the
    /// survivors. Exposed so tests can trigger a sweep deterministically.
    pub fn sweep(&self) -> SweepStats {
        let now = self.clock.now_ms();
        let timeout_ms = self.config.room_timeout.as_millis() as i64;
        let cutoff_ms = now - self.config.msg_ttl.as_millis() as i64;

        let mut rooms = self.rooms.lock().unwrap();

        let before = rooms.len();
        rooms.retain(|code, room| {
            let expired = room.is_expired(now, timeout_ms);
            if expired {
                debug!(room_code = %code, "Reaping stale room");
            }
            !expired
        });
        let rooms_removed = before - rooms.len();

        let mut messages_dropped = 0;
        for room in rooms.values_mut() {
            messages_dropped += room.prune_messages(cutoff_ms);
        }

        if rooms_removed > 0 || messages_dropped > 0 {
            info!(
                rooms_removed = rooms_removed,
                messages_dropped = messages_dropped,
                live_rooms = rooms.len(),
                "Sweep completed"
            );
        }

        SweepStats {
            rooms_removed,
            messages_dropped,
        }
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}
