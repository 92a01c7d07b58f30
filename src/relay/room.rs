use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Message address meaning "every player in the room except the sender".
pub const BROADCAST: &str = "*";

/// Message address resolved to the literal host name at send time.
pub const HOST_SENTINEL: &str = "__HOST__";

/// A single relayed message.
///
/// The payload is an opaque JSON value; the store never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub ts: i64,
    pub from: String,
    pub to: String,
    pub msg: Value,
}

/// One game session: a roster of players and a bounded-lifetime mailbox.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: String,
    /// Name of the creating player. Host-of-record is immutable: the host
    /// may leave the room without being replaced.
    pub host: String,
    /// Player name -> last-seen timestamp (epoch ms). Joining and polling
    /// both refresh the entry.
    pub players: HashMap<String, i64>,
    /// Insertion-ordered message log. Entries past the message TTL are
    /// dropped by the sweep.
    pub messages: Vec<Message>,
    pub created_at: i64,
}

impl Room {
    /// Creates a room with the host as its only player.
    pub fn new(code: String, host: String, now_ms: i64) -> Self {
        let mut players = HashMap::new();
        players.insert(host.clone(), now_ms);
        Self {
            code,
            host,
            players,
            messages: Vec::new(),
            created_at: now_ms,
        }
    }

    /// Upserts a player's last-seen timestamp.
    pub fn touch(&mut self, name: &str, now_ms: i64) {
        self.players.insert(name.to_string(), now_ms);
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// A room is expired only when it is older than the timeout AND no
    /// player has been seen within the timeout. Either a young room or a
    /// recently active player keeps it alive.
    pub fn is_expired(&self, now_ms: i64, timeout_ms: i64) -> bool {
        now_ms - self.created_at > timeout_ms
            && self
                .players
                .values()
                .all(|&last_seen| now_ms - last_seen > timeout_ms)
    }

    /// Drops messages at or before the cutoff, delivered or not.
    /// Returns how many were dropped.
    pub fn prune_messages(&mut self, cutoff_ms: i64) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| m.ts > cutoff_ms);
        before - self.messages.len()
    }
}
