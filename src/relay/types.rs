use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::room::Message;

/// Flat request envelope for the `/api/room` RPC endpoint.
///
/// Every field is defaulted so a missing field surfaces as an empty
/// value, which the store rejects with `InvalidArgument`; clients only
/// send the fields their action needs.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    /// Opaque payload, passed through untouched.
    #[serde(default)]
    pub msg: Value,
    /// Poll cursor in epoch milliseconds.
    #[serde(default)]
    pub since: i64,
}

/// Response for create, send and leave.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response for join.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub ok: bool,
    /// Whether the joining name is the room's host-of-record.
    pub host: bool,
}

/// Response for poll: the caller's messages plus the next cursor.
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub ok: bool,
    pub msgs: Vec<Message>,
    pub ts: i64,
}
