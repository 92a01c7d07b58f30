use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, instrument};

use super::types::{ActionRequest, JoinResponse, OkResponse, PollResponse};
use crate::shared::{AppError, AppState};

/// RPC-style handler for the relay endpoint
///
/// POST /api/room
/// Dispatches on the `action` field and maps store results to JSON.
/// Room codes are case-insensitive: they are upper-cased here, before
/// they reach the store, so the store only ever sees normalized codes.
#[instrument(name = "room_action", skip(state, body))]
pub async fn room_action(
    State(state): State<AppState>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = body.map_err(|rejection| {
        debug!(reason = %rejection, "Rejecting undecodable request body");
        AppError::MalformedRequest
    })?;

    let room = request.room.to_uppercase();

    match request.action.as_str() {
        "create" => {
            state.store.create(&room, request.name.trim())?;
            Ok(Json(OkResponse::new()).into_response())
        }
        "join" => {
            let outcome = state.store.join(&room, request.name.trim())?;
            Ok(Json(JoinResponse {
                ok: true,
                host: outcome.is_host,
            })
            .into_response())
        }
        "send" => {
            state
                .store
                .send(&room, request.from.trim(), &request.to, request.msg)?;
            Ok(Json(OkResponse::new()).into_response())
        }
        "poll" => {
            let outcome = state.store.poll(&room, request.name.trim(), request.since)?;
            Ok(Json(PollResponse {
                ok: true,
                msgs: outcome.messages,
                ts: outcome.max_ts,
            })
            .into_response())
        }
        "leave" => {
            state.store.leave(&room, request.name.trim())?;
            Ok(Json(OkResponse::new()).into_response())
        }
        other => Err(AppError::UnknownAction(other.to_string())),
    }
}
