use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::relay::store::RelayStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RelayStore>,
}

impl AppState {
    pub fn new(store: Arc<RelayStore>) -> Self {
        Self { store }
    }
}

/// Request-scoped errors. Nothing here is fatal to the server process;
/// the transport adapter maps each kind to a status code and JSON body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing {0}")]
    InvalidArgument(&'static str),

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room already exists")]
    RoomExists,

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid JSON")]
    MalformedRequest,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::RoomNotFound => StatusCode::NOT_FOUND,
            AppError::RoomExists => StatusCode::CONFLICT,
            AppError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedRequest => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
