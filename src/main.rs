mod relay;
mod shared;

use axum::{routing::post, Router};
use relay::clock::SystemClock;
use relay::reaper::spawn_reaper;
use relay::store::{RelayConfig, RelayStore};
use shared::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PORT: u16 = 4545;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partyline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting partyline relay server");

    // One store owns every room; handlers and the reaper share it.
    let store = Arc::new(RelayStore::new(
        Arc::new(SystemClock),
        RelayConfig::default(),
    ));
    let reaper = spawn_reaper(Arc::clone(&store));

    let app_state = AppState::new(store);

    // Browser clients on other origins (or behind a tunnel) must be able
    // to reach the API, so CORS is wide open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/room", post(relay::handlers::room_action))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", PORT))
        .await
        .unwrap();
    info!("Relay listening on http://0.0.0.0:{PORT}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .unwrap();

    reaper.stop().await;
    info!("Relay stopped");
}
