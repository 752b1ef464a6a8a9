pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod store;

use axum::Router;
use axum::routing::{get, patch};
use tower_http::cors::CorsLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let permissive_cors = config.permissive_cors;
    let state = AppState::new(config);

    let mut app = Router::new()
        .route("/scores", get(api::list_scores).post(api::post_score))
        .route("/scores/{id}", patch(api::patch_score))
        .with_state(state.clone());

    if permissive_cors {
        app = app.layer(CorsLayer::permissive());
    }

    (app, state)
}

/// Bind the configured address and serve until the server fails.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.listen_addr.clone();
    let (app, _state) = build_app(config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Fruit Quest score service listening on {addr}");
    axum::serve(listener, app).await
}
