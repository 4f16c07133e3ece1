use crate::handler;
use axum::routing::{get, post};
use axum::Router;
use service::AppState;
use std::path::Path;
use tower_http::services::ServeDir;

pub fn define_routes(app_state: AppState) -> Router {
    let assets_dir = app_state.config.assets_directory.clone();
    Router::new()
        .route("/", get(handler::index))
        .route("/updates", get(handler::updates))
        .route("/ping/:session_id", post(handler::ping))
        .route("/local-event/:event_id", get(handler::local_event))
        .route("/global-event/:event_id", post(handler::global_event))
        .nest_service("/assets", ServeDir::new(Path::new(&assets_dir)))
        .with_state(app_state)
}
