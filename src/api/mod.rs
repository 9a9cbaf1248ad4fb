use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_template::RenderHtml;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::instrument;

mod state;
mod view;

pub use state::*;
pub use view::*;

pub fn create_router(app: App, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/search", post(search))
        .route("/api/movies", get(movies))
        .route("/api/trending", get(trending))
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn index(State(app): State<App>) -> impl IntoResponse {
    RenderHtml("index.html", app.engine.clone(), PageView::of(&app))
}

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    pub term: String,
}

#[instrument(skip(app))]
async fn search(State(app): State<App>, Json(input): Json<SearchInput>) -> StatusCode {
    app.input(input.term);
    StatusCode::ACCEPTED
}

async fn movies(State(app): State<App>) -> impl IntoResponse {
    Json(app.search())
}

async fn trending(State(app): State<App>) -> impl IntoResponse {
    Json(app.trending())
}
