pub mod auth;
pub mod chat;
pub mod navigation;
pub mod phases;
pub mod reports;
pub mod risks;
pub mod session;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router(state.clone()))
        .nest("/phases", phases::router(state.clone()))
        .nest("/navigation", navigation::router(state.clone()))
        .nest("/chat", chat::router(state.clone()))
        .nest("/risks", risks::router(state.clone()))
        .nest("/reports", reports::router(state))
}
