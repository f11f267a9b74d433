use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod sessions;
pub mod state;
pub mod views;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::home))
        .route("/news/:language/:category", get(handlers::listing))
        .route("/login", post(handlers::login))
        .route("/account", get(handlers::account))
        .route("/register", post(handlers::register))
        .route("/logout", get(handlers::logout))
        .route("/search", get(handlers::search_page).post(handlers::search_news))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use varta_core::{Error, Result};
}
