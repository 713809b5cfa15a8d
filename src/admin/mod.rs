use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub mod auth;
pub mod messages;
pub mod routes;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/admin/login",
            get(routes::login_page).post(routes::login_submit),
        )
        .route("/admin/login/status", get(routes::login_status))
        .route("/admin/login/reset", post(routes::login_reset))
        .with_state(state)
}
