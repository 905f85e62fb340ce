pub mod health;
pub mod resume;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/parse-resume", post(resume::handle_parse_resume))
        .route("/apply", post(resume::handle_apply))
        .route(
            "/application-responses",
            post(resume::handle_application_responses),
        )
        .layer(body_limit)
        .with_state(state)
}
