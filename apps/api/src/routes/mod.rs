pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::problems::handlers as problems;
use crate::state::AppState;
use crate::worksheet::handlers as worksheets;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Problem bank
        .route("/api/v1/problems", get(problems::handle_list_problems))
        .route(
            "/api/v1/problems/textbooks",
            get(problems::handle_list_textbooks),
        )
        .route(
            "/api/v1/problems/by-codes",
            post(problems::handle_problems_by_codes),
        )
        .route("/api/v1/problems/:id", get(problems::handle_get_problem))
        // Worksheets
        .route(
            "/api/v1/worksheets",
            get(worksheets::handle_list_worksheets).post(worksheets::handle_generate),
        )
        .route(
            "/api/v1/worksheets/preview",
            post(worksheets::handle_preview),
        )
        .route(
            "/api/v1/worksheets/:id",
            delete(worksheets::handle_delete_worksheet),
        )
        .route(
            "/api/v1/worksheets/:id/download",
            get(worksheets::handle_download_worksheet),
        )
        .with_state(state)
}
