//! Axum route handlers for problem bank browsing.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::{Problem, ProblemQuery};
use crate::problems::filter::{matching_textbooks, ProblemFilter};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProblemListParams {
    /// Comma-separated difficulties, e.g. `1,3`.
    pub difficulty: Option<String>,
    /// Comma-separated layout types, e.g. `NORMAL,VERTICAL`.
    pub layout: Option<String>,
    pub textbook: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextbookParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ProblemCodesRequest {
    pub codes: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/problems
pub async fn handle_list_problems(
    State(state): State<AppState>,
    Query(params): Query<ProblemListParams>,
) -> Result<Json<Vec<Problem>>, AppError> {
    let filter = ProblemFilter::parse(
        params.difficulty.as_deref(),
        params.layout.as_deref(),
        params.textbook.as_deref(),
    )?;

    let problems = state.backend.list_problems(&filter.remote_query()).await?;
    let fetched = problems.len();
    let problems = filter.apply(problems);

    debug!("Problem list: {} of {fetched} match {filter:?}", problems.len());
    Ok(Json(problems))
}

/// GET /api/v1/problems/textbooks
pub async fn handle_list_textbooks(
    State(state): State<AppState>,
    Query(params): Query<TextbookParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let problems = state.backend.list_problems(&ProblemQuery::default()).await?;
    Ok(Json(matching_textbooks(&problems, &params.q)))
}

/// GET /api/v1/problems/:id
pub async fn handle_get_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Problem>, AppError> {
    Ok(Json(state.backend.get_problem(id).await?))
}

/// POST /api/v1/problems/by-codes
///
/// Looks up problems by their printed codes so an operator can type codes instead of
/// browsing the bank.
pub async fn handle_problems_by_codes(
    State(state): State<AppState>,
    Json(request): Json<ProblemCodesRequest>,
) -> Result<Json<Vec<Problem>>, AppError> {
    let codes: Vec<String> = request
        .codes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if codes.is_empty() {
        return Err(AppError::Validation(
            "codes must contain at least one problem code".to_string(),
        ));
    }

    Ok(Json(state.backend.problems_by_codes(&codes).await?))
}
