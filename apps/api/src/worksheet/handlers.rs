//! Axum route handlers for the Worksheet API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::layout::{build_preview, WorksheetPreview};
use crate::models::{GenerateWorksheetRequest, ProblemQuery, Worksheet};
use crate::state::AppState;
use crate::worksheet::selection::Selection;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub problem_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub title: String,
    #[serde(default)]
    pub problem_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub worksheet_id: i64,
    pub pdf_url: String,
    pub title: String,
    /// Preview of exactly the order that was submitted.
    pub preview: WorksheetPreview,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/worksheets/preview
///
/// Packs the selected problems in request order. Called on every add, remove or reorder;
/// an empty selection previews as one blank page.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<WorksheetPreview>, AppError> {
    let selection = resolve_selection(&state, &request.problem_ids).await?;
    Ok(Json(build_preview(selection.problems())))
}

/// POST /api/v1/worksheets
///
/// Validates the title and selection, submits the ordered ids to the remote renderer and
/// returns its document reference alongside the matching preview.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let selection = resolve_selection(&state, &request.problem_ids).await?;
    selection.validate_submission(&request.title)?;

    let preview = build_preview(selection.problems());
    let submission = GenerateWorksheetRequest {
        title: request.title.clone(),
        problem_ids: selection.ids(),
    };

    let generated = state.backend.generate_worksheet(&submission).await?;
    info!(
        "Generated worksheet {} '{}' ({} problems, {} pages)",
        generated.worksheet_id,
        submission.title,
        selection.len(),
        preview.page_count
    );

    Ok(Json(GenerateResponse {
        worksheet_id: generated.worksheet_id,
        pdf_url: generated.pdf_url,
        title: submission.title,
        preview,
    }))
}

/// GET /api/v1/worksheets
pub async fn handle_list_worksheets(
    State(state): State<AppState>,
) -> Result<Json<Vec<Worksheet>>, AppError> {
    Ok(Json(state.backend.list_worksheets().await?))
}

/// GET /api/v1/worksheets/:id/download
pub async fn handle_download_worksheet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = state.backend.download_worksheet(id).await?;
    let disposition = format!("attachment; filename=\"worksheet-{id}.pdf\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}

/// DELETE /api/v1/worksheets/:id
pub async fn handle_delete_worksheet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.backend.delete_worksheet(id).await?;
    info!("Deleted worksheet {id}");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Resolves ids against the full bank. Skips the remote call for an empty selection.
async fn resolve_selection(state: &AppState, ids: &[i64]) -> Result<Selection, AppError> {
    if ids.is_empty() {
        return Ok(Selection::new());
    }
    let bank = state.backend.list_problems(&ProblemQuery::default()).await?;
    Selection::from_ids(ids, &bank)
}
