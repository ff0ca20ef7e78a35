use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: i64,
    pub title: String,
    pub pdf_url: String,
    pub created_at: String,
}

/// Body of the remote `POST /api/worksheets/generate`. `problem_ids` order is the page order
/// the renderer packs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateWorksheetRequest {
    pub title: String,
    pub problem_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedWorksheet {
    pub pdf_url: String,
    pub worksheet_id: i64,
}
