//! Preview Projection: turns packed pages into the JSON the operator console renders.
//!
//! Every page carries all four cells in index order. Consumers draw anchors and skip
//! continuation cells, which only repeat the anchor's problem.

use serde::{Deserialize, Serialize};

use crate::layout::grid::{pack, CellRole, LayoutSpan, Page};
use crate::models::Problem;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetPreview {
    pub page_count: usize,
    pub problem_count: usize,
    pub pages: Vec<PreviewPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewPage {
    /// 1-based.
    pub page_number: usize,
    pub cells: Vec<PreviewCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewCell {
    pub row: usize,
    pub col: usize,
    pub role: CellRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<CellProblem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellProblem {
    pub problem_id: i64,
    pub label: String,
    pub image_url: String,
    pub layout_type: LayoutSpan,
    pub difficulty: u8,
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

/// Packs `problems` in order and projects the pages. An empty selection previews as one
/// blank page.
pub fn build_preview(problems: &[Problem]) -> WorksheetPreview {
    let pages: Vec<PreviewPage> = pack(problems)
        .iter()
        .enumerate()
        .map(|(i, page)| project_page(i + 1, page))
        .collect();

    WorksheetPreview {
        page_count: pages.len(),
        problem_count: problems.len(),
        pages,
    }
}

fn project_page(page_number: usize, page: &Page<'_, Problem>) -> PreviewPage {
    let cells = page
        .cells()
        .map(|(pos, cell)| PreviewCell {
            row: pos.row,
            col: pos.col,
            role: page.role(pos),
            problem: cell.map(|p| CellProblem {
                problem_id: p.id,
                label: p.label(),
                image_url: p.image_url.clone(),
                layout_type: p.layout_type,
                difficulty: p.difficulty,
            }),
        })
        .collect();

    PreviewPage { page_number, cells }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
