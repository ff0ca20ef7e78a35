use serde::{Deserialize, Serialize};

use crate::layout::{GridItem, LayoutSpan};

/// A problem as stored in the remote problem bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub image_url: String,
    /// 1 – 5
    pub difficulty: u8,
    pub layout_type: LayoutSpan,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textbook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subchapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_number: Option<u32>,
    pub created_at: String,
}

impl Problem {
    /// Operator-facing label: the problem code, or `#<id>` for uncoded problems.
    pub fn label(&self) -> String {
        match self.problem_code.as_deref() {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => format!("#{}", self.id),
        }
    }
}

impl GridItem for Problem {
    fn layout_span(&self) -> LayoutSpan {
        self.layout_type
    }
}

/// Server-side filters accepted by the remote `GET /api/problems/` endpoint.
/// Each field is single-valued; multi-select filtering happens locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProblemQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[cfg(test)]
impl Problem {
    pub fn sample(id: i64, layout_type: LayoutSpan) -> Self {
        Problem {
            id,
            image_url: format!("https://cdn.example.test/problems/{id}.png"),
            difficulty: 3,
            layout_type,
            width: 800,
            height: 600,
            aspect_ratio: 800.0 / 600.0,
            subject: None,
            topic: None,
            answer: None,
            problem_code: None,
            textbook: None,
            chapter: None,
            subchapter: None,
            problem_number: None,
            created_at: "2025-03-01T09:00:00".to_string(),
        }
    }
}
