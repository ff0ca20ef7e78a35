//! Problem bank filtering: the multi-select filters of the worksheet builder.
//!
//! The remote list endpoint only takes single-valued filters, so the full filter is applied
//! locally after fetching. Single selections are also pushed down to shrink the response.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::AppError;
use crate::layout::LayoutSpan;
use crate::models::{Problem, ProblemQuery};

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// Immutable filter value. Empty sets mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProblemFilter {
    pub difficulties: BTreeSet<u8>,
    pub layouts: BTreeSet<LayoutSpan>,
    pub textbook: Option<String>,
}

impl ProblemFilter {
    /// Parses raw query values: `difficulty=1,3`, `layout=NORMAL,VERTICAL`, `textbook=...`.
    pub fn parse(
        difficulty: Option<&str>,
        layout: Option<&str>,
        textbook: Option<&str>,
    ) -> Result<Self, AppError> {
        let difficulties = split_list(difficulty)
            .map(|raw| {
                raw.parse::<u8>()
                    .ok()
                    .filter(|d| (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(d))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "difficulty must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, got '{raw}'"
                        ))
                    })
            })
            .collect::<Result<BTreeSet<u8>, AppError>>()?;

        let layouts = split_list(layout)
            .map(|raw| raw.parse::<LayoutSpan>().map_err(AppError::Validation))
            .collect::<Result<BTreeSet<LayoutSpan>, AppError>>()?;

        let textbook = textbook
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(ProblemFilter {
            difficulties,
            layouts,
            textbook,
        })
    }

    /// The part of this filter the remote endpoint can evaluate.
    pub fn remote_query(&self) -> ProblemQuery {
        ProblemQuery {
            difficulty: single(&self.difficulties),
            layout_type: single(&self.layouts),
            subject: None,
        }
    }

    pub fn matches(&self, problem: &Problem) -> bool {
        if !self.difficulties.is_empty() && !self.difficulties.contains(&problem.difficulty) {
            return false;
        }
        if !self.layouts.is_empty() && !self.layouts.contains(&problem.layout_type) {
            return false;
        }
        match &self.textbook {
            None => true,
            Some(needle) => problem
                .textbook
                .as_deref()
                .is_some_and(|t| contains_ignore_case(t, needle)),
        }
    }

    /// Keeps matching problems in bank order.
    pub fn apply(&self, problems: Vec<Problem>) -> Vec<Problem> {
        problems.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct textbook names, sorted.
pub fn available_textbooks(problems: &[Problem]) -> Vec<String> {
    problems
        .iter()
        .filter_map(|p| p.textbook.as_deref())
        .filter(|t| !t.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Textbook autocomplete: available names containing `text`, or all of them for blank text.
pub fn matching_textbooks(problems: &[Problem], text: &str) -> Vec<String> {
    let text = text.trim();
    available_textbooks(problems)
        .into_iter()
        .filter(|t| text.is_empty() || contains_ignore_case(t, text))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn single<T: Copy>(set: &BTreeSet<T>) -> Option<T> {
    if set.len() == 1 {
        set.iter().next().copied()
    } else {
        None
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
