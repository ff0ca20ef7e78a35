#![allow(dead_code)]

//! Worksheet selection: the ordered, duplicate-free list of problems an operator has
//! picked. Its order is the packing order of both the preview and the rendered PDF.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::Problem;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    problems: Vec<Problem>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `ids` against the bank, keeping request order. Repeated ids keep their first
    /// position; an id missing from the bank is rejected.
    pub fn from_ids(ids: &[i64], bank: &[Problem]) -> Result<Self, AppError> {
        let by_id: HashMap<i64, &Problem> = bank.iter().map(|p| (p.id, p)).collect();

        let mut selection = Selection::new();
        for id in ids {
            let problem = by_id.get(id).ok_or_else(|| {
                AppError::Validation(format!("problem {id} is not in the problem bank"))
            })?;
            selection.add((*problem).clone());
        }
        Ok(selection)
    }

    /// Appends `problem` unless one with the same id is already selected.
    pub fn add(&mut self, problem: Problem) -> bool {
        if self.contains(problem.id) {
            return false;
        }
        self.problems.push(problem);
        true
    }

    pub fn remove(&mut self, id: i64) -> Option<Problem> {
        let index = self.problems.iter().position(|p| p.id == id)?;
        Some(self.problems.remove(index))
    }

    /// Drag-and-drop reorder: takes the problem at `from` and reinserts it at `to`.
    /// Out-of-range indices leave the selection unchanged.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.problems.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let problem = self.problems.remove(from);
        self.problems.insert(to, problem);
        true
    }

    pub fn contains(&self, id: i64) -> bool {
        self.problems.iter().any(|p| p.id == id)
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Ids in packing order, as submitted to the renderer.
    pub fn ids(&self) -> Vec<i64> {
        self.problems.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// A worksheet needs a non-blank title and at least one problem.
    pub fn validate_submission(&self, title: &str) -> Result<(), AppError> {
        if title.trim().is_empty() {
            return Err(AppError::Validation(
                "worksheet title cannot be empty".to_string(),
            ));
        }
        if self.is_empty() {
            return Err(AppError::Validation(
                "select at least one problem".to_string(),
            ));
        }
        Ok(())
    }
}
