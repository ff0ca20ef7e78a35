// Worksheet layout: 2x2 grid pagination and the preview projection built on top of it.
// Packing is pure and O(n); handlers call it inline on every selection change.

pub mod grid;
pub mod preview;

// Re-export the public API consumed by the worksheet handlers and models.
pub use grid::{GridItem, LayoutSpan};
pub use preview::{build_preview, WorksheetPreview};
