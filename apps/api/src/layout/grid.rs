#![allow(dead_code)]

//! Grid Packer: lays worksheet problems out on fixed 2x2 printed pages.
//!
//! The remote PDF renderer walks the submitted problem order with exactly these rules, so
//! the pages produced here are the pages of the generated document. Do not "improve" the
//! packing: any divergence makes the preview lie about the PDF.
//!
//! # Placement rules (per problem, in input order)
//! - Find the first free cell scanning (0,0) → (0,1) → (1,0) → (1,1). Page full → new page.
//! - Single: take that cell.
//! - Column span: needs the found cell in row 0 with the row-1 cell below it free,
//!   otherwise new page at column 0.
//! - Row span: needs the found cell in column 0 with its row partner free. Otherwise it may
//!   drop to the bottom row, but only when the found cell is in row 0 and (1,0) is free.
//!   Otherwise new page at row 0.
//! - Closed pages are never revisited.

use std::fmt;
use std::ptr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const GRID_ROWS: usize = 2;
pub const GRID_COLS: usize = 2;
pub const CELLS_PER_PAGE: usize = GRID_ROWS * GRID_COLS;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// How many grid cells a problem occupies, and in which arrangement.
///
/// Serialized with the remote problem bank's `layout_type` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayoutSpan {
    /// One cell.
    #[serde(rename = "NORMAL")]
    Single,
    /// Both columns of one row.
    #[serde(rename = "HORIZONTAL")]
    RowSpan,
    /// Both rows of one column.
    #[serde(rename = "VERTICAL")]
    ColumnSpan,
}

impl LayoutSpan {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutSpan::Single => "NORMAL",
            LayoutSpan::RowSpan => "HORIZONTAL",
            LayoutSpan::ColumnSpan => "VERTICAL",
        }
    }

    pub fn cell_count(self) -> usize {
        match self {
            LayoutSpan::Single => 1,
            LayoutSpan::RowSpan | LayoutSpan::ColumnSpan => 2,
        }
    }
}

impl fmt::Display for LayoutSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutSpan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(LayoutSpan::Single),
            "HORIZONTAL" => Ok(LayoutSpan::RowSpan),
            "VERTICAL" => Ok(LayoutSpan::ColumnSpan),
            other => Err(format!(
                "unknown layout type '{other}' (expected NORMAL, HORIZONTAL or VERTICAL)"
            )),
        }
    }
}

/// Anything that can be placed on a worksheet page.
pub trait GridItem {
    fn layout_span(&self) -> LayoutSpan;
}

/// A `(row, col)` cell coordinate. Index order is row-major: `index = row * 2 + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const ORIGIN: CellPos = CellPos { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn from_index(index: usize) -> Self {
        Self {
            row: index / GRID_COLS,
            col: index % GRID_COLS,
        }
    }

    pub const fn index(self) -> usize {
        self.row * GRID_COLS + self.col
    }
}

/// What a cell holds from a renderer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRole {
    Empty,
    /// The only cell of a single problem, or the first cell of a spanning one.
    Anchor,
    /// Second cell of a spanning problem; repeats the anchor's reference.
    Continuation,
}

/// One printed 2x2 page. A spanning item is stored in both of its cells.
#[derive(Debug)]
pub struct Page<'a, T> {
    cells: [[Option<&'a T>; GRID_COLS]; GRID_ROWS],
}

impl<T> Clone for Page<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Page<'_, T> {}

impl<'a, T> Page<'a, T> {
    pub fn empty() -> Self {
        Self {
            cells: [[None; GRID_COLS]; GRID_ROWS],
        }
    }

    pub fn get(&self, pos: CellPos) -> Option<&'a T> {
        self.cells[pos.row][pos.col]
    }

    pub fn rows(&self) -> &[[Option<&'a T>; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }

    /// Cells in index order `0..4`.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, Option<&'a T>)> + '_ {
        (0..CELLS_PER_PAGE).map(|i| {
            let pos = CellPos::from_index(i);
            (pos, self.get(pos))
        })
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_cells() == 0
    }

    /// True when both pages hold the same item references in the same cells.
    pub fn same_placement(&self, other: &Page<'_, T>) -> bool {
        self.cells().zip(other.cells()).all(|((_, a), (_, b))| match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => ptr::eq(a, b),
            _ => false,
        })
    }
}

impl<T: GridItem> Page<'_, T> {
    /// Classifies a cell. A cell continues a span when its neighbour on the anchor side
    /// (row 0 for column spans, column 0 for row spans) holds the same reference.
    pub fn role(&self, pos: CellPos) -> CellRole {
        let Some(item) = self.get(pos) else {
            return CellRole::Empty;
        };

        let continues = match item.layout_span() {
            LayoutSpan::Single => false,
            LayoutSpan::ColumnSpan => {
                pos.row == 1 && self.cells[0][pos.col].is_some_and(|a| ptr::eq(a, item))
            }
            LayoutSpan::RowSpan => {
                pos.col == 1 && self.cells[pos.row][0].is_some_and(|a| ptr::eq(a, item))
            }
        };

        if continues {
            CellRole::Continuation
        } else {
            CellRole::Anchor
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Packing
// ────────────────────────────────────────────────────────────────────────────

/// Packs items into pages, in input order.
///
/// Empty input yields a single all-empty page. Never fails; every item is placed exactly
/// once.
pub fn pack<'a, T, I>(items: I) -> Vec<Page<'a, T>>
where
    T: GridItem + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut packer = GridPacker::new();
    for item in items {
        packer.place(item);
    }
    packer.finish()
}

/// Per-run accumulator. Lives for one `pack` call.
struct GridPacker<'a, T> {
    occupied: [[bool; GRID_COLS]; GRID_ROWS],
    current: Page<'a, T>,
    closed: Vec<Page<'a, T>>,
}

impl<'a, T: GridItem> GridPacker<'a, T> {
    fn new() -> Self {
        Self {
            occupied: [[false; GRID_COLS]; GRID_ROWS],
            current: Page::empty(),
            closed: Vec::new(),
        }
    }

    fn is_free(&self, row: usize, col: usize) -> bool {
        !self.occupied[row][col]
    }

    fn first_free_cell(&self) -> Option<CellPos> {
        (0..CELLS_PER_PAGE)
            .map(CellPos::from_index)
            .find(|pos| self.is_free(pos.row, pos.col))
    }

    /// Closes the current page and opens a blank one.
    fn turn_page(&mut self) {
        let full = std::mem::replace(&mut self.current, Page::empty());
        self.closed.push(full);
        self.occupied = [[false; GRID_COLS]; GRID_ROWS];
    }

    fn occupy(&mut self, row: usize, col: usize, item: &'a T) {
        self.occupied[row][col] = true;
        self.current.cells[row][col] = Some(item);
    }

    fn place(&mut self, item: &'a T) {
        let mut pos = match self.first_free_cell() {
            Some(pos) => pos,
            None => {
                self.turn_page();
                CellPos::ORIGIN
            }
        };

        match item.layout_span() {
            LayoutSpan::Single => self.occupy(pos.row, pos.col, item),

            LayoutSpan::ColumnSpan => {
                if pos.row != 0 || !self.is_free(1, pos.col) {
                    self.turn_page();
                    pos = CellPos::ORIGIN;
                }
                self.occupy(0, pos.col, item);
                self.occupy(1, pos.col, item);
            }

            LayoutSpan::RowSpan => {
                if pos.col != 0 || !self.is_free(pos.row, 1) {
                    // Only a top-row miss may fall through to the bottom row.
                    if pos.row == 0 && self.is_free(1, 0) {
                        pos = CellPos::new(1, 0);
                    } else {
                        self.turn_page();
                        pos = CellPos::ORIGIN;
                    }
                }
                self.occupy(pos.row, 0, item);
                self.occupy(pos.row, 1, item);
            }
        }
    }

    /// Emits the trailing page. With no input it is the blank "nothing selected" page;
    /// otherwise it holds at least the last item placed.
    fn finish(mut self) -> Vec<Page<'a, T>> {
        self.closed.push(self.current);
        self.closed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use super::LayoutSpan::{ColumnSpan, RowSpan, Single};

    #[derive(Debug)]
    struct Item {
        id: u32,
        span: LayoutSpan,
    }

    impl GridItem for Item {
        fn layout_span(&self) -> LayoutSpan {
            self.span
        }
    }

    fn items(spans: &[LayoutSpan]) -> Vec<Item> {
        spans
            .iter()
            .enumerate()
            .map(|(i, &span)| Item {
                id: i as u32 + 1,
                span,
            })
            .collect()
    }

    fn ids(page: &Page<'_, Item>) -> [[Option<u32>; 2]; 2] {
        let rows = page.rows();
        [
            [rows[0][0].map(|i| i.id), rows[0][1].map(|i| i.id)],
            [rows[1][0].map(|i| i.id), rows[1][1].map(|i| i.id)],
        ]
    }

    fn layout(spans: &[LayoutSpan]) -> Vec<[[Option<u32>; 2]; 2]> {
        let input = items(spans);
        pack(&input).iter().map(ids).collect()
    }

    /// Checks coverage, span shape and page ordering for one packing run.
    fn assert_well_formed(input: &[&Item]) {
        let pages = pack(input.iter().copied());
        assert!(!pages.is_empty());

        let mut last_page_seen = 0;
        for &item in input {
            let cells: Vec<(usize, CellPos)> = pages
                .iter()
                .enumerate()
                .flat_map(|(p, page)| page.cells().map(move |(pos, c)| (p, pos, c)))
                .filter(|(_, _, c)| c.is_some_and(|c| ptr::eq(c, item)))
                .map(|(p, pos, _)| (p, pos))
                .collect();

            assert_eq!(
                cells.len(),
                item.span.cell_count(),
                "item {} occupies the wrong number of cells",
                item.id
            );
            let page = cells[0].0;
            assert!(cells.iter().all(|(p, _)| *p == page));
            assert!(page >= last_page_seen, "item {} went back a page", item.id);
            last_page_seen = page;

            match item.span {
                Single => {}
                RowSpan => {
                    assert_eq!(cells[0].1.row, cells[1].1.row);
                    assert_eq!((cells[0].1.col, cells[1].1.col), (0, 1));
                }
                ColumnSpan => {
                    assert_eq!(cells[0].1.col, cells[1].1.col);
                    assert_eq!((cells[0].1.row, cells[1].1.row), (0, 1));
                }
            }
        }

        let occupied: usize = pages.iter().map(|p| p.occupied_cells()).sum();
        let required: usize = input.iter().map(|i| i.span.cell_count()).sum();
        assert_eq!(occupied, required, "a cell was shared or left dangling");
    }

    // ── fixed scenarios ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_input_yields_one_blank_page() {
        let pages = pack::<Item, _>(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_four_singles_fill_row_major() {
        assert_eq!(
            layout(&[Single, Single, Single, Single]),
            vec![[[Some(1), Some(2)], [Some(3), Some(4)]]]
        );
    }

    #[test]
    fn test_fifth_single_opens_second_page() {
        let pages = layout(&[Single; 5]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], [[Some(1), Some(2)], [Some(3), Some(4)]]);
        assert_eq!(pages[1], [[Some(5), None], [None, None]]);
    }

    #[test]
    fn test_column_span_alone_takes_left_column() {
        assert_eq!(layout(&[ColumnSpan]), vec![[[Some(1), None], [Some(1), None]]]);
    }

    #[test]
    fn test_column_span_fits_beside_single() {
        assert_eq!(
            layout(&[Single, ColumnSpan]),
            vec![[[Some(1), Some(2)], [None, Some(2)]]]
        );
    }

    #[test]
    fn test_row_span_in_bottom_right_opens_new_page() {
        // Found cell is (1,1): relocation is only tried from row 0.
        assert_eq!(
            layout(&[Single, Single, Single, RowSpan]),
            vec![
                [[Some(1), Some(2)], [Some(3), None]],
                [[Some(4), Some(4)], [None, None]],
            ]
        );
    }

    #[test]
    fn test_row_span_blocked_by_column_span_opens_new_page() {
        assert_eq!(
            layout(&[ColumnSpan, RowSpan]),
            vec![
                [[Some(1), None], [Some(1), None]],
                [[Some(2), Some(2)], [None, None]],
            ]
        );
    }

    #[test]
    fn test_row_span_drops_to_free_bottom_row() {
        assert_eq!(
            layout(&[Single, RowSpan]),
            vec![[[Some(1), None], [Some(2), Some(2)]]]
        );
    }

    #[test]
    fn test_column_span_in_bottom_row_opens_new_page() {
        assert_eq!(
            layout(&[Single, Single, ColumnSpan]),
            vec![
                [[Some(1), Some(2)], [None, None]],
                [[Some(3), None], [Some(3), None]],
            ]
        );
    }

    #[test]
    fn test_two_row_spans_share_a_page() {
        assert_eq!(
            layout(&[RowSpan, RowSpan, RowSpan]),
            vec![
                [[Some(1), Some(1)], [Some(2), Some(2)]],
                [[Some(3), Some(3)], [None, None]],
            ]
        );
    }

    #[test]
    fn test_closed_pages_are_never_backfilled() {
        // Page 1 keeps its empty (1,1) even though item 5 is a single.
        assert_eq!(
            layout(&[Single, Single, Single, RowSpan, Single]),
            vec![
                [[Some(1), Some(2)], [Some(3), None]],
                [[Some(4), Some(4)], [Some(5), None]],
            ]
        );
    }

    #[test]
    fn test_full_page_then_column_span() {
        assert_eq!(
            layout(&[RowSpan, RowSpan, ColumnSpan, ColumnSpan]),
            vec![
                [[Some(1), Some(1)], [Some(2), Some(2)]],
                [[Some(3), Some(4)], [Some(3), Some(4)]],
            ]
        );
    }

    // ── properties ──────────────────────────────────────────────────────────

    fn all_sequences(max_len: usize) -> Vec<Vec<LayoutSpan>> {
        let mut out = vec![vec![]];
        let mut frontier = vec![vec![]];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for seq in &frontier {
                for span in [Single, RowSpan, ColumnSpan] {
                    let mut s: Vec<LayoutSpan> = seq.clone();
                    s.push(span);
                    next.push(s);
                }
            }
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    #[test]
    fn test_every_item_placed_exactly_once() {
        for spans in all_sequences(6) {
            let input = items(&spans);
            let refs: Vec<&Item> = input.iter().collect();
            assert_well_formed(&refs);
        }
    }

    #[test]
    fn test_packing_is_deterministic() {
        let input = items(&[Single, ColumnSpan, RowSpan, Single, Single, RowSpan, ColumnSpan]);
        let first = pack(&input);
        let second = pack(&input);
        assert_eq!(first.len(), second.len());
        assert!(first.iter().zip(&second).all(|(a, b)| a.same_placement(b)));
    }

    #[test]
    fn test_reordering_changes_placement_only() {
        let input = items(&[RowSpan, Single, ColumnSpan, Single, RowSpan]);
        let mut order: Vec<&Item> = input.iter().collect();
        order.rotate_left(2);
        order.swap(0, 3);

        let pages = pack(order.iter().copied());
        let mut anchored: Vec<u32> = pages
            .iter()
            .flat_map(|page| {
                page.cells()
                    .filter(|(pos, _)| page.role(*pos) == CellRole::Anchor)
                    .filter_map(|(_, c)| c.map(|i| i.id))
                    .collect::<Vec<_>>()
            })
            .collect();
        anchored.sort_unstable();
        assert_eq!(anchored, vec![1, 2, 3, 4, 5]);

        assert_well_formed(&order);
    }

    // ── cell roles ──────────────────────────────────────────────────────────

    #[test]
    fn test_roles_mark_span_continuations() {
        let input = items(&[ColumnSpan, Single, Single]);
        let pages = pack(&input);
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.role(CellPos::new(0, 0)), CellRole::Anchor);
        assert_eq!(page.role(CellPos::new(1, 0)), CellRole::Continuation);
        assert_eq!(page.role(CellPos::new(0, 1)), CellRole::Anchor);
        assert_eq!(page.role(CellPos::new(1, 1)), CellRole::Anchor);

        let input = items(&[Single, RowSpan]);
        let pages = pack(&input);
        let page = &pages[0];
        assert_eq!(page.role(CellPos::new(0, 1)), CellRole::Empty);
        assert_eq!(page.role(CellPos::new(1, 0)), CellRole::Anchor);
        assert_eq!(page.role(CellPos::new(1, 1)), CellRole::Continuation);
    }

    #[test]
    fn test_roles_use_reference_identity_not_id() {
        // Two distinct items sharing an id must not read as one span.
        let input = vec![
            Item { id: 7, span: ColumnSpan },
            Item { id: 7, span: ColumnSpan },
        ];
        let pages = pack(&input);
        let page = &pages[0];
        assert_eq!(page.role(CellPos::new(1, 0)), CellRole::Continuation);
        assert_eq!(page.role(CellPos::new(0, 1)), CellRole::Anchor);
        assert_eq!(page.role(CellPos::new(1, 1)), CellRole::Continuation);
        assert!(!ptr::eq(
            page.get(CellPos::new(0, 0)).unwrap(),
            page.get(CellPos::new(0, 1)).unwrap()
        ));
    }

    // ── LayoutSpan ──────────────────────────────────────────────────────────

    #[test]
    fn test_layout_span_wire_names() {
        assert_eq!(serde_json::to_string(&RowSpan).unwrap(), "\"HORIZONTAL\"");
        let span: LayoutSpan = serde_json::from_str("\"VERTICAL\"").unwrap();
        assert_eq!(span, ColumnSpan);
        assert_eq!("normal".parse::<LayoutSpan>(), Ok(Single));
        assert!("DIAGONAL".parse::<LayoutSpan>().is_err());
    }

    #[test]
    fn test_cell_index_is_row_major() {
        let order: Vec<(usize, usize)> = (0..CELLS_PER_PAGE)
            .map(CellPos::from_index)
            .map(|p| (p.row, p.col))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(CellPos::new(1, 0).index(), 2);
    }
}
