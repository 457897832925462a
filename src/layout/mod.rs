//! Layout types shared by the push-down and reorder algorithms and by the
//! responsive model's breakpoint derivation.
//!
//! A layout is an ordered sequence of non-overlapping items. Reading order
//! is row-major, left to right; [`reflow`] is the first-fit auto-placement
//! both the reorder algorithm and breakpoint derivation are built on.

pub mod pushdown;
pub mod reorder;

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use crate::geometry::{self, Cell, Span};

pub use pushdown::{PushdownOptions, calculate_layout};
pub use reorder::{ReorderOptions, calculate_reorder_layout};

/// A positioned rectangle in a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub cell: Cell,
    pub span: Span,
}

impl Item {
    pub fn new(id: impl Into<String>, cell: Cell, span: Span) -> Self {
        Self {
            id: id.into(),
            cell,
            span,
        }
    }

    pub fn overlaps(&self, other: &Item) -> bool {
        geometry::overlaps(self.cell, self.span, other.cell, other.span)
    }
}

/// Row-major, left-to-right ordering of items by their top-left cell.
pub fn reading_order(a: &Item, b: &Item) -> Ordering {
    a.cell
        .row
        .cmp(&b.cell.row)
        .then(a.cell.column.cmp(&b.cell.column))
}

/// Rows scanned before first-fit placement gives up and parks the item on
/// the cap row. Correct inputs place well below this.
pub const MAX_REFLOW_ROWS: u32 = 100;

/// First-fit row-major auto-placement.
///
/// Items keep their sequence order; each is placed at the first top-left
/// cell whose required cells are all free and inside the column bounds.
/// Widths wider than the grid are clamped to it.
pub fn reflow(items: &[Item], columns: u32) -> Vec<Item> {
    let columns = columns.max(1);
    let mut occupied: FxHashSet<(u32, u32)> = FxHashSet::default();
    let mut placed = Vec::with_capacity(items.len());

    for item in items {
        let span = Span::new(item.span.width.clamp(1, columns), item.span.height.max(1));
        let cell =
            first_fit(&occupied, span, columns).unwrap_or_else(|| Cell::new(1, MAX_REFLOW_ROWS));
        occupy(&mut occupied, cell, span);
        placed.push(Item::new(item.id.clone(), cell, span));
    }

    placed
}

fn first_fit(occupied: &FxHashSet<(u32, u32)>, span: Span, columns: u32) -> Option<Cell> {
    for row in 1..=MAX_REFLOW_ROWS {
        for column in 1..=columns.saturating_sub(span.width) + 1 {
            let cell = Cell::new(column, row);
            if cells_free(occupied, cell, span) {
                return Some(cell);
            }
        }
    }
    None
}

fn cells_free(occupied: &FxHashSet<(u32, u32)>, cell: Cell, span: Span) -> bool {
    for column in cell.column..cell.column + span.width {
        for row in cell.row..cell.row + span.height {
            if occupied.contains(&(column, row)) {
                return false;
            }
        }
    }
    true
}

fn occupy(occupied: &mut FxHashSet<(u32, u32)>, cell: Cell, span: Span) {
    for column in cell.column..cell.column + span.width {
        for row in cell.row..cell.row + span.height {
            occupied.insert((column, row));
        }
    }
}

/// True when no two distinct items' cell ranges intersect.
pub fn is_overlap_free(items: &[Item]) -> bool {
    for (index, a) in items.iter().enumerate() {
        for b in &items[index + 1..] {
            if a.overlaps(b) {
                return false;
            }
        }
    }
    true
}
