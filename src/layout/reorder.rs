//! Reordering by sequence position.
//!
//! The layout is treated as a reading-order sequence plus a column count;
//! a move is an insertion into that sequence, and every position falls out
//! of first-fit auto-placement afterwards.

use super::{Item, reading_order, reflow};
use crate::geometry::Cell;

#[derive(Debug, Clone, Copy)]
pub struct ReorderOptions {
    pub columns: u32,
}

/// Inserts `moved_id` at the sequence index derived from `target` and
/// reflows everything in reading order.
///
/// The input is never mutated. An unknown `moved_id` degrades to a plain
/// reflow of the input; the function never fails.
pub fn calculate_reorder_layout(
    items: &[Item],
    moved_id: &str,
    target: Cell,
    options: &ReorderOptions,
) -> Vec<Item> {
    let mut ordered: Vec<Item> = items.to_vec();
    ordered.sort_by(reading_order);

    let Some(moved_index) = ordered.iter().position(|item| item.id == moved_id) else {
        return reflow(&ordered, options.columns);
    };
    let moved = ordered.remove(moved_index);
    let remaining = ordered;

    // The insertion index comes from where the target cell lands among the
    // *reflowed* remaining items, so the sequence gap under the cursor is
    // the one the item enters.
    let reflowed = reflow(&remaining, options.columns);
    let insert_at = reflowed
        .iter()
        .position(|item| !item.cell.is_before(&target))
        .unwrap_or(reflowed.len());

    let mut sequence = remaining;
    sequence.insert(insert_at, moved);
    reflow(&sequence, options.columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Span;
    use crate::layout::is_overlap_free;

    fn item(id: &str, column: u32, row: u32, width: u32, height: u32) -> Item {
        Item::new(id, Cell::new(column, row), Span::new(width, height))
    }

    fn cell_of<'a>(items: &'a [Item], id: &str) -> Cell {
        items.iter().find(|item| item.id == id).unwrap().cell
    }

    fn unit_grid() -> Vec<Item> {
        vec![
            item("a", 1, 1, 1, 1),
            item("b", 2, 1, 1, 1),
            item("c", 1, 2, 1, 1),
            item("d", 2, 2, 1, 1),
        ]
    }

    #[test]
    fn swap_into_earlier_slot() {
        let result = calculate_reorder_layout(
            &unit_grid(),
            "c",
            Cell::new(2, 1),
            &ReorderOptions { columns: 2 },
        );
        assert_eq!(cell_of(&result, "a"), Cell::new(1, 1));
        assert_eq!(cell_of(&result, "c"), Cell::new(2, 1));
        assert_eq!(cell_of(&result, "b"), Cell::new(1, 2));
        assert_eq!(cell_of(&result, "d"), Cell::new(2, 2));
        assert!(is_overlap_free(&result));
    }

    #[test]
    fn moving_to_own_cell_is_identity_up_to_reflow() {
        let items = unit_grid();
        let reflowed = reflow(&items, 2);
        for id in ["a", "b", "c", "d"] {
            let target = cell_of(&items, id);
            let result =
                calculate_reorder_layout(&items, id, target, &ReorderOptions { columns: 2 });
            assert_eq!(result, reflowed, "moving {id} onto itself changed the layout");
        }
    }

    #[test]
    fn target_past_everything_appends() {
        let result = calculate_reorder_layout(
            &unit_grid(),
            "a",
            Cell::new(2, 9),
            &ReorderOptions { columns: 2 },
        );
        assert_eq!(cell_of(&result, "b"), Cell::new(1, 1));
        assert_eq!(cell_of(&result, "c"), Cell::new(2, 1));
        assert_eq!(cell_of(&result, "d"), Cell::new(1, 2));
        assert_eq!(cell_of(&result, "a"), Cell::new(2, 2));
    }

    #[test]
    fn unknown_id_degrades_to_reflow() {
        let items = vec![item("a", 2, 3, 1, 1), item("b", 1, 5, 2, 1)];
        let result = calculate_reorder_layout(
            &items,
            "missing",
            Cell::new(1, 1),
            &ReorderOptions { columns: 2 },
        );
        assert_eq!(result, reflow(&{
            let mut sorted = items.clone();
            sorted.sort_by(reading_order);
            sorted
        }, 2));
    }

    #[test]
    fn reflow_is_a_fixed_point() {
        let items = unit_grid();
        let once = reflow(&items, 2);
        let twice = reflow(&once, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn oversize_item_is_clamped_not_lost() {
        let items = vec![item("wide", 1, 1, 5, 1), item("b", 1, 2, 1, 1)];
        let result = calculate_reorder_layout(
            &items,
            "b",
            Cell::new(1, 1),
            &ReorderOptions { columns: 2 },
        );
        let wide = result.iter().find(|item| item.id == "wide").unwrap();
        assert_eq!(wide.span.width, 2);
        assert!(is_overlap_free(&result));
    }
}
