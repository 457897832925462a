//! Collision resolution by pushing colliders downward, then compacting the
//! column upward to close the gaps the push opened.

use super::Item;
use crate::geometry::Cell;

/// Recursion cap for the push cascade. A valid layout settles in far fewer
/// steps; the cap converts malformed input into degraded output instead of
/// a hang.
const MAX_PUSH_DEPTH: u32 = 50;

/// Upward moves attempted per item during compaction.
const MAX_COMPACT_ITERATIONS: u32 = 100;

#[derive(Debug, Clone, Copy)]
pub struct PushdownOptions {
    /// Run the gravity pass after pushing. On by default.
    pub compact: bool,
}

impl Default for PushdownOptions {
    fn default() -> Self {
        Self { compact: true }
    }
}

/// Moves `moved_id` to `target` and resolves collisions by recursively
/// pushing colliders downward, then compacts every other item upward.
///
/// The input is never mutated. An unknown `moved_id` returns the items
/// unchanged; the function never fails.
pub fn calculate_layout(
    items: &[Item],
    moved_id: &str,
    target: Cell,
    options: &PushdownOptions,
) -> Vec<Item> {
    let mut items: Vec<Item> = items.to_vec();
    let Some(moved) = items.iter().position(|item| item.id == moved_id) else {
        return items;
    };

    items[moved].cell = target;
    push_colliders(&mut items, moved, 0);
    if options.compact {
        compact(&mut items, moved);
    }
    items
}

fn push_colliders(items: &mut Vec<Item>, moved: usize, depth: u32) {
    if depth >= MAX_PUSH_DEPTH {
        return;
    }

    let mut colliders: Vec<usize> = (0..items.len())
        .filter(|&index| index != moved && items[index].overlaps(&items[moved]))
        .collect();
    // Lower-on-screen colliders are pushed first so the upper ones settle
    // above them, preserving vertical reading order. Same-row colliders go
    // left to right.
    colliders.sort_by(|&a, &b| {
        items[b]
            .cell
            .row
            .cmp(&items[a].cell.row)
            .then(items[a].cell.column.cmp(&items[b].cell.column))
    });

    for collider in colliders {
        items[collider].cell.row = items[moved].cell.row + items[moved].span.height;
        push_colliders(items, collider, depth + 1);
    }
}

fn compact(items: &mut [Item], moved: usize) {
    let mut order: Vec<usize> = (0..items.len()).filter(|&index| index != moved).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .cell
            .row
            .cmp(&items[b].cell.row)
            .then(items[a].cell.column.cmp(&items[b].cell.column))
    });

    for index in order {
        for _ in 0..MAX_COMPACT_ITERATIONS {
            if items[index].cell.row <= 1 {
                break;
            }
            let mut candidate = items[index].clone();
            candidate.cell.row -= 1;
            let blocked = items
                .iter()
                .enumerate()
                .any(|(other, item)| other != index && item.overlaps(&candidate));
            if blocked {
                break;
            }
            items[index].cell.row -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Span;
    use crate::layout::is_overlap_free;

    fn item(id: &str, column: u32, row: u32, width: u32, height: u32) -> Item {
        Item::new(id, Cell::new(column, row), Span::new(width, height))
    }

    fn find<'a>(items: &'a [Item], id: &str) -> &'a Item {
        items.iter().find(|item| item.id == id).unwrap()
    }

    #[test]
    fn single_collision_pushes_below() {
        let items = vec![item("a", 1, 1, 2, 2), item("b", 1, 2, 2, 1)];
        let result = calculate_layout(&items, "a", Cell::new(1, 1), &PushdownOptions::default());
        assert_eq!(find(&result, "b").cell, Cell::new(1, 3));
        assert!(is_overlap_free(&result));
    }

    #[test]
    fn swap_like_move() {
        let items = vec![item("a", 1, 1, 2, 2), item("b", 3, 1, 2, 2)];
        let result = calculate_layout(&items, "a", Cell::new(3, 1), &PushdownOptions::default());
        assert_eq!(find(&result, "a").cell, Cell::new(3, 1));
        assert_eq!(find(&result, "b").cell.row, 3);
        assert!(is_overlap_free(&result));
    }

    #[test]
    fn cascading_push() {
        let items = vec![
            item("a", 1, 1, 2, 2),
            item("b", 1, 2, 2, 2),
            item("c", 1, 3, 2, 1),
        ];
        let result = calculate_layout(&items, "a", Cell::new(1, 1), &PushdownOptions::default());
        assert_eq!(find(&result, "b").cell.row, 3);
        assert_eq!(find(&result, "c").cell.row, 5);
        assert!(is_overlap_free(&result));
    }

    #[test]
    fn unknown_moved_id_returns_copy_unchanged() {
        let items = vec![item("a", 1, 1, 2, 2), item("b", 3, 1, 1, 1)];
        let result = calculate_layout(
            &items,
            "missing",
            Cell::new(4, 4),
            &PushdownOptions::default(),
        );
        assert_eq!(result, items);
    }

    #[test]
    fn input_is_not_mutated() {
        let items = vec![item("a", 1, 1, 2, 2), item("b", 1, 2, 2, 1)];
        let snapshot = items.clone();
        let _ = calculate_layout(&items, "a", Cell::new(2, 2), &PushdownOptions::default());
        assert_eq!(items, snapshot);
    }

    #[test]
    fn compaction_closes_gaps_left_by_the_move() {
        // Moving a out of row 1 leaves b free to rise.
        let items = vec![item("a", 1, 1, 1, 1), item("b", 1, 2, 1, 1)];
        let result = calculate_layout(&items, "a", Cell::new(2, 1), &PushdownOptions::default());
        assert_eq!(find(&result, "b").cell, Cell::new(1, 1));
    }

    #[test]
    fn compact_false_keeps_pushed_rows() {
        let items = vec![item("a", 1, 1, 1, 1), item("b", 1, 2, 1, 1)];
        let result = calculate_layout(
            &items,
            "a",
            Cell::new(2, 1),
            &PushdownOptions { compact: false },
        );
        assert_eq!(find(&result, "b").cell, Cell::new(1, 2));
    }

    #[test]
    fn same_column_colliders_keep_relative_vertical_order() {
        let items = vec![
            item("moved", 3, 1, 1, 2),
            item("upper", 1, 1, 1, 1),
            item("lower", 1, 2, 1, 1),
        ];
        let result = calculate_layout(
            &items,
            "moved",
            Cell::new(1, 1),
            &PushdownOptions::default(),
        );
        let upper = find(&result, "upper").cell.row;
        let lower = find(&result, "lower").cell.row;
        assert!(upper < lower);
        assert!(is_overlap_free(&result));
    }
}
