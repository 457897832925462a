//! Serialization of layouts to `grid-column` / `grid-row` rules.

use crate::geometry::{Cell, Span};
use crate::layout::Item;

/// How an item id turns into a CSS selector. The default targets ids
/// (`#a`); attribute- or class-based schemes configure prefix and suffix,
/// e.g. `[data-gridiot-item="` + `"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorFormat {
    pub prefix: String,
    pub suffix: String,
}

impl Default for SelectorFormat {
    fn default() -> Self {
        Self {
            prefix: "#".to_string(),
            suffix: String::new(),
        }
    }
}

impl SelectorFormat {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn selector(&self, id: &str) -> String {
        format!("{}{}{}", self.prefix, id, self.suffix)
    }
}

/// Clamps a span so the item fits the grid: never wider than the column
/// count, and never past the right edge from its starting column.
pub fn clamp_span(cell: Cell, span: Span, columns: u32) -> Span {
    let columns = columns.max(1);
    let width = span
        .width
        .min(columns)
        .min(columns.saturating_sub(cell.column).saturating_add(1))
        .max(1);
    Span::new(width, span.height.max(1))
}

/// One `grid-column` / `grid-row` rule for an item.
pub fn item_rule(format: &SelectorFormat, id: &str, cell: Cell, span: Span, columns: u32) -> String {
    let span = clamp_span(cell, span, columns);
    format!(
        "{} {{ grid-column: {} / span {}; grid-row: {} / span {}; }}",
        format.selector(id),
        cell.column,
        span.width,
        cell.row,
        span.height,
    )
}

/// Rules for a whole layout, one line per item.
pub fn layout_css(format: &SelectorFormat, items: &[Item], columns: u32) -> String {
    items
        .iter()
        .map(|item| item_rule(format, &item.id, item.cell, item.span, columns))
        .collect::<Vec<_>>()
        .join("\n")
}
