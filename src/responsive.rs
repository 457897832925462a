//! The responsive layout model.
//!
//! Positions are canonical at the maximum column count; other column
//! counts either carry a stored override or are derived on demand by
//! first-fit packing of the canonical sequence. The model is shared
//! between the engine and its caller (and outlives any single grid
//! binding), so all mutation goes through `&self` and subscribers hear
//! about every change.

use std::cell::{Cell as StdCell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::geometry::{Cell, Span};
use crate::layout::{Item, reading_order, reflow};
use crate::style::css::{self, SelectorFormat};

/// What changed, for subscribers that only care about part of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChange {
    /// Positions for a column count were saved or an override was cleared.
    Layout { columns: u32 },
    /// An item definition's intrinsic size changed.
    ItemSize { id: String },
    /// The definition set itself changed.
    Definitions,
}

/// Options for [`LayoutModel::breakpoint_css`].
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointCssOptions {
    /// Design cell size in pixels; with `gap` it fixes each breakpoint's
    /// container width.
    pub cell_size: f64,
    pub gap: f64,
    pub selector: SelectorFormat,
    /// Selector of the grid container itself.
    pub grid_selector: String,
}

impl Default for BreakpointCssOptions {
    fn default() -> Self {
        Self {
            cell_size: 184.0,
            gap: 16.0,
            selector: SelectorFormat::default(),
            grid_selector: ".grid".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct ModelInner {
    max_columns: u32,
    min_columns: u32,
    definitions: IndexMap<String, Span>,
    canonical: FxHashMap<String, Cell>,
    overrides: FxHashMap<u32, FxHashMap<String, Cell>>,
    current_columns: u32,
}

type ModelSubscriber = Rc<dyn Fn(&ModelChange)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSubscription(u64);

pub struct LayoutModel {
    inner: RefCell<ModelInner>,
    subscribers: RefCell<Vec<(u64, ModelSubscriber)>>,
    next_subscriber: StdCell<u64>,
    logger: RefCell<Option<Rc<dyn Fn(&str)>>>,
}

impl std::fmt::Debug for LayoutModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LayoutModel")
            .field("max_columns", &inner.max_columns)
            .field("min_columns", &inner.min_columns)
            .field("items", &inner.definitions.len())
            .field("overrides", &inner.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LayoutModel {
    pub fn new(max_columns: u32, min_columns: u32) -> Rc<Self> {
        let max_columns = max_columns.max(1);
        let min_columns = min_columns.clamp(1, max_columns);
        Rc::new(Self {
            inner: RefCell::new(ModelInner {
                max_columns,
                min_columns,
                current_columns: max_columns,
                ..ModelInner::default()
            }),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: StdCell::new(0),
            logger: RefCell::new(None),
        })
    }

    pub fn max_columns(&self) -> u32 {
        self.inner.borrow().max_columns
    }

    pub fn min_columns(&self) -> u32 {
        self.inner.borrow().min_columns
    }

    pub fn current_columns(&self) -> u32 {
        self.inner.borrow().current_columns
    }

    /// Updates the tracked column count (driven by an external container
    /// observer). Returns `(previous, current)` when the count actually
    /// changed.
    pub fn set_current_columns(&self, columns: u32) -> Option<(u32, u32)> {
        let mut inner = self.inner.borrow_mut();
        let columns = columns.clamp(inner.min_columns, inner.max_columns);
        let previous = inner.current_columns;
        if previous == columns {
            return None;
        }
        inner.current_columns = columns;
        Some((previous, columns))
    }

    /// Diagnostics sink for best-effort updates; wired to the host by the
    /// engine.
    pub fn set_logger(&self, logger: impl Fn(&str) + 'static) {
        *self.logger.borrow_mut() = Some(Rc::new(logger));
    }

    /// Declares an item with its intrinsic size and canonical position.
    pub fn define_item(&self, id: impl Into<String>, span: Span, canonical: Cell) {
        let id = id.into();
        {
            let mut inner = self.inner.borrow_mut();
            inner.definitions.insert(id.clone(), span);
            inner.canonical.insert(id, canonical);
        }
        self.notify(&ModelChange::Definitions);
    }

    pub fn remove_item(&self, id: &str) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let removed = inner.definitions.shift_remove(id).is_some();
            inner.canonical.remove(id);
            for positions in inner.overrides.values_mut() {
                positions.remove(id);
            }
            removed
        };
        if removed {
            self.notify(&ModelChange::Definitions);
        }
    }

    pub fn item_size(&self, id: &str) -> Option<Span> {
        self.inner.borrow().definitions.get(id).copied()
    }

    /// Replaces an item's intrinsic size. Unknown ids are a no-op with a
    /// diagnostic through the host-provided logger.
    pub fn update_item_size(&self, id: &str, span: Span) {
        let known = {
            let mut inner = self.inner.borrow_mut();
            match inner.definitions.get_mut(id) {
                Some(existing) => {
                    *existing = span;
                    true
                }
                None => false,
            }
        };
        if known {
            self.notify(&ModelChange::ItemSize { id: id.to_string() });
        } else if let Some(logger) = self.logger.borrow().clone() {
            logger(&format!("update_item_size: unknown item \"{id}\""));
        }
    }

    /// Positions for `n` columns: canonical at the maximum, a stored
    /// override when one exists, otherwise derived by first-fit packing of
    /// the canonical sequence.
    pub fn layout_for_columns(&self, columns: u32) -> FxHashMap<String, Cell> {
        let inner = self.inner.borrow();
        let columns = columns.clamp(inner.min_columns, inner.max_columns);
        if columns == inner.max_columns {
            return inner.canonical.clone();
        }
        if let Some(positions) = inner.overrides.get(&columns) {
            return positions.clone();
        }
        derive(&inner, columns)
            .into_iter()
            .map(|item| (item.id, item.cell))
            .collect()
    }

    /// The same layout as [`layout_for_columns`](Self::layout_for_columns)
    /// but as an ordered item list, which CSS emission wants.
    pub fn items_for_columns(&self, columns: u32) -> Vec<Item> {
        let positions = self.layout_for_columns(columns);
        let inner = self.inner.borrow();
        let mut items: Vec<Item> = inner
            .definitions
            .iter()
            .filter_map(|(id, span)| {
                positions
                    .get(id)
                    .map(|cell| Item::new(id.clone(), *cell, *span))
            })
            .collect();
        items.sort_by(reading_order);
        items
    }

    /// Stores positions for `n` columns: canonical when `n` is the
    /// maximum, an override otherwise.
    pub fn save_layout(&self, columns: u32, positions: FxHashMap<String, Cell>) {
        let columns = {
            let mut inner = self.inner.borrow_mut();
            let columns = columns.clamp(inner.min_columns, inner.max_columns);
            if columns == inner.max_columns {
                inner.canonical = positions;
            } else {
                inner.overrides.insert(columns, positions);
            }
            columns
        };
        self.notify(&ModelChange::Layout { columns });
    }

    /// Forgets a stored override; a no-op for the canonical column count.
    pub fn clear_override(&self, columns: u32) {
        let cleared = {
            let mut inner = self.inner.borrow_mut();
            if columns == inner.max_columns {
                false
            } else {
                inner.overrides.remove(&columns).is_some()
            }
        };
        if cleared {
            self.notify(&ModelChange::Layout { columns });
        }
    }

    pub fn has_override(&self, columns: u32) -> bool {
        self.inner.borrow().overrides.contains_key(&columns)
    }

    pub fn subscribe(&self, subscriber: impl Fn(&ModelChange) + 'static) -> ModelSubscription {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        self.subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        ModelSubscription(id)
    }

    pub fn unsubscribe(&self, subscription: ModelSubscription) {
        self.subscribers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }

    fn notify(&self, change: &ModelChange) {
        let subscribers: Vec<ModelSubscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(change);
        }
    }

    /// Container-query CSS for every breakpoint, preceded by a fallback
    /// block with the canonical positions so nothing flashes before the
    /// queries evaluate.
    pub fn breakpoint_css(&self, options: &BreakpointCssOptions) -> String {
        let (max, min) = {
            let inner = self.inner.borrow();
            (inner.max_columns, inner.min_columns)
        };
        let width = |columns: u32| {
            columns as f64 * options.cell_size + columns.saturating_sub(1) as f64 * options.gap
        };

        let mut blocks = Vec::new();
        blocks.push(css::layout_css(
            &options.selector,
            &self.items_for_columns(max),
            max,
        ));

        for columns in (min..=max).rev() {
            let query = if columns == max {
                format!("(min-width: {}px)", width(columns))
            } else if columns == min {
                format!("(max-width: {}px)", width(columns + 1) - 1.0)
            } else {
                format!(
                    "(min-width: {}px) and (max-width: {}px)",
                    width(columns),
                    width(columns + 1) - 1.0
                )
            };

            let mut block = format!("@container {query} {{\n");
            block.push_str(&format!(
                "  {} {{ grid-template-columns: repeat({columns}, 1fr); }}\n",
                options.grid_selector
            ));
            for item in self.items_for_columns(columns) {
                block.push_str("  ");
                block.push_str(&css::item_rule(
                    &options.selector,
                    &item.id,
                    item.cell,
                    item.span,
                    columns,
                ));
                block.push('\n');
            }
            block.push('}');
            blocks.push(block);
        }

        blocks.join("\n\n")
    }
}

fn derive(inner: &ModelInner, columns: u32) -> Vec<Item> {
    let mut items: Vec<Item> = inner
        .definitions
        .iter()
        .map(|(id, span)| {
            let cell = inner
                .canonical
                .get(id)
                .copied()
                .unwrap_or(Cell::new(1, u32::MAX));
            Item::new(id.clone(), cell, *span)
        })
        .collect();
    items.sort_by(reading_order);
    reflow(&items, columns)
}

#[cfg(feature = "serde")]
mod snapshot {
    use super::*;

    /// The caller-persisted form of the model.
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LayoutSnapshot {
        pub max_columns: u32,
        #[serde(default = "one")]
        pub min_columns: u32,
        pub definitions: IndexMap<String, Span>,
        pub canonical: FxHashMap<String, Cell>,
        #[serde(default)]
        pub overrides: FxHashMap<u32, FxHashMap<String, Cell>>,
    }

    fn one() -> u32 {
        1
    }

    impl LayoutModel {
        pub fn snapshot(&self) -> LayoutSnapshot {
            let inner = self.inner.borrow();
            LayoutSnapshot {
                max_columns: inner.max_columns,
                min_columns: inner.min_columns,
                definitions: inner.definitions.clone(),
                canonical: inner.canonical.clone(),
                overrides: inner.overrides.clone(),
            }
        }

        pub fn from_snapshot(snapshot: LayoutSnapshot) -> Rc<Self> {
            let model = LayoutModel::new(snapshot.max_columns, snapshot.min_columns);
            {
                let mut inner = model.inner.borrow_mut();
                inner.definitions = snapshot.definitions;
                inner.canonical = snapshot.canonical;
                inner.overrides = snapshot.overrides;
            }
            model
        }
    }
}

#[cfg(feature = "serde")]
pub use snapshot::LayoutSnapshot;

#[cfg(test)]
mod tests {
    use super::*;

    fn four_item_model() -> Rc<LayoutModel> {
        // Canonical at 4 columns, two 2-wide items per row.
        let model = LayoutModel::new(4, 1);
        model.define_item("a", Span::new(2, 1), Cell::new(1, 1));
        model.define_item("b", Span::new(2, 1), Cell::new(3, 1));
        model.define_item("c", Span::new(2, 1), Cell::new(1, 2));
        model.define_item("d", Span::new(2, 1), Cell::new(3, 2));
        model
    }

    #[test]
    fn canonical_round_trip() {
        let model = four_item_model();
        let positions = model.layout_for_columns(4);
        assert_eq!(positions.get("b"), Some(&Cell::new(3, 1)));

        let mut moved = positions.clone();
        moved.insert("a".to_string(), Cell::new(3, 2));
        moved.insert("d".to_string(), Cell::new(1, 1));
        model.save_layout(4, moved.clone());
        assert_eq!(model.layout_for_columns(4), moved);
    }

    #[test]
    fn override_round_trip_and_clear() {
        let model = four_item_model();
        let two_wide: FxHashMap<String, Cell> = [
            ("a".to_string(), Cell::new(1, 2)),
            ("b".to_string(), Cell::new(1, 1)),
            ("c".to_string(), Cell::new(1, 3)),
            ("d".to_string(), Cell::new(1, 4)),
        ]
        .into_iter()
        .collect();
        model.save_layout(2, two_wide.clone());
        assert!(model.has_override(2));
        assert_eq!(model.layout_for_columns(2), two_wide);

        model.clear_override(2);
        assert!(!model.has_override(2));
        // Back to derivation.
        assert_eq!(
            model.layout_for_columns(2).get("a"),
            Some(&Cell::new(1, 1))
        );
    }

    #[test]
    fn clear_override_is_a_no_op_for_the_canonical_count() {
        let model = four_item_model();
        let canonical = model.layout_for_columns(4);
        model.clear_override(4);
        assert_eq!(model.layout_for_columns(4), canonical);
    }

    #[test]
    fn derivation_packs_reading_order_into_fewer_columns() {
        let model = four_item_model();
        let derived = model.layout_for_columns(2);
        assert_eq!(derived.get("a"), Some(&Cell::new(1, 1)));
        assert_eq!(derived.get("b"), Some(&Cell::new(1, 2)));
        assert_eq!(derived.get("c"), Some(&Cell::new(1, 3)));
        assert_eq!(derived.get("d"), Some(&Cell::new(1, 4)));
    }

    #[test]
    fn derivation_is_deterministic_between_mutations() {
        let model = four_item_model();
        assert_eq!(model.layout_for_columns(3), model.layout_for_columns(3));
    }

    #[test]
    fn requested_columns_are_clamped() {
        let model = four_item_model();
        assert_eq!(model.layout_for_columns(9), model.layout_for_columns(4));
        assert_eq!(model.layout_for_columns(0), model.layout_for_columns(1));
    }

    #[test]
    fn unknown_item_size_update_is_a_logged_no_op() {
        let model = four_item_model();
        let logged = Rc::new(RefCell::new(Vec::new()));
        let sink = logged.clone();
        model.set_logger(move |message| sink.borrow_mut().push(message.to_string()));
        model.update_item_size("ghost", Span::new(3, 3));
        assert_eq!(model.item_size("ghost"), None);
        assert_eq!(logged.borrow().len(), 1);

        model.update_item_size("a", Span::new(1, 2));
        assert_eq!(model.item_size("a"), Some(Span::new(1, 2)));
    }

    #[test]
    fn subscribers_hear_saves_and_size_updates() {
        let model = four_item_model();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let seen = changes.clone();
        let subscription = model.subscribe(move |change| seen.borrow_mut().push(change.clone()));

        model.save_layout(2, FxHashMap::default());
        model.update_item_size("a", Span::new(2, 2));
        assert_eq!(&*changes.borrow(), &[
            ModelChange::Layout { columns: 2 },
            ModelChange::ItemSize { id: "a".into() },
        ]);

        model.unsubscribe(subscription);
        model.save_layout(3, FxHashMap::default());
        assert_eq!(changes.borrow().len(), 2);
    }

    #[test]
    fn breakpoint_query_bounds() {
        let model = LayoutModel::new(6, 1);
        model.define_item("a", Span::new(2, 1), Cell::new(1, 1));
        let css = model.breakpoint_css(&BreakpointCssOptions::default());

        assert!(css.contains("@container (min-width: 1184px)"));
        assert!(css.contains("@container (min-width: 784px) and (max-width: 983px)"));
        assert!(css.contains("@container (max-width: 383px)"));
        assert!(css.contains("repeat(6, 1fr)"));
        // Fallback block precedes every query block.
        let fallback = css.find("#a { grid-column: 1 / span 2").unwrap();
        let first_query = css.find("@container").unwrap();
        assert!(fallback < first_query);
    }

    #[test]
    fn breakpoint_css_clamps_widths_to_narrow_grids() {
        let model = LayoutModel::new(4, 1);
        model.define_item("wide", Span::new(4, 1), Cell::new(1, 1));
        let css = model.breakpoint_css(&BreakpointCssOptions::default());
        assert!(css.contains("grid-template-columns: repeat(1, 1fr)"));
        assert!(css.contains("#wide { grid-column: 1 / span 1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_round_trips_through_json() {
        let model = four_item_model();
        model.save_layout(2, model.layout_for_columns(2));

        let json = serde_json::to_string(&model.snapshot()).unwrap();
        assert!(json.contains("\"maxColumns\":4"));
        let restored: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        let restored = LayoutModel::from_snapshot(restored);

        assert_eq!(restored.max_columns(), 4);
        assert_eq!(restored.layout_for_columns(4), model.layout_for_columns(4));
        assert!(restored.has_override(2));
    }
}
