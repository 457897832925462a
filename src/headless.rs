//! In-memory [`GridHost`] for testing and benchmarking.
//!
//! `HeadlessGrid` answers geometry queries from a fixed set of metrics and
//! placements, records every side effect the engine performs (stylesheet
//! writes, attributes, flips, dispatched events), and can hold View
//! Transitions open so tests can complete them out of order.

use std::cell::RefCell;

use indexmap::IndexMap;
use peniko::kurbo::Rect;
use rustc_hash::FxHashMap;

use crate::animate::FlipSpec;
use crate::event::{GridEvent, GridEventKind};
use crate::geometry::{Cell, GridMetrics, Span};
use crate::host::{GridHost, ItemIdentity, ItemState, Placement};

#[derive(Debug, Clone)]
struct HeadlessItem {
    placement: Placement,
    identity: ItemIdentity,
}

type Transition = (Box<dyn FnOnce()>, Box<dyn FnOnce()>);

#[derive(Default)]
struct Recorded {
    stylesheet: String,
    attributes: FxHashMap<(String, String), String>,
    states: FxHashMap<String, ItemState>,
    transition_names: FxHashMap<String, String>,
    inline_cleared: Vec<String>,
    flips: Vec<(String, FlipSpec)>,
    dispatched: Vec<(String, GridEventKind)>,
    logs: Vec<String>,
}

pub struct HeadlessGrid {
    metrics: RefCell<GridMetrics>,
    items: RefCell<IndexMap<String, HeadlessItem>>,
    recorded: RefCell<Recorded>,
    view_transitions: std::cell::Cell<bool>,
    defer_transitions: std::cell::Cell<bool>,
    pending: RefCell<Vec<Transition>>,
}

impl HeadlessGrid {
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics: RefCell::new(metrics),
            items: RefCell::new(IndexMap::new()),
            recorded: RefCell::new(Recorded::default()),
            view_transitions: std::cell::Cell::new(false),
            defer_transitions: std::cell::Cell::new(false),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// A square-tracked grid, the common test fixture.
    pub fn with_tracks(columns: u32, rows: u32, cell_size: f64, gap: f64) -> Self {
        let width = columns as f64 * cell_size + (columns.saturating_sub(1)) as f64 * gap;
        let height = rows as f64 * cell_size + (rows.saturating_sub(1)) as f64 * gap;
        Self::new(GridMetrics {
            rect: Rect::new(0.0, 0.0, width, height),
            columns: vec![cell_size; columns as usize],
            rows: vec![cell_size; rows as usize],
            gap,
        })
    }

    pub fn with_item(self, id: impl Into<String>, cell: Cell, span: Span) -> Self {
        self.items.borrow_mut().insert(id.into(), HeadlessItem {
            placement: Placement { cell, span },
            identity: ItemIdentity::default(),
        });
        self
    }

    pub fn with_identity(self, id: &str, identity: ItemIdentity) -> Self {
        if let Some(item) = self.items.borrow_mut().get_mut(id) {
            item.identity = identity;
        }
        self
    }

    /// Enables `startViewTransition` support. With `defer`, transitions
    /// queue until [`resolve_transitions`](Self::resolve_transitions) runs
    /// them, which lets a test settle them out of order.
    pub fn with_view_transitions(self, defer: bool) -> Self {
        self.view_transitions.set(true);
        self.defer_transitions.set(defer);
        self
    }

    /// Simulates the DOM catching up with applied CSS.
    pub fn set_placement(&self, id: &str, cell: Cell, span: Span) {
        if let Some(item) = self.items.borrow_mut().get_mut(id) {
            item.placement = Placement { cell, span };
        }
    }

    pub fn set_metrics(&self, metrics: GridMetrics) {
        *self.metrics.borrow_mut() = metrics;
    }

    /// Runs queued transitions: every `update` in order, then every
    /// `done`. Returns how many were settled.
    pub fn resolve_transitions(&self) -> usize {
        let pending: Vec<Transition> = self.pending.borrow_mut().drain(..).collect();
        let count = pending.len();
        let mut dones = Vec::with_capacity(count);
        for (update, done) in pending {
            update();
            dones.push(done);
        }
        for done in dones {
            done();
        }
        count
    }

    pub fn pending_transitions(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn stylesheet_text(&self) -> String {
        self.recorded.borrow().stylesheet.clone()
    }

    pub fn attribute_of(&self, id: &str, name: &str) -> Option<String> {
        self.recorded
            .borrow()
            .attributes
            .get(&(id.to_string(), name.to_string()))
            .cloned()
    }

    pub fn state_of(&self, id: &str) -> ItemState {
        self.recorded
            .borrow()
            .states
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    pub fn view_transition_name_of(&self, id: &str) -> Option<String> {
        self.recorded.borrow().transition_names.get(id).cloned()
    }

    pub fn played_flips(&self) -> Vec<(String, FlipSpec)> {
        self.recorded.borrow().flips.clone()
    }

    pub fn dispatched_events(&self) -> Vec<(String, GridEventKind)> {
        self.recorded.borrow().dispatched.clone()
    }

    pub fn inline_cleared(&self) -> Vec<String> {
        self.recorded.borrow().inline_cleared.clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.recorded.borrow().logs.clone()
    }
}

impl GridHost for HeadlessGrid {
    fn grid_metrics(&self) -> GridMetrics {
        self.metrics.borrow().clone()
    }

    fn item_ids(&self) -> Vec<String> {
        self.items.borrow().keys().cloned().collect()
    }

    fn item_placement(&self, id: &str) -> Option<Placement> {
        self.items.borrow().get(id).map(|item| item.placement)
    }

    fn item_rect(&self, id: &str) -> Option<Rect> {
        let placement = self.item_placement(id)?;
        Some(
            self.metrics
                .borrow()
                .cell_rect(placement.cell, placement.span),
        )
    }

    fn item_identity(&self, id: &str) -> ItemIdentity {
        self.items
            .borrow()
            .get(id)
            .map(|item| item.identity.clone())
            .unwrap_or_default()
    }

    fn set_item_state(&self, id: &str, state: ItemState, on: bool) {
        let mut recorded = self.recorded.borrow_mut();
        let entry = recorded.states.entry(id.to_string()).or_default();
        entry.set(state, on);
    }

    fn set_item_attribute(&self, id: &str, name: &str, value: Option<&str>) {
        let key = (id.to_string(), name.to_string());
        let mut recorded = self.recorded.borrow_mut();
        match value {
            Some(value) => {
                recorded.attributes.insert(key, value.to_string());
            }
            None => {
                recorded.attributes.remove(&key);
            }
        }
    }

    fn clear_inline_layout(&self, id: &str) {
        self.recorded
            .borrow_mut()
            .inline_cleared
            .push(id.to_string());
    }

    fn set_view_transition_name(&self, id: &str, name: Option<&str>) {
        let mut recorded = self.recorded.borrow_mut();
        match name {
            Some(name) => {
                recorded
                    .transition_names
                    .insert(id.to_string(), name.to_string());
            }
            None => {
                recorded.transition_names.remove(id);
            }
        }
    }

    fn stylesheet(&self) -> String {
        self.stylesheet_text()
    }

    fn set_stylesheet(&self, css: &str) {
        self.recorded.borrow_mut().stylesheet = css.to_string();
    }

    fn supports_view_transitions(&self) -> bool {
        self.view_transitions.get()
    }

    fn start_view_transition(&self, update: Box<dyn FnOnce()>, done: Box<dyn FnOnce()>) {
        if self.defer_transitions.get() {
            self.pending.borrow_mut().push((update, done));
        } else {
            update();
            done();
        }
    }

    fn play_flip(&self, id: &str, spec: &FlipSpec) {
        self.recorded
            .borrow_mut()
            .flips
            .push((id.to_string(), spec.clone()));
    }

    fn dispatch_event(&self, name: &str, event: &GridEvent) {
        self.recorded
            .borrow_mut()
            .dispatched
            .push((name.to_string(), event.kind()));
    }

    fn log(&self, message: &str) {
        self.recorded.borrow_mut().logs.push(message.to_string());
    }
}
