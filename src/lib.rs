//! # Gridiot
//! Gridiot is a headless drag-rearrangement, resize and reflow engine for
//! CSS Grid layouts. It coordinates four tightly coupled subsystems: a
//! deterministic interaction state machine, two layout algorithms
//! (push-down and reorder), an animation policy that arbitrates between
//! FLIP and the View Transitions API, and a responsive layout model that
//! stores canonical positions per breakpoint and emits container-query
//! CSS.
//!
//! The engine never touches a document directly; everything it needs from
//! the outside world goes through the [`GridHost`](host::GridHost) trait.
//! A browser integration implements the trait over real DOM, while the
//! bundled [`HeadlessGrid`](headless::HeadlessGrid) runs the whole engine
//! in memory, which is how the crate tests itself.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//!
//! use gridiot::prelude::*;
//!
//! // A 4-column grid with three unit items.
//! let host = Rc::new(
//!     HeadlessGrid::with_tracks(4, 4, 184.0, 16.0)
//!         .with_item("a", Cell::new(1, 1), Span::new(1, 1))
//!         .with_item("b", Cell::new(2, 1), Span::new(1, 1))
//!         .with_item("c", Cell::new(1, 2), Span::new(1, 1)),
//! );
//!
//! // Canonical positions live in a model shared with the caller.
//! let model = LayoutModel::new(4, 1);
//! model.define_item("a", Span::new(1, 1), Cell::new(1, 1));
//! model.define_item("b", Span::new(1, 1), Cell::new(2, 1));
//! model.define_item("c", Span::new(1, 1), Cell::new(1, 2));
//!
//! let core = gridiot::init(
//!     host.clone(),
//!     CoreOptions::default().layout_model(model.clone()),
//! );
//!
//! // An input plugin would emit these from pointer events.
//! core.emit(GridEvent::DragStart(InteractionDetail {
//!     item_id: "a".into(),
//!     cell: Cell::new(1, 1),
//!     span: Span::new(1, 1),
//!     source: InputSource::Pointer,
//! }));
//! core.emit(GridEvent::DragEnd(InteractionDetail {
//!     item_id: "a".into(),
//!     cell: Cell::new(3, 2),
//!     span: Span::new(1, 1),
//!     source: InputSource::Pointer,
//! }));
//!
//! assert_eq!(model.layout_for_columns(4)["a"], Cell::new(3, 2));
//! ```
//!
//! ## Architecture
//!
//! - [`state_machine`] — one interaction at a time, context captured whole
//!   at start and structurally absent outside it.
//! - [`layout`] — the pure [push-down](layout::calculate_layout) and
//!   [reorder](layout::calculate_reorder_layout) algorithms plus the
//!   first-fit [`reflow`](layout::reflow) they share with breakpoint
//!   derivation.
//! - [`animate`] — the FLIP animator, the view-transition gate and the
//!   strategy policy (pointer → FLIP, keyboard → View Transition).
//! - [`responsive`] — canonical-at-max-columns positions, per-breakpoint
//!   overrides, derivation and container-query CSS.
//! - [`harness`] — the plugin that wires an algorithm to the event bus,
//!   style layers and layout model, with versioned layout application.
//! - [`engine`] — [`init`] binds a host to a core, runs the plugin list
//!   and exposes the shared surface.

pub mod animate;
pub mod bus;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod harness;
pub mod headless;
pub mod host;
pub mod layout;
pub mod plugin;
pub mod providers;
pub mod responsive;
pub mod state_machine;
pub mod style;

pub use engine::{CoreOptions, GridCore, init, init_with_plugins};
pub use event::{GridEvent, GridEventKind, InputSource, InteractionDetail, ResizeHandle};
pub use geometry::{Cell, GridMetrics, Span};
pub use harness::Algorithm;
pub use peniko;
pub use peniko::kurbo;

pub mod prelude {
    pub use crate::animate::{FlipOptions, flip};
    pub use crate::engine::{CoreOptions, GridCore, init};
    pub use crate::event::{GridEvent, GridEventKind, InputSource, InteractionDetail, ResizeHandle};
    pub use crate::geometry::{Cell, GridMetrics, Span};
    pub use crate::harness::Algorithm;
    pub use crate::headless::HeadlessGrid;
    pub use crate::host::{GridHost, ItemIdentity, ItemState, Placement};
    pub use crate::responsive::{BreakpointCssOptions, LayoutModel};
    pub use crate::style::SelectorFormat;
}
