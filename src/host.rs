//! The seam between the engine and whatever owns the actual grid element.
//!
//! A browser integration implements [`GridHost`] over real DOM (computed
//! style reads, attribute writes, `document.startViewTransition`); the
//! crate's own [`HeadlessGrid`](crate::headless::HeadlessGrid) implements
//! it over plain state for tests. Methods with default bodies are the
//! optional surface: a minimal host only has to answer geometry queries
//! and accept stylesheet writes.

use bitflags::bitflags;
use peniko::kurbo::Rect;

use crate::animate::FlipSpec;
use crate::event::GridEvent;
use crate::geometry::{Cell, GridMetrics, Span};

/// An item's current grid position as read from computed style plus its
/// span attributes (spans default to 1 on the host side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub cell: Cell,
    pub span: Span,
}

/// The identity sources a view-transition name is resolved from, in
/// precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemIdentity {
    /// The `--item-id` custom property.
    pub custom_property: Option<String>,
    /// The element's `id` attribute.
    pub element_id: Option<String>,
    /// The dataset id (`data-id`).
    pub dataset_id: Option<String>,
}

bitflags! {
    /// Interaction states reflected onto items as data attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ItemState: u8 {
        const SELECTED = 1;
        const DRAGGING = 2;
        const RESIZING = 4;
        const DROPPING = 8;
    }
}

impl ItemState {
    /// The kebab-case suffix used in the state's data attribute.
    pub fn attribute_suffix(&self) -> &'static str {
        match *self {
            ItemState::SELECTED => "selected",
            ItemState::DRAGGING => "dragging",
            ItemState::RESIZING => "resizing",
            ItemState::DROPPING => "dropping",
            _ => "state",
        }
    }
}

/// Attribute naming for DOM hosts. Everything hangs off one namespace so
/// several grids with different namespaces can share a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomContract {
    pub namespace: String,
}

impl Default for DomContract {
    fn default() -> Self {
        Self {
            namespace: "gridiot".to_string(),
        }
    }
}

impl DomContract {
    /// The attribute marking an element as a grid item, e.g.
    /// `data-gridiot-item`.
    pub fn item_attribute(&self) -> String {
        format!("data-{}-item", self.namespace)
    }

    pub fn colspan_attribute(&self) -> String {
        format!("data-{}-colspan", self.namespace)
    }

    pub fn rowspan_attribute(&self) -> String {
        format!("data-{}-rowspan", self.namespace)
    }

    /// The attribute toggled for an interaction state, e.g.
    /// `data-gridiot-dragging`.
    pub fn state_attribute(&self, state: ItemState) -> String {
        format!("data-{}-{}", self.namespace, state.attribute_suffix())
    }
}

/// State published under the `camera` capability by an auto-scroll
/// collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraState {
    /// True while a programmatic scroll is in flight; layout recomputation
    /// pauses until `camera-settled`.
    pub scrolling: bool,
}

pub trait GridHost {
    /// Pixel-resolved track data for the grid container.
    fn grid_metrics(&self) -> GridMetrics;

    /// Ids of the grid's items, in DOM order.
    fn item_ids(&self) -> Vec<String>;

    fn item_placement(&self, id: &str) -> Option<Placement>;

    /// The item's current bounding rectangle, in viewport coordinates.
    fn item_rect(&self, id: &str) -> Option<Rect>;

    fn item_identity(&self, id: &str) -> ItemIdentity {
        let _ = id;
        ItemIdentity::default()
    }

    fn set_item_state(&self, id: &str, state: ItemState, on: bool) {
        let _ = (id, state, on);
    }

    /// Sets (`Some`, possibly empty) or removes (`None`) an attribute.
    fn set_item_attribute(&self, id: &str, name: &str, value: Option<&str>) {
        let _ = (id, name, value);
    }

    /// Drops inline `grid-column`/`grid-row` styles so injected CSS
    /// governs the item.
    fn clear_inline_layout(&self, id: &str) {
        let _ = id;
    }

    fn set_view_transition_name(&self, id: &str, name: Option<&str>) {
        let _ = (id, name);
    }

    /// Current text of the managed style element; captured as the `base`
    /// layer at engine start.
    fn stylesheet(&self) -> String {
        String::new()
    }

    fn set_stylesheet(&self, css: &str);

    fn supports_view_transitions(&self) -> bool {
        false
    }

    /// Runs `update` inside a View Transition and `done` once it settles.
    /// The default is the no-API fallback: both run synchronously. Call
    /// sites go through
    /// [`animate::with_view_transition`](crate::animate::with_view_transition)
    /// rather than this method.
    fn start_view_transition(&self, update: Box<dyn FnOnce()>, done: Box<dyn FnOnce()>) {
        update();
        done();
    }

    /// Plays a FLIP transform. A DOM host forwards to the Web Animations
    /// API; the default discards the spec (the caller still gets the
    /// sampled-animation handle).
    fn play_flip(&self, id: &str, spec: &FlipSpec) {
        let _ = (id, spec);
    }

    /// Mirrors a bus event outward, e.g. as a bubbling DOM `CustomEvent`
    /// under the given namespaced name.
    fn dispatch_event(&self, name: &str, event: &GridEvent) {
        let _ = (name, event);
    }

    /// Host-provided diagnostics sink.
    fn log(&self, message: &str) {
        let _ = message;
    }
}
