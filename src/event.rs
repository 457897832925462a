//! The event vocabulary exchanged between the core and its plugins.
//!
//! Every event carries a frozen detail shape and maps to a stable
//! kebab-case name; a DOM host prepends the configured namespace prefix
//! when re-dispatching an event as a `CustomEvent` on the grid element.

use peniko::kurbo::Point;

use crate::geometry::{Cell, Span};

/// Where an interaction originates from. Pointer interactions animate with
/// FLIP, keyboard interactions with View Transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputSource {
    Pointer,
    Keyboard,
}

/// The resize affordance that was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

/// The common `{item, cell, colspan, rowspan, source}` detail shared by the
/// drag and resize lifecycles.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionDetail {
    pub item_id: String,
    pub cell: Cell,
    pub span: Span,
    pub source: InputSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// An item became the selection.
    Select { item_id: String },
    /// Selection ended; the item may already be gone.
    Deselect { item_id: Option<String> },
    DragStart(InteractionDetail),
    /// A drag progressed; `point` is the pointer position in viewport
    /// coordinates (keyboard drags report the target cell's origin).
    DragMove {
        detail: InteractionDetail,
        point: Point,
    },
    DragEnd(InteractionDetail),
    DragCancel {
        item_id: String,
        source: InputSource,
    },
    /// Published by the reorder algorithm when the actual landing cell
    /// differs from the cell under the cursor.
    DropPreview { cell: Cell, span: Span },
    ResizeStart {
        detail: InteractionDetail,
        handle: ResizeHandle,
    },
    ResizeMove {
        detail: InteractionDetail,
        handle: ResizeHandle,
        /// The corner that stays put while the opposite edge moves.
        anchor_cell: Cell,
        /// The item's cell when the resize began.
        start_cell: Cell,
    },
    ResizeEnd(InteractionDetail),
    ResizeCancel {
        item_id: String,
        source: InputSource,
    },
    /// The responsive observer noticed the container crossing a breakpoint.
    ColumnCountChange { previous: u32, current: u32 },
    /// The auto-scroll camera finished a programmatic scroll.
    CameraSettled,
}

/// Discriminant for [`GridEvent`], used as the subscription key and as the
/// stable wire name (`Display` yields the kebab-case event name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum GridEventKind {
    Select,
    Deselect,
    DragStart,
    DragMove,
    DragEnd,
    DragCancel,
    DropPreview,
    ResizeStart,
    ResizeMove,
    ResizeEnd,
    ResizeCancel,
    ColumnCountChange,
    CameraSettled,
}

impl GridEvent {
    pub fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::Select { .. } => GridEventKind::Select,
            GridEvent::Deselect { .. } => GridEventKind::Deselect,
            GridEvent::DragStart(_) => GridEventKind::DragStart,
            GridEvent::DragMove { .. } => GridEventKind::DragMove,
            GridEvent::DragEnd(_) => GridEventKind::DragEnd,
            GridEvent::DragCancel { .. } => GridEventKind::DragCancel,
            GridEvent::DropPreview { .. } => GridEventKind::DropPreview,
            GridEvent::ResizeStart { .. } => GridEventKind::ResizeStart,
            GridEvent::ResizeMove { .. } => GridEventKind::ResizeMove,
            GridEvent::ResizeEnd(_) => GridEventKind::ResizeEnd,
            GridEvent::ResizeCancel { .. } => GridEventKind::ResizeCancel,
            GridEvent::ColumnCountChange { .. } => GridEventKind::ColumnCountChange,
            GridEvent::CameraSettled => GridEventKind::CameraSettled,
        }
    }

    /// The item the event concerns, when it concerns one.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            GridEvent::Select { item_id } => Some(item_id),
            GridEvent::Deselect { item_id } => item_id.as_deref(),
            GridEvent::DragStart(detail)
            | GridEvent::DragMove { detail, .. }
            | GridEvent::DragEnd(detail)
            | GridEvent::ResizeStart { detail, .. }
            | GridEvent::ResizeMove { detail, .. }
            | GridEvent::ResizeEnd(detail) => Some(&detail.item_id),
            GridEvent::DragCancel { item_id, .. } | GridEvent::ResizeCancel { item_id, .. } => {
                Some(item_id)
            }
            GridEvent::DropPreview { .. }
            | GridEvent::ColumnCountChange { .. }
            | GridEvent::CameraSettled => None,
        }
    }
}

/// Builds the namespaced DOM event name, e.g. `gridiot:drag-start`.
pub fn event_name(prefix: &str, kind: GridEventKind) -> String {
    format!("{prefix}{kind}")
}
