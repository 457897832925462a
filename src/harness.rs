//! The algorithm harness.
//!
//! The one component that performs layout work on behalf of an algorithm:
//! it listens to the drag/resize lifecycles on the bus, recomputes the
//! layout on every move from the positions captured at interaction start,
//! writes the result to the `preview` style layer (wrapped in a View
//! Transition according to the animation policy), and persists the final
//! positions to the layout model on commit.
//!
//! Every application carries a version number; the guarded write inside an
//! asynchronous View Transition is dropped when a newer version has been
//! applied in the meantime, so transitions finishing out of order cannot
//! roll the grid back.

use std::cell::{Cell as StdCell, RefCell};
use std::rc::{Rc, Weak};

use peniko::kurbo::Point;
use rustc_hash::FxHashMap;

use crate::animate::{self, FlipOptions, VIEW_TRANSITION_NONE, flip};
use crate::bus::{EventBus, EventHandler};
use crate::engine::GridCore;
use crate::event::{GridEvent, GridEventKind, InputSource, InteractionDetail, ResizeHandle};
use crate::geometry::{Cell, Span};
use crate::host::{CameraState, GridHost, ItemState};
use crate::layout::{
    Item, PushdownOptions, ReorderOptions, calculate_layout, calculate_reorder_layout,
};
use crate::plugin::{Plugin, Teardown};
use crate::providers::capability;
use crate::state_machine::{Action, InteractionKind, StartInteraction};
use crate::style::{PREVIEW_LAYER, css};

pub const ALGORITHM_HARNESS: &str = "algorithm-harness";

/// Which layout algorithm resolves a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Colliders are pushed downward and the rest compacts upward.
    #[default]
    PushDown,
    /// Items form a sequence; a move is an insertion plus a reflow.
    Reorder,
}

/// The built-in plugin wiring an algorithm to the bus, state machine,
/// style layers and layout model. Accepts an `"algorithm"` plugin option
/// overriding [`CoreOptions::algorithm`](crate::engine::CoreOptions).
pub fn algorithm_harness() -> Plugin {
    Plugin::new(ALGORITHM_HARNESS, |core, options| {
        let algorithm = options
            .get::<Algorithm>("algorithm")
            .unwrap_or(core.options.algorithm);
        Some(Harness::attach(core, algorithm))
    })
}

const LIFECYCLE: &[GridEventKind] = &[
    GridEventKind::DragStart,
    GridEventKind::DragMove,
    GridEventKind::DragEnd,
    GridEventKind::DragCancel,
    GridEventKind::ResizeStart,
    GridEventKind::ResizeMove,
    GridEventKind::ResizeEnd,
    GridEventKind::ResizeCancel,
    GridEventKind::CameraSettled,
];

#[derive(Debug, Clone)]
struct ActiveInteraction {
    kind: InteractionKind,
    item_id: String,
    source: InputSource,
    /// Column count captured at start; every recomputation and the final
    /// persist key off this, never the live count.
    columns: u32,
    originals: FxHashMap<String, Cell>,
    original_sizes: FxHashMap<String, Span>,
    /// Target parked while the camera is scrolling.
    pending_cell: Option<Cell>,
    size: Span,
}

struct Harness {
    core: Weak<GridCore>,
    algorithm: Algorithm,
    version: Rc<StdCell<u64>>,
    active: RefCell<Option<ActiveInteraction>>,
}

impl Harness {
    fn attach(core: &Rc<GridCore>, algorithm: Algorithm) -> Teardown {
        let harness = Rc::new(Harness {
            core: Rc::downgrade(core),
            algorithm,
            version: Rc::new(StdCell::new(0)),
            active: RefCell::new(None),
        });
        EventBus::subscribe(core.bus(), LIFECYCLE.iter().map(|kind| {
            let harness = harness.clone();
            let handler: EventHandler = Rc::new(move |event: &GridEvent| harness.on_event(event));
            (*kind, handler)
        }))
    }

    fn on_event(&self, event: &GridEvent) {
        let Some(core) = self.core.upgrade() else {
            return;
        };
        match event {
            GridEvent::DragStart(detail) => {
                self.start(&core, detail, InteractionKind::Drag);
            }
            GridEvent::DragMove { detail, .. } => self.moved(&core, detail, None),
            GridEvent::DragEnd(detail) => self.commit(&core, detail, None),
            GridEvent::DragCancel { item_id, .. } => self.cancel(&core, item_id),
            GridEvent::ResizeStart { detail, handle } => {
                self.start(&core, detail, InteractionKind::Resize { handle: *handle });
            }
            GridEvent::ResizeMove { detail, handle, .. } => {
                self.moved(&core, detail, Some(*handle));
            }
            GridEvent::ResizeEnd(detail) => self.commit(&core, detail, Some(detail.span)),
            GridEvent::ResizeCancel { item_id, .. } => self.cancel(&core, item_id),
            GridEvent::CameraSettled => self.camera_settled(&core),
            _ => {}
        }
    }

    fn start(&self, core: &Rc<GridCore>, detail: &InteractionDetail, kind: InteractionKind) {
        if self.active.borrow().is_some() {
            return;
        }
        let host = core.host().clone();
        let columns = core.grid_metrics().column_count().max(1);

        let mut originals = FxHashMap::default();
        let mut original_sizes = FxHashMap::default();
        for id in host.item_ids() {
            if let Some(placement) = host.item_placement(&id) {
                originals.insert(id.clone(), placement.cell);
                original_sizes.insert(id, placement.span);
            }
        }

        // Input plugins that already drove the machine leave it busy; when
        // they have not, the harness drives it so the captured context and
        // the policy booleans exist either way.
        if !core.state_machine().state().is_busy() {
            if core.selected_item().as_deref() != Some(detail.item_id.as_str()) {
                core.select(&detail.item_id);
            }
            core.state_machine()
                .dispatch(Action::StartInteraction(Box::new(StartInteraction {
                    kind,
                    source: detail.source,
                    item_id: detail.item_id.clone(),
                    column_count: columns,
                    original_positions: originals.clone(),
                    original_sizes: original_sizes.clone(),
                    target_cell: detail.cell,
                    size: detail.span,
                })));
        }

        let active = ActiveInteraction {
            kind,
            item_id: detail.item_id.clone(),
            source: detail.source,
            columns,
            originals,
            original_sizes,
            pending_cell: None,
            size: detail.span,
        };

        // Freeze the current arrangement into the preview layer so the
        // grid stays put when inline positioning is dropped below.
        let items = items_with_originals(&host, &active);
        self.apply_now(core, &items, columns);
        for id in host.item_ids() {
            if id != detail.item_id {
                host.clear_inline_layout(&id);
            }
        }

        *self.active.borrow_mut() = Some(active);
    }

    fn moved(&self, core: &Rc<GridCore>, detail: &InteractionDetail, handle: Option<ResizeHandle>) {
        {
            let mut active = self.active.borrow_mut();
            let Some(active) = active.as_mut() else {
                return;
            };
            if active.item_id != detail.item_id {
                return;
            }
            if handle.is_some() {
                active.size = detail.span;
            }
            // While the camera scrolls the grid is in motion under the
            // pointer; park the target and resume on camera-settled.
            if let Some(camera) = core.providers().get::<CameraState>(capability::CAMERA) {
                if camera.scrolling {
                    active.pending_cell = Some(detail.cell);
                    return;
                }
            }
        }
        self.recompute(core, detail.cell);
    }

    fn camera_settled(&self, core: &Rc<GridCore>) {
        let target = {
            let mut active = self.active.borrow_mut();
            let Some(active) = active.as_mut() else {
                return;
            };
            active.pending_cell.take().or_else(|| {
                // No parked move: resume from the cell under the dragged
                // element's center.
                core.host().item_rect(&active.item_id).and_then(|rect| {
                    core.cell_from_point(Point::new(
                        (rect.x0 + rect.x1) / 2.0,
                        (rect.y0 + rect.y1) / 2.0,
                    ))
                })
            })
        };
        if let Some(target) = target {
            self.recompute(core, target);
        }
    }

    fn recompute(&self, core: &Rc<GridCore>, target: Cell) {
        let Some(active) = self.active.borrow().clone() else {
            return;
        };
        core.state_machine().dispatch(Action::UpdateInteraction {
            target_cell: Some(target),
            size: matches!(active.kind, InteractionKind::Resize { .. }).then_some(active.size),
        });

        let host = core.host().clone();
        let items = items_with_originals(&host, &active);
        let layout = self.run_algorithm(&items, &active.item_id, target, active.columns);

        // Pointer interactions keep their element parked on the sentinel:
        // the transition animates everything else while the element itself
        // follows the pointer (and later the FLIP animator). Resizes park
        // the resized element the same way.
        let sentinel = (active.source == InputSource::Pointer
            || matches!(active.kind, InteractionKind::Resize { .. }))
        .then(|| active.item_id.clone());
        self.apply_animated(core, &layout, active.columns, sentinel);

        // Published after the move has been applied, so listeners reading
        // the preview layer observe the layout the cell belongs to.
        if self.algorithm == Algorithm::Reorder {
            if let Some(landed) = layout.iter().find(|item| item.id == active.item_id) {
                if landed.cell != target {
                    core.emit(GridEvent::DropPreview {
                        cell: landed.cell,
                        span: landed.span,
                    });
                }
            }
        }
    }

    fn commit(&self, core: &Rc<GridCore>, detail: &InteractionDetail, resized_to: Option<Span>) {
        let Some(active) = self.take_active_for(&detail.item_id) else {
            return;
        };
        let host = core.host().clone();
        core.state_machine().dispatch(Action::CommitInteraction);

        let mut working = active;
        if let Some(span) = resized_to {
            working.size = span;
        }
        let items = items_with_originals(&host, &working);
        let layout = self.run_algorithm(&items, &working.item_id, detail.cell, working.columns);

        // The element is done being excluded from captures.
        restore_transition_name(&*host, &working.item_id);

        match working.source {
            InputSource::Pointer => {
                // Other items are already settled; apply synchronously and
                // hand the dropped element to the FLIP animator.
                let first = host.item_rect(&working.item_id);
                self.apply_now(core, &layout, working.columns);
                persist_layout(core, &layout, &working, resized_to);
                core.styles().clear(PREVIEW_LAYER);
                core.styles().commit(&*host);

                host.set_item_state(&working.item_id, ItemState::DROPPING, true);
                if let Some(first) = first {
                    let finish_host = host.clone();
                    let dropped = working.item_id.clone();
                    flip(
                        &*host,
                        &working.item_id,
                        first,
                        FlipOptions::default().on_finish(move || {
                            finish_host.set_item_state(&dropped, ItemState::DROPPING, false);
                        }),
                    );
                } else {
                    host.set_item_state(&working.item_id, ItemState::DROPPING, false);
                }
                core.state_machine().dispatch(Action::FinishCommit);
            }
            InputSource::Keyboard => {
                let version = self.bump();
                let probe = self.version.clone();
                let css = css::layout_css(&core.options.selector, &layout, working.columns);
                let update_core = core.clone();
                let update = move || {
                    if probe.get() != version {
                        return;
                    }
                    let host = update_core.host().clone();
                    update_core.styles().set(PREVIEW_LAYER, css);
                    update_core.styles().commit(&*host);
                    persist_layout(&update_core, &layout, &working, resized_to);
                    update_core.styles().clear(PREVIEW_LAYER);
                    update_core.styles().commit(&*host);
                };
                let done_core = core.clone();
                let done = move || {
                    done_core.state_machine().dispatch(Action::FinishCommit);
                };
                animate::with_view_transition(&*host, Box::new(update), Box::new(done));
            }
        }
    }

    fn cancel(&self, core: &Rc<GridCore>, item_id: &str) {
        let Some(active) = self.take_active_for(item_id) else {
            return;
        };
        let host = core.host().clone();
        core.state_machine().dispatch(Action::CancelInteraction);
        restore_transition_name(&*host, item_id);

        // Original positions come straight back, no transition.
        let items: Vec<Item> = host
            .item_ids()
            .into_iter()
            .filter_map(|id| {
                let cell = active.originals.get(&id)?;
                let span = active.original_sizes.get(&id).copied().unwrap_or_default();
                Some(Item::new(id, *cell, span))
            })
            .collect();
        self.apply_now(core, &items, active.columns);
    }

    fn take_active_for(&self, item_id: &str) -> Option<ActiveInteraction> {
        let mut slot = self.active.borrow_mut();
        if slot.as_ref().is_some_and(|active| active.item_id == item_id) {
            slot.take()
        } else {
            None
        }
    }

    fn run_algorithm(&self, items: &[Item], moved: &str, target: Cell, columns: u32) -> Vec<Item> {
        match self.algorithm {
            Algorithm::PushDown => {
                calculate_layout(items, moved, target, &PushdownOptions::default())
            }
            Algorithm::Reorder => {
                calculate_reorder_layout(items, moved, target, &ReorderOptions { columns })
            }
        }
    }

    fn bump(&self) -> u64 {
        let version = self.version.get() + 1;
        self.version.set(version);
        version
    }

    /// Immediate, unanimated application.
    fn apply_now(&self, core: &Rc<GridCore>, items: &[Item], columns: u32) {
        self.bump();
        let css = css::layout_css(&core.options.selector, items, columns);
        core.styles().set(PREVIEW_LAYER, css);
        core.styles().commit(&**core.host());
    }

    /// Versioned application wrapped in a View Transition; a stale version
    /// is dropped instead of written.
    fn apply_animated(
        &self,
        core: &Rc<GridCore>,
        items: &[Item],
        columns: u32,
        sentinel_item: Option<String>,
    ) {
        let version = self.bump();
        let host = core.host().clone();
        if let Some(item_id) = &sentinel_item {
            host.set_view_transition_name(item_id, Some(VIEW_TRANSITION_NONE));
        }
        let css = css::layout_css(&core.options.selector, items, columns);
        let probe = self.version.clone();
        let update_core = core.clone();
        let update = move || {
            if probe.get() != version {
                return;
            }
            update_core.styles().set(PREVIEW_LAYER, css);
            update_core.styles().commit(&**update_core.host());
        };
        animate::with_view_transition(&*host, Box::new(update), Box::new(|| {}));
    }
}

fn items_with_originals(host: &Rc<dyn GridHost>, active: &ActiveInteraction) -> Vec<Item> {
    host.item_ids()
        .into_iter()
        .filter_map(|id| {
            let placement = host.item_placement(&id)?;
            let (cell, span) = if id == active.item_id {
                // The interacting item carries its live cell plus the
                // in-progress size; everyone else is pinned to where they
                // were when the interaction began.
                (placement.cell, active.size)
            } else {
                (
                    active.originals.get(&id).copied().unwrap_or(placement.cell),
                    active
                        .original_sizes
                        .get(&id)
                        .copied()
                        .unwrap_or(placement.span),
                )
            };
            Some(Item::new(id, cell, span))
        })
        .collect()
}

fn restore_transition_name(host: &dyn GridHost, item_id: &str) {
    let name = animate::view_transition_name(&host.item_identity(item_id));
    host.set_view_transition_name(item_id, name.as_deref());
}

fn persist_layout(
    core: &Rc<GridCore>,
    layout: &[Item],
    active: &ActiveInteraction,
    resized_to: Option<Span>,
) {
    let Some(model) = core.layout_model() else {
        return;
    };
    let positions: FxHashMap<String, Cell> = layout
        .iter()
        .map(|item| (item.id.clone(), item.cell))
        .collect();
    // Positions first, then the size, so no observer sees a transient
    // overlapping arrangement.
    model.save_layout(active.columns, positions);
    if let Some(span) = resized_to {
        model.update_item_size(&active.item_id, span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CoreOptions, init};
    use crate::headless::HeadlessGrid;
    use crate::responsive::{BreakpointCssOptions, LayoutModel, ModelChange};
    use crate::state_machine::Phase;

    fn detail(item: &str, cell: Cell, source: InputSource) -> InteractionDetail {
        InteractionDetail {
            item_id: item.to_string(),
            cell,
            span: Span::new(1, 1),
            source,
        }
    }

    fn fixture() -> (Rc<HeadlessGrid>, Rc<LayoutModel>) {
        fixture_with(|host| host)
    }

    fn fixture_with(
        configure: impl FnOnce(HeadlessGrid) -> HeadlessGrid,
    ) -> (Rc<HeadlessGrid>, Rc<LayoutModel>) {
        let host = configure(
            HeadlessGrid::with_tracks(4, 4, 100.0, 10.0)
                .with_item("a", Cell::new(1, 1), Span::new(1, 1))
                .with_item("b", Cell::new(2, 1), Span::new(1, 1))
                .with_item("c", Cell::new(1, 2), Span::new(1, 1)),
        );
        let model = LayoutModel::new(4, 1);
        model.define_item("a", Span::new(1, 1), Cell::new(1, 1));
        model.define_item("b", Span::new(1, 1), Cell::new(2, 1));
        model.define_item("c", Span::new(1, 1), Cell::new(1, 2));
        (Rc::new(host), model)
    }

    fn options(model: &Rc<LayoutModel>) -> CoreOptions {
        CoreOptions::default()
            .layout_model(model.clone())
            .responsive_css(BreakpointCssOptions {
                cell_size: 100.0,
                gap: 10.0,
                ..BreakpointCssOptions::default()
            })
    }

    #[test]
    fn pointer_drag_lifecycle_persists_and_clears_preview() {
        let (host, model) = fixture();
        let core = init(host.clone(), options(&model));

        core.emit(GridEvent::DragStart(detail(
            "a",
            Cell::new(1, 1),
            InputSource::Pointer,
        )));
        // The preview layer now freezes the starting arrangement and
        // inline styles are gone from everything but the dragged item.
        assert!(
            core.styles()
                .get(PREVIEW_LAYER)
                .unwrap()
                .contains("#a { grid-column: 1 / span 1; grid-row: 1 / span 1; }")
        );
        assert!(!host.inline_cleared().contains(&"a".to_string()));
        assert!(host.inline_cleared().contains(&"b".to_string()));
        assert!(core.state_machine().state().is_interacting());

        core.emit(GridEvent::DragMove {
            detail: detail("a", Cell::new(2, 2), InputSource::Pointer),
            point: Point::new(150.0, 150.0),
        });
        // Mid-drag the dragged element is parked on the sentinel name.
        assert_eq!(
            host.view_transition_name_of("a").as_deref(),
            Some(VIEW_TRANSITION_NONE)
        );
        assert!(
            core.styles()
                .get(PREVIEW_LAYER)
                .unwrap()
                .contains("#a { grid-column: 2 / span 1; grid-row: 2 / span 1; }")
        );

        core.emit(GridEvent::DragEnd(detail(
            "a",
            Cell::new(2, 2),
            InputSource::Pointer,
        )));
        assert_eq!(
            model.layout_for_columns(4).get("a"),
            Some(&Cell::new(2, 2))
        );
        assert_eq!(core.styles().get(PREVIEW_LAYER).as_deref(), Some(""));
        // Final positions survive through the regenerated base layer.
        assert!(host.stylesheet_text().contains("#a { grid-column: 2 / span 1"));
        assert_eq!(host.view_transition_name_of("a"), None);
        assert!(!host.state_of("a").contains(ItemState::DROPPING));
        assert_eq!(core.state_machine().state().phase, Phase::Selected {
            item_id: "a".into()
        });
    }

    #[test]
    fn keyboard_drag_commits_through_a_view_transition() {
        let (host, model) = fixture_with(|host| host.with_view_transitions(true));
        let core = init(host.clone(), options(&model));

        core.emit(GridEvent::DragStart(detail(
            "b",
            Cell::new(2, 1),
            InputSource::Keyboard,
        )));
        core.emit(GridEvent::DragMove {
            detail: detail("b", Cell::new(1, 1), InputSource::Keyboard),
            point: Point::new(0.0, 0.0),
        });
        core.emit(GridEvent::DragEnd(detail(
            "b",
            Cell::new(1, 1),
            InputSource::Keyboard,
        )));

        // Nothing persisted until the transition's callback runs.
        assert_eq!(
            model.layout_for_columns(4).get("b"),
            Some(&Cell::new(2, 1))
        );
        assert!(core.state_machine().state().is_busy());

        host.resolve_transitions();
        assert_eq!(
            model.layout_for_columns(4).get("b"),
            Some(&Cell::new(1, 1))
        );
        assert_eq!(core.state_machine().state().phase, Phase::Selected {
            item_id: "b".into()
        });
    }

    #[test]
    fn later_version_wins_over_a_late_transition() {
        let (host, model) = fixture_with(|host| host.with_view_transitions(true));
        let core = init(host.clone(), options(&model));

        core.emit(GridEvent::DragStart(detail(
            "a",
            Cell::new(1, 1),
            InputSource::Pointer,
        )));
        core.emit(GridEvent::DragMove {
            detail: detail("a", Cell::new(2, 1), InputSource::Pointer),
            point: Point::new(150.0, 50.0),
        });
        core.emit(GridEvent::DragMove {
            detail: detail("a", Cell::new(3, 2), InputSource::Pointer),
            point: Point::new(260.0, 150.0),
        });
        assert_eq!(host.pending_transitions(), 2);

        // Both transitions settle late, in order; the first one's write is
        // stale by then and must be dropped.
        host.resolve_transitions();
        let preview = core.styles().get(PREVIEW_LAYER).unwrap();
        assert!(preview.contains("#a { grid-column: 3 / span 1; grid-row: 2 / span 1; }"));
        assert!(!preview.contains("#a { grid-column: 2 / span 1; grid-row: 1 / span 1; }"));
    }

    #[test]
    fn stale_transition_cannot_overwrite_a_commit() {
        let (host, model) = fixture_with(|host| host.with_view_transitions(true));
        let core = init(host.clone(), options(&model));

        core.emit(GridEvent::DragStart(detail(
            "a",
            Cell::new(1, 1),
            InputSource::Pointer,
        )));
        core.emit(GridEvent::DragMove {
            detail: detail("a", Cell::new(2, 1), InputSource::Pointer),
            point: Point::new(150.0, 50.0),
        });
        core.emit(GridEvent::DragEnd(detail(
            "a",
            Cell::new(3, 1),
            InputSource::Pointer,
        )));

        let committed = host.stylesheet_text();
        assert!(committed.contains("#a { grid-column: 3 / span 1"));

        // The drag-move transition resolves after the commit.
        host.resolve_transitions();
        assert_eq!(host.stylesheet_text(), committed);
    }

    #[test]
    fn camera_scroll_parks_moves_until_settled() {
        let (host, model) = fixture();
        let core = init(host.clone(), options(&model));
        let scrolling = Rc::new(StdCell::new(true));
        let camera = scrolling.clone();
        core.providers().register(capability::CAMERA, move || {
            Box::new(CameraState {
                scrolling: camera.get(),
            })
        });

        core.emit(GridEvent::DragStart(detail(
            "a",
            Cell::new(1, 1),
            InputSource::Pointer,
        )));
        let before = core.styles().get(PREVIEW_LAYER).unwrap();
        core.emit(GridEvent::DragMove {
            detail: detail("a", Cell::new(3, 3), InputSource::Pointer),
            point: Point::new(260.0, 260.0),
        });
        // Parked: no recomputation happened.
        assert_eq!(core.styles().get(PREVIEW_LAYER).unwrap(), before);

        scrolling.set(false);
        core.emit(GridEvent::CameraSettled);
        assert!(
            core.styles()
                .get(PREVIEW_LAYER)
                .unwrap()
                .contains("#a { grid-column: 3 / span 1; grid-row: 3 / span 1; }")
        );
    }

    #[test]
    fn cancel_restores_originals_without_a_transition() {
        let (host, model) = fixture();
        let core = init(host.clone(), options(&model));

        core.emit(GridEvent::DragStart(detail(
            "c",
            Cell::new(1, 2),
            InputSource::Pointer,
        )));
        core.emit(GridEvent::DragMove {
            detail: detail("c", Cell::new(2, 1), InputSource::Pointer),
            point: Point::new(150.0, 50.0),
        });
        core.emit(GridEvent::DragCancel {
            item_id: "c".to_string(),
            source: InputSource::Pointer,
        });

        let preview = core.styles().get(PREVIEW_LAYER).unwrap();
        assert!(preview.contains("#c { grid-column: 1 / span 1; grid-row: 2 / span 1; }"));
        assert_eq!(
            model.layout_for_columns(4).get("c"),
            Some(&Cell::new(1, 2))
        );
        assert_eq!(core.state_machine().state().phase, Phase::Selected {
            item_id: "c".into()
        });
    }

    #[test]
    fn resize_commit_saves_positions_before_size() {
        let (host, model) = fixture();
        let core = init(host.clone(), options(&model));
        let order = Rc::new(RefCell::new(Vec::new()));
        let seen = order.clone();
        model.subscribe(move |change| {
            seen.borrow_mut().push(match change {
                ModelChange::Layout { .. } => "layout",
                ModelChange::ItemSize { .. } => "size",
                ModelChange::Definitions => "definitions",
            });
        });

        let grown = InteractionDetail {
            item_id: "a".to_string(),
            cell: Cell::new(1, 1),
            span: Span::new(2, 1),
            source: InputSource::Pointer,
        };
        core.emit(GridEvent::ResizeStart {
            detail: detail("a", Cell::new(1, 1), InputSource::Pointer),
            handle: ResizeHandle::E,
        });
        core.emit(GridEvent::ResizeMove {
            detail: grown.clone(),
            handle: ResizeHandle::E,
            anchor_cell: Cell::new(1, 1),
            start_cell: Cell::new(1, 1),
        });
        // Growing a to 2 wide pushes b out of row 1.
        assert!(
            core.styles()
                .get(PREVIEW_LAYER)
                .unwrap()
                .contains("#a { grid-column: 1 / span 2")
        );
        core.emit(GridEvent::ResizeEnd(grown));

        assert_eq!(model.item_size("a"), Some(Span::new(2, 1)));
        assert_eq!(*order.borrow(), vec!["layout", "size"]);
        let positions = model.layout_for_columns(4);
        assert_eq!(positions.get("a"), Some(&Cell::new(1, 1)));
        assert_ne!(positions.get("b"), Some(&Cell::new(2, 1)));
    }

    #[test]
    fn reorder_publishes_the_actual_landing_cell() {
        let (host, model) = fixture();
        let core = init(
            host.clone(),
            options(&model).algorithm(Algorithm::Reorder),
        );

        core.emit(GridEvent::DragStart(detail(
            "a",
            Cell::new(1, 1),
            InputSource::Pointer,
        )));
        // Far past the end of the sequence: reorder appends instead.
        core.emit(GridEvent::DragMove {
            detail: detail("a", Cell::new(4, 4), InputSource::Pointer),
            point: Point::new(380.0, 380.0),
        });

        let previews: Vec<_> = host
            .dispatched_events()
            .into_iter()
            .filter(|(_, kind)| *kind == GridEventKind::DropPreview)
            .collect();
        assert_eq!(previews.len(), 1);
    }

    #[test]
    fn events_for_other_items_are_ignored_mid_interaction() {
        let (host, model) = fixture();
        let core = init(host.clone(), options(&model));
        core.emit(GridEvent::DragStart(detail(
            "a",
            Cell::new(1, 1),
            InputSource::Pointer,
        )));
        let before = core.styles().get(PREVIEW_LAYER).unwrap();
        core.emit(GridEvent::DragMove {
            detail: detail("b", Cell::new(3, 3), InputSource::Pointer),
            point: Point::new(260.0, 260.0),
        });
        assert_eq!(core.styles().get(PREVIEW_LAYER).unwrap(), before);
        core.emit(GridEvent::DragEnd(detail(
            "b",
            Cell::new(3, 3),
            InputSource::Pointer,
        )));
        assert!(core.state_machine().state().is_interacting());
    }
}
