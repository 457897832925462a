//! The interaction state machine.
//!
//! A reducer over a small phase set enforcing one interaction at a time.
//! The [`InteractionContext`] is captured whole at `StartInteraction` and is
//! structurally absent outside the `Interacting`/`Committing` phases, so
//! there is no way to observe a stale context from `Idle` or `Selected`.
//! Rejected actions leave the state untouched and subscribers unnotified.

use std::cell::{Cell as StdCell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::event::{InputSource, ResizeHandle};
use crate::geometry::{Cell, Span};

/// What the interaction does to the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Drag,
    Resize { handle: ResizeHandle },
}

/// Captured once at interaction start; only `target_cell` and `size` change
/// afterwards, and only through [`Action::UpdateInteraction`].
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionContext {
    pub kind: InteractionKind,
    pub source: InputSource,
    pub item_id: String,
    /// Column count at interaction start. Never re-read mid-interaction, so
    /// a breakpoint crossing cannot shear an in-flight layout.
    pub column_count: u32,
    pub original_positions: FxHashMap<String, Cell>,
    pub original_sizes: FxHashMap<String, Span>,
    pub target_cell: Cell,
    pub size: Span,
    /// Pointer interactions hand the dragged item to the FLIP animator.
    pub use_flip: bool,
    /// Keyboard interactions animate through the View Transitions API.
    pub use_view_transition: bool,
}

/// Everything needed to enter the `Interacting` phase.
#[derive(Debug, Clone)]
pub struct StartInteraction {
    pub kind: InteractionKind,
    pub source: InputSource,
    pub item_id: String,
    pub column_count: u32,
    pub original_positions: FxHashMap<String, Cell>,
    pub original_sizes: FxHashMap<String, Span>,
    pub target_cell: Cell,
    pub size: Span,
}

#[derive(Debug, Clone)]
pub enum Action {
    Select { item_id: String },
    Deselect,
    StartInteraction(Box<StartInteraction>),
    UpdateInteraction {
        target_cell: Option<Cell>,
        size: Option<Span>,
    },
    CommitInteraction,
    FinishCommit,
    CancelInteraction,
    SetKeyboardMode(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Selected {
        item_id: String,
    },
    Interacting {
        selected: String,
        context: InteractionContext,
    },
    Committing {
        selected: String,
        context: InteractionContext,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreState {
    pub phase: Phase,
    pub keyboard_mode: bool,
}

impl Default for CoreState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            keyboard_mode: false,
        }
    }
}

impl CoreState {
    pub fn selected_item(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Selected { item_id } => Some(item_id),
            Phase::Interacting { selected, .. } | Phase::Committing { selected, .. } => {
                Some(selected)
            }
        }
    }

    pub fn interaction(&self) -> Option<&InteractionContext> {
        match &self.phase {
            Phase::Interacting { context, .. } | Phase::Committing { context, .. } => Some(context),
            Phase::Idle | Phase::Selected { .. } => None,
        }
    }

    pub fn is_interacting(&self) -> bool {
        matches!(self.phase, Phase::Interacting { .. })
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::Interacting { .. } | Phase::Committing { .. }
        )
    }
}

type Subscriber = Rc<dyn Fn(&CoreState, &Action)>;

/// Reducer plus subscriber list. Shared behind an `Rc` between the engine
/// and its plugins.
#[derive(Default)]
pub struct StateMachine {
    state: RefCell<CoreState>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_subscriber: StdCell<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CoreState {
        self.state.borrow().clone()
    }

    pub fn selected_item(&self) -> Option<String> {
        self.state.borrow().selected_item().map(str::to_owned)
    }

    pub fn subscribe(&self, subscriber: impl Fn(&CoreState, &Action) + 'static) -> SubscriberId {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        self.subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        SubscriberId(id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers
            .borrow_mut()
            .retain(|(subscriber_id, _)| *subscriber_id != id.0);
    }

    /// Runs the reducer. Returns `false` when the action does not apply to
    /// the current phase; the state is then untouched and subscribers are
    /// not notified.
    pub fn dispatch(&self, action: Action) -> bool {
        let accepted = {
            let mut state = self.state.borrow_mut();
            reduce(&mut state, &action)
        };
        if accepted {
            let state = self.state();
            let subscribers: Vec<Subscriber> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, s)| s.clone())
                .collect();
            for subscriber in subscribers {
                subscriber(&state, &action);
            }
        }
        accepted
    }
}

fn reduce(state: &mut CoreState, action: &Action) -> bool {
    match action {
        Action::SetKeyboardMode(active) => {
            state.keyboard_mode = *active;
            true
        }
        Action::Select { item_id } => match &state.phase {
            Phase::Idle | Phase::Selected { .. } => {
                state.phase = Phase::Selected {
                    item_id: item_id.clone(),
                };
                true
            }
            Phase::Interacting { .. } | Phase::Committing { .. } => false,
        },
        Action::Deselect => match &state.phase {
            Phase::Selected { .. } => {
                state.phase = Phase::Idle;
                true
            }
            _ => false,
        },
        Action::StartInteraction(start) => match std::mem::replace(&mut state.phase, Phase::Idle) {
            Phase::Selected { item_id } => {
                let start = (**start).clone();
                state.phase = Phase::Interacting {
                    selected: item_id,
                    context: InteractionContext {
                        use_flip: start.source == InputSource::Pointer,
                        use_view_transition: start.source == InputSource::Keyboard,
                        kind: start.kind,
                        source: start.source,
                        item_id: start.item_id,
                        column_count: start.column_count,
                        original_positions: start.original_positions,
                        original_sizes: start.original_sizes,
                        target_cell: start.target_cell,
                        size: start.size,
                    },
                };
                true
            }
            other => {
                state.phase = other;
                false
            }
        },
        Action::UpdateInteraction { target_cell, size } => match &mut state.phase {
            Phase::Interacting { context, .. } => {
                if let Some(cell) = target_cell {
                    context.target_cell = *cell;
                }
                if let Some(size) = size {
                    context.size = *size;
                }
                true
            }
            _ => false,
        },
        Action::CommitInteraction => match std::mem::replace(&mut state.phase, Phase::Idle) {
            Phase::Interacting { selected, context } => {
                state.phase = Phase::Committing { selected, context };
                true
            }
            other => {
                state.phase = other;
                false
            }
        },
        Action::FinishCommit => match std::mem::replace(&mut state.phase, Phase::Idle) {
            Phase::Committing { selected, .. } => {
                state.phase = Phase::Selected { item_id: selected };
                true
            }
            other => {
                state.phase = other;
                false
            }
        },
        Action::CancelInteraction => match std::mem::replace(&mut state.phase, Phase::Idle) {
            Phase::Interacting { selected, .. } => {
                state.phase = Phase::Selected { item_id: selected };
                true
            }
            other => {
                state.phase = other;
                false
            }
        },
    }
}
