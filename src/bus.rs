//! Synchronous event bus scoped to one grid binding.
//!
//! Listeners are keyed by [`GridEventKind`] and invoked in registration
//! order within the current task; there is no queueing or reordering.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::event::{GridEvent, GridEventKind};
use crate::plugin::Teardown;

pub type EventHandler = Rc<dyn Fn(&GridEvent)>;

/// Handle for removing a single listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<FxHashMap<GridEventKind, Vec<(u64, EventHandler)>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, kind: GridEventKind, handler: impl Fn(&GridEvent) + 'static) -> ListenerId {
        self.on_handler(kind, Rc::new(handler))
    }

    pub fn on_handler(&self, kind: GridEventKind, handler: EventHandler) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, handler));
        ListenerId(id)
    }

    pub fn off(&self, id: ListenerId) {
        for handlers in self.listeners.borrow_mut().values_mut() {
            handlers.retain(|(handler_id, _)| *handler_id != id.0);
        }
    }

    /// Dispatches `event` to every listener registered for its kind.
    ///
    /// The listener list is snapshotted first so handlers may subscribe or
    /// unsubscribe while the event is being delivered.
    pub fn emit(&self, event: &GridEvent) {
        let handlers: Vec<EventHandler> = self
            .listeners
            .borrow()
            .get(&event.kind())
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(event);
        }
    }

    /// Registers a batch of handlers and returns a single teardown that
    /// removes them all.
    pub fn subscribe(
        bus: &Rc<Self>,
        handlers: impl IntoIterator<Item = (GridEventKind, EventHandler)>,
    ) -> Teardown {
        let ids: SmallVec<[ListenerId; 8]> = handlers
            .into_iter()
            .map(|(kind, handler)| bus.on_handler(kind, handler))
            .collect();
        let bus = Rc::clone(bus);
        Box::new(move || {
            for id in ids {
                bus.off(id);
            }
        })
    }
}
