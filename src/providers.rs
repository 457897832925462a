//! One-slot-per-capability read-through registry.
//!
//! Plugins publish inter-plugin state by registering a producer under a
//! capability name; readers get a freshly produced value on every lookup,
//! so there is no stale snapshot to invalidate.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Capability names used by the built-in plugins and collaborators.
pub mod capability {
    /// Produces the current [`CoreState`](crate::state_machine::CoreState).
    pub const STATE: &str = "state";
    /// Produces a [`CameraState`](crate::host::CameraState) while an
    /// auto-scroll collaborator is attached.
    pub const CAMERA: &str = "camera";
    /// Produces the shared [`LayoutModel`](crate::responsive::LayoutModel).
    pub const LAYOUT: &str = "layout";
    /// Produces the in-progress resize geometry, when a resize input
    /// plugin is attached.
    pub const RESIZE: &str = "resize";
}

type Producer = Rc<dyn Fn() -> Box<dyn Any>>;

#[derive(Default)]
pub struct ProviderRegistry {
    slots: RefCell<FxHashMap<String, Producer>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the producer for `name`.
    pub fn register(&self, name: impl Into<String>, producer: impl Fn() -> Box<dyn Any> + 'static) {
        self.slots
            .borrow_mut()
            .insert(name.into(), Rc::new(producer));
    }

    pub fn unregister(&self, name: &str) {
        self.slots.borrow_mut().remove(name);
    }

    pub fn has(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    /// Invokes the registered producer, so values are always fresh.
    pub fn produce(&self, name: &str) -> Option<Box<dyn Any>> {
        let producer = self.slots.borrow().get(name).cloned();
        producer.map(|producer| producer())
    }

    /// Produces and downcasts; `None` when the slot is empty or the
    /// produced value has a different type.
    pub fn get<T: 'static>(&self, name: &str) -> Option<T> {
        self.produce(name)
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }
}
