//! Value-typed plugin records.
//!
//! A plugin is a name plus an `init` that wires itself to the core and
//! returns a teardown. The engine runs an explicit plugin list (no
//! process-wide registry), filters by `disable_plugins`, and drains the
//! collected teardowns in reverse order on `destroy` so a plugin can rely
//! on everything it found at init time still being alive when it unwinds.

use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::engine::GridCore;

/// Callback that detaches a plugin (or any other wiring) from the core.
pub type Teardown = Box<dyn FnOnce()>;

type PluginInit = dyn Fn(&Rc<GridCore>, &PluginOptions) -> Option<Teardown>;

#[derive(educe::Educe, Clone)]
#[educe(Debug)]
pub struct Plugin {
    pub name: &'static str,
    #[educe(Debug(ignore))]
    init: Rc<PluginInit>,
}

impl Plugin {
    pub fn new(
        name: &'static str,
        init: impl Fn(&Rc<GridCore>, &PluginOptions) -> Option<Teardown> + 'static,
    ) -> Self {
        Self {
            name,
            init: Rc::new(init),
        }
    }

    /// Runs the plugin. `None` means the plugin declined to attach
    /// (a required collaborator was missing) and contributes no teardown.
    pub fn init(&self, core: &Rc<GridCore>, options: &PluginOptions) -> Option<Teardown> {
        (self.init)(core, options)
    }
}

/// Loosely-typed per-plugin configuration, keyed by option name.
#[derive(Default, Clone)]
pub struct PluginOptions {
    values: FxHashMap<String, Rc<dyn Any>>,
}

impl std::fmt::Debug for PluginOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginOptions")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Any) -> Self {
        self.values.insert(key.into(), Rc::new(value));
        self
    }

    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }
}

/// The plugins an unconfigured [`init`](crate::engine::init) runs.
pub fn default_plugins() -> Vec<Plugin> {
    vec![crate::harness::algorithm_harness()]
}
