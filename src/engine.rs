//! Binding a grid host to a core instance.
//!
//! [`init`] wires the state machine, style layers, provider registry and
//! event bus together, runs the plugin list, and hands back the [`GridCore`]
//! everything else talks through. `destroy` unwinds the plugins in reverse
//! order, which is what breaks the core → teardown → plugin → core cycle.

use std::cell::{Cell as StdCell, RefCell};
use std::rc::Rc;

use peniko::kurbo::Point;
use rustc_hash::FxHashMap;

use crate::bus::EventBus;
use crate::event::{GridEvent, event_name};
use crate::geometry::{Cell, GridMetrics};
use crate::harness::Algorithm;
use crate::host::{GridHost, ItemState};
use crate::plugin::{Plugin, PluginOptions, Teardown, default_plugins};
use crate::providers::{ProviderRegistry, capability};
use crate::responsive::{BreakpointCssOptions, LayoutModel};
use crate::state_machine::{Action, StateMachine};
use crate::style::{BASE_LAYER, SelectorFormat, StyleLayers};

#[derive(Debug, Clone)]
pub struct CoreOptions {
    /// Shared layout model; without one, interactions still work but
    /// nothing is persisted.
    pub layout_model: Option<Rc<LayoutModel>>,
    /// Namespace prepended to outward event names.
    pub event_prefix: String,
    pub selector: SelectorFormat,
    /// Which layout algorithm the harness runs.
    pub algorithm: Algorithm,
    /// When set (and a layout model is present), the engine keeps the
    /// `base` layer populated with the model's breakpoint CSS.
    pub responsive_css: Option<BreakpointCssOptions>,
    pub plugin_options: FxHashMap<String, PluginOptions>,
    pub disable_plugins: Vec<String>,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            layout_model: None,
            event_prefix: "gridiot:".to_string(),
            selector: SelectorFormat::default(),
            algorithm: Algorithm::PushDown,
            responsive_css: None,
            plugin_options: FxHashMap::default(),
            disable_plugins: Vec::new(),
        }
    }
}

impl CoreOptions {
    pub fn layout_model(mut self, model: Rc<LayoutModel>) -> Self {
        self.layout_model = Some(model);
        self
    }

    pub fn event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = prefix.into();
        self
    }

    pub fn selector(mut self, selector: SelectorFormat) -> Self {
        self.selector = selector;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn responsive_css(mut self, options: BreakpointCssOptions) -> Self {
        self.responsive_css = Some(options);
        self
    }

    pub fn plugin_options(mut self, plugin: impl Into<String>, options: PluginOptions) -> Self {
        self.plugin_options.insert(plugin.into(), options);
        self
    }

    pub fn disable_plugin(mut self, name: impl Into<String>) -> Self {
        self.disable_plugins.push(name.into());
        self
    }
}

pub struct GridCore {
    host: Rc<dyn GridHost>,
    pub options: CoreOptions,
    bus: Rc<EventBus>,
    providers: ProviderRegistry,
    state: Rc<StateMachine>,
    styles: Rc<StyleLayers>,
    selected: RefCell<Option<String>>,
    teardowns: RefCell<Vec<Teardown>>,
    destroyed: StdCell<bool>,
}

/// Binds `host` to a new core and runs the default plugin set.
pub fn init(host: Rc<dyn GridHost>, options: CoreOptions) -> Rc<GridCore> {
    init_with_plugins(host, options, &default_plugins())
}

/// Binds `host` to a new core, running an explicit plugin list.
pub fn init_with_plugins(
    host: Rc<dyn GridHost>,
    options: CoreOptions,
    plugins: &[Plugin],
) -> Rc<GridCore> {
    let styles = Rc::new(StyleLayers::with_base(&host.stylesheet()));
    let core = Rc::new(GridCore {
        host,
        options,
        bus: Rc::new(EventBus::new()),
        providers: ProviderRegistry::new(),
        state: Rc::new(StateMachine::new()),
        styles,
        selected: RefCell::new(None),
        teardowns: RefCell::new(Vec::new()),
        destroyed: StdCell::new(false),
    });

    let state = core.state.clone();
    core.providers
        .register(capability::STATE, move || Box::new(state.state()));

    if let Some(model) = core.options.layout_model.clone() {
        let provided = model.clone();
        core.providers
            .register(capability::LAYOUT, move || Box::new(provided.clone()));
        let log_host = core.host.clone();
        model.set_logger(move |message| log_host.log(message));

        if let Some(css_options) = core.options.responsive_css.clone() {
            // The model holds this subscriber, so the subscriber must not
            // hold the model back.
            let emit = {
                let model = Rc::downgrade(&model);
                let styles = core.styles.clone();
                let host = core.host.clone();
                move || {
                    if let Some(model) = model.upgrade() {
                        styles.set(BASE_LAYER, model.breakpoint_css(&css_options));
                        styles.commit(&*host);
                    }
                }
            };
            emit();
            let subscription = model.subscribe(move |_| emit());
            let model = model.clone();
            core.teardowns
                .borrow_mut()
                .push(Box::new(move || model.unsubscribe(subscription)));
        }
    }

    for plugin in plugins {
        if core
            .options
            .disable_plugins
            .iter()
            .any(|name| name == plugin.name)
        {
            continue;
        }
        let plugin_options = core
            .options
            .plugin_options
            .get(plugin.name)
            .cloned()
            .unwrap_or_default();
        if let Some(teardown) = plugin.init(&core, &plugin_options) {
            core.teardowns.borrow_mut().push(teardown);
        }
    }

    core
}

impl GridCore {
    pub fn host(&self) -> &Rc<dyn GridHost> {
        &self.host
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn state_machine(&self) -> &Rc<StateMachine> {
        &self.state
    }

    pub fn styles(&self) -> &Rc<StyleLayers> {
        &self.styles
    }

    pub fn layout_model(&self) -> Option<&Rc<LayoutModel>> {
        self.options.layout_model.as_ref()
    }

    pub fn selected_item(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    pub fn grid_metrics(&self) -> GridMetrics {
        self.host.grid_metrics()
    }

    pub fn cell_from_point(&self, point: Point) -> Option<Cell> {
        self.host.grid_metrics().cell_from_point(point)
    }

    /// Emits on the bus and mirrors the event outward through the host.
    pub fn emit(&self, event: GridEvent) {
        let name = event_name(&self.options.event_prefix, event.kind());
        self.host.dispatch_event(&name, &event);
        self.bus.emit(&event);
    }

    /// Selects an item, reflecting the selection into its state attribute.
    /// Rejected (returns `false`) while an interaction is in flight.
    pub fn select(&self, item_id: &str) -> bool {
        if !self.state.dispatch(Action::Select {
            item_id: item_id.to_string(),
        }) {
            return false;
        }
        let previous = self.selected.replace(Some(item_id.to_string()));
        if let Some(previous) = previous.filter(|previous| previous != item_id) {
            self.host
                .set_item_state(&previous, ItemState::SELECTED, false);
        }
        self.host.set_item_state(item_id, ItemState::SELECTED, true);
        self.emit(GridEvent::Select {
            item_id: item_id.to_string(),
        });
        true
    }

    pub fn deselect(&self) -> bool {
        if !self.state.dispatch(Action::Deselect) {
            return false;
        }
        let previous = self.selected.take();
        if let Some(previous) = &previous {
            self.host
                .set_item_state(previous, ItemState::SELECTED, false);
        }
        self.emit(GridEvent::Deselect { item_id: previous });
        true
    }

    /// Entry point for the external responsive observer: tracks the count
    /// on the model and announces the change.
    pub fn set_column_count(&self, columns: u32) {
        let Some(model) = self.layout_model() else {
            return;
        };
        if let Some((previous, current)) = model.set_current_columns(columns) {
            self.emit(GridEvent::ColumnCountChange { previous, current });
        }
    }

    /// Unwinds plugin teardowns in reverse registration order.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let mut teardowns = std::mem::take(&mut *self.teardowns.borrow_mut());
        while let Some(teardown) = teardowns.pop() {
            teardown();
        }
    }
}
