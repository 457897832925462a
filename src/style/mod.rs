//! Ordered, named CSS text layers composed into one stylesheet.
//!
//! The responsive model writes the `base` layer, an in-flight interaction
//! writes the `preview` layer, and composition order makes the preview
//! shadow the base at equal selector specificity. Server-rendered CSS that
//! is already present in the managed style element is preserved as the
//! initial `base` layer.

pub mod css;

pub use css::SelectorFormat;

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::host::GridHost;

/// Layer holding the responsive container-query CSS.
pub const BASE_LAYER: &str = "base";
/// Layer holding the in-progress layout during an interaction.
pub const PREVIEW_LAYER: &str = "preview";

/// Insertion-ordered CSS layers. Later layers win for equal specificity
/// because they are emitted later in the composed stylesheet.
#[derive(Debug, Default)]
pub struct StyleLayers {
    layers: RefCell<IndexMap<String, String>>,
}

impl StyleLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures `initial` (a pre-populated style element's text) as the
    /// `base` layer, keeping it first in the order.
    pub fn with_base(initial: &str) -> Self {
        let layers = Self::new();
        if !initial.is_empty() {
            layers.set(BASE_LAYER, initial);
        }
        layers
    }

    /// Writes a layer's CSS text. The first write of a new name appends
    /// the layer to the composition order; later writes keep its slot.
    pub fn set(&self, layer: impl Into<String>, text: impl Into<String>) {
        self.layers.borrow_mut().insert(layer.into(), text.into());
    }

    pub fn get(&self, layer: &str) -> Option<String> {
        self.layers.borrow().get(layer).cloned()
    }

    /// Empties a layer without forgetting its position in the order.
    pub fn clear(&self, layer: &str) {
        if let Some(text) = self.layers.borrow_mut().get_mut(layer) {
            text.clear();
        }
    }

    /// Non-empty layers joined in insertion order.
    pub fn compose(&self) -> String {
        self.layers
            .borrow()
            .values()
            .filter(|text| !text.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Writes the composed stylesheet into the host's managed style
    /// element.
    pub fn commit(&self, host: &dyn GridHost) {
        host.set_stylesheet(&self.compose());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_compose_in_insertion_order() {
        let layers = StyleLayers::new();
        layers.set(BASE_LAYER, ".grid { }");
        layers.set(PREVIEW_LAYER, "#a { grid-column: 1 / span 1; }");
        assert_eq!(
            layers.compose(),
            ".grid { }\n\n#a { grid-column: 1 / span 1; }"
        );
    }

    #[test]
    fn rewriting_a_layer_keeps_its_slot() {
        let layers = StyleLayers::new();
        layers.set("base", "base-1");
        layers.set("preview", "preview-1");
        layers.set("base", "base-2");
        assert_eq!(layers.compose(), "base-2\n\npreview-1");
    }

    #[test]
    fn cleared_layers_are_skipped_but_remembered() {
        let layers = StyleLayers::new();
        layers.set("base", "base");
        layers.set("preview", "preview");
        layers.clear("base");
        assert_eq!(layers.compose(), "preview");
        layers.set("base", "again");
        assert_eq!(layers.compose(), "again\n\npreview");
    }

    #[test]
    fn initial_text_becomes_the_base_layer() {
        let layers = StyleLayers::with_base(".server { color: red; }");
        assert_eq!(layers.get(BASE_LAYER).as_deref(), Some(".server { color: red; }"));
        let empty = StyleLayers::with_base("");
        assert_eq!(empty.get(BASE_LAYER), None);
    }
}
