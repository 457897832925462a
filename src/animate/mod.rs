//! Animation coordination.
//!
//! Two techniques cover every layout change: View Transitions for elements
//! that move within normal grid flow, and a hand-driven FLIP transform for
//! the one element whose visual position is detached from that flow while
//! it is dragged. The input source decides which one owns an interaction.

pub mod easing;
mod flip;

pub use easing::{Bezier, Easing, Linear};
pub use flip::{
    DEFAULT_FLIP_ATTRIBUTE, FlipAnimation, FlipOptions, FlipSpec, Transform, flip,
};

use crate::event::InputSource;
use crate::host::{GridHost, ItemIdentity};

/// Sentinel view-transition name that removes an element from a capture.
pub const VIEW_TRANSITION_NONE: &str = "none";

/// How an interaction's layout changes get animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStrategy {
    /// Pointer interactions: the dragged element is FLIP-animated, the
    /// rest go through View Transitions with the dragged element parked on
    /// the sentinel name.
    Flip,
    /// Keyboard interactions: everything, including the moved element,
    /// goes through one View Transition.
    ViewTransition,
}

impl AnimationStrategy {
    pub fn for_source(source: InputSource) -> Self {
        match source {
            InputSource::Pointer => AnimationStrategy::Flip,
            InputSource::Keyboard => AnimationStrategy::ViewTransition,
        }
    }
}

/// Resolves the view-transition name an element participates under.
///
/// Precedence: the `--item-id` custom property, then the element id, then
/// the dataset id. `None` means the element has no stable identity and
/// should not be given a transition name.
pub fn view_transition_name(identity: &ItemIdentity) -> Option<String> {
    identity
        .custom_property
        .clone()
        .or_else(|| identity.element_id.clone())
        .or_else(|| identity.dataset_id.clone())
}

/// Runs `update` inside a View Transition when the host supports the API,
/// or synchronously when it does not; `done` runs after the transition
/// settles (immediately in the fallback). Every use site goes through this
/// helper so the presence check lives in one place.
pub fn with_view_transition(
    host: &dyn GridHost,
    update: Box<dyn FnOnce()>,
    done: Box<dyn FnOnce()>,
) {
    if host.supports_view_transitions() {
        host.start_view_transition(update, done);
    } else {
        update();
        done();
    }
}
