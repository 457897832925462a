//! The FLIP animator.
//!
//! "First, Last, Invert, Play": record the element's rectangle before a
//! layout change, read its rectangle after, then play a transform from the
//! inverted difference back to identity. Pointer drags need this because a
//! View Transition cannot capture an element whose visual position is
//! detached from its grid flow; the dropped element is hand-animated into
//! its final slot while everything else animates declaratively.

use std::rc::Rc;
use std::time::Duration;

use peniko::kurbo::{Rect, Vec2};

use super::easing::Bezier;
use super::{VIEW_TRANSITION_NONE, view_transition_name};
use crate::host::GridHost;

/// Translation below which (in px, both axes) the animation is skipped.
const SKIP_TRANSLATION: f64 = 1.0;
/// Scale-delta below which the scale part counts as identity.
const SKIP_SCALE: f64 = 0.01;

pub const DEFAULT_FLIP_ATTRIBUTE: &str = "data-gridiot-flip";

#[derive(educe::Educe, Clone)]
#[educe(Debug)]
pub struct FlipOptions {
    pub duration: Duration,
    pub easing: Bezier,
    pub include_scale: bool,
    pub transform_origin: Option<String>,
    /// Attribute set on the element for the animation's lifetime.
    pub attribute_name: String,
    #[educe(Debug(ignore))]
    pub on_start: Option<Rc<dyn Fn()>>,
    #[educe(Debug(ignore))]
    pub on_finish: Option<Rc<dyn Fn()>>,
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
            easing: Bezier::ease(),
            include_scale: false,
            transform_origin: None,
            attribute_name: DEFAULT_FLIP_ATTRIBUTE.to_string(),
            on_start: None,
            on_finish: None,
        }
    }
}

impl FlipOptions {
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Bezier) -> Self {
        self.easing = easing;
        self
    }

    pub fn include_scale(mut self, include_scale: bool) -> Self {
        self.include_scale = include_scale;
        self
    }

    pub fn transform_origin(mut self, origin: impl Into<String>) -> Self {
        self.transform_origin = Some(origin.into());
        self
    }

    pub fn on_start(mut self, on_start: impl Fn() + 'static) -> Self {
        self.on_start = Some(Rc::new(on_start));
        self
    }

    pub fn on_finish(mut self, on_finish: impl Fn() + 'static) -> Self {
        self.on_finish = Some(Rc::new(on_finish));
        self
    }
}

/// The inverted starting transform and timing a host plays back to
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipSpec {
    pub translate: Vec2,
    pub scale: Option<(f64, f64)>,
    pub duration: Duration,
    pub easing: Bezier,
    pub transform_origin: Option<String>,
}

/// A sampled point between the inverted transform and identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub dx: f64,
    pub dy: f64,
    pub sx: f64,
    pub sy: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        dx: 0.0,
        dy: 0.0,
        sx: 1.0,
        sy: 1.0,
    };

    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}, {})",
            self.dx, self.dy, self.sx, self.sy
        )
    }
}

/// A FLIP animation in flight. The host's frame driver samples it and calls
/// [`finish`](FlipAnimation::finish) once the duration elapses.
#[derive(educe::Educe)]
#[educe(Debug)]
pub struct FlipAnimation {
    item_id: String,
    spec: FlipSpec,
    attribute_name: String,
    #[educe(Debug(ignore))]
    on_finish: Option<Rc<dyn Fn()>>,
}

impl FlipAnimation {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn spec(&self) -> &FlipSpec {
        &self.spec
    }

    /// Eased transform at `elapsed` since the animation started.
    pub fn sample(&self, elapsed: Duration) -> Transform {
        let duration = self.spec.duration.as_secs_f64();
        let progress = if duration <= 0.0 {
            1.0
        } else {
            (elapsed.as_secs_f64() / duration).clamp(0.0, 1.0)
        };
        let eased = self.spec.easing.eval(progress);
        let remaining = 1.0 - eased;
        let (sx, sy) = self.spec.scale.unwrap_or((1.0, 1.0));
        Transform {
            dx: self.spec.translate.x * remaining,
            dy: self.spec.translate.y * remaining,
            sx: sx + (1.0 - sx) * eased,
            sy: sy + (1.0 - sy) * eased,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.spec.duration
    }

    /// Removes the tracking attribute, restores the element's
    /// view-transition identity and reports completion.
    pub fn finish(&self, host: &dyn GridHost) {
        host.set_item_attribute(&self.item_id, &self.attribute_name, None);
        let name = view_transition_name(&host.item_identity(&self.item_id));
        host.set_view_transition_name(&self.item_id, name.as_deref());
        if let Some(on_finish) = &self.on_finish {
            on_finish();
        }
    }
}

/// Plays a transform animation on `item_id` that visually starts at
/// `first` and ends at the element's current rectangle.
///
/// Returns `None` without animating when the difference is within the skip
/// thresholds (or the element has no rectangle); `on_finish` still runs so
/// callers can treat the two outcomes uniformly. While the animation runs,
/// the element's view-transition name is parked on the sentinel so a
/// concurrent View Transition cannot capture it a second time.
pub fn flip(
    host: &dyn GridHost,
    item_id: &str,
    first: Rect,
    options: FlipOptions,
) -> Option<FlipAnimation> {
    let finish_only = |on_finish: &Option<Rc<dyn Fn()>>| {
        if let Some(on_finish) = on_finish {
            on_finish();
        }
    };

    let Some(last) = host.item_rect(item_id) else {
        finish_only(&options.on_finish);
        return None;
    };

    let dx = first.x0 - last.x0;
    let dy = first.y0 - last.y0;
    let scale = options.include_scale.then(|| {
        (
            safe_ratio(first.width(), last.width()),
            safe_ratio(first.height(), last.height()),
        )
    });

    let translation_negligible = dx.abs() <= SKIP_TRANSLATION && dy.abs() <= SKIP_TRANSLATION;
    let scale_negligible = scale
        .map(|(sx, sy)| (sx - 1.0).abs() <= SKIP_SCALE && (sy - 1.0).abs() <= SKIP_SCALE)
        .unwrap_or(true);
    if translation_negligible && scale_negligible {
        finish_only(&options.on_finish);
        return None;
    }

    if let Some(on_start) = &options.on_start {
        on_start();
    }

    let spec = FlipSpec {
        translate: Vec2::new(dx, dy),
        scale,
        duration: options.duration,
        easing: options.easing,
        transform_origin: options.transform_origin.clone(),
    };
    host.set_item_attribute(item_id, &options.attribute_name, Some(""));
    host.set_view_transition_name(item_id, Some(VIEW_TRANSITION_NONE));
    host.play_flip(item_id, &spec);

    Some(FlipAnimation {
        item_id: item_id.to_string(),
        spec,
        attribute_name: options.attribute_name,
        on_finish: options.on_finish,
    })
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        1.0
    } else {
        numerator / denominator
    }
}
