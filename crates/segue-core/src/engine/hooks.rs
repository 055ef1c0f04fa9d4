use std::fmt;

use crate::host::ElementId;

use super::Transition;

type OffsetFn = Box<dyn Fn(&Transition) -> f64>;
type FilterFn = Box<dyn Fn(ElementId, &str) -> bool>;
type NotifyFn = Box<dyn Fn(&Transition)>;

/// Extension points called by the engine
///
/// Every hook is optional. Without hooks the engine scrolls to the top of the
/// page, animates every matching link, and notifies nobody.
#[derive(Default)]
pub struct Hooks {
    compute_scroll_offset: Option<OffsetFn>,
    should_animate: Option<FilterFn>,
    before_animation_start: Option<NotifyFn>,
    on_transition_end: Option<NotifyFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset from the top of the page to scroll to
    pub fn compute_scroll_offset(mut self, f: impl Fn(&Transition) -> f64 + 'static) -> Self {
        self.compute_scroll_offset = Some(Box::new(f));
        self
    }

    /// Veto animating a click on `anchor` towards `path`
    pub fn should_animate(mut self, f: impl Fn(ElementId, &str) -> bool + 'static) -> Self {
        self.should_animate = Some(Box::new(f));
        self
    }

    pub fn before_animation_start(mut self, f: impl Fn(&Transition) + 'static) -> Self {
        self.before_animation_start = Some(Box::new(f));
        self
    }

    pub fn on_transition_end(mut self, f: impl Fn(&Transition) + 'static) -> Self {
        self.on_transition_end = Some(Box::new(f));
        self
    }

    pub(crate) fn scroll_offset(&self, transition: &Transition) -> f64 {
        self.compute_scroll_offset
            .as_ref()
            .map(|f| f(transition))
            .unwrap_or(0.0)
    }

    pub(crate) fn allows(&self, anchor: ElementId, path: &str) -> bool {
        self.should_animate
            .as_ref()
            .map(|f| f(anchor, path))
            .unwrap_or(true)
    }

    pub(crate) fn starting(&self, transition: &Transition) {
        if let Some(f) = &self.before_animation_start {
            f(transition);
        }
    }

    pub(crate) fn ended(&self, transition: &Transition) {
        if let Some(f) = &self.on_transition_end {
            f(transition);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("compute_scroll_offset", &self.compute_scroll_offset.is_some())
            .field("should_animate", &self.should_animate.is_some())
            .field("before_animation_start", &self.before_animation_start.is_some())
            .field("on_transition_end", &self.on_transition_end.is_some())
            .finish()
    }
}
