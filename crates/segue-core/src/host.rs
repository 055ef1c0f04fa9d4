//! Host environment capability
//!
//! The engine never touches a document or a window directly. Everything it
//! needs from the page (element lookup, class mutation, listener binding,
//! scrolling, timers, navigation) goes through the [`Host`] trait, which a
//! browser binding or the simulator implements.

use std::fmt;
use std::time::Duration;

use uuid::Uuid;

/// Opaque handle to an element owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one run of a transition, from click to cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionId(Uuid);

impl TransitionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies one scroll animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScrollId(pub u64);

/// A deferred continuation the host hands back to [`crate::Engine::wake`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Advance the scroll animation
    ScrollTick(ScrollId),
    /// Add the body class (the `during` timing)
    ApplyClass(TransitionId),
    /// Undo the transition after navigation was requested
    Cleanup(TransitionId),
    /// The transition-end signal did not arrive in time
    TransitionTimeout(TransitionId),
}

/// How long the host should wait before delivering a [`Wake`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// After the given time (a timer)
    Timeout(Duration),
    /// Before the next paint (an animation frame)
    Frame,
}

/// Navigation requested once a transition has finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Point the location at a new path
    Assign(String),
    /// Reload the current page; assigning the current path would be a no-op
    Reload,
}

/// A click delivered to a bound link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Innermost element that was clicked
    pub target: ElementId,
}

impl ClickEvent {
    pub fn new(target: ElementId) -> Self {
        Self { target }
    }
}

/// Whether the engine took over a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Default navigation must be suppressed; the engine will navigate
    Intercepted,
    /// Not ours; let the browser navigate normally
    PassThrough,
}

impl ClickOutcome {
    #[inline]
    pub fn is_intercepted(self) -> bool {
        matches!(self, ClickOutcome::Intercepted)
    }
}

/// Operations the engine requires from its environment
pub trait Host {
    // DOM queries
    /// All clickable links in scope
    fn links(&self) -> Vec<ElementId>;
    /// Resolve an element by its identifier
    fn element_by_id(&self, id: &str) -> Option<ElementId>;
    fn parent(&self, element: ElementId) -> Option<ElementId>;
    /// Absolute URL of the element's `href`, if it exposes one
    fn href(&self, element: ElementId) -> Option<String>;
    /// The element receiving the body class
    fn root(&self) -> ElementId;

    // DOM mutation
    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);
    fn bind_click(&mut self, element: ElementId);
    fn unbind_click(&mut self, element: ElementId);
    fn bind_signal(&mut self, element: ElementId, signal: &str);
    fn unbind_signal(&mut self, element: ElementId, signal: &str);

    // Platform services
    fn scroll_offset(&self) -> f64;
    fn set_scroll_offset(&mut self, offset: f64);
    fn schedule(&mut self, delay: Delay, wake: Wake);
    /// Monotonic time since the page loaded
    fn now(&self) -> Duration;
    /// `scheme://host[:port]` of the current document
    fn origin(&self) -> String;
    /// Path of the current document
    fn current_path(&self) -> String;
    fn navigate(&mut self, navigation: Navigation);

    // Feature detection
    /// Whether a style property of this name exists in the environment
    fn supports_style_property(&self, property: &str) -> bool;
}

/// Vendor style properties and the transition-end event each implies
const TRANSITION_END_EVENTS: &[(&str, &str)] = &[
    ("WebkitTransition", "webkitTransitionEnd"),
    ("MozTransition", "transitionend"),
    ("MSTransition", "msTransitionEnd"),
    ("OTransition", "otransitionend"),
    ("transition", "transitionend"),
];

/// Fallback when the environment reports none of the known properties
pub const DEFAULT_TRANSITION_END_EVENT: &str = "transitionend";

/// Determine which transition-end event name the host fires
pub fn detect_transition_end_event<H: Host + ?Sized>(host: &H) -> Option<&'static str> {
    TRANSITION_END_EVENTS
        .iter()
        .find(|(property, _)| host.supports_style_property(property))
        .map(|(_, event)| *event)
}
