//! Transition state machine
//!
//! `Idle → Animating → Finalizing → Idle`, one transition at a time.
//!
//! The engine is event driven. The host delivers three kinds of input:
//! clicks on bound links ([`Engine::click`]), transition-end signals on the
//! bound final element ([`Engine::transition_end`]) and the [`Wake`]s the
//! engine itself scheduled ([`Engine::wake`]). Each call runs to completion
//! and leaves behind at most a few scheduled wakes; nothing blocks.

mod hooks;
mod transition;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::anchor::{path_of, resolve_anchor};
use crate::config::{AnimationOptions, AnimationSpec, EngineConfig, ScrollTiming};
use crate::host::{
    detect_transition_end_event, ClickEvent, ClickOutcome, Delay, ElementId, Host, Navigation,
    ScrollId, TransitionId, Wake, DEFAULT_TRANSITION_END_EVENT,
};
use crate::registry::{AnimationDescriptor, Registry};
use crate::scroll::{ScrollCoordinator, ScrollPurpose, ScrollStep};
use crate::Result;

pub use hooks::Hooks;
pub use transition::{Phase, Transition};

use transition::State;

/// Page-transition orchestrator bound to one host
pub struct Engine<H: Host> {
    host: H,
    config: EngineConfig,
    hooks: Hooks,
    registry: Registry,
    scroll: ScrollCoordinator,
    state: State,
    transition_end_event: &'static str,
    bound_links: Vec<ElementId>,
}

impl<H: Host> Engine<H> {
    /// Create an engine and register the animations listed in `config`
    ///
    /// Entries that fail to register are logged and skipped.
    pub fn new(host: H, config: EngineConfig) -> Self {
        let transition_end_event = detect_transition_end_event(&host).unwrap_or_else(|| {
            warn!(
                "No transition style property supported, assuming '{}'",
                DEFAULT_TRANSITION_END_EVENT
            );
            DEFAULT_TRANSITION_END_EVENT
        });

        let mut engine = Self {
            host,
            config,
            hooks: Hooks::default(),
            registry: Registry::new(),
            scroll: ScrollCoordinator::new(),
            state: State::Idle,
            transition_end_event,
            bound_links: Vec::new(),
        };

        for spec in &engine.config.animations {
            if let Err(e) = engine
                .registry
                .register_spec(&engine.host, &engine.config, spec)
            {
                error!("Skipping animation '{}': {}", spec.pattern, e);
            }
        }

        engine
    }

    /// Install extension hooks
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Name of the transition-end event resolved at construction
    pub fn transition_end_event(&self) -> &'static str {
        self.transition_end_event
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// The transition occupying the active slot
    pub fn active(&self) -> Option<&Transition> {
        self.state.transition()
    }

    pub fn is_enabled(&self) -> bool {
        !self.bound_links.is_empty()
    }

    /// Register an animation for link paths matching `pattern`
    pub fn register(
        &mut self,
        pattern: &str,
        final_element_id: &str,
        body_class: &str,
        options: AnimationOptions,
    ) -> Result<Arc<AnimationDescriptor>> {
        self.registry.register(
            &self.host,
            &self.config,
            pattern,
            final_element_id,
            body_class,
            options,
        )
    }

    pub fn register_spec(&mut self, spec: &AnimationSpec) -> Result<Arc<AnimationDescriptor>> {
        self.registry.register_spec(&self.host, &self.config, spec)
    }

    /// Remove the animation registered under `pattern`
    ///
    /// A transition already running keeps its own handle and completes.
    pub fn deregister(&mut self, pattern: &str) -> Option<Arc<AnimationDescriptor>> {
        self.registry.deregister(pattern)
    }

    /// Start intercepting clicks on every link in the page
    pub fn enable(&mut self) {
        if self.is_enabled() {
            return;
        }

        let links = self.host.links();
        if links.is_empty() {
            error!("No links found in page.");
            return;
        }

        for &link in &links {
            self.host.bind_click(link);
        }
        debug!(links = links.len(), "Enabled page transitions");
        self.bound_links = links;
    }

    /// Stop intercepting clicks
    ///
    /// A transition already running is not interrupted.
    pub fn disable(&mut self) {
        for link in std::mem::take(&mut self.bound_links) {
            self.host.unbind_click(link);
        }
    }

    /// Handle a click on a bound link
    ///
    /// Returns [`ClickOutcome::Intercepted`] when the engine has taken over;
    /// the host must then suppress the default navigation.
    pub fn click(&mut self, event: ClickEvent) -> ClickOutcome {
        if !self.is_enabled() {
            return ClickOutcome::PassThrough;
        }

        let Some(anchor) = resolve_anchor(&self.host, &event) else {
            return ClickOutcome::PassThrough;
        };
        let Some(path) = path_of(&self.host, anchor) else {
            return ClickOutcome::PassThrough;
        };

        if let Some(active) = self.state.transition() {
            debug!(path = path.as_str(), transition = %active.id, "Transition in progress, ignoring click");
            return ClickOutcome::PassThrough;
        }

        if !self.hooks.allows(anchor, &path) {
            return ClickOutcome::PassThrough;
        }

        if !self.config.animate_links_to_self && path == self.host.current_path() {
            return ClickOutcome::PassThrough;
        }

        let Some(descriptor) = self.registry.find(&path).cloned() else {
            return ClickOutcome::PassThrough;
        };

        let Some(final_element) = descriptor.final_element() else {
            warn!(
                pattern = descriptor.pattern(),
                path = path.as_str(),
                "Final element '{}' missing, navigating without animation",
                descriptor.final_element_id()
            );
            return ClickOutcome::PassThrough;
        };

        self.begin(Transition::new(descriptor, anchor, path, final_element));
        ClickOutcome::Intercepted
    }

    /// Handle the transition-end signal fired on `element`
    ///
    /// Signals that arrive while no transition is animating, or on another
    /// element, are ignored.
    pub fn transition_end(&mut self, element: ElementId) {
        let id = match &self.state {
            State::Animating(t) if t.final_element == element => t.id,
            _ => return,
        };
        self.finalize(id);
    }

    /// Resume work scheduled through [`Host::schedule`]
    pub fn wake(&mut self, wake: Wake) {
        match wake {
            Wake::ScrollTick(id) => self.scroll_tick(id),
            Wake::ApplyClass(id) => self.apply_class(id),
            Wake::Cleanup(id) => self.cleanup(id),
            Wake::TransitionTimeout(id) => {
                if matches!(&self.state, State::Animating(t) if t.id == id) {
                    warn!(transition = %id, "Transition end never signalled, navigating anyway");
                    self.finalize(id);
                }
            }
        }
    }

    /// Scroll the page to `target` over `duration`
    ///
    /// The first step happens on the next animation frame. `purpose` says
    /// what continues once the target is reached.
    pub fn scroll_to(&mut self, target: f64, duration: Duration, purpose: ScrollPurpose) -> ScrollId {
        let now = self.host.now();
        let from = self.host.scroll_offset();
        let id = self.scroll.start(now, from, target, duration, purpose);
        self.host.schedule(Delay::Frame, Wake::ScrollTick(id));
        id
    }

    fn begin(&mut self, transition: Transition) {
        let id = transition.id;
        let descriptor = Arc::clone(&transition.descriptor);
        let scroll = descriptor.should_scroll().then(|| descriptor.scroll_timing());

        self.hooks.starting(&transition);
        self.host
            .bind_signal(transition.final_element, self.transition_end_event);

        let offset = match scroll {
            Some(ScrollTiming::Before) | Some(ScrollTiming::During) => {
                self.hooks.scroll_offset(&transition)
            }
            _ => 0.0,
        };

        info!(
            pattern = descriptor.pattern(),
            path = transition.path.as_str(),
            transition = %id,
            "Starting page transition"
        );
        self.state = State::Animating(transition);

        if let Some(timeout) = self.config.transition_timeout() {
            self.host
                .schedule(Delay::Timeout(timeout), Wake::TransitionTimeout(id));
        }

        match scroll {
            Some(ScrollTiming::Before) => {
                self.scroll_to(offset, descriptor.scroll_duration(), ScrollPurpose::ApplyClass(id));
            }
            Some(ScrollTiming::During) => {
                self.host
                    .schedule(Delay::Timeout(Duration::ZERO), Wake::ApplyClass(id));
                self.scroll_to(offset, descriptor.scroll_duration(), ScrollPurpose::Detached);
            }
            Some(ScrollTiming::After) | None => self.apply_class(id),
        }
    }

    fn apply_class(&mut self, id: TransitionId) {
        let State::Animating(transition) = &mut self.state else {
            return;
        };
        if transition.id != id || transition.class_applied {
            return;
        }

        let root = self.host.root();
        for token in transition.descriptor.class_tokens() {
            self.host.add_class(root, token);
        }
        transition.class_applied = true;
        debug!(transition = %id, "Applied body class");
    }

    fn finalize(&mut self, id: TransitionId) {
        let transition = match std::mem::take(&mut self.state) {
            State::Animating(t) if t.id == id => t,
            other => {
                self.state = other;
                return;
            }
        };

        let descriptor = Arc::clone(&transition.descriptor);
        let scroll_after =
            descriptor.should_scroll() && descriptor.scroll_timing() == ScrollTiming::After;
        let offset = if scroll_after {
            self.hooks.scroll_offset(&transition)
        } else {
            0.0
        };

        debug!(transition = %id, "Finalizing page transition");
        self.state = State::Finalizing(transition);

        if scroll_after {
            self.scroll_to(offset, descriptor.scroll_duration(), ScrollPurpose::Navigate(id));
        } else {
            self.navigate(id);
        }
    }

    fn navigate(&mut self, id: TransitionId) {
        let State::Finalizing(transition) = &self.state else {
            return;
        };
        if transition.id != id {
            return;
        }

        self.hooks.ended(transition);

        // The cleanup only runs if the browser keeps this page alive, e.g.
        // when it is restored from the back/forward cache.
        self.host
            .schedule(Delay::Timeout(self.config.cleanup_delay()), Wake::Cleanup(id));

        let navigation = if transition.path == self.host.current_path() {
            Navigation::Reload
        } else {
            Navigation::Assign(transition.path.clone())
        };
        info!(transition = %id, ?navigation, "Navigating");
        self.host.navigate(navigation);
    }

    fn cleanup(&mut self, id: TransitionId) {
        let transition = match std::mem::take(&mut self.state) {
            State::Finalizing(t) if t.id == id => t,
            other => {
                self.state = other;
                return;
            }
        };

        let root = self.host.root();
        for token in transition.descriptor.class_tokens() {
            self.host.remove_class(root, token);
        }
        self.host
            .unbind_signal(transition.final_element, self.transition_end_event);
        debug!(transition = %id, "Cleaned up page transition");
    }

    fn scroll_tick(&mut self, id: ScrollId) {
        let now = self.host.now();
        match self.scroll.tick(id, now) {
            Some(ScrollStep::Continue(offset)) => {
                self.host.set_scroll_offset(offset);
                self.host.schedule(Delay::Frame, Wake::ScrollTick(id));
            }
            Some(ScrollStep::Complete { offset, purpose }) => {
                self.host.set_scroll_offset(offset);
                debug!(offset, "Scroll complete");
                match purpose {
                    ScrollPurpose::ApplyClass(t) => self.apply_class(t),
                    ScrollPurpose::Navigate(t) => self.navigate(t),
                    ScrollPurpose::Detached => {}
                }
            }
            None => {}
        }
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("host", &self.host)
            .field("phase", &self.phase())
            .field("registry", &self.registry)
            .field("transition_end_event", &self.transition_end_event)
            .finish_non_exhaustive()
    }
}
