//! In-memory host environment
//!
//! `SimHost` keeps a tiny element tree, a virtual clock and a queue of
//! pending work ordered by due time. It records every host-visible effect
//! the engine causes so a run can be inspected or printed afterwards.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Duration;

use serde::Serialize;

use segue_core::{Delay, ElementId, Host, Navigation, Wake};

use crate::page::PageFixture;

/// Spacing of animation frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
struct Element {
    name: String,
    parent: Option<ElementId>,
    href: Option<String>,
    transition: Option<Duration>,
    classes: Vec<String>,
}

/// Work waiting on the virtual clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// A wake the engine scheduled
    Wake(Wake),
    /// A CSS transition finishing on an element
    TransitionEnd(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    item: Pending,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and the earliest item must pop first
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Something the page would show or do
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Click { element: String, intercepted: bool },
    DefaultNavigation { href: String },
    ClassAdded { class: String },
    ClassRemoved { class: String },
    SignalBound { element: String, signal: String },
    SignalUnbound { element: String, signal: String },
    TransitionEnded { element: String, delivered: bool },
    Scrolled { offset: f64 },
    Navigated { path: String },
    Reloaded,
    Unloaded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub effect: Effect,
}

#[derive(Debug)]
pub struct SimHost {
    elements: Vec<Element>,
    ids: HashMap<String, ElementId>,
    root: ElementId,
    origin: String,
    path: String,
    now: Duration,
    scroll: f64,
    max_scroll: Option<f64>,
    style_properties: Vec<String>,
    unload_on_navigate: bool,
    unloaded: bool,
    click_listeners: HashSet<ElementId>,
    signal_listeners: HashSet<(ElementId, String)>,
    queue: BinaryHeap<Scheduled>,
    seq: u64,
    timeline: Vec<TimelineEntry>,
}

impl SimHost {
    pub fn new(page: &PageFixture) -> Self {
        let mut host = Self {
            elements: Vec::new(),
            ids: HashMap::new(),
            root: ElementId(0),
            origin: page.origin.trim_end_matches('/').to_string(),
            path: page.path.clone(),
            now: Duration::ZERO,
            scroll: page.scroll,
            max_scroll: page.max_scroll,
            style_properties: page.style_properties.clone(),
            unload_on_navigate: page.unload_on_navigate,
            unloaded: false,
            click_listeners: HashSet::new(),
            signal_listeners: HashSet::new(),
            queue: BinaryHeap::new(),
            seq: 0,
            timeline: Vec::new(),
        };

        host.root = host.insert("body", None, None, None);
        for fixture in &page.elements {
            let parent = fixture
                .parent
                .as_deref()
                .and_then(|p| host.ids.get(p).copied())
                .unwrap_or(host.root);
            let href = fixture.href.as_deref().map(|h| host.absolute(h));
            host.insert(
                &fixture.id,
                Some(parent),
                href,
                fixture.transition_ms.map(Duration::from_millis),
            );
        }

        host
    }

    fn insert(
        &mut self,
        name: &str,
        parent: Option<ElementId>,
        href: Option<String>,
        transition: Option<Duration>,
    ) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            name: name.to_string(),
            parent,
            href,
            transition,
            classes: Vec::new(),
        });
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Resolve an origin-relative href the way a browser reports `a.href`
    fn absolute(&self, href: &str) -> String {
        if href.starts_with('/') {
            format!("{}{}", self.origin, href)
        } else {
            href.to_string()
        }
    }

    fn record(&mut self, effect: Effect) {
        self.timeline.push(TimelineEntry {
            at_ms: self.now.as_millis() as u64,
            effect,
        });
    }

    fn enqueue(&mut self, due: Duration, item: Pending) {
        self.seq += 1;
        self.queue.push(Scheduled {
            due,
            seq: self.seq,
            item,
        });
    }

    pub fn element(&self, name: &str) -> Option<ElementId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, element: ElementId) -> &str {
        self.elements
            .get(element.0 as usize)
            .map(|e| e.name.as_str())
            .unwrap_or("?")
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Classes currently on the root element
    pub fn root_classes(&self) -> &[String] {
        &self.elements[self.root.0 as usize].classes
    }

    pub fn is_click_bound(&self, element: ElementId) -> bool {
        self.click_listeners.contains(&element)
    }

    pub fn is_signal_bound(&self, element: ElementId, signal: &str) -> bool {
        self.signal_listeners
            .contains(&(element, signal.to_string()))
    }

    pub fn bound_signal_count(&self) -> usize {
        self.signal_listeners.len()
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.timeline.iter().map(|e| &e.effect)
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Due time of the earliest pending item
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|s| s.due)
    }

    /// Remove the earliest pending item, moving the clock to its due time
    pub fn pop_due(&mut self) -> Option<Pending> {
        let next = self.queue.pop()?;
        self.now = self.now.max(next.due);
        Some(next.item)
    }

    /// Move the clock forward without running anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Nearest ancestor-or-self with a click listener
    pub fn click_listener_for(&self, element: ElementId) -> Option<ElementId> {
        let mut current = Some(element);
        while let Some(el) = current {
            if self.click_listeners.contains(&el) {
                return Some(el);
            }
            current = self.elements.get(el.0 as usize).and_then(|e| e.parent);
        }
        None
    }

    /// Record a click and, when it was not intercepted, the browser's own
    /// navigation to the nearest link
    pub fn record_click(&mut self, target: ElementId, intercepted: bool) {
        let element = self.name(target).to_string();
        self.record(Effect::Click {
            element,
            intercepted,
        });
        if intercepted {
            return;
        }

        let mut current = Some(target);
        while let Some(el) = current {
            if let Some(href) = self.elements[el.0 as usize].href.clone() {
                self.record(Effect::DefaultNavigation { href });
                if self.unload_on_navigate {
                    self.unload();
                }
                return;
            }
            current = self.elements[el.0 as usize].parent;
        }
    }

    /// Record a transition end and report whether anyone is listening
    pub fn transition_ended(&mut self, element: ElementId, signal: &str) -> bool {
        let delivered = self.is_signal_bound(element, signal);
        let name = self.name(element).to_string();
        self.record(Effect::TransitionEnded {
            element: name,
            delivered,
        });
        delivered
    }

    fn is_transitioning(&self, element: ElementId) -> bool {
        self.queue
            .iter()
            .any(|s| s.item == Pending::TransitionEnd(element))
    }

    fn unload(&mut self) {
        self.unloaded = true;
        self.queue.clear();
        self.record(Effect::Unloaded);
    }

    /// Start the CSS transitions the root class change triggers
    ///
    /// An element already transitioning keeps its pending end; a browser
    /// fires one end per transition however many classes change.
    fn start_css_transitions(&mut self) {
        let triggered: Vec<(ElementId, Duration)> = self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.transition.map(|d| (ElementId(i as u32), d)))
            .filter(|(element, _)| !self.is_transitioning(*element))
            .collect();
        for (element, duration) in triggered {
            self.enqueue(self.now + duration, Pending::TransitionEnd(element));
        }
    }
}

impl Host for SimHost {
    fn links(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.href.is_some())
            .map(|(i, _)| ElementId(i as u32))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.element(id)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.elements.get(element.0 as usize)?.parent
    }

    fn href(&self, element: ElementId) -> Option<String> {
        self.elements.get(element.0 as usize)?.href.clone()
    }

    fn root(&self) -> ElementId {
        self.root
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        let Some(el) = self.elements.get_mut(element.0 as usize) else {
            return;
        };
        if el.classes.iter().any(|c| c == class) {
            return;
        }
        el.classes.push(class.to_string());
        self.record(Effect::ClassAdded {
            class: class.to_string(),
        });
        if element == self.root {
            self.start_css_transitions();
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        let Some(el) = self.elements.get_mut(element.0 as usize) else {
            return;
        };
        let before = el.classes.len();
        el.classes.retain(|c| c != class);
        if el.classes.len() != before {
            self.record(Effect::ClassRemoved {
                class: class.to_string(),
            });
        }
    }

    fn bind_click(&mut self, element: ElementId) {
        self.click_listeners.insert(element);
    }

    fn unbind_click(&mut self, element: ElementId) {
        self.click_listeners.remove(&element);
    }

    fn bind_signal(&mut self, element: ElementId, signal: &str) {
        self.signal_listeners.insert((element, signal.to_string()));
        let name = self.name(element).to_string();
        self.record(Effect::SignalBound {
            element: name,
            signal: signal.to_string(),
        });
    }

    fn unbind_signal(&mut self, element: ElementId, signal: &str) {
        if self.signal_listeners.remove(&(element, signal.to_string())) {
            let name = self.name(element).to_string();
            self.record(Effect::SignalUnbound {
                element: name,
                signal: signal.to_string(),
            });
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        let offset = match self.max_scroll {
            Some(max) => offset.clamp(0.0, max),
            None => offset.max(0.0),
        };
        self.scroll = offset;
        self.record(Effect::Scrolled { offset });
    }

    fn schedule(&mut self, delay: Delay, wake: Wake) {
        let due = match delay {
            Delay::Timeout(d) => self.now + d,
            Delay::Frame => {
                let frame = FRAME_INTERVAL.as_nanos();
                let next = (self.now.as_nanos() / frame + 1) * frame;
                Duration::from_nanos(next as u64)
            }
        };
        self.enqueue(due, Pending::Wake(wake));
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Assign(path) => self.record(Effect::Navigated { path }),
            Navigation::Reload => self.record(Effect::Reloaded),
        }
        if self.unload_on_navigate {
            self.unload();
        }
    }

    fn supports_style_property(&self, property: &str) -> bool {
        self.style_properties.iter().any(|p| p == property)
    }
}
