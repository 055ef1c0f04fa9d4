//! Recording host used by unit tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::host::{Delay, ElementId, Host, Navigation, Wake};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<ElementId>,
    href: Option<String>,
}

/// Host effects in the order the engine produced them
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddClass(String),
    RemoveClass(String),
    BindSignal(ElementId, String),
    UnbindSignal(ElementId, String),
    Scroll(f64),
    Schedule(Delay, Wake),
    Navigate(Navigation),
}

#[derive(Debug)]
pub struct FakeHost {
    nodes: Vec<Node>,
    root: ElementId,
    origin: String,
    path: String,
    pub now: Duration,
    pub scroll: f64,
    pub classes: Vec<String>,
    pub clicks: HashSet<ElementId>,
    pub signals: Vec<(ElementId, String)>,
    pub queue: VecDeque<(Delay, Wake)>,
    pub ops: Vec<Op>,
    pub style_properties: Vec<String>,
    ids: HashMap<String, ElementId>,
}

impl FakeHost {
    pub fn new(origin: &str, path: &str) -> Self {
        let mut host = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            origin: origin.to_string(),
            path: path.to_string(),
            now: Duration::ZERO,
            scroll: 0.0,
            classes: Vec::new(),
            clicks: HashSet::new(),
            signals: Vec::new(),
            queue: VecDeque::new(),
            ops: Vec::new(),
            style_properties: vec!["transition".to_string()],
            ids: HashMap::new(),
        };
        host.root = host.add_element("body", None, None);
        host
    }

    pub fn add_element(&mut self, name: &str, parent: Option<&str>, href: Option<&str>) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        let parent = parent.and_then(|p| self.ids.get(p).copied()).or(if self.nodes.is_empty() {
            None
        } else {
            Some(self.root)
        });
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            href: href.map(str::to_string),
        });
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> ElementId {
        self.ids[name]
    }

    pub fn name(&self, element: ElementId) -> &str {
        &self.nodes[element.0 as usize].name
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Navigate(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    /// Position of the first op matching `pred`
    pub fn position(&self, pred: impl Fn(&Op) -> bool) -> Option<usize> {
        self.ops.iter().position(pred)
    }
}

impl Host for FakeHost {
    fn links(&self) -> Vec<ElementId> {
        (0..self.nodes.len() as u32)
            .map(ElementId)
            .filter(|id| self.nodes[id.0 as usize].href.is_some())
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.ids.get(id).copied()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.0 as usize)?.parent
    }

    fn href(&self, element: ElementId) -> Option<String> {
        self.nodes.get(element.0 as usize)?.href.clone()
    }

    fn root(&self) -> ElementId {
        self.root
    }

    fn add_class(&mut self, _element: ElementId, class: &str) {
        self.classes.push(class.to_string());
        self.ops.push(Op::AddClass(class.to_string()));
    }

    fn remove_class(&mut self, _element: ElementId, class: &str) {
        self.classes.retain(|c| c != class);
        self.ops.push(Op::RemoveClass(class.to_string()));
    }

    fn bind_click(&mut self, element: ElementId) {
        self.clicks.insert(element);
    }

    fn unbind_click(&mut self, element: ElementId) {
        self.clicks.remove(&element);
    }

    fn bind_signal(&mut self, element: ElementId, signal: &str) {
        self.signals.push((element, signal.to_string()));
        self.ops.push(Op::BindSignal(element, signal.to_string()));
    }

    fn unbind_signal(&mut self, element: ElementId, signal: &str) {
        self.signals.retain(|(e, s)| !(*e == element && s == signal));
        self.ops.push(Op::UnbindSignal(element, signal.to_string()));
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll = offset;
        self.ops.push(Op::Scroll(offset));
    }

    fn schedule(&mut self, delay: Delay, wake: Wake) {
        self.queue.push_back((delay, wake));
        self.ops.push(Op::Schedule(delay, wake));
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
        self.ops.push(Op::Navigate(navigation));
    }

    fn supports_style_property(&self, property: &str) -> bool {
        self.style_properties.iter().any(|p| p == property)
    }
}
