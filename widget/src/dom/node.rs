use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use uuid::Uuid;

use super::events::{EventKind, Handler, Subscription};
use super::markup::{self, ParsedNode};
use super::selector::Selector;

pub(super) struct NodeInner {
    id: Uuid,
    kind: NodeKind,
    data: Mutex<NodeData>,
    next_listener: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Document,
    Element { tag: String, self_closing: bool },
    /// Raw markup text; entities are kept as written.
    Text,
}

#[derive(Default)]
struct NodeData {
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
    parent: Weak<NodeInner>,
    listeners: Vec<(u64, EventKind, Handler)>,
    bound: Vec<Subscription>,
}

/// Handle to a node in a host document. Cheap to clone; clones refer to the
/// same node.
#[derive(Clone)]
pub struct Element(pub(super) Arc<NodeInner>);

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0.kind {
            NodeKind::Document => write!(f, "#document"),
            NodeKind::Text => write!(f, "#text({:?})", self.0.data.lock().unwrap().text),
            NodeKind::Element { tag, .. } => write!(f, "<{} id={}>", tag, self.0.id),
        }
    }
}

impl Element {
    fn with_kind(kind: NodeKind) -> Self {
        Self(Arc::new(NodeInner {
            id: Uuid::new_v4(),
            kind,
            data: Mutex::new(NodeData::default()),
            next_listener: AtomicU64::new(0),
        }))
    }

    pub(super) fn document_root() -> Self {
        Self::with_kind(NodeKind::Document)
    }

    /// A detached element with no attributes or children.
    pub fn new(tag: &str) -> Self {
        Self::with_kind(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            self_closing: false,
        })
    }

    fn text_node(text: &str) -> Self {
        let node = Self::with_kind(NodeKind::Text);
        node.0.data.lock().unwrap().text = text.to_string();
        node
    }

    fn from_parsed(parsed: ParsedNode) -> Self {
        match parsed {
            ParsedNode::Text(text) => Self::text_node(&text),
            ParsedNode::Element {
                tag,
                attrs,
                self_closing,
                children,
            } => {
                let node = Self::with_kind(NodeKind::Element { tag, self_closing });
                let children: Vec<Element> = children.into_iter().map(Self::from_parsed).collect();
                for child in &children {
                    child.0.data.lock().unwrap().parent = Arc::downgrade(&node.0);
                }
                {
                    let mut data = node.0.data.lock().unwrap();
                    data.attrs = attrs;
                    data.children = children;
                }
                node
            }
        }
    }

    pub fn node_id(&self) -> Uuid {
        self.0.id
    }

    /// Lowercase tag name; `None` for text nodes and the document root.
    pub fn tag(&self) -> Option<String> {
        match &self.0.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    pub fn is_document(&self) -> bool {
        self.0.kind == NodeKind::Document
    }

    // ── Attributes and classes ──────────────────────────────────────

    pub fn attr(&self, name: &str) -> Option<String> {
        let data = self.0.data.lock().unwrap();
        data.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        let mut data = self.0.data.lock().unwrap();
        match data.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => data.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|token| token == class))
    }

    pub fn add_class(&self, class: &str) {
        self.toggle_class(class, true);
    }

    /// Add `class` when `present` is true, remove it otherwise.
    pub fn toggle_class(&self, class: &str, present: bool) {
        let mut classes = self.classes();
        let has = classes.iter().any(|c| c == class);
        if present == has {
            return;
        }
        if present {
            classes.push(class.to_string());
        } else {
            classes.retain(|c| c != class);
        }
        self.set_attr("class", &classes.join(" "));
    }

    // ── Tree ────────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<Element> {
        self.0.data.lock().unwrap().parent.upgrade().map(Element)
    }

    /// All child nodes, text included.
    pub fn child_nodes(&self) -> Vec<Element> {
        self.0.data.lock().unwrap().children.clone()
    }

    /// Move `child` under this node, detaching it from any previous parent.
    pub fn append_child(&self, child: &Element) {
        child.detach();
        child.0.data.lock().unwrap().parent = Arc::downgrade(&self.0);
        self.0.data.lock().unwrap().children.push(child.clone());
    }

    /// Unlink from the parent without touching listeners.
    fn detach(&self) {
        let parent = std::mem::take(&mut self.0.data.lock().unwrap().parent);
        if let Some(parent) = parent.upgrade() {
            parent
                .data
                .lock()
                .unwrap()
                .children
                .retain(|c| !Arc::ptr_eq(&c.0, &self.0));
        }
    }

    /// Remove this node from the document. Every listener and bound
    /// subscription in the removed subtree is dropped.
    pub fn remove(&self) {
        self.detach();
        self.release_subtree();
    }

    fn release_subtree(&self) {
        let (children, bound) = {
            let mut data = self.0.data.lock().unwrap();
            data.listeners.clear();
            (data.children.clone(), std::mem::take(&mut data.bound))
        };
        drop(bound);
        for child in children {
            child.release_subtree();
        }
    }

    /// Whether the node is still reachable from a document root.
    pub fn is_connected(&self) -> bool {
        let mut current = self.clone();
        loop {
            if current.is_document() {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn descendants(&self, out: &mut Vec<Element>) {
        for child in self.child_nodes() {
            if child.tag().is_some() {
                out.push(child.clone());
            }
            child.descendants(out);
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// First descendant matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Option<Element> {
        let mut all = Vec::new();
        self.descendants(&mut all);
        all.into_iter().find(|e| selector.matches(e))
    }

    /// Every descendant matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<Element> {
        let mut all = Vec::new();
        self.descendants(&mut all);
        all.retain(|e| selector.matches(e));
        all
    }

    /// Like [`Element::select`]; an unparseable selector matches nothing.
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        Selector::parse(selector)
            .ok()
            .and_then(|s| self.select(&s))
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        Selector::parse(selector)
            .map(|s| self.select_all(&s))
            .unwrap_or_default()
    }

    // ── Content ─────────────────────────────────────────────────────

    /// Replace all children with `markup`, parsed up front so the swap is
    /// atomic. Listeners inside the old children are dropped.
    pub fn set_inner_html(&self, markup: &str) {
        let nodes: Vec<Element> = markup::parse(markup)
            .into_iter()
            .map(Element::from_parsed)
            .collect();
        self.replace_children(nodes);
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&self, text: &str) {
        let escaped = markup::escape_text(text);
        let nodes = if escaped.is_empty() {
            Vec::new()
        } else {
            vec![Element::text_node(&escaped)]
        };
        self.replace_children(nodes);
    }

    fn replace_children(&self, nodes: Vec<Element>) {
        for node in &nodes {
            node.0.data.lock().unwrap().parent = Arc::downgrade(&self.0);
        }
        let old = std::mem::replace(&mut self.0.data.lock().unwrap().children, nodes);
        for child in old {
            child.0.data.lock().unwrap().parent = Weak::new();
            child.release_subtree();
        }
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.child_nodes() {
            child.write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.0.kind {
            NodeKind::Text => out.push_str(&self.0.data.lock().unwrap().text),
            NodeKind::Document => out.push_str(&self.inner_html()),
            NodeKind::Element { tag, self_closing } => {
                let attrs = self.0.data.lock().unwrap().attrs.clone();
                markup::write_open_tag(out, tag, &attrs, *self_closing);
                if !markup::is_void(tag) && !*self_closing {
                    out.push_str(&self.inner_html());
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }

    /// Concatenated text of all descendant text nodes, entities decoded.
    pub fn text_content(&self) -> String {
        match &self.0.kind {
            NodeKind::Text => markup::decode_entities(&self.0.data.lock().unwrap().text),
            _ => self
                .child_nodes()
                .iter()
                .map(Element::text_content)
                .collect(),
        }
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Register `handler` for `kind`. The listener lives as long as the
    /// returned subscription, and never longer than the node's membership in
    /// the document.
    pub fn add_event_listener<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.0.next_listener.fetch_add(1, Ordering::Relaxed);
        self.0
            .data
            .lock()
            .unwrap()
            .listeners
            .push((id, kind, Arc::new(handler)));
        Subscription::new(Arc::downgrade(&self.0), id)
    }

    pub(super) fn remove_listener(inner: &NodeInner, id: u64) {
        inner
            .data
            .lock()
            .unwrap()
            .listeners
            .retain(|(lid, _, _)| *lid != id);
    }

    /// Run every listener registered for `kind`. Returns how many ran.
    pub fn dispatch(&self, kind: EventKind) -> usize {
        let handlers: Vec<Handler> = self
            .0
            .data
            .lock()
            .unwrap()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn click(&self) -> usize {
        self.dispatch(EventKind::Click)
    }

    pub fn listener_count(&self) -> usize {
        self.0.data.lock().unwrap().listeners.len()
    }

    /// Tie `subscriptions` to this node, dropping whatever was bound before.
    /// They are released when the node is removed from the document.
    pub fn bind_subscriptions(&self, subscriptions: Vec<Subscription>) {
        let previous = std::mem::replace(&mut self.0.data.lock().unwrap().bound, subscriptions);
        drop(previous);
    }
}
