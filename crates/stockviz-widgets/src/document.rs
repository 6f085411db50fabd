// File: crates/stockviz-widgets/src/document.rs
// Summary: Headless page model: elements by id, body overlays, head stylesheets, observers and listeners.
// Notes:
// - `Document` is a cheap cloneable handle; all clones see the same page.
// - Callbacks are cloned out of the lock before they run, so a callback may freely
//   call back into the document.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

pub use stockviz_core::escape_html;
use stockviz_core::Artifact;

/// What an element currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Content {
    #[default]
    Empty,
    Html(String),
    Chart(Artifact),
}

impl Content {
    pub fn html(&self) -> Option<&str> {
        match self {
            Content::Html(s) => Some(s),
            _ => None,
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Content::Chart(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub class: String,
    /// Client size in pixels; a height of 0 means "auto".
    pub width: u32,
    pub height: u32,
    pub style: BTreeMap<String, String>,
    pub attrs: BTreeMap<String, String>,
    pub content: Content,
    pub children: Vec<String>,
    pub parent: Option<String>,
}

impl Element {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self { id: id.into(), width, height, ..Self::default() }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer position relative to the element's top-left corner.
    Move { x: f32, y: f32 },
    Leave,
}

pub type ResizeCallback = Arc<dyn Fn(u32, u32) + Send + Sync>;
pub type PointerCallback = Arc<dyn Fn(PointerEvent) + Send + Sync>;
pub type ClickCallback = Arc<dyn Fn() + Send + Sync>;

/// Registration of an observer or listener; pass back to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Default)]
struct Page {
    elements: HashMap<String, Element>,
    body: Vec<String>,
    head: Vec<(String, String)>,
    resize: Vec<(Subscription, String, ResizeCallback)>,
    pointer: Vec<(Subscription, String, PointerCallback)>,
    click: Vec<(Subscription, String, ClickCallback)>,
    next: u64,
}

impl Page {
    fn subscription(&mut self) -> Subscription {
        self.next += 1;
        Subscription(self.next)
    }

    fn remove_tree(&mut self, id: &str) {
        if let Some(el) = self.elements.remove(id) {
            for child in el.children {
                self.remove_tree(&child);
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct Document {
    page: Arc<Mutex<Page>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let page = self.lock();
        f.debug_struct("Document")
            .field("elements", &page.elements.len())
            .field("body", &page.body)
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a top-level element (a page container). Replaces an element with the same id.
    pub fn insert(&self, element: Element) {
        let mut page = self.lock();
        page.remove_tree(&element.id);
        page.elements.insert(element.id.clone(), element);
    }

    /// Append `child` under `parent`; `false` when the parent does not exist.
    pub fn append_child(&self, parent: &str, mut child: Element) -> bool {
        let mut page = self.lock();
        if !page.elements.contains_key(parent) {
            return false;
        }
        page.remove_tree(&child.id);
        child.parent = Some(parent.to_string());
        let id = child.id.clone();
        page.elements.insert(id.clone(), child);
        if let Some(p) = page.elements.get_mut(parent) {
            p.children.retain(|c| *c != id);
            p.children.push(id);
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().elements.contains_key(id)
    }

    /// Snapshot of an element.
    pub fn element(&self, id: &str) -> Option<Element> {
        self.lock().elements.get(id).cloned()
    }

    pub fn attr(&self, id: &str, key: &str) -> Option<String> {
        self.lock().elements.get(id).and_then(|e| e.attrs.get(key).cloned())
    }

    pub fn content(&self, id: &str) -> Option<Content> {
        self.lock().elements.get(id).map(|e| e.content.clone())
    }

    pub fn client_size(&self, id: &str) -> Option<(u32, u32)> {
        self.lock().elements.get(id).map(|e| (e.width, e.height))
    }

    /// Run `f` against the element in place; `None` when it does not exist.
    pub fn with_element<R>(&self, id: &str, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        self.lock().elements.get_mut(id).map(f)
    }

    pub fn set_content(&self, id: &str, content: Content) -> bool {
        self.with_element(id, |e| e.content = content).is_some()
    }

    /// Drop all children and content of `id`.
    pub fn clear(&self, id: &str) -> bool {
        let mut page = self.lock();
        let Some(children) = page.elements.get_mut(id).map(|e| {
            e.content = Content::Empty;
            std::mem::take(&mut e.children)
        }) else {
            return false;
        };
        for child in children {
            page.remove_tree(&child);
        }
        true
    }

    pub fn set_style(&self, id: &str, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        self.with_element(id, |e| {
            e.style.insert(key.to_string(), value);
        })
        .is_some()
    }

    pub fn style(&self, id: &str, key: &str) -> Option<String> {
        self.lock().elements.get(id).and_then(|e| e.style.get(key).cloned())
    }

    pub fn add_class(&self, id: &str, class: &str) -> bool {
        self.with_element(id, |e| {
            if !e.has_class(class) {
                if !e.class.is_empty() {
                    e.class.push(' ');
                }
                e.class.push_str(class);
            }
        })
        .is_some()
    }

    pub fn remove_class(&self, id: &str, class: &str) -> bool {
        self.with_element(id, |e| {
            e.class = e.class.split_whitespace().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
        })
        .is_some()
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.lock().elements.get(id).is_some_and(|e| e.has_class(class))
    }

    // ---- body overlays ----

    /// Attach an element directly to the body. Replaces one with the same id.
    pub fn append_to_body(&self, element: Element) {
        let mut page = self.lock();
        let id = element.id.clone();
        page.remove_tree(&id);
        page.body.retain(|b| *b != id);
        page.elements.insert(id.clone(), element);
        page.body.push(id);
    }

    /// `false` when `id` is not attached to the body.
    pub fn remove_from_body(&self, id: &str) -> bool {
        let mut page = self.lock();
        let before = page.body.len();
        page.body.retain(|b| b != id);
        if page.body.len() == before {
            return false;
        }
        page.remove_tree(id);
        true
    }

    pub fn body(&self) -> Vec<String> {
        self.lock().body.clone()
    }

    // ---- head ----

    pub fn has_stylesheet(&self, id: &str) -> bool {
        self.lock().head.iter().any(|(sid, _)| sid == id)
    }

    /// Append a `<style>` block; `false` when one with `id` is already present.
    pub fn append_stylesheet(&self, id: &str, css: impl Into<String>) -> bool {
        let mut page = self.lock();
        if page.head.iter().any(|(sid, _)| sid == id) {
            return false;
        }
        page.head.push((id.to_string(), css.into()));
        true
    }

    pub fn stylesheets(&self) -> Vec<(String, String)> {
        self.lock().head.clone()
    }

    // ---- observers and listeners ----

    pub fn observe_resize(&self, id: &str, callback: ResizeCallback) -> Subscription {
        let mut page = self.lock();
        let sub = page.subscription();
        page.resize.push((sub, id.to_string(), callback));
        sub
    }

    pub fn disconnect(&self, sub: Subscription) -> bool {
        let mut page = self.lock();
        let before = page.resize.len();
        page.resize.retain(|(s, _, _)| *s != sub);
        page.resize.len() != before
    }

    pub fn add_pointer_listener(&self, id: &str, callback: PointerCallback) -> Subscription {
        let mut page = self.lock();
        let sub = page.subscription();
        page.pointer.push((sub, id.to_string(), callback));
        sub
    }

    pub fn remove_pointer_listener(&self, sub: Subscription) -> bool {
        let mut page = self.lock();
        let before = page.pointer.len();
        page.pointer.retain(|(s, _, _)| *s != sub);
        page.pointer.len() != before
    }

    pub fn add_click_listener(&self, id: &str, callback: ClickCallback) -> Subscription {
        let mut page = self.lock();
        let sub = page.subscription();
        page.click.push((sub, id.to_string(), callback));
        sub
    }

    pub fn remove_click_listener(&self, sub: Subscription) -> bool {
        let mut page = self.lock();
        let before = page.click.len();
        page.click.retain(|(s, _, _)| *s != sub);
        page.click.len() != before
    }

    pub fn resize_observer_count(&self, id: &str) -> usize {
        self.lock().resize.iter().filter(|(_, target, _)| target == id).count()
    }

    pub fn pointer_listener_count(&self, id: &str) -> usize {
        self.lock().pointer.iter().filter(|(_, target, _)| target == id).count()
    }

    pub fn click_listener_count(&self, id: &str) -> usize {
        self.lock().click.iter().filter(|(_, target, _)| target == id).count()
    }

    // ---- event dispatch ----

    /// Change the client size of `id` and notify its resize observers.
    pub fn resize(&self, id: &str, width: u32, height: u32) -> bool {
        let callbacks: Vec<ResizeCallback> = {
            let mut page = self.lock();
            let Some(el) = page.elements.get_mut(id) else {
                return false;
            };
            el.width = width;
            el.height = height;
            page.resize.iter().filter(|(_, t, _)| t == id).map(|(_, _, cb)| cb.clone()).collect()
        };
        for cb in callbacks {
            cb(width, height);
        }
        true
    }

    /// Deliver a pointer event to the listeners of `id`; returns how many ran.
    pub fn dispatch_pointer(&self, id: &str, event: PointerEvent) -> usize {
        let callbacks: Vec<PointerCallback> = {
            let page = self.lock();
            page.pointer.iter().filter(|(_, t, _)| t == id).map(|(_, _, cb)| cb.clone()).collect()
        };
        for cb in &callbacks {
            cb(event);
        }
        callbacks.len()
    }

    /// Click `id`; returns how many listeners ran.
    pub fn click(&self, id: &str) -> usize {
        let callbacks: Vec<ClickCallback> = {
            let page = self.lock();
            page.click.iter().filter(|(_, t, _)| t == id).map(|(_, _, cb)| cb.clone()).collect()
        };
        for cb in &callbacks {
            cb();
        }
        callbacks.len()
    }
}
