// File: crates/stockviz-widgets/src/tooltip.rs
// Summary: Body-level tooltip overlay for one chart instance.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::document::{escape_html, Content, Document, Element};

pub const CLASS: &str = "lightweight-charts-tooltip";
/// Offset from the pointer, in pixels.
pub const OFFSET: f32 = 15.0;

const STYLE: [(&str, &str); 13] = [
    ("position", "absolute"),
    ("display", "none"),
    ("padding", "8px"),
    ("box-shadow", "0 2px 5px rgba(0, 0, 0, 0.2)"),
    ("background-color", "rgba(255, 255, 255, 0.95)"),
    ("color", "#333"),
    ("border-radius", "4px"),
    ("font-size", "12px"),
    ("pointer-events", "none"),
    ("z-index", "1000"),
    ("white-space", "nowrap"),
    ("left", "0px"),
    ("top", "0px"),
];

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);
const OWNER_ATTR: &str = "data-owner";

pub fn tooltip_id(container: &str) -> String {
    format!("tooltip-{container}")
}

/// `<div>label: <strong>value</strong></div>` per row.
pub fn rows_html(rows: &[(String, String)]) -> String {
    let mut out = String::new();
    for (label, value) in rows {
        let _ = write!(out, "<div>{}: <strong>{}</strong></div>", escape_html(label), escape_html(value));
    }
    out
}

#[derive(Clone, Debug)]
pub struct Tooltip {
    doc: Document,
    id: String,
    /// Tells this tooltip apart from a later one created for the same container.
    owner: String,
}

impl Tooltip {
    /// Attach a hidden tooltip for `container` to the body.
    pub fn create(doc: &Document, container: &str) -> Self {
        let id = tooltip_id(container);
        let mut el = Element::new(id.clone(), 0, 0).with_class(CLASS);
        for (k, v) in STYLE {
            el.style.insert(k.to_string(), v.to_string());
        }
        let owner = NEXT_OWNER.fetch_add(1, Ordering::Relaxed).to_string();
        el.attrs.insert(OWNER_ATTR.into(), owner.clone());
        doc.append_to_body(el);
        Self { doc: doc.clone(), id, owner }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn show(&self) {
        self.doc.set_style(&self.id, "display", "block");
    }

    pub fn hide(&self) {
        self.doc.set_style(&self.id, "display", "none");
    }

    pub fn is_visible(&self) -> bool {
        self.doc.style(&self.id, "display").as_deref() == Some("block")
    }

    pub fn position(&self, x: f32, y: f32) {
        self.doc.set_style(&self.id, "left", format!("{}px", x + OFFSET));
        self.doc.set_style(&self.id, "top", format!("{}px", y + OFFSET));
    }

    pub fn set_rows(&self, rows: &[(String, String)]) {
        self.doc.set_content(&self.id, Content::Html(rows_html(rows)));
    }

    /// Rows when present, hidden otherwise.
    pub fn update(&self, rows: Option<&[(String, String)]>, x: f32, y: f32) {
        match rows {
            Some(rows) if !rows.is_empty() => {
                self.set_rows(rows);
                self.show();
                self.position(x, y);
            }
            _ => self.hide(),
        }
    }

    /// Detach from the body; `false` if it was already gone or replaced by a newer tooltip.
    pub fn remove(&self) -> bool {
        let owned = self
            .doc
            .element(&self.id)
            .is_some_and(|e| e.attrs.get(OWNER_ATTR) == Some(&self.owner));
        owned && self.doc.remove_from_body(&self.id)
    }
}
