// File: crates/stockviz-widgets/src/placeholder.rs
// Summary: Loading and error placeholders that replace a container's content.

use stockviz_core::Locale;

use crate::document::{escape_html, Content, Document};

pub fn loading_html(locale: &Locale) -> String {
    format!(
        r#"<div class="chart-loading"><div class="spinner"></div><p>{}</p></div>"#,
        escape_html(locale.strings.loading)
    )
}

pub fn error_html(message: &str) -> String {
    format!(
        r#"<div class="chart-error"><i class="fas fa-exclamation-circle"></i><p>{}</p></div>"#,
        escape_html(message)
    )
}

fn replace(doc: &Document, id: &str, html: String) -> bool {
    // Missing containers are silently ignored.
    doc.clear(id) && doc.set_content(id, Content::Html(html))
}

pub fn show_loading(doc: &Document, id: &str, locale: &Locale) -> bool {
    replace(doc, id, loading_html(locale))
}

pub fn show_error(doc: &Document, id: &str, message: &str) -> bool {
    replace(doc, id, error_html(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    #[test]
    fn placeholders_replace_rather_than_accumulate() {
        let doc = Document::new();
        doc.insert(Element::new("c", 400, 300));
        doc.append_child("c", Element::new("old", 1, 1));

        assert!(show_loading(&doc, "c", &Locale::vi_vn()));
        assert!(show_loading(&doc, "c", &Locale::vi_vn()));
        let el = doc.element("c").unwrap();
        assert!(el.children.is_empty());
        assert_eq!(
            el.content.html(),
            Some(r#"<div class="chart-loading"><div class="spinner"></div><p>Đang tải dữ liệu...</p></div>"#)
        );

        assert!(show_error(&doc, "c", "Lỗi <x>"));
        let html = doc.content("c").unwrap();
        assert_eq!(html.html().map(|h| h.matches("chart-error").count()), Some(1));
        assert!(html.html().unwrap().contains("<p>Lỗi &lt;x&gt;</p>"));
    }

    #[test]
    fn missing_container_is_ignored() {
        let doc = Document::new();
        assert!(!show_loading(&doc, "nope", &Locale::en_us()));
        assert!(!show_error(&doc, "nope", "x"));
    }
}
