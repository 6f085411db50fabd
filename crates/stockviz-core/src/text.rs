// File: crates/stockviz-core/src/text.rs
// Summary: Label shaping and drawing via Skia textlayout; handles Vietnamese diacritics through font fallback.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};

use crate::palette::Rgba;

/// Horizontal anchor of a label relative to its x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: Rgba, bold: bool) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color.to_skia());
        ts.set_font_families(&["Segoe UI", "Tahoma", "Verdana", "Noto Sans", "DejaVu Sans", "sans-serif"]);
        if bold {
            ts.set_font_style(skia::FontStyle::bold());
        }
        ts
    }

    pub fn layout(&self, text: &str, size: f32, color: Rgba, bold: bool) -> Paragraph {
        let pstyle = ParagraphStyle::new();
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, color, bold));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size, Rgba::rgba(0, 0, 0, 0.0), false).longest_line()
    }

    /// Draw `text` with its baseline at `y`, anchored horizontally at `x`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: Rgba, anchor: Anchor) {
        self.draw_styled(canvas, text, x, y, size, color, anchor, false);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_styled(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: Rgba, anchor: Anchor, bold: bool) {
        let p = self.layout(text, size, color, bold);
        let w = p.longest_line();
        let left = match anchor {
            Anchor::Start => x,
            Anchor::Middle => x - w * 0.5,
            Anchor::End => x - w,
        };
        // Paragraph draws from top-left; shift by the first line's ascent.
        p.paint(canvas, (left, y - p.alphabetic_baseline()));
    }
}
