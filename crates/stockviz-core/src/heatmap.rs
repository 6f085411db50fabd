// File: crates/stockviz-core/src/heatmap.rs
// Summary: Year x month return grid laid out on band scales and rendered as an SVG document.

use std::fmt::Write as _;

use crate::format::{escape_html, Locale};
use crate::geometry::Rect;
use crate::palette::{self, Rgba};
use crate::scale::BandScale;
use crate::theme::{Theme, FONT_FAMILY};
use crate::types::Insets;

/// Plot margins around the grid: left, right, top, bottom.
pub const MARGIN: Insets = Insets::new(50, 25, 50, 30);
pub const BAND_PADDING: f32 = 0.05;
pub const LEGEND_WIDTH: f32 = 200.0;
pub const LEGEND_HEIGHT: f32 = 20.0;
/// Room below the grid for the month axis and the legend.
const LEGEND_SPACE: f32 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct HeatCell {
    pub year: i32,
    /// 1-based.
    pub month: u32,
    /// Fractional return (0.0523 = 5.23%).
    pub value: f64,
    /// Text printed inside the cell.
    pub label: String,
}

impl HeatCell {
    pub fn new(year: i32, month: u32, value: f64, label: impl Into<String>) -> Self {
        Self { year, month, value, label: label.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorScale {
    /// Red-yellow-green over `[lo, hi]`, clamped.
    Continuous { lo: f64, hi: f64 },
    /// Five discrete buckets.
    Buckets,
}

impl Default for ColorScale {
    fn default() -> Self {
        ColorScale::Continuous { lo: -0.1, hi: 0.1 }
    }
}

impl ColorScale {
    pub fn color(&self, value: f64) -> Rgba {
        match *self {
            ColorScale::Continuous { lo, hi } => palette::heatmap_scale_color(value, lo, hi),
            ColorScale::Buckets => palette::heatmap_bucket_color(value),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatmapLayout {
    pub width: f32,
    pub height: f32,
    /// Grid area inside the margins.
    pub inner: Rect,
    pub x: BandScale,
    pub y: BandScale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Heatmap {
    pub cells: Vec<HeatCell>,
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    /// Twelve names, January first.
    pub month_names: Vec<String>,
    pub title: Option<String>,
    pub color_scale: ColorScale,
    pub theme: Theme,
    /// Cell index drawn with the highlight stroke.
    pub hover: Option<usize>,
}

impl Heatmap {
    pub fn new(cells: Vec<HeatCell>, years: Vec<i32>, months: Vec<u32>, month_names: Vec<String>) -> Self {
        Self {
            cells,
            years,
            months,
            month_names,
            title: None,
            color_scale: ColorScale::default(),
            theme: Theme::default(),
            hover: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grid height for `years` rows, never below 300.
    pub fn grid_height(years: usize) -> f32 {
        (years as f32 * 30.0).max(300.0)
    }

    /// Full document height: grid plus the legend strip.
    pub fn height_for(years: usize) -> f32 {
        Self::grid_height(years) + LEGEND_SPACE
    }

    pub fn layout(&self, width: f32) -> HeatmapLayout {
        let grid_h = Self::grid_height(self.years.len());
        let inner = Rect::from_ltrb(
            MARGIN.left as f32,
            MARGIN.top as f32,
            (width - MARGIN.right as f32).max(MARGIN.left as f32),
            grid_h - MARGIN.bottom as f32,
        );
        HeatmapLayout {
            width,
            height: Self::height_for(self.years.len()),
            inner,
            x: BandScale::new(self.months.len(), (inner.left, inner.right), BAND_PADDING),
            y: BandScale::new(self.years.len(), (inner.top, inner.bottom), BAND_PADDING),
        }
    }

    /// Full month name for 1-based `month`.
    pub fn month_name(&self, month: u32) -> String {
        month
            .checked_sub(1)
            .and_then(|i| self.month_names.get(i as usize))
            .cloned()
            .unwrap_or_else(|| month.to_string())
    }

    /// Axis labels: the first three characters of each month name, unless
    /// that makes labels collide, in which case the full names are used.
    pub fn month_labels(&self) -> Vec<String> {
        let full: Vec<String> = self.months.iter().map(|&m| self.month_name(m)).collect();
        let short: Vec<String> = full.iter().map(|n| n.chars().take(3).collect()).collect();
        let mut seen = std::collections::HashSet::new();
        if short.iter().all(|s| seen.insert(s.as_str())) { short } else { full }
    }

    fn cell_rect(&self, layout: &HeatmapLayout, cell: &HeatCell) -> Option<Rect> {
        let xi = self.months.iter().position(|&m| m == cell.month)?;
        let yi = self.years.iter().position(|&y| y == cell.year)?;
        Some(Rect::from_ltwh(layout.x.position(xi), layout.y.position(yi), layout.x.bandwidth, layout.y.bandwidth))
    }

    /// Index of the cell under `(px, py)` for a document `width` wide.
    pub fn cell_at(&self, width: f32, px: f32, py: f32) -> Option<usize> {
        let layout = self.layout(width);
        let month = *self.months.get(layout.x.index_at(px)?)?;
        let year = *self.years.get(layout.y.index_at(py)?)?;
        // Later cells paint over earlier ones.
        self.cells.iter().rposition(|c| c.year == year && c.month == month)
    }

    /// Tooltip rows: year, month name, formatted return.
    pub fn tooltip_rows(&self, index: usize, locale: &Locale) -> Option<Vec<(String, String)>> {
        let cell = self.cells.get(index)?;
        let s = &locale.strings;
        Some(vec![
            (s.year.to_string(), cell.year.to_string()),
            (s.month.to_string(), self.month_name(cell.month)),
            (s.monthly_return.to_string(), cell.label.clone()),
        ])
    }

    pub fn to_svg(&self, width: f32, locale: &Locale) -> String {
        let layout = self.layout(width);
        let inner = layout.inner;
        let mut out = String::with_capacity(4096 + self.cells.len() * 256);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
            w = fmt_px(layout.width),
            h = fmt_px(layout.height),
            font = escape_html(FONT_FAMILY),
        );
        let _ = write!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, self.theme.background.css());

        let text = self.theme.text.css();
        if let Some(title) = &self.title {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="16" font-weight="bold" fill="{text}">{}</text>"#,
                fmt_px((inner.left + inner.right) * 0.5),
                fmt_px(MARGIN.top as f32 * 0.5),
                escape_html(title),
            );
        }

        // Month axis.
        let _ = write!(out, r#"<g class="x-axis" font-size="12" fill="{text}" text-anchor="middle">"#);
        for (i, label) in self.month_labels().iter().enumerate() {
            let x = layout.x.position(i) + layout.x.bandwidth * 0.5;
            let _ = write!(out, r#"<text x="{}" y="{}">{}</text>"#, fmt_px(x), fmt_px(inner.bottom + 16.0), escape_html(label));
        }
        out.push_str("</g>");

        // Year axis.
        let _ = write!(out, r#"<g class="y-axis" font-size="12" fill="{text}" text-anchor="end">"#);
        for (i, year) in self.years.iter().enumerate() {
            let y = layout.y.position(i) + layout.y.bandwidth * 0.5;
            let _ = write!(out, r#"<text x="{}" y="{}" dominant-baseline="middle">{year}</text>"#, fmt_px(inner.left - 6.0), fmt_px(y));
        }
        out.push_str("</g>");

        out.push_str(r#"<g class="cells">"#);
        for (i, cell) in self.cells.iter().enumerate() {
            let Some(r) = self.cell_rect(&layout, cell) else { continue };
            let (stroke, stroke_w) = if self.hover == Some(i) {
                (self.theme.highlight_stroke, 2)
            } else {
                (self.theme.cell_stroke, 1)
            };
            let _ = write!(
                out,
                r#"<rect data-index="{i}" x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{stroke_w}"/>"#,
                fmt_px(r.left),
                fmt_px(r.top),
                fmt_px(r.width()),
                fmt_px(r.height()),
                self.color_scale.color(cell.value).css(),
                stroke.css(),
            );
            let fill = if cell.value.abs() > 0.05 { "white" } else { "black" };
            let (cx, cy) = r.center();
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="10" fill="{fill}">{}</text>"#,
                fmt_px(cx),
                fmt_px(cy),
                escape_html(&cell.label),
            );
        }
        out.push_str("</g>");

        self.write_legend(&mut out, &layout, locale);
        out.push_str("</svg>");
        out
    }

    fn write_legend(&self, out: &mut String, layout: &HeatmapLayout, locale: &Locale) {
        let inner = layout.inner;
        let left = inner.left + (inner.width() - LEGEND_WIDTH) * 0.5;
        let top = inner.bottom + 24.0;
        let text = self.theme.text.css();
        let _ = write!(out, r#"<g class="legend" transform="translate({},{})">"#, fmt_px(left), fmt_px(top));
        match self.color_scale {
            ColorScale::Continuous { lo, hi } => {
                out.push_str(r#"<defs><linearGradient id="linear-gradient">"#);
                for (offset, v) in [("0%", lo), ("50%", (lo + hi) * 0.5), ("100%", hi)] {
                    let _ = write!(out, r#"<stop offset="{offset}" stop-color="{}"/>"#, palette::heatmap_scale_color(v, lo, hi).css());
                }
                out.push_str("</linearGradient></defs>");
                let _ = write!(out, r#"<rect width="{}" height="{}" fill="url(#linear-gradient)"/>"#, fmt_px(LEGEND_WIDTH), fmt_px(LEGEND_HEIGHT));
                for i in 0..5 {
                    let t = i as f64 / 4.0;
                    let x = LEGEND_WIDTH * t as f32;
                    let v = lo + (hi - lo) * t;
                    let _ = write!(
                        out,
                        r#"<text x="{}" y="{}" font-size="10" text-anchor="middle" fill="{text}">{}</text>"#,
                        fmt_px(x),
                        fmt_px(LEGEND_HEIGHT + 12.0),
                        escape_html(&locale.format_percent(v)),
                    );
                }
            }
            ColorScale::Buckets => {
                let w = LEGEND_WIDTH / 5.0;
                let samples = [-0.06, -0.03, 0.0, 0.03, 0.06];
                let labels = ["< -5%", "-5% .. -2%", "-2% .. 2%", "2% .. 5%", "> 5%"];
                for (i, (v, label)) in samples.iter().zip(labels).enumerate() {
                    let x = w * i as f32;
                    let _ = write!(
                        out,
                        r#"<rect x="{}" width="{}" height="{}" fill="{}"/><text x="{}" y="{}" font-size="9" text-anchor="middle" fill="{text}">{}</text>"#,
                        fmt_px(x),
                        fmt_px(w),
                        fmt_px(LEGEND_HEIGHT),
                        palette::heatmap_bucket_color(*v).css(),
                        fmt_px(x + w * 0.5),
                        fmt_px(LEGEND_HEIGHT + 12.0),
                        escape_html(label),
                    );
                }
            }
        }
        out.push_str("</g>");
    }
}

/// Pixel value with at most two decimals and no trailing zeros.
fn fmt_px(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
