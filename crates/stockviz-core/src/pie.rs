// File: crates/stockviz-core/src/pie.rs
// Summary: Pie and doughnut charts with angle-based hit testing and Skia rendering; legend right or below.

use anyhow::Result;
use skia_safe as skia;

use crate::chart::{encode_png, read_rgba8, RenderOptions};
use crate::geometry::Rect;
use crate::palette::{self, Rgba};
use crate::text::{Anchor, TextShaper};
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub label: String,
    /// Share in percent; non-positive values take no angle.
    pub value: f64,
    pub color: Rgba,
    pub border: Rgba,
}

/// Where the pie and its legend land for one render size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieLayout {
    pub center: (f32, f32),
    pub radius: f32,
    pub legend: Rect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendPosition {
    #[default]
    Right,
    /// One centered row under the pie.
    Bottom,
}

pub struct PieChart {
    pub slices: Vec<Slice>,
    pub title: Option<String>,
    pub theme: Theme,
    /// Inner radius as a fraction of the outer one; 0 is a full pie.
    pub cutout: f32,
    pub legend: LegendPosition,
}

const TITLE_HEIGHT: f32 = 36.0;
const LEGEND_ROW: f32 = 20.0;
/// Swatch plus gap before the label.
const LEGEND_SWATCH: f32 = 18.0;
const LEGEND_GAP: f32 = 16.0;

impl PieChart {
    /// Slices in input order, colored by cycling the fixed palette.
    pub fn new<S: Into<String>>(items: impl IntoIterator<Item = (S, f64)>) -> Self {
        let slices = items
            .into_iter()
            .enumerate()
            .map(|(i, (label, value))| Slice {
                label: label.into(),
                value,
                color: palette::pie_color(i),
                border: palette::pie_border(i),
            })
            .collect();
        Self { slices, title: None, theme: Theme::default(), cutout: 0.0, legend: LegendPosition::Right }
    }

    /// Doughnut with the usual half-radius hole.
    pub fn doughnut<S: Into<String>>(items: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self::new(items).with_cutout(0.5)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Inner radius fraction, clamped to `[0, 0.95]`.
    pub fn with_cutout(mut self, cutout: f32) -> Self {
        self.cutout = if cutout.is_finite() { cutout.clamp(0.0, 0.95) } else { 0.0 };
        self
    }

    /// Replace the palette colors slice by slice; borders follow the fill, opaque.
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Rgba>) -> Self {
        for (slice, color) in self.slices.iter_mut().zip(colors) {
            slice.color = color;
            slice.border = color.with_alpha(1.0);
        }
        self
    }

    pub fn with_legend(mut self, legend: LegendPosition) -> Self {
        self.legend = legend;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value.max(0.0)).sum()
    }

    /// `(start, sweep)` in degrees per slice, measured clockwise from 12 o'clock.
    pub fn slice_angles(&self) -> Vec<(f32, f32)> {
        let total = self.total();
        let mut start = 0.0f32;
        self.slices
            .iter()
            .map(|s| {
                let sweep = if total > 0.0 { (s.value.max(0.0) / total * 360.0) as f32 } else { 0.0 };
                let out = (start, sweep);
                start += sweep;
                out
            })
            .collect()
    }

    pub fn layout(&self, opts: &RenderOptions) -> PieLayout {
        let w = opts.width as f32;
        let h = opts.height as f32;
        let top = if self.title.is_some() { TITLE_HEIGHT } else { 0.0 };
        let (area, legend) = match self.legend {
            LegendPosition::Right => {
                let legend_w = (w * 0.35).min(220.0);
                let rows = self.slices.len() as f32 * LEGEND_ROW;
                let legend_top = top + ((h - top - rows) * 0.5).max(0.0);
                (
                    Rect::from_ltrb(0.0, top, w - legend_w, h),
                    Rect::from_ltwh(w - legend_w + 8.0, legend_top, legend_w - 16.0, rows),
                )
            }
            LegendPosition::Bottom => {
                let legend_top = (h - LEGEND_ROW - 8.0).max(top);
                (Rect::from_ltrb(0.0, top, w, legend_top), Rect::from_ltwh(8.0, legend_top, (w - 16.0).max(0.0), LEGEND_ROW))
            }
        };
        let radius = (area.width().min(area.height()) * 0.5 - 10.0).max(1.0);
        PieLayout { center: area.center(), radius, legend }
    }

    /// Slice under `(x, y)`, if any.
    pub fn slice_at(&self, opts: &RenderOptions, x: f32, y: f32) -> Option<usize> {
        let layout = self.layout(opts);
        let dx = x - layout.center.0;
        let dy = y - layout.center.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > layout.radius || dist < layout.radius * self.cutout {
            return None;
        }
        // atan2 of (dx, -dy) measures clockwise from straight up.
        let mut angle = dx.atan2(-dy).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        self.slice_angles()
            .iter()
            .position(|&(start, sweep)| sweep > 0.0 && angle >= start && angle < start + sweep)
    }

    /// Tooltip row for a slice: `(label, "value%")`.
    pub fn tooltip_row(&self, index: usize) -> Option<(String, String)> {
        self.slices.get(index).map(|s| (s.label.clone(), format!("{}%", s.value)))
    }

    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        self.render_hovered_png(opts, None)
    }

    /// PNG with the `hover` slice popped out.
    pub fn render_hovered_png(&self, opts: &RenderOptions, hover: Option<usize>) -> Result<Vec<u8>> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        self.draw(surface.canvas(), opts, hover);
        encode_png(&mut surface)
    }

    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        self.draw(surface.canvas(), opts, None);
        read_rgba8(&mut surface, opts.width, opts.height)
    }

    /// Draw the pie; `hover` pops the hovered slice outwards slightly.
    pub fn draw(&self, canvas: &skia::Canvas, opts: &RenderOptions, hover: Option<usize>) {
        canvas.clear(self.theme.background.to_skia());
        let layout = self.layout(opts);
        let (cx, cy) = layout.center;

        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_style(skia::paint::Style::Fill);
        let mut stroke = skia::Paint::default();
        stroke.set_anti_alias(true);
        stroke.set_style(skia::paint::Style::Stroke);
        stroke.set_stroke_width(1.0);

        for (i, (slice, (start, sweep))) in self.slices.iter().zip(self.slice_angles()).enumerate() {
            if sweep <= 0.0 {
                continue;
            }
            let r = if hover == Some(i) { layout.radius + 4.0 } else { layout.radius };
            let oval = skia::Rect::from_ltrb(cx - r, cy - r, cx + r, cy + r);
            let mut path = skia::Path::new();
            if sweep >= 359.99 {
                path.add_oval(oval, None);
            } else {
                path.move_to((cx, cy));
                // Skia angles start at 3 o'clock.
                path.arc_to(oval, start - 90.0, sweep, false);
                path.close();
            }
            fill.set_color(slice.color.to_skia());
            stroke.set_color(slice.border.to_skia());
            canvas.draw_path(&path, &fill);
            canvas.draw_path(&path, &stroke);
        }

        if self.cutout > 0.0 {
            fill.set_color(self.theme.background.to_skia());
            canvas.draw_circle((cx, cy), layout.radius * self.cutout, &fill);
        }

        if !opts.draw_labels {
            return;
        }
        let shaper = TextShaper::new();
        if let Some(title) = &self.title {
            shaper.draw_styled(canvas, title, opts.width as f32 * 0.5, 24.0, 16.0, self.theme.text, Anchor::Middle, true);
        }
        let size = self.theme.font_size;
        let widths: Vec<f32> = self.slices.iter().map(|s| shaper.measure_width(&s.label, size)).collect();
        let legend = layout.legend;
        let mut x = match self.legend {
            LegendPosition::Right => legend.left,
            LegendPosition::Bottom => {
                let total: f32 = widths.iter().map(|w| LEGEND_SWATCH + w).sum::<f32>()
                    + LEGEND_GAP * self.slices.len().saturating_sub(1) as f32;
                legend.left + ((legend.width() - total) * 0.5).max(0.0)
            }
        };
        for (i, (slice, w)) in self.slices.iter().zip(&widths).enumerate() {
            let y = match self.legend {
                LegendPosition::Right => legend.top + i as f32 * LEGEND_ROW,
                LegendPosition::Bottom => legend.top,
            };
            fill.set_color(slice.color.to_skia());
            canvas.draw_rect(skia::Rect::from_xywh(x, y + 4.0, 12.0, 12.0), &fill);
            shaper.draw(canvas, &slice.label, x + LEGEND_SWATCH, y + 14.0, size, self.theme.text, Anchor::Start);
            if self.legend == LegendPosition::Bottom {
                x += LEGEND_SWATCH + w + LEGEND_GAP;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pie() -> PieChart {
        PieChart::new(vec![("A", 50.0), ("B", 25.0), ("C", 25.0)])
    }

    #[test]
    fn angles_start_at_twelve_clockwise() {
        assert_eq!(pie().slice_angles(), vec![(0.0, 180.0), (180.0, 90.0), (270.0, 90.0)]);
    }

    #[test]
    fn hit_test_by_quadrant() {
        let p = pie();
        let opts = RenderOptions::sized(600, 400);
        let l = p.layout(&opts);
        let (cx, cy) = l.center;
        let d = l.radius * 0.5;
        assert_eq!(p.slice_at(&opts, cx + d, cy), Some(0)); // 3 o'clock
        assert_eq!(p.slice_at(&opts, cx - d, cy + 1.0), Some(1)); // just below 9 o'clock
        assert_eq!(p.slice_at(&opts, cx - d, cy - 1.0), Some(2));
        assert_eq!(p.slice_at(&opts, cx + l.radius + 5.0, cy), None);
    }

    #[test]
    fn doughnut_hole_is_not_a_slice() {
        let d = PieChart::doughnut(vec![("A", 50.0), ("B", 50.0)]);
        assert_eq!(d.cutout, 0.5);
        let opts = RenderOptions::sized(600, 400);
        let l = d.layout(&opts);
        let (cx, cy) = l.center;
        assert_eq!(d.slice_at(&opts, cx + l.radius * 0.3, cy), None);
        assert_eq!(d.slice_at(&opts, cx + l.radius * 0.75, cy), Some(0));
        assert_eq!(d.slice_at(&opts, cx - l.radius * 0.75, cy), Some(1));
        assert_eq!(PieChart::new(vec![("A", 1.0)]).with_cutout(3.0).cutout, 0.95);
        assert_eq!(PieChart::new(vec![("A", 1.0)]).with_cutout(f32::NAN).cutout, 0.0);
    }

    #[test]
    fn bottom_legend_frees_the_width() {
        let opts = RenderOptions::sized(600, 400);
        let right = pie().layout(&opts);
        let bottom = pie().with_legend(LegendPosition::Bottom).layout(&opts);
        assert_eq!(bottom.center.0, 300.0);
        assert!(bottom.center.0 > right.center.0);
        assert_eq!(bottom.legend.top, 400.0 - LEGEND_ROW - 8.0);
        assert!(bottom.center.1 + bottom.radius <= bottom.legend.top);
    }

    #[test]
    fn explicit_colors_override_the_palette() {
        let p = pie().with_colors([palette::SENTIMENT_POSITIVE, palette::SENTIMENT_NEUTRAL]);
        assert_eq!(p.slices[0].color, palette::SENTIMENT_POSITIVE);
        assert_eq!(p.slices[1].border, palette::SENTIMENT_NEUTRAL);
        assert_eq!(p.slices[2].color, palette::pie_color(2));
    }

    #[test]
    fn palette_cycles_and_tooltip_reads_percent() {
        let p = PieChart::new((0..12).map(|i| (format!("s{i}"), 1.0)));
        assert_eq!(p.slices[10].color, p.slices[0].color);
        assert_eq!(p.slices[0].border, palette::PIE_PALETTE[0].with_alpha(1.0));
        assert_eq!(pie().tooltip_row(0), Some(("A".to_string(), "50%".to_string())));
        assert_eq!(PieChart::new(vec![("x", 12.5)]).tooltip_row(0), Some(("x".to_string(), "12.5%".to_string())));
    }
}
