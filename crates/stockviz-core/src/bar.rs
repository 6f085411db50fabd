// File: crates/stockviz-core/src/bar.rs
// Summary: Category bar chart (counts per label) with a zero-based value axis, hit testing and Skia rendering.

use anyhow::Result;
use skia_safe as skia;

use crate::chart::{encode_png, read_rgba8, RenderOptions};
use crate::format::Locale;
use crate::geometry::Rect;
use crate::grid::nice_ticks;
use crate::palette::{self, Rgba};
use crate::scale::{BandScale, ValueScale};
use crate::text::{Anchor, TextShaper};
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Rgba,
}

/// Where bars and ticks land for one render size.
#[derive(Clone, Debug)]
pub struct BarLayout {
    pub plot: Rect,
    pub bands: BandScale,
    pub scale: ValueScale,
    pub ticks: Vec<f64>,
}

impl BarLayout {
    /// Top and bottom pixel of bar `value`, ordered.
    pub fn bar_span(&self, value: f64) -> (f32, f32) {
        let y = self.scale.to_px(value);
        let base = self.scale.to_px(0.0);
        (y.min(base), y.max(base))
    }
}

pub struct BarChart {
    pub bars: Vec<Bar>,
    pub title: Option<String>,
    pub theme: Theme,
    pub locale: Locale,
    /// What the values count; the tooltip's value row.
    pub value_label: Option<String>,
}

const TITLE_HEIGHT: f32 = 36.0;
/// Bars fill 72% of their category slot.
const BAR_PADDING: f32 = 0.28;

impl BarChart {
    /// Bars in input order, colored by cycling the bar palette.
    pub fn new<S: Into<String>>(items: impl IntoIterator<Item = (S, f64)>) -> Self {
        let bars = items
            .into_iter()
            .enumerate()
            .map(|(i, (label, value))| Bar { label: label.into(), value, color: palette::bar_color(i) })
            .collect();
        Self { bars, title: None, theme: Theme::default(), locale: Locale::default(), value_label: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_value_label(mut self, label: impl Into<String>) -> Self {
        self.value_label = Some(label.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn layout(&self, opts: &RenderOptions) -> BarLayout {
        let mut plot = opts.plot_rect();
        if self.title.is_some() {
            plot.top = plot.top.max(TITLE_HEIGHT);
        }
        let finite = || self.bars.iter().map(|b| b.value).filter(|v| v.is_finite());
        let lo = finite().fold(0.0_f64, f64::min);
        let hi = finite().fold(0.0_f64, f64::max);
        let hi = if hi - lo < 1e-12 { lo + 1.0 } else { hi };
        let ticks = nice_ticks(lo, hi, 5);
        // Extend to the next tick when the data runs past the last one.
        let step = match ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        };
        let top_tick = ticks.last().copied().unwrap_or(hi);
        let vmax = if top_tick < hi { top_tick + step } else { top_tick };
        let bottom_tick = ticks.first().copied().unwrap_or(lo);
        let vmin = if bottom_tick > lo { bottom_tick - step } else { bottom_tick };
        let ticks = if vmax > top_tick { ticks.into_iter().chain(std::iter::once(vmax)).collect() } else { ticks };
        let ticks = if vmin < bottom_tick { std::iter::once(vmin).chain(ticks).collect() } else { ticks };

        BarLayout {
            bands: BandScale::new(self.bars.len(), (plot.left, plot.right), BAR_PADDING),
            scale: ValueScale::new_linear(plot.top, plot.bottom, vmin, vmax),
            ticks,
            plot,
        }
    }

    /// Bar under `(x, y)`; the gaps and the space above a bar do not count.
    pub fn bar_at(&self, opts: &RenderOptions, x: f32, y: f32) -> Option<usize> {
        let layout = self.layout(opts);
        if !layout.plot.contains(x, y) {
            return None;
        }
        let index = layout.bands.index_at(x)?;
        let (top, bottom) = layout.bar_span(self.bars[index].value);
        (y >= top && y <= bottom).then_some(index)
    }

    /// `(category label, name)` then `(value label, count)`.
    pub fn tooltip_rows(&self, index: usize, category_label: &str) -> Option<Vec<(String, String)>> {
        let bar = self.bars.get(index)?;
        let value_label = self.value_label.clone().unwrap_or_default();
        Some(vec![
            (category_label.to_string(), bar.label.clone()),
            (value_label, self.format_value(bar.value)),
        ])
    }

    /// Whole counts print without decimals.
    fn format_value(&self, value: f64) -> String {
        let decimals = if (value - value.round()).abs() < 1e-9 { 0 } else { 2 };
        self.locale.format_number(value, decimals)
    }

    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        self.render_hovered_png(opts, None)
    }

    /// PNG with the `hover` bar outlined.
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

    pub fn draw(&self, canvas: &skia::Canvas, opts: &RenderOptions, hover: Option<usize>) {
        canvas.clear(self.theme.background.to_skia());
        let layout = self.layout(opts);
        let plot = &layout.plot;
        let shaper = opts.draw_labels.then(TextShaper::new);
        let size = self.theme.font_size;

        let mut grid = skia::Paint::default();
        grid.set_color(self.theme.grid.to_skia());
        grid.set_anti_alias(true);
        grid.set_stroke_width(1.0);
        for &v in &layout.ticks {
            let y = layout.scale.to_px(v);
            canvas.draw_line((plot.left, y), (plot.right, y), &grid);
            if let Some(shaper) = &shaper {
                shaper.draw(canvas, &self.format_value(v), plot.right + 6.0, y + 4.0, size, self.theme.text, Anchor::Start);
            }
        }

        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_style(skia::paint::Style::Fill);
        let mut border = skia::Paint::default();
        border.set_anti_alias(true);
        border.set_style(skia::paint::Style::Stroke);

        for (i, bar) in self.bars.iter().enumerate() {
            let left = layout.bands.position(i);
            let right = left + layout.bands.bandwidth;
            if bar.value.is_finite() {
                let (top, bottom) = layout.bar_span(bar.value);
                let rect = skia::Rect::from_ltrb(left, top, right, bottom.max(top + 1.0));
                fill.set_color(bar.color.to_skia());
                canvas.draw_rect(rect, &fill);
                border.set_color(bar.color.with_alpha(1.0).to_skia());
                border.set_stroke_width(if hover == Some(i) { 2.0 } else { 1.0 });
                canvas.draw_rect(rect, &border);
            }
            if let Some(shaper) = &shaper {
                shaper.draw(canvas, &bar.label, left + layout.bands.bandwidth * 0.5, plot.bottom + 18.0, size, self.theme.text, Anchor::Middle);
            }
        }

        let mut axis = skia::Paint::default();
        axis.set_color(self.theme.scale_border.to_skia());
        axis.set_anti_alias(true);
        axis.set_stroke_width(1.0);
        let base = layout.scale.to_px(0.0);
        canvas.draw_line((plot.left, base), (plot.right, base), &axis);
        canvas.draw_line((plot.right, plot.top), (plot.right, plot.bottom), &axis);

        if let (Some(shaper), Some(title)) = (&shaper, &self.title) {
            shaper.draw_styled(canvas, title, opts.width as f32 * 0.5, 24.0, 16.0, self.theme.text, Anchor::Middle, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> BarChart {
        BarChart::new(vec![("CafeF", 30.0), ("VnExpress", 12.0), ("TNCK", 7.0)])
    }

    #[test]
    fn axis_starts_at_zero_and_ends_on_a_tick() {
        let l = sources().layout(&RenderOptions::sized(600, 300));
        assert_eq!(l.scale.vmin, 0.0);
        assert!(l.scale.vmax >= 30.0);
        assert_eq!(l.ticks.first(), Some(&0.0));
        assert_eq!(l.ticks.last(), Some(&l.scale.vmax));
        let (top, bottom) = l.bar_span(30.0);
        assert!(top >= l.plot.top && (bottom - l.scale.to_px(0.0)).abs() < 1e-4);
    }

    #[test]
    fn hit_test_needs_the_bar_itself() {
        let chart = sources();
        let opts = RenderOptions::sized(600, 300);
        let l = chart.layout(&opts);
        let mid = |i: usize| l.bands.position(i) + l.bands.bandwidth * 0.5;
        let (top, bottom) = l.bar_span(7.0);
        assert_eq!(chart.bar_at(&opts, mid(2), (top + bottom) * 0.5), Some(2));
        // Above the short bar, below the plot top.
        assert_eq!(chart.bar_at(&opts, mid(2), top - 10.0), None);
        // In the gap between bars.
        assert_eq!(chart.bar_at(&opts, l.bands.position(1) - 1.0, bottom - 1.0), None);
    }

    #[test]
    fn palette_cycles_and_tooltip_counts() {
        let chart = BarChart::new((0..7).map(|i| (format!("s{i}"), i as f64))).with_value_label("Articles");
        assert_eq!(chart.bars[5].color, chart.bars[0].color);
        assert_eq!(
            chart.tooltip_rows(3, "Source"),
            Some(vec![("Source".to_string(), "s3".to_string()), ("Articles".to_string(), "3".to_string())])
        );
        assert_eq!(chart.tooltip_rows(9, "Source"), None);
        let vi = BarChart::new(vec![("a", 1234.5)]);
        assert_eq!(vi.tooltip_rows(0, "Nguồn").unwrap()[1].1, "1.234,50");
    }

    #[test]
    fn empty_and_flat_data_still_lay_out() {
        let l = BarChart::new(Vec::<(String, f64)>::new()).layout(&RenderOptions::sized(300, 200));
        assert_eq!(l.scale.vmin, 0.0);
        assert!((l.scale.vmax - 1.0).abs() < 1e-9);
        let l = BarChart::new(vec![("a", 0.0)]).layout(&RenderOptions::sized(300, 200));
        assert!(l.scale.vmax > l.scale.vmin);
    }
}
