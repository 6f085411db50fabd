// File: crates/stockviz-core/src/chart.rs
// Summary: Time-series chart (line, candles, volume histograms) and headless rendering using Skia CPU raster surfaces.

use anyhow::Result;
use skia_safe as skia;

use crate::format::{format_tick, Locale};
use crate::geometry::Rect;
use crate::grid::{label_stride, nice_ticks};
use crate::palette::Rgba;
use crate::scale::{ScaleMargins, TimeScale, ValueScale};
use crate::series::{PriceScaleId, Series, SeriesKind, SeriesValue, Time};
use crate::text::{Anchor, TextShaper};
use crate::theme::Theme;
use crate::types::{Insets, HEIGHT, WIDTH};

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    /// Axis labels, legend and title. Off for pixel-exact snapshots.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, insets: Insets::default(), draw_labels: true }
    }
}

impl RenderOptions {
    pub fn sized(width: i32, height: i32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn plot_rect(&self) -> Rect {
        Rect::from_ltrb(
            self.insets.left as f32,
            self.insets.top as f32,
            (self.width - self.insets.right as i32) as f32,
            (self.height - self.insets.bottom as i32) as f32,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: Rgba,
}

impl LegendItem {
    pub fn new(label: impl Into<String>, color: Rgba) -> Self {
        Self { label: label.into(), color }
    }
}

/// Snapped crosshair position with the value of every series at that bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Crosshair {
    pub index: usize,
    pub time: Time,
    /// Bar center.
    pub x: f32,
    pub y: f32,
    pub values: Vec<(String, SeriesValue)>,
}

impl Crosshair {
    pub fn value_of(&self, series_id: &str) -> Option<SeriesValue> {
        self.values.iter().find(|(id, _)| id == series_id).map(|(_, v)| *v)
    }
}

/// Pixel mapping for one render size.
#[derive(Clone, Debug)]
pub struct Layout {
    pub plot: Rect,
    /// Union of all series times, ascending and unique.
    pub times: Vec<Time>,
    pub time_scale: TimeScale,
    scales: Vec<(PriceScaleId, ValueScale)>,
}

impl Layout {
    pub fn value_scale(&self, id: &PriceScaleId) -> Option<&ValueScale> {
        self.scales.iter().find(|(sid, _)| sid == id).map(|(_, s)| s)
    }

    pub fn index_of(&self, time: Time) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }

    pub fn x_of(&self, time: Time) -> Option<f32> {
        self.index_of(time).map(|i| self.time_scale.bar_center(i))
    }
}

pub struct Chart {
    pub series: Vec<Series>,
    pub theme: Theme,
    pub locale: Locale,
    pub legend: Vec<LegendItem>,
    pub title: Option<String>,
    /// Pointer position in surface pixels; drawn as a dashed crosshair.
    pub crosshair: Option<(f32, f32)>,
    /// Fixed price-axis ticks with their labels; empty means automatic ticks.
    pub value_labels: Vec<(f64, String)>,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            theme: Theme::default(),
            locale: Locale::default(),
            legend: Vec::new(),
            title: None,
            crosshair: None,
            value_labels: Vec::new(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn series(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }

    pub fn layout(&self, opts: &RenderOptions) -> Layout {
        let plot = opts.plot_rect();

        let mut times: Vec<Time> = self.series.iter().flat_map(|s| s.times()).collect();
        times.sort_unstable();
        times.dedup();
        let time_scale = TimeScale::fit(plot.left, plot.width(), times.len());

        let mut scales: Vec<(PriceScaleId, ValueScale)> = Vec::new();
        let mut ids: Vec<(PriceScaleId, ScaleMargins)> = Vec::new();
        for s in &self.series {
            if !ids.iter().any(|(id, _)| *id == s.price_scale) {
                ids.push((s.price_scale.clone(), s.margins));
            }
        }
        for (id, margins) in ids {
            let range = self
                .series
                .iter()
                .filter(|s| s.price_scale == id)
                .filter_map(Series::value_range)
                .fold(None, |acc: Option<(f64, f64)>, (lo, hi)| match acc {
                    Some((a, b)) => Some((a.min(lo), b.max(hi))),
                    None => Some((lo, hi)),
                });
            let (lo, hi) = range.unwrap_or((0.0, 1.0));
            scales.push((id, ValueScale::with_margins(plot.top, plot.bottom, lo, hi, margins)));
        }

        Layout { plot, times, time_scale, scales }
    }

    /// Snap the pointer at `(x, y)` to the nearest bar; `None` outside the plot or over an empty chart.
    pub fn crosshair_at(&self, opts: &RenderOptions, x: f32, y: f32) -> Option<Crosshair> {
        let layout = self.layout(opts);
        if !layout.plot.contains(x, y) {
            return None;
        }
        let n = layout.times.len();
        let index = layout.time_scale.bar_at(x, n).or_else(|| {
            // The right plot edge is inclusive.
            (n > 0 && x >= layout.plot.right).then(|| n - 1)
        })?;
        let time = layout.times[index];
        let values = self
            .series
            .iter()
            .filter_map(|s| s.value_at(time).map(|v| (s.id.clone(), v)))
            .collect();
        Some(Crosshair { index, time, x: layout.time_scale.bar_center(index), y, values })
    }

    /// Render the chart into an encoded PNG buffer.
    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        self.draw(surface.canvas(), opts);
        encode_png(&mut surface)
    }

    /// Render the chart to a PNG at `output_png_path`.
    pub fn render_to_png(&self, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(opts)?;
        if let Some(parent) = output_png_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_png_path, bytes)?;
        Ok(())
    }

    /// Render to unpremultiplied RGBA8 pixels: `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        self.draw(surface.canvas(), opts);
        read_rgba8(&mut surface, opts.width, opts.height)
    }

    pub fn draw(&self, canvas: &skia::Canvas, opts: &RenderOptions) {
        canvas.clear(self.theme.background.to_skia());
        let layout = self.layout(opts);
        let shaper = opts.draw_labels.then(TextShaper::new);

        self.draw_grid_and_axes(canvas, &layout, shaper.as_ref());

        for s in &self.series {
            let Some(scale) = layout.value_scale(&s.price_scale) else { continue };
            match s.kind {
                SeriesKind::Line => draw_line_series(canvas, &layout, scale, s),
                SeriesKind::Candlestick => draw_candle_series(canvas, &layout, scale, s),
                SeriesKind::Histogram => draw_histogram_series(canvas, &layout, scale, s),
            }
        }

        for s in self.series.iter().filter(|s| s.last_value_line) {
            if let (Some(scale), Some(v)) = (layout.value_scale(&s.price_scale), s.last_value()) {
                self.draw_last_value(canvas, &layout, scale, s.color, v, shaper.as_ref());
            }
        }

        if let Some((x, y)) = self.crosshair {
            if let Some(ch) = self.crosshair_at(opts, x, y) {
                draw_crosshair(canvas, &layout.plot, ch.x, ch.y, self.theme.crosshair);
            }
        }

        if let Some(shaper) = shaper.as_ref() {
            self.draw_legend(canvas, &layout.plot, shaper);
            if let Some(title) = &self.title {
                let (cx, _) = layout.plot.center();
                shaper.draw_styled(canvas, title, cx, layout.plot.top + 16.0, 16.0, self.theme.text, Anchor::Middle, true);
            }
        }
    }

    fn draw_grid_and_axes(&self, canvas: &skia::Canvas, layout: &Layout, shaper: Option<&TextShaper>) {
        let plot = &layout.plot;
        let mut grid = skia::Paint::default();
        grid.set_color(self.theme.grid.to_skia());
        grid.set_anti_alias(true);
        grid.set_stroke_width(1.0);

        // Horizontal grid follows the right price scale (or the first one).
        let main = layout
            .value_scale(&PriceScaleId::Right)
            .or_else(|| layout.scales.first().map(|(_, s)| s));
        let volume_only = self
            .series
            .iter()
            .filter(|s| s.price_scale == PriceScaleId::Right)
            .all(|s| s.kind == SeriesKind::Histogram);
        if let Some(scale) = main {
            let ticks: Vec<(f64, String)> = if self.value_labels.is_empty() {
                nice_ticks(scale.vmin, scale.vmax, 6)
                    .into_iter()
                    .map(|v| {
                        let label = if volume_only { self.locale.format_volume(v) } else { self.locale.format_number(v, 2) };
                        (v, label)
                    })
                    .collect()
            } else {
                self.value_labels.clone()
            };
            for (v, label) in &ticks {
                let y = scale.to_px(*v);
                if y < plot.top || y > plot.bottom {
                    continue;
                }
                canvas.draw_line((plot.left, y), (plot.right, y), &grid);
                if let Some(shaper) = shaper {
                    shaper.draw(canvas, label, plot.right + 6.0, y + 4.0, self.theme.font_size, self.theme.text, Anchor::Start);
                }
            }
        }

        let n = layout.times.len();
        let stride = label_stride(layout.time_scale.bar_spacing, 70.0);
        for i in (0..n).step_by(stride) {
            let x = layout.time_scale.bar_center(i);
            canvas.draw_line((x, plot.top), (x, plot.bottom), &grid);
            if let Some(shaper) = shaper {
                shaper.draw(canvas, &format_tick(layout.times[i]), x, plot.bottom + 18.0, self.theme.font_size, self.theme.text, Anchor::Middle);
            }
        }

        let mut border = skia::Paint::default();
        border.set_color(self.theme.scale_border.to_skia());
        border.set_anti_alias(true);
        border.set_stroke_width(1.0);
        canvas.draw_line((plot.left, plot.bottom), (plot.right, plot.bottom), &border);
        canvas.draw_line((plot.right, plot.top), (plot.right, plot.bottom), &border);
    }

    fn draw_last_value(&self, canvas: &skia::Canvas, layout: &Layout, scale: &ValueScale, color: Rgba, value: f64, shaper: Option<&TextShaper>) {
        let plot = &layout.plot;
        let y = scale.to_px(value);
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Stroke);
        paint.set_stroke_width(1.0);
        paint.set_color(color.to_skia());
        paint.set_path_effect(skia::PathEffect::dash(&[4.0, 4.0], 0.0));
        canvas.draw_line((plot.left, y), (plot.right, y), &paint);

        if let Some(shaper) = shaper {
            let label = self.locale.format_number(value, 2);
            let w = shaper.measure_width(&label, self.theme.font_size);
            let mut bg = skia::Paint::default();
            bg.set_color(color.to_skia());
            let size = self.theme.font_size;
            canvas.draw_rect(skia::Rect::from_xywh(plot.right + 1.0, y - size * 0.75, w + 10.0, size * 1.5), &bg);
            shaper.draw(canvas, &label, plot.right + 6.0, y + size * 0.35, size, self.theme.background, Anchor::Start);
        }
    }

    fn draw_legend(&self, canvas: &skia::Canvas, plot: &Rect, shaper: &TextShaper) {
        let size = self.theme.font_size;
        let mut x = plot.left + 8.0;
        let y = plot.top + 8.0;
        let mut swatch = skia::Paint::default();
        swatch.set_anti_alias(true);
        for item in &self.legend {
            swatch.set_color(item.color.to_skia());
            canvas.draw_rect(skia::Rect::from_xywh(x, y, 10.0, 10.0), &swatch);
            shaper.draw(canvas, &item.label, x + 14.0, y + 9.5, size, self.theme.text, Anchor::Start);
            x += 14.0 + shaper.measure_width(&item.label, size) + 16.0;
        }
    }
}

// ---- helpers ----------------------------------------------------------------

pub(crate) fn encode_png(surface: &mut skia::Surface) -> Result<Vec<u8>> {
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

pub(crate) fn read_rgba8(surface: &mut skia::Surface, width: i32, height: i32) -> Result<(Vec<u8>, u32, u32, usize)> {
    let info = skia::ImageInfo::new((width, height), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let stride = width as usize * 4;
    let mut pixels = vec![0u8; stride * height as usize];
    if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
        anyhow::bail!("reading surface pixels failed");
    }
    Ok((pixels, width as u32, height as u32, stride))
}

fn draw_crosshair(canvas: &skia::Canvas, plot: &Rect, x: f32, y: f32, color: Rgba) {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(1.0);
    paint.set_color(color.to_skia());
    paint.set_path_effect(skia::PathEffect::dash(&[4.0, 4.0], 0.0));
    canvas.draw_line((x, plot.top), (x, plot.bottom), &paint);
    canvas.draw_line((plot.left, y), (plot.right, y), &paint);
}

fn draw_line_series(canvas: &skia::Canvas, layout: &Layout, scale: &ValueScale, series: &Series) {
    let pts: Vec<(f32, f32)> = series
        .points
        .iter()
        .filter_map(|p| layout.x_of(p.time).map(|x| (x, scale.to_px(p.value))))
        .collect();
    let Some(&first) = pts.first() else { return };

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_color(series.color.to_skia());

    if pts.len() == 1 {
        canvas.draw_circle(first, series.line_width.max(1.0), &stroke);
        return;
    }

    let mut path = skia::Path::new();
    path.move_to(first);
    for &p in pts.iter().skip(1) {
        path.line_to(p);
    }

    if let (Some(fill), Some(&last)) = (series.fill, pts.last()) {
        let base = scale.to_px(0.0_f64.clamp(scale.vmin, scale.vmax));
        let mut area = path.clone();
        area.line_to((last.0, base));
        area.line_to((first.0, base));
        area.close();
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Fill);
        paint.set_color(fill.to_skia());
        canvas.draw_path(&area, &paint);
    }

    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(series.line_width);
    stroke.set_stroke_join(skia::paint::Join::Round);
    canvas.draw_path(&path, &stroke);
}

fn draw_candle_series(canvas: &skia::Canvas, layout: &Layout, scale: &ValueScale, series: &Series) {
    let mut wick = skia::Paint::default();
    wick.set_anti_alias(true);
    wick.set_style(skia::paint::Style::Stroke);
    wick.set_stroke_width(1.0);

    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);

    let half = (layout.time_scale.bar_spacing * 0.7).max(1.0) * 0.5;

    for c in &series.candles {
        let Some(x) = layout.x_of(c.time) else { continue };
        let color = if c.is_up() { series.up_color } else { series.down_color };
        wick.set_color(color.to_skia());
        body.set_color(color.to_skia());

        canvas.draw_line((x, scale.to_px(c.high)), (x, scale.to_px(c.low)), &wick);

        let y_o = scale.to_px(c.open);
        let y_c = scale.to_px(c.close);
        let top = y_o.min(y_c);
        let bot = y_o.max(y_c);
        canvas.draw_rect(skia::Rect::from_ltrb(x - half, top, x + half, bot.max(top + 1.0)), &body);
    }
}

fn draw_histogram_series(canvas: &skia::Canvas, layout: &Layout, scale: &ValueScale, series: &Series) {
    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);

    let half = (layout.time_scale.bar_spacing * 0.8).max(1.0) * 0.5;
    let base = scale.to_px(0.0);

    for p in &series.points {
        let Some(x) = layout.x_of(p.time) else { continue };
        body.set_color(p.color.unwrap_or(series.color).to_skia());
        let y = scale.to_px(p.value);
        canvas.draw_rect(skia::Rect::from_ltrb(x - half, y.min(base), x + half, y.max(base)), &body);
    }
}
