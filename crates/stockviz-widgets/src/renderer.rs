// File: crates/stockviz-widgets/src/renderer.rs
// Summary: One renderer interface for every chart family; time series share a single visual.

use anyhow::Result;
use stockviz_core::palette;
use stockviz_core::series::color_volume_by_candles;
use stockviz_core::{
    Artifact, BarChart, Candle, Chart, Crosshair, Heatmap, LegendItem, LegendPosition, LinePoint, Locale, PieChart,
    PriceScaleId, RenderOptions, Rgba, ScaleMargins, Sentiment, Series, SeriesValue,
};

use crate::options::ResolvedOptions;

/// Series ids used by the time-series families.
pub const PRICE: &str = "price";
pub const CANDLES: &str = "candles";
pub const VOLUME: &str = "volume";
pub const SLICES: &str = "slices";
pub const CELLS: &str = "cells";
pub const SENTIMENT: &str = "sentiment";
pub const BARS: &str = "bars";

pub type TooltipRows = Vec<(String, String)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Line,
    Candlestick,
    Volume,
    Combined,
    Pie,
    Heatmap,
    Doughnut,
    SentimentTrend,
    Bar,
}

impl Family {
    pub const ALL: [Family; 9] = [
        Family::Line,
        Family::Candlestick,
        Family::Volume,
        Family::Combined,
        Family::Pie,
        Family::Heatmap,
        Family::Doughnut,
        Family::SentimentTrend,
        Family::Bar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Family::Line => "line",
            Family::Candlestick => "candlestick",
            Family::Volume => "volume",
            Family::Combined => "combined",
            Family::Pie => "pie",
            Family::Heatmap => "heatmap",
            Family::Doughnut => "doughnut",
            Family::SentimentTrend => "sentiment_trend",
            Family::Bar => "bar",
        }
    }

    pub fn default_height(&self) -> u32 {
        match self {
            Family::Volume => 300,
            Family::Combined => 500,
            _ => 400,
        }
    }
}

/// Data for one chart, tagged by family.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartSpec {
    Line(Vec<LinePoint>),
    Candlestick(Vec<Candle>),
    Volume(Vec<LinePoint>),
    Combined { candles: Vec<Candle>, volume: Vec<LinePoint> },
    /// `(category, percent)` slices.
    Pie(Vec<(String, f64)>),
    Heatmap(Heatmap),
    /// `(label, percent, color)` slices around a hole, legend below.
    Doughnut(Vec<(String, f64, Rgba)>),
    /// Daily sentiment scores on a fixed -1..1 axis.
    SentimentTrend(Vec<LinePoint>),
    /// `(category, count)` bars from zero.
    Bar(Vec<(String, f64)>),
}

impl ChartSpec {
    pub fn family(&self) -> Family {
        match self {
            ChartSpec::Line(_) => Family::Line,
            ChartSpec::Candlestick(_) => Family::Candlestick,
            ChartSpec::Volume(_) => Family::Volume,
            ChartSpec::Combined { .. } => Family::Combined,
            ChartSpec::Pie(_) => Family::Pie,
            ChartSpec::Heatmap(_) => Family::Heatmap,
            ChartSpec::Doughnut(_) => Family::Doughnut,
            ChartSpec::SentimentTrend(_) => Family::SentimentTrend,
            ChartSpec::Bar(_) => Family::Bar,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartSpec::Line(p) | ChartSpec::Volume(p) | ChartSpec::SentimentTrend(p) => p.is_empty(),
            ChartSpec::Candlestick(c) => c.is_empty(),
            ChartSpec::Combined { candles, .. } => candles.is_empty(),
            ChartSpec::Pie(s) | ChartSpec::Bar(s) => s.is_empty(),
            ChartSpec::Heatmap(h) => h.is_empty(),
            ChartSpec::Doughnut(s) => !s.iter().any(|(_, v, _)| *v > 0.0),
        }
    }
}

/// Renderer-side object behind a chart handle.
pub trait Visual: Send {
    fn family(&self) -> Family;
    fn series_ids(&self) -> Vec<String>;
    /// Bars, slices or cells drawn.
    fn point_count(&self) -> usize;
    fn legend(&self) -> Vec<LegendItem> {
        Vec::new()
    }
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    /// Hover state for the pointer at `(x, y)`; the tooltip rows, or `None` to hide it.
    fn pointer_move(&mut self, x: f32, y: f32) -> Option<TooltipRows>;
    fn pointer_leave(&mut self);
    fn render(&self) -> Result<Artifact>;
}

pub fn build_visual(spec: ChartSpec, o: &ResolvedOptions) -> Box<dyn Visual> {
    match spec {
        ChartSpec::Pie(items) => Box::new(PieVisual::new(items, o)),
        ChartSpec::Doughnut(items) => Box::new(PieVisual::doughnut(items, o)),
        ChartSpec::Bar(items) => Box::new(BarVisual::new(items, o)),
        ChartSpec::Heatmap(map) => Box::new(HeatmapVisual::new(map, o)),
        series => Box::new(TimeSeriesVisual::new(series, o)),
    }
}

fn render_options(o: &ResolvedOptions) -> RenderOptions {
    let mut opts = RenderOptions::sized(o.width as i32, o.height as i32);
    opts.draw_labels = o.draw_labels;
    opts
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipFormat {
    /// Date and price.
    Price,
    /// Date and OHLC.
    Ohlc,
    /// Date and volume.
    Volume,
    /// Date, OHLC and volume when there is a bar at that time.
    OhlcVolume,
    /// Date and the score's sentiment, e.g. `Tích cực (0,45)`.
    Sentiment,
}

impl TooltipFormat {
    pub fn rows(&self, ch: &Crosshair, locale: &Locale) -> Option<TooltipRows> {
        let s = &locale.strings;
        let mut rows = vec![(s.date.to_string(), locale.format_time(ch.time))];
        match self {
            TooltipFormat::Price => {
                let SeriesValue::Value(v) = ch.value_of(PRICE)? else { return None };
                rows.push((s.price.to_string(), locale.format_number(v, 2)));
            }
            TooltipFormat::Sentiment => {
                let SeriesValue::Value(v) = ch.value_of(SENTIMENT)? else { return None };
                let label = Sentiment::from_score(v).label(s);
                rows.push((s.sentiment.to_string(), format!("{label} ({})", locale.format_number(v, 2))));
            }
            TooltipFormat::Volume => {
                let SeriesValue::Value(v) = ch.value_of(VOLUME)? else { return None };
                rows.push((s.volume.to_string(), locale.format_number(v, 0)));
            }
            TooltipFormat::Ohlc | TooltipFormat::OhlcVolume => {
                let SeriesValue::Ohlc(c) = ch.value_of(CANDLES)? else { return None };
                for (label, v) in [(s.open, c.open), (s.high, c.high), (s.low, c.low), (s.close, c.close)] {
                    rows.push((label.to_string(), locale.format_number(v, 2)));
                }
                if *self == TooltipFormat::OhlcVolume {
                    if let Some(vol) = ch.value_of(VOLUME) {
                        rows.push((s.volume.to_string(), locale.format_number(vol.value(), 0)));
                    }
                }
            }
        }
        Some(rows)
    }
}

/// Line, candlestick, volume and combined charts.
pub struct TimeSeriesVisual {
    family: Family,
    chart: Chart,
    opts: RenderOptions,
    format: TooltipFormat,
}

impl TimeSeriesVisual {
    /// Panics never; pie, doughnut, bar and heatmap specs yield an empty line chart.
    pub fn new(spec: ChartSpec, o: &ResolvedOptions) -> Self {
        let family = spec.family();
        let mut chart = Chart::new().with_theme(o.theme).with_locale(o.locale.clone());
        chart.title = o.title.clone();
        let format = match spec {
            ChartSpec::Line(points) => {
                let mut s = Series::line(PRICE, points).with_color(o.line_color);
                s.line_width = o.line_width;
                chart.add_series(s);
                TooltipFormat::Price
            }
            ChartSpec::Candlestick(candles) => {
                chart.add_series(Series::candlestick(CANDLES, candles).with_candle_colors(o.up_color, o.down_color));
                TooltipFormat::Ohlc
            }
            ChartSpec::Volume(points) => {
                chart.add_series(
                    Series::histogram(VOLUME, points)
                        .with_color(o.volume_color)
                        .on_scale(PriceScaleId::Right, ScaleMargins::new(0.1, 0.1)),
                );
                TooltipFormat::Volume
            }
            ChartSpec::Combined { candles, mut volume } => {
                color_volume_by_candles(&mut volume, &candles);
                chart.add_series(
                    Series::candlestick(CANDLES, candles)
                        .with_candle_colors(o.up_color, o.down_color)
                        .on_scale(PriceScaleId::Right, ScaleMargins::new(0.1, 0.3)),
                );
                chart.add_series(
                    Series::histogram(VOLUME, volume)
                        .with_color(o.volume_color)
                        .on_scale(PriceScaleId::Overlay(VOLUME.into()), ScaleMargins::new(0.8, 0.0)),
                );
                let s = &o.locale.strings;
                chart.legend = vec![
                    LegendItem::new(s.up, o.up_color),
                    LegendItem::new(s.down, o.down_color),
                    LegendItem::new(s.volume, o.volume_color),
                ];
                TooltipFormat::OhlcVolume
            }
            ChartSpec::SentimentTrend(points) => {
                let mut s = Series::line(SENTIMENT, points)
                    .with_color(palette::SENTIMENT_TREND)
                    .with_fill(palette::SENTIMENT_TREND.with_alpha(0.1))
                    .with_suggested_range(-1.0, 1.0);
                s.line_width = o.line_width;
                s.last_value_line = false;
                chart.add_series(s);
                let strings = &o.locale.strings;
                chart.value_labels = Sentiment::ALL.iter().map(|m| (m.score(), m.label(strings).to_string())).collect();
                TooltipFormat::Sentiment
            }
            ChartSpec::Pie(_) | ChartSpec::Heatmap(_) | ChartSpec::Doughnut(_) | ChartSpec::Bar(_) => {
                TooltipFormat::Price
            }
        };
        Self { family, chart, opts: render_options(o), format }
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn tooltip_format(&self) -> TooltipFormat {
        self.format
    }
}

impl Visual for TimeSeriesVisual {
    fn family(&self) -> Family {
        self.family
    }

    fn series_ids(&self) -> Vec<String> {
        self.chart.series.iter().map(|s| s.id.clone()).collect()
    }

    fn point_count(&self) -> usize {
        self.chart.layout(&self.opts).times.len()
    }

    fn legend(&self) -> Vec<LegendItem> {
        self.chart.legend.clone()
    }

    fn size(&self) -> (u32, u32) {
        (self.opts.width as u32, self.opts.height as u32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.opts.width = width.max(1) as i32;
        self.opts.height = height.max(1) as i32;
        self.chart.crosshair = None;
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Option<TooltipRows> {
        match self.chart.crosshair_at(&self.opts, x, y) {
            Some(ch) => {
                self.chart.crosshair = Some((ch.x, y));
                self.format.rows(&ch, &self.chart.locale)
            }
            None => {
                self.chart.crosshair = None;
                None
            }
        }
    }

    fn pointer_leave(&mut self) {
        self.chart.crosshair = None;
    }

    fn render(&self) -> Result<Artifact> {
        Ok(Artifact::Png(self.chart.render_to_png_bytes(&self.opts)?))
    }
}

/// Pie and doughnut charts.
pub struct PieVisual {
    family: Family,
    pie: PieChart,
    opts: RenderOptions,
    hover: Option<usize>,
}

impl PieVisual {
    pub fn new(items: Vec<(String, f64)>, o: &ResolvedOptions) -> Self {
        let mut pie = PieChart::new(items).with_theme(o.theme);
        pie.title = o.title.clone();
        Self { family: Family::Pie, pie, opts: render_options(o), hover: None }
    }

    /// Half-radius hole, caller colors, legend below.
    pub fn doughnut(items: Vec<(String, f64, Rgba)>, o: &ResolvedOptions) -> Self {
        let colors: Vec<Rgba> = items.iter().map(|(_, _, c)| *c).collect();
        let mut pie = PieChart::doughnut(items.into_iter().map(|(label, value, _)| (label, value)))
            .with_colors(colors)
            .with_legend(LegendPosition::Bottom)
            .with_theme(o.theme);
        pie.title = o.title.clone();
        Self { family: Family::Doughnut, pie, opts: render_options(o), hover: None }
    }

    pub fn pie(&self) -> &PieChart {
        &self.pie
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }
}

impl Visual for PieVisual {
    fn family(&self) -> Family {
        self.family
    }

    fn series_ids(&self) -> Vec<String> {
        vec![SLICES.to_string()]
    }

    fn point_count(&self) -> usize {
        self.pie.slices.len()
    }

    fn size(&self) -> (u32, u32) {
        (self.opts.width as u32, self.opts.height as u32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.opts.width = width.max(1) as i32;
        self.opts.height = height.max(1) as i32;
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Option<TooltipRows> {
        self.hover = self.pie.slice_at(&self.opts, x, y);
        self.hover.and_then(|i| self.pie.tooltip_row(i)).map(|row| vec![row])
    }

    fn pointer_leave(&mut self) {
        self.hover = None;
    }

    fn render(&self) -> Result<Artifact> {
        Ok(Artifact::Png(self.pie.render_hovered_png(&self.opts, self.hover)?))
    }
}

pub struct BarVisual {
    bars: BarChart,
    opts: RenderOptions,
    hover: Option<usize>,
    category_label: &'static str,
}

impl BarVisual {
    pub fn new(items: Vec<(String, f64)>, o: &ResolvedOptions) -> Self {
        let strings = &o.locale.strings;
        let mut bars = BarChart::new(items)
            .with_theme(o.theme)
            .with_locale(o.locale.clone())
            .with_value_label(strings.article_count);
        bars.title = o.title.clone();
        Self { bars, opts: render_options(o), hover: None, category_label: strings.news_source }
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }
}

impl Visual for BarVisual {
    fn family(&self) -> Family {
        Family::Bar
    }

    fn series_ids(&self) -> Vec<String> {
        vec![BARS.to_string()]
    }

    fn point_count(&self) -> usize {
        self.bars.bars.len()
    }

    fn size(&self) -> (u32, u32) {
        (self.opts.width as u32, self.opts.height as u32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.opts.width = width.max(1) as i32;
        self.opts.height = height.max(1) as i32;
        self.hover = None;
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Option<TooltipRows> {
        self.hover = self.bars.bar_at(&self.opts, x, y);
        self.hover.and_then(|i| self.bars.tooltip_rows(i, self.category_label))
    }

    fn pointer_leave(&mut self) {
        self.hover = None;
    }

    fn render(&self) -> Result<Artifact> {
        Ok(Artifact::Png(self.bars.render_hovered_png(&self.opts, self.hover)?))
    }
}

/// Monthly-returns grid, drawn as SVG. Height follows the number of years.
pub struct HeatmapVisual {
    map: Heatmap,
    width: u32,
    locale: Locale,
}

impl HeatmapVisual {
    pub fn new(mut map: Heatmap, o: &ResolvedOptions) -> Self {
        if o.title.is_some() {
            map.title = o.title.clone();
        }
        map.color_scale = o.color_scale;
        map.theme = o.theme;
        map.hover = None;
        Self { map, width: o.width, locale: o.locale.clone() }
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.map
    }
}

impl Visual for HeatmapVisual {
    fn family(&self) -> Family {
        Family::Heatmap
    }

    fn series_ids(&self) -> Vec<String> {
        vec![CELLS.to_string()]
    }

    fn point_count(&self) -> usize {
        self.map.cells.len()
    }

    fn size(&self) -> (u32, u32) {
        (self.width, Heatmap::height_for(self.map.years.len()) as u32)
    }

    fn resize(&mut self, width: u32, _height: u32) {
        self.width = width.max(1);
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Option<TooltipRows> {
        self.map.hover = self.map.cell_at(self.width as f32, x, y);
        self.map.hover.and_then(|i| self.map.tooltip_rows(i, &self.locale))
    }

    fn pointer_leave(&mut self) {
        self.map.hover = None;
    }

    fn render(&self) -> Result<Artifact> {
        Ok(Artifact::Svg(self.map.to_svg(self.width as f32, &self.locale)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ChartOptions;
    use stockviz_core::Time;

    const DAY: i64 = 86_400;
    // 2024-01-02 00:00 UTC
    const T0: i64 = 1_704_153_600;

    fn resolved(family: Family) -> ResolvedOptions {
        ChartOptions { draw_labels: Some(false), ..Default::default() }.resolve(family, (400, 200))
    }

    fn candles() -> Vec<Candle> {
        (0..4)
            .map(|i| {
                let o = 10.0 + i as f64;
                Candle { time: Time(T0 + i * DAY), open: o, high: o + 2.0, low: o - 1.0, close: o + 0.5 }
            })
            .collect()
    }

    #[test]
    fn families_and_emptiness() {
        assert_eq!(ChartSpec::Line(vec![]).family(), Family::Line);
        assert!(ChartSpec::Combined { candles: vec![], volume: vec![LinePoint::new(Time(0), 1.0)] }.is_empty());
        assert!(!ChartSpec::Pie(vec![("a".into(), 1.0)]).is_empty());
        assert_eq!(Family::Combined.default_height(), 500);
        assert_eq!(Family::Volume.default_height(), 300);
        assert_eq!(Family::Heatmap.default_height(), 400);
    }

    #[test]
    fn line_tooltip_shows_date_and_price() {
        let points = vec![LinePoint::new(Time(T0), 10.5), LinePoint::new(Time(T0 + DAY), 11.25)];
        let mut v = build_visual(ChartSpec::Line(points), &resolved(Family::Line));
        assert_eq!(v.series_ids(), vec!["price".to_string()]);
        let rows = v.pointer_move(20.0, 100.0).expect("inside plot");
        assert_eq!(rows, vec![("Ngày".to_string(), "02/01/2024".to_string()), ("Giá".to_string(), "10,50".to_string())]);
        assert!(v.pointer_move(-5.0, 100.0).is_none());
    }

    #[test]
    fn combined_tooltip_adds_volume_when_present() {
        let volume = vec![LinePoint::new(Time(T0), 12_345.0)];
        let spec = ChartSpec::Combined { candles: candles(), volume };
        let mut v = TimeSeriesVisual::new(spec, &resolved(Family::Combined));
        assert_eq!(v.tooltip_format(), TooltipFormat::OhlcVolume);
        assert_eq!(v.legend().len(), 3);
        // Volume bars take the candle direction color.
        assert!(v.chart().series(VOLUME).unwrap().points[0].color.is_some());

        let rows = v.pointer_move(14.0, 100.0).expect("first bar");
        let labels: Vec<&str> = rows.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Ngày", "Mở", "Cao", "Thấp", "Đóng", "Khối lượng"]);
        assert_eq!(rows[5].1, "12.345");

        let rows = v.pointer_move(300.0, 100.0).expect("later bar");
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn resize_changes_render_size() {
        let mut v = build_visual(ChartSpec::Candlestick(candles()), &resolved(Family::Candlestick));
        v.resize(320, 0);
        assert_eq!(v.size(), (320, 1));
        v.resize(320, 160);
        let Artifact::Png(bytes) = v.render().unwrap() else { panic!("expected png") };
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (320, 160));
    }

    #[test]
    fn sentiment_trend_uses_fixed_axis_and_sentiment_tooltip() {
        let points = vec![LinePoint::new(Time(T0), 0.45), LinePoint::new(Time(T0 + DAY), -0.3)];
        let mut v = TimeSeriesVisual::new(ChartSpec::SentimentTrend(points), &resolved(Family::SentimentTrend));
        assert_eq!(v.family(), Family::SentimentTrend);
        assert_eq!(v.tooltip_format(), TooltipFormat::Sentiment);
        let labels: Vec<(f64, &str)> = v.chart().value_labels.iter().map(|(y, l)| (*y, l.as_str())).collect();
        assert_eq!(labels, [(1.0, "Tích cực"), (0.0, "Trung lập"), (-1.0, "Tiêu cực")]);
        let series = v.chart().series(SENTIMENT).unwrap();
        assert_eq!(series.value_range(), Some((-1.0, 1.0)));
        assert!(series.fill.is_some() && !series.last_value_line);

        let rows = v.pointer_move(20.0, 100.0).expect("first day");
        assert_eq!(rows[1], ("Cảm xúc".to_string(), "Tích cực (0,45)".to_string()));
        // -0.3 is on the neutral side of the threshold.
        let rows = v.pointer_move(300.0, 100.0).expect("second day");
        assert_eq!(rows[1].1, "Trung lập (-0,30)");
    }

    #[test]
    fn doughnut_keeps_colors_and_ignores_the_hole() {
        let items = vec![
            ("Tích cực".to_string(), 50.0, palette::SENTIMENT_POSITIVE),
            ("Tiêu cực".to_string(), 50.0, palette::SENTIMENT_NEGATIVE),
        ];
        assert!(!ChartSpec::Doughnut(items.clone()).is_empty());
        assert!(ChartSpec::Doughnut(vec![("x".into(), 0.0, Rgba::rgb(0, 0, 0))]).is_empty());

        let o = resolved(Family::Doughnut);
        let mut v = PieVisual::doughnut(items, &o);
        assert_eq!(v.family(), Family::Doughnut);
        assert_eq!(v.pie().slices[1].color, palette::SENTIMENT_NEGATIVE);
        let layout = v.pie().layout(&RenderOptions::sized(400, 200));
        let (cx, cy) = layout.center;
        assert!(v.pointer_move(cx, cy).is_none());
        let rows = v.pointer_move(cx + layout.radius * 0.75, cy).expect("ring");
        assert_eq!(rows, vec![("Tích cực".to_string(), "50%".to_string())]);
    }

    #[test]
    fn bar_tooltip_names_source_and_count() {
        let o = resolved(Family::Bar);
        let mut v = build_visual(ChartSpec::Bar(vec![("CafeF".into(), 30.0), ("TNCK".into(), 5.0)]), &o);
        assert_eq!(v.family(), Family::Bar);
        assert_eq!(v.point_count(), 2);
        let chart = BarChart::new(vec![("CafeF", 30.0), ("TNCK", 5.0)]);
        let layout = chart.layout(&RenderOptions::sized(400, 200));
        let x = layout.bands.position(0) + layout.bands.bandwidth * 0.5;
        let (top, bottom) = layout.bar_span(30.0);
        let rows = v.pointer_move(x, (top + bottom) * 0.5).expect("bar");
        assert_eq!(
            rows,
            vec![("Nguồn".to_string(), "CafeF".to_string()), ("Số lượng bài báo".to_string(), "30".to_string())]
        );
        // Above the short bar.
        let x1 = layout.bands.position(1) + layout.bands.bandwidth * 0.5;
        let (top1, _) = layout.bar_span(5.0);
        assert!(v.pointer_move(x1, top1 - 5.0).is_none());
    }

    #[test]
    fn pie_hover_and_tooltip() {
        let o = resolved(Family::Pie);
        let mut v = PieVisual::new(vec![("A".into(), 60.0), ("B".into(), 40.0)], &o);
        let center = PieChart::new(vec![("A", 60.0), ("B", 40.0)]).layout(&RenderOptions::sized(400, 200)).center;
        // Just right of 12 o'clock lies in the first slice.
        let rows = v.pointer_move(center.0 + 5.0, center.1 - 20.0).expect("slice");
        assert_eq!(rows, vec![("A".to_string(), "60%".to_string())]);
        assert_eq!(v.hover(), Some(0));
        v.pointer_leave();
        assert_eq!(v.hover(), None);
    }
}
