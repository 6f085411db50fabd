// File: crates/stockviz-widgets/src/builders.rs
// Summary: Mount a chart spec into a container and wire its tooltip, pointer and resize handling.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use stockviz_core::{Artifact, Candle, Heatmap, LegendItem, LinePoint, Rgba};
use tracing::{error, warn};

use crate::document::{escape_html, Content, Document, Element, PointerEvent};
use crate::handle::{lock_visual, ChartHandle, Disposer, SharedVisual};
use crate::options::ChartOptions;
use crate::placeholder;
use crate::renderer::{build_visual, ChartSpec};
use crate::tooltip::Tooltip;

pub fn legend_id(container: &str) -> String {
    format!("{container}-legend")
}

fn legend_html(items: &[LegendItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = write!(
            out,
            r#"<div class="legend-item"><div class="legend-color" style="background-color: {};"></div><span>{}</span></div>"#,
            item.color.css(),
            escape_html(&item.label)
        );
    }
    out
}

fn show(doc: &Document, container: &str, artifact: Result<Artifact>) {
    match artifact {
        Ok(a) => {
            doc.set_content(container, Content::Chart(a));
        }
        Err(e) => warn!(container, error = %e, "redrawing chart failed"),
    }
}

fn on_pointer(doc: &Document, container: &str, visual: &SharedVisual, tooltip: &Tooltip, event: PointerEvent) {
    let (rows, artifact) = {
        let mut v = lock_visual(visual);
        let rows = match event {
            PointerEvent::Move { x, y } => v.pointer_move(x, y),
            PointerEvent::Leave => {
                v.pointer_leave();
                None
            }
        };
        (rows, v.render())
    };
    show(doc, container, artifact);
    match event {
        PointerEvent::Move { x, y } => tooltip.update(rows.as_deref(), x, y),
        PointerEvent::Leave => tooltip.hide(),
    }
}

fn on_resize(doc: &Document, container: &str, visual: &SharedVisual, width: u32, height: u32) {
    let artifact = {
        let mut v = lock_visual(visual);
        let (_, current) = v.size();
        v.resize(width, if height > 0 { height } else { current });
        v.render()
    };
    show(doc, container, artifact);
}

/// Render `spec` into `container`. `None` (logged) when the container is missing or rendering fails.
pub fn mount(doc: &Document, container: &str, spec: ChartSpec, options: &ChartOptions) -> Option<ChartHandle> {
    let Some(size) = doc.client_size(container) else {
        error!(container, "chart container not found");
        return None;
    };
    doc.clear(container);

    let family = spec.family();
    let resolved = options.resolve(family, size);
    let visual = build_visual(spec, &resolved);
    let artifact = match visual.render() {
        Ok(a) => a,
        Err(e) => {
            warn!(container, family = family.name(), error = %e, "rendering chart failed");
            placeholder::show_error(doc, container, &resolved.locale.strings.load_error(&e.to_string()));
            return None;
        }
    };
    doc.set_content(container, Content::Chart(artifact));

    let legend = visual.legend();
    if !legend.is_empty() {
        let mut el = Element::new(legend_id(container), 0, 0).with_class("chart-legend");
        el.content = Content::Html(legend_html(&legend));
        doc.append_child(container, el);
    }

    let tooltip = Tooltip::create(doc, container);
    let shared: SharedVisual = Arc::new(Mutex::new(visual));

    let pointer = {
        let (d, target, v, tip) = (doc.clone(), container.to_string(), shared.clone(), tooltip.clone());
        doc.add_pointer_listener(container, Arc::new(move |event| on_pointer(&d, &target, &v, &tip, event)))
    };
    let observer = {
        let (d, target, v) = (doc.clone(), container.to_string(), shared.clone());
        doc.observe_resize(container, Arc::new(move |w, h| on_resize(&d, &target, &v, w, h)))
    };

    let disposer = Disposer::new(doc.clone(), pointer, observer, tooltip);
    Some(ChartHandle::new(container, shared, disposer))
}

pub fn create_line_chart(doc: &Document, container: &str, data: Vec<LinePoint>, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Line(data), options)
}

pub fn create_candlestick_chart(doc: &Document, container: &str, data: Vec<Candle>, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Candlestick(data), options)
}

pub fn create_volume_chart(doc: &Document, container: &str, data: Vec<LinePoint>, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Volume(data), options)
}

pub fn create_combined_chart(
    doc: &Document,
    container: &str,
    candles: Vec<Candle>,
    volume: Vec<LinePoint>,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Combined { candles, volume }, options)
}

pub fn create_pie_chart(doc: &Document, container: &str, slices: Vec<(String, f64)>, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Pie(slices), options)
}

pub fn create_heatmap_chart(doc: &Document, container: &str, heatmap: Heatmap, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Heatmap(heatmap), options)
}

pub fn create_doughnut_chart(
    doc: &Document,
    container: &str,
    slices: Vec<(String, f64, Rgba)>,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Doughnut(slices), options)
}

pub fn create_sentiment_trend_chart(doc: &Document, container: &str, data: Vec<LinePoint>, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::SentimentTrend(data), options)
}

pub fn create_bar_chart(doc: &Document, container: &str, bars: Vec<(String, f64)>, options: &ChartOptions) -> Option<ChartHandle> {
    mount(doc, container, ChartSpec::Bar(bars), options)
}
