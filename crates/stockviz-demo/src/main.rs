// File: crates/stockviz-demo/src/main.rs
// Summary: Renders every chart family for one symbol, from the backend or a local CSV, into PNG/SVG files.
// Notes:
// - Usage: `stockviz-demo [SYMBOL] [CSV_PATH]`. Without a CSV the configured API is queried.
// - The stock chart goes through a widget (line, then candles after a type switch);
//   the other families use the one-shot loaders.
// - The news charts read a sample page whose containers embed their data as JSON.

mod csv_source;
mod logging;
mod settings;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use stockviz_client::{ApiClient, DataSource, StockQuery};
use stockviz_widgets::{
    init_embedded_charts, load_combined_chart, load_monthly_returns_heatmap, load_shareholders_pie,
    load_volume_chart, ChartHandle, ChartOptions, ChartType, ChartWidget, Document, Element, EmbeddedChart, TimeRange,
    WidgetKind, WidgetOptions,
};
use tracing::{info, warn};

use crate::csv_source::CsvSource;
use crate::settings::Settings;

const DEFAULT_SYMBOL: &str = "VNM";
const CONTAINER: &str = "chart";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    logging::init(&settings.log);

    let mut args = std::env::args().skip(1);
    let symbol = args.next().unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
    let source: Arc<dyn DataSource> = match args.next() {
        Some(path) => {
            let csv = CsvSource::from_path(Path::new(&path))?;
            info!(path = %path, rows = csv.len(), "using local CSV");
            Arc::new(csv)
        }
        None => {
            info!(base_url = %settings.api.base_url, "using stock API");
            Arc::new(ApiClient::new(&settings.api).context("building API client")?)
        }
    };

    std::fs::create_dir_all(&settings.out_dir)
        .with_context(|| format!("creating {}", settings.out_dir.display()))?;
    let options = ChartOptions {
        theme: Some(settings.theme()),
        locale: Some(settings.locale()),
        ..ChartOptions::default()
    };
    let out = Output { dir: settings.out_dir.clone(), symbol: symbol.clone() };

    render_stock_widget(&settings, source.clone(), &symbol, &options, &out).await?;

    let doc = page(&settings);
    let query = StockQuery::new(symbol.as_str());
    let handle = load_volume_chart(&doc, source.as_ref(), CONTAINER, query.clone(), &options).await;
    out.write(&doc, CONTAINER, handle.as_ref())?;

    let doc = page(&settings);
    let handle = load_combined_chart(&doc, source.as_ref(), CONTAINER, query.clone(), &options).await;
    out.write(&doc, CONTAINER, handle.as_ref())?;

    let doc = page(&settings);
    let handle = load_monthly_returns_heatmap(&doc, source.as_ref(), CONTAINER, query, &options).await;
    out.write(&doc, CONTAINER, handle.as_ref())?;

    let doc = page(&settings);
    let handle = load_shareholders_pie(&doc, source.as_ref(), CONTAINER, &symbol, &options).await;
    out.write(&doc, CONTAINER, handle.as_ref())?;

    let doc = news_page(&settings);
    for (kind, handle) in init_embedded_charts(&doc, &options) {
        out.write(&doc, kind.element_id(), Some(&handle))?;
    }

    Ok(())
}

const SAMPLE_NEWS: [(EmbeddedChart, &str); 3] = [
    (EmbeddedChart::SentimentDistribution, r#"{"positive": 46.7, "neutral": 33.3, "negative": 20.0}"#),
    (
        EmbeddedChart::SentimentTrend,
        r#"{"dates": ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-06", "2024-05-07"],
            "scores": [0.42, 0.1, -0.35, -0.05, 0.6]}"#,
    ),
    (EmbeddedChart::NewsSources, r#"{"cafef": 14, "vnexpress": 9, "tinnhanhchungkhoan": 7}"#),
];

/// A news page with every embedded chart container filled from `SAMPLE_NEWS`.
fn news_page(settings: &Settings) -> Document {
    let doc = Document::new();
    for (kind, data) in SAMPLE_NEWS {
        doc.insert(Element::new(kind.element_id(), settings.width, 0).with_attr(kind.data_attribute(), data));
    }
    doc
}

/// A fresh page holding one empty container as wide as the settings say.
fn page(settings: &Settings) -> Document {
    let doc = Document::new();
    doc.insert(Element::new(CONTAINER, settings.width, 0));
    doc
}

async fn render_stock_widget(
    settings: &Settings,
    source: Arc<dyn DataSource>,
    symbol: &str,
    options: &ChartOptions,
    out: &Output,
) -> Result<()> {
    let doc = page(settings);
    let widget_options = WidgetOptions { chart: options.clone(), ..WidgetOptions::default() };
    let Some(widget) = ChartWidget::init(&doc, source, CONTAINER, symbol, WidgetKind::Stock, widget_options).await
    else {
        return Ok(());
    };
    widget.select_range(TimeRange::ThreeYears).await;
    widget.with_handle(|h| out.write(&doc, widget.chart_id(), h))?;
    widget.select_chart_type(ChartType::Candle).await;
    widget.with_handle(|h| out.write(&doc, widget.chart_id(), h))?;
    widget.dispose();
    Ok(())
}

struct Output {
    dir: PathBuf,
    symbol: String,
}

impl Output {
    /// Write the handle's current drawing to `{symbol}_{family}.{png|svg}`; a missing
    /// handle only logs what the container shows instead.
    fn write(&self, doc: &Document, container: &str, handle: Option<&ChartHandle>) -> Result<()> {
        let Some(handle) = handle else {
            let shown = doc.content(container).and_then(|c| c.html().map(str::to_string)).unwrap_or_default();
            warn!(symbol = %self.symbol, container, placeholder = %shown, "no chart rendered");
            return Ok(());
        };
        let artifact = handle.render()?;
        let path = self
            .dir
            .join(format!("{}_{}.{}", self.symbol, handle.family().name(), artifact.extension()));
        std::fs::write(&path, artifact.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}
