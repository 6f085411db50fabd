// File: crates/stockviz-widgets/tests/loaders.rs
// Purpose: Loaders end to end against an in-memory data source.

mod common;

use chrono::NaiveDate;
use common::{history, monthly_returns, page, shareholders, FakeSource};
use stockviz_client::StockQuery;
use stockviz_core::Artifact;
use stockviz_widgets::{
    init_embedded_charts, load_combined_chart, load_embedded_chart, load_monthly_returns_heatmap,
    load_shareholders_pie, load_stock_chart, load_volume_chart, ChartOptions, ChartType, Content, Document, Element,
    EmbeddedChart, Family,
};

fn opts() -> ChartOptions {
    ChartOptions { draw_labels: Some(false), today: NaiveDate::from_ymd_opt(2024, 6, 15), ..Default::default() }
}

fn html(content: Option<Content>) -> String {
    content.and_then(|c| c.html().map(str::to_string)).unwrap_or_default()
}

#[tokio::test]
async fn empty_payload_shows_no_data() {
    let doc = page("c", 480, 240);
    let source = FakeSource::new();
    let handle = load_stock_chart(&doc, &source, "c", StockQuery::new("ABC"), ChartType::Line, &opts()).await;
    assert!(handle.is_none());
    let shown = html(doc.content("c"));
    assert!(shown.contains(r#"class="chart-error""#), "{shown}");
    assert!(shown.contains("Không có dữ liệu cho cổ phiếu ABC"), "{shown}");
    assert!(doc.body().is_empty());
}

#[tokio::test]
async fn fetch_failure_shows_load_error() {
    let doc = page("c", 480, 240);
    let source = FakeSource::new().failing("ABC", 500);
    let handle = load_volume_chart(&doc, &source, "c", StockQuery::new("ABC"), &opts()).await;
    assert!(handle.is_none());
    assert!(html(doc.content("c")).contains("Lỗi khi tải dữ liệu: HTTP 500"));
}

#[tokio::test]
async fn stock_chart_defaults_to_one_year() {
    let doc = page("c", 480, 240);
    let source = FakeSource::new().with_history("ABC", history(6));
    let handle = load_stock_chart(&doc, &source, "c", StockQuery::new("ABC"), ChartType::Candle, &opts())
        .await
        .expect("loaded");
    assert_eq!(handle.family(), Family::Candlestick);
    assert_eq!(handle.point_count(), 6);
    assert!(matches!(doc.content("c"), Some(Content::Chart(Artifact::Png(_)))));

    let q = &source.queries()[0];
    assert_eq!(q.start_date, NaiveDate::from_ymd_opt(2023, 6, 15));
    assert_eq!(q.end_date, None);
}

#[tokio::test]
async fn candle_mode_without_candles_is_no_data() {
    let doc = page("c", 480, 240);
    let mut payload = history(3);
    payload.candle.clear();
    let source = FakeSource::new().with_history("ABC", payload);
    let handle = load_stock_chart(&doc, &source, "c", StockQuery::new("ABC"), ChartType::Candle, &opts()).await;
    assert!(handle.is_none());
    assert!(html(doc.content("c")).contains("Không có dữ liệu cho cổ phiếu ABC"));
}

#[tokio::test]
async fn combined_needs_candles_and_keeps_explicit_start() {
    let doc = page("c", 480, 300);
    let source = FakeSource::new().with_history("ABC", history(4));
    let start = NaiveDate::from_ymd_opt(2020, 1, 1);
    let query = StockQuery::new("ABC").with_start(start);
    let handle = load_combined_chart(&doc, &source, "c", query, &opts()).await.expect("loaded");
    assert_eq!(handle.family(), Family::Combined);
    assert_eq!(source.queries()[0].start_date, start);

    let empty = FakeSource::new();
    assert!(load_combined_chart(&doc, &empty, "c", StockQuery::new("XYZ"), &opts()).await.is_none());
    assert!(html(doc.content("c")).contains("XYZ"));
    // The earlier chart's handle is still the caller's to dispose.
    assert!(handle.cleanup());
}

#[tokio::test]
async fn heatmap_loads_five_years_with_title() {
    let doc = page("h", 600, 0);
    let source = FakeSource::new().with_monthly_returns("ABC", monthly_returns());
    let handle = load_monthly_returns_heatmap(&doc, &source, "h", StockQuery::new("ABC"), &opts())
        .await
        .expect("loaded");
    assert_eq!(handle.family(), Family::Heatmap);
    assert_eq!(source.queries()[0].start_date, NaiveDate::from_ymd_opt(2019, 6, 15));
    let Some(Content::Chart(Artifact::Svg(svg))) = doc.content("h") else { panic!("expected svg") };
    assert!(svg.contains("Lợi nhuận hàng tháng ABC"));

    let empty = FakeSource::new();
    assert!(load_monthly_returns_heatmap(&doc, &empty, "h", StockQuery::new("ABC"), &opts()).await.is_none());
    assert!(html(doc.content("h")).contains("Không có dữ liệu lợi nhuận hàng tháng cho cổ phiếu ABC"));
}

#[tokio::test]
async fn shareholders_are_queried_by_symbol_only() {
    let doc = page("p", 400, 300);
    let source = FakeSource::new().with_shareholders("ABC", shareholders());
    let handle = load_shareholders_pie(&doc, &source, "p", "ABC", &opts()).await.expect("loaded");
    assert_eq!(handle.family(), Family::Pie);
    assert_eq!(handle.point_count(), 2);
    assert_eq!(source.queries()[0], StockQuery::new("ABC"));

    assert!(load_shareholders_pie(&doc, &source, "p", "NONE", &opts()).await.is_none());
    assert!(html(doc.content("p")).contains("Không có dữ liệu cổ đông cho cổ phiếu NONE"));
}

#[tokio::test]
async fn missing_container_is_not_fatal() {
    let doc = page("c", 480, 240);
    let source = FakeSource::new().with_history("ABC", history(3));
    let handle = load_stock_chart(&doc, &source, "missing", StockQuery::new("ABC"), ChartType::Line, &opts()).await;
    assert!(handle.is_none());
}

fn news_page(kind: EmbeddedChart, data: &str) -> Document {
    let doc = Document::new();
    doc.insert(Element::new(kind.element_id(), 400, 260).with_attr(kind.data_attribute(), data));
    doc
}

fn load_news(doc: &Document, kind: EmbeddedChart) -> Option<stockviz_widgets::ChartHandle> {
    load_embedded_chart(doc, kind.element_id(), kind, &opts())
}

#[test]
fn sentiment_distribution_is_a_doughnut() {
    let kind = EmbeddedChart::SentimentDistribution;
    let doc = news_page(kind, r#"{"positive": 45.5, "neutral": 30, "negative": 24.5}"#);
    let handle = load_news(&doc, kind).expect("loaded");
    assert_eq!(handle.family(), Family::Doughnut);
    assert_eq!(handle.point_count(), 3);
    assert!(matches!(doc.content(kind.element_id()), Some(Content::Chart(Artifact::Png(_)))));
}

#[test]
fn sentiment_trend_drops_bad_dates() {
    let kind = EmbeddedChart::SentimentTrend;
    let doc = news_page(kind, r#"{"dates": ["2024-05-01", "2024-05-02", "later"], "scores": [0.4, -0.2, 0.9]}"#);
    let handle = load_news(&doc, kind).expect("loaded");
    assert_eq!(handle.family(), Family::SentimentTrend);
    assert_eq!(handle.point_count(), 2);
}

#[test]
fn news_sources_become_bars() {
    let kind = EmbeddedChart::NewsSources;
    let doc = news_page(kind, r#"{"cafef": 30, "vnexpress": 12, "tinnhanhchungkhoan": 7, "other": 1}"#);
    let handle = load_news(&doc, kind).expect("loaded");
    assert_eq!(handle.family(), Family::Bar);
    assert_eq!(handle.point_count(), 4);
}

#[test]
fn invalid_embedded_json_shows_load_error() {
    let kind = EmbeddedChart::NewsSources;
    let doc = news_page(kind, "{'cafef': 30}");
    assert!(load_news(&doc, kind).is_none());
    let shown = html(doc.content(kind.element_id()));
    assert!(shown.contains("Lỗi khi tải dữ liệu: invalid response body"), "{shown}");
}

#[test]
fn missing_or_empty_embedded_data_shows_no_data() {
    let cases = [
        (EmbeddedChart::SentimentDistribution, None, "Không có dữ liệu cảm xúc"),
        (EmbeddedChart::SentimentDistribution, Some(r#"{"positive": 0}"#), "Không có dữ liệu cảm xúc"),
        (EmbeddedChart::SentimentTrend, Some(r#"{"dates": [], "scores": []}"#), "Không có dữ liệu cảm xúc"),
        (EmbeddedChart::NewsSources, Some("{}"), "Không có dữ liệu tin tức"),
    ];
    for (kind, data, message) in cases {
        let doc = match data {
            Some(data) => news_page(kind, data),
            None => page(kind.element_id(), 400, 260),
        };
        assert!(load_news(&doc, kind).is_none(), "{kind:?} {data:?}");
        let shown = html(doc.content(kind.element_id()));
        assert!(shown.contains(message), "{kind:?} {data:?}: {shown}");
    }
}

#[test]
fn init_mounts_only_the_charts_on_the_page() {
    let doc = news_page(EmbeddedChart::SentimentDistribution, r#"{"positive": 60, "negative": 40}"#);
    doc.insert(
        Element::new("sourceStatsChart", 400, 260).with_attr("data-sources", r#"{"vnexpress": 3}"#),
    );
    let mounted = init_embedded_charts(&doc, &opts());
    let kinds: Vec<EmbeddedChart> = mounted.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, [EmbeddedChart::SentimentDistribution, EmbeddedChart::NewsSources]);
    assert!(!doc.contains("sentimentTrendChart"));
    for (_, handle) in &mounted {
        assert!(handle.cleanup());
    }
}
