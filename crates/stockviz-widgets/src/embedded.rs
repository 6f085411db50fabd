// File: crates/stockviz-widgets/src/embedded.rs
// Summary: News charts whose data the page embeds as JSON in a data attribute: sentiment doughnut, trend and sources.
// Notes:
// - Nothing is fetched. The attribute is parsed, then mounted through `present` like any loaded chart.
// - A bad attribute is reported the same way as a bad response body.

use std::str::FromStr;

use stockviz_client::FetchError;
use stockviz_core::{Locale, SentimentCounts, SentimentTrend, SourceCounts};
use tracing::{debug, error, warn};

use crate::document::Document;
use crate::handle::ChartHandle;
use crate::loader::{present, Outcome};
use crate::options::ChartOptions;
use crate::renderer::ChartSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmbeddedChart {
    /// `data-sentiment`: `{positive, neutral, negative}` percentages.
    SentimentDistribution,
    /// `data-trend`: `{dates, scores}`.
    SentimentTrend,
    /// `data-sources`: `{source: article count}`.
    NewsSources,
}

impl EmbeddedChart {
    pub const ALL: [EmbeddedChart; 3] =
        [EmbeddedChart::SentimentDistribution, EmbeddedChart::SentimentTrend, EmbeddedChart::NewsSources];

    /// Container id the news pages give this chart.
    pub fn element_id(&self) -> &'static str {
        match self {
            EmbeddedChart::SentimentDistribution => "sentimentDistributionChart",
            EmbeddedChart::SentimentTrend => "sentimentTrendChart",
            EmbeddedChart::NewsSources => "sourceStatsChart",
        }
    }

    pub fn data_attribute(&self) -> &'static str {
        match self {
            EmbeddedChart::SentimentDistribution => "data-sentiment",
            EmbeddedChart::SentimentTrend => "data-trend",
            EmbeddedChart::NewsSources => "data-sources",
        }
    }

    fn empty_message(&self, locale: &Locale) -> &'static str {
        match self {
            EmbeddedChart::SentimentDistribution | EmbeddedChart::SentimentTrend => locale.strings.no_sentiment_data,
            EmbeddedChart::NewsSources => locale.strings.no_news_data,
        }
    }

    /// Chart for a parsed attribute value; `Ok(None)` when it holds nothing to draw.
    fn parse(&self, raw: &str, locale: &Locale) -> Result<Option<ChartSpec>, serde_json::Error> {
        Ok(match self {
            EmbeddedChart::SentimentDistribution => {
                let counts: SentimentCounts = serde_json::from_str(raw)?;
                (!counts.is_empty()).then(|| ChartSpec::Doughnut(counts.slices(&locale.strings)))
            }
            EmbeddedChart::SentimentTrend => {
                let trend: SentimentTrend = serde_json::from_str(raw)?;
                let skipped = trend.skipped();
                if skipped > 0 {
                    warn!(skipped, "sentiment trend dates that do not parse were dropped");
                }
                let points = trend.points();
                (!points.is_empty()).then_some(ChartSpec::SentimentTrend(points))
            }
            EmbeddedChart::NewsSources => {
                let counts: SourceCounts = serde_json::from_str(raw)?;
                (!counts.is_empty()).then(|| ChartSpec::Bar(counts.labeled()))
            }
        })
    }
}

impl FromStr for EmbeddedChart {
    type Err = String;

    /// Accepts the element id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmbeddedChart::ALL
            .into_iter()
            .find(|k| k.element_id() == s)
            .ok_or_else(|| format!("unknown embedded chart '{s}'"))
    }
}

/// Read `kind`'s data attribute from `container`. A missing attribute reads as no data.
pub fn read_embedded(doc: &Document, container: &str, kind: EmbeddedChart, locale: &Locale) -> Outcome {
    let attribute = kind.data_attribute();
    let Some(raw) = doc.attr(container, attribute) else {
        warn!(container, attribute, "chart data attribute missing");
        return Outcome::Empty(kind.empty_message(locale).to_string());
    };
    match kind.parse(&raw, locale) {
        Ok(Some(spec)) => Outcome::Chart { spec, title: None },
        Ok(None) => Outcome::Empty(kind.empty_message(locale).to_string()),
        Err(e) => {
            error!(container, attribute, error = %e, "invalid chart data attribute");
            Outcome::Failed(FetchError::Decode(e))
        }
    }
}

/// Mount `kind` from its embedded data. A page without `container` is skipped quietly.
pub fn load_embedded_chart(
    doc: &Document,
    container: &str,
    kind: EmbeddedChart,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    if !doc.contains(container) {
        debug!(container, "no embedded chart container on this page");
        return None;
    }
    let outcome = read_embedded(doc, container, kind, &options.locale());
    present(doc, container, outcome, options)
}

/// Mount every embedded chart whose usual container exists on the page.
pub fn init_embedded_charts(doc: &Document, options: &ChartOptions) -> Vec<(EmbeddedChart, ChartHandle)> {
    EmbeddedChart::ALL
        .into_iter()
        .filter_map(|kind| load_embedded_chart(doc, kind.element_id(), kind, options).map(|h| (kind, h)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    #[test]
    fn ids_and_attributes() {
        assert_eq!("sourceStatsChart".parse::<EmbeddedChart>(), Ok(EmbeddedChart::NewsSources));
        assert!("sourceStats".parse::<EmbeddedChart>().is_err());
        assert_eq!(EmbeddedChart::SentimentTrend.data_attribute(), "data-trend");
    }

    #[test]
    fn zero_distribution_is_empty_not_an_error() {
        let doc = Document::new();
        doc.insert(Element::new("d", 300, 200).with_attr("data-sentiment", r#"{"positive": 0, "neutral": 0}"#));
        let outcome = read_embedded(&doc, "d", EmbeddedChart::SentimentDistribution, &Locale::vi_vn());
        assert!(matches!(outcome, Outcome::Empty(ref m) if m == "Không có dữ liệu cảm xúc"), "{outcome:?}");
    }

    #[test]
    fn malformed_json_is_a_decode_failure() {
        let doc = Document::new();
        doc.insert(Element::new("s", 300, 200).with_attr("data-sources", "{cafef: 3"));
        let outcome = read_embedded(&doc, "s", EmbeddedChart::NewsSources, &Locale::en_us());
        assert!(matches!(outcome, Outcome::Failed(FetchError::Decode(_))), "{outcome:?}");
    }
}
