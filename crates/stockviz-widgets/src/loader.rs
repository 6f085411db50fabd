// File: crates/stockviz-widgets/src/loader.rs
// Summary: Fetch-then-mount loaders per chart family, plus range and chart-type selection.
// Notes:
// - Loading is split in two: `fetch_chart` awaits the data source, `present` mounts
//   synchronously. Widgets check for stale requests between the two.

use std::str::FromStr;

use chrono::{Months, NaiveDate, Utc};
use stockviz_client::{DataSource, FetchError, StockQuery};
use stockviz_core::{Locale, Strings};
use tracing::error;

use crate::builders::mount;
use crate::document::Document;
use crate::handle::ChartHandle;
use crate::options::ChartOptions;
use crate::placeholder;
use crate::renderer::ChartSpec;

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// `date` moved back by `months`, clamped to the last day of the target month.
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    ThreeYears,
    FiveYears,
    /// Twenty years.
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 7] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::ThreeYears,
        TimeRange::FiveYears,
        TimeRange::All,
    ];

    /// Ranges offered as buttons.
    pub const CONTROLS: [TimeRange; 5] =
        [TimeRange::OneMonth, TimeRange::ThreeMonths, TimeRange::OneYear, TimeRange::ThreeYears, TimeRange::All];

    pub fn key(&self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1m",
            TimeRange::ThreeMonths => "3m",
            TimeRange::SixMonths => "6m",
            TimeRange::OneYear => "1y",
            TimeRange::ThreeYears => "3y",
            TimeRange::FiveYears => "5y",
            TimeRange::All => "all",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            TimeRange::OneMonth => 1,
            TimeRange::ThreeMonths => 3,
            TimeRange::SixMonths => 6,
            TimeRange::OneYear => 12,
            TimeRange::ThreeYears => 36,
            TimeRange::FiveYears => 60,
            TimeRange::All => 240,
        }
    }

    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        months_before(today, self.months())
    }

    pub fn label(&self, strings: &Strings) -> &'static str {
        let i = TimeRange::ALL.iter().position(|r| r == self).unwrap_or(3);
        strings.ranges[i]
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|r| r.key() == s)
            .ok_or_else(|| format!("unknown time range '{s}'"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChartType {
    #[default]
    Line,
    Candle,
}

impl ChartType {
    pub const ALL: [ChartType; 2] = [ChartType::Line, ChartType::Candle];

    pub fn key(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Candle => "candle",
        }
    }

    pub fn label(&self, strings: &Strings) -> &'static str {
        match self {
            ChartType::Line => strings.chart_line,
            ChartType::Candle => strings.chart_candle,
        }
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| format!("unknown chart type '{s}'"))
    }
}

/// What to fetch and how to draw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Stock(ChartType),
    Volume,
    Combined,
    MonthlyReturns,
    Shareholders,
}

impl LoadKind {
    /// Start date used when the query has none.
    pub fn default_start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            LoadKind::Stock(_) | LoadKind::Volume | LoadKind::Combined => Some(TimeRange::OneYear.start_date(today)),
            LoadKind::MonthlyReturns => Some(TimeRange::FiveYears.start_date(today)),
            LoadKind::Shareholders => None,
        }
    }

    /// Fill in the default start date; shareholders are queried by symbol only.
    pub fn complete(&self, mut query: StockQuery, today: NaiveDate) -> StockQuery {
        if *self == LoadKind::Shareholders {
            query.start_date = None;
            query.end_date = None;
        } else if query.start_date.is_none() {
            query.start_date = self.default_start(today);
        }
        query
    }
}

/// Outcome of the fetch phase.
#[derive(Debug)]
pub enum Outcome {
    Chart { spec: ChartSpec, title: Option<String> },
    /// Nothing to draw; carries the message to show.
    Empty(String),
    Failed(FetchError),
}

pub async fn fetch_chart(source: &dyn DataSource, kind: LoadKind, query: &StockQuery, locale: &Locale) -> Outcome {
    let s = &locale.strings;
    let symbol = query.symbol.as_str();
    let empty = |template: &str| Outcome::Empty(Strings::fill(template, symbol));
    let result = match kind {
        LoadKind::Stock(chart_type) => source.history(query).await.map(|data| {
            if data.line.is_empty() {
                return empty(s.no_data);
            }
            let spec = match chart_type {
                ChartType::Line => ChartSpec::Line(data.line),
                ChartType::Candle if data.candle.is_empty() => return empty(s.no_data),
                ChartType::Candle => ChartSpec::Candlestick(data.candle),
            };
            Outcome::Chart { spec, title: None }
        }),
        LoadKind::Volume => source.history(query).await.map(|data| {
            if data.volume.is_empty() {
                return empty(s.no_volume_data);
            }
            Outcome::Chart { spec: ChartSpec::Volume(data.volume), title: None }
        }),
        LoadKind::Combined => source.history(query).await.map(|data| {
            if data.candle.is_empty() {
                return empty(s.no_data);
            }
            Outcome::Chart { spec: ChartSpec::Combined { candles: data.candle, volume: data.volume }, title: None }
        }),
        LoadKind::MonthlyReturns => source.monthly_returns(query).await.map(|data| {
            if data.heatmap.is_empty() {
                return empty(s.no_monthly_returns);
            }
            let title = Strings::fill(s.monthly_returns_title, symbol);
            Outcome::Chart { spec: ChartSpec::Heatmap(data.to_heatmap(locale)), title: Some(title) }
        }),
        LoadKind::Shareholders => source.shareholders(query).await.map(|data| {
            if data.shareholders.is_empty() {
                return empty(s.no_shareholders);
            }
            let slices = data.shareholders.into_iter().map(|h| (h.category, h.value)).collect();
            let title = Strings::fill(s.shareholders_title, symbol);
            Outcome::Chart { spec: ChartSpec::Pie(slices), title: Some(title) }
        }),
    };
    result.unwrap_or_else(|e| {
        error!(symbol, kind = ?kind, error = %e, "loading chart data failed");
        Outcome::Failed(e)
    })
}

/// Mount a fetched chart, or show the matching error placeholder.
pub fn present(doc: &Document, container: &str, outcome: Outcome, options: &ChartOptions) -> Option<ChartHandle> {
    match outcome {
        Outcome::Chart { spec, title } => {
            let defaults = ChartOptions { title, ..ChartOptions::default() };
            mount(doc, container, spec, &options.or(&defaults))
        }
        Outcome::Empty(message) => {
            placeholder::show_error(doc, container, &message);
            None
        }
        Outcome::Failed(e) => {
            placeholder::show_error(doc, container, &options.locale().strings.load_error(&e.to_string()));
            None
        }
    }
}

/// Show loading, fetch, then mount or show an error.
pub async fn load(
    doc: &Document,
    source: &dyn DataSource,
    container: &str,
    kind: LoadKind,
    query: StockQuery,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    let locale = options.locale();
    placeholder::show_loading(doc, container, &locale);
    let query = kind.complete(query, options.today.unwrap_or_else(today_utc));
    let outcome = fetch_chart(source, kind, &query, &locale).await;
    present(doc, container, outcome, options)
}

pub async fn load_stock_chart(
    doc: &Document,
    source: &dyn DataSource,
    container: &str,
    query: StockQuery,
    chart_type: ChartType,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    load(doc, source, container, LoadKind::Stock(chart_type), query, options).await
}

pub async fn load_volume_chart(
    doc: &Document,
    source: &dyn DataSource,
    container: &str,
    query: StockQuery,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    load(doc, source, container, LoadKind::Volume, query, options).await
}

pub async fn load_combined_chart(
    doc: &Document,
    source: &dyn DataSource,
    container: &str,
    query: StockQuery,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    load(doc, source, container, LoadKind::Combined, query, options).await
}

pub async fn load_monthly_returns_heatmap(
    doc: &Document,
    source: &dyn DataSource,
    container: &str,
    query: StockQuery,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    load(doc, source, container, LoadKind::MonthlyReturns, query, options).await
}

pub async fn load_shareholders_pie(
    doc: &Document,
    source: &dyn DataSource,
    container: &str,
    symbol: &str,
    options: &ChartOptions,
) -> Option<ChartHandle> {
    load(doc, source, container, LoadKind::Shareholders, StockQuery::new(symbol), options).await
}
