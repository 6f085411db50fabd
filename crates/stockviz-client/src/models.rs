// File: crates/stockviz-client/src/models.rs
// Summary: Query parameters and JSON payloads of the stock endpoints.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockviz_core::{Candle, HeatCell, Heatmap, LinePoint, Locale};

pub const HISTORY: &str = "stock/history";
pub const MONTHLY_RETURNS: &str = "stock/monthly_returns";
pub const SHAREHOLDERS: &str = "stock/shareholders";

/// `symbol`, `start_date`, `end_date`; unset dates are left out of the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StockQuery {
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StockQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), start_date: None, end_date: None }
    }

    pub fn with_start(mut self, start: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self
    }

    pub fn with_end(mut self, end: Option<NaiveDate>) -> Self {
        self.end_date = end;
        self
    }

    /// Ordered query pairs; `None` values are dropped by the URL builder.
    pub fn params(&self) -> Vec<(&'static str, Option<String>)> {
        let date = |d: &Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        vec![
            ("symbol", Some(self.symbol.clone())),
            ("start_date", date(&self.start_date)),
            ("end_date", date(&self.end_date)),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPayload {
    #[serde(default)]
    pub line: Vec<LinePoint>,
    #[serde(default)]
    pub candle: Vec<Candle>,
    #[serde(default)]
    pub volume: Vec<LinePoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEntry {
    /// Month, 1-based.
    pub x: u32,
    /// Year.
    pub y: i32,
    pub value: f64,
    #[serde(rename = "formattedValue", default, skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturnsPayload {
    #[serde(default)]
    pub heatmap: Vec<HeatmapEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_names: Option<Vec<String>>,
}

impl MonthlyReturnsPayload {
    /// Grid model with missing axes and labels filled in from the cells and `locale`.
    pub fn to_heatmap(&self, locale: &Locale) -> Heatmap {
        let years = match &self.years {
            Some(y) if !y.is_empty() => y.clone(),
            _ => self.heatmap.iter().map(|c| c.y).collect::<BTreeSet<_>>().into_iter().collect(),
        };
        let months = match &self.months {
            Some(m) if !m.is_empty() => m.clone(),
            _ => (1..=12).collect(),
        };
        let month_names = match &self.month_names {
            Some(n) if n.len() >= 12 => n.clone(),
            _ => locale.month_names.iter().map(|s| s.to_string()).collect(),
        };
        let cells = self
            .heatmap
            .iter()
            .map(|c| {
                let label = c.formatted_value.clone().unwrap_or_else(|| locale.format_percent(c.value));
                HeatCell::new(c.y, c.x, c.value, label)
            })
            .collect();
        Heatmap::new(cells, years, months, month_names)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shareholder {
    pub category: String,
    /// Percent of shares.
    pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareholdersPayload {
    #[serde(default)]
    pub shareholders: Vec<Shareholder>,
}
