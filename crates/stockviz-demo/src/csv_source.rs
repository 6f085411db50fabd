// File: crates/stockviz-demo/src/csv_source.rs
// Summary: DataSource over a local OHLC(V) CSV file, for rendering without a backend.
// Notes:
// - Headers are matched case-insensitively against common exchange export names.
// - Monthly returns are derived from month-end closes; there is no shareholder data.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Datelike;
use stockviz_client::{
    DataSource, FetchError, HeatmapEntry, HistoryPayload, MonthlyReturnsPayload, ShareholdersPayload, StockQuery,
};
use stockviz_core::{Candle, LinePoint, Time};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Row {
    candle: Candle,
    volume: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct CsvSource {
    rows: Vec<Row>,
}

impl CsvSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("reading {}", path.display()))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
        let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

        let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"]);
        let (Some(i_time), Some(i_open), Some(i_high), Some(i_low), Some(i_close)) = (
            i_time,
            idx(&["open", "o"]),
            idx(&["high", "h"]),
            idx(&["low", "l"]),
            idx(&["close", "c", "adj_close", "close_price"]),
        ) else {
            bail!("missing time/open/high/low/close columns in {headers:?}");
        };
        let i_volume = idx(&["volume", "vol", "v"]);

        let mut rows = Vec::new();
        for (line, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let num = |i: usize| rec.get(i).and_then(|s| s.parse::<f64>().ok());
            let Some(time) = rec.get(i_time).and_then(parse_time) else {
                debug!(line, "skipping row without a usable time");
                continue;
            };
            let (Some(o), Some(h), Some(l), Some(c)) = (num(i_open), num(i_high), num(i_low), num(i_close)) else {
                debug!(line, "skipping row with missing prices");
                continue;
            };
            match Candle::try_new(time, o, h, l, c) {
                Ok(candle) => rows.push(Row { candle, volume: i_volume.and_then(num) }),
                Err(reason) => warn!(line, reason, "skipping inconsistent OHLC row"),
            }
        }
        rows.sort_by_key(|r| r.candle.time);
        rows.dedup_by_key(|r| r.candle.time);
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn select(&self, query: &StockQuery) -> impl Iterator<Item = &Row> + '_ {
        let (start, end) = (query.start_date, query.end_date);
        self.rows.iter().filter(move |r| {
            let d = r.candle.time.date();
            start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)
        })
    }
}

/// Calendar date, RFC 3339, or epoch seconds/milliseconds.
fn parse_time(text: &str) -> Option<Time> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Time(if n > 10_i64.pow(12) { n / 1000 } else { n }));
    }
    Time::parse(text)
}

/// Month-over-month change of the last close in each month.
fn monthly_returns<'a>(rows: impl Iterator<Item = &'a Row>) -> Vec<HeatmapEntry> {
    let mut month_end: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for r in rows {
        let d = r.candle.time.date();
        month_end.insert((d.year(), d.month()), r.candle.close);
    }
    month_end
        .iter()
        .zip(month_end.iter().skip(1))
        .filter(|((_, prev), _)| **prev != 0.0)
        .map(|((_, prev), (&(year, month), close))| HeatmapEntry {
            x: month,
            y: year,
            value: close / prev - 1.0,
            formatted_value: None,
        })
        .collect()
}

#[async_trait]
impl DataSource for CsvSource {
    async fn history(&self, query: &StockQuery) -> Result<HistoryPayload, FetchError> {
        let mut payload = HistoryPayload::default();
        for r in self.select(query) {
            let c = r.candle;
            payload.line.push(LinePoint::new(c.time, c.close));
            payload.candle.push(c);
            if let Some(v) = r.volume {
                payload.volume.push(LinePoint::new(c.time, v));
            }
        }
        Ok(payload)
    }

    async fn monthly_returns(&self, query: &StockQuery) -> Result<MonthlyReturnsPayload, FetchError> {
        Ok(MonthlyReturnsPayload { heatmap: monthly_returns(self.select(query)), ..Default::default() })
    }

    async fn shareholders(&self, _query: &StockQuery) -> Result<ShareholdersPayload, FetchError> {
        Ok(ShareholdersPayload::default())
    }
}
