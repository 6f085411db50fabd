// File: crates/stockviz-widgets/tests/common/mod.rs
// Purpose: In-memory data source and fixtures shared by the widget tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use stockviz_client::{
    DataSource, FetchError, HeatmapEntry, HistoryPayload, MonthlyReturnsPayload, Shareholder, ShareholdersPayload,
    StockQuery,
};
use stockviz_core::{Candle, LinePoint, Time};
use stockviz_widgets::{Document, Element};
use tokio::sync::oneshot;

pub const DAY: i64 = 86_400;
// 2024-01-02 00:00 UTC
pub const T0: i64 = 1_704_153_600;

pub fn page(container: &str, width: u32, height: u32) -> Document {
    let doc = Document::new();
    doc.insert(Element::new(container, width, height));
    doc
}

pub fn points(n: usize) -> Vec<LinePoint> {
    (0..n).map(|i| LinePoint::new(Time(T0 + i as i64 * DAY), 10.0 + i as f64 * 0.5)).collect()
}

pub fn candles(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let o = 10.0 + i as f64;
            let c = if i % 2 == 0 { o + 0.5 } else { o - 0.5 };
            Candle { time: Time(T0 + i as i64 * DAY), open: o, high: o + 1.0, low: o - 1.0, close: c }
        })
        .collect()
}

pub fn history(n: usize) -> HistoryPayload {
    HistoryPayload {
        line: points(n),
        candle: candles(n),
        volume: (0..n).map(|i| LinePoint::new(Time(T0 + i as i64 * DAY), 1_000.0 * (i + 1) as f64)).collect(),
    }
}

pub fn monthly_returns() -> MonthlyReturnsPayload {
    let heatmap = [(2023, 1, 0.08), (2023, 2, -0.03), (2024, 1, 0.01)]
        .into_iter()
        .map(|(y, x, value)| HeatmapEntry { x, y, value, formatted_value: None })
        .collect();
    MonthlyReturnsPayload { heatmap, ..Default::default() }
}

pub fn shareholders() -> ShareholdersPayload {
    ShareholdersPayload {
        shareholders: vec![
            Shareholder { category: "Nhà nước".into(), value: 60.0 },
            Shareholder { category: "Khác".into(), value: 40.0 },
        ],
    }
}

/// Serves canned payloads by symbol. Unknown symbols get empty payloads.
#[derive(Default)]
pub struct FakeSource {
    history: Mutex<HashMap<String, HistoryPayload>>,
    monthly: Mutex<HashMap<String, MonthlyReturnsPayload>>,
    holders: Mutex<HashMap<String, ShareholdersPayload>>,
    failures: Mutex<HashMap<String, u16>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    queries: Mutex<Vec<StockQuery>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(self, symbol: &str, payload: HistoryPayload) -> Self {
        self.history.lock().unwrap().insert(symbol.into(), payload);
        self
    }

    pub fn with_monthly_returns(self, symbol: &str, payload: MonthlyReturnsPayload) -> Self {
        self.monthly.lock().unwrap().insert(symbol.into(), payload);
        self
    }

    pub fn with_shareholders(self, symbol: &str, payload: ShareholdersPayload) -> Self {
        self.holders.lock().unwrap().insert(symbol.into(), payload);
        self
    }

    /// Requests for `symbol` fail with this HTTP status.
    pub fn failing(self, symbol: &str, status: u16) -> Self {
        self.failures.lock().unwrap().insert(symbol.into(), status);
        self
    }

    /// Hold the next request for `symbol` until the returned sender fires.
    pub fn gate(&self, symbol: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(symbol.into(), rx);
        tx
    }

    pub fn queries(&self) -> Vec<StockQuery> {
        self.queries.lock().unwrap().clone()
    }

    async fn arrive(&self, query: &StockQuery) -> Result<(), FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        let gate = self.gates.lock().unwrap().remove(&query.symbol);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        match self.failures.lock().unwrap().get(&query.symbol) {
            Some(&status) => Err(FetchError::Status(status)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn history(&self, query: &StockQuery) -> Result<HistoryPayload, FetchError> {
        self.arrive(query).await?;
        Ok(self.history.lock().unwrap().get(&query.symbol).cloned().unwrap_or_default())
    }

    async fn monthly_returns(&self, query: &StockQuery) -> Result<MonthlyReturnsPayload, FetchError> {
        self.arrive(query).await?;
        Ok(self.monthly.lock().unwrap().get(&query.symbol).cloned().unwrap_or_default())
    }

    async fn shareholders(&self, query: &StockQuery) -> Result<ShareholdersPayload, FetchError> {
        self.arrive(query).await?;
        Ok(self.holders.lock().unwrap().get(&query.symbol).cloned().unwrap_or_default())
    }
}
