// File: crates/stockviz-core/src/series.rs
// Summary: Time-indexed series model for line, candlestick and histogram (volume) data.
// Notes:
// - Data is kept sorted by time so crosshair lookups can binary search.
// - Payload field names match the backend JSON (`time`, `value`, `open`, ...).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::parse_calendar_date;
use crate::palette::{self, Rgba};
use crate::scale::ScaleMargins;

/// Unix time in seconds (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Time(pub i64);

impl Time {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::default()).and_utc().timestamp())
    }

    /// UTC calendar date; out-of-range timestamps clamp to the epoch.
    pub fn date(&self) -> NaiveDate {
        DateTime::from_timestamp(self.0, 0)
            .map(|dt| dt.date_naive())
            .unwrap_or_default()
    }

    /// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text.trim()) {
            return Some(Self(dt.timestamp()));
        }
        parse_calendar_date(text).map(Self::from_date)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTime::deserialize(deserializer)? {
            RawTime::Int(v) => Ok(Time(v)),
            RawTime::Float(v) => Ok(Time(v.trunc() as i64)),
            RawTime::Text(s) => Time::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid time '{s}'"))),
        }
    }
}

/// `{time, value}` point used by line and histogram series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub time: Time,
    pub value: f64,
    /// Per-bar color override (histograms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
}

impl LinePoint {
    pub fn new(time: Time, value: f64) -> Self {
        Self { time, value, color: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: Time,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Try to construct a candle enforcing OHLC invariants:
    /// low <= min(open,close) and high >= max(open,close), and low <= high.
    pub fn try_new(time: Time, open: f64, high: f64, low: f64, close: f64) -> Result<Self, &'static str> {
        let lo = open.min(close);
        let hi = open.max(close);
        if low > lo { return Err("low above min(open,close)"); }
        if high < hi { return Err("high below max(open,close)"); }
        if low > high { return Err("low above high"); }
        Ok(Self { time, open, high, low, close })
    }

    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Candlestick,
    Histogram,
}

/// Which vertical scale a series is measured against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PriceScaleId {
    /// The visible right-hand price scale.
    Right,
    /// An unlabeled scale stacked over the plot (e.g. volume under candles).
    Overlay(String),
}

/// Value of one series at a crosshair time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeriesValue {
    Value(f64),
    Ohlc(Candle),
}

impl SeriesValue {
    pub fn value(&self) -> f64 {
        match self {
            SeriesValue::Value(v) => *v,
            SeriesValue::Ohlc(c) => c.close,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Series {
    pub id: String,
    pub kind: SeriesKind,
    pub points: Vec<LinePoint>, // Line/Histogram
    pub candles: Vec<Candle>,   // Candlestick
    pub price_scale: PriceScaleId,
    pub margins: ScaleMargins,
    pub color: Rgba,
    pub up_color: Rgba,
    pub down_color: Rgba,
    pub line_width: f32,
    /// Dashed horizontal line at the last value.
    pub last_value_line: bool,
    /// Area between a line and zero.
    pub fill: Option<Rgba>,
    /// Range the value scale covers even when the data stays inside it.
    pub suggested_range: Option<(f64, f64)>,
}

impl Series {
    fn base(id: impl Into<String>, kind: SeriesKind) -> Self {
        Self {
            id: id.into(),
            kind,
            points: Vec::new(),
            candles: Vec::new(),
            price_scale: PriceScaleId::Right,
            margins: ScaleMargins::default(),
            color: Rgba::rgb(0x29, 0x62, 0xff),
            up_color: palette::UP,
            down_color: palette::DOWN,
            line_width: 2.0,
            last_value_line: false,
            fill: None,
            suggested_range: None,
        }
    }

    pub fn line(id: impl Into<String>, mut points: Vec<LinePoint>) -> Self {
        points.sort_by_key(|p| p.time);
        Self { points, last_value_line: true, ..Self::base(id, SeriesKind::Line) }
    }

    pub fn candlestick(id: impl Into<String>, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.time);
        Self { candles, ..Self::base(id, SeriesKind::Candlestick) }
    }

    pub fn histogram(id: impl Into<String>, mut points: Vec<LinePoint>) -> Self {
        points.sort_by_key(|p| p.time);
        Self { points, color: Rgba::rgba(76, 175, 80, 0.5), ..Self::base(id, SeriesKind::Histogram) }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_candle_colors(mut self, up: Rgba, down: Rgba) -> Self {
        self.up_color = up;
        self.down_color = down;
        self
    }

    pub fn with_fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_suggested_range(mut self, lo: f64, hi: f64) -> Self {
        self.suggested_range = Some((lo.min(hi), lo.max(hi)));
        self
    }

    pub fn on_scale(mut self, scale: PriceScaleId, margins: ScaleMargins) -> Self {
        self.price_scale = scale;
        self.margins = margins;
        self
    }

    pub fn is_empty(&self) -> bool {
        match self.kind {
            SeriesKind::Candlestick => self.candles.is_empty(),
            SeriesKind::Line | SeriesKind::Histogram => self.points.is_empty(),
        }
    }

    pub fn times(&self) -> Vec<Time> {
        match self.kind {
            SeriesKind::Candlestick => self.candles.iter().map(|c| c.time).collect(),
            SeriesKind::Line | SeriesKind::Histogram => self.points.iter().map(|p| p.time).collect(),
        }
    }

    /// Exact-time lookup.
    pub fn value_at(&self, time: Time) -> Option<SeriesValue> {
        match self.kind {
            SeriesKind::Candlestick => self
                .candles
                .binary_search_by_key(&time, |c| c.time)
                .ok()
                .map(|i| SeriesValue::Ohlc(self.candles[i])),
            SeriesKind::Line | SeriesKind::Histogram => self
                .points
                .binary_search_by_key(&time, |p| p.time)
                .ok()
                .map(|i| SeriesValue::Value(self.points[i].value)),
        }
    }

    /// Min/max over the data, widened to the suggested range; histograms always include their zero base.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        match self.kind {
            SeriesKind::Candlestick => {
                for c in &self.candles {
                    lo = lo.min(c.low);
                    hi = hi.max(c.high);
                }
            }
            SeriesKind::Line | SeriesKind::Histogram => {
                for p in &self.points {
                    lo = lo.min(p.value);
                    hi = hi.max(p.value);
                }
                if self.kind == SeriesKind::Histogram && lo.is_finite() {
                    lo = lo.min(0.0);
                    hi = hi.max(0.0);
                }
            }
        }
        if let Some((s_lo, s_hi)) = self.suggested_range {
            lo = lo.min(s_lo);
            hi = hi.max(s_hi);
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }

    pub fn last_value(&self) -> Option<f64> {
        match self.kind {
            SeriesKind::Candlestick => self.candles.last().map(|c| c.close),
            SeriesKind::Line | SeriesKind::Histogram => self.points.last().map(|p| p.value),
        }
    }
}

/// Give volume bars without an explicit color the direction color of the candle at the same time.
pub fn color_volume_by_candles(volume: &mut [LinePoint], candles: &[Candle]) {
    let direction: HashMap<Time, (f64, f64)> = candles.iter().map(|c| (c.time, (c.open, c.close))).collect();
    for p in volume.iter_mut().filter(|p| p.color.is_none()) {
        if let Some(&(open, close)) = direction.get(&p.time) {
            p.color = Some(palette::volume_color(open, close));
        }
    }
}
