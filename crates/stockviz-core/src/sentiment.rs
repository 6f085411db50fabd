// File: crates/stockviz-core/src/sentiment.rs
// Summary: News sentiment payloads (distribution, daily trend, per-source counts) with their labels and colors.
// Notes:
// - Payloads match the JSON the news pages embed: `{positive, neutral, negative}`,
//   `{dates, scores}` and `{source: count, ...}`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::Strings;
use crate::palette::{self, Rgba};
use crate::series::{LinePoint, Time};

/// Scores beyond this distance from zero lean positive or negative.
pub const LEANING_THRESHOLD: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Classify an average score in [-1, 1]; exactly ±0.3 is still neutral.
    pub fn from_score(score: f64) -> Self {
        if score > LEANING_THRESHOLD {
            Sentiment::Positive
        } else if score < -LEANING_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Position on the trend axis.
    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Neutral => 0.0,
            Sentiment::Negative => -1.0,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Sentiment::Positive => palette::SENTIMENT_POSITIVE,
            Sentiment::Neutral => palette::SENTIMENT_NEUTRAL,
            Sentiment::Negative => palette::SENTIMENT_NEGATIVE,
        }
    }

    pub fn label(&self, strings: &Strings) -> &'static str {
        match self {
            Sentiment::Positive => strings.sentiment_positive,
            Sentiment::Neutral => strings.sentiment_neutral,
            Sentiment::Negative => strings.sentiment_negative,
        }
    }
}

/// Share of articles per sentiment, in percent. Missing keys read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentCounts {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentCounts {
    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    /// No slice would take any angle.
    pub fn is_empty(&self) -> bool {
        !Sentiment::ALL.iter().any(|s| self.get(*s) > 0.0)
    }

    /// `(label, percent, color)` in positive, neutral, negative order.
    pub fn slices(&self, strings: &Strings) -> Vec<(String, f64, Rgba)> {
        Sentiment::ALL
            .iter()
            .map(|s| (s.label(strings).to_string(), self.get(*s), s.color()))
            .collect()
    }
}

/// Daily average scores; `dates[i]` pairs with `scores[i]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentTrend {
    pub dates: Vec<String>,
    pub scores: Vec<f64>,
}

impl SentimentTrend {
    /// Points for dates that parse. Unpaired dates or scores are dropped.
    pub fn points(&self) -> Vec<LinePoint> {
        self.dates
            .iter()
            .zip(&self.scores)
            .filter_map(|(date, score)| Time::parse(date).map(|t| LinePoint::new(t, *score)))
            .collect()
    }

    /// Number of date/score pairs whose date did not parse.
    pub fn skipped(&self) -> usize {
        self.dates.len().min(self.scores.len()) - self.points().len()
    }
}

/// Article count per news source, in the order the object lists them.
/// A repeated key keeps its first position and its last count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceCounts(pub Vec<(String, f64)>);

impl SourceCounts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(display name, count)` pairs.
    pub fn labeled(&self) -> Vec<(String, f64)> {
        self.0.iter().map(|(key, n)| (source_label(key).to_string(), *n)).collect()
    }
}

impl<'de> Deserialize<'de> for SourceCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = SourceCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of source name to article count")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
                let mut out: Vec<(String, f64)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, count)) = map.next_entry::<String, f64>()? {
                    match out.iter_mut().find(|(k, _)| *k == key) {
                        Some(entry) => entry.1 = count,
                        None => out.push((key, count)),
                    }
                }
                Ok(SourceCounts(out))
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Display name for a crawler source key; unknown keys pass through.
pub fn source_label(key: &str) -> &str {
    match key {
        "cafef" => "CafeF",
        "vnexpress" => "VnExpress",
        "tinnhanhchungkhoan" => "TNCK",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Locale;

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(Sentiment::from_score(0.31), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(0.3), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.3), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.5), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn counts_default_missing_keys() {
        let c: SentimentCounts = serde_json::from_str(r#"{"positive": 40, "negative": 10.5}"#).unwrap();
        assert_eq!(c, SentimentCounts { positive: 40.0, neutral: 0.0, negative: 10.5 });
        let labels: Vec<String> = c.slices(&Locale::vi_vn().strings).into_iter().map(|(l, _, _)| l).collect();
        assert_eq!(labels, ["Tích cực", "Trung lập", "Tiêu cực"]);
        assert!(SentimentCounts::default().is_empty());
        assert!(!c.is_empty());
    }

    #[test]
    fn trend_pairs_dates_with_scores() {
        let t: SentimentTrend =
            serde_json::from_str(r#"{"dates": ["2024-05-01", "soon", "2024-05-03", "2024-05-04"], "scores": [0.5, 0.1, -0.4]}"#)
                .unwrap();
        let p = t.points();
        assert_eq!(p.len(), 2);
        assert_eq!(p[1].time, Time::parse("2024-05-03").unwrap());
        assert_eq!(p[1].value, -0.4);
        assert_eq!(t.skipped(), 1);
    }

    #[test]
    fn sources_keep_document_order() {
        let s: SourceCounts =
            serde_json::from_str(r#"{"vnexpress": 12, "cafef": 30, "other": 1, "vnexpress": 14}"#).unwrap();
        assert_eq!(
            s.labeled(),
            vec![("VnExpress".to_string(), 14.0), ("CafeF".to_string(), 30.0), ("other".to_string(), 1.0)]
        );
        assert!(serde_json::from_str::<SourceCounts>("[1, 2]").is_err());
        assert!(serde_json::from_str::<SourceCounts>(r#"{"cafef": "many"}"#).is_err());
    }
}
