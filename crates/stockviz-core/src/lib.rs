// File: crates/stockviz-core/src/lib.rs
// Summary: Core library entry point; exports formatting, palettes, series, news sentiment and the chart families.

pub mod chart;
pub mod series;
pub mod types;
pub mod geometry;
pub mod grid;
pub mod scale;
pub mod theme;
pub mod text;
pub mod format;
pub mod palette;
pub mod pie;
pub mod bar;
pub mod heatmap;
pub mod sentiment;

pub use chart::{Chart, Crosshair, Layout, LegendItem, RenderOptions};
pub use series::{Candle, LinePoint, PriceScaleId, Series, SeriesKind, SeriesValue, Time};
pub use scale::ScaleMargins;
pub use theme::Theme;
pub use text::TextShaper;
pub use format::{escape_html, format_tick, FormatError, Locale, Strings};
pub use palette::Rgba;
pub use pie::{LegendPosition, PieChart};
pub use bar::BarChart;
pub use heatmap::{ColorScale, HeatCell, Heatmap};
pub use sentiment::{Sentiment, SentimentCounts, SentimentTrend, SourceCounts};
pub use types::Artifact;
