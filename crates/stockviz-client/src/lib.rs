// File: crates/stockviz-client/src/lib.rs
// Summary: API client entry point; fetch helpers, payload models and the DataSource seam.

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod source;

pub use config::ClientConfig;
pub use error::FetchError;
pub use fetch::{build_url, ApiClient};
pub use models::{HeatmapEntry, HistoryPayload, MonthlyReturnsPayload, Shareholder, ShareholdersPayload, StockQuery};
pub use source::DataSource;
