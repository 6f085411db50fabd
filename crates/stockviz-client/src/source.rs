// File: crates/stockviz-client/src/source.rs
// Summary: Async seam between chart loaders and wherever the stock data comes from.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::fetch::ApiClient;
use crate::models::{HistoryPayload, MonthlyReturnsPayload, ShareholdersPayload, StockQuery};

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn history(&self, query: &StockQuery) -> Result<HistoryPayload, FetchError>;
    async fn monthly_returns(&self, query: &StockQuery) -> Result<MonthlyReturnsPayload, FetchError>;
    async fn shareholders(&self, query: &StockQuery) -> Result<ShareholdersPayload, FetchError>;
}

#[async_trait]
impl DataSource for ApiClient {
    async fn history(&self, query: &StockQuery) -> Result<HistoryPayload, FetchError> {
        ApiClient::history(self, query).await
    }

    async fn monthly_returns(&self, query: &StockQuery) -> Result<MonthlyReturnsPayload, FetchError> {
        ApiClient::monthly_returns(self, query).await
    }

    async fn shareholders(&self, query: &StockQuery) -> Result<ShareholdersPayload, FetchError> {
        ApiClient::shareholders(self, query).await
    }
}
