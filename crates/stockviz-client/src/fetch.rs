// File: crates/stockviz-client/src/fetch.rs
// Summary: GET + JSON helper against the backend API and the typed stock endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::models::{self, HistoryPayload, MonthlyReturnsPayload, ShareholdersPayload, StockQuery};

/// `{base}/api/{endpoint}` with the `Some` params appended in order.
pub fn build_url(base: &Url, endpoint: &str, params: &[(&str, Option<String>)]) -> Result<Url, FetchError> {
    let mut url = base.join(&format!("/api/{}", endpoint.trim_start_matches('/')))?;
    let present: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
        .collect();
    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }
    Ok(url)
}

/// Truthiness of a JSON value as the browser client judges the `error` field.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.base_url)?;
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self { http: builder.build()?, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// GET the endpoint, reject non-2xx and truthy `error` fields, decode into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, Option<String>)]) -> Result<T, FetchError> {
        let result = match self.fetch_value(endpoint, params).await {
            Ok(value) => serde_json::from_value(value).map_err(FetchError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(endpoint, error = %e, "fetching API data failed");
        }
        result
    }

    async fn fetch_value(&self, endpoint: &str, params: &[(&str, Option<String>)]) -> Result<Value, FetchError> {
        let url = build_url(&self.base, endpoint, params)?;
        debug!(%url, "GET");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        if let Some(err) = value.get("error").filter(|e| is_truthy(e)) {
            let message = match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(FetchError::Api(message));
        }
        Ok(value)
    }

    pub async fn history(&self, query: &StockQuery) -> Result<HistoryPayload, FetchError> {
        self.fetch_json(models::HISTORY, &query.params()).await
    }

    pub async fn monthly_returns(&self, query: &StockQuery) -> Result<MonthlyReturnsPayload, FetchError> {
        self.fetch_json(models::MONTHLY_RETURNS, &query.params()).await
    }

    pub async fn shareholders(&self, query: &StockQuery) -> Result<ShareholdersPayload, FetchError> {
        self.fetch_json(models::SHAREHOLDERS, &query.params()).await
    }
}
