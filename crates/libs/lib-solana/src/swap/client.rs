//! # Swap HTTP Client
//!
//! HTTP client wrapper shared by the price and quote endpoints.

use super::types::SwapParams;
use lib_core::{AppError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// API version header value sent with every request.
pub const API_VERSION: &str = "v2";

/// HTTP client wrapper for the swap API
pub struct SwapHttpClient {
    pub http: Client,
    pub api_base: String,
    pub api_key: Option<String>,
}

impl SwapHttpClient {
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("0x-version", HeaderValue::from_static(API_VERSION));
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| AppError::Config(format!("Invalid swap API key: {}", e)))?;
            headers.insert("0x-api-key", value);
        }
        Ok(headers)
    }

    /// GET `{api_base}/{endpoint}` with `params`, decoding the JSON body.
    ///
    /// `what` names the resource in error messages (`"price"`, `"quote"`).
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &SwapParams, what: &str) -> Result<T> {
        let url = format!("{}/{}", self.api_base, endpoint);
        debug!(%url, sell_token = %params.sell_token, buy_token = %params.buy_token, "Swap API request");

        let response = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .query(&params.query_pairs())
            .send()
            .await
            .map_err(|e| {
                warn!("Swap API request failed: {}", e);
                AppError::Network(format!("Failed to fetch {}: {}", what, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!(
                "Failed to fetch {}: {} {}",
                what,
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Decoding(format!("Swap API {} parse failed: {}", what, e)))
    }
}
