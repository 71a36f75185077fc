//! HTTP client for the Bridge History API.

use crate::types::{decode_claim_info, ClaimInfo, ClaimRequest, TxsByHashesRequest, TxsByHashesResponse};
use crate::HistoryError;
use tracing::debug;

/// Client for one Bridge History API endpoint.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    /// Create a client for the given API base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// The API base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch claim info for a single validated L2 transaction hash.
    ///
    /// Issues one `POST {base_url}/api/txsbyhashes` with `{"txs": [hash]}`
    /// and decodes the result. No caching, no retries.
    pub async fn fetch_claim_info(
        &self,
        request: &ClaimRequest,
    ) -> Result<ClaimInfo, HistoryError> {
        let url = format!("{}/api/txsbyhashes", self.base_url);
        let body = TxsByHashesRequest {
            txs: vec![request.to_string()],
        };

        debug!(url = %url, tx_hash = %request, "Fetching claim info");

        let response: TxsByHashesResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_claim_info(response, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = HistoryClient::new("https://sepolia-api-bridge-v2.scroll.io/");
        assert_eq!(client.base_url(), "https://sepolia-api-bridge-v2.scroll.io");
    }
}
