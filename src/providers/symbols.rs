use super::util::{http_client, join_segments};
use crate::core::{
    credentials::CredentialProvider,
    store::KeyValueStore,
    symbols::{FetchError, SymbolProvider, SymbolSet},
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

pub const PAYLOAD_KEY: &str = "symbols.payload";
pub const FETCHED_AT_KEY: &str = "symbols.fetched_at";
/// 24 hours
pub const FRESHNESS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    #[serde(default)]
    success: bool,
    symbols: Option<BTreeMap<String, String>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<serde_json::Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl ApiError {
    fn reason(&self) -> String {
        self.info
            .clone()
            .or_else(|| self.kind.clone())
            .or_else(|| self.code.as_ref().map(|c| format!("error code {c}")))
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

fn decode_payload(raw: &str) -> Result<SymbolSet, FetchError> {
    let response: SymbolsResponse =
        serde_json::from_str(raw).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !response.success {
        let reason = response
            .error
            .as_ref()
            .map_or_else(|| "unknown error".to_string(), ApiError::reason);
        return Err(FetchError::Rejected { reason });
    }

    let symbols = response
        .symbols
        .ok_or_else(|| FetchError::Decode("missing `symbols` field".to_string()))?;
    Ok(SymbolSet { symbols })
}

/// Currency symbol list from the exchangeratesapi.io `symbols` endpoint,
/// kept in the store for [`FRESHNESS_WINDOW_MS`] after each successful fetch.
pub struct SymbolCache {
    base_url: String,
    credentials: Arc<CredentialProvider>,
    store: Arc<dyn KeyValueStore>,
}

impl SymbolCache {
    pub fn new(
        base_url: &str,
        credentials: Arc<CredentialProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            credentials,
            store,
        }
    }

    pub(crate) async fn get_symbols_at(&self, now_ms: i64) -> Result<SymbolSet, FetchError> {
        if let Some(cached) = self.read_fresh(now_ms).await {
            return Ok(cached);
        }
        self.refresh(now_ms).await
    }

    /// Returns the stored set if its timestamp is inside the freshness window.
    /// Anything unusable in the store counts as a miss.
    async fn read_fresh(&self, now_ms: i64) -> Option<SymbolSet> {
        let fetched_at = match self.store.get(FETCHED_AT_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("Symbols cache MISS: nothing stored");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read symbols timestamp");
                return None;
            }
        };

        let Ok(fetched_at) = fetched_at.trim().parse::<i64>() else {
            debug!(value = %fetched_at, "Symbols cache MISS: malformed timestamp");
            return None;
        };

        let age_ms = match now_ms.checked_sub(fetched_at) {
            Some(age_ms) if age_ms >= 0 => age_ms,
            _ => {
                debug!(fetched_at, "Symbols cache MISS: timestamp out of range");
                return None;
            }
        };
        if age_ms >= FRESHNESS_WINDOW_MS {
            debug!(age_ms, "Symbols cache MISS: expired");
            return None;
        }

        let payload = match self.store.get(PAYLOAD_KEY).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("Symbols cache MISS: timestamp without payload");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read cached symbols");
                return None;
            }
        };

        match decode_payload(&payload) {
            Ok(symbols) => {
                debug!(age_ms, count = symbols.len(), "Symbols cache HIT");
                Some(symbols)
            }
            Err(e) => {
                debug!(error = %e, "Symbols cache MISS: undecodable payload");
                None
            }
        }
    }

    #[instrument(name = "SymbolsFetch", skip(self), fields(base_url = %self.base_url))]
    async fn refresh(&self, now_ms: i64) -> Result<SymbolSet, FetchError> {
        let credentials = self.credentials.get_credentials().await?;
        let mut url =
            join_segments(&self.base_url, ["symbols"]).map_err(FetchError::InvalidEndpoint)?;
        url.query_pairs_mut()
            .append_pair("access_key", &credentials.currency_api_key);

        debug!("Requesting currency symbols");
        let response = http_client()?.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Symbols request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let symbols = match decode_payload(&body) {
            Ok(symbols) => symbols,
            Err(e) => {
                error!(error = %e, response = %body, "Failed to parse symbols response");
                return Err(e);
            }
        };

        self.persist(&body, now_ms).await;
        debug!(count = symbols.len(), "Fetched currency symbols");
        Ok(symbols)
    }

    async fn persist(&self, body: &str, now_ms: i64) {
        if let Err(e) = self.store.set(PAYLOAD_KEY, body).await {
            warn!(error = %e, "Failed to store symbols payload");
            return;
        }
        if let Err(e) = self.store.set(FETCHED_AT_KEY, &now_ms.to_string()).await {
            warn!(error = %e, "Failed to store symbols timestamp");
        }
    }
}

#[async_trait]
impl SymbolProvider for SymbolCache {
    async fn get_symbols(&self) -> Result<SymbolSet, FetchError> {
        self.get_symbols_at(Utc::now().timestamp_millis()).await
    }
}
