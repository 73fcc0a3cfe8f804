use super::util::{http_client, join_segments};
use crate::core::{
    credentials::CredentialProvider,
    currency::{ConversionError, ConversionResult, CurrencyCode, CurrencyConverter},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Debug, Deserialize)]
struct PairConversionResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    target_code: Option<String>,
    conversion_rate: Option<f64>,
    conversion_result: Option<f64>,
}

/// Single-shot client for the exchangerate-api.com `pair` endpoint.
pub struct ConversionClient {
    base_url: String,
    credentials: Arc<CredentialProvider>,
}

impl ConversionClient {
    pub fn new(base_url: &str, credentials: Arc<CredentialProvider>) -> Self {
        Self {
            base_url: base_url.to_string(),
            credentials,
        }
    }

    fn check_pair(
        response: &PairConversionResponse,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<(), ConversionError> {
        let actual_from = response.base_code.as_deref().unwrap_or(from.as_str());
        let actual_to = response.target_code.as_deref().unwrap_or(to.as_str());
        if !actual_from.eq_ignore_ascii_case(from.as_str())
            || !actual_to.eq_ignore_ascii_case(to.as_str())
        {
            return Err(ConversionError::PairMismatch {
                from: from.clone(),
                to: to.clone(),
                actual_from: actual_from.to_string(),
                actual_to: actual_to.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CurrencyConverter for ConversionClient {
    #[instrument(
        name = "PairConversion",
        skip(self),
        fields(from = %from, to = %to, amount = %amount)
    )]
    async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> Result<ConversionResult, ConversionError> {
        let credentials = self.credentials.get_credentials().await?;
        let amount_segment = amount.to_string();
        let url = join_segments(
            &self.base_url,
            [
                credentials.conversion_api_key.as_str(),
                "pair",
                from.as_str(),
                to.as_str(),
                amount_segment.as_str(),
            ],
        )
        .map_err(ConversionError::InvalidEndpoint)?;

        debug!(base_url = %self.base_url, "Requesting pair conversion");
        let response = http_client()?.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let decoded = serde_json::from_str::<PairConversionResponse>(&body);

        if !status.is_success() {
            let reason = decoded.ok().and_then(|d| d.error_type);
            error!(%status, ?reason, "Conversion request failed");
            return Err(ConversionError::HttpStatus {
                status: status.as_u16(),
                reason,
            });
        }

        let data = match decoded {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %body, "Failed to parse conversion response");
                return Err(ConversionError::Decode(e.to_string()));
            }
        };

        if data.result != "success" {
            error!(result = %data.result, reason = ?data.error_type, "Conversion rejected");
            return Err(ConversionError::Rejected {
                reason: data.error_type,
            });
        }

        Self::check_pair(&data, from, to)?;

        match (data.conversion_rate, data.conversion_result) {
            (Some(rate), Some(converted_amount)) => {
                debug!(rate, converted_amount, "Conversion succeeded");
                Ok(ConversionResult {
                    rate,
                    converted_amount,
                })
            }
            _ => Err(ConversionError::Decode(
                "missing `conversion_rate` or `conversion_result`".to_string(),
            )),
        }
    }
}
