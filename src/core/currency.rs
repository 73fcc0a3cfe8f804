//! Currency conversion abstractions

use crate::core::credentials::CredentialError;
use anyhow::anyhow;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217 style code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(anyhow!("Invalid currency code: {}", s))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub rate: f64,
    pub converted_amount: f64,
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("invalid conversion endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("conversion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("conversion service returned HTTP {status}{}", reason_suffix(.reason))]
    HttpStatus { status: u16, reason: Option<String> },

    #[error("failed to decode conversion response: {0}")]
    Decode(String),

    #[error("conversion rejected{}", reason_suffix(.reason))]
    Rejected { reason: Option<String> },

    #[error("conversion response is for {actual_from}->{actual_to}, requested {from}->{to}")]
    PairMismatch {
        from: CurrencyCode,
        to: CurrencyCode,
        actual_from: String,
        actual_to: String,
    },
}

// The request URL carries the API key, so it is dropped from the error
impl From<reqwest::Error> for ConversionError {
    fn from(e: reqwest::Error) -> Self {
        ConversionError::Transport(e.without_url())
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_ref().map(|r| format!(": {r}")).unwrap_or_default()
}

#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> Result<ConversionResult, ConversionError>;
}
