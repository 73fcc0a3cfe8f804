//! API key lookup.
//!
//! Keys supplied by the user win when both are present. Otherwise a single
//! read of the credentials file is made; there is no other fallback.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("failed to read credentials from {location}: {reason}")]
    Unreadable { location: String, reason: String },

    #[error("failed to parse credentials: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("missing API key: {field}")]
    MissingKey { field: &'static str },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub currency_api_key: String,
    pub conversion_api_key: String,
}

// Keys must never end up in logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("currency_api_key", &"<redacted>")
            .field("conversion_api_key", &"<redacted>")
            .finish()
    }
}

/// Keys given directly by the user, e.g. through CLI flags.
#[derive(Debug, Clone, Default)]
pub struct SuppliedKeys {
    pub currency: Option<String>,
    pub conversion: Option<String>,
}

impl SuppliedKeys {
    fn both(&self) -> Option<(&str, &str)> {
        let currency = self.currency.as_deref().map(str::trim).unwrap_or_default();
        let conversion = self.conversion.as_deref().map(str::trim).unwrap_or_default();
        if currency.is_empty() || conversion.is_empty() {
            None
        } else {
            Some((currency, conversion))
        }
    }
}

/// Where the credentials document comes from.
#[async_trait]
pub trait KeyFileSource: Send + Sync {
    async fn read(&self) -> Result<String, CredentialError>;
}

pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeyFileSource for FileKeySource {
    async fn read(&self) -> Result<String, CredentialError> {
        debug!(path = %self.path.display(), "Reading credentials file");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CredentialError::Unreadable {
                location: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct KeyFile {
    api_key_currency: Option<String>,
    api_key_conversion: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, CredentialError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CredentialError::MissingKey { field }),
    }
}

pub struct CredentialProvider {
    supplied: SuppliedKeys,
    source: Arc<dyn KeyFileSource>,
}

impl CredentialProvider {
    pub fn new(supplied: SuppliedKeys, source: Arc<dyn KeyFileSource>) -> Self {
        Self { supplied, source }
    }

    pub async fn get_credentials(&self) -> Result<Credentials, CredentialError> {
        if let Some((currency, conversion)) = self.supplied.both() {
            debug!("Using user supplied API keys");
            return Ok(Credentials {
                currency_api_key: currency.to_string(),
                conversion_api_key: conversion.to_string(),
            });
        }

        let raw = self.source.read().await?;
        let keys: KeyFile = serde_json::from_str(&raw).map_err(CredentialError::Malformed)?;
        Ok(Credentials {
            currency_api_key: required(keys.api_key_currency, "api_key_currency")?,
            conversion_api_key: required(keys.api_key_conversion, "api_key_conversion")?,
        })
    }
}
