//! Currency symbol list abstractions

use crate::core::credentials::CredentialError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Supported currency codes mapped to their display names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolSet {
    pub symbols: BTreeMap<String, String>,
}

impl SymbolSet {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.symbols.get(code).map(String::as_str)
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("invalid symbols endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("symbols request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("symbols service returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("failed to decode symbols response: {0}")]
    Decode(String),

    #[error("symbols request rejected: {reason}")]
    Rejected { reason: String },
}

// The request URL carries the API key, so it is dropped from the error
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

#[async_trait]
pub trait SymbolProvider: Send + Sync {
    async fn get_symbols(&self) -> Result<SymbolSet, FetchError>;
}
