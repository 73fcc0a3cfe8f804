//! Core business logic abstractions

pub mod config;
pub mod credentials;
pub mod currency;
pub mod log;
pub mod store;
pub mod symbols;

// Re-export main types for cleaner imports
pub use credentials::{CredentialError, CredentialProvider, Credentials, SuppliedKeys};
pub use currency::{ConversionError, ConversionResult, CurrencyCode, CurrencyConverter};
pub use store::{KeyValueStore, StorageError};
pub use symbols::{FetchError, SymbolProvider, SymbolSet};
