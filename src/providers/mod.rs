pub mod conversion;
pub mod symbols;
pub mod util;

pub use conversion::ConversionClient;
pub use symbols::SymbolCache;
