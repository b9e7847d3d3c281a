//! Core business logic abstractions

pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use convert::{Conversion, ConversionEngine, ConversionRequest, UnknownCurrencyPolicy};
pub use error::{ConversionError, FetchError, RateError};
pub use rates::{RateProvider, RateTable};
