//! Typed failures for rate loading and conversion

use thiserror::Error;

/// Transport level failure while talking to the rate service.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate service reported an error: {0}")]
    Service(String),
}

/// Failure to produce a usable rate table. Always fatal for the session.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Failed to fetch currency rates: {0}")]
    Fetch(#[from] FetchError),

    #[error("Rates data is missing from the API response")]
    MissingRates,

    #[error("Unusable rate for {code}: {rate}")]
    InvalidRate { code: String, rate: f64 },
}

/// Failure while converting a single amount. Recoverable: the user may retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid amount '{0}': expected a non-negative number")]
    InvalidAmount(String),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Conversion of {amount} {from} to {to} did not produce a finite number")]
    Arithmetic {
        amount: f64,
        from: String,
        to: String,
    },
}
