//! Exchange rate table and the provider abstraction that loads it

use super::error::RateError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Currency code to rate, relative to a single base currency.
///
/// All rates are finite and strictly positive and the base currency maps to
/// `1.0`. A table is built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Builds a table from raw service data.
    ///
    /// An empty mapping is reported as [`RateError::MissingRates`]. The base
    /// currency is added with a rate of `1.0` when the service leaves it out.
    pub fn new<I>(base: &str, rates: I) -> Result<Self, RateError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(RateError::InvalidRate { code, rate });
            }
            table.insert(code.to_uppercase(), rate);
        }

        if table.is_empty() {
            return Err(RateError::MissingRates);
        }

        let base = base.to_uppercase();
        match table.get(&base) {
            Some(rate) if *rate != 1.0 => {
                return Err(RateError::InvalidRate {
                    code: base,
                    rate: *rate,
                });
            }
            Some(_) => {}
            None => {
                debug!(base = %base, "Base currency missing from rates, assuming 1.0");
                table.insert(base.clone(), 1.0);
            }
        }

        Ok(Self { base, rates: table })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Currency codes in sorted order, used to populate selection lists.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Loads the full rate table from the provider's configured endpoint.
    async fn fetch(&self) -> Result<RateTable, RateError>;
}
