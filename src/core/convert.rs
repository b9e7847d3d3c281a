//! Currency conversion over a loaded rate table

use super::error::ConversionError;
use super::rates::RateTable;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, warn};

/// What to do when a currency code is not present in the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCurrencyPolicy {
    /// Treat the missing rate as `1.0`.
    #[default]
    Fallback,
    /// Fail with [`ConversionError::UnknownCurrency`].
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: &str, to: &str) -> Result<Self, ConversionError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ConversionError::InvalidAmount(amount.to_string()));
        }
        Ok(Self {
            // -0.0 is accepted as zero
            amount: amount.abs(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Builds a request from the raw text of an amount field.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConversionError> {
        let value = parse_amount(amount)?;
        Self::new(value, from, to)
    }
}

/// A completed conversion. `value` is already rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub request: ConversionRequest,
    pub value: f64,
}

impl Conversion {
    pub fn formatted(&self) -> String {
        format_grouped(self.value)
    }
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} = {} {}",
            format_grouped(self.request.amount),
            self.request.from,
            self.formatted(),
            self.request.to
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionEngine {
    policy: UnknownCurrencyPolicy,
}

impl ConversionEngine {
    pub fn new(policy: UnknownCurrencyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnknownCurrencyPolicy {
        self.policy
    }

    /// Converts through the base currency: divide by the source rate unless
    /// the source is the base, multiply by the target rate, round to cents.
    pub fn convert(
        &self,
        rates: &RateTable,
        request: &ConversionRequest,
    ) -> Result<Conversion, ConversionError> {
        debug!(
            amount = request.amount,
            from = %request.from,
            to = %request.to,
            "Converting"
        );

        let mut amount = request.amount;
        if request.from != rates.base() {
            amount /= self.rate_for(rates, &request.from)?;
        }
        amount *= self.rate_for(rates, &request.to)?;

        let value = round_cents(amount);
        if !value.is_finite() {
            return Err(ConversionError::Arithmetic {
                amount: request.amount,
                from: request.from.clone(),
                to: request.to.clone(),
            });
        }

        debug!(value, "Converted amount");
        Ok(Conversion {
            request: request.clone(),
            value,
        })
    }

    fn rate_for(&self, rates: &RateTable, code: &str) -> Result<f64, ConversionError> {
        match (rates.get(code), self.policy) {
            (Some(rate), _) => Ok(rate),
            (None, UnknownCurrencyPolicy::Fallback) => {
                warn!(code = %code, "Currency not in rate table, using a rate of 1.0");
                Ok(1.0)
            }
            (None, UnknownCurrencyPolicy::Reject) => {
                Err(ConversionError::UnknownCurrency(code.to_string()))
            }
        }
    }
}

/// Converts `amount` and returns the grouped two-decimal result, using the
/// default fallback policy for unknown codes.
pub fn convert(
    rates: &RateTable,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<String, ConversionError> {
    let request = ConversionRequest::new(amount, from, to)?;
    ConversionEngine::default()
        .convert(rates, &request)
        .map(|c| c.formatted())
}

/// Parses user input as a finite, non-negative amount.
pub fn parse_amount(input: &str) -> Result<f64, ConversionError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value.abs()),
        _ => Err(ConversionError::InvalidAmount(trimmed.to_string())),
    }
}

fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        // Magnitudes this large carry no fractional digits.
        return value;
    }
    let rounded = scaled.round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Renders a number with comma thousands separators and at least one
/// fractional digit, e.g. `1,500,000.0` or `1,234.56`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = value.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "0"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rates() -> RateTable {
        RateTable::new(
            "USD",
            vec![
                ("USD".to_string(), 1.0),
                ("IDR".to_string(), 15000.0),
                ("EUR".to_string(), 0.9),
                ("GBP".to_string(), 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_usd_to_idr() {
        let rates = sample_rates();
        assert_eq!(convert(&rates, 100.0, "USD", "IDR").unwrap(), "1,500,000.0");
    }

    #[test]
    fn test_zero_amount_converts_to_zero() {
        let rates = sample_rates();
        for from in ["USD", "IDR", "EUR", "GBP"] {
            for to in ["USD", "IDR", "EUR", "GBP"] {
                assert_eq!(convert(&rates, 0.0, from, to).unwrap(), "0.0");
            }
        }
    }

    #[test]
    fn test_base_to_base_is_rounded_identity() {
        let rates = sample_rates();
        assert_eq!(convert(&rates, 1234.5, "USD", "USD").unwrap(), "1,234.5");
        assert_eq!(convert(&rates, 0.126, "USD", "USD").unwrap(), "0.13");
        assert_eq!(convert(&rates, 999999.994, "USD", "USD").unwrap(), "999,999.99");
    }

    #[test]
    fn test_cross_rate_goes_through_base() {
        let rates = sample_rates();
        // 9 EUR -> 10 USD -> 5 GBP
        assert_eq!(convert(&rates, 9.0, "EUR", "GBP").unwrap(), "5.0");
        assert_eq!(convert(&rates, 15000.0, "IDR", "USD").unwrap(), "1.0");
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let rates = sample_rates();
        let engine = ConversionEngine::default();
        for amount in [0.01, 1.0, 10.0, 123.45, 98765.43] {
            let there = engine
                .convert(&rates, &ConversionRequest::new(amount, "USD", "GBP").unwrap())
                .unwrap();
            let back = engine
                .convert(
                    &rates,
                    &ConversionRequest::new(there.value, "GBP", "USD").unwrap(),
                )
                .unwrap();
            assert!(
                (back.value - amount).abs() < 0.011,
                "{amount} came back as {}",
                back.value
            );
        }
    }

    #[test]
    fn test_unknown_currency_falls_back_to_one() {
        let rates = sample_rates();
        assert_eq!(convert(&rates, 42.0, "USD", "ZZZ").unwrap(), "42.0");
        assert_eq!(convert(&rates, 42.0, "ZZZ", "IDR").unwrap(), "630,000.0");
    }

    #[test]
    fn test_unknown_currency_rejected_by_strict_policy() {
        let rates = sample_rates();
        let engine = ConversionEngine::new(UnknownCurrencyPolicy::Reject);
        let request = ConversionRequest::new(42.0, "USD", "ZZZ").unwrap();
        assert_eq!(
            engine.convert(&rates, &request),
            Err(ConversionError::UnknownCurrency("ZZZ".to_string()))
        );
    }

    #[test]
    fn test_invalid_amounts() {
        for input in ["", "abc", "-1", "-0.01", "inf", "NaN", "1,000"] {
            assert!(
                matches!(parse_amount(input), Err(ConversionError::InvalidAmount(_))),
                "expected '{input}' to be rejected"
            );
        }
        assert!(matches!(
            ConversionRequest::new(-5.0, "USD", "IDR"),
            Err(ConversionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_valid_amounts() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_amount("1e3").unwrap(), 1000.0);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert_eq!(parse_amount("-0").unwrap(), 0.0);
    }

    #[test]
    fn test_overflow_is_an_arithmetic_error() {
        let rates = sample_rates();
        let engine = ConversionEngine::default();
        let request = ConversionRequest::new(f64::MAX, "USD", "IDR").unwrap();
        assert!(matches!(
            engine.convert(&rates, &request),
            Err(ConversionError::Arithmetic { .. })
        ));
    }

    #[test]
    fn test_conversion_display_echoes_input() {
        let rates = sample_rates();
        let request = ConversionRequest::parse("1000", "USD", "IDR").unwrap();
        let conversion = ConversionEngine::default()
            .convert(&rates, &request)
            .unwrap();
        assert_eq!(conversion.to_string(), "1,000.0 USD = 15,000,000.0 IDR");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0.0");
        assert_eq!(format_grouped(999.0), "999.0");
        assert_eq!(format_grouped(1000.0), "1,000.0");
        assert_eq!(format_grouped(1234.56), "1,234.56");
        assert_eq!(format_grouped(123456789.1), "123,456,789.1");
        assert_eq!(format_grouped(-1234.5), "-1,234.5");
        assert_eq!(format_grouped(0.05), "0.05");
    }
}
