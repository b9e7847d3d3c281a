use super::ui;
use crate::core::{ConversionEngine, ConversionRequest, RateTable};
use anyhow::Result;

/// Converts a single amount and prints the result line.
pub fn run(
    rates: &RateTable,
    engine: &ConversionEngine,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let request = ConversionRequest::parse(amount, &from.to_uppercase(), &to.to_uppercase());
    let conversion = match request.and_then(|request| engine.convert(rates, &request)) {
        Ok(conversion) => conversion,
        Err(err) => {
            let (severity, message) = ui::describe_conversion_error(&err);
            eprintln!("{}", ui::style_message(severity, &message));
            return Err(err.into());
        }
    };

    println!(
        "{}",
        ui::style_text(&conversion.to_string(), ui::StyleType::Result)
    );
    Ok(())
}
