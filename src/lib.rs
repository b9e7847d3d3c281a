pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConversionEngine, RateProvider, RateTable};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Interactive,
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Currencies,
}

/// Loads the configuration, fetches rates once and runs `command`.
///
/// A failed fetch ends the run: there is no usable rate table to work with.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        base_currency = %config.base_currency,
        policy = ?config.unknown_currency,
        "Loaded config"
    );

    let provider =
        providers::ExchangeRateApiProvider::new(&config.endpoint(), &config.base_currency);
    let rates = load_rates(&provider).await?;
    let engine = ConversionEngine::new(config.unknown_currency);

    match command {
        AppCommand::Interactive => cli::interactive::run(&rates, &engine, &config.defaults),
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&rates, &engine, &amount, &from, &to)
        }
        AppCommand::Currencies => {
            cli::currencies::run(&rates);
            Ok(())
        }
    }
}

/// Fetches the rate table, reporting a failure to the user before returning it.
pub async fn load_rates(provider: &dyn RateProvider) -> Result<RateTable> {
    let pb = cli::ui::new_spinner("Fetching currency rates...");
    let result = provider.fetch().await;
    pb.finish_and_clear();

    match result {
        Ok(rates) => Ok(rates),
        Err(e) => {
            eprintln!(
                "{}",
                cli::ui::style_message(
                    cli::ui::Severity::Error,
                    &format!("Currency rates could not be loaded. {e}")
                )
            );
            Err(e.into())
        }
    }
}
