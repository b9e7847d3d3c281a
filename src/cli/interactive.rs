//! Terminal form for converting amounts one at a time.
//!
//! The form holds an amount field, a source and a target selection and a
//! result line. Selections are restricted to codes in the loaded rate table.

use super::ui;
use crate::core::config::SelectionDefaults;
use crate::core::{ConversionEngine, ConversionRequest, RateTable};
use anyhow::{Result, anyhow};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

const HELP: &str = "\
Commands:
  amount <value>   set the amount to convert
  from <CODE>      select the source currency
  to <CODE>        select the target currency
  convert          convert the amount
  clear            clear the amount and the result
  list             show available currencies
  help             show this help
  quit             leave the converter";

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    Amount(String),
    From(String),
    To(String),
    Convert,
    Clear,
    List,
    Help,
    Quit,
}

impl FromStr for FormAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let require_arg = |name: &str| {
            if arg.is_empty() {
                Err(anyhow!("Usage: {name} <value>"))
            } else {
                Ok(arg.to_string())
            }
        };

        match command.to_lowercase().as_str() {
            "amount" | "a" => Ok(FormAction::Amount(require_arg("amount")?)),
            "from" | "f" => Ok(FormAction::From(require_arg("from")?.to_uppercase())),
            "to" | "t" => Ok(FormAction::To(require_arg("to")?.to_uppercase())),
            "convert" | "c" => Ok(FormAction::Convert),
            "clear" => Ok(FormAction::Clear),
            "list" | "ls" => Ok(FormAction::List),
            "help" | "?" => Ok(FormAction::Help),
            "quit" | "exit" | "q" => Ok(FormAction::Quit),
            _ => Err(anyhow!("Unknown command '{command}', type 'help' for a list")),
        }
    }
}

/// What the form reports back after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Updated,
    Result(String),
    Warning(String),
    Error(String),
    Currencies,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterForm {
    amount: String,
    from: String,
    to: String,
    result: Option<String>,
}

impl ConverterForm {
    /// Starts with the configured selections, or the base currency when a
    /// configured code is not in the table.
    pub fn new(defaults: &SelectionDefaults, rates: &RateTable) -> Self {
        let pick = |code: &str| {
            let code = code.to_uppercase();
            if rates.contains(&code) {
                code
            } else {
                rates.base().to_string()
            }
        };
        ConverterForm {
            amount: String::new(),
            from: pick(&defaults.from),
            to: pick(&defaults.to),
            result: None,
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn apply(
        &mut self,
        action: FormAction,
        rates: &RateTable,
        engine: &ConversionEngine,
    ) -> Feedback {
        match action {
            FormAction::Amount(value) => {
                self.amount = value;
                Feedback::Updated
            }
            FormAction::From(code) => match select(rates, code) {
                Ok(code) => {
                    self.from = code;
                    Feedback::Updated
                }
                Err(message) => Feedback::Error(message),
            },
            FormAction::To(code) => match select(rates, code) {
                Ok(code) => {
                    self.to = code;
                    Feedback::Updated
                }
                Err(message) => Feedback::Error(message),
            },
            FormAction::Convert => self.convert(rates, engine),
            FormAction::Clear => {
                self.amount.clear();
                self.result = None;
                Feedback::Updated
            }
            FormAction::List => Feedback::Currencies,
            FormAction::Help => Feedback::Help,
            FormAction::Quit => Feedback::Quit,
        }
    }

    fn convert(&mut self, rates: &RateTable, engine: &ConversionEngine) -> Feedback {
        let outcome = ConversionRequest::parse(&self.amount, &self.from, &self.to)
            .and_then(|request| engine.convert(rates, &request));

        match outcome {
            Ok(conversion) => {
                let line = conversion.to_string();
                self.result = Some(line.clone());
                Feedback::Result(line)
            }
            Err(err) => {
                debug!(error = %err, "Conversion failed");
                match ui::describe_conversion_error(&err) {
                    (ui::Severity::Warning, message) => Feedback::Warning(message),
                    (ui::Severity::Error, message) => Feedback::Error(message),
                }
            }
        }
    }
}

fn select(rates: &RateTable, code: String) -> Result<String, String> {
    if rates.contains(&code) {
        Ok(code)
    } else {
        Err(format!("{code} is not an available currency"))
    }
}

fn write_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{}",
        ui::style_text("Currency Converter", ui::StyleType::Title)
    )?;
    let today = chrono::Local::now().format("%A, %B %d, %Y").to_string();
    writeln!(
        out,
        "{}",
        ui::style_text(
            &format!("{today}  v{}", env!("CARGO_PKG_VERSION")),
            ui::StyleType::Subtle
        )
    )?;
    Ok(())
}

fn write_form<W: Write>(out: &mut W, form: &ConverterForm) -> Result<()> {
    let amount = if form.amount().is_empty() {
        ui::style_text("(empty)", ui::StyleType::Subtle)
    } else {
        form.amount().to_string()
    };
    writeln!(
        out,
        "{} {}  {} {}  {} {}",
        ui::style_text("Amount:", ui::StyleType::Label),
        amount,
        ui::style_text("From:", ui::StyleType::Label),
        form.from(),
        ui::style_text("To:", ui::StyleType::Label),
        form.to()
    )?;
    Ok(())
}

/// Runs the form until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
    rates: &RateTable,
    engine: &ConversionEngine,
    defaults: &SelectionDefaults,
) -> Result<()> {
    let mut form = ConverterForm::new(defaults, rates);

    write_header(&mut out)?;
    writeln!(
        out,
        "{} currencies loaded, type 'help' for commands.",
        rates.len()
    )?;
    write_form(&mut out, &form)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let action = match line.parse::<FormAction>() {
            Ok(action) => action,
            Err(e) => {
                writeln!(out, "{}", ui::style_message(ui::Severity::Warning, &e.to_string()))?;
                continue;
            }
        };

        match form.apply(action, rates, engine) {
            Feedback::Updated => write_form(&mut out, &form)?,
            Feedback::Result(text) => {
                writeln!(out, "{}", ui::style_text(&text, ui::StyleType::Result))?
            }
            Feedback::Warning(message) => {
                writeln!(out, "{}", ui::style_message(ui::Severity::Warning, &message))?
            }
            Feedback::Error(message) => {
                writeln!(out, "{}", ui::style_message(ui::Severity::Error, &message))?
            }
            Feedback::Currencies => writeln!(out, "{}", ui::rate_table(rates))?,
            Feedback::Help => writeln!(out, "{HELP}")?,
            Feedback::Quit => break,
        }
    }

    Ok(())
}

pub fn run(
    rates: &RateTable,
    engine: &ConversionEngine,
    defaults: &SelectionDefaults,
) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(stdin.lock(), stdout.lock(), rates, engine, defaults)
}
