use crate::core::{ConversionError, RateTable};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Result,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// How serious a message shown to the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Maps a conversion failure to the message shown in the form.
pub fn describe_conversion_error(err: &ConversionError) -> (Severity, String) {
    match err {
        ConversionError::InvalidAmount(_) => (
            Severity::Warning,
            "Please enter a valid number in the Amount field!".to_string(),
        ),
        ConversionError::UnknownCurrency(code) => (
            Severity::Error,
            format!("{code} is not an available currency"),
        ),
        ConversionError::Arithmetic { .. } => (
            Severity::Error,
            format!("Failed to convert currency: {err}"),
        ),
    }
}

pub fn style_message(severity: Severity, message: &str) -> String {
    match severity {
        Severity::Warning => style_text(&format!("WARNING! {message}"), StyleType::Warning),
        Severity::Error => style_text(&format!("Error: {message}"), StyleType::Error),
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Lists every available currency with its rate against the base.
pub fn rate_table(rates: &RateTable) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Currency"),
        header_cell(&format!("Rate (per 1 {})", rates.base())),
    ]);

    for (code, rate) in rates.iter() {
        let code_cell = if code == rates.base() {
            Cell::new(code).add_attribute(Attribute::Bold)
        } else {
            Cell::new(code)
        };
        table.add_row(vec![
            code_cell,
            Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Spinner shown while the rate table is being fetched.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
