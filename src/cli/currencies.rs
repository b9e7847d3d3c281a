use super::ui;
use crate::core::RateTable;

/// Prints every currency the rate service offers.
pub fn run(rates: &RateTable) {
    println!(
        "{}\n",
        ui::style_text(
            &format!("{} currencies, base {}", rates.len(), rates.base()),
            ui::StyleType::Title
        )
    );
    println!("{}", ui::rate_table(rates));
}
