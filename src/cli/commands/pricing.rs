//! Sale-price commands: packaging presets and the server-side quote.

use crate::cli::commands::pricing_handlers;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "packaging",
            "Show or select the packaging preset",
            "packaging [preset]",
            pricing_handlers::handle_packaging,
        ),
        CommandEntry::new(
            "price",
            "Compute the sale price for the active recipe",
            "price [product-name]",
            pricing_handlers::handle_price,
        ),
    ]
}
