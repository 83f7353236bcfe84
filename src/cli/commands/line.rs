//! Ingredient ledger commands: the costed line listing and its mutations.

use crate::cli::commands::line_handlers;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "lines",
            "Show the active recipe's costed ingredient ledger",
            "lines",
            line_handlers::handle_lines,
        ),
        CommandEntry::new(
            "add",
            "Add a catalog entry to the ledger",
            "add <fermentable|hop|yeast> <entry-id> <quantity>",
            line_handlers::handle_add,
        ),
        CommandEntry::new(
            "qty",
            "Change a line's quantity",
            "qty <line-id> <quantity>",
            line_handlers::handle_qty,
        ),
        CommandEntry::new(
            "rm",
            "Remove a line from the ledger",
            "rm <line-id>",
            line_handlers::handle_rm,
        ),
        CommandEntry::new(
            "catalog",
            "List a category's priced catalog",
            "catalog <fermentable|hop|yeast>",
            line_handlers::handle_catalog,
        ),
    ]
}
