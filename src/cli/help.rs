use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Alignment, Table, TableColumn};

/// Renders the command list in registration order.
pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let mut table = Table::new(vec![
        TableColumn::new("Command", Alignment::Left),
        TableColumn::capped("Description", Alignment::Left, 60),
    ])
    .without_headers();
    for entry in registry.list() {
        table.push_row(vec![entry.name.to_string(), entry.description.to_string()]);
    }
    output::plain(table.render());
    output::hint("Use `help <command>` for usage details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::plain(format!("  {}", entry.description));
    output::plain(format!("  usage: {}", entry.usage));
}
