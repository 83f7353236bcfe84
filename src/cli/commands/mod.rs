pub mod line;
pub mod line_handlers;
pub mod pricing;
pub mod pricing_handlers;
pub mod recipe;
pub mod recipe_handlers;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "recipes",
    "sync",
    "use",
    "new",
    "describe",
    "save",
    "info",
    "bill",
    "lines",
    "add",
    "qty",
    "rm",
    "catalog",
    "packaging",
    "price",
    "defaults",
    "server",
    "help",
    "version",
    "exit",
    "quit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(recipe::definitions());
    commands.extend(line::definitions());
    commands.extend(pricing::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}
