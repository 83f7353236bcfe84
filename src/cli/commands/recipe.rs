//! Recipe-level commands: listing, opening, drafting and saving.

use crate::cli::commands::recipe_handlers;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "recipes",
            "List recipes stored on the server",
            "recipes",
            recipe_handlers::handle_recipes,
        ),
        CommandEntry::new(
            "sync",
            "Pull recipes from the external recipe source",
            "sync",
            recipe_handlers::handle_sync,
        ),
        CommandEntry::new(
            "use",
            "Open a recipe by id",
            "use <recipe-id>",
            recipe_handlers::handle_use,
        ),
        CommandEntry::new(
            "new",
            "Start a new local recipe",
            "new <name> [volume-liters] [efficiency]",
            recipe_handlers::handle_new,
        ),
        CommandEntry::new(
            "describe",
            "Set the active recipe's description",
            "describe [text]",
            recipe_handlers::handle_describe,
        ),
        CommandEntry::new(
            "save",
            "Create or update the active recipe on the server",
            "save",
            recipe_handlers::handle_save,
        ),
        CommandEntry::new(
            "info",
            "Show the active recipe",
            "info",
            recipe_handlers::handle_info,
        ),
        CommandEntry::new(
            "bill",
            "Show the imported ingredient bill",
            "bill",
            recipe_handlers::handle_bill,
        ),
    ]
}
