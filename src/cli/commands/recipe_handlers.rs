use crate::cli::commands::line_handlers;
use crate::cli::core::{
    parse_id, parse_positive_f64, CliMode, CommandError, CommandResult, ShellContext,
};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::table::{Alignment, Table, TableColumn};
use crate::errors::SessionError;

pub fn handle_recipes(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh_recipes()?;

    let recipes = context.session.recipes();
    if recipes.is_empty() {
        cli_io::print_warning("No recipes on the server yet.");
        cli_io::print_hint("Use `sync` to import them or `new <name>` to draft one.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Id", Alignment::Right),
        TableColumn::capped("Name", Alignment::Left, 32),
        TableColumn::capped("Style", Alignment::Left, 24),
        TableColumn::new("Volume", Alignment::Right),
        TableColumn::new("ABV", Alignment::Right),
        TableColumn::new("IBU", Alignment::Right),
    ]);
    for recipe in recipes {
        table.push_row(vec![
            or_dash(recipe.id.map(|id| id.to_string())),
            recipe.name.clone(),
            or_dash(recipe.style.clone()),
            or_dash(recipe.volume_liters.map(|v| format!("{v} L"))),
            or_dash(recipe.abv.map(|v| format!("{v:.1}%"))),
            or_dash(recipe.ibu.map(|v| format!("{v:.0}"))),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

pub fn handle_sync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let message = context.sync_remote()?;
    cli_io::print_success(message);
    cli_io::print_info(format!(
        "{} recipes available.",
        context.session.recipes().len()
    ));
    Ok(())
}

pub fn handle_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: use <recipe-id>".into(),
        ));
    };
    let recipe_id = parse_id(raw, "recipe-id")?;

    context.open_recipe(recipe_id)?;
    context.remember_active_recipe()?;
    if let Some(recipe) = context.session.active_recipe() {
        cli_io::print_success(format!("Recipe `{}` opened.", recipe.name));
    }
    line_handlers::print_ledger(context);
    Ok(())
}

pub fn handle_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: new <name> [volume-liters] [efficiency]".into(),
        ));
    };
    let volume = args
        .get(1)
        .map(|raw| parse_positive_f64(raw, "volume-liters"))
        .transpose()?;
    let efficiency = args
        .get(2)
        .map(|raw| parse_positive_f64(raw, "efficiency"))
        .transpose()?;

    context.session.new_recipe(*name, volume, efficiency);
    cli_io::print_success(format!("Recipe `{}` created locally.", name));
    cli_io::print_hint("Use `describe <text>` to annotate it and `save` to store it on the server.");
    Ok(())
}

pub fn handle_describe(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let text = if args.is_empty() {
        // Bare `describe` opens an editable prompt, but only where a
        // terminal is attached.
        if context.mode != CliMode::Interactive {
            return Err(CommandError::InvalidArguments(
                "usage: describe <text>".into(),
            ));
        }
        let Some(recipe) = context.session.active_recipe() else {
            return Err(CommandError::Session(SessionError::NoActiveRecipe));
        };
        let current = recipe.description.clone();
        cli_io::prompt_text(&context.theme, "Description", current.as_deref())?
    } else {
        args.join(" ")
    };

    context.session.set_description(text)?;
    cli_io::print_success("Description updated.");
    Ok(())
}

pub fn handle_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let recipe_id = context.save_recipe()?;
    context.remember_active_recipe()?;
    cli_io::print_success(format!("Recipe saved with id {}.", recipe_id));
    Ok(())
}

pub fn handle_info(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(recipe) = context.session.active_recipe() else {
        return Err(CommandError::Session(SessionError::NoActiveRecipe));
    };

    output::section(format!("Recipe: {}", recipe.name));
    cli_io::print_info(format!(
        "Id: {}",
        recipe
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(unsaved)".into())
    ));
    if let Some(description) = &recipe.description {
        cli_io::print_info(format!("Description: {}", description));
    }
    if let Some(volume) = recipe.volume_liters {
        cli_io::print_info(format!("Volume: {} L", volume));
    }
    if let Some(efficiency) = recipe.efficiency {
        cli_io::print_info(format!("Efficiency: {}%", efficiency));
    }
    if let Some(style) = &recipe.style {
        cli_io::print_info(format!("Style: {}", style));
    }
    if let Some(abv) = recipe.abv {
        cli_io::print_info(format!("ABV: {}%", abv));
    }
    if let Some(ibu) = recipe.ibu {
        cli_io::print_info(format!("IBU: {}", ibu));
    }
    if let Some(color) = recipe.color {
        cli_io::print_info(format!("Color: {} EBC", color));
    }
    if let Some(og) = recipe.og {
        cli_io::print_info(format!("OG: {}", og));
    }
    if let Some(fg) = recipe.fg {
        cli_io::print_info(format!("FG: {}", fg));
    }
    if let Some(rating) = recipe.rating {
        cli_io::print_info(format!("Rating: {}", rating));
    }
    if let Some(notes) = &recipe.notes {
        cli_io::print_info(format!("Notes: {}", notes));
    }
    if let Some(created) = recipe.created_at {
        cli_io::print_info(format!("Created: {}", created.format("%Y-%m-%d %H:%M")));
    }
    if let Some(updated) = recipe.updated_at {
        cli_io::print_info(format!("Updated: {}", updated.format("%Y-%m-%d %H:%M")));
    }
    Ok(())
}

/// The imported bill is display-only. Costs never appear here: pricing an
/// ingredient requires an explicit ledger line against the catalog.
pub fn handle_bill(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(recipe) = context.session.active_recipe() else {
        return Err(CommandError::Session(SessionError::NoActiveRecipe));
    };

    let Some(bill) = recipe.bill.as_ref().filter(|bill| !bill.is_empty()) else {
        cli_io::print_warning("No imported ingredient bill for this recipe.");
        cli_io::print_hint("The bill only exists on recipes imported via `sync`.");
        return Ok(());
    };

    if !bill.fermentables.is_empty() {
        output::section("Fermentables");
        let mut table = Table::new(vec![
            TableColumn::capped("Name", Alignment::Left, 32),
            TableColumn::capped("Supplier", Alignment::Left, 20),
            TableColumn::new("Amount", Alignment::Right),
            TableColumn::new("Yield", Alignment::Right),
            TableColumn::new("Color", Alignment::Right),
        ]);
        for item in &bill.fermentables {
            table.push_row(vec![
                item.name.clone(),
                or_dash(item.supplier.clone()),
                or_dash(item.amount.map(|v| format!("{v} kg"))),
                or_dash(item.yield_percent.map(|v| format!("{v}%"))),
                or_dash(item.color.map(|v| v.to_string())),
            ]);
        }
        output::plain(table.render());
    }

    if !bill.hops.is_empty() {
        output::section("Hops");
        let mut table = Table::new(vec![
            TableColumn::capped("Name", Alignment::Left, 32),
            TableColumn::capped("Supplier", Alignment::Left, 20),
            TableColumn::new("Amount", Alignment::Right),
            TableColumn::new("Alpha", Alignment::Right),
            TableColumn::new("Use", Alignment::Left),
            TableColumn::new("Time", Alignment::Right),
        ]);
        for item in &bill.hops {
            table.push_row(vec![
                item.name.clone(),
                or_dash(item.supplier.clone()),
                or_dash(item.amount.map(|v| format!("{v} g"))),
                or_dash(item.alpha.map(|v| format!("{v}%"))),
                or_dash(item.usage.clone()),
                or_dash(item.time.map(|v| format!("{v} min"))),
            ]);
        }
        output::plain(table.render());
    }

    if !bill.yeasts.is_empty() {
        output::section("Yeasts");
        let mut table = Table::new(vec![
            TableColumn::capped("Name", Alignment::Left, 32),
            TableColumn::capped("Supplier", Alignment::Left, 20),
            TableColumn::new("Amount", Alignment::Right),
            TableColumn::new("Attenuation", Alignment::Right),
            TableColumn::new("Type", Alignment::Left),
        ]);
        for item in &bill.yeasts {
            table.push_row(vec![
                item.name.clone(),
                or_dash(item.supplier.clone()),
                or_dash(item.amount.map(|v| v.to_string())),
                or_dash(item.attenuation.map(|v| format!("{v}%"))),
                or_dash(item.kind.clone()),
            ]);
        }
        output::plain(table.render());
    }

    Ok(())
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}
