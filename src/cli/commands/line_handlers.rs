use crate::catalog::{IngredientKind, PriceBasis, UnknownKind};
use crate::cli::core::{
    parse_id, parse_positive_f64, CliMode, CommandError, CommandResult, ShellContext,
};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::table::{Alignment, Table, TableColumn};

pub fn handle_lines(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh_lines()?;
    print_ledger(context);
    Ok(())
}

pub fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_kind, raw_entry, raw_qty] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: add <fermentable|hop|yeast> <entry-id> <quantity>".into(),
        ));
    };
    let kind = parse_kind(raw_kind)?;
    let entry_id = parse_id(raw_entry, "entry-id")?;
    let quantity = parse_positive_f64(raw_qty, "quantity")?;

    context.add_line(kind, entry_id, quantity)?;

    // The refreshed ledger carries the server-assigned line id; the newest
    // row matching the request is the one just added.
    let added = context.session.ledger().and_then(|view| {
        view.lines
            .iter()
            .filter(|line| line.line.entry_id == entry_id && line.line.kind == kind)
            .max_by_key(|line| line.line.id)
    });
    match added {
        Some(line) => cli_io::print_success(format!(
            "Added `{}` ({}).",
            line.name,
            context.format_quantity(line.line.quantity, kind.unit_label())
        )),
        None => cli_io::print_success("Ingredient added."),
    }
    print_ledger(context);
    Ok(())
}

pub fn handle_qty(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id, raw_qty] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: qty <line-id> <quantity>".into(),
        ));
    };
    let line_id = parse_id(raw_id, "line-id")?;
    let quantity = parse_positive_f64(raw_qty, "quantity")?;

    context.update_line_quantity(line_id, quantity)?;
    cli_io::print_success(format!("Line {} updated.", line_id));
    print_ledger(context);
    Ok(())
}

pub fn handle_rm(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: rm <line-id>".into()));
    };
    let line_id = parse_id(raw, "line-id")?;

    if context.mode == CliMode::Interactive {
        let prompt = match context
            .session
            .ledger()
            .and_then(|view| view.find_line(line_id))
        {
            Some(line) => format!("Remove `{}` (line {})?", line.name, line_id),
            None => format!("Remove line {}?", line_id),
        };
        if !cli_io::confirm_action(&context.theme, &prompt, false)? {
            cli_io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    context.remove_line(line_id)?;
    cli_io::print_success(format!("Line {} removed.", line_id));
    print_ledger(context);
    Ok(())
}

pub fn handle_catalog(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: catalog <fermentable|hop|yeast>".into(),
        ));
    };
    let kind = parse_kind(raw)?;

    let entries = context.catalog_entries(kind)?;
    if entries.is_empty() {
        cli_io::print_warning("Catalog is empty.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Id", Alignment::Right),
        TableColumn::capped("Name", Alignment::Left, 36),
        TableColumn::capped("Supplier", Alignment::Left, 20),
        TableColumn::new("Price", Alignment::Right),
    ]);
    for entry in &entries {
        let price = entry.unit_price(kind.basis());
        table.push_row(vec![
            entry.id.to_string(),
            entry.name.clone(),
            entry.supplier.clone().unwrap_or_else(|| "-".into()),
            format!("{}{}", context.format_money(price), price_suffix(kind)),
        ]);
    }
    output::plain(table.render());
    cli_io::print_hint(format!(
        "Use `add {} <entry-id> <quantity>` to add one.",
        raw.to_lowercase()
    ));
    Ok(())
}

/// Renders whatever ledger the session holds, without touching the server.
pub(crate) fn print_ledger(context: &ShellContext) {
    let Some(view) = context.session.ledger() else {
        cli_io::print_warning("Ledger not loaded.");
        return;
    };

    if view.is_empty() {
        cli_io::print_info("No ingredient lines yet.");
        cli_io::print_hint("Use `catalog <fermentable|hop|yeast>` then `add` to build the ledger.");
    } else {
        let mut table = Table::new(vec![
            TableColumn::new("Id", Alignment::Right),
            TableColumn::capped("Ingredient", Alignment::Left, 36),
            TableColumn::new("Category", Alignment::Left),
            TableColumn::new("Qty", Alignment::Right),
            TableColumn::new("Unit price", Alignment::Right),
            TableColumn::new("Cost", Alignment::Right),
        ]);
        for line in &view.lines {
            let kind = line.line.kind;
            table.push_row(vec![
                line.line.id.to_string(),
                line.name.clone(),
                kind.label().to_string(),
                context.format_quantity(line.line.quantity, kind.unit_label()),
                format!(
                    "{}{}",
                    context.format_money(line.unit_price),
                    price_suffix(kind)
                ),
                context.format_money(line.cost),
            ]);
        }
        output::plain(table.render());
    }

    let totals = view.totals;
    cli_io::print_info(format!(
        "Fermentables: {}",
        context.format_money(totals.fermentable)
    ));
    cli_io::print_info(format!("Hops: {}", context.format_money(totals.hop)));
    cli_io::print_info(format!("Yeasts: {}", context.format_money(totals.yeast)));
    if totals.other > 0.0 {
        cli_io::print_info(format!("Other: {}", context.format_money(totals.other)));
    }
    cli_io::print_success(format!(
        "Total: {} ({} per liter)",
        context.format_money(totals.grand),
        context.format_money(totals.per_liter)
    ));
}

fn parse_kind(raw: &str) -> Result<IngredientKind, CommandError> {
    raw.parse()
        .map_err(|err: UnknownKind| CommandError::InvalidArguments(err.to_string()))
}

fn price_suffix(kind: IngredientKind) -> &'static str {
    match kind.basis() {
        PriceBasis::PerKilogram => "/kg",
        PriceBasis::PerUnit => "/un",
    }
}
