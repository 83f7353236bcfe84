use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::table::{Alignment, Table, TableColumn};
use crate::pricing::{Packaging, PriceQuote, UnknownPackaging};

pub fn handle_packaging(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(raw) => {
            let packaging: Packaging = raw
                .parse()
                .map_err(|err: UnknownPackaging| CommandError::InvalidArguments(err.to_string()))?;
            context.pricing_form.select_packaging(packaging);
            cli_io::print_success(format!(
                "Packaging set to {} ({} ml).",
                packaging.label(),
                packaging.volume_ml()
            ));
        }
        None => {
            output::section("Packaging presets");
            for preset in Packaging::ALL {
                let marker = if preset == context.pricing_form.packaging {
                    "*"
                } else {
                    " "
                };
                output::plain(format!(
                    "{} {:<18} {} ml",
                    marker,
                    preset.label(),
                    preset.volume_ml()
                ));
            }
            cli_io::print_hint("Use `packaging <preset>` to change it, e.g. `packaging lata`.");
        }
    }
    Ok(())
}

pub fn handle_price(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        context.pricing_form.product_name = Some(args.join(" "));
    }

    if context.mode == CliMode::Interactive {
        prompt_pricing_form(context)?;
    }

    let quote = context.price_recipe()?;
    render_quote(context, &quote);
    Ok(())
}

/// Walks the cost and markup fields one prompt at a time, keeping each
/// previous answer as the editable default.
fn prompt_pricing_form(context: &mut ShellContext) -> Result<(), CommandError> {
    let theme = &context.theme;
    let form = &mut context.pricing_form;
    form.packaging_cost = cli_io::prompt_f64(theme, "Packaging cost", form.packaging_cost)?;
    form.label_cost = cli_io::prompt_f64(theme, "Label cost", form.label_cost)?;
    form.cap_cost = cli_io::prompt_f64(theme, "Cap cost", form.cap_cost)?;
    form.profit_margin = cli_io::prompt_f64(theme, "Profit margin %", form.profit_margin)?;
    form.card_fee = cli_io::prompt_f64(theme, "Card fee %", form.card_fee)?;
    form.sanitation_percent = cli_io::prompt_f64(theme, "Sanitation %", form.sanitation_percent)?;
    form.tax_percent = cli_io::prompt_f64(theme, "Tax %", form.tax_percent)?;
    Ok(())
}

fn render_quote(context: &ShellContext, quote: &PriceQuote) {
    let breakdown = quote.breakdown;

    output::section("Price breakdown");
    let mut table = Table::new(vec![
        TableColumn::new("", Alignment::Left),
        TableColumn::new("", Alignment::Right),
    ])
    .without_headers();
    let rows = [
        ("Ingredients", breakdown.ingredient_cost),
        ("Cost per liter", breakdown.cost_per_liter),
        ("Packaging", breakdown.packaging_cost),
        ("Label", breakdown.label_cost),
        ("Cap", breakdown.cap_cost),
        ("Subtotal", breakdown.subtotal),
        ("Profit", breakdown.profit_value),
        ("Card fee", breakdown.card_fee_value),
        ("Sanitation", breakdown.sanitation_value),
        ("Taxes", breakdown.tax_value),
        ("Total", breakdown.total_value),
    ];
    for (label, value) in rows {
        table.push_row(vec![label.to_string(), context.format_money(value)]);
    }
    output::plain(table.render());

    cli_io::print_success(format!(
        "Final sale price: {}",
        context.format_money(breakdown.final_sale_value)
    ));

    if let Some(summary) = &quote.summary {
        cli_io::print_info(format!(
            "Ingredients {} total, margin {}, {} ml per unit.",
            context.format_money(summary.total_ingredient_cost),
            context.format_percent(summary.profit_margin),
            summary.unit_volume_ml
        ));
    }
}
