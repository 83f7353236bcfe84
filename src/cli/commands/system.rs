use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "server",
            "Show or change the recipe server URL",
            "server [url]",
            cmd_server,
        ),
        CommandEntry::new(
            "defaults",
            "Show pricing defaults and the current form",
            "defaults",
            cmd_defaults,
        ),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandEntry::new("quit", "Exit the shell", "quit", cmd_exit),
    ]
}

fn cmd_server(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(url) => {
            context.set_server(url)?;
            cli_io::print_success(format!("Server set to {}.", context.config.server_url));
            cli_io::print_info("Cached recipes and catalogs were discarded.");
        }
        None => {
            cli_io::print_info(format!("Server: {}", context.config.server_url));
        }
    }
    Ok(())
}

fn cmd_defaults(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Configured defaults");
    cli_io::print_info(format!(
        "Profit margin: {}",
        context.format_percent(context.config.pricing.profit_margin)
    ));
    cli_io::print_info(format!(
        "Card fee: {}",
        context.format_percent(context.config.pricing.card_fee)
    ));
    cli_io::print_info(format!(
        "Sanitation: {}",
        context.format_percent(context.config.pricing.sanitation_percent)
    ));
    cli_io::print_info(format!(
        "Taxes: {}",
        context.format_percent(context.config.pricing.tax_percent)
    ));

    output::section("Current pricing form");
    let form = &context.pricing_form;
    cli_io::print_info(format!(
        "Packaging: {} ({} ml)",
        form.packaging.label(),
        form.unit_volume_ml
    ));
    cli_io::print_info(format!(
        "Packaging cost: {}",
        context.format_money(form.packaging_cost)
    ));
    cli_io::print_info(format!(
        "Label cost: {}",
        context.format_money(form.label_cost)
    ));
    cli_io::print_info(format!("Cap cost: {}", context.format_money(form.cap_cost)));
    cli_io::print_info(format!(
        "Profit margin: {}",
        context.format_percent(form.profit_margin)
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(entry) = context.registry.get(&command) {
            help::print_command(entry);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    cli_io::print_info(format!("brewcost {}", env!("CARGO_PKG_VERSION")));
    cli_io::print_info(format!("Recipe server: {}", context.config.server_url));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
