//! Core CLI loop, dispatch, and shell context helpers.

use std::io;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tokio::runtime::Runtime;

use crate::{
    api::HttpApi,
    catalog::{CatalogEntry, IngredientKind},
    config::{Config, ConfigManager},
    currency::{self, format_currency_value, CurrencyCode, LocaleConfig},
    errors::{ConfigError, SessionError},
    pricing::{PriceQuote, PricingForm},
    session::Session,
};

use super::commands;
use super::io as cli_io;
use super::output::{self, LoadingGuard};
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    /// Script mode is opted into via the environment; everything else is
    /// an interactive terminal.
    pub fn detect() -> Self {
        if std::env::var_os("BREWCOST_CLI_SCRIPT").is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Owns everything a command handler needs: the command registry, the loaded
/// configuration, the pricing form being edited, and the server session
/// together with the runtime that drives its futures.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) theme: ColorfulTheme,
    runtime: Runtime,
    pub(crate) session: Session<HttpApi>,
    pub(crate) config: Config,
    config_manager: ConfigManager,
    pub(crate) pricing_form: PricingForm,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        output::apply_config(&config);

        let runtime = Runtime::new()?;
        let session = Session::new(HttpApi::new(config.server_url.clone()));
        let pricing_form = PricingForm::from_defaults(&config.pricing);

        let mut context = Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            runtime,
            session,
            config,
            config_manager,
            pricing_form,
            running: true,
        };
        context.auto_open_last();
        Ok(context)
    }

    /// Reopens the recipe from the previous session. Failures are silent:
    /// the server may be down or the recipe gone, and the shell must still
    /// come up.
    fn auto_open_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(recipe_id) = self.config.last_recipe_id else {
            return;
        };
        if self
            .runtime
            .block_on(self.session.open_recipe(recipe_id))
            .is_ok()
        {
            if let Some(recipe) = self.session.active_recipe() {
                cli_io::print_success(format!("Automatically reopened recipe `{}`.", recipe.name));
            }
        }
    }

    fn loading(&self, message: &str) -> LoadingGuard {
        LoadingGuard::start(message, self.mode == CliMode::Interactive)
    }

    pub(crate) fn refresh_recipes(&mut self) -> Result<(), CommandError> {
        let _guard = self.loading("Fetching recipes");
        Ok(self.runtime.block_on(self.session.refresh_recipes())?)
    }

    pub(crate) fn sync_remote(&mut self) -> Result<String, CommandError> {
        let _guard = self.loading("Syncing recipes");
        Ok(self.runtime.block_on(self.session.sync_remote())?)
    }

    pub(crate) fn open_recipe(&mut self, recipe_id: i64) -> Result<(), CommandError> {
        let _guard = self.loading("Opening recipe");
        Ok(self.runtime.block_on(self.session.open_recipe(recipe_id))?)
    }

    pub(crate) fn save_recipe(&mut self) -> Result<i64, CommandError> {
        let _guard = self.loading("Saving recipe");
        Ok(self.runtime.block_on(self.session.save_recipe())?)
    }

    pub(crate) fn refresh_lines(&mut self) -> Result<(), CommandError> {
        let _guard = self.loading("Fetching ingredient lines");
        Ok(self.runtime.block_on(self.session.refresh_lines())?)
    }

    pub(crate) fn add_line(
        &mut self,
        kind: IngredientKind,
        entry_id: i64,
        quantity: f64,
    ) -> Result<(), CommandError> {
        let _guard = self.loading("Adding ingredient");
        Ok(self
            .runtime
            .block_on(self.session.add_line(kind, entry_id, quantity))?)
    }

    pub(crate) fn update_line_quantity(
        &mut self,
        line_id: i64,
        quantity: f64,
    ) -> Result<(), CommandError> {
        let _guard = self.loading("Updating line");
        Ok(self
            .runtime
            .block_on(self.session.update_line_quantity(line_id, quantity))?)
    }

    pub(crate) fn remove_line(&mut self, line_id: i64) -> Result<(), CommandError> {
        let _guard = self.loading("Removing line");
        Ok(self.runtime.block_on(self.session.remove_line(line_id))?)
    }

    pub(crate) fn catalog_entries(
        &mut self,
        kind: IngredientKind,
    ) -> Result<Vec<CatalogEntry>, CommandError> {
        let _guard = self.loading("Fetching catalog");
        let entries = self.runtime.block_on(self.session.catalog(kind))?;
        Ok(entries.to_vec())
    }

    pub(crate) fn price_recipe(&self) -> Result<PriceQuote, CommandError> {
        let _guard = self.loading("Computing price");
        Ok(self
            .runtime
            .block_on(self.session.price_recipe(&self.pricing_form))?)
    }

    pub(crate) fn persist_config(&self) -> Result<(), CommandError> {
        Ok(self.config_manager.save(&self.config)?)
    }

    /// Stores the active recipe's id in the configuration so the next
    /// interactive session reopens it.
    pub(crate) fn remember_active_recipe(&mut self) -> Result<(), CommandError> {
        let id = self.session.active_recipe().and_then(|recipe| recipe.id);
        if self.config.last_recipe_id != id {
            self.config.last_recipe_id = id;
            self.persist_config()?;
        }
        Ok(())
    }

    /// Points the session at a different server. Cached recipes, catalogs
    /// and the open ledger all belong to the old server, so the session is
    /// rebuilt from scratch.
    pub(crate) fn set_server(&mut self, url: &str) -> Result<(), CommandError> {
        let api = HttpApi::new(url);
        self.config.server_url = api.base_url().to_string();
        self.session = Session::new(api);
        self.persist_config()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        match self.session.active_recipe() {
            Some(recipe) => format!("brewcost ({})> ", recipe.name),
            None => "brewcost> ".to_string(),
        }
    }

    pub(crate) fn format_money(&self, amount: f64) -> String {
        let code = CurrencyCode::new(self.config.currency.clone());
        let locale = LocaleConfig::for_tag(&self.config.locale);
        format_currency_value(amount, &code, &locale)
    }

    pub(crate) fn format_percent(&self, value: f64) -> String {
        currency::format_percent(&LocaleConfig::for_tag(&self.config.locale), value)
    }

    pub(crate) fn format_quantity(&self, quantity: f64, unit: &str) -> String {
        currency::format_quantity(&LocaleConfig::for_tag(&self.config.locale), quantity, unit)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let nearest = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, best)) = nearest {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Session(SessionError::NoActiveRecipe) => {
                self.print_error("No recipe selected.");
                self.print_hint(
                    "Use `recipes` then `use <recipe-id>`, or `new <name>` to start one.",
                );
                Ok(())
            }
            CommandError::Session(SessionError::RecipeNotSaved) => {
                self.print_error("The active recipe only exists locally.");
                self.print_hint("Run `save` first; ingredient lines need a server-side recipe.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

pub(crate) fn parse_positive_f64(raw: &str, label: &str) -> Result<f64, CommandError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{label} must be numeric")))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CommandError::InvalidArguments(format!(
            "{label} must be greater than zero"
        )))
    }
}

pub(crate) fn parse_id(raw: &str, label: &str) -> Result<i64, CommandError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{label} must be numeric")))?;
    if id > 0 {
        Ok(id)
    } else {
        Err(CommandError::InvalidArguments(format!(
            "{label} must be a positive id"
        )))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_parse_accepts_decimals() {
        assert_eq!(parse_positive_f64("2.5", "quantity").ok(), Some(2.5));
    }

    #[test]
    fn positive_parse_rejects_zero_and_garbage() {
        assert!(parse_positive_f64("0", "quantity").is_err());
        assert!(parse_positive_f64("-3", "quantity").is_err());
        assert!(parse_positive_f64("abc", "quantity").is_err());
        assert!(parse_positive_f64("NaN", "quantity").is_err());
    }

    #[test]
    fn id_parse_requires_positive_integers() {
        assert_eq!(parse_id("42", "recipe-id").ok(), Some(42));
        assert!(parse_id("0", "recipe-id").is_err());
        assert!(parse_id("-1", "recipe-id").is_err());
        assert!(parse_id("4.2", "recipe-id").is_err());
    }

    #[test]
    fn session_errors_pass_through_transparently() {
        let err = CommandError::from(SessionError::NoActiveRecipe);
        assert_eq!(err.to_string(), "no active recipe");
    }

    #[test]
    fn cli_error_wraps_command_error_message() {
        let err = CliError::from(CommandError::InvalidArguments("bad input".into()));
        assert_eq!(err.to_string(), "bad input");
    }
}
