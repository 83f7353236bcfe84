//! Console interaction for command handlers: notification passthroughs
//! and the dialoguer prompts used in interactive mode.

use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::cli::core::CommandError;
use crate::cli::output;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Asks a yes/no question, with `default` chosen on a bare Enter.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Asks for free-form text, optionally pre-filled with editable text.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: Option<&str>,
) -> Result<String, CommandError> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }
    input.interact_text().map_err(CommandError::from)
}

/// Asks for a non-negative number, pre-filled with the current value.
pub fn prompt_f64(theme: &ColorfulTheme, prompt: &str, initial: f64) -> Result<f64, CommandError> {
    Input::<f64>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial.to_string())
        .validate_with(|value: &f64| -> Result<(), &str> {
            if *value < 0.0 {
                Err("Value cannot be negative")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(CommandError::from)
}
