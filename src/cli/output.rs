use std::fmt;
use std::io::{self, Write};
use std::sync::{OnceLock, RwLock};

use colored::Colorize;

use crate::config::Config;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    pub plain_mode: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

fn preferences_lock() -> &'static RwLock<OutputPreferences> {
    PREFERENCES.get_or_init(RwLock::default)
}

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut guard) = preferences_lock().write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    preferences_lock()
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

pub fn apply_config(config: &Config) {
    set_preferences(OutputPreferences {
        plain_mode: config.plain_output,
    });
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info => format!("INFO: [i] {text}"),
        MessageKind::Success => format!("SUCCESS: [ok] {text}"),
        MessageKind::Warning => format!("WARNING: [!] {text}"),
        MessageKind::Error => format!("ERROR: [x] {text}"),
        MessageKind::Hint => format!("HINT: [?] {text}"),
    };

    if prefs.plain_mode {
        return formatted;
    }

    match kind {
        MessageKind::Info => formatted,
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &current_preferences());
    if kind == MessageKind::Section {
        println!("\n{formatted}");
    } else {
        println!("{formatted}");
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints pre-formatted text (tables) without a label prefix.
pub fn plain(message: impl fmt::Display) {
    println!("{}", message);
}

/// Inline progress marker for a network call. Printing happens on
/// construction; dropping the guard erases the line again, so the marker
/// disappears on success and failure alike.
pub struct LoadingGuard {
    width: usize,
    active: bool,
}

impl LoadingGuard {
    pub fn start(message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self {
                width: 0,
                active: false,
            };
        }
        let text = format!("{message}... ");
        print!("{text}");
        let _ = io::stdout().flush();
        Self {
            width: text.chars().count(),
            active: true,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        print!("\r{:width$}\r", "", width = self.width);
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_strips_color_codes() {
        let prefs = OutputPreferences { plain_mode: true };
        let styled = apply_style(MessageKind::Error, "boom", &prefs);
        assert_eq!(styled, "ERROR: [x] boom");
    }

    #[test]
    fn sections_are_framed() {
        let prefs = OutputPreferences { plain_mode: true };
        assert_eq!(
            apply_style(MessageKind::Section, "Totals", &prefs),
            "=== Totals ==="
        );
    }
}
