use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::config::Theme;
use crate::ledger::BudgetBand;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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
    pub theme: Theme,
    /// Disables colour and icons, e.g. for scripted runs.
    pub plain: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn label(kind: MessageKind) -> Option<&'static str> {
    match kind {
        MessageKind::Info | MessageKind::Section => None,
        MessageKind::Success => Some("[ok]"),
        MessageKind::Warning => Some("[!]"),
        MessageKind::Error => Some("[x]"),
        MessageKind::Hint => Some("hint:"),
    }
}

pub(crate) fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    let formatted = match (kind, label(kind)) {
        (MessageKind::Section, _) => format!("=== {} ===", text.trim()),
        (_, Some(icon)) => format!("{icon} {text}"),
        (_, None) => text,
    };

    if prefs.plain {
        return formatted;
    }

    let dark = prefs.theme == Theme::Dark;
    match kind {
        MessageKind::Success if dark => formatted.bright_green().to_string(),
        MessageKind::Success => formatted.green().to_string(),
        MessageKind::Warning if dark => formatted.bright_yellow().to_string(),
        MessageKind::Warning => formatted.yellow().to_string(),
        MessageKind::Error if dark => formatted.bright_red().to_string(),
        MessageKind::Error => formatted.red().to_string(),
        MessageKind::Hint => formatted.dimmed().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error | MessageKind::Warning => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
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

/// Formats an amount as dollars with two decimals.
pub fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Colours a budget band label the way the progress bars are signalled.
pub fn band_label(band: BudgetBand) -> String {
    let text = format!("[{}]", band);
    if preferences().plain {
        return text;
    }
    match band {
        BudgetBand::Danger => text.red().bold().to_string(),
        BudgetBand::Warning => text.yellow().to_string(),
        BudgetBand::Normal => text.green().to_string(),
        BudgetBand::Undefined => text.dimmed().to_string(),
    }
}

/// Text progress bar, `width` cells wide.
pub fn progress_bar(percent: Option<f64>, width: usize) -> String {
    let Some(percent) = percent else {
        return format!("[{}]", "?".repeat(width));
    };
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(money(30.0), "$30.00");
        assert_eq!(money(2.345), "$2.35");
        assert_eq!(money(-5.0), "-$5.00");
    }

    #[test]
    fn plain_style_keeps_icons_without_colour() {
        let prefs = OutputPreferences {
            theme: Theme::Dark,
            plain: true,
        };
        assert_eq!(apply_style(MessageKind::Error, "boom", &prefs), "[x] boom");
        assert_eq!(apply_style(MessageKind::Section, " Budgets ", &prefs), "=== Budgets ===");
        assert_eq!(apply_style(MessageKind::Info, "plain", &prefs), "plain");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(Some(50.0), 10), "[#####-----]");
        assert_eq!(progress_bar(Some(100.0), 4), "[####]");
        assert_eq!(progress_bar(None, 3), "[???]");
    }
}
