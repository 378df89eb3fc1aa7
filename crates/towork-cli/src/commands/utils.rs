use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use towork_application::AppContext;
use towork_core::status::Tone;
use towork_infrastructure::ConfigService;

/// Builds the application context from the user's config and session files.
pub fn load_context() -> Result<AppContext> {
    AppContext::load(&ConfigService::new()).context("Failed to initialise the towork client")
}

/// Colours `text` the way the web client colours a status chip.
pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Primary => text.bright_blue(),
        Tone::Accent => text.bright_magenta(),
        Tone::Warn => text.yellow(),
        Tone::Success => text.green(),
        Tone::Neutral => text.bright_black(),
    }
}

pub fn title(text: &str) {
    println!("{}", text.bright_magenta().bold());
}

pub fn success(text: &str) {
    println!("{}", text.green());
}

pub fn notice(text: &str) {
    println!("{}", text.bright_black());
}

/// Prints the message a screen would show for a failed action.
pub fn failure(message: Option<&str>) {
    if let Some(message) = message {
        eprintln!("{}", message.red());
    }
}

/// Puts the message a view-model recorded in front of the error chain.
pub trait Shown<T> {
    fn shown(self, message: &Option<String>) -> Result<T>;
}

impl<T> Shown<T> for towork_core::Result<T> {
    fn shown(self, message: &Option<String>) -> Result<T> {
        self.map_err(|err| match message {
            Some(message) => anyhow::Error::new(err).context(message.clone()),
            None => err.into(),
        })
    }
}

/// Text shortened to `max` characters, with an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Date part of an ISO timestamp.
pub fn day(timestamp: Option<&str>) -> &str {
    timestamp
        .and_then(|ts| ts.get(..10))
        .unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Développement", 5), "Déve…");
        assert_eq!(truncate("Logo", 5), "Logo");
    }

    #[test]
    fn day_keeps_date_part() {
        assert_eq!(day(Some("2024-05-01T10:00:00")), "2024-05-01");
        assert_eq!(day(Some("hier")), "-");
        assert_eq!(day(None), "-");
    }
}
