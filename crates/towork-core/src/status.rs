//! Presentation hints shared by every backend status enum.

use serde::{Deserialize, Serialize};

/// Colour family a status is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Primary,
    Accent,
    Warn,
    Success,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Primary => "primary",
            Tone::Accent => "accent",
            Tone::Warn => "warn",
            Tone::Success => "success",
            Tone::Neutral => "neutral",
        }
    }
}

/// Maps a backend status to its human-readable label.
///
/// Implementations are total: every value, including statuses the client
/// has never heard of, yields a non-empty label.
pub trait StatusLabel {
    /// The wire value, e.g. `IN_PROGRESS`.
    fn code(&self) -> &str;

    fn label(&self) -> &'static str;

    fn tone(&self) -> Tone {
        Tone::Neutral
    }
}
