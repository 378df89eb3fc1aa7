use crate::status::{StatusLabel, Tone};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// Lifecycle of a mission as reported by the backend.
///
/// The client never computes transitions; it only mirrors what it receives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum MissionStatus {
    Draft,
    Published,
    InProgress,
    PendingClosure,
    Completed,
    Cancelled,
    Paused,
    #[strum(default)]
    Unknown(String),
}

impl MissionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MissionStatus::Draft => "DRAFT",
            MissionStatus::Published => "PUBLISHED",
            MissionStatus::InProgress => "IN_PROGRESS",
            MissionStatus::PendingClosure => "PENDING_CLOSURE",
            MissionStatus::Completed => "COMPLETED",
            MissionStatus::Cancelled => "CANCELLED",
            MissionStatus::Paused => "PAUSED",
            MissionStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for MissionStatus {
    fn from(raw: String) -> Self {
        raw.trim()
            .parse()
            .unwrap_or(MissionStatus::Unknown(raw))
    }
}

impl From<MissionStatus> for String {
    fn from(status: MissionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl StatusLabel for MissionStatus {
    fn code(&self) -> &str {
        self.as_str()
    }

    fn label(&self) -> &'static str {
        match self {
            MissionStatus::Published => "En ligne",
            MissionStatus::InProgress => "En cours",
            MissionStatus::PendingClosure => "En attente de clôture",
            MissionStatus::Completed => "Terminée",
            MissionStatus::Cancelled => "Annulée",
            MissionStatus::Paused => "En pause",
            MissionStatus::Draft | MissionStatus::Unknown(_) => "Brouillon",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            MissionStatus::Published => Tone::Primary,
            MissionStatus::InProgress | MissionStatus::PendingClosure => Tone::Accent,
            MissionStatus::Completed => Tone::Success,
            MissionStatus::Cancelled => Tone::Warn,
            _ => Tone::Neutral,
        }
    }
}

/// Stage of a mission on the freelancer's board.
///
/// Derived from the mission status and, once hydrated, from the
/// freelancer's own candidature on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardStage {
    Open,
    Applied,
    Interviewing,
    InProgress,
    PendingClosure,
    Completed,
}

impl BoardStage {
    /// Anything not yet started on the backend is open for applications.
    pub fn from_backend(status: Option<&MissionStatus>) -> Self {
        match status {
            Some(MissionStatus::InProgress) => BoardStage::InProgress,
            Some(MissionStatus::PendingClosure) => BoardStage::PendingClosure,
            Some(MissionStatus::Completed) => BoardStage::Completed,
            _ => BoardStage::Open,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoardStage::Open => "Nouvelle mission",
            BoardStage::Applied => "Candidature envoyée",
            BoardStage::Interviewing => "En entretien",
            BoardStage::InProgress => "Mission en cours",
            BoardStage::PendingClosure => "En attente de clôture client",
            BoardStage::Completed => "Mission terminée",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_known_status_has_a_label() {
        for status in MissionStatus::iter() {
            assert!(!status.label().is_empty(), "{status:?}");
        }
    }

    #[test]
    fn parsing_is_case_insensitive_and_total() {
        assert_eq!(MissionStatus::from("in_progress".to_string()), MissionStatus::InProgress);
        let unknown = MissionStatus::from("ARCHIVED".to_string());
        assert_eq!(unknown, MissionStatus::Unknown("ARCHIVED".to_string()));
        assert_eq!(unknown.label(), "Brouillon");
        assert_eq!(unknown.as_str(), "ARCHIVED");
    }

    #[test]
    fn serde_round_trips_wire_value() {
        let status: MissionStatus = serde_json::from_str("\"PENDING_CLOSURE\"").unwrap();
        assert_eq!(status, MissionStatus::PendingClosure);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"PENDING_CLOSURE\"");
    }

    #[test]
    fn board_stage_from_backend() {
        assert_eq!(BoardStage::from_backend(None), BoardStage::Open);
        assert_eq!(BoardStage::from_backend(Some(&MissionStatus::Paused)), BoardStage::Open);
        assert_eq!(
            BoardStage::from_backend(Some(&MissionStatus::InProgress)),
            BoardStage::InProgress
        );
    }
}
