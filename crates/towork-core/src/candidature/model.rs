use crate::auth::join_name;
use crate::error::Result;
use crate::status::{StatusLabel, Tone};
use crate::validation::{HTTP_URL_RE, Validate, ValidationError, check, finite_amounts, not_blank};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum CandidatureStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
    #[strum(default)]
    Unknown(String),
}

impl CandidatureStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CandidatureStatus::Pending => "PENDING",
            CandidatureStatus::Accepted => "ACCEPTED",
            CandidatureStatus::Rejected => "REJECTED",
            CandidatureStatus::Withdrawn => "WITHDRAWN",
            CandidatureStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for CandidatureStatus {
    fn from(raw: String) -> Self {
        raw.trim()
            .parse()
            .unwrap_or(CandidatureStatus::Unknown(raw))
    }
}

impl From<CandidatureStatus> for String {
    fn from(status: CandidatureStatus) -> Self {
        status.as_str().to_string()
    }
}

impl StatusLabel for CandidatureStatus {
    fn code(&self) -> &str {
        self.as_str()
    }

    fn label(&self) -> &'static str {
        match self {
            CandidatureStatus::Accepted => "Acceptée",
            CandidatureStatus::Rejected => "Refusée",
            CandidatureStatus::Withdrawn => "Retirée",
            CandidatureStatus::Pending | CandidatureStatus::Unknown(_) => "En attente",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            CandidatureStatus::Accepted => Tone::Success,
            CandidatureStatus::Rejected => Tone::Warn,
            CandidatureStatus::Withdrawn => Tone::Neutral,
            _ => Tone::Accent,
        }
    }
}

/// Who wrote a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageAuthor {
    Client,
    Freelancer,
    System,
}

impl MessageAuthor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageAuthor::Client => "CLIENT",
            MessageAuthor::Freelancer => "FREELANCER",
            MessageAuthor::System => "SYSTEM",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CLIENT" | "ROLE_CLIENT" => Some(MessageAuthor::Client),
            "FREELANCER" | "ROLE_FREELANCER" => Some(MessageAuthor::Freelancer),
            "SYSTEM" => Some(MessageAuthor::System),
            _ => None,
        }
    }

    /// Name shown when the backend did not send one.
    pub fn fallback_name(&self) -> &'static str {
        match self {
            MessageAuthor::Client => "Client",
            MessageAuthor::Freelancer => "Freelancer",
            MessageAuthor::System => "Système",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreelancerSummary {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl FreelancerSummary {
    pub fn display_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| MessageAuthor::Freelancer.fallback_name().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidatureMessage {
    pub id: Option<i64>,
    pub author: Option<MessageAuthor>,
    pub content: Option<String>,
    pub resume_url: Option<String>,
    pub created_at: Option<String>,
    pub is_flagged: Option<bool>,
    pub flag_score: Option<f64>,
    pub flag_label: Option<String>,
    pub flag_reason: Option<String>,
}

/// A freelancer's application to a mission, with its message thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidature {
    pub id: Option<i64>,
    pub mission_id: Option<i64>,
    /// Some endpoints nest the mission instead of sending `missionId`.
    pub mission: Option<MissionRef>,
    pub freelancer: Option<FreelancerSummary>,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub client_message: Option<String>,
    pub proposed_price: Option<f64>,
    pub proposed_duration: Option<u32>,
    pub status: Option<CandidatureStatus>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub messages: Option<Vec<CandidatureMessage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionRef {
    pub id: Option<i64>,
    pub title: Option<String>,
}

impl Candidature {
    pub fn mission_id(&self) -> Option<i64> {
        self.mission_id
            .or_else(|| self.mission.as_ref().and_then(|m| m.id))
    }

    pub fn status(&self) -> CandidatureStatus {
        self.status.clone().unwrap_or(CandidatureStatus::Pending)
    }

    pub fn freelancer_name(&self) -> String {
        self.freelancer
            .as_ref()
            .map(FreelancerSummary::display_name)
            .unwrap_or_else(|| MessageAuthor::Freelancer.fallback_name().to_string())
    }
}

/// Body of `POST /candidatures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "finite_offer"))]
pub struct CreateCandidatureRequest {
    pub freelancer_id: i64,
    pub mission_id: i64,
    #[validate(
        custom(function = "not_blank"),
        length(min = 6, message = "Au moins 6 caractères requis.")
    )]
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1.0, message = "La valeur doit être supérieure ou égale à 1."))]
    pub proposed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "La valeur doit être supérieure ou égale à 1."))]
    pub proposed_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub resume_url: Option<String>,
}

fn finite_offer(request: &CreateCandidatureRequest) -> std::result::Result<(), ValidationError> {
    finite_amounts(&[request.proposed_price])
}

impl CreateCandidatureRequest {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// Note sent to the freelancer with a status update.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ClientNote {
    #[validate(
        custom(function = "not_blank"),
        length(min = 4, message = "Au moins 4 caractères requis.")
    )]
    pub message: String,
}

impl ClientNote {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// Body of `POST /candidatures/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CandidatureMessageRequest {
    pub author: MessageAuthor,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, message = "Au moins 3 caractères requis.")
    )]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub resume_url: Option<String>,
}

impl CandidatureMessageRequest {
    pub fn new(author: MessageAuthor, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
            resume_url: None,
        }
    }

    pub fn with_resume_url(mut self, url: Option<String>) -> Self {
        self.resume_url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn labels_are_total() {
        for status in CandidatureStatus::iter() {
            assert!(!status.label().is_empty());
        }
        assert_eq!(CandidatureStatus::from("SHORTLISTED".to_string()).label(), "En attente");
    }

    #[test]
    fn missing_freelancer_name_falls_back() {
        let candidature: Candidature =
            serde_json::from_str(r#"{"id": 1, "freelancer": {"id": 5}}"#).unwrap();
        assert_eq!(candidature.freelancer_name(), "Freelancer");

        let candidature: Candidature = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert_eq!(candidature.freelancer_name(), "Freelancer");
        assert_eq!(candidature.status(), CandidatureStatus::Pending);
    }

    #[test]
    fn mission_id_reads_nested_reference() {
        let candidature: Candidature =
            serde_json::from_str(r#"{"id": 1, "mission": {"id": 12}}"#).unwrap();
        assert_eq!(candidature.mission_id(), Some(12));
    }

    #[test]
    fn message_requires_three_chars_and_http_resume() {
        assert!(CandidatureMessageRequest::new(MessageAuthor::Client, "ok").validate().is_err());
        let request = CandidatureMessageRequest::new(MessageAuthor::Freelancer, "Bonjour")
            .with_resume_url(Some("file:///cv.pdf".into()));
        assert!(request.validate().is_err());
        let request = CandidatureMessageRequest::new(MessageAuthor::Freelancer, "Bonjour")
            .with_resume_url(Some(" ".into()));
        assert!(request.validate().is_ok());
        assert!(request.resume_url.is_none());
    }
}
