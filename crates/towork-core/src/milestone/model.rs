use crate::error::Result;
use crate::status::{StatusLabel, Tone};
use crate::validation::{Validate, check, finite, not_blank};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{EnumIter, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum MilestoneStatus {
    Draft,
    Pending,
    InProgress,
    Submitted,
    Delivered,
    Validated,
    Completed,
    Rejected,
    Paid,
    #[strum(default)]
    Unknown(String),
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MilestoneStatus::Draft => "DRAFT",
            MilestoneStatus::Pending => "PENDING",
            MilestoneStatus::InProgress => "IN_PROGRESS",
            MilestoneStatus::Submitted => "SUBMITTED",
            MilestoneStatus::Delivered => "DELIVERED",
            MilestoneStatus::Validated => "VALIDATED",
            MilestoneStatus::Completed => "COMPLETED",
            MilestoneStatus::Rejected => "REJECTED",
            MilestoneStatus::Paid => "PAID",
            MilestoneStatus::Unknown(raw) => raw,
        }
    }

    /// The freelancer may deliver work only before submission.
    pub fn can_deliver(&self) -> bool {
        matches!(self, MilestoneStatus::Pending | MilestoneStatus::InProgress)
    }

    /// Delivered work waiting for the client's decision.
    pub fn awaits_review(&self) -> bool {
        matches!(self, MilestoneStatus::Submitted | MilestoneStatus::Delivered)
    }

    pub fn can_pay(&self) -> bool {
        matches!(self, MilestoneStatus::Validated | MilestoneStatus::Completed)
    }
}

impl From<String> for MilestoneStatus {
    fn from(raw: String) -> Self {
        raw.trim()
            .parse()
            .unwrap_or(MilestoneStatus::Unknown(raw))
    }
}

impl From<MilestoneStatus> for String {
    fn from(status: MilestoneStatus) -> Self {
        status.as_str().to_string()
    }
}

impl StatusLabel for MilestoneStatus {
    fn code(&self) -> &str {
        self.as_str()
    }

    fn label(&self) -> &'static str {
        match self {
            MilestoneStatus::Draft => "Brouillon",
            MilestoneStatus::InProgress => "En cours",
            MilestoneStatus::Submitted => "Soumis",
            MilestoneStatus::Delivered => "Livré",
            MilestoneStatus::Validated => "Validé",
            MilestoneStatus::Completed => "Terminé",
            MilestoneStatus::Rejected => "Refusé",
            MilestoneStatus::Paid => "Payé",
            MilestoneStatus::Pending | MilestoneStatus::Unknown(_) => "Créé",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            MilestoneStatus::Validated | MilestoneStatus::Paid | MilestoneStatus::Completed => {
                Tone::Primary
            }
            MilestoneStatus::Rejected => Tone::Warn,
            MilestoneStatus::Submitted | MilestoneStatus::Delivered => Tone::Accent,
            _ => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MilestoneDeliverable {
    pub id: i64,
    pub file_name: String,
    pub download_url: String,
    pub comment: Option<String>,
    pub uploaded_by: Option<String>,
    pub content_type: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MilestoneMissionRef {
    pub id: Option<i64>,
}

/// A payable sub-deliverable of a mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Milestone {
    pub id: Option<i64>,
    pub mission_id: Option<i64>,
    pub mission_title: Option<String>,
    pub mission: Option<MilestoneMissionRef>,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub due_date: Option<String>,
    pub status: Option<MilestoneStatus>,
    pub is_completed: Option<bool>,
    pub completion_date: Option<String>,
    pub completion_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub order_index: Option<i32>,
    pub paid_at: Option<String>,
    pub deliverable_file_name: Option<String>,
    pub deliverable_url: Option<String>,
    pub deliverable_uploaded_at: Option<String>,
    pub deliverables: Vec<MilestoneDeliverable>,
}

impl Milestone {
    pub fn status(&self) -> MilestoneStatus {
        self.status.clone().unwrap_or(MilestoneStatus::Pending)
    }

    pub fn mission_id(&self) -> Option<i64> {
        self.mission_id
            .or_else(|| self.mission.as_ref().and_then(|m| m.id))
    }
}

/// Form for `POST /missions/{id}/milestones`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(
        range(min = 1.0, message = "Le montant doit être d'au moins 1 €."),
        custom(function = "finite")
    )]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl NewMilestone {
    pub fn new(title: impl Into<String>, amount: f64) -> Self {
        Self {
            title: title.into(),
            amount,
            ..Default::default()
        }
    }

    /// An amount of zero or less never reaches the backend.
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// Body of `POST /payments/milestones/{id}/pay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePayment {
    pub client_id: i64,
    pub freelancer_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single file sent to the deliverable endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliverableUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub comment: Option<String>,
}

impl DeliverableUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.trim().is_empty()).then_some(comment);
        self
    }

    /// Reads the file from disk, keeping only its name.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "livrable".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn amount_must_be_positive() {
        assert!(NewMilestone::new("Maquettes", 0.0).validate().is_err());
        assert!(NewMilestone::new("Maquettes", -20.0).validate().is_err());
        assert!(NewMilestone::new("Maquettes", 0.5).validate().is_err());
        assert!(NewMilestone::new("Maquettes", 1.0).validate().is_ok());
    }

    #[test]
    fn amount_message_is_french_and_nan_is_refused() {
        let err = NewMilestone::new("Maquettes", 0.0).validate().unwrap_err();
        assert_eq!(err.user_message("x"), "Le montant doit être d'au moins 1 €.");
        assert!(NewMilestone::new("Maquettes", f64::NAN).validate().is_err());
        assert!(NewMilestone::new("  ", 10.0).validate().is_err());
    }

    #[test]
    fn labels_are_total() {
        for status in MilestoneStatus::iter() {
            assert!(!status.label().is_empty());
        }
        assert_eq!(MilestoneStatus::from("ESCROWED".to_string()).label(), "Créé");
        assert_eq!(MilestoneStatus::Paid.tone(), Tone::Primary);
        assert_eq!(MilestoneStatus::Rejected.tone(), Tone::Warn);
        assert_eq!(MilestoneStatus::Submitted.tone(), Tone::Accent);
    }

    #[test]
    fn delivery_window() {
        assert!(MilestoneStatus::Pending.can_deliver());
        assert!(MilestoneStatus::InProgress.can_deliver());
        assert!(!MilestoneStatus::Submitted.can_deliver());
        assert!(!MilestoneStatus::Unknown("X".into()).can_deliver());
    }

    #[test]
    fn blank_comment_is_dropped() {
        let upload = DeliverableUpload::new("a.pdf", vec![1]).with_comment("  ");
        assert!(upload.comment.is_none());
    }
}
