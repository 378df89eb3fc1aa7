//! Mission DTOs and the mission creation form.

use super::status::MissionStatus;
use crate::error::Result;
use crate::milestone::MilestoneStatus;
use crate::validation::{Validate, ValidationError, check, finite_amounts, not_blank};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    Fixed,
    Hourly,
    Negotiable,
}

impl BudgetType {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetType::Fixed => "Forfait",
            BudgetType::Hourly => "Horaire",
            BudgetType::Negotiable => "Négociable",
        }
    }
}

/// `typeTravail` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkMode {
    Remote,
    OnSite,
    Hybrid,
}

impl WorkMode {
    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::Remote => "Télétravail",
            WorkMode::OnSite => "Présentiel",
            WorkMode::Hybrid => "Hybride",
        }
    }
}

/// `niveauExperience` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Junior",
            ExperienceLevel::Intermediate => "Intermédiaire",
            ExperienceLevel::Advanced => "Senior",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

/// A mission as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mission {
    pub id: i64,
    pub client_id: Option<i64>,
    pub domaine_id: Option<i64>,
    pub client_name: Option<String>,
    pub client_company_name: Option<String>,
    pub client_city: Option<String>,
    pub client_country: Option<String>,
    pub client_profile_picture: Option<String>,
    pub domaine_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub budget_type: Option<BudgetType>,
    pub type_travail: Option<WorkMode>,
    pub niveau_experience: Option<ExperienceLevel>,
    pub status: Option<MissionStatus>,
    pub deadline: Option<String>,
    pub estimated_duration: Option<u32>,
    pub skills_required: Option<String>,
    pub is_urgent: Option<bool>,
    pub attachments: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Mission {
    /// Missing status reads as a draft.
    pub fn status(&self) -> MissionStatus {
        self.status.clone().unwrap_or(MissionStatus::Draft)
    }

    pub fn client_display_name(&self) -> &str {
        self.client_name
            .as_deref()
            .or(self.client_company_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Client confidentiel")
    }
}

/// `{ "id": n }` reference used by create bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// Create / update body for `/missions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionPayload {
    pub client: IdRef,
    pub domaine: IdRef,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub budget_type: BudgetType,
    pub type_travail: WorkMode,
    pub niveau_experience: ExperienceLevel,
    pub deadline: Option<NaiveDate>,
    pub estimated_duration: u32,
    pub skills_required: Option<String>,
    pub is_urgent: bool,
    pub attachments: Option<String>,
}

/// The mission creation form as the user fills it.
///
/// Owner and domain ids come from the session and the form; nothing is
/// hardcoded.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
#[validate(schema(function = "finite_budget"))]
pub struct MissionForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "100 caractères maximum.")
    )]
    pub title: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 800, message = "800 caractères maximum.")
    )]
    pub description: String,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        range(min = 1, message = "Ce champ est obligatoire.")
    )]
    pub domaine_id: Option<i64>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        range(min = 0.0, message = "Le budget ne peut pas être négatif.")
    )]
    pub budget: Option<f64>,
    #[validate(required(message = "Ce champ est obligatoire."))]
    pub budget_type: Option<BudgetType>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        range(min = 1, message = "Au moins un jour.")
    )]
    pub duration_days: Option<u32>,
    #[validate(required(message = "Ce champ est obligatoire."))]
    pub experience: Option<ExperienceLevel>,
    #[validate(required(message = "Ce champ est obligatoire."))]
    pub work_mode: Option<WorkMode>,
    pub skills: Vec<String>,
    pub notes: String,
    pub deadline: Option<NaiveDate>,
}

fn finite_budget(form: &MissionForm) -> std::result::Result<(), ValidationError> {
    finite_amounts(&[form.budget])
}

impl MissionForm {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }

    /// Validates and builds the wire body for the given owner.
    pub fn to_payload(&self, client_id: i64) -> Result<MissionPayload> {
        self.validate()?;
        // validate() guarantees every required option is present.
        let (Some(domaine_id), Some(budget_type), Some(experience), Some(work_mode), Some(duration)) = (
            self.domaine_id,
            self.budget_type,
            self.experience,
            self.work_mode,
            self.duration_days,
        ) else {
            return Err(crate::error::ToworkError::internal("incomplete mission form"));
        };

        let notes = self.notes.trim();
        Ok(MissionPayload {
            client: IdRef { id: client_id },
            domaine: IdRef { id: domaine_id },
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            requirements: (!notes.is_empty()).then(|| notes.to_string()),
            budget_min: self.budget,
            budget_max: None,
            budget_type,
            type_travail: work_mode,
            niveau_experience: experience,
            deadline: self.deadline,
            estimated_duration: duration,
            skills_required: (!self.skills.is_empty()).then(|| self.skills.join(", ")),
            is_urgent: false,
            attachments: None,
        })
    }
}

/// Freelancer match suggested by `/missions/{id}/recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreelancerMatch {
    pub freelancer_id: i64,
    pub freelancer_name: Option<String>,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreelancerMilestone {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub due_date: Option<String>,
    pub status: Option<MilestoneStatus>,
    pub is_completed: Option<bool>,
    pub paid_at: Option<String>,
}

/// `/freelancer/missions` entry: an assigned mission with its milestones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreelancerMissionWithMilestones {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<MissionStatus>,
    pub total_amount: Option<f64>,
    pub client_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub milestones: Vec<FreelancerMilestone>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> MissionForm {
        MissionForm {
            title: "Refonte site vitrine".into(),
            description: "Refonte complète du site.".into(),
            domaine_id: Some(3),
            budget: Some(1500.0),
            budget_type: Some(BudgetType::Fixed),
            duration_days: Some(20),
            experience: Some(ExperienceLevel::Intermediate),
            work_mode: Some(WorkMode::Remote),
            skills: vec!["Angular".into(), "Figma".into()],
            notes: "  ".into(),
            deadline: None,
        }
    }

    #[test]
    fn payload_uses_given_owner_and_joined_skills() {
        let payload = filled_form().to_payload(42).unwrap();
        assert_eq!(payload.client.id, 42);
        assert_eq!(payload.domaine.id, 3);
        assert_eq!(payload.skills_required.as_deref(), Some("Angular, Figma"));
        assert_eq!(payload.requirements, None);
        assert!(!payload.is_urgent);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["typeTravail"], "REMOTE");
        assert_eq!(json["niveauExperience"], "INTERMEDIATE");
        assert_eq!(json["budgetMin"], 1500.0);
    }

    #[test]
    fn missing_domain_is_rejected() {
        let form = MissionForm {
            domaine_id: None,
            ..filled_form()
        };
        assert!(form.to_payload(1).unwrap_err().is_validation());
    }

    #[test]
    fn long_title_is_rejected() {
        let form = MissionForm {
            title: "t".repeat(101),
            ..filled_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn sparse_mission_deserializes() {
        let mission: Mission = serde_json::from_str(r#"{"id": 7, "title": "Audit"}"#).unwrap();
        assert_eq!(mission.status(), MissionStatus::Draft);
        assert_eq!(mission.client_display_name(), "Client confidentiel");
    }
}
