use crate::error::Result;
use crate::validation::{Validate, check, not_blank};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetenceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl CompetenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            CompetenceLevel::Beginner => "Débutant",
            CompetenceLevel::Intermediate => "Intermédiaire",
            CompetenceLevel::Advanced => "Avancé",
            CompetenceLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Competence {
    pub id: i64,
    pub domaine_id: Option<i64>,
    pub domaine_name: Option<String>,
    pub freelancer_id: Option<i64>,
    pub freelancer_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// Free text on older records, hence not [`CompetenceLevel`].
    pub level: Option<String>,
    pub years_of_experience: Option<u32>,
    pub is_certified: bool,
    pub certification_name: Option<String>,
    pub certification_date: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Name of the certification granted to a competence.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Certification {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

impl Certification {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompetenceDraft {
    #[validate(
        required(message = "Ce champ est obligatoire."),
        range(min = 1, message = "Ce champ est obligatoire.")
    )]
    pub domaine_id: Option<i64>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 80, message = "80 caractères maximum.")
    )]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "200 caractères maximum."))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<CompetenceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 60, message = "La valeur doit être inférieure ou égale à 60."))]
    pub years_of_experience: Option<u32>,
    pub is_active: bool,
}

impl CompetenceDraft {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}
