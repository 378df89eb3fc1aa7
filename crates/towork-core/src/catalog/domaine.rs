use crate::error::Result;
use crate::validation::{Validate, check, not_blank};
use serde::{Deserialize, Serialize};

/// A mission domain (category).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Domaine {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub skills: Vec<String>,
}

impl Domaine {
    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Actif" } else { "Inactif" }
    }
}

/// Create / update body for `/domaines`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DomaineDraft {
    #[validate(
        custom(function = "not_blank"),
        length(max = 60, message = "60 caractères maximum.")
    )]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 160, message = "160 caractères maximum."))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_active: bool,
}

impl DomaineDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_active: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}
