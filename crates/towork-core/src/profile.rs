//! Client and freelancer profiles, and the admin's merged user list.

use crate::auth::{Role, join_name};
use crate::error::Result;
use crate::validation::{
    HTTP_URL_RE, PHONE_RE, Validate, ValidationError, check, finite_amounts, not_blank,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientProfile {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_size: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
    pub missions_count: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfileUpdate {
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 2, message = "Au moins 2 caractères requis.")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 2, message = "Au moins 2 caractères requis.")
    )]
    pub last_name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Numéro de téléphone invalide."))]
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_size: Option<String>,
    pub industry: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
}

impl ClientProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FreelancerProfile {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub hourly_rate: Option<f64>,
    pub daily_rate: Option<f64>,
    pub availability: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub profile_picture: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub portfolio_url: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub linkedin_url: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub github_url: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub is_verified: Option<bool>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    pub missions_count: Option<u32>,
    pub rating: Option<f64>,
    pub total_projects: Option<u32>,
    pub success_rate: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "freelancer_extras"))]
pub struct FreelancerProfileUpdate {
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 2, message = "Au moins 2 caractères requis.")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 2, message = "Au moins 2 caractères requis.")
    )]
    pub last_name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Numéro de téléphone invalide."))]
    pub phone: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(range(min = 1.0, message = "La valeur doit être supérieure ou égale à 1."))]
    pub hourly_rate: Option<f64>,
    #[validate(range(min = 1.0, message = "La valeur doit être supérieure ou égale à 1."))]
    pub daily_rate: Option<f64>,
    pub availability: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub profile_picture: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub portfolio_url: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub linkedin_url: Option<String>,
    #[validate(regex(
        path = *HTTP_URL_RE,
        message = "L'URL doit commencer par http:// ou https://."
    ))]
    pub github_url: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub is_available: Option<bool>,
}

/// A bio is optional but never a few stray characters.
fn freelancer_extras(update: &FreelancerProfileUpdate) -> std::result::Result<(), ValidationError> {
    finite_amounts(&[update.hourly_rate, update.daily_rate])?;
    let bio = update.bio.as_deref().unwrap_or("").trim();
    if bio.is_empty() || bio.chars().count() >= 10 {
        Ok(())
    } else {
        Err(ValidationError::new("bio").with_message("Bio : au moins 10 caractères requis.".into()))
    }
}

impl FreelancerProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagedStatus {
    #[serde(rename = "Actif")]
    Active,
    #[serde(rename = "Inactif")]
    Inactive,
}

impl ManagedStatus {
    /// Only an explicit `isActive: false` marks a user inactive.
    pub fn from_flag(is_active: Option<bool>) -> Self {
        if is_active == Some(false) {
            ManagedStatus::Inactive
        } else {
            ManagedStatus::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ManagedStatus::Active => "Actif",
            ManagedStatus::Inactive => "Inactif",
        }
    }
}

/// Row of the admin users table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: ManagedStatus,
    pub missions: u32,
    /// ISO timestamp; empty when the backend did not send one.
    pub joined: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<ClientProfile> for ManagedUser {
    fn from(client: ClientProfile) -> Self {
        Self {
            id: client.id,
            name: join_name(client.first_name.as_deref(), client.last_name.as_deref())
                .unwrap_or_else(|| Role::Client.label().to_string()),
            email: client.email,
            role: Role::Client,
            status: ManagedStatus::from_flag(client.is_active),
            missions: client.missions_count.unwrap_or(0),
            joined: client.created_at.unwrap_or_default(),
            phone: client.phone,
            address: client.address,
            city: client.city,
            country: client.country,
        }
    }
}

impl From<FreelancerProfile> for ManagedUser {
    fn from(freelancer: FreelancerProfile) -> Self {
        Self {
            id: freelancer.id,
            name: join_name(
                freelancer.first_name.as_deref(),
                freelancer.last_name.as_deref(),
            )
            .unwrap_or_else(|| Role::Freelancer.label().to_string()),
            email: freelancer.email,
            role: Role::Freelancer,
            status: ManagedStatus::from_flag(freelancer.is_active),
            missions: freelancer.missions_count.unwrap_or(0),
            joined: freelancer.created_at.unwrap_or_default(),
            phone: freelancer.phone,
            address: freelancer.address,
            city: freelancer.city,
            country: freelancer.country,
        }
    }
}

/// Admin "create user" form; routed through the registration endpoints.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewManagedUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Adresse email invalide."))]
    pub email: String,
    #[validate(custom(function = "known_role"))]
    pub role: Role,
    pub status: ManagedStatus,
    #[validate(
        custom(function = "not_blank"),
        length(min = 6, message = "Au moins 6 caractères requis.")
    )]
    pub password: String,
}

fn known_role(role: &Role) -> std::result::Result<(), ValidationError> {
    match role {
        Role::Other(_) => Err(ValidationError::new("role").with_message("Rôle inconnu.".into())),
        _ => Ok(()),
    }
}

impl NewManagedUser {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// Admin edit of an account: contact, activity and, for clients and
/// freelancers, the name split from the display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdate {
    #[validate(email(message = "Adresse email invalide."))]
    pub email: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl AdminUserUpdate {
    /// The first word of `name` is the first name, the rest the last name.
    /// Admin accounts carry no name fields.
    pub fn new(role: &Role, name: &str, email: impl Into<String>, status: ManagedStatus) -> Self {
        let mut words = name.split_whitespace();
        let first = words.next().map(str::to_string);
        let last = words.collect::<Vec<_>>().join(" ");
        let named = matches!(role, Role::Client | Role::Freelancer);
        Self {
            email: email.into(),
            is_active: status == ManagedStatus::Active,
            first_name: if named { first } else { None },
            last_name: (named && !last.is_empty()).then_some(last),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nameless_profiles_get_role_fallback() {
        let client: ClientProfile = serde_json::from_str(r#"{"id": 1, "email": "c@x.io"}"#).unwrap();
        let user = ManagedUser::from(client);
        assert_eq!(user.name, "Client");
        assert_eq!(user.status, ManagedStatus::Active);

        let freelancer: FreelancerProfile =
            serde_json::from_str(r#"{"id": 2, "email": "f@x.io", "isActive": false}"#).unwrap();
        let user = ManagedUser::from(freelancer);
        assert_eq!(user.name, "Freelance");
        assert_eq!(user.status, ManagedStatus::Inactive);
    }

    #[test]
    fn freelancer_update_rules() {
        let update = FreelancerProfileUpdate {
            first_name: Some("Jo".into()),
            last_name: Some("Li".into()),
            hourly_rate: Some(0.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = FreelancerProfileUpdate {
            hourly_rate: Some(45.0),
            github_url: Some("https://github.com/jo".into()),
            ..update
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn short_bio_and_unknown_role_are_rejected() {
        let update = FreelancerProfileUpdate {
            first_name: Some("Jo".into()),
            last_name: Some("Li".into()),
            bio: Some("Hi".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let user = NewManagedUser {
            first_name: None,
            last_name: None,
            email: "ops@towork.io".into(),
            role: Role::Other("ROLE_GUEST".into()),
            status: ManagedStatus::Active,
            password: "secret1".into(),
        };
        assert_eq!(user.validate().unwrap_err().user_message("x"), "Rôle inconnu.");
        let user = NewManagedUser {
            role: Role::Client,
            ..user
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn admin_update_splits_name() {
        let update = AdminUserUpdate::new(
            &Role::Freelancer,
            "Ada  King Lovelace",
            "ada@towork.io",
            ManagedStatus::Inactive,
        );
        assert_eq!(update.first_name.as_deref(), Some("Ada"));
        assert_eq!(update.last_name.as_deref(), Some("King Lovelace"));
        assert!(!update.is_active);

        let admin = AdminUserUpdate::new(&Role::Admin, "Root", "r@towork.io", ManagedStatus::Active);
        assert!(admin.first_name.is_none());
    }
}
