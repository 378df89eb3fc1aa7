//! Authentication payloads: roles, the session returned at login, and the
//! login / registration forms.

use crate::error::Result;
use crate::validation::{Validate, ValidationError, check, not_blank};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by the session.
///
/// Parsing is total and case-insensitive; the `ROLE_` prefix is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Client,
    Freelancer,
    Admin,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "CLIENT" => Role::Client,
            "FREELANCER" | "FREELANCE" => Role::Freelancer,
            "ADMIN" => Role::Admin,
            _ => Role::Other(raw.trim().to_string()),
        }
    }

    /// Wire form, e.g. `ROLE_CLIENT`.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Client => "ROLE_CLIENT",
            Role::Freelancer => "ROLE_FREELANCER",
            Role::Admin => "ROLE_ADMIN",
            Role::Other(raw) => raw,
        }
    }

    /// Author tag used on message threads (`CLIENT`, `FREELANCER`).
    pub fn author_tag(&self) -> Option<&'static str> {
        match self {
            Role::Client => Some("CLIENT"),
            Role::Freelancer => Some("FREELANCER"),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Freelancer => "Freelance",
            Role::Admin => "Administrateur",
            Role::Other(_) => "Utilisateur",
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Role::Client)
    }

    pub fn is_freelancer(&self) -> bool {
        matches!(self, Role::Freelancer)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The backend's login answer, kept as the session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Session {
    /// Full name, or the role label when the backend sent no name.
    pub fn display_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| self.role.label().to_string())
    }
}

/// Joins the present, non-blank name parts.
pub fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Adresse email invalide."))]
    pub email: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 6, message = "Au moins 6 caractères requis.")
    )]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// Which registration endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterKind {
    Client,
    Freelancer,
    Admin,
}

impl RegisterKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            RegisterKind::Client => "client",
            RegisterKind::Freelancer => "freelancer",
            RegisterKind::Admin => "admin",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RegisterKind::Client => Role::Client,
            RegisterKind::Freelancer => Role::Freelancer,
            RegisterKind::Admin => Role::Admin,
        }
    }
}

/// Registration form. The confirmation and terms fields never leave the
/// client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 40, message = "40 caractères maximum.")
    )]
    pub first_name: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 40, message = "40 caractères maximum.")
    )]
    pub last_name: String,
    #[validate(email(message = "Adresse email invalide."))]
    pub email: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 6, message = "Au moins 6 caractères requis.")
    )]
    pub password: String,
    #[serde(skip)]
    #[validate(must_match(other = "password", message = "Les mots de passe ne correspondent pas."))]
    pub confirm_password: String,
    #[serde(skip)]
    #[validate(custom(function = "accepted"))]
    pub accept_terms: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

fn accepted(value: &bool) -> std::result::Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("terms").with_message("Vous devez accepter les conditions.".into()))
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }

    /// Shapes the body for the endpoint of `kind`.
    ///
    /// Blank optional fields become `null`. Freelancers get an hourly rate
    /// of 0 and the `Disponible` availability when none were given.
    pub fn into_body(mut self, kind: RegisterKind) -> Self {
        self.phone = non_blank(self.phone);
        self.address = non_blank(self.address);
        match kind {
            RegisterKind::Client => {
                self.city = non_blank(self.city);
                self.hourly_rate = None;
                self.availability = None;
            }
            RegisterKind::Freelancer => {
                self.city = None;
                self.hourly_rate = Some(
                    self.hourly_rate
                        .filter(|rate| rate.is_finite())
                        .unwrap_or(0.0),
                );
                self.availability =
                    Some(non_blank(self.availability).unwrap_or_else(|| "Disponible".to_string()));
            }
            RegisterKind::Admin => {
                self.city = None;
                self.hourly_rate = None;
                self.availability = None;
            }
        }
        self
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_total() {
        assert_eq!(Role::parse("ROLE_CLIENT"), Role::Client);
        assert_eq!(Role::parse("freelancer"), Role::Freelancer);
        assert_eq!(Role::parse("role_admin"), Role::Admin);
        assert_eq!(
            Role::parse("ROLE_SUPPORT"),
            Role::Other("ROLE_SUPPORT".to_string())
        );
    }

    #[test]
    fn session_without_names_falls_back_to_role_label() {
        let session: Session = serde_json::from_str(
            r#"{"token":"t","userId":4,"email":"f@x.io","role":"ROLE_FREELANCER"}"#,
        )
        .unwrap();
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.display_name(), "Freelance");
    }

    #[test]
    fn session_serializes_role_in_wire_form() {
        let session = Session {
            token: "t".into(),
            token_type: "Bearer".into(),
            user_id: 1,
            email: "c@x.io".into(),
            role: Role::Client,
            first_name: Some("Ana".into()),
            last_name: None,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["role"], "ROLE_CLIENT");
        assert_eq!(json["userId"], 1);
        assert_eq!(session.display_name(), "Ana");
    }

    #[test]
    fn login_requires_six_char_password() {
        assert!(LoginRequest::new("a@b.co", "12345").validate().is_err());
        assert!(LoginRequest::new("a@b.co", "123456").validate().is_ok());
        assert!(LoginRequest::new("not-an-email", "123456").validate().is_err());
    }

    #[test]
    fn freelancer_body_gets_defaults() {
        let request = RegisterRequest {
            first_name: "Lea".into(),
            last_name: "M".into(),
            email: "lea@x.io".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            accept_terms: true,
            phone: Some("  ".into()),
            city: Some("Lyon".into()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        let body = serde_json::to_value(request.into_body(RegisterKind::Freelancer)).unwrap();
        assert_eq!(body["hourlyRate"], 0.0);
        assert_eq!(body["availability"], "Disponible");
        assert!(body["phone"].is_null());
        assert!(body.get("city").is_none());
        assert!(body.get("confirmPassword").is_none());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let request = RegisterRequest {
            first_name: "Lea".into(),
            last_name: "M".into(),
            email: "lea@x.io".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            accept_terms: true,
            ..Default::default()
        };
        assert_eq!(
            request.validate().unwrap_err().user_message("x"),
            "Les mots de passe ne correspondent pas."
        );

        let request = RegisterRequest {
            confirm_password: "secret1".into(),
            accept_terms: false,
            ..request
        };
        assert_eq!(
            request.validate().unwrap_err().user_message("x"),
            "Vous devez accepter les conditions."
        );
    }
}
