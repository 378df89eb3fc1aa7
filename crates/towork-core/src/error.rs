//! Error types for the towork client.

use crate::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every towork crate.
///
/// Failures are categorized only by HTTP status and the message the backend
/// supplied. Nothing here is fatal to the process; each error is scoped to
/// the action that triggered it.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ToworkError {
    /// The backend answered with `success = false` or a non-2xx status.
    #[error("API error{}: {message}", status_suffix(.status))]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// 401 / 403 from the backend. The session has been cleared.
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Client-side form validation rejected the input; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An operation needed a logged-in user and there is none.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToworkError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Api error from a backend message.
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error came from a 401 / 403 response.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this is a client-side validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Api { status, .. } => *status == Some(404),
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the text a screen should show for this failure.
    ///
    /// Backend-supplied messages are shown verbatim. Blank backend messages
    /// and transport-level failures collapse to `fallback`.
    ///
    /// # Arguments
    ///
    /// * `fallback` - Generic message for the triggering action
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::Validation(errors) => errors
                .first_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            Self::NotAuthenticated => "Veuillez vous connecter.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<FieldErrors> for ToworkError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for ToworkError {
    fn from(report: validator::ValidationErrors) -> Self {
        Self::Validation(FieldErrors::from(&report))
    }
}

impl From<std::io::Error> for ToworkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ToworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ToworkError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ToworkError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// A type alias for `Result<T, ToworkError>`.
pub type Result<T> = std::result::Result<T, ToworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = ToworkError::api(Some(400), "Email déjà utilisé");
        assert_eq!(err.user_message("Erreur"), "Email déjà utilisé");
    }

    #[test]
    fn blank_message_uses_fallback() {
        let err = ToworkError::api(Some(500), "   ");
        assert_eq!(err.user_message("Impossible de charger"), "Impossible de charger");

        let err = ToworkError::transport("connection refused");
        assert_eq!(err.user_message("Impossible de charger"), "Impossible de charger");
    }

    #[test]
    fn status_is_exposed_for_http_errors() {
        assert_eq!(ToworkError::api(Some(404), "x").status(), Some(404));
        assert!(ToworkError::api(Some(404), "x").is_not_found());
        let unauthorized = ToworkError::Unauthorized {
            status: 403,
            message: String::new(),
        };
        assert!(unauthorized.is_unauthorized());
        assert_eq!(unauthorized.status(), Some(403));
    }

    #[test]
    fn display_includes_status_when_known() {
        let err = ToworkError::api(Some(409), "conflict");
        assert_eq!(err.to_string(), "API error (409): conflict");
        let err = ToworkError::api(None, "refused");
        assert_eq!(err.to_string(), "API error: refused");
    }
}
