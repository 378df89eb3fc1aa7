//! Client-side form validation.
//!
//! Forms derive [`Validate`] and are checked with [`check`] before any
//! request is built. A failed check never reaches the network.

use crate::error::{Result, ToworkError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
pub use validator::{Validate, ValidationError};

// Literal patterns; compiling them cannot fail at runtime. Blank input
// matches: these rules guard optional fields.
pub static HTTP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\s*|https?://\S+)$").expect("url pattern"));

pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*|\+?[0-9 ]{7,15})$").expect("phone pattern"));

pub const REQUIRED: &str = "Ce champ est obligatoire.";

/// Field name to messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .values()
            .find_map(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl From<&validator::ValidationErrors> for FieldErrors {
    fn from(report: &validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, failures) in report.field_errors() {
            let field = field.to_string();
            for failure in failures.iter() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(&failure.code).to_string());
                errors.add(&field, message);
            }
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Runs the derived rules of `form`.
///
/// # Returns
///
/// `ToworkError::Validation` listing every failed field.
pub fn check<T: Validate>(form: &T) -> Result<()> {
    form.validate()
        .map_err(|report| ToworkError::Validation(FieldErrors::from(&report)))
}

fn default_message(code: &str) -> &'static str {
    match code {
        "email" => "Adresse email invalide.",
        "length" => "Longueur invalide.",
        "range" => "Valeur hors limites.",
        "must_match" => "Les valeurs ne correspondent pas.",
        "regex" => "Format invalide.",
        _ => "Valeur invalide.",
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

// ============================================================================
// Custom rules, referenced from `#[validate(custom(function = ...))]`
// ============================================================================

/// Whitespace-only text counts as missing.
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("required", REQUIRED))
    } else {
        Ok(())
    }
}

/// `range` lets NaN and infinities through.
pub fn finite(value: f64) -> std::result::Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(failure("finite", "Montant invalide."))
    }
}

/// Struct-level helper: every present amount must be a real number.
pub fn finite_amounts(amounts: &[Option<f64>]) -> std::result::Result<(), ValidationError> {
    if amounts.iter().flatten().all(|amount| amount.is_finite()) {
        Ok(())
    } else {
        Err(failure("finite", "Montant invalide."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(custom(function = "not_blank"))]
        title: String,
        #[validate(length(max = 800, message = "800 caractères maximum."))]
        description: String,
        #[validate(
            range(min = 1.0, message = "Le montant doit être d'au moins 1."),
            custom(function = "finite")
        )]
        amount: f64,
        #[validate(regex(path = *PHONE_RE, message = "Numéro de téléphone invalide."))]
        phone: Option<String>,
    }

    fn sample() -> Sample {
        Sample {
            title: "Site".into(),
            description: "Vitrine".into(),
            amount: 10.0,
            phone: None,
        }
    }

    #[test]
    fn collects_every_failed_field() {
        let form = Sample {
            title: "  ".into(),
            description: "x".repeat(801),
            amount: 0.0,
            ..sample()
        };

        match check(&form).unwrap_err() {
            ToworkError::Validation(errors) => {
                assert!(errors.has("title"));
                assert!(errors.has("description"));
                assert!(errors.has("amount"));
                assert_eq!(errors.messages("title"), [REQUIRED.to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nan_is_not_a_valid_amount() {
        let form = Sample {
            amount: f64::NAN,
            ..sample()
        };
        assert!(check(&form).is_err());
    }

    #[test]
    fn optional_phone_is_checked_only_when_present() {
        assert!(check(&sample()).is_ok());
        let form = Sample {
            phone: Some("06-12-34".into()),
            ..sample()
        };
        let err = check(&form).unwrap_err();
        assert_eq!(err.user_message("x"), "Numéro de téléphone invalide.");
    }

    #[test]
    fn url_and_phone_patterns() {
        assert!(HTTP_URL_RE.is_match("https://cv.example.com/me.pdf"));
        assert!(HTTP_URL_RE.is_match("HTTP://example.com"));
        assert!(HTTP_URL_RE.is_match(""));
        assert!(!HTTP_URL_RE.is_match("ftp://example.com"));
        assert!(PHONE_RE.is_match("+33 6 12 34 56"));
        assert!(!PHONE_RE.is_match("06-12-34"));
    }

    #[test]
    fn missing_amounts_are_not_checked() {
        assert!(finite_amounts(&[None, Some(2.0)]).is_ok());
        assert!(finite_amounts(&[Some(f64::INFINITY)]).is_err());
    }
}
