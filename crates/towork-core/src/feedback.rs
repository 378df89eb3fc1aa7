//! Post-mission feedback.

use crate::error::Result;
use crate::validation::{Validate, check};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackDirection {
    ClientToFreelancer,
    FreelancerToClient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub mission_id: i64,
    pub author_user_id: i64,
    pub target_user_id: i64,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub direction: FeedbackDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackSummary {
    pub average_rating: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackAggregate {
    pub summary: FeedbackSummary,
    pub feedbacks: Vec<Feedback>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    #[validate(range(min = 1, max = 5, message = "La note doit être comprise entre 1 et 5."))]
    pub rating: u8,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 10, max = 2000, message = "Entre 10 et 2000 caractères.")
    )]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<FeedbackDirection>,
}

impl NewFeedback {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// `★★★☆☆` for a 0..=5 rating.
pub fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_and_comment_length() {
        let feedback = NewFeedback {
            rating: 0,
            comment: Some("Très bon travail".into()),
            direction: None,
        };
        assert!(feedback.validate().is_err());

        let feedback = NewFeedback {
            rating: 5,
            comment: Some("court".into()),
            direction: None,
        };
        assert!(feedback.validate().is_err());

        let feedback = NewFeedback {
            rating: 4,
            comment: Some("Très bon travail".into()),
            direction: Some(FeedbackDirection::ClientToFreelancer),
        };
        assert!(feedback.validate().is_ok());
    }

    #[test]
    fn star_rendering() {
        assert_eq!(stars(3.6), "★★★★☆");
        assert_eq!(stars(9.0), "★★★★★");
    }
}
