//! Request and response bodies of the AI drafting endpoints.
//!
//! Inference happens server-side; these are plain DTOs.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TONE: &str = "professionnel";
pub const DEFAULT_MAX_LENGTH: u32 = 800;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub skills_required: Option<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftResponse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub skills_suggested: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    pub content: String,
    pub intent: Option<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriteResponse {
    pub content: Option<String>,
    pub notes: Option<String>,
}

/// Mission or conversation summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryResponse {
    pub summary: Option<String>,
    pub next_steps: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSuggestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub skills_required: Option<String>,
    pub limit: Option<u32>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainSuggestion {
    pub domaine_id: i64,
    pub domaine_name: String,
    pub score: Option<f64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeSkill {
    pub name: String,
    pub level: Option<String>,
    pub years_of_experience: Option<u32>,
    pub is_certified: Option<bool>,
    pub certification_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeExtraction {
    pub file_key: String,
    pub summary: Option<String>,
    pub skills: Option<Vec<ResumeSkill>>,
    pub created_count: Option<u32>,
}

/// Splits a suggested skill list on commas and line breaks.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_split_on_commas_and_lines() {
        assert_eq!(
            parse_skills("Rust, Tokio\nAxum,, \r\nSQL"),
            vec!["Rust", "Tokio", "Axum", "SQL"]
        );
    }
}
