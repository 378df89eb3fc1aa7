//! AI helpers of the mission form.
//!
//! Generation runs on the backend; this only shapes requests from the form
//! and copies the answers back into it.

use super::record;
use crate::AppContext;
use towork_core::Result;
use towork_core::ai::{
    DEFAULT_MAX_LENGTH, DEFAULT_TONE, DomainSuggestion, DomainSuggestionRequest, DraftRequest,
    DraftResponse, ResumeExtraction, RewriteRequest, parse_skills,
};
use towork_core::mission::MissionForm;
use towork_interaction::api::{AiApi, DomaineApi};
use tracing::{debug, info};

const LANGUAGE: &str = "fr";
const REWRITE_INTENT: &str = "clarity";
const SUGGESTION_LIMIT: u32 = 3;

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| value.to_string())
}

fn joined_skills(form: &MissionForm) -> Option<String> {
    (!form.skills.is_empty()).then(|| form.skills.join(", "))
}

pub struct MissionDraftAssistant {
    ai: AiApi,
    domaines: DomaineApi,
    pub suggestions: Vec<DomainSuggestion>,
    pub drafting: bool,
    pub rewriting: bool,
    pub suggesting: bool,
    pub error: Option<String>,
}

impl MissionDraftAssistant {
    pub fn new(ai: AiApi, domaines: DomaineApi) -> Self {
        Self {
            ai,
            domaines,
            suggestions: Vec::new(),
            drafting: false,
            rewriting: false,
            suggesting: false,
            error: None,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.api().ai.clone(), context.api().domaines.clone())
    }

    /// Generates a draft from what the form already holds and fills the
    /// fields the answer provides.
    pub async fn draft(&mut self, form: &mut MissionForm) -> Result<DraftResponse> {
        if self.drafting {
            return Ok(DraftResponse::default());
        }
        let request = DraftRequest {
            title: Some(form.title.clone()),
            description: Some(form.description.clone()),
            requirements: non_blank(&form.notes),
            skills_required: joined_skills(form),
            tone: Some(DEFAULT_TONE.to_string()),
            language: Some(LANGUAGE.to_string()),
            max_length: Some(DEFAULT_MAX_LENGTH),
        };
        self.drafting = true;
        let result = self.ai.draft_mission(&request).await;
        self.drafting = false;
        let draft = record(&mut self.error, result, "Génération indisponible")?;
        apply_draft(form, &draft);
        info!(title = %form.title, "Mission draft applied");
        Ok(draft)
    }

    /// Rewrites the description for clarity. A blank description is left
    /// alone without a request.
    pub async fn rewrite_description(&mut self, form: &mut MissionForm) -> Result<bool> {
        if self.rewriting || form.description.trim().is_empty() {
            return Ok(false);
        }
        let request = RewriteRequest {
            content: form.description.clone(),
            intent: Some(REWRITE_INTENT.to_string()),
            tone: Some(DEFAULT_TONE.to_string()),
            language: Some(LANGUAGE.to_string()),
            max_length: Some(DEFAULT_MAX_LENGTH),
        };
        self.rewriting = true;
        let result = self.ai.rewrite(&request).await;
        self.rewriting = false;
        let rewritten = record(&mut self.error, result, "Reformulation indisponible")?;
        match rewritten.content.filter(|c| !c.trim().is_empty()) {
            Some(content) => {
                form.description = content;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Asks for up to three matching domains. The best one is preselected
    /// when the form has none yet. A failure clears the suggestions.
    pub async fn suggest_domains(&mut self, form: &mut MissionForm) -> Result<&[DomainSuggestion]> {
        if self.suggesting {
            return Ok(&self.suggestions);
        }
        let request = DomainSuggestionRequest {
            title: Some(form.title.clone()),
            description: Some(form.description.clone()),
            requirements: Some(form.notes.clone()),
            skills_required: Some(form.skills.join(", ")),
            limit: Some(SUGGESTION_LIMIT),
            language: Some(LANGUAGE.to_string()),
        };
        self.suggesting = true;
        let result = self.domaines.suggest(&request).await;
        self.suggesting = false;
        match record(&mut self.error, result, "Suggestion indisponible") {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(err) => {
                self.suggestions.clear();
                return Err(err);
            }
        }
        if form.domaine_id.is_none() {
            if let Some(best) = self.suggestions.first() {
                debug!(domaine_id = best.domaine_id, "Preselected suggested domain");
                form.domaine_id = Some(best.domaine_id);
            }
        }
        Ok(&self.suggestions)
    }

    pub fn apply_suggestion(&self, form: &mut MissionForm, domaine_id: i64) {
        form.domaine_id = Some(domaine_id);
    }

    /// Sends a resume for skill extraction.
    pub async fn extract_resume(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        freelancer_id: Option<i64>,
    ) -> Result<ResumeExtraction> {
        let result = self
            .ai
            .extract_resume(file_name, bytes, freelancer_id, Some(LANGUAGE))
            .await;
        let extraction = record(&mut self.error, result, "Analyse du CV impossible")?;
        info!(
            file_key = %extraction.file_key,
            created = extraction.created_count.unwrap_or(0),
            "Resume analysed"
        );
        Ok(extraction)
    }
}

/// Copies the non-empty parts of a draft into the form.
pub fn apply_draft(form: &mut MissionForm, draft: &DraftResponse) {
    if let Some(title) = draft.title.as_deref().and_then(non_blank) {
        form.title = title;
    }
    if let Some(description) = draft.description.as_deref().and_then(non_blank) {
        form.description = description;
    }
    if let Some(requirements) = draft.requirements.as_deref().and_then(non_blank) {
        form.notes = requirements;
    }
    if let Some(raw) = draft.skills_suggested.as_deref() {
        let skills = parse_skills(raw);
        if !skills.is_empty() {
            form.skills = skills;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_only_overwrites_provided_fields() {
        let mut form = MissionForm {
            title: "Site vitrine".into(),
            description: "Refonte".into(),
            skills: vec!["HTML".into()],
            ..Default::default()
        };
        let draft = DraftResponse {
            description: Some("Refonte complète du site vitrine".into()),
            requirements: Some("   ".into()),
            skills_suggested: Some("Angular, SCSS\nFigma".into()),
            ..Default::default()
        };
        apply_draft(&mut form, &draft);

        assert_eq!(form.title, "Site vitrine");
        assert_eq!(form.description, "Refonte complète du site vitrine");
        assert!(form.notes.is_empty());
        assert_eq!(form.skills, ["Angular", "SCSS", "Figma"]);
    }
}
