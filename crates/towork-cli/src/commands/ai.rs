use super::utils::{Shown, notice, title};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use towork_application::AppContext;
use towork_application::view_model::MissionDraftAssistant;
use towork_core::auth::Role;
use towork_core::mission::MissionForm;

/// Prints the drafted mission and the domains that fit it.
pub async fn draft(context: &AppContext, title_text: &str, description: &str) -> Result<()> {
    let mut form = MissionForm {
        title: title_text.trim().to_string(),
        description: description.trim().to_string(),
        ..Default::default()
    };
    let mut assistant = MissionDraftAssistant::from_context(context);
    let response = assistant.draft(&mut form).await.shown(&assistant.error)?;

    title(&form.title);
    println!("{}", form.description);
    if !form.notes.is_empty() {
        println!("\n{}", "Exigences".bold());
        println!("{}", form.notes);
    }
    if !form.skills.is_empty() {
        println!("\n{} {}", "Compétences :".bold(), form.skills.join(", "));
    }
    if let Some(notes) = response.notes.as_deref() {
        notice(notes);
    }

    // Suggestions are a bonus on top of the draft.
    match assistant.suggest_domains(&mut form).await {
        Ok(suggestions) if !suggestions.is_empty() => {
            println!("\n{}", "Domaines suggérés".bold());
            for suggestion in suggestions {
                println!(
                    "  #{:<5} {} {}",
                    suggestion.domaine_id,
                    suggestion.domaine_name,
                    suggestion.reason.as_deref().unwrap_or("").bright_black()
                );
            }
        }
        Ok(_) => {}
        Err(_) => notice("Suggestion de domaine indisponible."),
    }
    Ok(())
}

/// Sends a resume for skill extraction. Freelancers get the skills added to
/// their profile.
pub async fn resume(context: &AppContext, file: &Path) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cv.pdf".to_string());
    let state = context.session_state();
    let freelancer_id = match state.role {
        Some(Role::Freelancer) => state.user_id(),
        _ => None,
    };

    let mut assistant = MissionDraftAssistant::from_context(context);
    let extraction = assistant
        .extract_resume(&file_name, bytes, freelancer_id)
        .await
        .shown(&assistant.error)?;

    title(&format!("CV analysé : {file_name}"));
    if let Some(summary) = extraction.summary.as_deref() {
        println!("{summary}");
    }
    for skill in extraction.skills.unwrap_or_default() {
        let years = skill
            .years_of_experience
            .map(|y| format!("{y} an(s)"))
            .unwrap_or_default();
        println!(
            "  - {} {} {}",
            skill.name.bold(),
            skill.level.as_deref().unwrap_or("").bright_black(),
            years.bright_black()
        );
    }
    if let Some(created) = extraction.created_count {
        notice(&format!("{created} compétence(s) ajoutée(s) au profil."));
    }
    Ok(())
}
