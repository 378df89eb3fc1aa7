use super::utils::{Shown, day, notice, paint, success, title, truncate};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use colored::Colorize;
use strum::IntoEnumIterator;
use towork_application::AppContext;
use towork_application::view_model::{ClientMissionsViewModel, FreelancerBoard, MissionDraftAssistant};
use towork_core::ai::parse_skills;
use towork_core::mission::{
    BoardStage, BudgetType, ExperienceLevel, MissionForm, MissionStatus, WorkMode,
};
use towork_core::status::StatusLabel;

/// Mission creation arguments, already mapped to domain enums.
pub struct MissionArgs {
    pub title: String,
    pub description: String,
    pub domaine_id: Option<i64>,
    pub budget: f64,
    pub budget_type: BudgetType,
    pub duration_days: u32,
    pub experience: ExperienceLevel,
    pub work_mode: WorkMode,
    pub skills: Option<String>,
    pub notes: Option<String>,
    pub deadline: Option<String>,
}

impl MissionArgs {
    fn into_form(self) -> Result<MissionForm> {
        let deadline = self
            .deadline
            .as_deref()
            .map(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d"))
            .transpose()
            .context("La date limite doit être au format AAAA-MM-JJ")?;
        Ok(MissionForm {
            title: self.title,
            description: self.description,
            domaine_id: self.domaine_id,
            budget: Some(self.budget),
            budget_type: Some(self.budget_type),
            duration_days: Some(self.duration_days),
            experience: Some(self.experience),
            work_mode: Some(self.work_mode),
            skills: self.skills.as_deref().map(parse_skills).unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            deadline,
        })
    }
}

pub async fn mine(context: &AppContext) -> Result<()> {
    let mut missions = ClientMissionsViewModel::from_context(context);
    missions.load().await.shown(&missions.state.error)?;
    if missions.state.is_empty() {
        notice("Aucune mission publiée pour le moment.");
        return Ok(());
    }
    title("Mes missions");
    for row in missions.rows() {
        println!(
            "  #{:<5} {:<36} {:<18} {:<22} {}",
            row.id,
            truncate(&row.title, 36),
            paint(row.status_label, row.tone),
            row.budget,
            day(row.created_at.as_deref()).bright_black()
        );
    }
    Ok(())
}

/// Freelancer board: one section per stage, empty stages skipped.
pub async fn board(context: &AppContext, refresh: bool) -> Result<()> {
    let mut board = FreelancerBoard::from_context(context);
    board.load(refresh).await.shown(&board.state.error)?;
    for stage in BoardStage::iter() {
        let cards: Vec<_> = board.by_stage(stage).collect();
        if cards.is_empty() {
            continue;
        }
        title(&format!("{} ({})", stage.label(), cards.len()));
        for card in cards {
            let urgent = if card.urgent {
                card.urgency_label().red().to_string()
            } else {
                String::new()
            };
            println!("  #{:<5} {} {}", card.id, card.title.bold(), urgent);
            println!(
                "         {} · {} · {} · {}",
                card.client_name, card.domaine, card.budget, card.duration
            );
            println!("         {}", card.summary.bright_black());
        }
    }
    Ok(())
}

pub async fn apply(
    context: &AppContext,
    mission_id: i64,
    message: &str,
    resume_url: Option<&str>,
    price: Option<f64>,
    days: Option<u32>,
) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Le message ne peut pas être vide.");
    }
    let mut board = FreelancerBoard::from_context(context);
    board.load(false).await.shown(&board.state.error)?;
    let card = board
        .apply(mission_id, message, resume_url, price, days)
        .await
        .shown(&board.state.error)?;
    match card {
        Some(card) => success(&format!(
            "{} : {}",
            card.title,
            FreelancerBoard::stage_label(card.stage)
        )),
        None => success("Candidature envoyée."),
    }
    Ok(())
}

/// Publishes a mission, optionally completed by the AI assistant first.
pub async fn create(context: &AppContext, args: MissionArgs, draft: bool) -> Result<()> {
    let mut form = args.into_form()?;
    let mut assistant = MissionDraftAssistant::from_context(context);
    if draft {
        assistant.draft(&mut form).await.shown(&assistant.error)?;
        notice("Brouillon généré par l'assistant.");
    }
    if form.domaine_id.is_none() {
        let best = assistant
            .suggest_domains(&mut form)
            .await
            .map(|suggestions| suggestions.first().map(|s| s.domaine_name.clone()))
            .shown(&assistant.error)?;
        if let Some(name) = best {
            notice(&format!("Domaine suggéré : {name}"));
        }
    }

    let mut missions = ClientMissionsViewModel::from_context(context);
    let mission = missions.create(&form).await.shown(&missions.state.error)?;
    success(&format!("Mission #{} publiée : {}", mission.id, mission.title));
    Ok(())
}

pub async fn set_status(context: &AppContext, id: i64, raw: &str) -> Result<()> {
    let status = MissionStatus::from(raw.to_string());
    if let MissionStatus::Unknown(raw) = &status {
        bail!("Statut inconnu : {raw}");
    }
    let mut missions = ClientMissionsViewModel::from_context(context);
    missions
        .update_status(id, &status)
        .await
        .shown(&missions.state.error)?;
    success(&format!("Mission #{id} : {}", status.label()));
    Ok(())
}

pub async fn close(context: &AppContext, id: i64) -> Result<()> {
    let mut missions = ClientMissionsViewModel::from_context(context);
    missions.close(id).await.shown(&missions.state.error)?;
    let label = missions
        .state
        .find(id)
        .map(|m| m.status().label())
        .unwrap_or(MissionStatus::Completed.label());
    success(&format!("Mission #{id} : {label}"));
    Ok(())
}

pub async fn submit(context: &AppContext, id: i64) -> Result<()> {
    let mut board = FreelancerBoard::from_context(context);
    board.submit_final(id).await.shown(&board.state.error)?;
    success(&format!("Mission #{id} soumise au client pour clôture."));
    Ok(())
}

pub async fn delete(context: &AppContext, id: i64) -> Result<()> {
    let mut missions = ClientMissionsViewModel::from_context(context);
    let message = missions.delete(id).await.shown(&missions.state.error)?;
    success(&message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(deadline: Option<&str>) -> MissionArgs {
        MissionArgs {
            title: "Site vitrine".into(),
            description: "Refonte".into(),
            domaine_id: Some(2),
            budget: 1500.0,
            budget_type: BudgetType::Fixed,
            duration_days: 20,
            experience: ExperienceLevel::Advanced,
            work_mode: WorkMode::Hybrid,
            skills: Some("Rust, Angular\nSQL".into()),
            notes: None,
            deadline: deadline.map(str::to_string),
        }
    }

    #[test]
    fn form_from_args_is_valid() {
        let form = args(Some("2025-01-31")).into_form().unwrap();
        assert_eq!(form.skills, vec!["Rust", "Angular", "SQL"]);
        assert_eq!(form.deadline, NaiveDate::from_ymd_opt(2025, 1, 31));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn malformed_deadline_is_rejected() {
        assert!(args(Some("31/01/2025")).into_form().is_err());
    }
}
