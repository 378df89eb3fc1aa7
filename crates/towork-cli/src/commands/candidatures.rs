use super::utils::{Shown, day, failure, notice, paint, success, title, truncate};
use anyhow::Result;
use colored::Colorize;
use towork_application::AppContext;
use towork_application::view_model::CandidatureBoard;
use towork_core::candidature::CandidatureStatus;
use towork_core::status::StatusLabel;

/// Candidatures of a mission, then the freelancers the backend suggests.
pub async fn list(context: &AppContext, mission_id: i64) -> Result<()> {
    let mut board = CandidatureBoard::from_context(context);
    board
        .select_mission(mission_id)
        .await
        .shown(&board.candidatures_error)?;

    let candidatures = board.candidatures_for(mission_id).await;
    if candidatures.is_empty() {
        notice("Aucune candidature pour cette mission.");
    } else {
        title(&format!("Candidatures ({})", candidatures.len()));
        for candidature in &candidatures {
            let status = candidature.status();
            let offer = match (candidature.proposed_price, candidature.proposed_duration) {
                (Some(price), Some(days)) => format!("{price:.0} € · {days} j"),
                (Some(price), None) => format!("{price:.0} €"),
                _ => String::new(),
            };
            println!(
                "  #{:<5} {:<28} {:<14} {} {}",
                candidature.id.unwrap_or_default(),
                candidature.freelancer_name(),
                paint(status.label(), status.tone()),
                offer,
                day(candidature.created_at.as_deref()).bright_black()
            );
            if let Some(letter) = candidature.cover_letter.as_deref() {
                println!("         {}", truncate(letter.trim(), 90).bright_black());
            }
        }
    }

    let recommendations = board.recommendations_for(mission_id).await;
    failure(board.recommendations_error.as_deref());
    if !recommendations.is_empty() {
        title("Freelances suggérés");
        for view in recommendations {
            let score = view
                .score_percent
                .map(|p| format!("{p}%"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  #{:<5} {:<28} {:>4}  {}",
                view.freelancer.freelancer_id,
                view.freelancer
                    .freelancer_name
                    .as_deref()
                    .unwrap_or("Freelance"),
                score,
                view.badge.label().cyan()
            );
        }
    }
    Ok(())
}

pub async fn accept(
    context: &AppContext,
    mission_id: i64,
    candidature_id: i64,
    message: Option<&str>,
) -> Result<()> {
    decide(context, mission_id, candidature_id, CandidatureStatus::Accepted, message).await
}

pub async fn reject(
    context: &AppContext,
    mission_id: i64,
    candidature_id: i64,
    message: Option<&str>,
) -> Result<()> {
    decide(context, mission_id, candidature_id, CandidatureStatus::Rejected, message).await
}

async fn decide(
    context: &AppContext,
    mission_id: i64,
    candidature_id: i64,
    status: CandidatureStatus,
    message: Option<&str>,
) -> Result<()> {
    let mut board = CandidatureBoard::from_context(context);
    board
        .select_mission(mission_id)
        .await
        .shown(&board.candidatures_error)?;
    let confirmation = board
        .decide(candidature_id, &status, message)
        .await
        .shown(&board.candidatures_error)?;
    success(&confirmation);
    failure(board.missions.error.as_deref());
    Ok(())
}
