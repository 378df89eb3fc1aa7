use super::utils::{Shown, notice, paint, success, title};
use anyhow::{Result, bail};
use colored::Colorize;
use std::path::Path;
use towork_application::AppContext;
use towork_application::view_model::{MilestoneAudience, MilestonesViewModel};
use towork_core::auth::Role;
use towork_core::milestone::{DeliverableUpload, NewMilestone};
use towork_core::wallet::{DEFAULT_CURRENCY, format_money};

/// Opens the milestones of `mission_id` from the side of the logged-in role.
pub fn open(context: &AppContext, mission_id: i64) -> Result<MilestonesViewModel> {
    let audience = match context.session_state().role {
        Some(Role::Client) => MilestoneAudience::Client,
        Some(Role::Freelancer) => MilestoneAudience::Freelancer,
        Some(other) => bail!("Les jalons ne sont pas disponibles pour le rôle {}", other.label()),
        None => bail!("Connectez-vous pour consulter les jalons."),
    };
    Ok(MilestonesViewModel::from_context(context, mission_id, audience))
}

pub async fn list(milestones: &mut MilestonesViewModel) -> Result<()> {
    milestones.load().await.shown(&milestones.state.error)?;
    print(milestones);
    Ok(())
}

fn print(milestones: &MilestonesViewModel) {
    if milestones.state.is_empty() {
        notice("Aucun jalon pour cette mission.");
        return;
    }
    title(&format!(
        "Jalons de la mission #{} ({}% payé)",
        milestones.mission_id(),
        milestones.progress_percent()
    ));
    for view in milestones.views() {
        let mut actions = Vec::new();
        if view.can_deliver {
            actions.push("à livrer");
        }
        if view.awaits_review {
            actions.push("à valider");
        }
        if view.can_pay {
            actions.push("à payer");
        }
        println!(
            "  #{:<5} {:<32} {:>12}  {:<14} {} {}",
            view.id.unwrap_or_default(),
            view.title,
            view.amount,
            paint(view.status_label, view.tone),
            view.due_date.as_deref().unwrap_or("").bright_black(),
            actions.join(", ").cyan()
        );
    }
    println!(
        "  {} {} / {}",
        "Total".bold(),
        format_money(milestones.paid_amount(), DEFAULT_CURRENCY),
        format_money(milestones.total_amount(), DEFAULT_CURRENCY)
    );
}

pub async fn create(
    milestones: &mut MilestonesViewModel,
    title: String,
    amount: f64,
    description: Option<String>,
    due_date: Option<String>,
) -> Result<()> {
    let milestone = NewMilestone {
        description,
        due_date,
        ..NewMilestone::new(title, amount)
    };
    milestones
        .create(&milestone)
        .await
        .shown(&milestones.state.error)?;
    success("Jalon ajouté.");
    print(milestones);
    Ok(())
}

pub async fn deliver(milestones: &mut MilestonesViewModel, id: i64, notes: Option<&str>) -> Result<()> {
    milestones.deliver(id, notes).await.shown(&milestones.state.error)?;
    success("Jalon livré, en attente de validation.");
    Ok(())
}

pub async fn upload(
    milestones: &mut MilestonesViewModel,
    id: i64,
    file: &Path,
    comment: Option<String>,
) -> Result<()> {
    let mut upload = DeliverableUpload::from_path(file)?;
    if let Some(comment) = comment {
        upload = upload.with_comment(comment);
    }
    let file_name = upload.file_name.clone();
    milestones
        .upload_deliverable(id, upload)
        .await
        .shown(&milestones.state.error)?;
    success(&format!("Livrable {file_name} envoyé."));
    Ok(())
}

pub async fn revert(milestones: &mut MilestonesViewModel, id: i64) -> Result<()> {
    milestones.revert(id).await.shown(&milestones.state.error)?;
    success("Jalon rouvert.");
    Ok(())
}

pub async fn accept(milestones: &mut MilestonesViewModel, id: i64, notes: Option<&str>) -> Result<()> {
    milestones.accept(id, notes).await.shown(&milestones.state.error)?;
    success("Jalon validé.");
    Ok(())
}

pub async fn reject(milestones: &mut MilestonesViewModel, id: i64, reason: Option<&str>) -> Result<()> {
    milestones.reject(id, reason).await.shown(&milestones.state.error)?;
    success("Jalon refusé.");
    Ok(())
}

pub async fn pay(milestones: &mut MilestonesViewModel, id: i64, freelancer_id: i64) -> Result<()> {
    let message = milestones
        .pay(id, freelancer_id)
        .await
        .shown(&milestones.state.error)?;
    success(&message);
    Ok(())
}
