use super::utils::{Shown, day, notice, success, title};
use anyhow::{Result, bail};
use colored::Colorize;
use towork_application::AppContext;
use towork_application::view_model::{
    FeedbackViewModel, MilestoneAudience, ProfileData, ProfileViewModel,
};
use towork_core::auth::Role;
use towork_core::feedback::stars;

pub async fn show(context: &AppContext) -> Result<()> {
    let mut profile = ProfileViewModel::from_context(context);
    profile.load().await.shown(&profile.error)?;
    let Some(data) = profile.profile.as_ref() else {
        notice("Profil introuvable.");
        return Ok(());
    };

    let verified = if data.is_verified() {
        " ✓".green().to_string()
    } else {
        String::new()
    };
    title(&format!("{}{verified}", data.full_name()));
    println!("  {}", data.email());
    match data {
        ProfileData::Client(client) => {
            if let Some(company) = client.company_name.as_deref() {
                println!("  {company}");
            }
            if let Some(city) = client.city.as_deref() {
                println!("  {city}");
            }
        }
        ProfileData::Freelancer(freelancer) => {
            if let Some(headline) = freelancer.title.as_deref() {
                println!("  {headline}");
            }
            if let Some(rate) = freelancer.hourly_rate {
                println!("  {rate:.0} €/h");
            }
            if let Some(skills) = freelancer.skills.as_ref().filter(|s| !s.is_empty()) {
                println!("  {}", skills.join(", ").cyan());
            }
        }
    }

    if let Some(line) = profile.rating_line() {
        println!("\n  {}", line.yellow());
    }
    for feedback in profile.feedbacks.iter().take(5) {
        println!(
            "  {} {} {}",
            day(feedback.created_at.as_deref()).bright_black(),
            stars(f64::from(feedback.rating)).yellow(),
            feedback.comment.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// The viewer's feedback on a completed mission.
pub async fn feedback(context: &AppContext, mission_id: i64) -> Result<()> {
    let mut feedback = FeedbackViewModel::from_context(context, mission_id, audience(context)?);
    let loaded = feedback.load().await.map(|mine| mine.cloned());
    match loaded.shown(&feedback.error)? {
        Some(mine) => {
            println!(
                "{} {}",
                stars(f64::from(mine.rating)).yellow(),
                mine.comment.as_deref().unwrap_or("")
            );
        }
        None => notice("Aucun avis donné pour cette mission."),
    }
    Ok(())
}

pub async fn give_feedback(context: &AppContext, mission_id: i64, rating: u8, comment: &str) -> Result<()> {
    let mut feedback = FeedbackViewModel::from_context(context, mission_id, audience(context)?);
    feedback
        .submit(rating, comment)
        .await
        .map(|_| ())
        .shown(&feedback.error)?;
    if let Some(stars) = feedback.my_stars() {
        success(&format!("Merci pour votre avis {stars}"));
    }
    Ok(())
}

fn audience(context: &AppContext) -> Result<MilestoneAudience> {
    match context.session_state().role {
        Some(Role::Client) => Ok(MilestoneAudience::Client),
        Some(Role::Freelancer) => Ok(MilestoneAudience::Freelancer),
        _ => bail!("Seuls les clients et les freelances donnent un avis."),
    }
}
