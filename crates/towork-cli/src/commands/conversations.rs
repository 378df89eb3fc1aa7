use super::utils::{Shown, day, notice, success, title, truncate};
use anyhow::Result;
use colored::Colorize;
use towork_application::AppContext;
use towork_application::view_model::{
    ConversationDetailViewModel, ConversationListViewModel, MessageView,
};
use tracing::debug;

pub async fn list(context: &AppContext) -> Result<()> {
    let mut conversations = ConversationListViewModel::from_context(context);
    conversations.load().await.shown(&conversations.state.error)?;
    if conversations.state.is_empty() {
        notice("Aucune conversation.");
        return Ok(());
    }
    title("Conversations");
    for summary in &conversations.state.items {
        println!(
            "  #{:<5} {} · {}",
            summary.id,
            summary.mission_title.as_deref().unwrap_or("Mission").bold(),
            summary.counterpart_name.as_deref().unwrap_or("-")
        );
        if let Some(last) = summary.last_message.as_deref() {
            println!(
                "         {} {}",
                day(summary.last_message_at.as_deref()).bright_black(),
                truncate(last, 80).bright_black()
            );
        }
    }
    Ok(())
}

pub async fn show(context: &AppContext, id: i64, summary: bool) -> Result<()> {
    let mut thread = ConversationDetailViewModel::from_context(context, id);
    thread.load().await.shown(&thread.error)?;
    title(&format!("Conversation #{id}"));
    print_all(&thread.views());

    if summary {
        let language = context.config().language.clone();
        let response = thread
            .summarize(&language)
            .await
            .map(|summary| summary.cloned())
            .shown(&thread.error)?;
        match response {
            Some(response) => {
                title("Résumé");
                if let Some(text) = response.summary {
                    println!("  {text}");
                }
                for step in response.next_steps.unwrap_or_default() {
                    println!("  {}", format!("- {step}").yellow());
                }
            }
            None => notice("Aucun résumé disponible."),
        }
    }
    Ok(())
}

/// Prints the thread, then every new message until Ctrl-C.
pub async fn watch(context: &AppContext, id: i64) -> Result<()> {
    let mut thread = ConversationDetailViewModel::from_context(context, id);
    thread.load().await.shown(&thread.error)?;
    title(&format!("Conversation #{id}"));
    let mut printed = thread.messages.len();
    print_all(&thread.views());
    notice("En écoute… Ctrl-C pour quitter.");

    thread.start_polling(context.poll_interval());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            updated = thread.next_poll() => {
                if !updated {
                    break;
                }
                let views = thread.views();
                // A shorter thread means messages were removed server side.
                if views.len() < printed {
                    printed = 0;
                }
                print_all(&views[printed..]);
                printed = views.len();
            }
        }
    }
    thread.stop_polling();
    debug!(conversation_id = id, "Watch ended");
    Ok(())
}

pub async fn send(context: &AppContext, id: i64, message: &str) -> Result<()> {
    let mut thread = ConversationDetailViewModel::from_context(context, id);
    thread.send(message).await.shown(&thread.error)?;
    success("Message envoyé.");
    Ok(())
}

fn print_all(views: &[MessageView]) {
    for view in views {
        let author = if view.mine {
            view.author.green()
        } else {
            view.author.bright_blue()
        };
        println!(
            "  {} {}",
            format!("[{}]", day(view.created_at.as_deref())).bright_black(),
            author.bold()
        );
        println!("    {}", view.content);
        if view.flagged {
            let reason = view.flag_reason.as_deref().unwrap_or("contenu signalé");
            println!("    {}", format!("⚠ {reason}").red());
        }
    }
}
