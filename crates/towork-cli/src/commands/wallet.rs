use super::utils::{Shown, day, notice, paint, success, title};
use anyhow::Result;
use colored::Colorize;
use towork_application::AppContext;
use towork_application::view_model::{PortfolioViewModel, WalletViewModel};
use towork_core::status::StatusLabel;

pub async fn show(context: &AppContext) -> Result<()> {
    let mut wallet = WalletViewModel::from_context(context);
    wallet.load().await.shown(&wallet.error)?;

    title("Portefeuille");
    println!("  Solde          {}", wallet.formatted_balance().bold());
    println!(
        "  Total dépensé  {}",
        wallet.format_amount(wallet.total_debited())
    );

    if wallet.wallet.transactions.is_empty() {
        notice("Aucun mouvement.");
    } else {
        title("Mouvements");
        for tx in &wallet.wallet.transactions {
            let what = tx
                .milestone_title
                .as_deref()
                .or(tx.mission_title.as_deref())
                .unwrap_or("");
            println!(
                "  {} {:<12} {:>14}  {}",
                day(tx.created_at.as_deref()).bright_black(),
                paint(tx.kind.label(), tx.kind.tone()),
                wallet.format_amount(tx.amount),
                what
            );
        }
    }

    if !wallet.payments.is_empty() {
        title("Paiements");
        for payment in &wallet.payments {
            println!(
                "  {} {:>14}  {:<10} {}",
                day(payment.created_at.as_deref()).bright_black(),
                wallet.format_amount(payment.amount.unwrap_or(0.0)),
                payment.status.as_deref().unwrap_or("-"),
                payment.description.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

pub async fn recharge(context: &AppContext, amount: f64) -> Result<()> {
    let mut wallet = WalletViewModel::from_context(context);
    wallet.recharge(amount).await.shown(&wallet.error)?;
    success(&format!("Nouveau solde : {}", wallet.formatted_balance()));
    Ok(())
}

pub async fn portfolio(context: &AppContext) -> Result<()> {
    let mut portfolio = PortfolioViewModel::from_context(context);
    portfolio.load().await.shown(&portfolio.error)?;

    title(&format!("Gains : {}", portfolio.total_earned()));
    if portfolio.paid().is_empty() {
        notice("Aucun jalon payé pour le moment.");
        return Ok(());
    }
    for milestone in portfolio.paid() {
        println!(
            "  {} {:>14}  {} · {}",
            day(milestone.paid_at.as_deref()).bright_black(),
            PortfolioViewModel::format_amount(milestone),
            milestone.mission_title.as_deref().unwrap_or("Mission"),
            milestone.milestone_title.as_deref().unwrap_or("Jalon")
        );
    }
    Ok(())
}
