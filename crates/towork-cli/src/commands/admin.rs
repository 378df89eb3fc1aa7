use super::utils::{Shown, day, success, title};
use anyhow::Result;
use colored::{Colorize, CustomColor};
use towork_application::AppContext;
use towork_application::view_model::{AdminUsersViewModel, role_color};
use towork_core::profile::ManagedStatus;

/// Dashboard of the user directory: counters, role split and newest
/// accounts.
pub async fn users(context: &AppContext) -> Result<()> {
    let mut admin = AdminUsersViewModel::from_context(context);
    admin.load().await.shown(&admin.state.error)?;

    title("Utilisateurs");
    for card in admin.stat_cards() {
        println!(
            "  {:<22} {}",
            card.label,
            card.value.to_string().custom_color(hex(card.color)).bold()
        );
    }

    title("Répartition");
    for segment in admin.pie_segments() {
        let share = (segment.end - segment.start) / 360.0 * 100.0;
        println!(
            "  {:<16} {:>5.1}%  {}",
            segment.role.label(),
            share,
            bar(share).custom_color(hex(segment.color))
        );
    }

    title("Derniers inscrits");
    for user in admin.highlighted() {
        let status = match user.status {
            ManagedStatus::Active => user.status.label().green(),
            ManagedStatus::Inactive => user.status.label().yellow(),
        };
        println!(
            "  #{:<5} {:<26} {:<30} {:<16} {} {}",
            user.id,
            user.name,
            user.email,
            user.role.label().custom_color(hex(role_color(&user.role))),
            status,
            day(Some(user.joined.as_str())).bright_black()
        );
    }
    Ok(())
}

pub async fn delete_user(context: &AppContext, id: i64) -> Result<()> {
    let mut admin = AdminUsersViewModel::from_context(context);
    admin.load().await.shown(&admin.state.error)?;
    let message = admin.delete(id).await.shown(&admin.state.error)?;
    success(&message);
    Ok(())
}

/// `#rrggbb` to a terminal colour; malformed input falls back to white.
fn hex(code: &str) -> CustomColor {
    let channel = |range: std::ops::Range<usize>| {
        code.trim_start_matches('#')
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
            .unwrap_or(255)
    };
    CustomColor::new(channel(0..2), channel(2..4), channel(4..6))
}

fn bar(percent: f64) -> String {
    "█".repeat((percent / 5.0).round().max(0.0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_role_colors() {
        let purple = hex("#a855f7");
        assert_eq!((purple.r, purple.g, purple.b), (0xa8, 0x55, 0xf7));
        let fallback = hex("nope");
        assert_eq!((fallback.r, fallback.g, fallback.b), (255, 255, 255));
    }

    #[test]
    fn bar_scales_to_twenty_cells() {
        assert_eq!(bar(100.0).chars().count(), 20);
        assert_eq!(bar(0.0), "");
    }
}
