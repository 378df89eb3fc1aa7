use super::utils::{notice, success, title};
use anyhow::Result;
use colored::Colorize;
use towork_application::{AppContext, AuthService, GuardDecision, RouteGuard, nav_entries};
use towork_core::auth::{RegisterKind, RegisterRequest};

pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// `remember` overrides the configured default either way.
pub async fn login(
    context: &AppContext,
    email: &str,
    password: &str,
    remember: Option<bool>,
) -> Result<()> {
    let remember = remember.unwrap_or(context.config().remember_by_default);
    let session = AuthService::from_context(context)
        .login(email, password, remember)
        .await?;
    success(&format!(
        "Bienvenue {} ({})",
        session.display_name(),
        session.role.label()
    ));
    Ok(())
}

pub fn logout(context: &AppContext) -> Result<()> {
    AuthService::from_context(context).logout()?;
    notice("Session fermée.");
    Ok(())
}

pub fn whoami(context: &AppContext) {
    match context.session_state().user {
        Some(user) => {
            println!("{}", user.display_name().bold());
            println!("  {}", user.email);
            println!("  {} #{}", user.role.label(), user.user_id);
        }
        None => notice("Non connecté."),
    }
}

pub async fn register(context: &AppContext, kind: RegisterKind, form: RegisterForm) -> Result<()> {
    let request = RegisterRequest {
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        confirm_password: form.password.clone(),
        password: form.password,
        accept_terms: true,
        phone: form.phone,
        city: form.city,
        ..Default::default()
    };
    let message = AuthService::from_context(context)
        .register(kind, request)
        .await?;
    success(&message);
    notice("Vous pouvez maintenant vous connecter.");
    Ok(())
}

/// Lists the menu, or resolves `url` through the route guard.
pub fn nav(context: &AppContext, url: Option<&str>) {
    let state = context.session_state();
    if let Some(url) = url {
        match RouteGuard::check(url, &state) {
            GuardDecision::Allow => success(&format!("{url} : accessible")),
            GuardDecision::Redirect(to) => println!("{} {}", format!("{url} →").yellow(), to),
        }
        return;
    }

    let entries = nav_entries(&state);
    if entries.is_empty() {
        notice("Connectez-vous pour accéder au menu.");
        return;
    }
    title("Menu");
    for entry in entries {
        println!("  {:<22} {}", entry.label, entry.path.bright_black());
    }
}
