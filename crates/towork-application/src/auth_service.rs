//! Login, logout and registration use cases.

use crate::navigation::{AppRouter, LOGIN_PATH};
use std::sync::Arc;
use towork_core::Result;
use towork_core::auth::{LoginRequest, RegisterKind, RegisterRequest, Session};
use towork_core::navigation::Navigator;
use towork_core::session::SessionStore;
use towork_interaction::api::AuthApi;
use tracing::{info, warn};

/// Coordinates the auth endpoints with the session store and router.
#[derive(Clone)]
pub struct AuthService {
    api: AuthApi,
    session: Arc<SessionStore>,
    router: Arc<AppRouter>,
}

impl AuthService {
    pub fn new(api: AuthApi, session: Arc<SessionStore>, router: Arc<AppRouter>) -> Self {
        Self {
            api,
            session,
            router,
        }
    }

    pub fn from_context(context: &crate::AppContext) -> Self {
        Self::new(
            context.api().auth.clone(),
            context.session().clone(),
            context.router().clone(),
        )
    }

    /// Logs in and stores the session.
    ///
    /// # Arguments
    ///
    /// * `email` - Account email
    /// * `password` - Account password
    /// * `remember` - Keep the session across restarts
    ///
    /// # Returns
    ///
    /// The session returned by the backend. An invalid form fails before any
    /// request; a refused login carries the backend message.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<Session> {
        let request = LoginRequest::new(email.trim(), password);
        request.validate()?;

        let session = self.api.login(&request).await.inspect_err(|err| {
            warn!(error = %err, "Login refused");
        })?;
        self.session.persist_session(&session, remember)?;
        info!(user_id = session.user_id, role = %session.role.as_str(), "Logged in");
        Ok(session)
    }

    /// Clears the session and returns to the login page.
    pub fn logout(&self) -> Result<()> {
        self.session.logout()?;
        self.router.navigate(LOGIN_PATH, &[]);
        Ok(())
    }

    /// Creates an account. The new user still has to log in.
    pub async fn register(&self, kind: RegisterKind, request: RegisterRequest) -> Result<String> {
        request.validate()?;
        let message = self.api.register(kind, request).await?;
        info!(kind = kind.path_segment(), "Account registered");
        Ok(message)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }
}
