//! Explicitly constructed application context.

use crate::navigation::AppRouter;
use std::sync::Arc;
use std::time::Duration;
use towork_core::{Result, ToworkError};
use towork_core::config::ClientConfig;
use towork_core::session::{KeyValueStore, SessionState, SessionStore};
use towork_infrastructure::{ConfigService, FileKeyValueStore, ToworkPaths};
use towork_interaction::ApiClient;
use towork_interaction::api::{
    AiApi, AuthApi, CandidatureApi, CompetenceApi, ConversationApi, DomaineApi, FeedbackApi,
    MessageApi, MilestoneApi, MissionApi, PaymentApi, PortfolioApi, ProfileApi, WalletApi,
};
use towork_interaction::http::{
    AuthErrorInterceptor, BearerTokenInterceptor, HttpTransport, ReqwestTransport,
};
use tracing::info;

/// One typed client per backend resource, all sharing the same
/// [`ApiClient`].
#[derive(Clone)]
pub struct Apis {
    pub auth: AuthApi,
    pub missions: MissionApi,
    pub candidatures: CandidatureApi,
    pub milestones: MilestoneApi,
    pub wallet: WalletApi,
    pub payments: PaymentApi,
    pub portfolio: PortfolioApi,
    pub messages: MessageApi,
    pub conversations: ConversationApi,
    pub domaines: DomaineApi,
    pub competences: CompetenceApi,
    pub ai: AiApi,
    pub feedback: FeedbackApi,
    pub profiles: ProfileApi,
}

impl Apis {
    fn new(client: &ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            missions: MissionApi::new(client.clone()),
            candidatures: CandidatureApi::new(client.clone()),
            milestones: MilestoneApi::new(client.clone()),
            wallet: WalletApi::new(client.clone()),
            payments: PaymentApi::new(client.clone()),
            portfolio: PortfolioApi::new(client.clone()),
            messages: MessageApi::new(client.clone()),
            conversations: ConversationApi::new(client.clone()),
            domaines: DomaineApi::new(client.clone()),
            competences: CompetenceApi::new(client.clone()),
            ai: AiApi::new(client.clone()),
            feedback: FeedbackApi::new(client.clone()),
            profiles: ProfileApi::new(client.clone()),
        }
    }
}

/// Owns everything a screen needs: config, session, router and clients.
///
/// There is no global state; view-models receive the context (or the
/// pieces of it they use) when they are built.
#[derive(Clone)]
pub struct AppContext {
    config: ClientConfig,
    session: Arc<SessionStore>,
    router: Arc<AppRouter>,
    client: ApiClient,
    apis: Apis,
}

impl AppContext {
    /// Wires the context from its parts.
    ///
    /// # Arguments
    ///
    /// * `config` - Backend URL, timeouts and preferences
    /// * `durable` - Session scope kept across restarts
    /// * `ephemeral` - Session scope dropped with the login
    /// * `transport` - Executes the HTTP requests
    ///
    /// # Returns
    ///
    /// A context whose API client attaches the bearer token and reacts to
    /// 401/403 answers.
    pub fn new(
        config: ClientConfig,
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let session = Arc::new(SessionStore::restore(durable, ephemeral)?);
        let router = Arc::new(AppRouter::new());
        let base_url = config.base_url().to_string();

        let client = ApiClient::new(base_url.clone(), transport)
            .with_interceptor(Arc::new(BearerTokenInterceptor::new(
                session.clone(),
                base_url.clone(),
            )))
            .with_interceptor(Arc::new(AuthErrorInterceptor::new(
                session.clone(),
                router.clone(),
            )));
        let apis = Apis::new(&client);

        info!(api_url = %base_url, logged_in = session.is_logged_in(), "Application context ready");
        Ok(Self {
            config,
            session,
            router,
            client,
            apis,
        })
    }

    /// Builds the context from the user's config file, the session files and
    /// a reqwest transport.
    pub fn load(config_service: &ConfigService) -> Result<Self> {
        let config = config_service.get_config()?;
        let durable: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(ToworkPaths::session_file()?));
        let ephemeral: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(ToworkPaths::ephemeral_session_file()));
        let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(
            config.request_timeout_secs,
        ))?);
        Self::new(config, durable, ephemeral, transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn router(&self) -> &Arc<AppRouter> {
        &self.router
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn api(&self) -> &Apis {
        &self.apis
    }

    pub fn session_state(&self) -> SessionState {
        self.session.snapshot()
    }

    /// Current user id, or a `NotAuthenticated` error.
    pub fn require_user_id(&self) -> Result<i64> {
        self.session
            .snapshot()
            .user_id()
            .ok_or(ToworkError::NotAuthenticated)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_secs.max(1))
    }
}
