use crate::client::ApiClient;
use crate::http::ApiRequest;
use towork_core::Result;
use towork_core::auth::{LoginRequest, RegisterKind, RegisterRequest, Session};

/// `/auth/*` endpoints.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a session. A rejected login surfaces the
    /// backend message unchanged.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
        let call = self.client.post("/auth/login").json(request)?;
        self.client.fetch(call, "Identifiants invalides").await
    }

    /// Creates an account; the caller stays logged out.
    ///
    /// # Returns
    ///
    /// The backend's confirmation message.
    pub async fn register(&self, kind: RegisterKind, request: RegisterRequest) -> Result<String> {
        let call = self.register_call(kind, request)?;
        self.client.execute(call, "Inscription réussie").await
    }

    /// Creates an account on behalf of someone else.
    ///
    /// # Returns
    ///
    /// The created account when the backend echoes it back.
    pub async fn register_account(
        &self,
        kind: RegisterKind,
        request: RegisterRequest,
    ) -> Result<Option<Session>> {
        let call = self.register_call(kind, request)?;
        let data = self
            .client
            .fetch_value(call, "Création impossible")
            .await?;
        Ok(data.and_then(|value| serde_json::from_value(value).ok()))
    }

    fn register_call(&self, kind: RegisterKind, request: RegisterRequest) -> Result<ApiRequest> {
        let body = request.into_body(kind);
        self.client
            .post(&format!("/auth/register/{}", kind.path_segment()))
            .json(&body)
    }
}
