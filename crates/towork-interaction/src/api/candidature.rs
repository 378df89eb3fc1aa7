use crate::client::ApiClient;
use towork_core::Result;
use towork_core::candidature::{
    Candidature, CandidatureMessage, CandidatureMessageRequest, CandidatureStatus,
    CreateCandidatureRequest,
};

/// `/candidatures` endpoints.
#[derive(Clone)]
pub struct CandidatureApi {
    client: ApiClient,
}

impl CandidatureApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreateCandidatureRequest) -> Result<Candidature> {
        let call = self.client.post("/candidatures").json(request)?;
        self.client
            .fetch(call, "Impossible d'envoyer la candidature")
            .await
    }

    pub async fn list_by_mission(&self, mission_id: i64) -> Result<Vec<Candidature>> {
        let call = self
            .client
            .get(&format!("/candidatures/mission/{mission_id}"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les candidatures")
            .await?
            .unwrap_or_default())
    }

    pub async fn list_by_freelancer(&self, freelancer_id: i64) -> Result<Vec<Candidature>> {
        let call = self
            .client
            .get(&format!("/candidatures/freelancer/{freelancer_id}"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger vos candidatures")
            .await?
            .unwrap_or_default())
    }

    pub async fn messages(&self, candidature_id: i64) -> Result<Vec<CandidatureMessage>> {
        let call = self
            .client
            .get(&format!("/candidatures/{candidature_id}/messages"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les messages")
            .await?
            .unwrap_or_default())
    }

    pub async fn send_message(
        &self,
        candidature_id: i64,
        message: &CandidatureMessageRequest,
    ) -> Result<CandidatureMessage> {
        let call = self
            .client
            .post(&format!("/candidatures/{candidature_id}/messages"))
            .json(message)?;
        self.client
            .fetch(call, "Impossible d'envoyer le message")
            .await
    }

    /// Accepts or rejects; `client_message` is sent only when non-blank.
    pub async fn update_status(
        &self,
        id: i64,
        status: &CandidatureStatus,
        client_message: Option<&str>,
    ) -> Result<Candidature> {
        let call = self
            .client
            .put(&format!("/candidatures/{id}/status"))
            .query("status", status.as_str())
            .query_opt(
                "clientMessage",
                client_message.filter(|message| !message.trim().is_empty()),
            )
            .empty_object();
        self.client
            .fetch(call, "Impossible de mettre à jour la candidature")
            .await
    }
}
