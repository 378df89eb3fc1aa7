use crate::client::ApiClient;
use towork_core::Result;
use towork_core::ai::SummaryResponse;
use towork_core::envelope::{ListPayload, PageRequest};
use towork_core::mission::{
    FreelancerMatch, FreelancerMissionWithMilestones, Mission, MissionPayload, MissionStatus,
};

const LOAD_FAILED: &str = "Impossible de récupérer les missions";

/// `/missions` endpoints.
#[derive(Clone)]
pub struct MissionApi {
    client: ApiClient,
}

impl MissionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, payload: &MissionPayload) -> Result<Mission> {
        let call = self.client.post("/missions").json(payload)?;
        self.client
            .fetch(call, "Impossible de créer la mission")
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Mission>> {
        let payload: ListPayload<Mission> =
            self.client.fetch(self.client.get("/missions"), LOAD_FAILED).await?;
        Ok(payload.into_vec())
    }

    /// Paged and sorted listing, e.g. `sort = "createdAt,DESC"`.
    pub async fn list(&self, page: PageRequest, sort: &str) -> Result<Vec<Mission>> {
        let call = self
            .client
            .get("/missions")
            .queries(page.to_query())
            .query("sort", sort);
        let payload: ListPayload<Mission> = self.client.fetch(call, LOAD_FAILED).await?;
        Ok(payload.into_vec())
    }

    pub async fn get(&self, id: i64) -> Result<Mission> {
        let call = self.client.get(&format!("/missions/{id}"));
        self.client.fetch(call, "Mission introuvable").await
    }

    /// Missions of the logged-in client.
    pub async fn mine(&self) -> Result<Vec<Mission>> {
        let payload: ListPayload<Mission> = self
            .client
            .fetch(self.client.get("/missions/me"), LOAD_FAILED)
            .await?;
        Ok(payload.into_vec())
    }

    pub async fn update(&self, id: i64, payload: &MissionPayload) -> Result<Mission> {
        let call = self.client.put(&format!("/missions/{id}")).json(payload)?;
        self.client
            .fetch(call, "Impossible de mettre à jour la mission")
            .await
    }

    pub async fn update_status(&self, id: i64, status: &MissionStatus) -> Result<Mission> {
        let call = self
            .client
            .put(&format!("/missions/{id}/status"))
            .query("status", status.as_str())
            .empty_object();
        self.client
            .fetch(call, "Impossible de changer le statut")
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<String> {
        let call = self.client.delete(&format!("/missions/{id}"));
        self.client.execute(call, "Mission supprimée").await
    }

    /// AI-ranked freelancers for a mission.
    pub async fn recommendations(&self, id: i64, limit: Option<u32>) -> Result<Vec<FreelancerMatch>> {
        let call = self
            .client
            .get(&format!("/missions/{id}/recommendations"))
            .query_opt("limit", limit);
        Ok(self
            .client
            .fetch_optional(call, "Recommandations indisponibles")
            .await?
            .unwrap_or_default())
    }

    pub async fn summary(&self, id: i64, language: Option<&str>) -> Result<SummaryResponse> {
        let call = self
            .client
            .get(&format!("/missions/{id}/summary"))
            .query_opt("language", language);
        self.client.fetch(call, "Résumé indisponible").await
    }

    /// Missions the logged-in freelancer works on, with their milestones.
    pub async fn freelancer_missions(&self) -> Result<Vec<FreelancerMissionWithMilestones>> {
        Ok(self
            .client
            .fetch_optional(self.client.get("/freelancer/missions"), LOAD_FAILED)
            .await?
            .unwrap_or_default())
    }

    /// Freelancer hands in the final delivery.
    pub async fn submit_final(&self, id: i64) -> Result<Option<Mission>> {
        let call = self
            .client
            .post(&format!("/missions/{id}/submit-final"))
            .empty_object();
        self.client
            .fetch_optional(call, "Impossible de soumettre la livraison finale")
            .await
    }

    /// Client closes a mission pending closure.
    pub async fn close(&self, id: i64) -> Result<Option<Mission>> {
        let call = self
            .client
            .post(&format!("/missions/{id}/close"))
            .empty_object();
        self.client
            .fetch_optional(call, "Impossible de clôturer la mission")
            .await
    }
}
