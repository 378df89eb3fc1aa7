use crate::client::ApiClient;
use crate::http::{FilePart, MultipartForm};
use serde_json::{Value, json};
use towork_core::Result;
use towork_core::milestone::{DeliverableUpload, Milestone, MilestonePayment, NewMilestone};

/// Milestone endpoints, spread over `/missions`, `/milestones`, `/api` and
/// `/payments`.
#[derive(Clone)]
pub struct MilestoneApi {
    client: ApiClient,
}

impl MilestoneApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn list(&self, path: String) -> Result<Vec<Milestone>> {
        Ok(self
            .client
            .fetch_optional(self.client.get(&path), "Impossible de charger les jalons")
            .await?
            .unwrap_or_default())
    }

    /// Milestones of a mission in their display order.
    pub async fn by_mission(&self, mission_id: i64) -> Result<Vec<Milestone>> {
        self.list(format!("/missions/{mission_id}/milestones/ordered"))
            .await
    }

    pub async fn list_for_client(&self, mission_id: i64) -> Result<Vec<Milestone>> {
        self.list(format!("/api/client/missions/{mission_id}/milestones"))
            .await
    }

    pub async fn list_for_freelancer(&self, mission_id: i64) -> Result<Vec<Milestone>> {
        self.list(format!("/api/freelancer/missions/{mission_id}/milestones"))
            .await
    }

    pub async fn create(&self, mission_id: i64, milestone: &NewMilestone) -> Result<Milestone> {
        let call = self
            .client
            .post(&format!("/missions/{mission_id}/milestones"))
            .json(milestone)?;
        self.client
            .fetch(call, "Impossible de créer le jalon")
            .await
    }

    /// Single-file upload; the endpoint may answer the bare milestone.
    pub async fn upload_deliverable(
        &self,
        milestone_id: i64,
        upload: DeliverableUpload,
    ) -> Result<Milestone> {
        let mut form = MultipartForm::new().with_file(FilePart::new(
            "file",
            upload.file_name,
            upload.bytes,
        ));
        if let Some(comment) = upload.comment {
            form = form.with_text("comment", comment);
        }
        let call = self
            .client
            .post(&format!("/api/milestones/{milestone_id}/deliverable"))
            .multipart(form);
        self.client
            .fetch_lenient(call, "Livrable envoyé.", "Impossible d'envoyer le livrable")
            .await
    }

    pub async fn deliver(&self, milestone_id: i64, notes: Option<&str>) -> Result<Milestone> {
        let call = self
            .client
            .post(&format!("/milestones/{milestone_id}/deliver"))
            .query_opt("completionNotes", notes.filter(|n| !n.trim().is_empty()));
        self.client
            .fetch(call, "Impossible de livrer le jalon")
            .await
    }

    /// Puts a milestone back to pending.
    pub async fn revert(&self, milestone_id: i64) -> Result<Milestone> {
        let call = self
            .client
            .put(&format!("/milestones/{milestone_id}/pending"))
            .empty_object();
        self.client
            .fetch(call, "Impossible de remettre le jalon en attente")
            .await
    }

    pub async fn accept(&self, milestone_id: i64, notes: Option<&str>) -> Result<Milestone> {
        let body = match notes.filter(|n| !n.trim().is_empty()) {
            Some(notes) => json!({ "approvalNotes": notes }),
            None => json!({}),
        };
        let call = self
            .client
            .post(&format!("/api/milestones/{milestone_id}/accept"))
            .json(&body)?;
        self.client
            .fetch_lenient(call, "Jalon accepté.", "Impossible d'accepter le jalon")
            .await
    }

    pub async fn reject(&self, milestone_id: i64, reason: Option<&str>) -> Result<Milestone> {
        let body = match reason.filter(|r| !r.trim().is_empty()) {
            Some(reason) => json!({ "reason": reason }),
            None => json!({}),
        };
        let call = self
            .client
            .post(&format!("/api/milestones/{milestone_id}/reject"))
            .json(&body)?;
        self.client
            .fetch_lenient(call, "Jalon rejeté.", "Impossible de rejeter le jalon")
            .await
    }

    pub async fn pay(&self, milestone_id: i64, payment: &MilestonePayment) -> Result<String> {
        let call = self
            .client
            .post(&format!("/payments/milestones/{milestone_id}/pay"))
            .json(payment)?;
        self.client.execute(call, "Paiement effectué").await
    }

    pub async fn top_up_client_wallet(&self, client_id: i64, amount: f64) -> Result<Option<Value>> {
        let call = self
            .client
            .post(&format!("/payments/wallets/client/{client_id}/topup"))
            .query("amount", amount);
        self.client
            .fetch_value(call, "Impossible de recharger le portefeuille")
            .await
    }
}
