use crate::client::ApiClient;
use towork_core::Result;
use towork_core::feedback::{Feedback, FeedbackAggregate, FeedbackSummary, NewFeedback};

#[derive(Clone)]
pub struct FeedbackApi {
    client: ApiClient,
}

impl FeedbackApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, mission_id: i64, feedback: &NewFeedback) -> Result<Feedback> {
        let call = self
            .client
            .post(&format!("/missions/{mission_id}/feedback"))
            .json(feedback)?;
        self.client
            .fetch(call, "Impossible d'enregistrer l'avis")
            .await
    }

    /// The viewer's own feedback on a mission, if already given.
    pub async fn mine(&self, mission_id: i64) -> Result<Option<Feedback>> {
        let call = self
            .client
            .get(&format!("/missions/{mission_id}/feedbacks/mine"));
        self.client
            .fetch_optional(call, "Impossible de charger votre avis")
            .await
    }

    pub async fn user_summary(&self, user_id: i64) -> Result<FeedbackSummary> {
        let call = self
            .client
            .get(&format!("/users/{user_id}/feedbacks/summary"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les avis")
            .await?
            .unwrap_or_default())
    }

    pub async fn freelancer_feedbacks(&self, freelancer_id: i64) -> Result<FeedbackAggregate> {
        let call = self
            .client
            .get(&format!("/freelances/{freelancer_id}/feedbacks"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les avis")
            .await?
            .unwrap_or_default())
    }
}
