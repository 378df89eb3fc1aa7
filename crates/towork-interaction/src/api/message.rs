use crate::client::ApiClient;
use serde_json::Value;
use towork_core::Result;
use towork_core::ai::SummaryResponse;
use towork_core::conversation::{
    ConversationMessage, ConversationSummary, DirectMessage, NewDirectMessage, OutgoingMessage,
};
use towork_core::lenient::list_items;

/// The older point-to-point `/messages` resource.
#[derive(Clone)]
pub struct MessageApi {
    client: ApiClient,
}

impl MessageApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn list(&self, call: crate::http::ApiRequest) -> Result<Vec<DirectMessage>> {
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les messages")
            .await?
            .unwrap_or_default())
    }

    pub async fn create(&self, message: &NewDirectMessage) -> Result<DirectMessage> {
        let call = self.client.post("/messages").json(message)?;
        self.client
            .fetch(call, "Impossible d'envoyer le message")
            .await
    }

    pub async fn by_sender(&self, sender_id: i64) -> Result<Vec<DirectMessage>> {
        self.list(self.client.get(&format!("/messages/sender/{sender_id}")))
            .await
    }

    pub async fn by_receiver(&self, receiver_id: i64) -> Result<Vec<DirectMessage>> {
        self.list(self.client.get(&format!("/messages/receiver/{receiver_id}")))
            .await
    }

    /// Messages exchanged between two users.
    pub async fn conversation(&self, sender_id: i64, receiver_id: i64) -> Result<Vec<DirectMessage>> {
        let call = self
            .client
            .get("/messages/conversation")
            .query("senderId", sender_id)
            .query("receiverId", receiver_id);
        self.list(call).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<DirectMessage> {
        let call = self
            .client
            .put(&format!("/messages/{id}/read"))
            .empty_object();
        self.client
            .fetch(call, "Impossible de marquer le message comme lu")
            .await
    }
}

/// Mission conversations. Rows are mapped leniently since the backend
/// varies its field names.
#[derive(Clone)]
pub struct ConversationApi {
    client: ApiClient,
}

impl ConversationApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Accepts a bare array or a page.
    pub async fn list_mine(&self) -> Result<Vec<ConversationSummary>> {
        let payload = self
            .client
            .fetch_value(
                self.client.get("/conversations/mine"),
                "Impossible de charger les conversations",
            )
            .await?
            .unwrap_or(Value::Null);
        Ok(list_items(&payload)
            .iter()
            .filter_map(ConversationSummary::from_value)
            .collect())
    }

    pub async fn messages(&self, conversation_id: i64) -> Result<Vec<ConversationMessage>> {
        let payload = self
            .client
            .fetch_value(
                self.client
                    .get(&format!("/conversations/{conversation_id}/messages")),
                "Impossible de charger les messages",
            )
            .await?
            .unwrap_or(Value::Null);
        Ok(list_items(&payload)
            .iter()
            .map(ConversationMessage::from_value)
            .collect())
    }

    pub async fn send(
        &self,
        conversation_id: i64,
        message: &OutgoingMessage,
    ) -> Result<Option<ConversationMessage>> {
        let call = self
            .client
            .post(&format!("/conversations/{conversation_id}/messages"))
            .json(message)?;
        let payload = self
            .client
            .fetch_value(call, "Impossible d'envoyer le message")
            .await?;
        Ok(payload
            .filter(|value| value.is_object())
            .map(|value| ConversationMessage::from_value(&value)))
    }

    pub async fn summary(
        &self,
        conversation_id: i64,
        language: &str,
    ) -> Result<Option<SummaryResponse>> {
        let call = self
            .client
            .get(&format!("/conversations/{conversation_id}/summary"))
            .query_opt("language", Some(language).filter(|l| !l.is_empty()));
        self.client
            .fetch_optional(call, "Résumé indisponible")
            .await
    }
}
