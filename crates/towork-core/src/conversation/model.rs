use crate::auth::Role;
use crate::candidature::MessageAuthor;
use crate::error::Result;
use crate::lenient::{pick_bool, pick_f64, pick_i64, pick_str};
use crate::validation::{Validate, check, not_blank};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of `/conversations/mine`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: i64,
    pub mission_title: Option<String>,
    pub counterpart_name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<String>,
    pub last_author_name: Option<String>,
}

impl ConversationSummary {
    /// Rows without a usable id are dropped.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let id = pick_i64(raw, &["id", "conversationId", "conversation.id"])?;
        Some(Self {
            id,
            mission_title: pick_str(raw, &["missionTitle", "mission.title", "missionName"]),
            counterpart_name: pick_str(
                raw,
                &[
                    "counterpartName",
                    "otherUserName",
                    "freelancerName",
                    "clientName",
                    "receiverName",
                ],
            ),
            last_message: pick_str(raw, &["lastMessage", "lastMessageContent", "preview"]),
            last_message_at: pick_str(raw, &["lastMessageAt", "updatedAt", "lastMessageDate"]),
            last_author_name: pick_str(
                raw,
                &[
                    "lastAuthorName",
                    "lastSenderName",
                    "lastMessageAuthorName",
                    "lastMessageSenderName",
                    "senderName",
                ],
            ),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub id: Option<i64>,
    pub author: Option<MessageAuthor>,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: Option<String>,
    pub is_flagged: Option<bool>,
    pub flag_score: Option<f64>,
    pub flag_label: Option<String>,
    pub flag_reason: Option<String>,
}

impl ConversationMessage {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            id: pick_i64(raw, &["id", "messageId"]),
            author: pick_str(raw, &["author", "senderRole", "senderType"])
                .and_then(|a| MessageAuthor::parse(&a)),
            author_id: pick_i64(raw, &["authorId", "senderId", "sender.id"]),
            author_name: pick_str(raw, &["authorName", "senderName", "sender.name"]),
            content: pick_str(raw, &["content", "message"]).unwrap_or_default(),
            created_at: pick_str(raw, &["createdAt", "sentAt", "timestamp"]),
            is_flagged: pick_bool(raw, &["isFlagged", "flagged"]),
            flag_score: pick_f64(raw, &["flagScore"]),
            flag_label: pick_str(raw, &["flagLabel"]),
            flag_reason: pick_str(raw, &["flagReason"]),
        }
    }

    /// True when the viewer wrote this message, by id or else by role.
    pub fn is_mine(&self, user_id: Option<i64>, role: Option<&Role>) -> bool {
        if let (Some(author_id), Some(user_id)) = (self.author_id, user_id) {
            return author_id == user_id;
        }
        match (self.author, role.and_then(Role::author_tag)) {
            (Some(author), Some(tag)) => author.as_str() == tag,
            _ => false,
        }
    }

    /// Backend name, else `Client` / `Freelancer`, else empty.
    pub fn display_author(&self) -> String {
        self.author_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| self.author.map(|a| a.fallback_name().to_string()))
            .unwrap_or_default()
    }
}

/// Body of `POST /conversations/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OutgoingMessage {
    #[validate(
        custom(function = "not_blank"),
        length(min = 2, message = "Au moins 2 caractères requis.")
    )]
    pub content: String,
}

impl OutgoingMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// Entry of the older `/messages` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectMessage {
    pub id: Option<i64>,
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub sender: Option<UserRef>,
    pub receiver: Option<UserRef>,
    pub subject: Option<String>,
    pub content: String,
    pub is_read: Option<bool>,
    pub message_type: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRef {
    pub id: Option<i64>,
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDirectMessage {
    pub sender: UserRef,
    pub receiver: UserRef,
    pub subject: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub message_type: Option<String>,
}

impl NewDirectMessage {
    pub fn new(sender_id: i64, receiver_id: i64, content: impl Into<String>) -> Self {
        Self {
            sender: UserRef { id: Some(sender_id) },
            receiver: UserRef {
                id: Some(receiver_id),
            },
            subject: None,
            content: content.into(),
            message_type: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_reads_aliases_and_drops_rows_without_id() {
        let row = json!({"conversationId": 4, "mission": {"title": "App"}, "otherUserName": "Eve", "preview": "Salut"});
        let summary = ConversationSummary::from_value(&row).unwrap();
        assert_eq!(summary.id, 4);
        assert_eq!(summary.mission_title.as_deref(), Some("App"));
        assert_eq!(summary.counterpart_name.as_deref(), Some("Eve"));
        assert_eq!(summary.last_message.as_deref(), Some("Salut"));
        assert!(ConversationSummary::from_value(&json!({"preview": "x"})).is_none());
    }

    #[test]
    fn ownership_by_id_then_role() {
        let by_id = ConversationMessage::from_value(&json!({"senderId": 9, "message": "hi"}));
        assert_eq!(by_id.content, "hi");
        assert!(by_id.is_mine(Some(9), None));
        assert!(!by_id.is_mine(Some(8), Some(&Role::Client)));

        let by_role = ConversationMessage::from_value(&json!({"senderRole": "CLIENT", "content": "ok"}));
        assert!(by_role.is_mine(Some(1), Some(&Role::Client)));
        assert!(!by_role.is_mine(Some(1), Some(&Role::Freelancer)));
    }

    #[test]
    fn author_name_falls_back_to_role() {
        let msg = ConversationMessage::from_value(&json!({"author": "FREELANCER", "content": "x"}));
        assert_eq!(msg.display_author(), "Freelancer");
        let msg = ConversationMessage::from_value(&json!({"content": "x"}));
        assert_eq!(msg.display_author(), "");
    }

    #[test]
    fn outgoing_requires_two_chars() {
        assert!(OutgoingMessage::new(" a ").validate().is_err());
        assert!(OutgoingMessage::new("ok").validate().is_ok());
    }
}
