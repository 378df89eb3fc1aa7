//! The `{success, message, data}` wrapper every backend endpoint returns,
//! plus the paging shapes list endpoints use.

use crate::error::{Result, ToworkError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Unwraps the payload.
    ///
    /// `success = false` surfaces the backend message as the error. A
    /// successful envelope without data is an error too, since the caller
    /// asked for a value.
    ///
    /// # Arguments
    ///
    /// * `fallback` - Message used when the backend sent a blank one
    pub fn into_data(self, fallback: &str) -> Result<T> {
        let message = self.message_or(fallback);
        if !self.success {
            return Err(ToworkError::api(None, message));
        }
        self.data.ok_or_else(|| ToworkError::api(None, message))
    }

    /// Like [`into_data`](Self::into_data) but a missing payload is fine.
    pub fn into_optional(self, fallback: &str) -> Result<Option<T>> {
        if !self.success {
            return Err(ToworkError::api(None, self.message_or(fallback)));
        }
        Ok(self.data)
    }

    fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Normalizes endpoints that answer either an envelope or a bare DTO.
    ///
    /// Objects carrying a `success` key are read as envelopes. Anything else
    /// is taken as the payload itself, wrapped as a success carrying
    /// `fallback_message`.
    pub fn from_lenient(value: Value, fallback_message: &str) -> Result<Self> {
        let is_envelope = value
            .as_object()
            .is_some_and(|object| object.contains_key("success"));

        if is_envelope {
            return Ok(serde_json::from_value(value)?);
        }

        let data = serde_json::from_value(value)?;
        Ok(Self::ok(data, fallback_message))
    }
}

/// Spring-style page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size: 0,
            number: 0,
        }
    }
}

/// `page` / `size` query parameters, forwarded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// Some list endpoints return a bare array, others a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Page(page) => page.content,
        }
    }
}

impl<T> From<ListPayload<T>> for Vec<T> {
    fn from(payload: ListPayload<T>) -> Self {
        payload.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[test]
    fn failure_surfaces_backend_message() {
        let envelope: Envelope<Item> =
            serde_json::from_value(json!({"success": false, "message": "Mission introuvable"}))
                .unwrap();
        let err = envelope.into_data("fallback").unwrap_err();
        assert_eq!(err.user_message("x"), "Mission introuvable");
    }

    #[test]
    fn missing_message_defaults_to_empty() {
        let envelope: Envelope<Item> =
            serde_json::from_value(json!({"success": true, "data": {"id": 3}})).unwrap();
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.into_data("x").unwrap(), Item { id: 3 });
    }

    #[test]
    fn success_without_data_is_an_error_for_into_data() {
        let envelope: Envelope<Item> =
            serde_json::from_value(json!({"success": true, "message": ""})).unwrap();
        assert!(envelope.clone().into_optional("x").unwrap().is_none());
        let err = envelope.into_data("Réponse vide").unwrap_err();
        assert_eq!(err.user_message("?"), "Réponse vide");
    }

    #[test]
    fn lenient_wraps_bare_dto() {
        let envelope: Envelope<Item> =
            Envelope::from_lenient(json!({"id": 9}), "Jalon accepté.").unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message, "Jalon accepté.");
        assert_eq!(envelope.data, Some(Item { id: 9 }));
    }

    #[test]
    fn lenient_keeps_real_envelope() {
        let envelope: Envelope<Item> = Envelope::from_lenient(
            json!({"success": false, "message": "Refusé", "data": null}),
            "ignored",
        )
        .unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message, "Refusé");
    }

    #[test]
    fn list_payload_accepts_both_shapes() {
        let list: ListPayload<Item> = serde_json::from_value(json!([{"id": 1}])).unwrap();
        assert_eq!(list.into_vec().len(), 1);

        let page: ListPayload<Item> = serde_json::from_value(
            json!({"content": [{"id": 1}, {"id": 2}], "totalElements": 2, "totalPages": 1, "size": 20, "number": 0}),
        )
        .unwrap();
        assert_eq!(page.into_vec().len(), 2);
    }
}
