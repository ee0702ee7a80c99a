//! Assistant chat payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// User message.
    pub message: String,
    /// Conversation to continue. The backend opens a new one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Starts a new conversation with `message`.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    /// Continues the conversation `session_id`.
    #[inline]
    #[must_use]
    pub fn in_session<T: Into<String>>(mut self, session_id: T) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Transaction the assistant read out of a `tx amount=.. attempts=..`
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChatTransaction {
    /// Transaction amount.
    #[serde(default)]
    pub amount: f64,
    /// Attempts in the last ten minutes.
    #[serde(default = "default_attempts")]
    pub attempts_10min: u32,
}

/// Attempt count assumed when a message names none.
const fn default_attempts() -> u32 {
    1
}

/// Rule-based verdict on a [`ChatTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatVerdict {
    /// Score from 0 to 100.
    pub risk_score: u32,
    /// Suggested action, e.g. `"REVISAR"`.
    pub decision: String,
    /// Human-readable recommendation.
    pub advice: String,
}

/// Reply of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Conversation the reply belongs to; pass it back to continue.
    pub session_id: String,
    /// Assistant reply (markdown).
    pub reply: String,
    /// Parsed transaction, when the message described one.
    #[serde(default)]
    pub tx: Option<ChatTransaction>,
    /// Verdict on [`Self::tx`].
    #[serde(default)]
    pub result: Option<ChatVerdict>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_conversation_omits_session() {
        let body = serde_json::to_value(ChatRequest::new("hola")).unwrap();
        assert_eq!(body, json!({"message": "hola"}));

        let body = serde_json::to_value(ChatRequest::new("reset").in_session("s-1")).unwrap();
        assert_eq!(body, json!({"message": "reset", "session_id": "s-1"}));
    }

    #[test]
    fn plain_reply_has_no_verdict() {
        let response: ChatResponse =
            serde_json::from_value(json!({"session_id": "s-1", "reply": "Hello."})).unwrap();
        assert_eq!(response.reply, "Hello.");
        assert!(response.tx.is_none());
        assert!(response.result.is_none());
    }

    #[test]
    fn transaction_defaults_to_one_attempt() {
        let tx: ChatTransaction = serde_json::from_value(json!({"amount": 950.0})).unwrap();
        assert_eq!(tx.attempts_10min, 1);
    }
}
