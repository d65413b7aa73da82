use {
    courier_common::now_ms,
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

use crate::message::{Message, Role};

/// Durable per-user conversation state: bounded message history plus
/// free-form context key/values.
///
/// In-memory sessions are transient and owned by the call that loaded
/// them; changes only persist through [`crate::SessionStore::save`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub context: serde_json::Map<String, Value>,
}

impl Session {
    /// Fresh empty session for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            user_id: user_id.into(),
            created_at_ms: now,
            updated_at_ms: now,
            history: Vec::new(),
            context: serde_json::Map::new(),
        }
    }

    /// Append a history entry and advance `updated_at_ms`.
    pub fn add_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        metadata: serde_json::Map<String, Value>,
    ) {
        let message = Message::new(role, content).with_metadata(metadata);
        self.updated_at_ms = self.updated_at_ms.max(message.created_at_ms);
        self.history.push(message);
    }

    /// Set a context key and advance `updated_at_ms`.
    pub fn update_context(&mut self, key: &str, value: Value) {
        self.context.insert(key.to_string(), value);
        self.updated_at_ms = self.updated_at_ms.max(now_ms());
    }

    /// The last `limit` history entries, oldest first.
    pub fn recent_history(&self, limit: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }

    /// Drop oldest entries so at most `max_history` remain.
    pub fn truncate_history(&mut self, max_history: usize) {
        let len = self.history.len();
        if len > max_history {
            self.history.drain(..len - max_history);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn add_message_advances_updated_at() {
        let mut session = Session::new("u1");
        let before = session.updated_at_ms;
        session.add_message(Role::User, "hello", serde_json::Map::new());
        assert!(session.updated_at_ms >= before);
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn update_context_sets_key() {
        let mut session = Session::new("u1");
        session.update_context("last_intent", json!("chat"));
        assert_eq!(session.context["last_intent"], "chat");
    }

    #[test]
    fn truncate_drops_oldest_first() {
        let mut session = Session::new("u1");
        for i in 0..5 {
            session.add_message(Role::User, format!("m{i}"), serde_json::Map::new());
        }
        session.truncate_history(3);

        let contents: Vec<_> = session.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn truncate_noop_when_under_limit() {
        let mut session = Session::new("u1");
        session.add_message(Role::User, "only", serde_json::Map::new());
        session.truncate_history(10);
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn recent_history_returns_tail() {
        let mut session = Session::new("u1");
        for i in 0..4 {
            session.add_message(Role::User, format!("m{i}"), serde_json::Map::new());
        }
        let recent = session.recent_history(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "m2");
    }
}
