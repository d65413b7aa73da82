use {
    courier_common::now_ms,
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// Who authored a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in a session's history. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at_ms: now_ms(),
            metadata: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_role_lowercase() {
        let msg = Message::new(Role::Assistant, "hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
        // Empty metadata is omitted from the record.
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn deserializes_without_metadata() {
        let msg: Message = serde_json::from_str(
            r#"{"role":"user","content":"hello","created_at_ms":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(msg.role, Role::User);
        assert!(msg.metadata.is_empty());
    }
}
