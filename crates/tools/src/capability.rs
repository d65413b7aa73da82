use std::collections::HashMap;

use {async_trait::async_trait, serde_json::Value};

/// Parameters extracted from the user message, keyed by entity name.
pub type Params = HashMap<String, String>;

/// Context passed by the pipeline into every capability invocation.
///
/// Capabilities receive a shared reference and must not mutate it.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub user_id: String,
    pub session_key: String,
    /// The raw inbound message.
    pub message: String,
    pub metadata: serde_json::Map<String, Value>,
}

impl ExecutionContext {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            session_key: user_id.clone(),
            user_id,
            message: message.into(),
            metadata: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// Outcome of a capability invocation.
///
/// `error` is set iff `success` is false; `output` may be empty on
/// failure. Errors travel as values, never as panics or `Err` — the
/// pipeline's outer boundary is a last resort, not the error channel.
#[derive(Debug, Clone, Default)]
pub struct CapabilityResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub metadata: serde_json::Map<String, Value>,
}

impl CapabilityResult {
    #[must_use]
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            metadata: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            metadata: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// An invocable unit the dispatch pipeline routes classified intents to.
///
/// Identity is the `name()`; the registry holds one capability per name.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Stable capability name, e.g. `system.exec` or `skill.weather`.
    fn name(&self) -> &str;

    /// One-line description for help surfaces and classification.
    fn description(&self) -> &str;

    async fn execute(&self, params: &Params, context: &ExecutionContext) -> CapabilityResult;
}

/// Check that every required parameter is present and non-empty.
///
/// Returns a failed result describing the first missing parameter, so
/// callers can `return` it directly.
pub fn require_params(params: &Params, required: &[&str]) -> Result<(), CapabilityResult> {
    for name in required {
        match params.get(*name) {
            Some(value) if !value.is_empty() => {},
            _ => {
                return Err(CapabilityResult::fail(format!(
                    "Missing required parameter: {name}"
                )));
            },
        }
    }
    Ok(())
}
