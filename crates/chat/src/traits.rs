use std::collections::HashMap;

use {async_trait::async_trait, serde_json::Value};

use crate::intent::Intent;

/// Maps a raw message to the best-matching [`Intent`].
///
/// The default is [`crate::LexicalClassifier`]; model-backed
/// classifiers implement the same trait.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, message: &str) -> anyhow::Result<Intent>;
}

/// Pulls named entities out of a message.
///
/// `wanted` lists the entity names the chosen intent needs. A known
/// name always gets an entry, empty string when nothing matched; names
/// the extractor has no heuristic for are silently skipped.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, message: &str, wanted: &[String]) -> HashMap<String, String>;
}

/// Renders the user-facing reply from an execution outcome.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// `context` carries the merged view of the turn: the original
    /// message, extracted entities, capability output and metadata.
    async fn generate(
        &self,
        intent: &str,
        context: &serde_json::Map<String, Value>,
        success: bool,
    ) -> anyhow::Result<String>;
}
