use std::collections::HashSet;

use async_trait::async_trait;

use crate::{
    catalog::IntentCatalog,
    intent::Intent,
    traits::IntentClassifier,
};

/// Name of the intent used when nothing else matches.
pub const FALLBACK_INTENT: &str = "chat";

/// Deterministic token-overlap classifier.
///
/// Scores each catalog entry by how many message tokens appear in its
/// name, description and examples. No model, no network; good enough
/// to route unambiguous phrasings and cheap enough to run everywhere.
pub struct LexicalClassifier {
    catalog: IntentCatalog,
}

impl LexicalClassifier {
    pub fn new(catalog: IntentCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    fn score(message_tokens: &HashSet<String>, vocab: &HashSet<String>) -> usize {
        message_tokens.iter().filter(|t| vocab.contains(*t)).count()
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl IntentClassifier for LexicalClassifier {
    async fn classify(&self, message: &str) -> anyhow::Result<Intent> {
        let message_tokens = tokenize(message);

        let mut best: Option<(&crate::catalog::IntentDef, usize)> = None;
        for def in self.catalog.defs() {
            let mut vocab = tokenize(&def.description);
            vocab.extend(tokenize(&def.name));
            for example in &def.examples {
                vocab.extend(tokenize(example));
            }
            let score = Self::score(&message_tokens, &vocab);
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((def, score));
            }
        }

        let (def, score) = match best {
            Some(hit) => hit,
            None => {
                let fallback = self
                    .catalog
                    .find(FALLBACK_INTENT)
                    .ok_or_else(|| anyhow::anyhow!("intent catalog has no fallback intent"))?;
                (fallback, 0)
            }
        };

        let denom = message_tokens.len().max(1) as f32;
        let confidence = (score as f32 / denom).min(1.0);

        tracing::debug!(intent = %def.name, confidence, "classified message");
        Ok(Intent {
            name: def.name.clone(),
            description: def.description.clone(),
            capability: def.capability.clone(),
            entities: def.entities.clone(),
            confidence,
        })
    }
}
