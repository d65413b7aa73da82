use std::{collections::HashMap, sync::Arc};

use crate::capability::Capability;

/// Registry of capabilities available to the dispatch pipeline.
///
/// Capabilities are stored as `Arc<dyn Capability>` so lookups hand out
/// cheap clones that outlive a registry write lock. Registration is
/// last-writer-wins: re-registering a name silently replaces the prior
/// entry (logged, since it is usually a configuration mistake).
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Arc<dyn Capability>>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: HashMap::new(),
        }
    }

    pub fn register(&mut self, capability: Box<dyn Capability>) {
        let name = capability.name().to_string();
        if self.capabilities.contains_key(&name) {
            tracing::warn!(%name, "overwriting previously registered capability");
        }
        tracing::info!(%name, "registered capability");
        self.capabilities.insert(name, Arc::from(capability));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.capabilities.get(name).cloned()
    }

    /// Name/description pairs for introspection, sorted by name.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .capabilities
            .values()
            .map(|c| (c.name().to_string(), c.description().to_string()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
