use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use {
    serde_json::{Value, json},
    tracing::{debug, error, info},
};

use {
    courier_sessions::{Role, SessionStore},
    courier_tools::{CapabilityRegistry, ExecutionContext, Params},
};

use crate::traits::{EntityExtractor, IntentClassifier, ResponseGenerator};

/// Drives one inbound message through the full pipeline:
/// classify, extract, execute, render, persist.
///
/// [`Dispatcher::handle_message`] is infallible by contract — every
/// internal failure becomes a polite reply, because a messaging
/// connector has nobody to propagate an `Err` to.
pub struct Dispatcher {
    classifier: Arc<dyn IntentClassifier>,
    extractor: Arc<dyn EntityExtractor>,
    generator: Arc<dyn ResponseGenerator>,
    registry: Arc<RwLock<CapabilityRegistry>>,
    sessions: Arc<SessionStore>,
    // Serializes turns per user so concurrent messages from the same
    // user cannot lose each other's load-modify-save cycle.
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        extractor: Arc<dyn EntityExtractor>,
        generator: Arc<dyn ResponseGenerator>,
        registry: Arc<RwLock<CapabilityRegistry>>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            classifier,
            extractor,
            generator,
            registry,
            sessions,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<RwLock<CapabilityRegistry>> {
        &self.registry
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Handle one inbound message and return the reply text.
    ///
    /// Never fails: errors are logged, turned into an apology reply,
    /// and recorded in the session on a best-effort basis.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> String {
        let lock = self.user_lock(user_id);
        let _turn = lock.lock().await;

        match self.run(user_id, message).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(%user_id, %e, "message handling failed");
                let reply = format!("Sorry, I encountered an error: {e}");
                self.record_failure(user_id, message, &reply).await;
                reply
            },
        }
    }

    async fn run(&self, user_id: &str, message: &str) -> anyhow::Result<String> {
        let mut session = self.sessions.load(user_id).await?;
        session.add_message(Role::User, message, serde_json::Map::new());

        let intent = self.classifier.classify(message).await?;
        debug!(%user_id, intent = %intent.name, confidence = intent.confidence, "classified");

        let entities = self.extractor.extract(message, &intent.entities);

        let capability = {
            let registry = self
                .registry
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            registry.get(&intent.capability)
        };

        let Some(capability) = capability else {
            let reply = format!("Capability not found: {}", intent.capability);
            let mut metadata = serde_json::Map::new();
            metadata.insert("intent".into(), json!(intent.name));
            metadata.insert("error".into(), json!("capability_not_found"));
            session.add_message(Role::Assistant, &reply, metadata);
            self.sessions.save(&mut session).await?;
            return Ok(reply);
        };

        let context = ExecutionContext::new(user_id, message)
            .with_metadata("intent", json!(intent.name))
            .with_metadata("confidence", json!(intent.confidence));

        let params: Params = entities.clone();
        let result = capability.execute(&params, &context).await;
        info!(
            %user_id,
            intent = %intent.name,
            capability = %intent.capability,
            success = result.success,
            "executed capability"
        );

        // Merged view of the turn for the generator. Later sources
        // override earlier keys: message, then outcome, then entities,
        // then result metadata.
        let mut turn = serde_json::Map::new();
        turn.insert("message".into(), json!(message));
        turn.insert("output".into(), json!(result.output));
        if let Some(err) = &result.error {
            turn.insert("error".into(), json!(err));
        }
        for (name, value) in &entities {
            turn.insert(name.clone(), json!(value));
        }
        for (key, value) in &result.metadata {
            turn.insert(key.clone(), value.clone());
        }

        let reply = self.generator.generate(&intent.name, &turn, result.success).await?;

        let mut metadata = serde_json::Map::new();
        metadata.insert("intent".into(), json!(intent.name));
        metadata.insert("capability".into(), json!(intent.capability));
        metadata.insert("success".into(), json!(result.success));
        session.add_message(Role::Assistant, &reply, metadata);
        session.update_context("last_intent", json!(intent.name));
        session.update_context("last_capability", json!(intent.capability));

        self.sessions.save(&mut session).await?;
        Ok(reply)
    }

    /// Best-effort: persist the failed turn so the history shows it.
    async fn record_failure(&self, user_id: &str, message: &str, reply: &str) {
        let attempt = async {
            let mut session = self.sessions.load(user_id).await?;
            session.add_message(Role::User, message, serde_json::Map::new());
            let mut metadata = serde_json::Map::new();
            metadata.insert("error".into(), Value::Bool(true));
            session.add_message(Role::Assistant, reply, metadata);
            self.sessions.save(&mut session).await
        };
        if let Err(e) = attempt.await {
            error!(%user_id, %e, "failed to persist error turn");
        }
    }
}
