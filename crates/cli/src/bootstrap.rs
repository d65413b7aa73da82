//! Wires config into a running dispatcher: built-in capabilities,
//! skills, intent catalog, session store.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use anyhow::Context as _;

use {
    courier_chat::{
        Dispatcher, IntentCatalog, LexicalClassifier, RegexExtractor, TemplateGenerator,
    },
    courier_config::CourierConfig,
    courier_sessions::SessionStore,
    courier_skills::{SKILL_PREFIX, SkillCapability, SkillFactory, SkillLoader},
    courier_tools::{
        CapabilityRegistry,
        respond::RespondCapability,
        system::{ExecCapability, GlobCapability, ReadFileCapability, WriteFileCapability},
        web::{WebFetchCapability, WebSearchCapability},
    },
};

/// Everything a command needs after startup.
pub struct Runtime {
    pub dispatcher: Arc<Dispatcher>,
    pub skills: SkillLoader,
}

fn register_builtins(registry: &mut CapabilityRegistry, config: &CourierConfig) {
    if config.tools.system.enabled {
        registry.register(Box::new(ExecCapability::new(
            config.tools.system.allowed_commands.clone(),
        )));
        registry.register(Box::new(ReadFileCapability));
        registry.register(Box::new(WriteFileCapability));
        registry.register(Box::new(GlobCapability));
    }
    if config.tools.web.enabled {
        let timeout = config.tools.web.timeout_secs;
        let agent = config.tools.web.user_agent.clone();
        registry.register(Box::new(WebFetchCapability::new(timeout, agent.clone())));
        registry.register(Box::new(WebSearchCapability::new(timeout, agent)));
    }
    registry.register(Box::new(RespondCapability));
}

/// Build the full runtime from config.
///
/// Order matters: built-ins register first, then skills load and both
/// register as capabilities and extend the intent catalog, so the
/// classifier can route to them.
pub fn build_runtime(config: &CourierConfig) -> anyhow::Result<Runtime> {
    let mut registry = CapabilityRegistry::new();
    register_builtins(&mut registry, config);

    let mut catalog = match &config.intents_path {
        Some(path) => IntentCatalog::load(Path::new(path))
            .with_context(|| format!("loading intent catalog from {path}"))?,
        None => IntentCatalog::builtin(),
    };

    let mut skills = SkillLoader::new(
        PathBuf::from(&config.skills.directory),
        SkillFactory::builtin(),
    );
    if config.skills.enabled {
        let loaded = skills.load_all();
        tracing::info!(loaded, "skills ready");
        for skill in skills.get_all() {
            catalog.add_skill_intent(
                skill.name(),
                skill.description(),
                &format!("{SKILL_PREFIX}{}", skill.name()),
                skill.entities().to_vec(),
                skill.examples().to_vec(),
            );
            registry.register(Box::new(SkillCapability::new(skill)));
        }
    }

    let sessions = SessionStore::new(
        PathBuf::from(&config.sessions.storage_path),
        config.sessions.max_history,
    );

    let dispatcher = Dispatcher::new(
        Arc::new(LexicalClassifier::new(catalog)),
        Arc::new(RegexExtractor::new()),
        Arc::new(TemplateGenerator::new()),
        Arc::new(RwLock::new(registry)),
        Arc::new(sessions),
    );

    Ok(Runtime {
        dispatcher: Arc::new(dispatcher),
        skills,
    })
}
