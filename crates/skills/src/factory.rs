use std::{collections::HashMap, sync::Arc};

use crate::{
    kinds::{CommandSkill, HttpSkill, TemplateSkill},
    manifest::SkillManifest,
    skill::Skill,
};

type Constructor = fn(&SkillManifest) -> anyhow::Result<Arc<dyn Skill>>;

/// Explicitly-registered lookup table from manifest `kind` to a typed
/// skill constructor.
///
/// This is the plugin host boundary: units name a kind, the factory
/// resolves it to a known construction, and unknown kinds fail the
/// individual unit without touching the rest of the load.
pub struct SkillFactory {
    constructors: HashMap<String, Constructor>,
}

impl Default for SkillFactory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillFactory {
    /// Empty table, for hosts that want full control over the kinds.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Table pre-populated with the built-in kinds.
    pub fn builtin() -> Self {
        let mut factory = Self::empty();
        factory.register("command", |m| {
            Ok(Arc::new(CommandSkill::from_manifest(m)?) as Arc<dyn Skill>)
        });
        factory.register("http", |m| {
            Ok(Arc::new(HttpSkill::from_manifest(m)?) as Arc<dyn Skill>)
        });
        factory.register("template", |m| {
            Ok(Arc::new(TemplateSkill::from_manifest(m)?) as Arc<dyn Skill>)
        });
        factory
    }

    pub fn register(&mut self, kind: &str, constructor: Constructor) {
        self.constructors.insert(kind.to_string(), constructor);
    }

    /// Build the skill a manifest describes.
    pub fn build(&self, manifest: &SkillManifest) -> anyhow::Result<Arc<dyn Skill>> {
        let constructor = self
            .constructors
            .get(&manifest.kind)
            .ok_or_else(|| anyhow::anyhow!("unknown skill kind '{}'", manifest.kind))?;
        constructor(manifest)
    }

    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<_> = self.constructors.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_present() {
        let factory = SkillFactory::builtin();
        assert_eq!(factory.kinds(), vec!["command", "http", "template"]);
    }

    #[test]
    fn builds_known_kind() {
        let factory = SkillFactory::builtin();
        let manifest = SkillManifest::parse(
            "name = \"hi\"\ndescription = \"x\"\nkind = \"template\"\n[template]\nreply = \"hey\"\n",
        )
        .unwrap();
        let skill = factory.build(&manifest).unwrap();
        assert_eq!(skill.name(), "hi");
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let factory = SkillFactory::builtin();
        let manifest =
            SkillManifest::parse("name = \"hi\"\ndescription = \"x\"\nkind = \"wasm\"\n").unwrap();
        let err = factory.build(&manifest).unwrap_err();
        assert!(err.to_string().contains("unknown skill kind 'wasm'"));
    }
}
