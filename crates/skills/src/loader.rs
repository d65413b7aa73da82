use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{factory::SkillFactory, manifest::SkillManifest, skill::Skill};

/// Well-known unit file name inside a skill subdirectory.
const SUBDIR_UNIT: &str = "skill.toml";

/// Discovers and loads skills from a directory.
///
/// A broken unit never aborts a load: it is logged, skipped, and the
/// loader continues with the rest.
pub struct SkillLoader {
    directory: PathBuf,
    factory: SkillFactory,
    skills: HashMap<String, Arc<dyn Skill>>,
}

impl SkillLoader {
    pub fn new(directory: PathBuf, factory: SkillFactory) -> Self {
        Self {
            directory,
            factory,
            skills: HashMap::new(),
        }
    }

    /// Discover loadable units: `<dir>/*.toml` plus `<dir>/<sub>/skill.toml`,
    /// one level deep.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut units = Vec::new();
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(e) => e,
            Err(_) => return units,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "toml") {
                units.push(path);
            } else if path.is_dir() {
                let unit = path.join(SUBDIR_UNIT);
                if unit.is_file() {
                    units.push(unit);
                }
            }
        }

        units.sort();
        units
    }

    fn load_unit(&self, path: &Path) -> anyhow::Result<Arc<dyn Skill>> {
        let content = std::fs::read_to_string(path)?;
        let manifest = SkillManifest::parse(&content)?;
        self.factory.build(&manifest)
    }

    /// Load every discovered unit, skipping broken ones. Returns the
    /// number of skills successfully loaded in this pass.
    pub fn load_all(&mut self) -> usize {
        let units = self.discover();
        tracing::info!(count = units.len(), dir = %self.directory.display(), "discovered skill unit(s)");

        let mut loaded = 0;
        for path in units {
            match self.load_unit(&path) {
                Ok(skill) => {
                    tracing::info!(name = skill.name(), path = %path.display(), "loaded skill");
                    self.skills.insert(skill.name().to_string(), skill);
                    loaded += 1;
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "skipping unloadable skill unit");
                },
            }
        }

        tracing::info!(loaded, "skill load complete");
        loaded
    }

    /// Re-scan and replace a single named skill in place.
    ///
    /// Other loaded skills are untouched. When the unit can no longer
    /// be found or loaded, the previous instance stays registered and
    /// `false` is returned — reload never removes.
    pub fn reload(&mut self, name: &str) -> bool {
        for path in self.discover() {
            if let Ok(skill) = self.load_unit(&path)
                && skill.name() == name
            {
                tracing::info!(%name, path = %path.display(), "reloaded skill");
                self.skills.insert(name.to_string(), skill);
                return true;
            }
        }
        tracing::warn!(%name, "reload found no loadable unit; keeping previous instance");
        false
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.skills.get(name).cloned()
    }

    /// All loaded skills, for registration elsewhere.
    pub fn get_all(&self) -> Vec<Arc<dyn Skill>> {
        self.skills.values().cloned().collect()
    }

    /// Name/description pairs, sorted by name.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .skills
            .values()
            .map(|s| (s.name().to_string(), s.description().to_string()))
            .collect();
        entries.sort();
        entries
    }
}
