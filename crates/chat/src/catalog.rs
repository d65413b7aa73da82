use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Context, Result};

/// One classifiable intent: what it means and which capability
/// handles it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDef {
    pub name: String,
    pub description: String,
    pub capability: String,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    intents: Vec<IntentDef>,
}

/// The candidate set the classifier ranks against.
///
/// Starts from a JSON file (or the built-in set) and grows as loaded
/// skills contribute their own intents.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    intents: Vec<IntentDef>,
}

impl IntentCatalog {
    /// Catalog covering the built-in capabilities.
    pub fn builtin() -> Self {
        let defs = [
            (
                "execute_command",
                "Execute a shell command on the system",
                "system.exec",
                &["command"][..],
                &["run ls -la", "execute df -h", "check disk space"][..],
            ),
            (
                "read_file",
                "Read the contents of a file",
                "system.read",
                &["file_path"],
                &["read config.yaml", "show me /etc/hosts", "open notes.txt"],
            ),
            (
                "write_file",
                "Write content to a file",
                "system.write",
                &["content", "file_path"],
                &["write 'hello world' to test.txt", "save this to notes.md"],
            ),
            (
                "find_files",
                "Find files matching a pattern",
                "system.glob",
                &["pattern"],
                &["find *.log files", "list all toml files"],
            ),
            (
                "web_fetch",
                "Fetch the content of a web page or URL",
                "web.fetch",
                &["url"],
                &["fetch https://example.com", "get that page for me"],
            ),
            (
                "web_search",
                "Search the web for information",
                "web.search",
                &["query"],
                &["search for rust tutorials", "look up tokio docs"],
            ),
            (
                "chat",
                "General conversation and small talk",
                "chat.respond",
                &[],
                &["hello there", "how are you", "thanks"],
            ),
        ];

        Self {
            intents: defs
                .into_iter()
                .map(|(name, description, capability, entities, examples)| IntentDef {
                    name: name.into(),
                    description: description.into(),
                    capability: capability.into(),
                    entities: entities.iter().map(|s| s.to_string()).collect(),
                    examples: examples.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Load intent definitions from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .context(format!("reading intent catalog {}", path.display()))?;
        let file: CatalogFile = serde_json::from_str(&raw)
            .context(format!("parsing intent catalog {}", path.display()))?;
        Ok(Self {
            intents: file.intents,
        })
    }

    /// Add a loaded skill as a classifiable intent.
    pub fn add_skill_intent(
        &mut self,
        name: &str,
        description: &str,
        capability: &str,
        entities: Vec<String>,
        examples: Vec<String>,
    ) {
        tracing::info!(%name, %capability, "added skill intent");
        self.intents.push(IntentDef {
            name: name.to_string(),
            description: description.to_string(),
            capability: capability.to_string(),
            entities,
            examples,
        });
    }

    pub fn defs(&self) -> &[IntentDef] {
        &self.intents
    }

    pub fn find(&self, name: &str) -> Option<&IntentDef> {
        self.intents.iter().find(|i| i.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_covers_core_capabilities() {
        let catalog = IntentCatalog::builtin();
        assert!(catalog.find("execute_command").is_some());
        assert!(catalog.find("chat").is_some());
        assert_eq!(catalog.find("web_fetch").unwrap().capability, "web.fetch");
    }

    #[test]
    fn load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intents.json");
        std::fs::write(
            &path,
            r#"{"intents":[{"name":"ping","description":"Ping","capability":"net.ping","entities":["host"]}]}"#,
        )
        .unwrap();

        let catalog = IntentCatalog::load(&path).unwrap();
        assert_eq!(catalog.defs().len(), 1);
        assert_eq!(catalog.find("ping").unwrap().entities, vec!["host"]);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let err = IntentCatalog::load(Path::new("/no/such/intents.json")).unwrap_err();
        assert!(err.to_string().contains("intents.json"));
    }

    #[test]
    fn skill_intents_are_appended() {
        let mut catalog = IntentCatalog::builtin();
        let before = catalog.defs().len();
        catalog.add_skill_intent(
            "weather",
            "Get current weather information",
            "skill.weather",
            vec!["location".into()],
            vec!["what's the weather in London".into()],
        );
        assert_eq!(catalog.defs().len(), before + 1);
        assert_eq!(catalog.find("weather").unwrap().capability, "skill.weather");
    }
}
