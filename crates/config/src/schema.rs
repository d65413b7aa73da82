use serde::{Deserialize, Serialize};

/// Root configuration for the courier runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    pub sessions: SessionsConfig,
    pub skills: SkillsConfig,
    pub tools: ToolsConfig,
    pub platforms: PlatformsConfig,
    /// Path to the intent catalog JSON. When unset, the built-in
    /// catalog is used.
    pub intents_path: Option<String>,
}

/// Session storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub storage_path: String,
    /// Maximum number of history entries kept per session.
    pub max_history: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            storage_path: "./data/sessions".into(),
            max_history: 50,
        }
    }
}

/// Skill (plugin) loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    pub enabled: bool,
    pub directory: String,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: "./skills".into(),
        }
    }
}

/// Built-in capability toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub system: SystemTools,
    pub web: WebTools,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemTools {
    pub enabled: bool,
    /// When non-empty, only these command names may be executed.
    pub allowed_commands: Vec<String>,
}

impl Default for SystemTools {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebTools {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for WebTools {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 10,
            user_agent: "courier/0.3".into(),
        }
    }
}

/// Messaging platform connectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformsConfig {
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = CourierConfig::default();
        assert_eq!(cfg.sessions.max_history, 50);
        assert!(cfg.skills.enabled);
        assert!(cfg.platforms.console.enabled);
        assert!(cfg.tools.system.allowed_commands.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: CourierConfig = toml::from_str(
            r#"
            [sessions]
            max_history = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sessions.max_history, 3);
        assert_eq!(cfg.sessions.storage_path, "./data/sessions");
        assert!(cfg.tools.web.enabled);
    }
}
