use serde::Deserialize;

/// A skill manifest, parsed from a TOML unit file.
///
/// Exactly one kind-specific table must match the declared `kind`; the
/// factory rejects manifests whose table is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillManifest {
    /// Skill name — lowercase, digits, hyphens and underscores, 1-64 chars.
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    /// Which factory constructor builds this skill.
    pub kind: String,
    #[serde(default)]
    pub command: Option<CommandSpec>,
    #[serde(default)]
    pub http: Option<HttpSpec>,
    #[serde(default)]
    pub template: Option<TemplateSpec>,
}

/// `kind = "command"`: run a shell command template.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSpec {
    /// Command line with `{entity}` placeholders.
    pub run: String,
}

/// `kind = "http"`: GET a URL template and return the body.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSpec {
    /// URL with `{entity}` placeholders.
    pub url: String,
    /// Optional JSON pointer applied to a JSON response body.
    #[serde(default)]
    pub json_pointer: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

/// `kind = "template"`: canned response filled from entities.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSpec {
    /// Response text with `{entity}` and `{message}` placeholders.
    pub reply: String,
}

/// Validate a skill name: non-empty, at most 64 chars, lowercase ASCII
/// alphanumerics plus `-` and `_`, no leading/trailing separator.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        && !name.starts_with(['-', '_'])
        && !name.ends_with(['-', '_'])
}

impl SkillManifest {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        if !validate_name(&manifest.name) {
            anyhow::bail!(
                "invalid skill name '{}': must be 1-64 lowercase alphanumeric/hyphen/underscore chars",
                manifest.name
            );
        }
        Ok(manifest)
    }
}
