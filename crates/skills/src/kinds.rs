//! Built-in skill kinds: typed constructions for manifest-described
//! skills. Each kind owns its execution strategy; the manifest supplies
//! identity, examples, and entity requirements.

use std::{collections::HashMap, time::Duration};

use {anyhow::Context, async_trait::async_trait, serde_json::json};

use crate::{
    manifest::{CommandSpec, HttpSpec, SkillManifest, TemplateSpec},
    skill::{Skill, SkillOutput},
};

/// Fill `{placeholder}` slots in a template from the entity map, plus
/// the implicit `{message}` slot. Unknown placeholders are left as-is.
fn fill_template(template: &str, entities: &HashMap<String, String>, message: &str) -> String {
    let mut out = template.to_string();
    for (name, value) in entities {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out.replace("{message}", message)
}

// ── command ─────────────────────────────────────────────────────────────────

/// Runs a shell command template with entity substitution.
pub struct CommandSkill {
    manifest: SkillManifest,
    spec: CommandSpec,
}

impl CommandSkill {
    pub fn from_manifest(manifest: &SkillManifest) -> anyhow::Result<Self> {
        let spec = manifest
            .command
            .clone()
            .context("kind = \"command\" requires a [command] table")?;
        Ok(Self {
            manifest: manifest.clone(),
            spec,
        })
    }
}

#[async_trait]
impl Skill for CommandSkill {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }

    fn examples(&self) -> &[String] {
        &self.manifest.examples
    }

    fn entities(&self) -> &[String] {
        &self.manifest.entities
    }

    async fn execute(
        &self,
        entities: &HashMap<String, String>,
        _user_id: &str,
        message: &str,
    ) -> anyhow::Result<SkillOutput> {
        if let Some(missing) = self.missing_entity(entities) {
            return Ok(SkillOutput::fail(format!(
                "Missing required parameter: {missing}"
            )));
        }

        let command = fill_template(&self.spec.run, entities, message);
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if output.status.success() {
            let mut out = SkillOutput::ok(stdout);
            out.metadata
                .insert("exit_code".into(), json!(output.status.code().unwrap_or(0)));
            Ok(out)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            let mut out = SkillOutput::fail(if stderr.is_empty() {
                format!("command exited with {}", output.status)
            } else {
                stderr
            });
            out.output = stdout;
            Ok(out)
        }
    }
}

// ── http ────────────────────────────────────────────────────────────────────

/// Fetches a URL template; optionally narrows a JSON response with a
/// JSON pointer.
pub struct HttpSkill {
    manifest: SkillManifest,
    spec: HttpSpec,
}

impl HttpSkill {
    pub fn from_manifest(manifest: &SkillManifest) -> anyhow::Result<Self> {
        let spec = manifest
            .http
            .clone()
            .context("kind = \"http\" requires an [http] table")?;
        Ok(Self {
            manifest: manifest.clone(),
            spec,
        })
    }
}

#[async_trait]
impl Skill for HttpSkill {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }

    fn examples(&self) -> &[String] {
        &self.manifest.examples
    }

    fn entities(&self) -> &[String] {
        &self.manifest.entities
    }

    async fn execute(
        &self,
        entities: &HashMap<String, String>,
        _user_id: &str,
        message: &str,
    ) -> anyhow::Result<SkillOutput> {
        if let Some(missing) = self.missing_entity(entities) {
            return Ok(SkillOutput::fail(format!(
                "Missing required parameter: {missing}"
            )));
        }

        let url = fill_template(&self.spec.url, entities, message);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.spec.timeout_secs))
            .build()?;

        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(SkillOutput::fail(format!(
                "HTTP {} from {url}",
                response.status().as_u16()
            )));
        }

        let body = response.text().await?;
        let output = match &self.spec.json_pointer {
            Some(pointer) => {
                let value: serde_json::Value = serde_json::from_str(&body)
                    .with_context(|| format!("non-JSON response from {url}"))?;
                match value.pointer(pointer) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(v) => v.to_string(),
                    None => {
                        return Ok(SkillOutput::fail(format!(
                            "JSON pointer {pointer} matched nothing"
                        )));
                    },
                }
            },
            None => body,
        };

        let mut out = SkillOutput::ok(output.trim().to_string());
        out.metadata.insert("url".into(), json!(url));
        Ok(out)
    }
}

// ── template ────────────────────────────────────────────────────────────────

/// Canned reply filled from entities and the original message.
pub struct TemplateSkill {
    manifest: SkillManifest,
    spec: TemplateSpec,
}

impl TemplateSkill {
    pub fn from_manifest(manifest: &SkillManifest) -> anyhow::Result<Self> {
        let spec = manifest
            .template
            .clone()
            .context("kind = \"template\" requires a [template] table")?;
        Ok(Self {
            manifest: manifest.clone(),
            spec,
        })
    }
}

#[async_trait]
impl Skill for TemplateSkill {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }

    fn examples(&self) -> &[String] {
        &self.manifest.examples
    }

    fn entities(&self) -> &[String] {
        &self.manifest.entities
    }

    async fn execute(
        &self,
        entities: &HashMap<String, String>,
        _user_id: &str,
        message: &str,
    ) -> anyhow::Result<SkillOutput> {
        if let Some(missing) = self.missing_entity(entities) {
            return Ok(SkillOutput::fail(format!(
                "Missing required parameter: {missing}"
            )));
        }
        Ok(SkillOutput::ok(fill_template(
            &self.spec.reply,
            entities,
            message,
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::manifest::SkillManifest};

    fn entities(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fill_template_substitutes_known_slots() {
        let filled = fill_template(
            "weather for {location}: {message}",
            &entities(&[("location", "Paris")]),
            "tell me",
        );
        assert_eq!(filled, "weather for Paris: tell me");
    }

    #[test]
    fn fill_template_keeps_unknown_slots() {
        assert_eq!(
            fill_template("hi {nobody}", &HashMap::new(), "m"),
            "hi {nobody}"
        );
    }

    #[tokio::test]
    async fn command_skill_runs_and_captures_output() {
        let manifest = SkillManifest::parse(
            r#"
            name = "greeter"
            description = "Greets a person"
            entities = ["person"]
            kind = "command"

            [command]
            run = "echo hello {person}"
            "#,
        )
        .unwrap();
        let skill = CommandSkill::from_manifest(&manifest).unwrap();

        let out = skill
            .execute(&entities(&[("person", "ada")]), "u1", "greet ada")
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.output, "hello ada");
    }

    #[tokio::test]
    async fn command_skill_reports_missing_entity() {
        let manifest = SkillManifest::parse(
            "name = \"greeter\"\ndescription = \"x\"\nentities = [\"person\"]\nkind = \"command\"\n[command]\nrun = \"echo {person}\"\n",
        )
        .unwrap();
        let skill = CommandSkill::from_manifest(&manifest).unwrap();

        let out = skill.execute(&HashMap::new(), "u1", "greet").await.unwrap();
        assert!(!out.success);
        assert_eq!(out.error.unwrap(), "Missing required parameter: person");
    }

    #[tokio::test]
    async fn template_skill_fills_reply() {
        let manifest = SkillManifest::parse(
            "name = \"thanks\"\ndescription = \"x\"\nkind = \"template\"\n[template]\nreply = \"You said: {message}\"\n",
        )
        .unwrap();
        let skill = TemplateSkill::from_manifest(&manifest).unwrap();

        let out = skill
            .execute(&HashMap::new(), "u1", "thank you")
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.output, "You said: thank you");
    }

    #[tokio::test]
    async fn http_skill_fetches_and_applies_pointer() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/time")
            .with_status(200)
            .with_body(r#"{"now":{"iso":"2026-08-27T12:00:00Z"}}"#)
            .create_async()
            .await;

        let manifest = SkillManifest::parse(&format!(
            "name = \"clock\"\ndescription = \"x\"\nkind = \"http\"\n[http]\nurl = \"{}/api/time\"\njson_pointer = \"/now/iso\"\n",
            server.url()
        ))
        .unwrap();
        let skill = HttpSkill::from_manifest(&manifest).unwrap();

        let out = skill.execute(&HashMap::new(), "u1", "time?").await.unwrap();
        assert!(out.success);
        assert_eq!(out.output, "2026-08-27T12:00:00Z");
    }

    #[tokio::test]
    async fn http_skill_surfaces_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/down")
            .with_status(502)
            .create_async()
            .await;

        let manifest = SkillManifest::parse(&format!(
            "name = \"down\"\ndescription = \"x\"\nkind = \"http\"\n[http]\nurl = \"{}/down\"\n",
            server.url()
        ))
        .unwrap();
        let skill = HttpSkill::from_manifest(&manifest).unwrap();

        let out = skill.execute(&HashMap::new(), "u1", "check").await.unwrap();
        assert!(!out.success);
        assert!(out.error.unwrap().contains("502"));
    }

    #[test]
    fn command_skill_requires_its_table() {
        let manifest =
            SkillManifest::parse("name = \"x1\"\ndescription = \"x\"\nkind = \"command\"\n")
                .unwrap();
        assert!(CommandSkill::from_manifest(&manifest).is_err());
    }
}
