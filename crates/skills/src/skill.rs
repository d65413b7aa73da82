use std::collections::HashMap;

use {async_trait::async_trait, serde_json::Value};

/// Result of a skill execution.
///
/// Mirrors the capability result shape; the adapter translates between
/// the two at the registry boundary.
#[derive(Debug, Clone, Default)]
pub struct SkillOutput {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub metadata: serde_json::Map<String, Value>,
}

impl SkillOutput {
    #[must_use]
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// A plugin-origin capability: intent trigger examples, required
/// entities, and execution logic in one unit.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Unique skill name (without the `skill.` registry prefix).
    fn name(&self) -> &str;

    /// Description used for intent classification; specific and clear.
    fn description(&self) -> &str;

    /// Example messages that should trigger this skill.
    fn examples(&self) -> &[String];

    /// Entity names this skill needs extracted.
    fn entities(&self) -> &[String];

    /// Run the skill. `Err` is reserved for unexpected failures; an
    /// expected failure (bad input, upstream error) is a `SkillOutput`
    /// with `success == false`.
    async fn execute(
        &self,
        entities: &HashMap<String, String>,
        user_id: &str,
        message: &str,
    ) -> anyhow::Result<SkillOutput>;

    /// First required entity missing from `entities`, if any.
    fn missing_entity(&self, entities: &HashMap<String, String>) -> Option<&str> {
        self.entities()
            .iter()
            .find(|name| entities.get(name.as_str()).is_none_or(|v| v.is_empty()))
            .map(String::as_str)
    }
}

impl std::fmt::Debug for dyn Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Needy {
        entities: Vec<String>,
    }

    #[async_trait]
    impl Skill for Needy {
        fn name(&self) -> &str {
            "needy"
        }

        fn description(&self) -> &str {
            "needs entities"
        }

        fn examples(&self) -> &[String] {
            &[]
        }

        fn entities(&self) -> &[String] {
            &self.entities
        }

        async fn execute(
            &self,
            _entities: &HashMap<String, String>,
            _user_id: &str,
            _message: &str,
        ) -> anyhow::Result<SkillOutput> {
            Ok(SkillOutput::ok("done"))
        }
    }

    #[test]
    fn missing_entity_reports_first_gap() {
        let skill = Needy {
            entities: vec!["location".into(), "date".into()],
        };
        let mut entities = HashMap::new();
        entities.insert("location".to_string(), "London".to_string());
        assert_eq!(skill.missing_entity(&entities), Some("date"));

        entities.insert("date".to_string(), String::new());
        assert_eq!(skill.missing_entity(&entities), Some("date"));

        entities.insert("date".to_string(), "today".to_string());
        assert_eq!(skill.missing_entity(&entities), None);
    }
}
