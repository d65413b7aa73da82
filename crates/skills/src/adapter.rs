use std::sync::Arc;

use {
    async_trait::async_trait,
    courier_tools::{Capability, CapabilityResult, ExecutionContext, Params},
};

use crate::skill::Skill;

/// Namespace prefix distinguishing plugin-origin capabilities from
/// built-ins in the shared registry.
pub const SKILL_PREFIX: &str = "skill.";

/// Adapter exposing a [`Skill`] through the uniform capability
/// contract so it can live in the capability registry.
pub struct SkillCapability {
    skill: Arc<dyn Skill>,
    name: String,
}

impl SkillCapability {
    pub fn new(skill: Arc<dyn Skill>) -> Self {
        let name = format!("{SKILL_PREFIX}{}", skill.name());
        Self { skill, name }
    }
}

#[async_trait]
impl Capability for SkillCapability {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.skill.description()
    }

    async fn execute(&self, params: &Params, context: &ExecutionContext) -> CapabilityResult {
        // A skill failure must never propagate into the pipeline;
        // convert it to a failed result at this boundary.
        match self
            .skill
            .execute(params, &context.user_id, &context.message)
            .await
        {
            Ok(output) => CapabilityResult {
                success: output.success,
                output: output.output,
                error: output.error,
                metadata: output.metadata,
            },
            Err(e) => {
                tracing::error!(skill = self.skill.name(), %e, "skill execution failed");
                CapabilityResult::fail(format!("Skill execution failed: {e}"))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {
        super::*,
        crate::skill::SkillOutput,
        std::collections::HashMap,
    };

    struct Flaky {
        fail: bool,
    }

    #[async_trait]
    impl Skill for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn description(&self) -> &str {
            "sometimes explodes"
        }

        fn examples(&self) -> &[String] {
            &[]
        }

        fn entities(&self) -> &[String] {
            &[]
        }

        async fn execute(
            &self,
            _entities: &HashMap<String, String>,
            user_id: &str,
            message: &str,
        ) -> anyhow::Result<SkillOutput> {
            if self.fail {
                anyhow::bail!("upstream exploded");
            }
            Ok(SkillOutput::ok(format!("{user_id} said {message}")))
        }
    }

    #[tokio::test]
    async fn adapter_namespaces_the_name() {
        let cap = SkillCapability::new(Arc::new(Flaky { fail: false }));
        assert_eq!(cap.name(), "skill.flaky");
        assert_eq!(cap.description(), "sometimes explodes");
    }

    #[tokio::test]
    async fn adapter_passes_context_through() {
        let cap = SkillCapability::new(Arc::new(Flaky { fail: false }));
        let ctx = ExecutionContext::new("u9", "hello");
        let result = cap.execute(&Params::new(), &ctx).await;
        assert!(result.success);
        assert_eq!(result.output, "u9 said hello");
    }

    #[tokio::test]
    async fn adapter_converts_errors_to_failed_results() {
        let cap = SkillCapability::new(Arc::new(Flaky { fail: true }));
        let ctx = ExecutionContext::new("u9", "hello");
        let result = cap.execute(&Params::new(), &ctx).await;
        assert!(!result.success);
        assert_eq!(
            result.error.unwrap(),
            "Skill execution failed: upstream exploded"
        );
    }
}
