use async_trait::async_trait;

use crate::capability::{Capability, CapabilityResult, ExecutionContext, Params};

/// No-op capability backing conversational intents.
///
/// Produces an empty successful result so the response generator owns
/// the full reply text for chat turns.
pub struct RespondCapability;

#[async_trait]
impl Capability for RespondCapability {
    fn name(&self) -> &str {
        "chat.respond"
    }

    fn description(&self) -> &str {
        "Generate a conversational response"
    }

    async fn execute(&self, _params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        CapabilityResult::ok("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn respond_is_empty_success() {
        let cap = RespondCapability;
        let result = cap
            .execute(&Params::new(), &ExecutionContext::new("u", "hello"))
            .await;
        assert!(result.success);
        assert!(result.output.is_empty());
        assert!(result.error.is_none());
    }
}
