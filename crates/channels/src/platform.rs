use std::sync::Arc;

use {async_trait::async_trait, futures::future::join_all, tracing::warn};

/// A connector to one messaging surface (console, Telegram, ...).
///
/// `start` runs the connector's receive loop until `stop` is called or
/// the input source closes. Connectors own their outbound path too via
/// `send_message`.
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Stable connector name used in logs and config, e.g. `console`.
    fn platform_name(&self) -> &str;

    /// Run the receive loop. Returns when the platform shuts down.
    async fn start(&self) -> anyhow::Result<()>;

    async fn stop(&self) -> anyhow::Result<()>;

    /// Deliver a message to a chat on this platform.
    async fn send_message(&self, chat_id: &str, text: &str) -> anyhow::Result<()>;

    fn is_running(&self) -> bool;
}

/// Run every enabled platform concurrently until all have exited.
///
/// A platform that fails to start (or crashes) is logged and dropped;
/// the rest keep running.
pub async fn run_platforms(platforms: Vec<Arc<dyn MessagingPlatform>>) {
    if platforms.is_empty() {
        warn!("no messaging platforms enabled");
        return;
    }

    let handles: Vec<_> = platforms
        .into_iter()
        .map(|platform| {
            tokio::spawn(async move {
                let name = platform.platform_name().to_string();
                tracing::info!(platform = %name, "starting platform");
                if let Err(e) = platform.start().await {
                    warn!(platform = %name, %e, "platform exited with error");
                }
            })
        })
        .collect();

    for result in join_all(handles).await {
        if let Err(e) = result {
            warn!(%e, "platform task panicked");
        }
    }
}
