use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use {
    async_trait::async_trait,
    tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};

use courier_chat::Dispatcher;

use crate::platform::MessagingPlatform;

const PROMPT: &[u8] = b"> ";

/// Interactive stdin/stdout connector. One fixed user id, one line per
/// turn. `exit` or EOF ends the loop.
pub struct ConsolePlatform {
    dispatcher: Arc<Dispatcher>,
    user_id: String,
    running: AtomicBool,
}

impl ConsolePlatform {
    pub fn new(dispatcher: Arc<Dispatcher>, user_id: impl Into<String>) -> Self {
        Self {
            dispatcher,
            user_id: user_id.into(),
            running: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MessagingPlatform for ConsolePlatform {
    fn platform_name(&self) -> &str {
        "console"
    }

    async fn start(&self) -> anyhow::Result<()> {
        self.running.store(true, Ordering::SeqCst);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        stdout.write_all(PROMPT).await?;
        stdout.flush().await?;

        while self.running.load(Ordering::SeqCst) {
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let message = line.trim();
            if message.is_empty() {
                stdout.write_all(PROMPT).await?;
                stdout.flush().await?;
                continue;
            }
            if message == "exit" || message == "quit" {
                break;
            }

            let reply = self.dispatcher.handle_message(&self.user_id, message).await;
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.write_all(PROMPT).await?;
            stdout.flush().await?;
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> anyhow::Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("[{chat_id}] {text}\n").as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {
        super::*,
        courier_chat::{IntentCatalog, LexicalClassifier, RegexExtractor, TemplateGenerator},
        courier_sessions::SessionStore,
        courier_tools::CapabilityRegistry,
        std::sync::RwLock,
    };

    fn console() -> (ConsolePlatform, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(LexicalClassifier::new(IntentCatalog::builtin())),
            Arc::new(RegexExtractor::new()),
            Arc::new(TemplateGenerator::new()),
            Arc::new(RwLock::new(CapabilityRegistry::new())),
            Arc::new(SessionStore::new(dir.path().to_path_buf(), 50)),
        ));
        (ConsolePlatform::new(dispatcher, "console"), dir)
    }

    #[tokio::test]
    async fn starts_not_running() {
        let (platform, _dir) = console();
        assert_eq!(platform.platform_name(), "console");
        assert!(!platform.is_running());
    }

    #[tokio::test]
    async fn stop_clears_running_flag() {
        let (platform, _dir) = console();
        platform.running.store(true, Ordering::SeqCst);
        platform.stop().await.unwrap();
        assert!(!platform.is_running());
    }

    #[tokio::test]
    async fn send_message_writes_to_stdout() {
        let (platform, _dir) = console();
        platform.send_message("chat-1", "hello").await.unwrap();
    }
}
