use {async_trait::async_trait, serde_json::Value};

use crate::traits::ResponseGenerator;

const READ_TRUNCATE: usize = 2000;
const FETCH_TRUNCATE: usize = 1000;

/// Template-based reply renderer.
///
/// Picks a fixed template per intent and fills it from the turn
/// context. Keeps replies predictable; a model-backed generator can
/// replace it behind [`ResponseGenerator`].
#[derive(Debug, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn field<'a>(context: &'a serde_json::Map<String, Value>, key: &str) -> &'a str {
    context.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn truncated(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n... (truncated)", &text[..end])
}

#[async_trait]
impl ResponseGenerator for TemplateGenerator {
    async fn generate(
        &self,
        intent: &str,
        context: &serde_json::Map<String, Value>,
        success: bool,
    ) -> anyhow::Result<String> {
        if !success {
            let error = context
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("something went wrong");
            return Ok(format!("Sorry, I encountered an error: {error}"));
        }

        let output = field(context, "output");
        let reply = match intent {
            "execute_command" => {
                let command = field(context, "command");
                format!("I executed `{command}`. Output:\n```\n{output}\n```")
            }
            "read_file" => truncated(output, READ_TRUNCATE),
            "write_file" => {
                let file_path = field(context, "file_path");
                format!("Successfully wrote to {file_path}")
            }
            "find_files" => {
                if output.is_empty() {
                    "No matching files found.".to_string()
                } else {
                    format!("Found:\n{output}")
                }
            }
            "web_fetch" => truncated(output, FETCH_TRUNCATE),
            "web_search" => {
                if output.is_empty() {
                    "No results found.".to_string()
                } else {
                    output.to_string()
                }
            }
            "chat" => {
                if output.is_empty() {
                    "I'm here. Ask me to run a command, read or write a file, \
                     fetch a page, or search the web."
                        .to_string()
                } else {
                    output.to_string()
                }
            }
            _ => {
                if output.is_empty() {
                    "I processed your request.".to_string()
                } else {
                    output.to_string()
                }
            }
        };
        Ok(reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> serde_json::Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[tokio::test]
    async fn command_template_embeds_command_and_output() {
        let reply = TemplateGenerator::new()
            .generate(
                "execute_command",
                &ctx(&[("command", "ls"), ("output", "a.txt\nb.txt")]),
                true,
            )
            .await
            .unwrap();
        assert!(reply.contains("`ls`"));
        assert!(reply.contains("a.txt"));
    }

    #[tokio::test]
    async fn failure_uses_error_template() {
        let reply = TemplateGenerator::new()
            .generate("read_file", &ctx(&[("error", "File not found: x")]), false)
            .await
            .unwrap();
        assert_eq!(reply, "Sorry, I encountered an error: File not found: x");
    }

    #[tokio::test]
    async fn long_file_content_is_truncated() {
        let long = "x".repeat(5000);
        let reply = TemplateGenerator::new()
            .generate("read_file", &ctx(&[("output", &long)]), true)
            .await
            .unwrap();
        assert!(reply.len() < 2100);
        assert!(reply.ends_with("(truncated)"));
    }

    #[tokio::test]
    async fn unknown_intent_echoes_output() {
        let reply = TemplateGenerator::new()
            .generate("weather", &ctx(&[("output", "Sunny, 21C")]), true)
            .await
            .unwrap();
        assert_eq!(reply, "Sunny, 21C");
    }

    #[tokio::test]
    async fn chat_with_no_output_gets_canned_reply() {
        let reply = TemplateGenerator::new()
            .generate("chat", &ctx(&[("output", "")]), true)
            .await
            .unwrap();
        assert!(reply.contains("run a command"));
    }
}
