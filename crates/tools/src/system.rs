//! Built-in system capabilities: shell execution and file access.

use std::path::{Path, PathBuf};

use {async_trait::async_trait, serde_json::json, tokio::process::Command};

use crate::capability::{Capability, CapabilityResult, ExecutionContext, Params, require_params};

// ── system.exec ─────────────────────────────────────────────────────────────

/// Execute a shell command, optionally restricted to an allowlist of
/// command names.
pub struct ExecCapability {
    allowed_commands: Vec<String>,
}

impl ExecCapability {
    pub fn new(allowed_commands: Vec<String>) -> Self {
        Self { allowed_commands }
    }

    fn is_allowed(&self, command: &str) -> bool {
        if self.allowed_commands.is_empty() {
            return true;
        }
        let name = command.split_whitespace().next().unwrap_or("");
        self.allowed_commands.iter().any(|c| c == name)
    }
}

#[async_trait]
impl Capability for ExecCapability {
    fn name(&self) -> &str {
        "system.exec"
    }

    fn description(&self) -> &str {
        "Execute a shell command"
    }

    async fn execute(&self, params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        if let Err(fail) = require_params(params, &["command"]) {
            return fail;
        }
        let command = &params["command"];

        if !self.is_allowed(command) {
            let name = command.split_whitespace().next().unwrap_or("");
            return CapabilityResult::fail(format!("Command '{name}' not allowed"));
        }

        let output = match Command::new("sh").arg("-c").arg(command).output().await {
            Ok(out) => out,
            Err(e) => return CapabilityResult::fail(format!("Failed to execute command: {e}")),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);

        if output.status.success() {
            CapabilityResult::ok(stdout).with_metadata("exit_code", json!(exit_code))
        } else {
            CapabilityResult {
                success: false,
                output: stdout,
                error: Some(stderr),
                metadata: serde_json::Map::from_iter([("exit_code".into(), json!(exit_code))]),
            }
        }
    }
}

// ── system.read ─────────────────────────────────────────────────────────────

/// Read the contents of a file.
pub struct ReadFileCapability;

#[async_trait]
impl Capability for ReadFileCapability {
    fn name(&self) -> &str {
        "system.read"
    }

    fn description(&self) -> &str {
        "Read the contents of a file"
    }

    async fn execute(&self, params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        if let Err(fail) = require_params(params, &["file_path"]) {
            return fail;
        }
        let path = PathBuf::from(&params["file_path"]);

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let size = content.len();
                CapabilityResult::ok(content)
                    .with_metadata("file_size", json!(size))
                    .with_metadata("path", json!(path.display().to_string()))
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                CapabilityResult::fail(format!("File not found: {}", path.display()))
            },
            Err(e) => CapabilityResult::fail(format!("Failed to read file: {e}")),
        }
    }
}

// ── system.write ────────────────────────────────────────────────────────────

/// Write content to a file, creating parent directories as needed.
pub struct WriteFileCapability;

#[async_trait]
impl Capability for WriteFileCapability {
    fn name(&self) -> &str {
        "system.write"
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    async fn execute(&self, params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        if let Err(fail) = require_params(params, &["file_path", "content"]) {
            return fail;
        }
        let path = PathBuf::from(&params["file_path"]);
        let content = &params["content"];

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return CapabilityResult::fail(format!("Failed to write file: {e}"));
        }

        match tokio::fs::write(&path, content).await {
            Ok(()) => CapabilityResult::ok(format!(
                "Successfully wrote {} bytes to {}",
                content.len(),
                path.display()
            ))
            .with_metadata("bytes_written", json!(content.len()))
            .with_metadata("path", json!(path.display().to_string())),
            Err(e) => CapabilityResult::fail(format!("Failed to write file: {e}")),
        }
    }
}

// ── system.glob ─────────────────────────────────────────────────────────────

/// Find files whose names match a wildcard pattern.
pub struct GlobCapability;

/// Match a file name against a pattern where `*` matches any run of
/// characters and `?` exactly one. Anything fancier belongs in a
/// dedicated capability.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    fn inner(p: &[char], n: &[char]) -> bool {
        match (p.first(), n.first()) {
            (None, None) => true,
            (Some('*'), _) => inner(&p[1..], n) || (!n.is_empty() && inner(p, &n[1..])),
            (Some('?'), Some(_)) => inner(&p[1..], &n[1..]),
            (Some(pc), Some(nc)) if pc == nc => inner(&p[1..], &n[1..]),
            _ => false,
        }
    }
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    inner(&pattern, &name)
}

#[async_trait]
impl Capability for GlobCapability {
    fn name(&self) -> &str {
        "system.glob"
    }

    fn description(&self) -> &str {
        "Find files matching a pattern"
    }

    async fn execute(&self, params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        if let Err(fail) = require_params(params, &["pattern"]) {
            return fail;
        }
        let pattern = params["pattern"].clone();
        let base = params
            .get("base_path")
            .cloned()
            .unwrap_or_else(|| ".".into());

        let result = tokio::task::spawn_blocking(move || {
            let mut matches = Vec::new();
            for entry in walkdir::WalkDir::new(Path::new(&base))
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let name = entry.file_name().to_string_lossy();
                if wildcard_match(&pattern, &name) {
                    matches.push(entry.path().display().to_string());
                }
            }
            matches.sort();
            matches
        })
        .await;

        match result {
            Ok(matches) if matches.is_empty() => {
                CapabilityResult::ok("No files found matching pattern")
                    .with_metadata("count", json!(0))
            },
            Ok(matches) => {
                let count = matches.len();
                CapabilityResult::ok(matches.join("\n")).with_metadata("count", json!(count))
            },
            Err(e) => CapabilityResult::fail(format!("Failed to search files: {e}")),
        }
    }
}
