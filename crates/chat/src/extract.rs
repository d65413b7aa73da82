use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::traits::EntityExtractor;

/// Compile a fixed pattern; a bad one is a programmer error.
fn compiled(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid entity pattern {pattern:?}: {e}"),
    }
}

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| compiled(r"(?i)\b(?:run|execute|exec)\s+(.+)"));

static FILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| compiled(r"(?:~?/[\w./-]+|\b[\w-]+\.[A-Za-z0-9]{1,8}\b)"));

static CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| compiled(r#"(?:"([^"]+)"|'([^']+)')"#));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| compiled(r"https?://\S+"));

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| compiled(r"\b[\w-]+(?:\.[\w-]+)+(?:/\S*)?"));

static QUERY_LEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compiled(r"(?i)^\s*(?:search(?:\s+for)?|look\s+up|find(?:\s+me)?|google)\s+")
});

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| compiled(r"(?:\b(?:in|for|at)\s+)((?:[A-Z][\w'-]*)(?:\s+[A-Z][\w'-]*)*)"));

static EXPRESSION_RE: LazyLock<Regex> = LazyLock::new(|| compiled(r"[\d][\d\s+\-*/()^.%]*"));

static GLOB_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| compiled(r"\S*[*?]\S*"));

/// Regex-heuristic entity extractor.
///
/// Pattern-matches the handful of entity shapes the built-in
/// capabilities need. A known name it cannot find stays an empty entry
/// so the generator and skills can prompt for it instead of reading a
/// missing key.
#[derive(Debug, Default)]
pub struct RegexExtractor;

impl RegexExtractor {
    pub fn new() -> Self {
        Self
    }

    fn command(message: &str) -> String {
        match COMMAND_RE.captures(message) {
            Some(caps) => caps[1].trim().to_string(),
            None => message.trim().to_string(),
        }
    }

    fn file_path(message: &str) -> String {
        if let Some(m) = FILE_PATH_RE.find(message) {
            return m.as_str().to_string();
        }
        // "the file called README" — take the word after the last keyword.
        let mut candidate = None;
        let words: Vec<&str> = message.split_whitespace().collect();
        for pair in words.windows(2) {
            if matches!(pair[0].to_lowercase().as_str(), "file" | "to" | "called" | "named") {
                candidate = Some(pair[1]);
            }
        }
        candidate
            .or_else(|| words.last().copied())
            .unwrap_or_default()
            .to_string()
    }

    fn content(message: &str) -> String {
        CONTENT_RE
            .captures(message)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn url(message: &str) -> String {
        if let Some(m) = URL_RE.find(message) {
            return m.as_str().trim_end_matches(['.', ',']).to_string();
        }
        // Bare domains get a scheme so reqwest can parse them.
        DOMAIN_RE
            .find(message)
            .map(|m| format!("https://{}", m.as_str()))
            .unwrap_or_default()
    }

    fn query(message: &str) -> String {
        QUERY_LEAD_RE.replace(message, "").trim().to_string()
    }

    fn location(message: &str) -> String {
        LOCATION_RE
            .captures(message)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default()
    }

    fn expression(message: &str) -> String {
        EXPRESSION_RE
            .find(message)
            .map(|m| m.as_str().trim().to_string())
            .filter(|e| e.chars().any(|c| "+-*/^%".contains(c)))
            .unwrap_or_default()
    }

    fn pattern(message: &str) -> String {
        GLOB_PATTERN_RE
            .find(message)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

impl EntityExtractor for RegexExtractor {
    fn extract(&self, message: &str, wanted: &[String]) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for name in wanted {
            let value = match name.as_str() {
                "command" => Self::command(message),
                "file_path" => Self::file_path(message),
                "content" => Self::content(message),
                "url" => Self::url(message),
                "query" => Self::query(message),
                "location" | "city" => Self::location(message),
                "expression" => Self::expression(message),
                "pattern" => Self::pattern(message),
                // Names with no extraction heuristic emit no entry.
                _ => continue,
            };
            out.insert(name.clone(), value);
        }
        out
    }
}
