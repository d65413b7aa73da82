use std::path::{Path, PathBuf};

use crate::{CourierConfig, Error, Result, env_subst::substitute_env};

/// File names probed by [`discover_and_load`], in priority order.
const CANDIDATES: &[&str] = &["courier.toml", "courier.yaml"];

/// Load a config file, substituting `${ENV_VAR}` placeholders first.
///
/// The format is chosen by extension: `.toml` or `.yaml`/`.yml`.
pub fn load_config(path: &Path) -> Result<CourierConfig> {
    let raw = std::fs::read_to_string(path)?;
    let raw = substitute_env(&raw);

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(toml::from_str(&raw)?),
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(&raw)?),
        _ => Err(Error::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Find a config file in `dir` and load it, falling back to defaults
/// when none exists.
pub fn discover_and_load(dir: &Path) -> Result<CourierConfig> {
    for name in CANDIDATES {
        let candidate: PathBuf = dir.join(name);
        if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "loading config");
            return load_config(&candidate);
        }
    }
    tracing::info!("no config file found, using defaults");
    Ok(CourierConfig::default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courier.toml");
        std::fs::write(&path, "[sessions]\nmax_history = 7\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.sessions.max_history, 7);
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courier.yaml");
        std::fs::write(&path, "skills:\n  directory: ./my-skills\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.skills.directory, "./my-skills");
    }

    #[test]
    fn substitutes_env_in_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courier.toml");
        // Deliberately unset variable stays a placeholder.
        std::fs::write(
            &path,
            "[skills]\ndirectory = \"${COURIER_UNSET_SKILLS_DIR}\"\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.skills.directory, "${COURIER_UNSET_SKILLS_DIR}");
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = discover_and_load(dir.path()).unwrap();
        assert_eq!(cfg.sessions.max_history, 50);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courier.ini");
        std::fs::write(&path, "x=1").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat { .. })
        ));
    }
}
