use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use fd_lock::RwLock;

use crate::{Result, error::Error, session::Session};

/// File-backed session store: one JSON record per user, full replace
/// on save, bounded history.
pub struct SessionStore {
    base_dir: PathBuf,
    max_history: usize,
}

impl SessionStore {
    pub fn new(base_dir: PathBuf, max_history: usize) -> Self {
        Self {
            base_dir,
            max_history,
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Sanitize a user id for use as a file name.
    fn user_to_filename(user_id: &str) -> String {
        user_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn path_for(&self, user_id: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.json", Self::user_to_filename(user_id)))
    }

    /// Load the persisted session for a user, or a fresh empty one.
    ///
    /// A corrupt record is discarded in favor of a fresh session —
    /// persistence problems must never block the pipeline.
    pub async fn load(&self, user_id: &str) -> Result<Session> {
        let path = self.path_for(user_id);
        let user_id = user_id.to_string();
        let max_history = self.max_history;

        tokio::task::spawn_blocking(move || -> Result<Session> {
            if !path.exists() {
                return Ok(Session::new(&user_id));
            }
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str::<Session>(&raw) {
                Ok(mut session) => {
                    // Records written under a larger limit get trimmed on load.
                    session.truncate_history(max_history);
                    Ok(session)
                },
                Err(e) => {
                    tracing::warn!(%user_id, %e, "discarding corrupt session record");
                    Ok(Session::new(&user_id))
                },
            }
        })
        .await?
    }

    /// Persist a session, replacing the prior record entirely.
    ///
    /// History is trimmed to the last `max_history` entries before the
    /// write, mutating the caller's copy so memory and disk agree.
    pub async fn save(&self, session: &mut Session) -> Result<()> {
        session.truncate_history(self.max_history);

        let path = self.path_for(&session.user_id);
        let record = serde_json::to_string_pretty(&session)?;

        tokio::task::spawn_blocking(move || -> Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).write(true).open(&path)?;
            let mut lock = RwLock::new(file);
            let mut guard = lock
                .write()
                .map_err(|e| Error::lock_failed(e.to_string()))?;
            // Truncate only once the exclusive lock is held, so no
            // locked reader can observe an empty or partial record.
            guard.set_len(0)?;
            guard.write_all(record.as_bytes())?;
            writeln!(*guard)?;
            Ok(())
        })
        .await??;

        Ok(())
    }

    /// Delete a user's persisted record. Missing records are a no-op.
    pub async fn reset(&self, user_id: &str) -> Result<()> {
        let path = self.path_for(user_id);

        tokio::task::spawn_blocking(move || -> Result<()> {
            if path.exists() {
                fs::remove_file(&path)?;
            }
            Ok(())
        })
        .await??;

        Ok(())
    }

    /// List user ids with a persisted session (sanitized form).
    pub fn list_users(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.base_dir) else {
            return vec![];
        };
        let mut users: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.strip_suffix(".json").map(str::to_string)
            })
            .collect();
        users.sort();
        users
    }
}
