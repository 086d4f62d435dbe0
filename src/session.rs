//! Read-only access to the locally persisted user session.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The signed-in user as the login flow persisted it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    #[serde(rename = "type")]
    pub role: String,
    pub email: String,
}

/// Session collaborator: who is using the app right now. Implementations
/// are injected into the services so tests can substitute their own.
pub trait Session: Send + Sync {
    /// Returns the signed-in user, or `None` when no session exists.
    fn current_user(&self) -> Result<Option<StoredUser>>;
}

/// Session backed by a `user.json` file under the data directory, written
/// by the (external) login flow.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(data_dir: &str) -> Self {
        Self {
            path: Path::new(data_dir).join("user.json"),
        }
    }
}

impl Session for FileSession {
    fn current_user(&self) -> Result<Option<StoredUser>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read session: {}", self.path.display()))
            }
        };
        let user: StoredUser = serde_json::from_str(&raw)
            .with_context(|| format!("invalid session file: {}", self.path.display()))?;
        Ok(Some(user))
    }
}
