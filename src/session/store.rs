//! Issued sessions, keyed by opaque bearer token
//!
//! Sessions live in memory and, when a file is configured, are written
//! through to it on every change so a restart keeps users signed in. The file
//! holds one schema; older or unreadable files are ignored with a warning.
//!
//! Every change holds the map's write lock until the file is replaced, so
//! writers never share the temp file and the file always matches memory.
//! Expired sessions are pruned on each write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Session, SessionError};

const SCHEMA_VERSION: u32 = 1;

/// A session plus the gateway credential it was issued with
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredSession {
    pub session: Session,
    /// Forwarded to the gateway on calls made for this session
    pub gateway_token: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Deserialize)]
struct SessionFile {
    version: u32,
    sessions: HashMap<String, StoredSession>,
}

#[derive(Serialize)]
struct SessionSnapshot<'a> {
    version: u32,
    sessions: &'a HashMap<String, StoredSession>,
}

fn prune_expired(sessions: &mut HashMap<String, StoredSession>, now: DateTime<Utc>) {
    let before = sessions.len();
    sessions.retain(|_, s| !s.is_expired(now));
    let pruned = before - sessions.len();
    if pruned > 0 {
        tracing::debug!(pruned, "Pruned expired sessions");
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
    file: Option<PathBuf>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(file: Option<PathBuf>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            file,
            ttl,
        }
    }

    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(None, ttl)
    }

    /// Restore sessions from the configured file, dropping expired ones.
    /// Returns how many were restored.
    pub async fn load(&self) -> Result<usize, SessionError> {
        let Some(path) = &self.file else {
            return Ok(0);
        };
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(0);
        }

        let stored = match read_file(path).await {
            Ok(file) if file.version == SCHEMA_VERSION => file.sessions,
            Ok(file) => {
                tracing::warn!(
                    path = %path.display(),
                    version = file.version,
                    "Ignoring session file with unknown schema version"
                );
                return Ok(0);
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{:#}", e),
                    "Ignoring unreadable session file"
                );
                return Ok(0);
            }
        };

        let now = Utc::now();
        let live: HashMap<_, _> = stored
            .into_iter()
            .filter(|(_, s)| !s.is_expired(now))
            .collect();
        let count = live.len();

        *self.sessions.write().await = live;
        tracing::info!(count, "Restored sessions");
        Ok(count)
    }

    /// Record a new session and return its bearer token.
    pub async fn issue(
        &self,
        session: Session,
        gateway_token: Option<String>,
    ) -> Result<String, SessionError> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let stored = StoredSession {
            session,
            gateway_token,
            issued_at: now,
            expires_at: now + self.ttl,
        };

        tracing::debug!(role = ?stored.session.role(), "Issuing session");
        let mut sessions = self.sessions.write().await;
        prune_expired(&mut sessions, now);
        sessions.insert(token.clone(), stored);

        // A token the file does not hold would be lost on restart.
        if let Err(e) = self.write_through(&sessions).await {
            sessions.remove(&token);
            return Err(e);
        }
        Ok(token)
    }

    pub async fn resolve(&self, token: &str) -> Result<StoredSession, SessionError> {
        let stored = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionError::InvalidToken)?;

        if stored.is_expired(Utc::now()) {
            self.sessions.write().await.remove(token);
            return Err(SessionError::Expired);
        }
        Ok(stored)
    }

    /// Drop a session. Revoking an unknown token is an error so logout can
    /// report it. The session stays revoked in memory even when the file
    /// cannot be rewritten.
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_none() {
            return Err(SessionError::InvalidToken);
        }
        prune_expired(&mut sessions, Utc::now());
        self.write_through(&sessions).await
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Prune expired sessions and write the rest to the configured file, if
    /// any.
    pub async fn persist(&self) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        prune_expired(&mut sessions, Utc::now());
        self.write_through(&sessions).await
    }

    /// Callers hold the write lock for the duration.
    async fn write_through(
        &self,
        sessions: &HashMap<String, StoredSession>,
    ) -> Result<(), SessionError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let snapshot = SessionSnapshot {
            version: SCHEMA_VERSION,
            sessions,
        };
        write_file(path, &snapshot)
            .await
            .map_err(|e| SessionError::Persistence(format!("{:#}", e)))
    }
}

async fn read_file(path: &Path) -> anyhow::Result<SessionFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Write to a sibling temp file and rename, so a crash never leaves a
/// half-written file behind.
async fn write_file(path: &Path, contents: &SessionSnapshot<'_>) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(contents).context("serializing sessions")?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("replacing {}", path.display()))
}
