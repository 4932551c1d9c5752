use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use super::migrate;
use super::model::UserLog;
use crate::persist;

/// Owns the durable log document. Mutating operations run a full
/// load-mutate-save cycle while holding `lock()`, so two concurrent
/// requests cannot both read the pre-mutation document and overwrite
/// each other's change.
pub struct LogStore {
    path: PathBuf,
    default_user: String,
    mutation: Mutex<()>,
}

impl LogStore {
    pub fn new(path: PathBuf, default_user: String) -> Self {
        Self {
            path,
            default_user,
            mutation: Mutex::new(()),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().await
    }

    /// Reads the durable document, running migrations on the raw
    /// structure before strict decoding. An absent or corrupt file
    /// resets to an empty log for the configured user, persisted
    /// immediately so subsequent reads are stable.
    pub fn load(&self) -> anyhow::Result<UserLog> {
        match self.read_document() {
            Ok(log) => Ok(log),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "invalid user log, starting fresh");
                let log = UserLog {
                    user: self.default_user.clone(),
                    logs: Vec::new(),
                };
                self.save(&log).context("persist fresh user log")?;
                Ok(log)
            }
        }
    }

    fn read_document(&self) -> anyhow::Result<UserLog> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let mut doc: serde_json::Value = serde_json::from_str(&raw)?;
        migrate::apply(&mut doc);
        let log = serde_json::from_value(doc)?;
        Ok(log)
    }

    pub fn save(&self, log: &UserLog) -> anyhow::Result<()> {
        persist::write_json_atomic(&self.path, log)
    }
}
