use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Storage key under which the visitor session id lives
pub const SESSION_KEY: &str = "dishmap_session";

/// Key-value storage backing session identity
///
/// Implementations decide where ids persist (memory, disk, nowhere). A store
/// that reports itself unavailable turns session lookup into a no-op.
pub trait SessionStore: Send + Sync {
    fn available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);
}

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value.to_string());
    }
}

/// Store for environments without any persistence at all
#[derive(Debug, Default)]
pub struct DisabledStore;

impl SessionStore for DisabledStore {
    fn available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}
}

/// One-file-per-key store under a local data directory
///
/// Read and write failures degrade to "no session persisted" rather than
/// erroring; identity is convenience data, not something worth failing over.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Platform data directory, falling back to the temp dir
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("dishmap")
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.dir.join(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(error) => {
                tracing::debug!(path = %path.display(), error = %error, "session file not readable");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(error) = std::fs::create_dir_all(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), error = %error, "could not create session dir");
            return;
        }
        let path = self.dir.join(key);
        if let Err(error) = std::fs::write(&path, value) {
            tracing::debug!(path = %path.display(), error = %error, "could not persist session id");
        }
    }
}

/// Hands out the visitor session id, minting one on first use
///
/// The same id is returned for every call against the same store. When the
/// store is unavailable the id is the empty string, which downstream
/// consumers treat as "no session".
#[derive(Clone)]
pub struct SessionProvider {
    store: Arc<dyn SessionStore>,
}

impl SessionProvider {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledStore))
    }

    /// Returns the stored session id, minting and persisting a fresh UUID
    /// when none exists yet. Empty string when storage is unavailable.
    pub fn session_id(&self) -> String {
        if !self.store.available() {
            return String::new();
        }

        if let Some(existing) = self.store.get(SESSION_KEY) {
            if !existing.is_empty() {
                return existing;
            }
        }

        let fresh = Uuid::new_v4().to_string();
        self.store.set(SESSION_KEY, &fresh);
        fresh
    }
}
