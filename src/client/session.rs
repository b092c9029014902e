//! Local session artifact storage: the persisted user identifier and
//! bearer token.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key–value store holding the session artifacts. The identifier and token
/// are independent keys: either can be absent on its own.
pub trait SessionStore: Send + Sync {
    fn identifier(&self) -> Option<Uuid>;
    fn token(&self) -> Option<String>;
    fn store(&self, id: Uuid, token: &str);
    fn clear(&self);
}

/// In-memory session store for embedded use and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<SessionSlots>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionSlots {
    id: Option<Uuid>,
    token: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set only the identifier slot.
    pub fn set_identifier(&self, id: Uuid) {
        self.inner.lock().expect("session store poisoned").id = Some(id);
    }

    /// Set only the token slot.
    pub fn set_token(&self, token: &str) {
        self.inner.lock().expect("session store poisoned").token = Some(token.to_string());
    }
}

impl SessionStore for MemorySessionStore {
    fn identifier(&self) -> Option<Uuid> {
        self.inner.lock().expect("session store poisoned").id
    }

    fn token(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("session store poisoned")
            .token
            .clone()
    }

    fn store(&self, id: Uuid, token: &str) {
        let mut slots = self.inner.lock().expect("session store poisoned");
        slots.id = Some(id);
        slots.token = Some(token.to_string());
    }

    fn clear(&self) {
        *self.inner.lock().expect("session store poisoned") = SessionSlots::default();
    }
}

/// JSON-file backed session store — the localStorage analog for a native
/// client. Read failures are treated as an absent session, never a fault.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> SessionSlots {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unreadable session file, treating as empty");
                SessionSlots::default()
            }),
            Err(_) => SessionSlots::default(),
        }
    }

    fn write(&self, slots: &SessionSlots) {
        let raw = match serde_json::to_string(slots) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, raw) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn identifier(&self) -> Option<Uuid> {
        self.read().id
    }

    fn token(&self) -> Option<String> {
        self.read().token
    }

    fn store(&self, id: Uuid, token: &str) {
        self.write(&SessionSlots {
            id: Some(id),
            token: Some(token.to_string()),
        });
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, "Failed to clear session file");
            }
        }
    }
}
