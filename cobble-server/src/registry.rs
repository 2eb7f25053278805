use crate::session::Session;
use hashbrown::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

///
/// The server-wide mapping from player identifier to session, guarded by a mutex.
///
/// A session is inserted exactly once, after its login-acknowledge, and removed exactly once, on
/// disconnect. Tick scheduling works off [`ClientRegistry::snapshot`], so the lock is never held
/// while any session does I/O.
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl ClientRegistry {
    ///
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Registers a session under `uuid`, replacing any previous entry with the same identifier.
    pub fn insert(&self, uuid: Uuid, session: Arc<Mutex<Session>>) {
        self.lock().insert(uuid, session);
    }

    ///
    /// Removes the session registered under `uuid`, if any.
    pub fn remove(&self, uuid: &Uuid) -> Option<Arc<Mutex<Session>>> {
        self.lock().remove(uuid)
    }

    ///
    /// The number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    ///
    /// Whether no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Clones out every `(identifier, session)` pair under the lock, releasing it before the
    /// caller touches any session.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Uuid, Arc<Mutex<Session>>)> {
        self.lock()
            .iter()
            .map(|(uuid, session)| (*uuid, Arc::clone(session)))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Arc<Mutex<Session>>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
