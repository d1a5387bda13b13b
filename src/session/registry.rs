use super::{Session, SessionId};
use crate::error::{FootpathError, Result};
use log::info;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Slot {
    session: Arc<Mutex<Session>>,
    last_used: Instant,
}

/// All live sessions of the process. The map lock is held only long enough
/// to look a session up; each session has its own lock for stage work.
#[derive(Debug)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    seed: Option<u64>,
    idle_limit: Option<Duration>,
    sessions: Mutex<HashMap<SessionId, Slot>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl SessionRegistry {
    /// `seed` fixes the RNG of every session; session `n` uses `seed + n`.
    pub fn new(seed: Option<u64>) -> Self {
        SessionRegistry {
            next_id: AtomicU64::new(1),
            seed,
            idle_limit: None,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Drop sessions idle for longer than `limit` whenever a new one is
    /// created.
    pub fn with_idle_limit(mut self, limit: Duration) -> Self {
        self.idle_limit = Some(limit);
        self
    }

    pub fn create(&self) -> SessionId {
        if let Some(limit) = self.idle_limit {
            self.evict_idle(limit);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(id, self.seed.map(|s| s.wrapping_add(id)));
        let slot = Slot {
            session: Arc::new(Mutex::new(session)),
            last_used: Instant::now(),
        };
        lock(&self.sessions).insert(id, slot);
        id
    }

    /// Run `f` against one session while holding only that session's lock.
    pub fn with_session<F, T>(&self, id: SessionId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        let entry = {
            let mut sessions = lock(&self.sessions);
            let slot = sessions.get_mut(&id).ok_or(FootpathError::SessionNotFound(id))?;
            slot.last_used = Instant::now();
            Arc::clone(&slot.session)
        };
        let mut session = lock(&entry);
        f(&mut *session)
    }

    /// Drop a session. Returns false when it did not exist.
    pub fn remove(&self, id: SessionId) -> bool {
        lock(&self.sessions).remove(&id).is_some()
    }

    /// Drop every session not used within `limit`. Returns how many went.
    pub fn evict_idle(&self, limit: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = lock(&self.sessions);
        let before = sessions.len();
        sessions.retain(|_, slot| now.duration_since(slot.last_used) <= limit);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("evicted {} idle sessions", evicted);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
