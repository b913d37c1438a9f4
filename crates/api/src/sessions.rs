//! Browser sessions hosted by the server, keyed by the `x-session-id` header.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use domain::QuantityLimits;
use store::{DirectorySessionStorage, InMemorySessionStorage, SessionStorage};
use storefront::Session;

use crate::error::ApiError;
use crate::routes::AppState;

/// Request header carrying the browser session ID.
pub const SESSION_HEADER: &str = "x-session-id";

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Upper bound on sessions kept in memory.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

const MAX_SESSION_ID_LEN: usize = 128;

/// Session storage as held by the server.
pub type SharedStorage = Arc<dyn SessionStorage>;

/// A hosted storefront session.
pub type StorefrontSession = Session<SharedStorage>;

/// Where session slots are kept.
#[derive(Debug, Clone)]
pub enum SessionBackend {
    /// Slots live in process memory and vanish on restart or eviction.
    Memory,
    /// One subdirectory per session under the given root.
    Directory(PathBuf),
}

struct Entry {
    session: Arc<StorefrontSession>,
    last_seen: Mutex<Instant>,
}

impl Entry {
    fn new(session: Arc<StorefrontSession>, now: Instant) -> Self {
        Self {
            session,
            last_seen: Mutex::new(now),
        }
    }

    fn touch(&self, now: Instant) -> Arc<StorefrontSession> {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = now;
        self.session.clone()
    }

    fn last_seen(&self) -> Instant {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True when no request holds the session.
    fn is_idle(&self) -> bool {
        Arc::strong_count(&self.session) == 1
    }
}

/// Opens and caches one [`Session`] per session ID.
///
/// A session is kept once a mutating request opens it. Sessions idle past
/// the timeout, and the least recently used ones beyond the capacity, are
/// evicted whenever a new session is kept. A session in use by a request is
/// never evicted.
pub struct SessionRegistry {
    backend: SessionBackend,
    limits: QuantityLimits,
    idle_timeout: Duration,
    max_sessions: usize,
    sessions: RwLock<HashMap<String, Entry>>,
}

impl SessionRegistry {
    /// Creates a registry with the default idle timeout and capacity.
    pub fn new(backend: SessionBackend, limits: QuantityLimits) -> Self {
        Self {
            backend,
            limits,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            sessions: RwLock::default(),
        }
    }

    /// Sets how long an unused session is kept.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Sets how many sessions are kept in memory.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Returns the cart quantity bounds applied to new sessions.
    pub fn limits(&self) -> QuantityLimits {
        self.limits
    }

    /// Returns the session for `session_id`, opening and keeping it on first use.
    pub fn get_or_open(&self, session_id: &str) -> Result<Arc<StorefrontSession>, ApiError> {
        validate_session_id(session_id)?;
        if let Some(session) = self.cached(session_id)? {
            return Ok(session);
        }

        let storage = self.open_storage(session_id)?;
        let session = Arc::new(Session::open(storage, self.limits));
        self.keep(session_id, session)
    }

    /// Returns the session for a read-only request.
    ///
    /// A session that is neither kept nor persisted is served as a fresh,
    /// empty session that is dropped after the request.
    pub fn lookup(&self, session_id: &str) -> Result<Arc<StorefrontSession>, ApiError> {
        validate_session_id(session_id)?;
        if let Some(session) = self.cached(session_id)? {
            return Ok(session);
        }

        let persisted = match &self.backend {
            SessionBackend::Memory => false,
            SessionBackend::Directory(root) => {
                DirectorySessionStorage::open(root.join(session_id))?.exists()
            }
        };
        if persisted {
            return self.get_or_open(session_id);
        }

        let storage: SharedStorage = Arc::new(InMemorySessionStorage::new());
        Ok(Arc::new(Session::open(storage, self.limits)))
    }

    /// Drops idle sessions past the timeout and returns how many were dropped.
    pub fn evict_idle(&self) -> Result<usize, ApiError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        let evicted = self.evict(&mut sessions, Instant::now());
        metrics::gauge!("storefront_sessions").set(sessions.len() as f64);
        Ok(evicted)
    }

    /// Returns the number of sessions kept in memory.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Returns true if no session is kept.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, session_id: &str) -> Result<Option<Arc<StorefrontSession>>, ApiError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions
            .get(session_id)
            .map(|entry| entry.touch(Instant::now())))
    }

    fn keep(
        &self,
        session_id: &str,
        session: Arc<StorefrontSession>,
    ) -> Result<Arc<StorefrontSession>, ApiError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;

        // Another request may have opened the same session meanwhile.
        if let Some(entry) = sessions.get(session_id) {
            return Ok(entry.touch(now));
        }

        let evicted = self.evict(&mut sessions, now);
        sessions.insert(session_id.to_string(), Entry::new(session.clone(), now));

        metrics::gauge!("storefront_sessions").set(sessions.len() as f64);
        tracing::debug!(session_id, evicted, "session opened");
        Ok(session)
    }

    /// Removes idle entries past the timeout, then the least recently used
    /// idle entries until one more session fits.
    fn evict(&self, sessions: &mut HashMap<String, Entry>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            !(entry.is_idle() && now.duration_since(entry.last_seen()) >= self.idle_timeout)
        });

        if sessions.len() >= self.max_sessions {
            let mut candidates: Vec<(String, Instant)> = sessions
                .iter()
                .filter(|(_, entry)| entry.is_idle())
                .map(|(id, entry)| (id.clone(), entry.last_seen()))
                .collect();
            candidates.sort_by_key(|(_, last_seen)| *last_seen);

            let extra = sessions.len() + 1 - self.max_sessions;
            for (id, _) in candidates.into_iter().take(extra) {
                sessions.remove(&id);
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "sessions evicted");
        }
        evicted
    }

    fn open_storage(&self, session_id: &str) -> Result<SharedStorage, ApiError> {
        match &self.backend {
            SessionBackend::Memory => Ok(Arc::new(InMemorySessionStorage::new())),
            SessionBackend::Directory(root) => {
                let storage = DirectorySessionStorage::open(root.join(session_id))?;
                Ok(Arc::new(storage))
            }
        }
    }
}

fn validate_session_id(session_id: &str) -> Result<(), ApiError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Invalid {SESSION_HEADER} header"
        )))
    }
}

fn poisoned() -> ApiError {
    ApiError::Internal("session registry lock poisoned".to_string())
}

fn session_id(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {SESSION_HEADER} header")))
}

/// Extracts the caller's session from the `x-session-id` header, opening and
/// keeping it. Used by routes that change session state.
pub struct CurrentSession(pub Arc<StorefrontSession>);

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state.sessions.get_or_open(session_id(parts)?).map(CurrentSession)
    }
}

/// Extracts the caller's session for a read-only route. Unknown sessions
/// are not kept.
pub struct ReadSession(pub Arc<StorefrontSession>);

impl FromRequestParts<Arc<AppState>> for ReadSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state.sessions.lookup(session_id(parts)?).map(ReadSession)
    }
}
