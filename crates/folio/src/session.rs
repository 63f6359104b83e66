//! Server-side sessions keyed by a signed cookie.
//!
//! The cookie only carries a random session id; the signed-in user and the
//! one-shot flash messages live in [`SessionStore`]. [`session_layer`] resolves
//! the session for every request and hands handlers a [`Session`] through
//! request extensions. Sessions are only stored once something is written.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::ServiceState;

pub const SESSION_COOKIE: &str = "folio.session";

/// Sessions idle for longer than this are dropped.
const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Minimum decoded length of a session signing secret.
pub const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Flash messages pulled out of a session for a single render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Upper bound on live sessions; the least recently seen one is evicted
/// to make room.
pub const MAX_SESSIONS: usize = 10_000;

struct Entry {
    data: SessionData,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    /// Start an empty session.
    pub fn create(&self) -> Uuid {
        self.insert(SessionData::default())
    }

    /// Store `data` under a fresh id, sweeping expired sessions and
    /// evicting the stalest one when the store is full.
    pub fn insert(&self, data: SessionData) -> Uuid {
        let mut sessions = self.sessions.write();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < SESSION_TTL);

        if sessions.len() >= self.capacity {
            let stalest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            if let Some(id) = stalest {
                sessions.remove(&id);
                tracing::debug!(session = %id, "evicted session, store is full");
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            Entry {
                data,
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// Marks the session as seen. Returns false if it is unknown or expired.
    pub fn touch(&self, id: &Uuid) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(id) {
            Some(entry) if entry.last_seen.elapsed() < SESSION_TTL => {
                entry.last_seen = Instant::now();
                true
            }
            Some(_) => {
                sessions.remove(id);
                false
            }
            None => false,
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionData> {
        self.sessions.read().get(id).map(|entry| entry.data.clone())
    }

    pub fn remove(&self, id: &Uuid) -> Option<SessionData> {
        self.sessions.write().remove(id).map(|entry| entry.data)
    }

    pub fn update<R>(&self, id: &Uuid, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut sessions = self.sessions.write();
        let entry = sessions.entry(*id).or_insert_with(|| Entry {
            data: SessionData::default(),
            last_seen: Instant::now(),
        });
        f(&mut entry.data)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct Slot {
    id: Option<Uuid>,
    issue_cookie: bool,
}

/// The current request's session.
///
/// A request without a valid cookie starts detached: nothing is stored and no
/// cookie is sent until a handler writes to it.
#[derive(Clone)]
pub struct Session {
    slot: Arc<Mutex<Slot>>,
    store: SessionStore,
}

impl Session {
    pub fn new(id: Uuid, store: SessionStore) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                id: Some(id),
                issue_cookie: false,
            })),
            store,
        }
    }

    pub fn detached(store: SessionStore) -> Self {
        Self {
            slot: Arc::default(),
            store,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.slot.lock().id
    }

    pub fn data(&self) -> SessionData {
        self.id()
            .and_then(|id| self.store.get(&id))
            .unwrap_or_default()
    }

    pub fn user(&self) -> Option<String> {
        self.data().user
    }

    pub fn set_user(&self, user: impl Into<String>) {
        let user = user.into();
        self.write(|data| data.user = Some(user));
    }

    /// Clears the signed-in user, returning whoever it was.
    pub fn clear_user(&self) -> Option<String> {
        let id = self.id()?;
        self.store.update(&id, |data| data.user.take())
    }

    pub fn flash_success(&self, message: impl Into<String>) {
        let message = message.into();
        self.write(|data| data.success = Some(message));
    }

    pub fn flash_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.write(|data| data.error = Some(message));
    }

    /// Removes and returns any pending flash messages.
    pub fn take_flash(&self) -> Flash {
        let Some(id) = self.id() else {
            return Flash::default();
        };
        self.store.update(&id, |data| Flash {
            success: data.success.take(),
            error: data.error.take(),
        })
    }

    /// Moves the session data under a new id and drops the old one, so a
    /// cookie issued before a privilege change stops working.
    pub fn rotate(&self) {
        let mut slot = self.slot.lock();
        let data = slot
            .id
            .and_then(|id| self.store.remove(&id))
            .unwrap_or_default();
        slot.id = Some(self.store.insert(data));
        slot.issue_cookie = true;
    }

    /// The id to send back in a new cookie, if this request minted one.
    fn issued_id(&self) -> Option<Uuid> {
        let slot = self.slot.lock();
        slot.id.filter(|_| slot.issue_cookie)
    }

    fn write<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut slot = self.slot.lock();
        let id = match slot.id {
            Some(id) => id,
            None => {
                let id = self.store.create();
                slot.id = Some(id);
                slot.issue_cookie = true;
                id
            }
        };
        self.store.update(&id, f)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "session layer is not installed",
        ))
    }
}

/// Attaches a [`Session`] to the request and sends a signed cookie whenever
/// the handler started or rotated one.
pub async fn session_layer(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let sessions = state.sessions();

    let session = match jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<Uuid>().ok())
        .filter(|id| sessions.touch(id))
    {
        Some(id) => Session::new(id, sessions.clone()),
        None => Session::detached(sessions.clone()),
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    match session.issued_id() {
        Some(id) => {
            let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), response).into_response()
        }
        None => response,
    }
}

/// Decode a hex-encoded signing secret into a cookie key.
pub fn key_from_hex(secret: &str) -> Result<Key, SessionKeyError> {
    let bytes = hex::decode(secret.trim())?;
    if bytes.len() < MIN_SECRET_LEN {
        return Err(SessionKeyError::TooShort(bytes.len()));
    }
    Ok(Key::from(&bytes[..]))
}

pub fn key_to_hex(key: &Key) -> String {
    hex::encode(key.master())
}

#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    #[error("session secret is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("session secret must decode to at least 64 bytes, got {0}")]
    TooShort(usize),
}
