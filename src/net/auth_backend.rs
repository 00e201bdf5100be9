//! Capability contract for the external credential backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is generic over `AuthBackend` so the browser build can talk
//! to the hosted identity service while tests drive a scripted backend.
//! Identity changes are pushed through `ListenerSet`, which delivers
//! notifications one at a time even when a listener triggers another emit.

#[cfg(test)]
#[path = "auth_backend_test.rs"]
mod auth_backend_test;

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use thiserror::Error;

use crate::state::session::Profile;

/// User record as issued by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    /// Authoritative profile when the backend stores one for this account.
    pub profile: Option<Profile>,
}

/// Backend failure codes normalized across SDK and REST spellings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    Other(String),
}

impl AuthErrorCode {
    /// Normalize a raw backend code.
    ///
    /// REST responses append detail after `" : "` (e.g.
    /// `WEAK_PASSWORD : Password should be at least 6 characters`); only the
    /// leading token is significant.
    pub fn from_code(raw: &str) -> Self {
        let code = raw.split_once(" : ").map_or(raw, |(code, _)| code).trim();
        match code {
            "auth/email-already-in-use" | "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "auth/weak-password" | "WEAK_PASSWORD" => Self::WeakPassword,
            "auth/invalid-email" | "INVALID_EMAIL" => Self::InvalidEmail,
            "auth/user-not-found" | "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "auth/wrong-password" | "INVALID_PASSWORD" => Self::WrongPassword,
            "auth/too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailAlreadyInUse => f.write_str("email-already-in-use"),
            Self::WeakPassword => f.write_str("weak-password"),
            Self::InvalidEmail => f.write_str("invalid-email"),
            Self::UserNotFound => f.write_str("user-not-found"),
            Self::WrongPassword => f.write_str("wrong-password"),
            Self::TooManyRequests => f.write_str("too-many-requests"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("auth backend rejected request: {code}")]
    Rejected { code: AuthErrorCode },

    #[error("auth transport failed: {0}")]
    Transport(String),

    #[error("auth session storage failed: {0}")]
    Storage(String),

    #[error("auth backend is not available in this build")]
    Unavailable,
}

impl BackendError {
    pub fn rejected(raw_code: &str) -> Self {
        Self::Rejected { code: AuthErrorCode::from_code(raw_code) }
    }

    /// Normalized code for rejections; `None` for transport-level faults.
    pub fn code(&self) -> Option<&AuthErrorCode> {
        match self {
            Self::Rejected { code } => Some(code),
            _ => None,
        }
    }
}

/// Callback invoked with the new identity (or `None` when signed out).
pub type IdentityListener = Arc<dyn Fn(Option<AuthUser>) + Send + Sync>;

/// Client view of the external auth backend.
#[allow(async_fn_in_trait)]
pub trait AuthBackend: Send + Sync + 'static {
    /// Create credentials and return the newly issued user.
    async fn create_identity(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    /// Verify credentials and return the signed-in user.
    async fn verify_identity(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Register for identity changes until the returned subscription is dropped.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;

    /// Store `profile` as the authoritative record for `user_id`.
    ///
    /// Backends without profile storage accept and discard it.
    async fn publish_profile(&self, user_id: &str, profile: &Profile) -> Result<(), BackendError> {
        let _ = (user_id, profile);
        Ok(())
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, IdentityListener)>,
    pending: VecDeque<Option<AuthUser>>,
    delivering: bool,
}

fn lock(inner: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of identity listeners with serialized delivery.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<Mutex<Listeners>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: IdentityListener) -> Subscription {
        let mut guard = lock(&self.inner);
        let id = guard.next_id;
        guard.next_id += 1;
        guard.entries.push((id, listener));
        Subscription { id, listeners: Arc::downgrade(&self.inner) }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `user` to every listener.
    ///
    /// An emit issued from inside a listener is queued and delivered after the
    /// current notification has reached all listeners.
    pub fn emit(&self, user: Option<AuthUser>) {
        let mut guard = lock(&self.inner);
        guard.pending.push_back(user);
        if guard.delivering {
            return;
        }
        guard.delivering = true;
        while let Some(next) = guard.pending.pop_front() {
            let snapshot: Vec<IdentityListener> =
                guard.entries.iter().map(|(_, listener)| Arc::clone(listener)).collect();
            drop(guard);
            for listener in snapshot {
                listener(next.clone());
            }
            guard = lock(&self.inner);
        }
        guard.delivering = false;
    }
}

/// Handle for one registered listener; unsubscribes on drop.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.listeners.upgrade() {
            lock(&inner).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
