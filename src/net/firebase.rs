//! REST client for the hosted identity toolkit.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, with the signed-in
//! session persisted to `localStorage` so a reload can restore it.
//! Native builds: every call fails with `BackendError::Unavailable` and
//! subscribers immediately hear "signed out".
//!
//! DESIGN
//! ======
//! The SDK's auth-state stream is rebuilt on top of `ListenerSet`: the stored
//! session is refreshed once per subscription, and sign-in/sign-out emit
//! after the caller's own continuation has run. The account `displayName`
//! carries the JSON-encoded profile so the role survives a new device.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "firebase_test.rs"]
mod firebase_test;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::net::auth_backend::{AuthBackend, AuthUser, BackendError, IdentityListener, ListenerSet, Subscription};
use crate::state::session::Profile;

/// `localStorage` key for the persisted session.
pub const SESSION_KEY: &str = "vitalytics_auth_session";

/// Tokens and ids needed to resume a session after reload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    display_name: Option<String>,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    email: Option<String>,
    display_name: Option<String>,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(any(test, feature = "csr"))]
fn accounts_endpoint(base_url: &str, method: &str, api_key: &str) -> String {
    format!("{base_url}/accounts:{method}?key={api_key}")
}

#[cfg(any(test, feature = "csr"))]
fn token_endpoint(token_url: &str, api_key: &str) -> String {
    format!("{token_url}?key={api_key}")
}

#[cfg(any(test, feature = "csr"))]
fn request_failed_message(status: u16) -> String {
    format!("identity request failed: {status}")
}

/// Extract the backend error code from a failed response body.
#[cfg(any(test, feature = "csr"))]
fn parse_error_code(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    Some(envelope.error.message)
}

/// Map a non-OK response to a backend error.
#[cfg(any(test, feature = "csr"))]
fn failure_from_response(status: u16, body: &str) -> BackendError {
    match parse_error_code(body) {
        Some(code) => BackendError::rejected(&code),
        None => BackendError::Transport(request_failed_message(status)),
    }
}

/// Serialize a profile for the account `displayName` field.
pub fn encode_profile(profile: &Profile) -> String {
    serde_json::to_string(profile).unwrap_or_default()
}

/// Recover a profile from `displayName`; plain display names yield `None`.
pub fn decode_profile(display_name: Option<&str>) -> Option<Profile> {
    serde_json::from_str(display_name?).ok()
}

#[cfg(any(test, feature = "csr"))]
fn signed_in_user(response: &SignInResponse) -> (StoredSession, AuthUser) {
    let session = StoredSession {
        user_id: response.local_id.clone(),
        email: response.email.clone(),
        id_token: response.id_token.clone(),
        refresh_token: response.refresh_token.clone(),
    };
    let user = AuthUser {
        id: response.local_id.clone(),
        email: response.email.clone(),
        profile: decode_profile(response.display_name.as_deref()),
    };
    (session, user)
}

#[cfg(any(test, feature = "csr"))]
fn restored_user(stored: &StoredSession, refreshed: RefreshResponse, account: Option<LookupUser>) -> (StoredSession, AuthUser) {
    let (email, display_name) = match account {
        Some(account) => (account.email.or_else(|| stored.email.clone()), account.display_name),
        None => (stored.email.clone(), None),
    };
    let session = StoredSession {
        user_id: refreshed.user_id.clone(),
        email: email.clone(),
        id_token: refreshed.id_token,
        refresh_token: refreshed.refresh_token,
    };
    let user = AuthUser {
        id: refreshed.user_id,
        email,
        profile: decode_profile(display_name.as_deref()),
    };
    (session, user)
}

/// Identity-toolkit backed implementation of `AuthBackend`.
pub struct FirebaseAuth {
    config: AppConfig,
    listeners: ListenerSet,
}

impl FirebaseAuth {
    pub fn new(config: AppConfig) -> Self {
        if !config.has_api_key() {
            log::warn!("no identity API key configured; sign-in requests will be rejected");
        }
        Self { config, listeners: ListenerSet::new() }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Emit on the next turn of the event loop.
    #[cfg(feature = "csr")]
    fn notify_later(&self, user: Option<AuthUser>) {
        let listeners = self.listeners.clone();
        leptos::task::spawn_local(async move { listeners.emit(user) });
    }

    #[cfg(feature = "csr")]
    async fn sign_in_with(&self, method: &str, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        let url = accounts_endpoint(&self.config.auth_base_url, method, &self.config.auth_api_key);
        let payload = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response: SignInResponse = post_json(&url, &payload).await?;
        let (session, user) = signed_in_user(&response);
        crate::util::ui_persistence::save_json(SESSION_KEY, &session)
            .map_err(|e| BackendError::Storage(e.to_string()))?;
        self.notify_later(Some(user.clone()));
        Ok(user)
    }
}

#[cfg(feature = "csr")]
async fn post_json<T: serde::de::DeserializeOwned>(url: &str, payload: &serde_json::Value) -> Result<T, BackendError> {
    let resp = gloo_net::http::Request::post(url)
        .json(payload)
        .map_err(|e| BackendError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(failure_from_response(status, &body));
    }
    resp.json::<T>().await.map_err(|e| BackendError::Transport(e.to_string()))
}

/// Refresh the persisted session, if any, and look up its account.
#[cfg(feature = "csr")]
async fn restore_session(config: &AppConfig) -> Option<AuthUser> {
    use crate::util::ui_persistence::{load_json, remove, save_json};

    let stored: StoredSession = load_json(SESSION_KEY)?;
    let payload = serde_json::json!({
        "grant_type": "refresh_token",
        "refresh_token": stored.refresh_token,
    });
    let refreshed: RefreshResponse = match post_json(&token_endpoint(&config.token_url, &config.auth_api_key), &payload).await {
        Ok(refreshed) => refreshed,
        Err(err) => {
            log::info!("stored session not restored: {err}");
            let _ = remove(SESSION_KEY);
            return None;
        }
    };

    let lookup_url = accounts_endpoint(&config.auth_base_url, "lookup", &config.auth_api_key);
    let account = post_json::<LookupResponse>(&lookup_url, &serde_json::json!({ "idToken": refreshed.id_token }))
        .await
        .map_err(|err| log::warn!("account lookup failed: {err}"))
        .ok()
        .and_then(|lookup| lookup.users.into_iter().next());

    let (session, user) = restored_user(&stored, refreshed, account);
    if let Err(err) = save_json(SESSION_KEY, &session) {
        log::warn!("persisting refreshed session failed: {err}");
    }
    log::debug!("restored session for {}", user.id);
    Some(user)
}

impl AuthBackend for FirebaseAuth {
    async fn create_identity(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        #[cfg(feature = "csr")]
        {
            self.sign_in_with("signUp", email, password).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, password);
            Err(BackendError::Unavailable)
        }
    }

    async fn verify_identity(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        #[cfg(feature = "csr")]
        {
            self.sign_in_with("signInWithPassword", email, password).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, password);
            Err(BackendError::Unavailable)
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        #[cfg(feature = "csr")]
        {
            crate::util::ui_persistence::remove(SESSION_KEY).map_err(|e| BackendError::Storage(e.to_string()))?;
            self.notify_later(None);
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(BackendError::Unavailable)
        }
    }

    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let subscription = self.listeners.add(listener);
        #[cfg(feature = "csr")]
        {
            let config = self.config.clone();
            let listeners = self.listeners.clone();
            leptos::task::spawn_local(async move {
                let user = restore_session(&config).await;
                listeners.emit(user);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            self.listeners.emit(None);
        }
        subscription
    }

    async fn publish_profile(&self, user_id: &str, profile: &Profile) -> Result<(), BackendError> {
        #[cfg(feature = "csr")]
        {
            let session: StoredSession = crate::util::ui_persistence::load_json(SESSION_KEY)
                .filter(|session: &StoredSession| session.user_id == user_id)
                .ok_or_else(|| BackendError::Storage(format!("no stored session for {user_id}")))?;
            let url = accounts_endpoint(&self.config.auth_base_url, "update", &self.config.auth_api_key);
            let payload = serde_json::json!({
                "idToken": session.id_token,
                "displayName": encode_profile(profile),
                "returnSecureToken": false,
            });
            post_json::<serde_json::Value>(&url, &payload).await.map(|_| ())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (user_id, profile);
            Err(BackendError::Unavailable)
        }
    }
}
