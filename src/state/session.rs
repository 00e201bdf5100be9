//! Session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the access gate and role-aware pages; written only by
//! `SessionStore`. The loading flag starts raised and drops after the first
//! identity-stream notification, whatever its outcome.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

/// Message published in `last_error` when a stream notification cannot be resolved.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading user data. Please try again.";

/// Account role. Unknown or missing roles resolve to `Patient`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    #[default]
    Patient,
}

impl Role {
    /// Stored spelling used in the profile cache.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }

    /// Parse a stored role, falling back to `Patient` for anything unrecognized.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("doctor") => Self::Doctor,
            _ => Self::Patient,
        }
    }

    /// Human label shown in navigation chrome.
    pub fn label(self) -> &'static str {
        match self {
            Self::Doctor => "Médico",
            Self::Patient => "Paciente",
        }
    }
}

/// Supplementary identity fields not carried by the credential backend itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub role: Role,
    pub given_name: String,
    pub family_name: String,
}

/// The authenticated actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Opaque id issued by the auth backend.
    pub id: String,
    /// Empty when the backend did not report one.
    pub email: String,
    pub role: Role,
    pub given_name: String,
    pub family_name: String,
}

impl Identity {
    /// Assemble an identity from backend fields plus a resolved profile.
    pub fn new(id: impl Into<String>, email: impl Into<String>, profile: Profile) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role: profile.role,
            given_name: profile.given_name,
            family_name: profile.family_name,
        }
    }

    /// "Given Family", or the email when no name is known.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.given_name.trim(), self.family_name.trim());
        let full = full.trim();
        if full.is_empty() { self.email.clone() } else { full.to_owned() }
    }
}

/// Outcome of resolving one identity-stream notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    SignedIn(Identity),
    SignedOut,
    /// Profile lookup faulted; the identity is dropped.
    Failed,
}

/// Externally observable shape of the session store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { identity: None, is_loading: true, last_error: None }
    }
}

impl SessionState {
    /// Apply the outcome of one identity-stream notification.
    ///
    /// The error slot is cleared before evaluation and loading always ends.
    pub fn apply_notification(&mut self, resolution: Resolution) {
        self.last_error = None;
        match resolution {
            Resolution::SignedIn(identity) => self.identity = Some(identity),
            Resolution::SignedOut => self.identity = None,
            Resolution::Failed => {
                self.identity = None;
                self.last_error = Some(LOAD_ERROR_MESSAGE.to_owned());
            }
        }
        self.is_loading = false;
    }

    /// Role of the signed-in identity, if any.
    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }
}
