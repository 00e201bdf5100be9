//! Session store: the single source of truth for who is signed in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Constructed once in `App` and handed to consumers through context. Bridges
//! the credential backend (which only knows ids and emails) with the profile
//! fields (role, names) resolved from the backend's authoritative record when
//! present, else from the local profile cache.
//!
//! ERROR HANDLING
//! ==============
//! Operations return `AuthFailure`, whose `Display` is the user-facing
//! message. Backend codes are logged and never leave this module. Faults on
//! the identity-stream path are reported through `SessionState::last_error`.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::sync::Arc;

use leptos::prelude::*;
use thiserror::Error;

use crate::net::auth_backend::{AuthBackend, AuthErrorCode, AuthUser, BackendError, Subscription};
use crate::state::session::{Identity, Profile, Resolution, Role, SessionState};
use crate::util::profile_cache::{CacheError, ProfileCache, read_profile, write_profile};

/// User-facing outcome of a failed session operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Este correo electrónico ya está registrado.")]
    EmailAlreadyRegistered,

    #[error("La contraseña debe tener al menos 6 caracteres.")]
    WeakPassword,

    #[error("El correo electrónico no es válido.")]
    InvalidEmail,

    #[error("An error occurred during registration.")]
    RegistrationFailed,

    #[error("El correo electrónico no existe.")]
    UnknownEmail,

    #[error("La contraseña es incorrecta.")]
    WrongPassword,

    #[error("Demasiados intentos fallidos. Por favor, intente más tarde.")]
    TooManyAttempts,

    #[error("Error al iniciar sesión.")]
    LoginFailed,

    #[error("Error al cerrar sesión.")]
    LogoutFailed,
}

impl AuthFailure {
    fn for_registration(err: &BackendError) -> Self {
        match err.code() {
            Some(AuthErrorCode::EmailAlreadyInUse) => Self::EmailAlreadyRegistered,
            Some(AuthErrorCode::WeakPassword) => Self::WeakPassword,
            Some(AuthErrorCode::InvalidEmail) => Self::InvalidEmail,
            _ => Self::RegistrationFailed,
        }
    }

    fn for_login(err: &BackendError) -> Self {
        match err.code() {
            Some(AuthErrorCode::UserNotFound) => Self::UnknownEmail,
            Some(AuthErrorCode::WrongPassword) => Self::WrongPassword,
            Some(AuthErrorCode::TooManyRequests) => Self::TooManyAttempts,
            _ => Self::LoginFailed,
        }
    }
}

/// Shared handle to the session. Cloning is cheap; all clones see one state.
pub struct SessionStore<B, C> {
    backend: Arc<B>,
    cache: Arc<C>,
    state: RwSignal<SessionState>,
}

impl<B, C> Clone for SessionStore<B, C> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend), cache: Arc::clone(&self.cache), state: self.state }
    }
}

impl<B: AuthBackend, C: ProfileCache> SessionStore<B, C> {
    pub fn new(backend: Arc<B>, cache: Arc<C>) -> Self {
        Self { backend, cache, state: RwSignal::new(SessionState::default()) }
    }

    /// Reactive handle for consumers (access gate, pages).
    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    /// Follow the backend's identity stream until the subscription is dropped.
    pub fn connect(&self) -> Subscription {
        let store = self.clone();
        self.backend.subscribe(Arc::new(move |user: Option<AuthUser>| store.handle_identity_change(user)))
    }

    /// Process one identity-stream notification.
    pub fn handle_identity_change(&self, user: Option<AuthUser>) {
        let resolution = match user {
            None => Resolution::SignedOut,
            Some(user) => match self.resolve_profile(&user) {
                Ok(profile) => {
                    Resolution::SignedIn(Identity::new(user.id, user.email.unwrap_or_default(), profile))
                }
                Err(err) => {
                    log::error!("loading user data for {} failed: {err}", user.id);
                    Resolution::Failed
                }
            },
        };
        self.state.update(|state| state.apply_notification(resolution));
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns the mapped user-facing failure; the session identity is untouched.
    pub async fn register(
        &self,
        given_name: &str,
        family_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), AuthFailure> {
        let user = self.backend.create_identity(email, password).await.map_err(|err| {
            log::error!("registration failed: {err}");
            AuthFailure::for_registration(&err)
        })?;

        let profile = Profile {
            role,
            given_name: given_name.to_owned(),
            family_name: family_name.to_owned(),
        };
        write_profile(&*self.cache, &user.id, &profile).map_err(|err| {
            log::error!("caching profile for {} failed: {err}", user.id);
            AuthFailure::RegistrationFailed
        })?;

        let identity = Identity::new(user.id.clone(), email, profile.clone());
        self.state.update(|state| state.identity = Some(identity));
        log::info!("registered {} as {}", user.id, role.as_str());

        if let Err(err) = self.backend.publish_profile(&user.id, &profile).await {
            log::warn!("publishing profile for {} failed: {err}", user.id);
        }
        Ok(())
    }

    /// Verify credentials and publish the resolved identity.
    ///
    /// # Errors
    ///
    /// Returns the mapped user-facing failure; the session identity is untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        let user = self.backend.verify_identity(email, password).await.map_err(|err| {
            log::error!("sign-in failed: {err}");
            AuthFailure::for_login(&err)
        })?;

        let profile = self.resolve_profile(&user).map_err(|err| {
            log::error!("loading user data for {} failed: {err}", user.id);
            AuthFailure::LoginFailed
        })?;

        let identity = Identity::new(user.id, user.email.unwrap_or_default(), profile);
        self.state.update(|state| state.identity = Some(identity));
        Ok(())
    }

    /// Sign out and clear the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthFailure::LogoutFailed` when the backend refuses; the
    /// session is left as it was.
    pub async fn logout(&self) -> Result<(), AuthFailure> {
        match self.backend.sign_out().await {
            Ok(()) => {
                self.state.update(|state| state.identity = None);
                Ok(())
            }
            Err(err) => {
                log::error!("signing out failed: {err}");
                Err(AuthFailure::LogoutFailed)
            }
        }
    }

    fn resolve_profile(&self, user: &AuthUser) -> Result<Profile, CacheError> {
        if let Some(profile) = &user.profile {
            if let Err(err) = write_profile(&*self.cache, &user.id, profile) {
                log::warn!("refreshing cached profile for {} failed: {err}", user.id);
            }
            return Ok(profile.clone());
        }
        read_profile(&*self.cache, &user.id)
    }
}
