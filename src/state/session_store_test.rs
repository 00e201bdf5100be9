use std::sync::Mutex;

use futures::executor::block_on;

use super::*;
use crate::net::auth_backend::ListenerSet;
use crate::state::session::LOAD_ERROR_MESSAGE;
use crate::util::profile_cache::{MemoryCache, family_name_key, given_name_key, role_key};

/// Backend whose next result for each call is scripted by the test.
#[derive(Default)]
struct ScriptedBackend {
    listeners: ListenerSet,
    create: Mutex<Option<Result<AuthUser, BackendError>>>,
    verify: Mutex<Option<Result<AuthUser, BackendError>>>,
    sign_out: Mutex<Option<Result<(), BackendError>>>,
    published: Mutex<Vec<(String, Profile)>>,
}

impl ScriptedBackend {
    fn emit(&self, user: Option<AuthUser>) {
        self.listeners.emit(user);
    }
}

impl AuthBackend for ScriptedBackend {
    async fn create_identity(&self, _email: &str, _password: &str) -> Result<AuthUser, BackendError> {
        self.create.lock().unwrap().take().unwrap_or(Err(BackendError::Unavailable))
    }

    async fn verify_identity(&self, _email: &str, _password: &str) -> Result<AuthUser, BackendError> {
        self.verify.lock().unwrap().take().unwrap_or(Err(BackendError::Unavailable))
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.sign_out.lock().unwrap().take().unwrap_or(Ok(()))
    }

    fn subscribe(&self, listener: crate::net::auth_backend::IdentityListener) -> Subscription {
        self.listeners.add(listener)
    }

    async fn publish_profile(&self, user_id: &str, profile: &Profile) -> Result<(), BackendError> {
        self.published.lock().unwrap().push((user_id.to_owned(), profile.clone()));
        Ok(())
    }
}

/// Cache that faults on reads, or on the nth write.
#[derive(Default)]
struct FaultyCache {
    inner: MemoryCache,
    fail_reads: bool,
    fail_write_at: Option<usize>,
    writes: Mutex<usize>,
}

impl ProfileCache for FaultyCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_reads {
            return Err(CacheError::Read { key: key.to_owned() });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut writes = self.writes.lock().unwrap();
        *writes += 1;
        if self.fail_write_at == Some(*writes) {
            return Err(CacheError::Write { key: key.to_owned() });
        }
        self.inner.set(key, value)
    }
}

fn auth_user(id: &str) -> AuthUser {
    AuthUser { id: id.to_owned(), email: Some(format!("{id}@example.com")), profile: None }
}

fn store() -> (SessionStore<ScriptedBackend, MemoryCache>, Arc<ScriptedBackend>, Arc<MemoryCache>) {
    let backend = Arc::new(ScriptedBackend::default());
    let cache = Arc::new(MemoryCache::new());
    (SessionStore::new(Arc::clone(&backend), Arc::clone(&cache)), backend, cache)
}

// =============================================================
// Identity stream
// =============================================================

#[test]
fn starts_loading_until_first_notification() {
    let (store, backend, _cache) = store();
    let _sub = store.connect();
    assert!(store.snapshot().is_loading);

    backend.emit(None);
    let state = store.snapshot();
    assert!(!state.is_loading);
    assert!(state.identity.is_none());
    assert!(state.last_error.is_none());
}

#[test]
fn stream_identity_without_cache_entries_defaults_to_patient() {
    let (store, backend, _cache) = store();
    let _sub = store.connect();

    backend.emit(Some(auth_user("u1")));

    let state = store.snapshot();
    assert!(!state.is_loading);
    let identity = state.identity.expect("identity published");
    assert_eq!(identity.id, "u1");
    assert_eq!(identity.email, "u1@example.com");
    assert_eq!(identity.role, Role::Patient);
    assert_eq!(identity.given_name, "");
    assert_eq!(identity.family_name, "");
}

#[test]
fn stream_identity_reads_cached_profile() {
    let (store, backend, cache) = store();
    cache.set(&role_key("doc"), "doctor").unwrap();
    cache.set(&given_name_key("doc"), "Elena").unwrap();
    cache.set(&family_name_key("doc"), "Soto").unwrap();
    let _sub = store.connect();

    backend.emit(Some(auth_user("doc")));

    let identity = store.snapshot().identity.unwrap();
    assert_eq!(identity.role, Role::Doctor);
    assert_eq!(identity.display_name(), "Elena Soto");
}

#[test]
fn stream_identity_missing_email_becomes_empty() {
    let (store, backend, _cache) = store();
    let _sub = store.connect();

    backend.emit(Some(AuthUser { id: "u1".to_owned(), email: None, profile: None }));

    assert_eq!(store.snapshot().identity.unwrap().email, "");
}

#[test]
fn authoritative_profile_wins_and_refreshes_cache() {
    let (store, backend, cache) = store();
    cache.set(&role_key("u1"), "patient").unwrap();
    let _sub = store.connect();

    let profile = Profile { role: Role::Doctor, given_name: "Luis".to_owned(), family_name: "Mora".to_owned() };
    backend.emit(Some(AuthUser { profile: Some(profile.clone()), ..auth_user("u1") }));

    assert_eq!(store.snapshot().identity.unwrap().role, Role::Doctor);
    assert_eq!(read_profile(&*cache, "u1").unwrap(), profile);
}

#[test]
fn stream_resolution_fault_clears_identity_and_sets_error() {
    let backend = Arc::new(ScriptedBackend::default());
    let cache = Arc::new(FaultyCache { fail_reads: true, ..FaultyCache::default() });
    let store = SessionStore::new(Arc::clone(&backend), cache);
    let _sub = store.connect();

    backend.emit(Some(auth_user("u1")));

    let state = store.snapshot();
    assert!(!state.is_loading);
    assert!(state.identity.is_none());
    assert_eq!(state.last_error.as_deref(), Some(LOAD_ERROR_MESSAGE));

    backend.emit(None);
    let state = store.snapshot();
    assert!(!state.is_loading);
    assert!(state.last_error.is_none());
}

#[test]
fn dropping_subscription_stops_updates() {
    let (store, backend, _cache) = store();
    let sub = store.connect();
    drop(sub);

    backend.emit(Some(auth_user("u1")));

    let state = store.snapshot();
    assert!(state.is_loading);
    assert!(state.identity.is_none());
}

#[test]
fn sign_out_notification_clears_identity() {
    let (store, backend, _cache) = store();
    let _sub = store.connect();
    backend.emit(Some(auth_user("u1")));
    backend.emit(None);
    assert!(store.snapshot().identity.is_none());
    assert!(!store.snapshot().is_loading);
}

// =============================================================
// register
// =============================================================

#[test]
fn register_persists_three_entries_and_publishes_identity() {
    let (store, backend, cache) = store();
    *backend.create.lock().unwrap() = Some(Ok(AuthUser { email: None, ..auth_user("new") }));

    let result = block_on(store.register("Ana", "Ruiz", "ana@example.com", "secret1", Role::Doctor));

    assert_eq!(result, Ok(()));
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(&role_key("new")).unwrap().as_deref(), Some("doctor"));
    assert_eq!(cache.get(&given_name_key("new")).unwrap().as_deref(), Some("Ana"));
    assert_eq!(cache.get(&family_name_key("new")).unwrap().as_deref(), Some("Ruiz"));

    let identity = store.snapshot().identity.unwrap();
    assert_eq!(identity.id, "new");
    assert_eq!(identity.email, "ana@example.com");
    assert_eq!(identity.role, Role::Doctor);

    let published = backend.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "new");
    assert_eq!(published[0].1.given_name, "Ana");
}

#[test]
fn register_maps_backend_codes_to_messages() {
    let cases = [
        ("auth/email-already-in-use", "Este correo electrónico ya está registrado."),
        ("auth/weak-password", "La contraseña debe tener al menos 6 caracteres."),
        ("INVALID_EMAIL", "El correo electrónico no es válido."),
        ("OPERATION_NOT_ALLOWED", "An error occurred during registration."),
    ];
    for (code, message) in cases {
        let (store, backend, cache) = store();
        *backend.create.lock().unwrap() = Some(Err(BackendError::rejected(code)));

        let err = block_on(store.register("A", "B", "a@b.com", "x", Role::Patient)).unwrap_err();

        assert_eq!(err.to_string(), message);
        assert!(store.snapshot().identity.is_none());
        assert!(cache.is_empty());
    }
}

#[test]
fn register_transport_fault_uses_generic_message() {
    let (store, backend, _cache) = store();
    *backend.create.lock().unwrap() = Some(Err(BackendError::Transport("offline".to_owned())));

    let err = block_on(store.register("A", "B", "a@b.com", "secret1", Role::Patient)).unwrap_err();

    assert_eq!(err, AuthFailure::RegistrationFailed);
}

#[test]
fn register_cache_fault_does_not_publish_identity() {
    let backend = Arc::new(ScriptedBackend::default());
    *backend.create.lock().unwrap() = Some(Ok(auth_user("new")));
    let cache = Arc::new(FaultyCache { fail_write_at: Some(3), ..FaultyCache::default() });
    let store = SessionStore::new(Arc::clone(&backend), cache);

    let err = block_on(store.register("A", "B", "a@b.com", "secret1", Role::Doctor)).unwrap_err();

    assert_eq!(err, AuthFailure::RegistrationFailed);
    assert!(store.snapshot().identity.is_none());
    assert!(backend.published.lock().unwrap().is_empty());
}

// =============================================================
// login
// =============================================================

#[test]
fn login_without_cache_entries_defaults_profile() {
    let (store, backend, _cache) = store();
    *backend.verify.lock().unwrap() = Some(Ok(auth_user("u9")));

    assert_eq!(block_on(store.login("u9@example.com", "pw")), Ok(()));

    let identity = store.snapshot().identity.unwrap();
    assert_eq!(identity.role, Role::Patient);
    assert_eq!(identity.given_name, "");
    assert_eq!(identity.family_name, "");
    assert_eq!(identity.email, "u9@example.com");
}

#[test]
fn login_reads_cached_profile() {
    let (store, backend, cache) = store();
    cache.set(&role_key("doc"), "doctor").unwrap();
    *backend.verify.lock().unwrap() = Some(Ok(auth_user("doc")));

    block_on(store.login("doc@example.com", "pw")).unwrap();

    assert_eq!(store.snapshot().identity.unwrap().role, Role::Doctor);
}

#[test]
fn login_wrong_password_reports_message_and_keeps_identity_absent() {
    let (store, backend, _cache) = store();
    *backend.verify.lock().unwrap() = Some(Err(BackendError::rejected("auth/wrong-password")));

    let err = block_on(store.login("a@b.com", "x")).unwrap_err();

    assert_eq!(err.to_string(), "La contraseña es incorrecta.");
    assert!(store.snapshot().identity.is_none());
}

#[test]
fn login_maps_backend_codes_to_messages() {
    let cases = [
        ("EMAIL_NOT_FOUND", AuthFailure::UnknownEmail),
        ("INVALID_PASSWORD", AuthFailure::WrongPassword),
        ("TOO_MANY_ATTEMPTS_TRY_LATER", AuthFailure::TooManyAttempts),
        ("USER_DISABLED", AuthFailure::LoginFailed),
    ];
    for (code, expected) in cases {
        let (store, backend, _cache) = store();
        *backend.verify.lock().unwrap() = Some(Err(BackendError::rejected(code)));
        assert_eq!(block_on(store.login("a@b.com", "x")), Err(expected));
    }
    assert_eq!(AuthFailure::TooManyAttempts.to_string(), "Demasiados intentos fallidos. Por favor, intente más tarde.");
    assert_eq!(AuthFailure::UnknownEmail.to_string(), "El correo electrónico no existe.");
    assert_eq!(AuthFailure::LoginFailed.to_string(), "Error al iniciar sesión.");
}

#[test]
fn login_cache_fault_is_generic_failure() {
    let backend = Arc::new(ScriptedBackend::default());
    *backend.verify.lock().unwrap() = Some(Ok(auth_user("u1")));
    let cache = Arc::new(FaultyCache { fail_reads: true, ..FaultyCache::default() });
    let store = SessionStore::new(Arc::clone(&backend), cache);

    assert_eq!(block_on(store.login("a@b.com", "pw")), Err(AuthFailure::LoginFailed));
    assert!(store.snapshot().identity.is_none());
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_clears_identity() {
    let (store, backend, _cache) = store();
    *backend.verify.lock().unwrap() = Some(Ok(auth_user("u1")));
    block_on(store.login("u1@example.com", "pw")).unwrap();

    assert_eq!(block_on(store.logout()), Ok(()));
    assert!(store.snapshot().identity.is_none());
}

#[test]
fn logout_failure_is_reported_and_keeps_identity() {
    let (store, backend, _cache) = store();
    *backend.verify.lock().unwrap() = Some(Ok(auth_user("u1")));
    block_on(store.login("u1@example.com", "pw")).unwrap();
    *backend.sign_out.lock().unwrap() = Some(Err(BackendError::Transport("offline".to_owned())));

    assert_eq!(block_on(store.logout()), Err(AuthFailure::LogoutFailed));
    assert_eq!(store.snapshot().identity.unwrap().id, "u1");
}
