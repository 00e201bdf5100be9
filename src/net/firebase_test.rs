use super::*;
use crate::net::auth_backend::AuthErrorCode;
use crate::state::session::Role;

#[test]
fn accounts_endpoint_formats_method_and_key() {
    assert_eq!(
        accounts_endpoint("https://identitytoolkit.googleapis.com/v1", "signUp", "k1"),
        "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=k1"
    );
}

#[test]
fn token_endpoint_appends_key() {
    assert_eq!(
        token_endpoint("https://securetoken.googleapis.com/v1/token", "k1"),
        "https://securetoken.googleapis.com/v1/token?key=k1"
    );
}

#[test]
fn failure_from_response_reads_error_message_code() {
    let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
    assert_eq!(
        failure_from_response(400, body),
        BackendError::Rejected { code: AuthErrorCode::EmailAlreadyInUse }
    );
}

#[test]
fn failure_from_response_handles_detail_suffix() {
    let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
    assert_eq!(failure_from_response(400, body).code(), Some(&AuthErrorCode::WeakPassword));
}

#[test]
fn failure_from_response_without_envelope_is_transport() {
    assert_eq!(
        failure_from_response(502, "<html>bad gateway</html>"),
        BackendError::Transport("identity request failed: 502".to_owned())
    );
}

#[test]
fn profile_round_trips_through_display_name() {
    let profile = Profile { role: Role::Doctor, given_name: "Elena".to_owned(), family_name: "Soto".to_owned() };
    let encoded = encode_profile(&profile);
    assert_eq!(decode_profile(Some(&encoded)), Some(profile));
}

#[test]
fn plain_display_name_is_not_a_profile() {
    assert_eq!(decode_profile(Some("Elena Soto")), None);
    assert_eq!(decode_profile(None), None);
}

#[test]
fn signed_in_user_builds_session_and_user() {
    let response: SignInResponse = serde_json::from_value(serde_json::json!({
        "localId": "uid-1",
        "email": "a@b.com",
        "idToken": "id-tok",
        "refreshToken": "ref-tok",
        "expiresIn": "3600",
    }))
    .unwrap();

    let (session, user) = signed_in_user(&response);

    assert_eq!(
        session,
        StoredSession {
            user_id: "uid-1".to_owned(),
            email: Some("a@b.com".to_owned()),
            id_token: "id-tok".to_owned(),
            refresh_token: "ref-tok".to_owned(),
        }
    );
    assert_eq!(user.id, "uid-1");
    assert_eq!(user.profile, None);
}

#[test]
fn restored_user_prefers_lookup_fields() {
    let stored = StoredSession {
        user_id: "uid-1".to_owned(),
        email: Some("old@b.com".to_owned()),
        id_token: "old-id".to_owned(),
        refresh_token: "old-ref".to_owned(),
    };
    let refreshed: RefreshResponse = serde_json::from_value(serde_json::json!({
        "id_token": "new-id",
        "refresh_token": "new-ref",
        "user_id": "uid-1",
        "expires_in": "3600",
    }))
    .unwrap();
    let lookup: LookupResponse = serde_json::from_value(serde_json::json!({
        "users": [{ "localId": "uid-1", "email": "new@b.com", "displayName": "{\"role\":\"doctor\",\"given_name\":\"E\",\"family_name\":\"S\"}" }]
    }))
    .unwrap();

    let (session, user) = restored_user(&stored, refreshed, lookup.users.into_iter().next());

    assert_eq!(session.id_token, "new-id");
    assert_eq!(session.refresh_token, "new-ref");
    assert_eq!(user.email.as_deref(), Some("new@b.com"));
    assert_eq!(user.profile.map(|p| p.role), Some(Role::Doctor));
}

#[test]
fn restored_user_without_lookup_keeps_stored_email() {
    let stored = StoredSession {
        user_id: "uid-1".to_owned(),
        email: Some("old@b.com".to_owned()),
        id_token: "old-id".to_owned(),
        refresh_token: "old-ref".to_owned(),
    };
    let refreshed = RefreshResponse {
        id_token: "new-id".to_owned(),
        refresh_token: "new-ref".to_owned(),
        user_id: "uid-1".to_owned(),
    };

    let (_session, user) = restored_user(&stored, refreshed, None);

    assert_eq!(user.email.as_deref(), Some("old@b.com"));
    assert_eq!(user.profile, None);
}

#[test]
fn lookup_response_tolerates_missing_users() {
    let lookup: LookupResponse = serde_json::from_str("{}").unwrap();
    assert!(lookup.users.is_empty());
}

#[cfg(not(feature = "csr"))]
#[test]
fn native_build_reports_unavailable_and_signed_out() {
    use std::sync::{Arc, Mutex};

    let backend = FirebaseAuth::new(AppConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = backend.subscribe(Arc::new(move |user: Option<AuthUser>| sink.lock().unwrap().push(user)));

    assert_eq!(*seen.lock().unwrap(), vec![None]);
    assert_eq!(
        futures::executor::block_on(backend.verify_identity("a@b.com", "pw")),
        Err(BackendError::Unavailable)
    );
    assert_eq!(futures::executor::block_on(backend.sign_out()), Err(BackendError::Unavailable));
    assert_eq!(backend.config().auth_base_url, crate::config::DEFAULT_AUTH_BASE_URL);
}
