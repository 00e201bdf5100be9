use super::*;

fn identity(role: Role) -> Identity {
    Identity::new(
        "uid-1",
        "ana@example.com",
        Profile { role, given_name: "Ana".to_owned(), family_name: "Ruiz".to_owned() },
    )
}

// =============================================================
// Role
// =============================================================

#[test]
fn role_default_is_patient() {
    assert_eq!(Role::default(), Role::Patient);
}

#[test]
fn role_from_stored_reads_doctor() {
    assert_eq!(Role::from_stored(Some("doctor")), Role::Doctor);
    assert_eq!(Role::from_stored(Some("patient")), Role::Patient);
}

#[test]
fn role_from_stored_falls_back_to_patient() {
    assert_eq!(Role::from_stored(None), Role::Patient);
    assert_eq!(Role::from_stored(Some("")), Role::Patient);
    assert_eq!(Role::from_stored(Some("admin")), Role::Patient);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
    assert_eq!(Role::Doctor.as_str(), "doctor");
}

// =============================================================
// Identity
// =============================================================

#[test]
fn display_name_joins_names() {
    assert_eq!(identity(Role::Patient).display_name(), "Ana Ruiz");
}

#[test]
fn display_name_falls_back_to_email() {
    let id = Identity::new("uid-2", "x@y.com", Profile::default());
    assert_eq!(id.display_name(), "x@y.com");
}

// =============================================================
// SessionState
// =============================================================

#[test]
fn session_state_starts_loading_without_identity() {
    let state = SessionState::default();
    assert!(state.is_loading);
    assert!(state.identity.is_none());
    assert!(state.last_error.is_none());
}

#[test]
fn signed_in_notification_publishes_identity_and_ends_loading() {
    let mut state = SessionState::default();
    state.apply_notification(Resolution::SignedIn(identity(Role::Doctor)));
    assert!(!state.is_loading);
    assert_eq!(state.role(), Some(Role::Doctor));
    assert!(state.last_error.is_none());
}

#[test]
fn failed_notification_clears_identity_and_sets_error() {
    let mut state = SessionState::default();
    state.apply_notification(Resolution::SignedIn(identity(Role::Patient)));
    state.apply_notification(Resolution::Failed);
    assert!(!state.is_loading);
    assert!(state.identity.is_none());
    assert_eq!(state.last_error.as_deref(), Some(LOAD_ERROR_MESSAGE));
}

#[test]
fn every_notification_clears_previous_error() {
    let sequences = [
        vec![Resolution::Failed, Resolution::SignedOut],
        vec![Resolution::Failed, Resolution::SignedIn(identity(Role::Patient))],
        vec![Resolution::Failed, Resolution::Failed, Resolution::SignedOut],
    ];
    for sequence in sequences {
        let mut state = SessionState::default();
        for resolution in sequence {
            let failed = resolution == Resolution::Failed;
            state.apply_notification(resolution);
            assert!(!state.is_loading);
            assert_eq!(state.last_error.is_some(), failed);
        }
    }
}
