use super::*;

#[test]
fn parse_trims_names_and_email() {
    let form = RegistrationForm::parse(" Ana ", " García ", " ana@example.com ", "secret1", "doctor").unwrap();
    assert_eq!(
        form,
        RegistrationForm {
            given_name: "Ana".to_owned(),
            family_name: "García".to_owned(),
            email: "ana@example.com".to_owned(),
            password: "secret1".to_owned(),
            role: Role::Doctor,
        }
    );
}

#[test]
fn parse_unknown_role_becomes_patient() {
    let form = RegistrationForm::parse("Ana", "García", "a@b.com", "secret1", "nurse").unwrap();
    assert_eq!(form.role, Role::Patient);
}

#[test]
fn parse_rejects_any_blank_field() {
    assert_eq!(
        RegistrationForm::parse("", "García", "a@b.com", "secret1", "patient"),
        Err("Completa todos los campos.")
    );
    assert_eq!(RegistrationForm::parse("Ana", "  ", "a@b.com", "secret1", "patient"), Err(MISSING_FIELDS));
    assert_eq!(RegistrationForm::parse("Ana", "García", " ", "secret1", "patient"), Err(MISSING_FIELDS));
    assert_eq!(RegistrationForm::parse("Ana", "García", "a@b.com", "", "patient"), Err(MISSING_FIELDS));
}

#[test]
fn parse_leaves_short_passwords_to_the_backend() {
    let form = RegistrationForm::parse("Ana", "García", "a@b.com", "123", "patient").unwrap();
    assert_eq!(form.password, "123");
}
