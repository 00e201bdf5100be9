//! Registration page: names, credentials and role.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppSession;
use crate::state::session::Role;

const MISSING_FIELDS: &str = "Completa todos los campos.";

/// Validated registration input.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RegistrationForm {
    given_name: String,
    family_name: String,
    email: String,
    password: String,
    role: Role,
}

impl RegistrationForm {
    /// Names and email are trimmed; the password is taken as typed.
    fn parse(
        given_name: &str,
        family_name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Self, &'static str> {
        let given_name = given_name.trim();
        let family_name = family_name.trim();
        let email = email.trim();
        if given_name.is_empty() || family_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(MISSING_FIELDS);
        }
        Ok(Self {
            given_name: given_name.to_owned(),
            family_name: family_name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            role: Role::from_stored(Some(role)),
        })
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();

    let given_name = RwSignal::new(String::new());
    let family_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Patient.as_str().to_owned());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match RegistrationForm::parse(
            &given_name.get(),
            &family_name.get(),
            &email.get(),
            &password.get(),
            &role.get(),
        ) {
            Ok(form) => form,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        let session = session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let result = session
                .register(&form.given_name, &form.family_name, &form.email, &form.password, form.role)
                .await;
            match result {
                Ok(()) => navigate("/", NavigateOptions::default()),
                Err(err) => info.set(err.to_string()),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Vitalytics"</h1>
                <p class="login-card__subtitle">"Crear cuenta"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Nombre"
                        prop:value=move || given_name.get()
                        on:input=move |ev| given_name.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Apellidos"
                        prop:value=move || family_name.get()
                        on:input=move |ev| family_name.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="email"
                        placeholder="tu@correo.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Contraseña"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <select
                        class="login-input"
                        prop:value=move || role.get()
                        on:change=move |ev| role.set(event_target_value(&ev))
                    >
                        <option value=Role::Patient.as_str()>{Role::Patient.label()}</option>
                        <option value=Role::Doctor.as_str()>{Role::Doctor.label()}</option>
                    </select>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Registrarse"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "¿Ya tienes cuenta? "
                    <a href="/login">"Inicia sesión"</a>
                </p>
            </div>
        </div>
    }
}
