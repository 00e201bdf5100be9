//! # vitalytics
//!
//! Leptos + WASM front-end for patient symptom tracking and doctor review.
//!
//! The session store tracks who is signed in and with which role; the access
//! gate keeps protected pages behind it. Authentication goes through a
//! pluggable backend (`net::auth_backend`) with an Identity Toolkit REST
//! implementation in `net::firebase`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: logging, panic hook, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialised: {err}").into());
    }
    leptos::mount::mount_to_body(app::App);
}
