//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render page chrome and the access gate while reading shared
//! session state from Leptos context providers.

pub mod nav_bar;
pub mod protected_route;
pub mod severity_bar;
