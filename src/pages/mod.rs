//! Route-level page components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `app.rs` maps each route to one of these pages. Everything except login
//! and registration is wrapped in the access gate.

pub mod doctor_results;
pub mod home;
pub mod login;
pub mod patient_results;
pub mod register;
