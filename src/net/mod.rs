//! Networking and data-source modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth_backend` defines the credential-backend contract, `firebase`
//! implements it over REST, and `clinical` supplies dashboard data.

pub mod auth_backend;
pub mod clinical;
pub mod firebase;
