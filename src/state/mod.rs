//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `clinical`) so components can depend
//! on small focused models. `session_store` is the only writer of session
//! state.

pub mod clinical;
pub mod session;
pub mod session_store;
