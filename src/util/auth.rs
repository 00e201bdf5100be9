//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes apply one precedence: loading, then error, then login
//! redirect, then content. The decision and the slow-load notice timer are
//! kept free of DOM and timer types so they can be tested directly.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::time::Duration;

use crate::state::session::{Role, SessionState};

/// Route the access gate redirects to when nobody is signed in.
pub const LOGIN_ROUTE: &str = "/login";

/// Notice shown when loading runs past the notice delay.
pub const SLOW_LOAD_NOTICE: &str = "La carga está tomando más tiempo de lo esperado. Por favor, actualice la página.";

/// What a protected route should render for the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Loading { show_notice: bool },
    Error(String),
    RedirectToLogin,
    Content,
}

/// Pick the single presentation for `state`.
pub fn decide(state: &SessionState, notice_due: bool) -> GateDecision {
    if state.is_loading {
        GateDecision::Loading { show_notice: notice_due }
    } else if let Some(message) = &state.last_error {
        GateDecision::Error(message.clone())
    } else if state.identity.is_none() {
        GateDecision::RedirectToLogin
    } else {
        GateDecision::Content
    }
}

/// True when a page reserved for `required` should bounce the viewer home.
///
/// Only applies once a signed-in identity is known; the gate owns the
/// signed-out case.
pub fn should_redirect_role(state: &SessionState, required: Role) -> bool {
    state.role().is_some_and(|role| role != required)
}

/// Home route for each role's dashboard.
pub fn dashboard_route(role: Role) -> &'static str {
    match role {
        Role::Doctor => "/doctor/resultados",
        Role::Patient => "/resultados",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NoticePhase {
    Armed,
    Shown,
    Cancelled,
}

/// Slow-load notice timer, measured from mount.
///
/// Armed at mount while loading; shows once the delay has elapsed with loading
/// uninterrupted; cancelled for good by unmount or by loading ending first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadingNotice {
    delay: Duration,
    phase: NoticePhase,
}

impl LoadingNotice {
    pub fn on_mount(is_loading: bool, delay: Duration) -> Self {
        let phase = if is_loading { NoticePhase::Armed } else { NoticePhase::Cancelled };
        Self { delay, phase }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a timer should still be pending.
    pub fn is_armed(&self) -> bool {
        self.phase == NoticePhase::Armed
    }

    pub fn is_visible(&self) -> bool {
        self.phase == NoticePhase::Shown
    }

    pub fn on_loading_changed(&mut self, is_loading: bool) {
        if !is_loading && self.phase == NoticePhase::Armed {
            self.phase = NoticePhase::Cancelled;
        }
    }

    pub fn on_unmount(&mut self) {
        if self.phase == NoticePhase::Armed {
            self.phase = NoticePhase::Cancelled;
        }
    }

    /// Advance the clock to `since_mount`; returns true if the notice just appeared.
    pub fn on_elapsed(&mut self, since_mount: Duration) -> bool {
        if self.phase == NoticePhase::Armed && since_mount >= self.delay {
            self.phase = NoticePhase::Shown;
            return true;
        }
        false
    }
}
