//! Route guard for protected views.
//!
//! A guard starts in `Unknown`, performs one synchronous storage read, and
//! settles into `Authorized` or `Unauthorized`. `Unknown` exists as a real
//! state because the check runs after the view is mounted, not during its
//! first render; callers show a neutral placeholder while it lasts.
//!
//! Possession of any stored token is sufficient to pass; no server
//! round-trip happens here. The API itself remains the authority; a forged
//! token unlocks nothing beyond the UI shell.

use crate::error::Result;
use crate::session::SessionStore;

/// Authorization state of a guarded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// The check has not run yet; render a neutral placeholder.
    #[default]
    Unknown,
    /// A token was found; render the protected content.
    Authorized,
    /// No token; the visitor is being redirected to the login view.
    Unauthorized,
}

/// Where to send an unauthorized visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target path (the login view).
    pub to: String,
    /// Replace the current history entry so back-navigation cannot
    /// return to the guarded route.
    pub replace: bool,
}

/// The outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected children.
    Render,
    /// Redirect to the login view.
    Redirect(Redirect),
}

/// Gate for protected views, keyed on session presence.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    state: GuardState,
}

impl RouteGuard {
    /// Create a guard that redirects to the given login path.
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            state: GuardState::Unknown,
        }
    }

    /// Current state of the guard.
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Whether the check has not run yet (placeholder render).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == GuardState::Unknown
    }

    /// Run the check: one synchronous storage read, no network.
    ///
    /// A token in either scope authorizes and renders. No token means
    /// `Unauthorized` and a history-replacing redirect to the login path.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails; the guard stays in its
    /// previous state in that case.
    pub fn check(&mut self, store: &SessionStore) -> Result<GuardDecision> {
        if store.read_token()?.is_some() {
            self.state = GuardState::Authorized;
            Ok(GuardDecision::Render)
        } else {
            self.state = GuardState::Unauthorized;
            Ok(GuardDecision::Redirect(Redirect {
                to: self.login_path.clone(),
                replace: true,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::User;
    use crate::session::Scope;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role: "user".to_string(),
            devices: vec![],
            rtps: vec![],
            password: None,
        }
    }

    #[test]
    fn test_guard_starts_unknown() {
        let guard = RouteGuard::new("/login");
        assert_eq!(guard.state(), GuardState::Unknown);
        assert!(guard.is_pending());
    }

    #[test]
    fn test_guard_authorizes_with_persistent_token() {
        let store = SessionStore::open_in_memory().unwrap();
        store.write(Scope::Persistent, "tok", &sample_user()).unwrap();

        let mut guard = RouteGuard::new("/login");
        let decision = guard.check(&store).unwrap();

        assert_eq!(decision, GuardDecision::Render);
        assert_eq!(guard.state(), GuardState::Authorized);
        assert!(!guard.is_pending());
    }

    #[test]
    fn test_guard_authorizes_with_ephemeral_token() {
        let store = SessionStore::open_in_memory().unwrap();
        store.write(Scope::Ephemeral, "tok", &sample_user()).unwrap();

        let mut guard = RouteGuard::new("/login");
        assert_eq!(guard.check(&store).unwrap(), GuardDecision::Render);
    }

    #[test]
    fn test_guard_redirects_on_empty_store() {
        let store = SessionStore::open_in_memory().unwrap();

        let mut guard = RouteGuard::new("/login");
        let decision = guard.check(&store).unwrap();

        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                to: "/login".to_string(),
                replace: true,
            })
        );
        assert_eq!(guard.state(), GuardState::Unauthorized);
    }

    #[test]
    fn test_guard_unauthorized_after_clear() {
        let store = SessionStore::open_in_memory().unwrap();
        store.write(Scope::Persistent, "tok", &sample_user()).unwrap();
        store.clear().unwrap();

        let mut guard = RouteGuard::new("/login");
        assert!(matches!(
            guard.check(&store).unwrap(),
            GuardDecision::Redirect(_)
        ));
    }

    #[test]
    fn test_guard_clear_is_idempotent_for_checks() {
        let store = SessionStore::open_in_memory().unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        let mut guard = RouteGuard::new("/login");
        assert_eq!(guard.state(), GuardState::Unknown);
        assert!(matches!(
            guard.check(&store).unwrap(),
            GuardDecision::Redirect(_)
        ));
    }

    #[test]
    fn test_guard_uses_configured_login_path() {
        let store = SessionStore::open_in_memory().unwrap();
        let mut guard = RouteGuard::new("/auth/signin");

        let GuardDecision::Redirect(redirect) = guard.check(&store).unwrap() else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.to, "/auth/signin");
        assert!(redirect.replace);
    }
}
