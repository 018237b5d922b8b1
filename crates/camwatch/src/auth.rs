//! Login flow orchestration.
//!
//! The [`Authenticator`] drives the whole sequence: validate inputs, submit
//! credentials, persist the session into the caller-selected scope, resolve
//! the device, and roll everything back if the device cannot be resolved.
//! Session and device binding are created together and destroyed together;
//! from the user's perspective login is atomic.
//!
//! A monotonically increasing attempt counter guards against the
//! logout-during-login race: `logout` bumps the counter, and a login attempt
//! whose id no longer matches discards its writes instead of resurrecting
//! state that was just cleared.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::api::AuthApi;
use crate::device::{self, DeviceBinding};
use crate::error::{Error, Result};
use crate::session::{Scope, Session, SessionStore};

/// The result of a fully successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The persisted session.
    pub session: Session,
    /// The resolved device binding.
    pub device: DeviceBinding,
}

/// Orchestrates credential submission, session persistence and device
/// binding over a pluggable [`AuthApi`].
#[derive(Debug)]
pub struct Authenticator<A> {
    api: A,
    attempt: AtomicU64,
}

impl<A: AuthApi> Authenticator<A> {
    /// Create an authenticator over the given API client.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            attempt: AtomicU64::new(0),
        }
    }

    /// The underlying API client.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn superseded(&self, attempt: u64) -> bool {
        self.attempt.load(Ordering::SeqCst) != attempt
    }

    /// Run the full login flow.
    ///
    /// `remember` selects the storage scope: persistent when set, ephemeral
    /// otherwise. On device-resolution failure both scopes are cleared and
    /// [`Error::DeviceNotRegistered`] is returned; no partial session
    /// survives.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when email or password is empty (no request
    ///   is issued);
    /// - [`Error::AuthFailed`] when the server rejects the credentials or
    ///   the attempt was superseded by a logout;
    /// - [`Error::DeviceNotRegistered`] when the device lookup fails after
    ///   a successful credential check (the session is rolled back).
    pub async fn login(
        &self,
        store: &SessionStore,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome> {
        if email.trim().is_empty() {
            return Err(Error::validation("email", "must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation("password", "must not be empty"));
        }

        let attempt = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        let scope = if remember {
            Scope::Persistent
        } else {
            Scope::Ephemeral
        };

        let response = self.api.login(email, password).await?;
        let user = response.user.sanitized();

        if self.superseded(attempt) {
            warn!("Login attempt superseded before session write; discarding");
            return Err(Error::auth_failed("login attempt was superseded"));
        }
        store.write(scope, &response.token, &user)?;

        let binding = match device::resolve(&self.api, &user.devices).await {
            Ok(binding) => binding,
            Err(err) => {
                // Login is rejected post-hoc: a session without a resolved
                // device must not survive.
                warn!("Device resolution failed, rolling back login: {err}");
                store.clear()?;
                return Err(err);
            }
        };

        if self.superseded(attempt) {
            warn!("Login attempt superseded after device resolution; discarding");
            store.clear()?;
            return Err(Error::auth_failed("login attempt was superseded"));
        }
        store.write_device(&binding)?;

        info!("Login complete for {} ({scope} scope)", user.email);
        Ok(LoginOutcome {
            session: Session {
                token: response.token,
                user,
                scope,
            },
            device: binding,
        })
    }

    /// Destroy the session: bump the attempt counter so in-flight logins
    /// discard their writes, then empty both storage scopes.
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent delete fails.
    pub fn logout(&self, store: &SessionStore) -> Result<()> {
        self.attempt.fetch_add(1, Ordering::SeqCst);
        store.clear()?;
        info!("Logged out");
        Ok(())
    }
}
