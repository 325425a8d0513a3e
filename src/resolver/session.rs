//! Best-effort catalog authentication
//!
//! One gate is built at startup and shared by every request. The flag only
//! moves false -> true; concurrent first calls may each attempt a login,
//! which is harmless.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::api::Catalog;
use crate::config::Config;

/// What `ensure` observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    AlreadyAuthenticated,
    Authenticated,
    /// Continuing unauthenticated
    Degraded(String),
}

/// Lazily-authenticated session state
pub struct SessionGate {
    credentials: Option<(String, String)>,
    authenticated: AtomicBool,
    missing_reported: AtomicBool,
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("has_credentials", &self.credentials.is_some())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionGate {
    /// Gate with the given credentials; empty values count as missing
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        let login = login.into();
        let password = password.into();
        let credentials = if login.is_empty() || password.is_empty() {
            None
        } else {
            Some((login, password))
        };

        Self {
            credentials,
            authenticated: AtomicBool::new(false),
            missing_reported: AtomicBool::new(false),
        }
    }

    /// Gate that never logs in
    pub fn anonymous() -> Self {
        Self::new("", "")
    }

    pub fn from_config(config: &Config) -> Self {
        match config.credentials() {
            Some((login, password)) => Self::new(login, password),
            None => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    /// Log in once if credentials are configured. Never fails: problems are
    /// logged and the caller proceeds unauthenticated.
    pub async fn ensure<C: Catalog + ?Sized>(&self, catalog: &C) -> AuthOutcome {
        if self.is_authenticated() {
            return AuthOutcome::AlreadyAuthenticated;
        }

        let Some((login, password)) = &self.credentials else {
            let reason = "HDREZKA_LOGIN / HDREZKA_PASSWORD not set, skipping login";
            if !self.missing_reported.swap(true, Ordering::Relaxed) {
                warn!("{}", reason);
            } else {
                debug!("{}", reason);
            }
            return AuthOutcome::Degraded(reason.to_string());
        };

        match catalog.login(login, password).await {
            Ok(()) => {
                self.authenticated.store(true, Ordering::Release);
                info!("Login successful");
                AuthOutcome::Authenticated
            }
            Err(e) => {
                warn!(error = %e, "Login failed, continuing unauthenticated");
                AuthOutcome::Degraded(format!("Login failed: {}", e))
            }
        }
    }
}
