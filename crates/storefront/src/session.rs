//! Explicit session state.
//!
//! Session state (bearer token plus logged-in client profile) is a plain
//! value passed by reference to every component that needs it. Absence of a
//! token is tolerated for read-only catalog browsing.

use secrecy::{ExposeSecret, SecretString};

use crate::models::ClientProfile;

/// The current user session.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    client: Option<ClientProfile>,
}

impl Session {
    /// A tokenless session for guest browsing.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// An authenticated session carrying a bearer token and profile.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, client: ClientProfile) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            client: Some(client),
        }
    }

    /// Whether the session carries a bearer token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The logged-in client profile, if any.
    #[must_use]
    pub const fn client(&self) -> Option<&ClientProfile> {
        self.client.as_ref()
    }

    /// The raw bearer token for the `Authorization` header.
    #[must_use]
    pub(crate) fn bearer_token(&self) -> Option<&str> {
        self.token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Drop the token and profile, returning to a guest session.
    pub fn logout(&mut self) {
        self.token = None;
        self.client = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field(
                "token",
                &self.token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("client", &self.client)
            .finish()
    }
}
