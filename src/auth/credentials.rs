//! In-memory session credentials.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// The tokens for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Lock-free credential holder, read on every outgoing request.
///
/// Swapped whole on login/refresh, cleared on logout or irrecoverable 401.
#[derive(Debug, Default)]
pub struct CredentialCache {
    inner: ArcSwapOption<SessionCredentials>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .load()
            .as_ref()
            .map(|creds| creds.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .load()
            .as_ref()
            .and_then(|creds| creds.refresh_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Replace the whole credential set.
    pub fn set(&self, credentials: SessionCredentials) {
        self.inner.store(Some(Arc::new(credentials)));
    }

    /// Replace the access token, keeping any stored refresh token.
    pub fn set_access(&self, access_token: &str) {
        let refresh_token = self.refresh_token();
        self.set(SessionCredentials {
            access_token: access_token.to_string(),
            refresh_token,
        });
    }

    pub fn clear(&self) {
        self.inner.store(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache() {
        let cache = CredentialCache::new();
        assert!(!cache.is_authenticated());
        assert!(cache.access_token().is_none());
        assert!(cache.refresh_token().is_none());
    }

    #[test]
    fn test_set_and_clear() {
        let cache = CredentialCache::new();
        cache.set(SessionCredentials {
            access_token: "a1".to_string(),
            refresh_token: Some("r1".to_string()),
        });

        assert_eq!(cache.access_token().as_deref(), Some("a1"));
        assert_eq!(cache.refresh_token().as_deref(), Some("r1"));

        cache.clear();
        assert!(!cache.is_authenticated());
    }

    #[test]
    fn test_set_access_keeps_refresh() {
        let cache = CredentialCache::new();
        cache.set(SessionCredentials {
            access_token: "a1".to_string(),
            refresh_token: Some("r1".to_string()),
        });

        cache.set_access("a2");
        assert_eq!(cache.access_token().as_deref(), Some("a2"));
        assert_eq!(cache.refresh_token().as_deref(), Some("r1"));
    }
}
