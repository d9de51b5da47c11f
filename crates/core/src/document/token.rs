//! Share-token issuance and verification.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{DocumentError, MSG_INVALID_TOKEN, MSG_LINK_EXPIRED};
use super::types::SharedLink;
use crate::cache::ExpiringCache;

/// Default token lifetime (1 hour).
const DEFAULT_TTL_SECS: u64 = 3600;

/// Issues and verifies expiring share tokens.
///
/// A token moves through exactly one lifecycle: issued, valid until its
/// expiry, then permanently invalid. There is no revocation; reclamation is
/// left to the store's expiration. The store instance is owned by whoever
/// constructs it and injected into the broker, never ambient state.
pub struct TokenStore {
    tokens: ExpiringCache<String, DateTime<Utc>>,
    ttl: Duration,
}

impl TokenStore {
    /// Creates a token store with the default 1-hour token lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Creates a token store with a custom token lifetime.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: ExpiringCache::new(ttl),
            ttl,
        }
    }

    /// Issues a share token for a document.
    ///
    /// The token is a freshly generated UUID, globally unique, stored against
    /// its absolute expiry. The returned URL embeds the document id in the
    /// path and the token as a query parameter.
    #[must_use]
    pub fn issue(&self, base_url: &str, document_id: &str) -> SharedLink {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::hours(1));

        self.tokens.insert(token.clone(), expires_at);

        SharedLink {
            url: format!(
                "{}/documents/preview-link/{document_id}?token={token}",
                base_url.trim_end_matches('/')
            ),
            token,
            expires_at,
        }
    }

    /// Verifies a share token.
    ///
    /// A missing or empty token passes: direct access without a token is
    /// public by policy, and callers may omit it. A present token must
    /// resolve in the store to a non-expired timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized("invalid or expired token")` when the token does
    /// not resolve, and `Unauthorized("link expired")` when it resolves but
    /// its stored expiry has passed. The two reasons stay distinguishable.
    pub fn verify(&self, token: Option<&str>) -> Result<(), DocumentError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        match self.tokens.get(token) {
            None => Err(DocumentError::Unauthorized(MSG_INVALID_TOKEN.into())),
            Some(expires_at) if expires_at < Utc::now() => {
                Err(DocumentError::Unauthorized(MSG_LINK_EXPIRED.into()))
            }
            Some(_) => Ok(()),
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
