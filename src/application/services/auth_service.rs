//! API token verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 under the server signing secret.
///
/// Tokens are stored only as MACs: read access to the database is not enough
/// to verify or forge a credential without the server-side secret. Returns a
/// 64-character lowercase hex string.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves bearer tokens to owner identities.
///
/// This service only consumes credentials minted elsewhere (the admin CLI);
/// it never issues them.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// # Arguments
    ///
    /// - `repository` - token storage
    /// - `signing_secret` - HMAC key; must match the value used when the
    ///   tokens were minted
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Resolves a raw bearer token to its owner id.
    ///
    /// Returns `Ok(None)` for unknown or revoked tokens; the HTTP layer
    /// treats that as an anonymous caller rather than a hard failure. On a
    /// match, the token's `last_used_at` is updated best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn identify(&self, token: &str) -> Result<Option<i64>, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let Some(owner_id) = self.repository.find_owner_by_hash(&token_hash).await? else {
            return Ok(None);
        };

        let _ = self.repository.update_last_used(&token_hash).await;

        Ok(Some(owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;

    const SECRET: &str = "test-signing-secret";

    #[tokio::test]
    async fn test_identify_known_token() {
        let mut repo = MockTokenRepository::new();

        let expected_hash = hash_token(SECRET, "valid-token");

        repo.expect_find_owner_by_hash()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(Some(42)));

        repo.expect_update_last_used().times(1).returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(repo), SECRET.to_string());

        assert_eq!(service.identify("valid-token").await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_identify_unknown_token() {
        let mut repo = MockTokenRepository::new();

        repo.expect_find_owner_by_hash()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_update_last_used().times(0);

        let service = AuthService::new(Arc::new(repo), SECRET.to_string());

        assert_eq!(service.identify("bogus").await.unwrap(), None);
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let h1 = hash_token(SECRET, "token");
        let h2 = hash_token(SECRET, "token");

        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_hash_token_depends_on_secret_and_input() {
        assert_ne!(hash_token(SECRET, "a"), hash_token(SECRET, "b"));
        assert_ne!(hash_token("secret-a", "t"), hash_token("secret-b", "t"));
    }
}
