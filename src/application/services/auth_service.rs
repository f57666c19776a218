//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::permissions::Viewer;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when it stores new tokens.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves Bearer and cookie tokens to a [`Viewer`].
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// lookup. A database dump alone cannot be used to forge or verify tokens.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
    main_site_id: i64,
}

impl AuthService {
    /// # Arguments
    ///
    /// - `repository` - token repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    /// - `main_site_id` - the network's main site, which no viewer may delete
    pub fn new(
        repository: Arc<dyn TokenRepository>,
        signing_secret: String,
        main_site_id: i64,
    ) -> Self {
        Self {
            repository,
            signing_secret,
            main_site_id,
        }
    }

    /// Authenticates a raw token and returns the viewer it identifies.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure to do so
    /// is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<Viewer, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let Some(api_token) = self.repository.find_active_by_hash(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(api_token.id).await {
            tracing::warn!(token_id = api_token.id, error = %e, "Failed to update last_used_at");
        }

        Ok(Viewer::new(
            api_token.id,
            api_token.name,
            api_token.capabilities,
            self.main_site_id,
        ))
    }
}
