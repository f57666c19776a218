//! Confirmation tokens for row state transitions.
//!
//! The listing only links to transitions; whoever performs one must call
//! [`ConfirmationIssuer::verify`] with the token carried by the link.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("confirmation token is not valid hex")]
    Malformed,
    #[error("confirmation token does not match the action")]
    Mismatch,
}

/// Issues and checks opaque tokens bound to one action on one site.
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationIssuer: Send + Sync {
    fn issue(&self, action: &str, site_id: i64) -> String;

    fn verify(&self, action: &str, site_id: i64, token: &str) -> Result<(), ConfirmationError>;
}

/// HMAC-SHA256 over `<action>:<site id>`.
pub struct HmacConfirmationIssuer {
    secret: String,
}

impl HmacConfirmationIssuer {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    fn mac(&self, action: &str, site_id: i64) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(action.as_bytes());
        mac.update(b":");
        mac.update(site_id.to_string().as_bytes());
        mac
    }
}

impl ConfirmationIssuer for HmacConfirmationIssuer {
    fn issue(&self, action: &str, site_id: i64) -> String {
        hex::encode(self.mac(action, site_id).finalize().into_bytes())
    }

    fn verify(&self, action: &str, site_id: i64, token: &str) -> Result<(), ConfirmationError> {
        let bytes = hex::decode(token).map_err(|_| ConfirmationError::Malformed)?;
        self.mac(action, site_id)
            .verify_slice(&bytes)
            .map_err(|_| ConfirmationError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> HmacConfirmationIssuer {
        HmacConfirmationIssuer::new("test-signing-secret".to_string())
    }

    #[test]
    fn test_issued_token_verifies() {
        let issuer = issuer();
        let token = issuer.issue("archiveblog", 12);

        assert_eq!(token.len(), 64);
        assert_eq!(issuer.verify("archiveblog", 12, &token), Ok(()));
    }

    #[test]
    fn test_token_is_bound_to_action_and_site() {
        let issuer = issuer();
        let token = issuer.issue("archiveblog", 12);

        assert_eq!(
            issuer.verify("deleteblog", 12, &token),
            Err(ConfirmationError::Mismatch)
        );
        assert_eq!(
            issuer.verify("archiveblog", 13, &token),
            Err(ConfirmationError::Mismatch)
        );
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(
            issuer().verify("archiveblog", 12, "not-hex"),
            Err(ConfirmationError::Malformed)
        );
    }

    #[test]
    fn test_secret_matters() {
        let other = HmacConfirmationIssuer::new("other".to_string());
        let token = other.issue("spamblog", 3);

        assert_eq!(
            issuer().verify("spamblog", 3, &token),
            Err(ConfirmationError::Mismatch)
        );
    }
}
