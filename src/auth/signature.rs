//! HMAC-SHA384 signature generation for the Bitfinex WebSocket `auth` event.
//!
//! The v1 handshake signs a payload of the form:
//! ```text
//! "AUTH" + nonce
//! ```
//! with HMAC-SHA384 keyed by the raw API secret. The signature is sent
//! hex-encoded alongside the payload and the API key.

use hmac::{Hmac, Mac};
use sha2::Sha384;

use crate::auth::Credentials;
use crate::error::BitfinexError;

type HmacSha384 = Hmac<Sha384>;

/// A signed auth payload ready to be embedded in an `auth` request.
#[derive(Debug, Clone)]
pub struct AuthSignature {
    /// The payload that was signed ("AUTH" + nonce).
    pub payload: String,
    /// Hex-encoded HMAC-SHA384 of the payload.
    pub signature: String,
}

/// Sign an auth payload for the Bitfinex WebSocket handshake.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the secret
/// * `nonce` - The nonce value for this handshake
///
/// # Example
///
/// ```rust
/// use bitfinex_ws_client::auth::{Credentials, sign_auth_payload};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "api_secret");
/// let signed = sign_auth_payload(&credentials, 1616492376594)?;
/// assert!(signed.payload.starts_with("AUTH"));
/// # Ok(())
/// # }
/// ```
pub fn sign_auth_payload(
    credentials: &Credentials,
    nonce: u64,
) -> Result<AuthSignature, BitfinexError> {
    let payload = format!("AUTH{nonce}");

    let mut hmac = HmacSha384::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| BitfinexError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(payload.as_bytes());
    let hmac_result = hmac.finalize().into_bytes();

    Ok(AuthSignature {
        payload,
        signature: hex::encode(hmac_result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_shape() {
        let credentials = Credentials::new("test_key", "test_secret_key_for_signing");
        let signed = sign_auth_payload(&credentials, 1616492376594).unwrap();

        assert_eq!(signed.payload, "AUTH1616492376594");
        // HMAC-SHA384 produces 48 bytes, hex encoded = 96 chars.
        assert_eq!(signed.signature.len(), 96);
        assert!(signed.signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_consistency() {
        let credentials = Credentials::new("key", "my_secret");

        let sig1 = sign_auth_payload(&credentials, 12345).unwrap();
        let sig2 = sign_auth_payload(&credentials, 12345).unwrap();

        assert_eq!(sig1.signature, sig2.signature);
    }

    #[test]
    fn test_signature_changes_with_nonce() {
        let credentials = Credentials::new("key", "my_secret");

        let sig1 = sign_auth_payload(&credentials, 12345).unwrap();
        let sig2 = sign_auth_payload(&credentials, 12346).unwrap();

        assert_ne!(sig1.signature, sig2.signature);
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let sig1 = sign_auth_payload(&Credentials::new("key", "secret_a"), 12345).unwrap();
        let sig2 = sign_auth_payload(&Credentials::new("key", "secret_b"), 12345).unwrap();

        assert_ne!(sig1.signature, sig2.signature);
    }
}
