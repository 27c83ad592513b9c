//! `X-Line-Signature` verification.
//!
//! LINE signs every webhook body with HMAC-SHA256 keyed by the channel
//! secret and sends the base64-encoded digest in the `X-Line-Signature`
//! header.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Errors that can occur verifying a webhook signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// No signature header on the request.
    #[error("missing {SIGNATURE_HEADER} header")]
    Missing,

    /// Header is not valid base64.
    #[error("malformed signature")]
    Malformed,

    /// Signature does not match the body.
    #[error("signature verification failed")]
    Mismatch,

    /// Channel secret unusable as an HMAC key.
    #[error("invalid channel secret: {0}")]
    InvalidKey(String),
}

/// Verify `signature` (base64) against `body` using constant-time comparison.
pub fn verify_signature(
    channel_secret: &[u8],
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), SignatureError> {
    let signature = signature.ok_or(SignatureError::Missing)?;
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| SignatureError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(channel_secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);

    // Constant-time verification (via hmac crate's `verify_slice`)
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the signature LINE would send for `body`.
pub fn sign(channel_secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(channel_secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
