//! GitHub webhook signature verification using HMAC-SHA1.
//!
//! GitHub signs each delivery with the shared webhook secret and sends the
//! result in the `X-Hub-Signature` header as `sha1=<hex>`. The expected header
//! is recomputed from the raw body and compared in constant time, byte for
//! byte, so any change to the body or to the header text fails verification.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Prefix GitHub puts in front of the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha1=";

/// Why a signed request was refused.
///
/// Both variants map to HTTP 403; only the response text differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A secret is configured but the request carried no signature.
    #[error("missing X-Hub-Signature required for HMAC verification")]
    Missing,

    /// The signature does not match the body.
    #[error("HMAC verification failed")]
    Mismatch,
}

/// Computes the HMAC-SHA1 of `payload` keyed with `secret`.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a digest as a GitHub-style header value (`sha1=<lowercase hex>`).
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("{SIGNATURE_PREFIX}{}", hex::encode(signature))
}

/// Checks `signature_header` against `payload`.
///
/// An empty `secret` means verification is not configured: every request is
/// accepted whatever header it carries. An absent or empty header with a
/// configured secret is [`SignatureError::Missing`].
///
/// # Examples
///
/// ```
/// use listener::signature::{compute_signature, format_signature_header, verify_signature};
///
/// let body = br#"{"action":"published"}"#;
/// let header = format_signature_header(&compute_signature(body, b"abc123"));
///
/// assert!(verify_signature(b"abc123", body, Some(&header)).is_ok());
/// assert!(verify_signature(b"other", body, Some(&header)).is_err());
/// assert!(verify_signature(b"", body, None).is_ok());
/// ```
pub fn verify_signature(
    secret: &[u8],
    payload: &[u8],
    signature_header: Option<&str>,
) -> Result<(), SignatureError> {
    if secret.is_empty() {
        return Ok(());
    }

    let provided = match signature_header {
        Some(header) if !header.is_empty() => header,
        _ => return Err(SignatureError::Missing),
    };

    let expected = format_signature_header(&compute_signature(payload, secret));
    if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Boolean form of [`verify_signature`].
pub fn verify(secret: &[u8], payload: &[u8], signature_header: Option<&str>) -> bool {
    verify_signature(secret, payload, signature_header).is_ok()
}
