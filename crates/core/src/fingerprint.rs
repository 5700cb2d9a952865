//! Visitor fingerprint derivation.
//!
//! A fingerprint is an opaque identifier correlating anonymous visits from
//! the same browser. Clients normally compute their own and send it with
//! the session request; when none is supplied, the server derives one from
//! the request headers that are stable across page loads of a browser
//! session (User-Agent and Accept-Language).

use sha2::{Digest, Sha256};

/// Length of a derived fingerprint in hex characters.
pub const DERIVED_FINGERPRINT_LEN: usize = 32;

/// Derive a stable fingerprint from browser-identifying request headers.
///
/// The derivation is deterministic: the same header values always produce
/// the same fingerprint. Missing headers are passed as empty strings.
pub fn derive(user_agent: &str, accept_language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(b"\n");
    hasher.update(accept_language.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..DERIVED_FINGERPRINT_LEN].to_string()
}
