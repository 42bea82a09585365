//! # Hashing Utilities
//!
//! The transaction model uses exactly two hash functions, each with a
//! fixed role, and refuses to support more without a very good reason:
//!
//! - **SHA3-256** — transaction identifiers. The content hash of a
//!   transaction's canonical encoding, rendered as 64 lowercase hex
//!   characters. This digest is the integrity contract of the whole
//!   system: every distributable transaction carries it, and every decoder
//!   recomputes it.
//!
//! - **SHA-256** — condition fingerprints and hash-locks. The condition
//!   scheme is SHA-256-based by contract; a fulfillment proves it spends a
//!   specific condition by fingerprint equality, and a hash-lock is opened
//!   by revealing a preimage whose SHA-256 matches the stored digest.
//!
//! The two roles never mix. A transaction id is not a condition
//! fingerprint and the type signatures keep it that way: identifiers are
//! hex `String`s over canonical text, fingerprints are raw `[u8; 32]`.

use sha2::{Digest, Sha256};
use sha3::Sha3_256;

/// Compute the SHA-256 hash of the input data.
///
/// Returns a fixed-size 32-byte digest. Used for condition fingerprints
/// and hash-lock preimage checks.
///
/// # Example
///
/// ```
/// use opal_ledger::crypto::sha256;
///
/// let digest = sha256(b"opal ledger");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHA-256 rendered as 64 lowercase hex characters.
///
/// Convenience for fingerprint URIs, where the digest travels as text.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Compute the SHA3-256 hash of a canonical string, hex-encoded.
///
/// This is the transaction identifier digest. The input is always the
/// canonical serialization of a transaction's signature-stripped content
/// (see [`crate::canonical`]); the output is the `id` field of the wire
/// form. 64 lowercase hex characters, always.
///
/// # Example
///
/// ```
/// use opal_ledger::crypto::sha3_256_hex;
///
/// let id = sha3_256_hex("{\"a\":1}");
/// assert_eq!(id.len(), 64);
/// ```
pub fn sha3_256_hex(data: &str) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string — the canonical test vector.
        let digest = sha256(b"");
        assert_eq!(
            hex::encode(digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_deterministic() {
        assert_eq!(sha256(b"opal"), sha256(b"opal"));
        assert_ne!(sha256(b"opal"), sha256(b"Opal"));
    }

    #[test]
    fn sha256_hex_matches_raw() {
        let raw = sha256(b"fingerprint me");
        assert_eq!(sha256_hex(b"fingerprint me"), hex::encode(raw));
    }

    #[test]
    fn sha3_known_vector() {
        // SHA3-256 of the empty string, per FIPS 202.
        assert_eq!(
            sha3_256_hex(""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn sha3_is_not_sha2() {
        // The two digest roles must never be interchangeable.
        assert_ne!(sha3_256_hex("opal"), hex::encode(sha256(b"opal")));
    }

    #[test]
    fn sha3_hex_shape() {
        let id = sha3_256_hex("{\"transaction\":{}}");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, id.to_lowercase());
    }
}
