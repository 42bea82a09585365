//! # Cryptographic Primitives for OPAL
//!
//! Every signing operation and every hash in the transaction model flows
//! through here. The choices are deliberately boring:
//!
//! - **Ed25519** for signatures — deterministic, compact, well-audited.
//! - **SHA-256** for condition fingerprints and hash-locks — the condition
//!   scheme is SHA-256 by contract, so interoperating implementations
//!   agree on lock identity.
//! - **SHA3-256** for transaction identifiers — the content-hash digest of
//!   the canonical encoding.
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, go read
//! about timing attacks first and come back when you've lost the urge.

pub mod hash;
pub mod keys;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use hash::{sha256, sha256_hex, sha3_256_hex};
pub use keys::{KeyError, OpalKeypair, OpalPublicKey, OpalSignature};
