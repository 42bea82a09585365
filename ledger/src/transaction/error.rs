//! Error types for transaction construction, signing, and decoding.
//!
//! Only programmer errors and integrity violations surface as errors.
//! Untrusted input failing validation — a corrupt claim, a signature that
//! doesn't verify, a fingerprint mismatch — is an expected outcome and is
//! reported as a boolean `false` by the validation pipeline, never raised.

use thiserror::Error;

/// Errors raised by the transaction model.
///
/// Each variant maps to a specific contract violation. The message carries
/// enough context for debugging without leaking key material.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Malformed constructor input: wrong shape, an empty required
    /// collection, or mismatched collection lengths.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A required private key is missing for a public key that must sign,
    /// or a named owner cannot be located inside a threshold claim.
    /// Signing aborts; previously installed signatures remain.
    #[error("public key {public_key} is not matched by any supplied private key or subcondition")]
    KeypairMismatch { public_key: String },

    /// A claim's serialized form could not be parsed back into a
    /// structured claim during decode of a fulfillment.
    #[error("malformed fulfillment claim: {reason}")]
    InvalidSignature { reason: String },

    /// A decoded transaction's stated identifier does not match its
    /// recomputed identifier. The transaction must be rejected before any
    /// other field is trusted.
    #[error("transaction id mismatch: expected {expected}, got {actual}")]
    InvalidHash { expected: String, actual: String },

    /// A builder path intentionally left unimplemented.
    #[error("not supported: {feature}")]
    NotSupported { feature: String },
}

impl TransactionError {
    /// Shorthand for [`TransactionError::InvalidArgument`].
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
