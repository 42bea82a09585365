//! The transaction signing pipeline.
//!
//! Signing walks the (fulfillment, condition) pairs in index order. For
//! each pair it derives the signing payload from a minimal partial
//! transaction carrying only that pair, then drives the claim: a simple
//! leaf gets one signature from the sole owner's key, a threshold claim
//! gets one signature per owner installed into that owner's leaf, and a
//! hash-lock is skipped (it is not signature-bearing).
//!
//! Each signed fulfillment is built as a new owned value and installed by
//! index substitution — a clone of the pre-signing fulfillment held by a
//! caller is never written through, so there is no way to corrupt a
//! signature via a shared handle.

use std::collections::HashMap;

use tracing::debug;

use crate::crypto::keys::{OpalKeypair, OpalPublicKey};

use super::builder::Transaction;
use super::condition::ConditionTree;
use super::error::TransactionError;
use super::fulfillment::Fulfillment;

impl Transaction {
    /// Sign every fulfillment with the matching private keys.
    ///
    /// The supplied keypairs are matched to `owners_before` entries via
    /// their derived public keys. Signing a threshold claim with only a
    /// subset of its owners' keys present fails with `KeypairMismatch`;
    /// partial signatures installed before the failing index remain, and
    /// the intermediate (not-yet-valid) state is observable.
    ///
    /// Re-signing overwrites: Ed25519 is deterministic, so signing the
    /// same content with the same key is an exact overwrite, and signing
    /// with a different matching key replaces the previous signature.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` — no private keys supplied.
    /// - `KeypairMismatch` — an owner has no matching private key, or a
    ///   threshold claim has no leaf for a named owner.
    pub fn sign(&mut self, private_keys: &[OpalKeypair]) -> Result<&mut Self, TransactionError> {
        if private_keys.is_empty() {
            return Err(TransactionError::invalid_argument(
                "at least one private key is required for signing",
            ));
        }

        // Public key -> keypair, so owners_before entries resolve to the
        // private key that must sign for them.
        let key_pairs: HashMap<OpalPublicKey, &OpalKeypair> = private_keys
            .iter()
            .map(|kp| (kp.public_key(), kp))
            .collect();

        let pair_count = self.fulfillments.len().min(self.conditions.len());
        for index in 0..pair_count {
            let payload = self.partial(index).signing_payload();
            let signed = Self::sign_fulfillment(
                &self.fulfillments[index],
                payload.as_bytes(),
                &key_pairs,
            )?;
            // Index substitution, never mutation through a shared handle.
            self.fulfillments[index] = signed;
            debug!(index, "fulfillment signed");
        }
        Ok(self)
    }

    /// Produce a signed copy of one fulfillment.
    fn sign_fulfillment(
        fulfillment: &Fulfillment,
        payload: &[u8],
        key_pairs: &HashMap<OpalPublicKey, &OpalKeypair>,
    ) -> Result<Fulfillment, TransactionError> {
        let mut signed = fulfillment.clone();
        let Some(claim) = signed.claim.as_mut() else {
            // A decoded, fully unsigned fulfillment has no claim left to
            // drive; leave it as-is and let validation fail it.
            return Ok(signed);
        };

        match claim {
            ConditionTree::Ed25519 { .. } => {
                let owner = signed
                    .owners_before
                    .first()
                    .cloned()
                    .ok_or_else(|| {
                        TransactionError::invalid_argument("owners_before must not be empty")
                    })?;
                let keypair =
                    key_pairs
                        .get(&owner)
                        .ok_or_else(|| TransactionError::KeypairMismatch {
                            public_key: owner.to_base58(),
                        })?;
                claim.sign_leaf(&owner, keypair.sign(payload));
            }
            ConditionTree::Threshold { .. } => {
                for owner in &fulfillment.owners_before {
                    if !claim.contains_key(owner) {
                        return Err(TransactionError::KeypairMismatch {
                            public_key: owner.to_base58(),
                        });
                    }
                    let keypair =
                        key_pairs
                            .get(owner)
                            .ok_or_else(|| TransactionError::KeypairMismatch {
                                public_key: owner.to_base58(),
                            })?;
                    claim.sign_leaf(owner, keypair.sign(payload));
                }
            }
            // Hash-locks are opened by a preimage, not a signature.
            ConditionTree::HashLock { .. } => {}
        }
        Ok(signed)
    }
}
