//! Fulfillments: the unlocking half of the ledger's spend primitive.
//!
//! A [`Fulfillment`] claims a previously created condition. It wraps the
//! claim tree (unsigned at construction, signed by the signing pipeline),
//! the public keys expected to sign it, and — for transfers — a link back
//! to the condition being spent. For creations the link is absent and the
//! claim is self-certifying.

use serde_json::Value;

use crate::crypto::keys::OpalPublicKey;

use super::condition::{Condition, ConditionTree};
use super::error::TransactionError;
use super::types::TransactionLink;

/// A claim presented to unlock a condition.
///
/// Values are immutable from the caller's perspective: the signing
/// pipeline never mutates a fulfillment in place, it builds a signed copy
/// and substitutes it into the transaction by index. A clone held by a
/// caller therefore never changes underneath them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fulfillment {
    /// The claim tree. `None` only for fulfillments decoded from a wire
    /// form whose claim field was null (fully unsigned); such a
    /// fulfillment always fails validation.
    pub claim: Option<ConditionTree>,
    /// The public keys entitled to unlock the referenced condition.
    /// Never empty.
    pub owners_before: Vec<OpalPublicKey>,
    /// The condition this fulfillment spends; absent for creations.
    pub input: Option<TransactionLink>,
}

impl Fulfillment {
    /// A new unsigned fulfillment.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `owners_before` is empty.
    pub fn new(
        claim: ConditionTree,
        owners_before: Vec<OpalPublicKey>,
        input: Option<TransactionLink>,
    ) -> Result<Self, TransactionError> {
        if owners_before.is_empty() {
            return Err(TransactionError::invalid_argument(
                "owners_before must not be empty",
            ));
        }
        Ok(Self {
            claim: Some(claim),
            owners_before,
            input,
        })
    }

    /// An unsigned fulfillment spending `condition`, which sits at index
    /// `cid` of transaction `txid`.
    ///
    /// The claim is the condition's own (unsigned) tree — fingerprint
    /// equality with the spent condition holds by construction — and the
    /// spenders are the condition's owners.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a hash-lock condition: it names no owner keys
    /// to sign with, so a spender must build the fulfillment with the
    /// revealed preimage instead.
    pub fn spending(
        condition: &Condition,
        txid: impl Into<String>,
        cid: u64,
    ) -> Result<Self, TransactionError> {
        let owners = condition.owners_after.clone().ok_or_else(|| {
            TransactionError::invalid_argument(
                "a hash-lock condition has no owners to convert into spenders",
            )
        })?;
        Self::new(
            condition.claim.clone(),
            owners,
            Some(TransactionLink::new(txid, cid)),
        )
    }

    /// The wire form at position `fid`.
    ///
    /// The claim field carries the structured claim once signing has
    /// begun, and null while the claim is fully unsigned — so the encoded
    /// form of a fresh fulfillment is identical to its signature-stripped
    /// projection.
    pub fn to_value(&self, fid: u64) -> Value {
        let claim_value = match &self.claim {
            Some(claim) if claim.has_signatures() => claim.to_value(),
            _ => Value::Null,
        };
        serde_json::json!({
            "fid": fid,
            "owners_before": self.owners_before,
            "input": self
                .input
                .as_ref()
                .map_or(Value::Null, TransactionLink::to_value),
            "fulfillment": claim_value,
        })
    }

    /// Decode the wire form. The `fid` is positional and ignored.
    ///
    /// # Errors
    ///
    /// `InvalidSignature` if the claim field is present but cannot be
    /// parsed back into a structured claim; `InvalidArgument` for any
    /// other malformed field.
    pub fn from_value(value: &Value) -> Result<Self, TransactionError> {
        let obj = value.as_object().ok_or_else(|| {
            TransactionError::invalid_argument("fulfillment is not an object")
        })?;

        let owners = obj
            .get("owners_before")
            .and_then(Value::as_array)
            .ok_or_else(|| TransactionError::invalid_argument("missing owners_before"))?;
        let owners_before = owners
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| TransactionError::invalid_argument("owner is not a string"))
                    .and_then(|s| {
                        OpalPublicKey::from_base58(s).map_err(|_| {
                            TransactionError::invalid_argument("malformed owner key")
                        })
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if owners_before.is_empty() {
            return Err(TransactionError::invalid_argument(
                "owners_before must not be empty",
            ));
        }

        let claim = match obj.get("fulfillment") {
            None | Some(Value::Null) => None,
            Some(value) => Some(ConditionTree::from_value(value)?),
        };

        let link = TransactionLink::from_value(obj.get("input").unwrap_or(&Value::Null));
        let input = link.is_present().then_some(link);

        Ok(Self {
            claim,
            owners_before,
            input,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::OpalKeypair;
    use crate::transaction::condition::OwnerSpec;

    fn keypair(seed: u8) -> OpalKeypair {
        OpalKeypair::from_seed(&[seed; 32])
    }

    #[test]
    fn new_rejects_empty_owners() {
        let tree = ConditionTree::ed25519(keypair(1).public_key());
        let err = Fulfillment::new(tree, vec![], None).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn unsigned_claim_encodes_to_null() {
        let kp = keypair(1);
        let f = Fulfillment::new(
            ConditionTree::ed25519(kp.public_key()),
            vec![kp.public_key()],
            None,
        )
        .unwrap();
        let wire = f.to_value(0);
        assert_eq!(wire["fulfillment"], Value::Null);
        assert_eq!(wire["input"], Value::Null);
        assert_eq!(wire["fid"], serde_json::json!(0));
    }

    #[test]
    fn signed_claim_encodes_structured_form() {
        let kp = keypair(1);
        let mut tree = ConditionTree::ed25519(kp.public_key());
        tree.sign_leaf(&kp.public_key(), kp.sign(b"payload"));
        let f = Fulfillment {
            claim: Some(tree.clone()),
            owners_before: vec![kp.public_key()],
            input: None,
        };
        let wire = f.to_value(0);
        assert_eq!(wire["fulfillment"], tree.to_value());
    }

    #[test]
    fn wire_roundtrip_signed() {
        let kp = keypair(2);
        let mut tree = ConditionTree::ed25519(kp.public_key());
        tree.sign_leaf(&kp.public_key(), kp.sign(b"payload"));
        let f = Fulfillment {
            claim: Some(tree),
            owners_before: vec![kp.public_key()],
            input: Some(TransactionLink::new("some-txid", 3)),
        };
        let decoded = Fulfillment::from_value(&f.to_value(0)).unwrap();
        assert_eq!(decoded, f);
    }

    #[test]
    fn wire_roundtrip_unsigned_loses_claim() {
        // An unsigned claim serializes to null, so it does not survive a
        // round-trip. Validation of such a fulfillment fails closed.
        let kp = keypair(3);
        let f = Fulfillment::new(
            ConditionTree::ed25519(kp.public_key()),
            vec![kp.public_key()],
            None,
        )
        .unwrap();
        let decoded = Fulfillment::from_value(&f.to_value(0)).unwrap();
        assert!(decoded.claim.is_none());
        assert_eq!(decoded.owners_before, f.owners_before);
    }

    #[test]
    fn malformed_claim_is_invalid_signature() {
        let kp = keypair(4);
        let wire = serde_json::json!({
            "fid": 0,
            "owners_before": [kp.public_key().to_base58()],
            "input": null,
            "fulfillment": {"type": "ed25519-sha-256", "public_key": "garbage!!"},
        });
        let err = Fulfillment::from_value(&wire).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidSignature { .. }));
    }

    #[test]
    fn spending_converts_condition_owners() {
        let alice = keypair(5);
        let bob = keypair(6);
        let cond = Condition::from_owners(&[
            OwnerSpec::Key(alice.public_key()),
            OwnerSpec::Key(bob.public_key()),
        ])
        .unwrap();
        let f = Fulfillment::spending(&cond, "txid-1", 0).unwrap();
        assert_eq!(
            f.owners_before,
            vec![alice.public_key(), bob.public_key()]
        );
        assert_eq!(f.input, Some(TransactionLink::new("txid-1", 0)));
        assert_eq!(
            f.claim.as_ref().unwrap().condition_uri(),
            cond.uri(),
            "the spending claim must fingerprint to the spent condition"
        );
    }

    #[test]
    fn spending_a_hash_lock_fails() {
        let cond = Condition::with_hash_lock(b"secret");
        assert!(Fulfillment::spending(&cond, "txid-1", 0).is_err());
    }
}
