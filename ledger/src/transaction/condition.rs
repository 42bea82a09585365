//! Conditions: the locking half of the ledger's spend primitive.
//!
//! A [`Condition`] is a spendable output — an asset share locked to one or
//! more owners under a signature scheme. The lock itself is a
//! [`ConditionTree`]: a single Ed25519 key, a hash-lock, or a threshold
//! over an ordered set of child trees, nested to any depth.
//!
//! One recursive type serves both roles of the protocol: the *unsigned*
//! tree is the condition (the lock), and the same tree with signatures or
//! a revealed preimage filled in is the fulfillment (the claim that opens
//! the lock). The two are tied together by the fingerprint: a SHA-256
//! digest over the signature-stripped structured form, so a signed claim
//! fingerprints identically to the condition it opens.
//!
//! Subcondition order is significant and preserved across encode/decode —
//! signing locates leaves by public key, but two trees with the same
//! leaves in different order are different locks.

use serde_json::Value;

use crate::canonical;
use crate::crypto::hash::sha256;
use crate::crypto::keys::{OpalPublicKey, OpalSignature};

use super::error::TransactionError;

/// Wire tag for a simple-signature leaf.
const TYPE_ED25519: &str = "ed25519-sha-256";
/// Wire tag for a preimage hash-lock leaf.
const TYPE_PREIMAGE: &str = "preimage-sha-256";
/// Wire tag for a threshold node.
const TYPE_THRESHOLD: &str = "threshold-sha-256";

// ---------------------------------------------------------------------------
// ConditionTree
// ---------------------------------------------------------------------------

/// A recursive cryptographic lock, and — once signatures or a preimage are
/// filled in — the claim that opens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionTree {
    /// A single public key under the simple signature scheme.
    Ed25519 {
        public_key: OpalPublicKey,
        /// `None` while unsigned; installed by the signing pipeline.
        signature: Option<OpalSignature>,
    },
    /// A hash-lock: opened by revealing a preimage whose SHA-256 matches
    /// `hash`, independent of any signature.
    HashLock {
        hash: [u8; 32],
        /// `None` while locked; the revealed secret when fulfilled.
        preimage: Option<Vec<u8>>,
    },
    /// Satisfied when at least `threshold` of the ordered subconditions
    /// are individually satisfied.
    Threshold {
        threshold: u32,
        subconditions: Vec<ConditionTree>,
    },
}

impl ConditionTree {
    /// An unsigned simple-signature leaf for `public_key`.
    pub fn ed25519(public_key: OpalPublicKey) -> Self {
        Self::Ed25519 {
            public_key,
            signature: None,
        }
    }

    /// An unopened hash-lock over the SHA-256 of `secret`.
    pub fn hash_lock(secret: &[u8]) -> Self {
        Self::HashLock {
            hash: sha256(secret),
            preimage: None,
        }
    }

    /// A fulfilled hash-lock revealing `secret` as the preimage.
    pub fn fulfilled_hash_lock(secret: &[u8]) -> Self {
        Self::HashLock {
            hash: sha256(secret),
            preimage: Some(secret.to_vec()),
        }
    }

    /// The wire tag of this node.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Ed25519 { .. } => TYPE_ED25519,
            Self::HashLock { .. } => TYPE_PREIMAGE,
            Self::Threshold { .. } => TYPE_THRESHOLD,
        }
    }

    /// Whether any signature or preimage has been installed anywhere in
    /// the tree. Distinguishes a claim that signing has begun on from a
    /// fully unsigned one.
    pub fn has_signatures(&self) -> bool {
        match self {
            Self::Ed25519 { signature, .. } => signature.is_some(),
            Self::HashLock { preimage, .. } => preimage.is_some(),
            Self::Threshold { subconditions, .. } => {
                subconditions.iter().any(Self::has_signatures)
            }
        }
    }

    /// Whether an Ed25519 leaf for `public_key` exists anywhere in the
    /// tree (depth-first).
    pub fn contains_key(&self, public_key: &OpalPublicKey) -> bool {
        match self {
            Self::Ed25519 { public_key: pk, .. } => pk == public_key,
            Self::HashLock { .. } => false,
            Self::Threshold { subconditions, .. } => {
                subconditions.iter().any(|sub| sub.contains_key(public_key))
            }
        }
    }

    /// Install `signature` into the first Ed25519 leaf matching
    /// `public_key`, searching depth-first. Returns whether a leaf was
    /// found. Re-signing overwrites the previous signature.
    pub(crate) fn sign_leaf(
        &mut self,
        public_key: &OpalPublicKey,
        signature: OpalSignature,
    ) -> bool {
        match self {
            Self::Ed25519 {
                public_key: pk,
                signature: slot,
            } if pk == public_key => {
                *slot = Some(signature);
                true
            }
            Self::Threshold { subconditions, .. } => {
                for sub in subconditions.iter_mut() {
                    if sub.sign_leaf(public_key, signature.clone()) {
                        return true;
                    }
                }
                false
            }
            _ => false,
        }
    }

    /// Validate this claim against a signing payload.
    ///
    /// Ed25519 leaves require a present, verifying signature; hash-locks a
    /// present, matching preimage; threshold nodes at least `threshold`
    /// recursively valid subconditions. An unsigned tree is never valid.
    pub fn validate_message(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => signature
                .as_ref()
                .is_some_and(|sig| public_key.verify(message, sig)),
            Self::HashLock { hash, preimage } => preimage
                .as_ref()
                .is_some_and(|secret| sha256(secret) == *hash),
            Self::Threshold {
                threshold,
                subconditions,
            } => {
                let satisfied = subconditions
                    .iter()
                    .filter(|sub| sub.validate_message(message))
                    .count();
                satisfied >= *threshold as usize
            }
        }
    }

    /// The structured wire form, signatures and preimages included.
    pub fn to_value(&self) -> Value {
        self.value_impl(false)
    }

    /// The signature-stripped structured form — the projection both the
    /// fingerprint and the condition `details` field are computed over.
    pub fn stripped_value(&self) -> Value {
        self.value_impl(true)
    }

    fn value_impl(&self, strip: bool) -> Value {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => serde_json::json!({
                "type": TYPE_ED25519,
                "public_key": public_key.to_base58(),
                "signature": if strip {
                    Value::Null
                } else {
                    signature
                        .as_ref()
                        .map_or(Value::Null, |sig| Value::String(sig.to_hex()))
                },
            }),
            Self::HashLock { hash, preimage } => serde_json::json!({
                "type": TYPE_PREIMAGE,
                "hash": hex::encode(hash),
                "preimage": if strip {
                    Value::Null
                } else {
                    preimage
                        .as_ref()
                        .map_or(Value::Null, |secret| Value::String(hex::encode(secret)))
                },
            }),
            Self::Threshold {
                threshold,
                subconditions,
            } => serde_json::json!({
                "type": TYPE_THRESHOLD,
                "threshold": threshold,
                "subconditions": subconditions
                    .iter()
                    .map(|sub| sub.value_impl(strip))
                    .collect::<Vec<_>>(),
            }),
        }
    }

    /// Parse the structured wire form back into a tree.
    ///
    /// Strict: unknown type tags, missing fields, malformed key or
    /// signature encodings, and out-of-range thresholds are all rejected.
    /// Validation treats a rejection as an invalid fulfillment; decode
    /// treats it as an [`TransactionError::InvalidSignature`].
    pub fn from_value(value: &Value) -> Result<Self, TransactionError> {
        let malformed = |reason: &str| TransactionError::InvalidSignature {
            reason: reason.to_string(),
        };

        let obj = value.as_object().ok_or_else(|| malformed("claim is not an object"))?;
        let type_tag = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing type tag"))?;

        match type_tag {
            TYPE_ED25519 => {
                let public_key = obj
                    .get("public_key")
                    .and_then(Value::as_str)
                    .ok_or_else(|| malformed("missing public_key"))?;
                let public_key = OpalPublicKey::from_base58(public_key)
                    .map_err(|_| malformed("malformed public_key"))?;
                let signature = match obj.get("signature") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(
                        OpalSignature::from_hex(s).map_err(|_| malformed("malformed signature"))?,
                    ),
                    Some(_) => return Err(malformed("signature is not a string")),
                };
                Ok(Self::Ed25519 {
                    public_key,
                    signature,
                })
            }
            TYPE_PREIMAGE => {
                let hash_hex = obj
                    .get("hash")
                    .and_then(Value::as_str)
                    .ok_or_else(|| malformed("missing hash"))?;
                let hash_bytes =
                    hex::decode(hash_hex).map_err(|_| malformed("malformed hash"))?;
                let hash: [u8; 32] = hash_bytes
                    .try_into()
                    .map_err(|_| malformed("hash is not 32 bytes"))?;
                let preimage = match obj.get("preimage") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => {
                        Some(hex::decode(s).map_err(|_| malformed("malformed preimage"))?)
                    }
                    Some(_) => return Err(malformed("preimage is not a string")),
                };
                Ok(Self::HashLock { hash, preimage })
            }
            TYPE_THRESHOLD => {
                let threshold = obj
                    .get("threshold")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| malformed("missing threshold"))?;
                let subs = obj
                    .get("subconditions")
                    .and_then(Value::as_array)
                    .ok_or_else(|| malformed("missing subconditions"))?;
                let subconditions = subs
                    .iter()
                    .map(Self::from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                if threshold < 1 || threshold as usize > subconditions.len() {
                    return Err(malformed("threshold out of range"));
                }
                Ok(Self::Threshold {
                    threshold: threshold as u32,
                    subconditions,
                })
            }
            _ => Err(malformed("unknown claim type")),
        }
    }

    /// The SHA-256 fingerprint over the signature-stripped canonical form.
    ///
    /// Identical for a condition and any (partial or complete) fulfillment
    /// of it — this equality is what proves a fulfillment spends exactly
    /// the output it references.
    pub fn fingerprint(&self) -> [u8; 32] {
        sha256(canonical::serialize(&self.stripped_value()).as_bytes())
    }

    /// The fingerprint rendered as a condition URI:
    /// `cc:<type-name>:<hex fingerprint>`.
    pub fn condition_uri(&self) -> String {
        format!("cc:{}:{}", self.type_name(), hex::encode(self.fingerprint()))
    }
}

// ---------------------------------------------------------------------------
// OwnerSpec
// ---------------------------------------------------------------------------

/// An owner specification handed to [`Condition::generate`]: either a
/// bare public key or a nested group with an optional explicit threshold
/// (defaulting to "all members must sign").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerSpec {
    /// A single owner key, becoming an Ed25519 leaf.
    Key(OpalPublicKey),
    /// A nested group, becoming a threshold subtree.
    Group {
        /// Minimum satisfied members; defaults to all of them.
        threshold: Option<u32>,
        members: Vec<OwnerSpec>,
    },
}

impl OwnerSpec {
    /// A group where every member must sign.
    pub fn group(members: Vec<OwnerSpec>) -> Self {
        Self::Group {
            threshold: None,
            members,
        }
    }

    /// A group where at least `threshold` members must sign.
    pub fn group_with_threshold(threshold: u32, members: Vec<OwnerSpec>) -> Self {
        Self::Group {
            threshold: Some(threshold),
            members,
        }
    }

    /// Collect every public key in the specification, depth-first.
    fn collect_keys(&self, out: &mut Vec<OpalPublicKey>) {
        match self {
            Self::Key(pk) => out.push(pk.clone()),
            Self::Group { members, .. } => {
                for member in members {
                    member.collect_keys(out);
                }
            }
        }
    }
}

impl From<OpalPublicKey> for OwnerSpec {
    fn from(pk: OpalPublicKey) -> Self {
        Self::Key(pk)
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// A spendable output: a lock, the keys entitled to open it, and an
/// amount. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The unsigned lock.
    pub claim: ConditionTree,
    /// The owning public keys. `None` for hash-locks, which are opened by
    /// whoever knows the secret rather than by named keys.
    pub owners_after: Option<Vec<OpalPublicKey>>,
    /// The asset share locked by this condition. Always positive.
    pub amount: u64,
}

impl Condition {
    pub fn new(claim: ConditionTree, owners_after: Option<Vec<OpalPublicKey>>, amount: u64) -> Self {
        Self {
            claim,
            owners_after,
            amount,
        }
    }

    /// Build a [`ConditionTree`] from an owner specification.
    ///
    /// A single bare key produces an Ed25519 leaf. Anything else produces
    /// a root threshold node whose minimum defaults to the entry count
    /// (all must sign), with each entry folded into a leaf or a recursive
    /// subtree.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the specification is empty, a nested group has
    /// fewer than two members, or an explicit threshold falls outside
    /// `1..=len`.
    pub fn generate(
        spec: &[OwnerSpec],
        threshold: Option<u32>,
    ) -> Result<ConditionTree, TransactionError> {
        if spec.is_empty() {
            return Err(TransactionError::invalid_argument(
                "owner specification must not be empty",
            ));
        }
        if spec.len() == 1 {
            if let OwnerSpec::Key(pk) = &spec[0] {
                if threshold.is_some_and(|t| t != 1) {
                    return Err(TransactionError::invalid_argument(
                        "threshold must be 1 for a single-owner condition",
                    ));
                }
                return Ok(ConditionTree::ed25519(pk.clone()));
            }
        }
        let minimum = threshold.unwrap_or(spec.len() as u32);
        if minimum < 1 || minimum as usize > spec.len() {
            return Err(TransactionError::invalid_argument(format!(
                "threshold {} out of range for {} subconditions",
                minimum,
                spec.len()
            )));
        }
        let subconditions = spec
            .iter()
            .map(Self::fold_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ConditionTree::Threshold {
            threshold: minimum,
            subconditions,
        })
    }

    fn fold_spec(spec: &OwnerSpec) -> Result<ConditionTree, TransactionError> {
        match spec {
            OwnerSpec::Key(pk) => Ok(ConditionTree::ed25519(pk.clone())),
            OwnerSpec::Group { threshold, members } => {
                // A single-entry sublist is meaningless nesting.
                if members.len() < 2 {
                    return Err(TransactionError::invalid_argument(
                        "a nested owner group requires at least two members",
                    ));
                }
                let minimum = threshold.unwrap_or(members.len() as u32);
                if minimum < 1 || minimum as usize > members.len() {
                    return Err(TransactionError::invalid_argument(format!(
                        "threshold {} out of range for {} group members",
                        minimum,
                        members.len()
                    )));
                }
                let subconditions = members
                    .iter()
                    .map(Self::fold_spec)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ConditionTree::Threshold {
                    threshold: minimum,
                    subconditions,
                })
            }
        }
    }

    /// A condition locking amount 1 to the given owners: generated tree,
    /// flattened owner keys.
    pub fn from_owners(spec: &[OwnerSpec]) -> Result<Self, TransactionError> {
        let claim = Self::generate(spec, None)?;
        let mut owners = Vec::new();
        for entry in spec {
            entry.collect_keys(&mut owners);
        }
        Ok(Self::new(claim, Some(owners), 1))
    }

    /// A hash-lock condition over `secret`, owned by no named key.
    pub fn with_hash_lock(secret: &[u8]) -> Self {
        Self::new(ConditionTree::hash_lock(secret), None, 1)
    }

    /// This condition's fingerprint URI.
    pub fn uri(&self) -> String {
        self.claim.condition_uri()
    }

    /// The wire form at position `cid`.
    pub fn to_value(&self, cid: u64) -> Value {
        serde_json::json!({
            "cid": cid,
            "owners_after": self.owners_after,
            "amount": self.amount,
            "condition": {
                "details": self.claim.stripped_value(),
                "uri": self.uri(),
            },
        })
    }

    /// Decode the wire form. The `cid` is positional and ignored; the
    /// `uri` is rederived from the details rather than trusted.
    pub fn from_value(value: &Value) -> Result<Self, TransactionError> {
        let obj = value.as_object().ok_or_else(|| {
            TransactionError::invalid_argument("condition is not an object")
        })?;
        let details = obj
            .get("condition")
            .and_then(|c| c.get("details"))
            .ok_or_else(|| TransactionError::invalid_argument("missing condition details"))?;
        let claim = ConditionTree::from_value(details).map_err(|e| {
            TransactionError::invalid_argument(format!("malformed condition details: {e}"))
        })?;
        let owners_after = match obj.get("owners_after") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .ok_or_else(|| {
                                TransactionError::invalid_argument("owner is not a string")
                            })
                            .and_then(|s| {
                                OpalPublicKey::from_base58(s).map_err(|_| {
                                    TransactionError::invalid_argument("malformed owner key")
                                })
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => {
                return Err(TransactionError::invalid_argument(
                    "owners_after is not a list",
                ))
            }
        };
        let amount = obj
            .get("amount")
            .and_then(Value::as_u64)
            .ok_or_else(|| TransactionError::invalid_argument("missing or malformed amount"))?;
        if amount == 0 {
            return Err(TransactionError::invalid_argument(
                "amount must be positive",
            ));
        }
        Ok(Self::new(claim, owners_after, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::OpalKeypair;

    fn key(seed: u8) -> OpalPublicKey {
        OpalKeypair::from_seed(&[seed; 32]).public_key()
    }

    #[test]
    fn generate_single_key_is_leaf() {
        let tree = Condition::generate(&[OwnerSpec::Key(key(1))], None).unwrap();
        assert!(matches!(tree, ConditionTree::Ed25519 { .. }));
    }

    #[test]
    fn generate_two_keys_is_all_must_sign_threshold() {
        let tree =
            Condition::generate(&[OwnerSpec::Key(key(1)), OwnerSpec::Key(key(2))], None).unwrap();
        match tree {
            ConditionTree::Threshold {
                threshold,
                subconditions,
            } => {
                assert_eq!(threshold, 2);
                assert_eq!(subconditions.len(), 2);
            }
            other => panic!("expected threshold root, got {:?}", other),
        }
    }

    #[test]
    fn generate_explicit_threshold() {
        let tree = Condition::generate(
            &[OwnerSpec::Key(key(1)), OwnerSpec::Key(key(2))],
            Some(1),
        )
        .unwrap();
        assert!(matches!(tree, ConditionTree::Threshold { threshold: 1, .. }));
    }

    #[test]
    fn generate_nested_group() {
        let spec = [
            OwnerSpec::Key(key(1)),
            OwnerSpec::group(vec![OwnerSpec::Key(key(2)), OwnerSpec::Key(key(3))]),
        ];
        let tree = Condition::generate(&spec, None).unwrap();
        match tree {
            ConditionTree::Threshold {
                threshold,
                subconditions,
            } => {
                assert_eq!(threshold, 2);
                assert!(matches!(subconditions[0], ConditionTree::Ed25519 { .. }));
                assert!(matches!(
                    subconditions[1],
                    ConditionTree::Threshold { threshold: 2, .. }
                ));
            }
            other => panic!("expected threshold root, got {:?}", other),
        }
    }

    #[test]
    fn generate_empty_spec_fails() {
        let err = Condition::generate(&[], None).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn generate_single_member_group_fails() {
        let spec = [
            OwnerSpec::Key(key(1)),
            OwnerSpec::group(vec![OwnerSpec::Key(key(2))]),
        ];
        let err = Condition::generate(&spec, None).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn generate_out_of_range_threshold_fails() {
        let spec = [OwnerSpec::Key(key(1)), OwnerSpec::Key(key(2))];
        assert!(Condition::generate(&spec, Some(3)).is_err());
        assert!(Condition::generate(&spec, Some(0)).is_err());
    }

    #[test]
    fn subcondition_order_changes_fingerprint() {
        let ab =
            Condition::generate(&[OwnerSpec::Key(key(1)), OwnerSpec::Key(key(2))], None).unwrap();
        let ba =
            Condition::generate(&[OwnerSpec::Key(key(2)), OwnerSpec::Key(key(1))], None).unwrap();
        assert_ne!(ab.fingerprint(), ba.fingerprint());
    }

    #[test]
    fn fingerprint_ignores_signatures() {
        let kp = OpalKeypair::from_seed(&[9u8; 32]);
        let mut tree = ConditionTree::ed25519(kp.public_key());
        let unsigned_uri = tree.condition_uri();
        assert!(tree.sign_leaf(&kp.public_key(), kp.sign(b"payload")));
        assert_eq!(tree.condition_uri(), unsigned_uri);
    }

    #[test]
    fn condition_uri_shape() {
        let uri = ConditionTree::ed25519(key(1)).condition_uri();
        assert!(uri.starts_with("cc:ed25519-sha-256:"));
        assert_eq!(uri.len(), "cc:ed25519-sha-256:".len() + 64);
    }

    #[test]
    fn structured_form_roundtrip_with_signatures() {
        let kp = OpalKeypair::from_seed(&[3u8; 32]);
        let mut tree = ConditionTree::Threshold {
            threshold: 1,
            subconditions: vec![
                ConditionTree::ed25519(kp.public_key()),
                ConditionTree::ed25519(key(4)),
            ],
        };
        tree.sign_leaf(&kp.public_key(), kp.sign(b"payload"));

        let reparsed = ConditionTree::from_value(&tree.to_value()).unwrap();
        assert_eq!(reparsed, tree);
        assert!(reparsed.has_signatures());
    }

    #[test]
    fn from_value_rejects_garbage() {
        assert!(ConditionTree::from_value(&serde_json::json!("not an object")).is_err());
        assert!(ConditionTree::from_value(&serde_json::json!({"type": "unknown"})).is_err());
        assert!(ConditionTree::from_value(&serde_json::json!({
            "type": "ed25519-sha-256",
            "public_key": "not-base58-!!!",
            "signature": null,
        }))
        .is_err());
        // Threshold larger than its subcondition count.
        assert!(ConditionTree::from_value(&serde_json::json!({
            "type": "threshold-sha-256",
            "threshold": 3,
            "subconditions": [],
        }))
        .is_err());
    }

    #[test]
    fn sign_leaf_targets_matching_key_only() {
        let kp1 = OpalKeypair::from_seed(&[5u8; 32]);
        let kp2 = OpalKeypair::from_seed(&[6u8; 32]);
        let mut tree = ConditionTree::Threshold {
            threshold: 2,
            subconditions: vec![
                ConditionTree::ed25519(kp1.public_key()),
                ConditionTree::ed25519(kp2.public_key()),
            ],
        };
        assert!(tree.sign_leaf(&kp2.public_key(), kp2.sign(b"m")));
        match &tree {
            ConditionTree::Threshold { subconditions, .. } => {
                assert!(!subconditions[0].has_signatures());
                assert!(subconditions[1].has_signatures());
            }
            _ => unreachable!(),
        }
        assert!(!tree.sign_leaf(&key(99), kp1.sign(b"m")));
    }

    #[test]
    fn validate_threshold_counts_satisfied_children() {
        let kp1 = OpalKeypair::from_seed(&[11u8; 32]);
        let kp2 = OpalKeypair::from_seed(&[12u8; 32]);
        let message = b"spend it";

        let mut tree = ConditionTree::Threshold {
            threshold: 2,
            subconditions: vec![
                ConditionTree::ed25519(kp1.public_key()),
                ConditionTree::ed25519(kp2.public_key()),
            ],
        };
        assert!(!tree.validate_message(message));

        tree.sign_leaf(&kp1.public_key(), kp1.sign(message));
        assert!(!tree.validate_message(message), "1-of-2 must not satisfy a 2-of-2");

        tree.sign_leaf(&kp2.public_key(), kp2.sign(message));
        assert!(tree.validate_message(message));
    }

    #[test]
    fn validate_hash_lock() {
        let locked = ConditionTree::hash_lock(b"open sesame");
        assert!(!locked.validate_message(b"anything"));

        let opened = ConditionTree::fulfilled_hash_lock(b"open sesame");
        assert!(opened.validate_message(b"anything"));
        assert_eq!(opened.condition_uri(), locked.condition_uri());

        let wrong = ConditionTree::HashLock {
            hash: sha256(b"open sesame"),
            preimage: Some(b"wrong secret".to_vec()),
        };
        assert!(!wrong.validate_message(b"anything"));
    }

    #[test]
    fn condition_wire_roundtrip() {
        let cond = Condition::from_owners(&[
            OwnerSpec::Key(key(1)),
            OwnerSpec::group(vec![OwnerSpec::Key(key(2)), OwnerSpec::Key(key(3))]),
        ])
        .unwrap();
        let decoded = Condition::from_value(&cond.to_value(0)).unwrap();
        assert_eq!(decoded, cond);
        assert_eq!(
            decoded.owners_after.as_ref().unwrap(),
            &vec![key(1), key(2), key(3)]
        );
    }

    #[test]
    fn hash_lock_condition_has_no_owners() {
        let cond = Condition::with_hash_lock(b"secret");
        assert!(cond.owners_after.is_none());
        let wire = cond.to_value(0);
        assert_eq!(wire["owners_after"], Value::Null);
        let decoded = Condition::from_value(&wire).unwrap();
        assert_eq!(decoded, cond);
    }

    #[test]
    fn condition_from_value_rejects_zero_amount() {
        let mut wire = Condition::from_owners(&[OwnerSpec::Key(key(1))])
            .unwrap()
            .to_value(0);
        wire["amount"] = serde_json::json!(0);
        assert!(Condition::from_value(&wire).is_err());
    }
}
