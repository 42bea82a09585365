//! The [`Transaction`] aggregate and its construction helpers.
//!
//! A transaction bundles fulfillments (inputs) and conditions (outputs)
//! under an operation, together with an asset descriptor and free-form
//! metadata. Construction goes through [`Transaction::create`] for new
//! assets and [`Transaction::transfer`] for spending prior outputs;
//! signing and validation live in their own modules, and the canonical
//! encode/decode pipeline in [`super::codec`].
//!
//! The identifier is never stored — it is re-derived from the content on
//! demand, which is what makes it impossible for a stored id to drift out
//! of sync with the fields it commits to.

use chrono::Utc;
use tracing::debug;

use crate::crypto::keys::OpalPublicKey;

use super::condition::{Condition, ConditionTree, OwnerSpec};
use super::error::TransactionError;
use super::fulfillment::Fulfillment;
use super::types::{Asset, Metadata, Operation};

/// The Unix time in seconds, string-encoded — the wire form of a
/// transaction timestamp.
fn gen_timestamp() -> String {
    Utc::now().timestamp().to_string()
}

/// A transfer of a digital asset between parties, as a pure value.
///
/// Lifecycle: build via [`create`](Self::create) /
/// [`transfer`](Self::transfer) (or [`new`](Self::new) for genesis and
/// decoded forms), extend via [`add_fulfillment`](Self::add_fulfillment) /
/// [`add_condition`](Self::add_condition), sign, then treat as immutable.
/// A signed transaction handed to other code must not be mutated further —
/// its identifier commits to every non-signature byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The operation kind. Immutable after construction.
    pub operation: Operation,
    /// The asset being created or transferred. A TRANSFER only restates
    /// the asset's identity on the wire.
    pub asset: Asset,
    /// The inputs, in significant order.
    pub fulfillments: Vec<Fulfillment>,
    /// The outputs, in significant order.
    pub conditions: Vec<Condition>,
    /// Optional free-form metadata.
    pub metadata: Option<Metadata>,
    /// String-encoded Unix seconds.
    pub timestamp: String,
    /// Transaction format version.
    pub version: u64,
}

impl Transaction {
    /// The current transaction format version.
    pub const VERSION: u64 = 1;

    /// Assemble a transaction from parts.
    ///
    /// `timestamp` and `version` default to "now" and
    /// [`VERSION`](Self::VERSION); decoders pass through the originals.
    pub fn new(
        operation: Operation,
        fulfillments: Vec<Fulfillment>,
        conditions: Vec<Condition>,
        asset: Asset,
        metadata: Option<Metadata>,
        timestamp: Option<String>,
        version: Option<u64>,
    ) -> Self {
        Self {
            operation,
            asset,
            fulfillments,
            conditions,
            metadata,
            timestamp: timestamp.unwrap_or_else(gen_timestamp),
            version: version.unwrap_or(Self::VERSION),
        }
    }

    /// Build a CREATE transaction: a new asset locked to its first owners.
    ///
    /// The common case is one sender and one or more recipients: the
    /// result carries one unsigned fulfillment over the sender's key and
    /// one condition generated from the recipient specification
    /// ([`Condition::generate`]). Passing a `secret` and no recipients
    /// instead produces a hash-lock condition, spendable by whoever can
    /// reveal the secret.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` — no senders; neither recipients nor a secret;
    ///   or both recipients and a secret.
    /// - `NotSupported` — more than one sender, or a `time_expire`
    ///   (timeout conditions are intentionally unimplemented).
    pub fn create(
        owners_before: &[OpalPublicKey],
        owners_after: &[OwnerSpec],
        metadata: Option<Metadata>,
        asset: Option<Asset>,
        secret: Option<&[u8]>,
        time_expire: Option<u64>,
    ) -> Result<Self, TransactionError> {
        if owners_before.is_empty() {
            return Err(TransactionError::invalid_argument(
                "owners_before must not be empty",
            ));
        }
        if time_expire.is_some() {
            return Err(TransactionError::NotSupported {
                feature: "time-expiring conditions".to_string(),
            });
        }
        if owners_before.len() > 1 {
            return Err(TransactionError::NotSupported {
                feature: "multi-sender asset creation".to_string(),
            });
        }

        let condition = match (owners_after.is_empty(), secret) {
            // Ordinary creation: recipients lock the new asset.
            (false, None) => Condition::from_owners(owners_after)?,
            // Hash-locked creation: no named recipients, a secret locks it.
            (true, Some(secret)) => Condition::with_hash_lock(secret),
            (false, Some(_)) => {
                return Err(TransactionError::invalid_argument(
                    "a hash-locked creation cannot also name recipients",
                ))
            }
            (true, None) => {
                return Err(TransactionError::invalid_argument(
                    "creation requires recipients or a hash-lock secret",
                ))
            }
        };

        let sender = owners_before[0].clone();
        let fulfillment = Fulfillment::new(
            ConditionTree::ed25519(sender),
            owners_before.to_vec(),
            None,
        )?;

        let tx = Self::new(
            Operation::Create,
            vec![fulfillment],
            vec![condition],
            asset.unwrap_or_default(),
            metadata,
            None,
            None,
        );
        debug!(asset_id = %tx.asset.id, "built CREATE transaction");
        Ok(tx)
    }

    /// Build a TRANSFER transaction: prior outputs spent to new owners.
    ///
    /// Each input (an unsigned fulfillment, typically obtained from
    /// [`to_inputs`](Self::to_inputs) on the prior transaction) maps 1:1
    /// to a new owner group; one condition is generated per group. The
    /// inputs are adopted unchanged as the new transaction's fulfillments.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if there are no inputs or the input and owner
    /// group counts differ.
    pub fn transfer(
        inputs: Vec<Fulfillment>,
        owners_after: &[Vec<OwnerSpec>],
        asset: Asset,
        metadata: Option<Metadata>,
    ) -> Result<Self, TransactionError> {
        if inputs.is_empty() {
            return Err(TransactionError::invalid_argument(
                "transfer requires at least one input",
            ));
        }
        if inputs.len() != owners_after.len() {
            return Err(TransactionError::invalid_argument(format!(
                "{} inputs cannot be distributed to {} owner groups",
                inputs.len(),
                owners_after.len()
            )));
        }

        let conditions = owners_after
            .iter()
            .map(|group| Condition::from_owners(group))
            .collect::<Result<Vec<_>, _>>()?;

        let tx = Self::new(
            Operation::Transfer,
            inputs,
            conditions,
            asset,
            metadata,
            None,
            None,
        );
        debug!(asset_id = %tx.asset.id, inputs = tx.fulfillments.len(), "built TRANSFER transaction");
        Ok(tx)
    }

    /// Convert this transaction's conditions into unsigned input
    /// fulfillments for a subsequent transfer.
    ///
    /// Each non-hash-lock condition becomes a fulfillment whose claim is
    /// the condition's own tree, whose spenders are the condition's
    /// owners, and whose input link points back here. Hash-lock conditions
    /// are skipped — they name no owner keys, and spending one requires
    /// building a fulfillment with the revealed preimage instead.
    pub fn to_inputs(&self) -> Vec<Fulfillment> {
        let txid = self.compute_id();
        self.conditions
            .iter()
            .enumerate()
            .filter_map(|(cid, condition)| {
                Fulfillment::spending(condition, &txid, cid as u64).ok()
            })
            .collect()
    }

    /// Append a fulfillment. Only meaningful before signing.
    pub fn add_fulfillment(&mut self, fulfillment: Fulfillment) {
        self.fulfillments.push(fulfillment);
    }

    /// Append a condition. Only meaningful before signing.
    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::OpalKeypair;

    fn keypair(seed: u8) -> OpalKeypair {
        OpalKeypair::from_seed(&[seed; 32])
    }

    fn spec(kp: &OpalKeypair) -> OwnerSpec {
        OwnerSpec::Key(kp.public_key())
    }

    #[test]
    fn create_single_sender_single_recipient() {
        let alice = keypair(1);
        let bob = keypair(2);
        let tx = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(tx.operation, Operation::Create);
        assert_eq!(tx.fulfillments.len(), 1);
        assert_eq!(tx.conditions.len(), 1);
        assert_eq!(tx.version, Transaction::VERSION);
        assert_eq!(tx.fulfillments[0].owners_before, vec![alice.public_key()]);
        assert_eq!(
            tx.conditions[0].owners_after.as_ref().unwrap(),
            &vec![bob.public_key()]
        );
        assert!(tx.fulfillments[0].input.is_none());
        // Timestamp is string-encoded unix seconds.
        assert!(tx.timestamp.parse::<i64>().is_ok());
    }

    #[test]
    fn create_empty_senders_fails() {
        let bob = keypair(2);
        let err =
            Transaction::create(&[], &[spec(&bob)], None, None, None, None).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn create_multi_sender_not_supported() {
        let alice = keypair(1);
        let bob = keypair(2);
        let err = Transaction::create(
            &[alice.public_key(), bob.public_key()],
            &[spec(&bob)],
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::NotSupported { .. }));
    }

    #[test]
    fn create_time_expire_not_supported() {
        let alice = keypair(1);
        let bob = keypair(2);
        let err = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            None,
            None,
            Some(1_700_000_000),
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::NotSupported { .. }));
    }

    #[test]
    fn create_without_recipients_or_secret_fails() {
        let alice = keypair(1);
        let err =
            Transaction::create(&[alice.public_key()], &[], None, None, None, None).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn create_hash_lock() {
        let alice = keypair(1);
        let tx = Transaction::create(
            &[alice.public_key()],
            &[],
            None,
            None,
            Some(b"open sesame"),
            None,
        )
        .unwrap();
        assert!(tx.conditions[0].owners_after.is_none());
        assert!(matches!(
            tx.conditions[0].claim,
            ConditionTree::HashLock { .. }
        ));
    }

    #[test]
    fn create_secret_and_recipients_fails() {
        let alice = keypair(1);
        let bob = keypair(2);
        let err = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            None,
            Some(b"open sesame"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn create_uses_supplied_asset() {
        let alice = keypair(1);
        let bob = keypair(2);
        let asset = Asset::with_id("fixed-id", None, false, false, false);
        let tx = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            Some(asset),
            None,
            None,
        )
        .unwrap();
        assert_eq!(tx.asset.id, "fixed-id");
    }

    #[test]
    fn transfer_builds_one_condition_per_group() {
        let alice = keypair(1);
        let bob = keypair(2);
        let carol = keypair(3);

        let create = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            None,
            None,
            None,
        )
        .unwrap();
        let inputs = create.to_inputs();
        assert_eq!(inputs.len(), 1);

        let tx = Transaction::transfer(
            inputs,
            &[vec![spec(&carol)]],
            create.asset.clone(),
            None,
        )
        .unwrap();
        assert_eq!(tx.operation, Operation::Transfer);
        assert_eq!(tx.conditions.len(), 1);
        assert_eq!(
            tx.conditions[0].owners_after.as_ref().unwrap(),
            &vec![carol.public_key()]
        );
        // The adopted input points back at the create transaction.
        let link = tx.fulfillments[0].input.as_ref().unwrap();
        assert_eq!(link.txid.as_deref(), Some(create.compute_id().as_str()));
        assert_eq!(link.cid, Some(0));
    }

    #[test]
    fn transfer_count_mismatch_fails() {
        let alice = keypair(1);
        let bob = keypair(2);
        let carol = keypair(3);
        let create = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            None,
            None,
            None,
        )
        .unwrap();

        let err = Transaction::transfer(
            create.to_inputs(),
            &[vec![spec(&carol)], vec![spec(&alice)]],
            create.asset.clone(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
    }

    #[test]
    fn transfer_without_inputs_fails() {
        let alice = keypair(1);
        let err = Transaction::transfer(vec![], &[], Asset::default(), None).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidArgument { .. }));
        let _ = alice;
    }

    #[test]
    fn to_inputs_skips_hash_locks() {
        let alice = keypair(1);
        let tx = Transaction::create(
            &[alice.public_key()],
            &[],
            None,
            None,
            Some(b"secret"),
            None,
        )
        .unwrap();
        assert!(tx.to_inputs().is_empty());
    }

    #[test]
    fn add_fulfillment_and_condition_append() {
        let alice = keypair(1);
        let bob = keypair(2);
        let mut tx = Transaction::create(
            &[alice.public_key()],
            &[spec(&bob)],
            None,
            None,
            None,
            None,
        )
        .unwrap();

        let extra_cond = Condition::from_owners(&[spec(&bob)]).unwrap();
        let extra_ffill = Fulfillment::new(
            ConditionTree::ed25519(alice.public_key()),
            vec![alice.public_key()],
            None,
        )
        .unwrap();
        tx.add_condition(extra_cond);
        tx.add_fulfillment(extra_ffill);
        assert_eq!(tx.conditions.len(), 2);
        assert_eq!(tx.fulfillments.len(), 2);
    }
}
