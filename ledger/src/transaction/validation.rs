//! The transaction validation pipeline.
//!
//! [`Transaction::fulfillments_valid`] is the sole admission predicate the
//! surrounding ledger consults before accepting a transaction. It replays
//! the exact per-pair signing payload the signing pipeline produced and
//! verifies each embedded claim against it.
//!
//! Failure philosophy: untrusted input failing a check — a corrupt claim,
//! a non-verifying signature, a fingerprint mismatch — is an *expected*
//! outcome and reports `Ok(false)`. Errors are reserved for contract
//! violations by the caller, such as mismatched collection lengths or a
//! transfer validated without its prior conditions.

use tracing::debug;

use super::builder::Transaction;
use super::condition::{Condition, ConditionTree};
use super::error::TransactionError;
use super::types::Operation;

impl Transaction {
    /// Verify every fulfillment of this transaction.
    ///
    /// For `CREATE`/`GENESIS` the claims are self-certifying: each is
    /// validated against the signing payload alone, and the
    /// "must match a prior condition" check is vacuously true
    /// (`input_conditions` is ignored).
    ///
    /// For `TRANSFER` the caller supplies the prior conditions being
    /// spent, one per fulfillment at the same index; each fulfillment's
    /// claim must additionally fingerprint to exactly the paired
    /// condition, proving it spends that output and not a substitute.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a transfer is validated without its prior
    /// conditions, or if the fulfillment, condition, and reference
    /// condition counts disagree.
    pub fn fulfillments_valid(
        &self,
        input_conditions: Option<&[Condition]>,
    ) -> Result<bool, TransactionError> {
        match self.operation {
            Operation::Create | Operation::Genesis => self.all_fulfillments_valid(None),
            Operation::Transfer => {
                let conditions = input_conditions.ok_or_else(|| {
                    TransactionError::invalid_argument(
                        "transfer validation requires the prior conditions being spent",
                    )
                })?;
                let uris: Vec<String> = conditions.iter().map(Condition::uri).collect();
                self.all_fulfillments_valid(Some(&uris))
            }
        }
    }

    fn all_fulfillments_valid(
        &self,
        input_condition_uris: Option<&[String]>,
    ) -> Result<bool, TransactionError> {
        if self.fulfillments.len() != self.conditions.len() {
            return Err(TransactionError::invalid_argument(format!(
                "{} fulfillments cannot be validated against {} conditions",
                self.fulfillments.len(),
                self.conditions.len()
            )));
        }
        if let Some(uris) = input_condition_uris {
            if uris.len() != self.fulfillments.len() {
                return Err(TransactionError::invalid_argument(format!(
                    "{} reference conditions for {} fulfillments",
                    uris.len(),
                    self.fulfillments.len()
                )));
            }
        }

        for index in 0..self.fulfillments.len() {
            let expected_uri = input_condition_uris.map(|uris| uris[index].as_str());
            if !self.fulfillment_valid(index, expected_uri) {
                debug!(index, "fulfillment failed validation");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Validate the pair at `index`. Never errors: anything malformed
    /// about untrusted claim content reports `false`.
    fn fulfillment_valid(&self, index: usize, expected_uri: Option<&str>) -> bool {
        let Some(claim) = &self.fulfillments[index].claim else {
            return false;
        };

        // Round-trip the claim through its wire form; a claim that cannot
        // survive re-serialization is corrupt and fails closed.
        let reparsed = match ConditionTree::from_value(&claim.to_value()) {
            Ok(tree) => tree,
            Err(_) => return false,
        };

        // The fingerprint check: vacuous for CREATE/GENESIS, mandatory
        // for TRANSFER.
        if let Some(uri) = expected_uri {
            if claim.condition_uri() != uri {
                return false;
            }
        }

        let payload = self.partial(index).signing_payload();
        reparsed.validate_message(payload.as_bytes())
    }
}
