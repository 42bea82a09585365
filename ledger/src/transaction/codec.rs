//! Canonical transaction encoding, identifier computation, and
//! tamper-detecting decode.
//!
//! The identifier is the SHA3-256 digest of the canonical serialization
//! of the transaction's *signature-stripped* form: the envelope with every
//! fulfillment's claim field forced to null. Stripping makes the id (and
//! the signing payload, which is the same form with the id attached)
//! stable as fulfillments transition from unsigned to signed — a claim
//! can commit to the transaction content without committing to itself.
//!
//! [`Transaction::from_canonical`] recomputes the id over the raw decoded
//! JSON before trusting any field, so tampering with content the decoder
//! would otherwise ignore is still detected.

use serde_json::Value;
use tracing::trace;

use crate::canonical;
use crate::crypto::hash::sha3_256_hex;

use super::builder::Transaction;
use super::condition::Condition;
use super::error::TransactionError;
use super::fulfillment::Fulfillment;
use super::types::{Asset, Metadata, Operation};

impl Transaction {
    /// The structured envelope without an id: `{"version", "transaction"}`.
    fn envelope(&self) -> Value {
        let asset = match self.operation {
            // A transfer restates only the asset's identity, never its
            // descriptive fields.
            Operation::Transfer => serde_json::json!({ "id": self.asset.id }),
            Operation::Create | Operation::Genesis => self.asset.to_value(),
        };
        serde_json::json!({
            "version": self.version,
            "transaction": {
                "operation": self.operation,
                "timestamp": self.timestamp,
                "asset": asset,
                "metadata": self
                    .metadata
                    .as_ref()
                    .map_or(Value::Null, Metadata::to_value),
                "fulfillments": self
                    .fulfillments
                    .iter()
                    .enumerate()
                    .map(|(fid, f)| f.to_value(fid as u64))
                    .collect::<Vec<_>>(),
                "conditions": self
                    .conditions
                    .iter()
                    .enumerate()
                    .map(|(cid, c)| c.to_value(cid as u64))
                    .collect::<Vec<_>>(),
            },
        })
    }

    /// Force every fulfillment's claim field to null, in a copy.
    ///
    /// Works on the raw JSON rather than typed values so it applies
    /// equally to envelopes we built and envelopes we received.
    pub(crate) fn strip_signatures(envelope: &Value) -> Value {
        let mut stripped = envelope.clone();
        if let Some(fulfillments) = stripped
            .get_mut("transaction")
            .and_then(|tx| tx.get_mut("fulfillments"))
            .and_then(Value::as_array_mut)
        {
            for fulfillment in fulfillments {
                if let Some(obj) = fulfillment.as_object_mut() {
                    obj.insert("fulfillment".to_string(), Value::Null);
                }
            }
        }
        stripped
    }

    fn id_of(envelope: &Value) -> String {
        sha3_256_hex(&canonical::serialize(&Self::strip_signatures(envelope)))
    }

    /// The content-derived identifier: a 64-character hex digest,
    /// re-derivable from the signature-stripped canonical encoding at any
    /// point in the transaction's lifecycle.
    pub fn compute_id(&self) -> String {
        Self::id_of(&self.envelope())
    }

    /// The full canonical wire form with the identifier attached.
    pub fn to_canonical(&self) -> Value {
        let mut envelope = self.envelope();
        let id = Self::id_of(&envelope);
        if let Some(obj) = envelope.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id));
        }
        envelope
    }

    /// The canonical string a transaction is rendered to for storage or
    /// transport.
    pub fn to_canonical_string(&self) -> String {
        canonical::serialize(&self.to_canonical())
    }

    /// The message that gets signed and verified for this transaction:
    /// the signature-stripped canonical form, id included.
    ///
    /// Signing and validation both call this on a minimal partial
    /// transaction carrying a single (fulfillment, condition) pair, so a
    /// signature commits to the pair's position-zero projection plus the
    /// shared operation, asset, metadata, timestamp, and version.
    pub(crate) fn signing_payload(&self) -> String {
        let mut stripped = Self::strip_signatures(&self.envelope());
        let id = sha3_256_hex(&canonical::serialize(&stripped));
        if let Some(obj) = stripped.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id));
        }
        canonical::serialize(&stripped)
    }

    /// The minimal partial transaction used to derive the signing payload
    /// for the pair at `index`.
    pub(crate) fn partial(&self, index: usize) -> Transaction {
        Transaction::new(
            self.operation,
            vec![self.fulfillments[index].clone()],
            vec![self.conditions[index].clone()],
            self.asset.clone(),
            self.metadata.clone(),
            Some(self.timestamp.clone()),
            Some(self.version),
        )
    }

    /// Decode a canonical wire form, verifying its identifier first.
    ///
    /// The claimed id is removed and recomputed from the remaining
    /// signature-stripped content — operating on the raw JSON, so any
    /// tampered byte fails the check even in fields the decoder ignores.
    /// Only after the id verifies are the fields decoded.
    ///
    /// # Errors
    ///
    /// - `InvalidHash` — the id is missing, not a string, or does not
    ///   match the recomputed digest.
    /// - `InvalidSignature` — a fulfillment's claim cannot be parsed.
    /// - `InvalidArgument` — any other malformed field.
    pub fn from_canonical(value: &Value) -> Result<Self, TransactionError> {
        let obj = value.as_object().ok_or_else(|| {
            TransactionError::invalid_argument("transaction is not an object")
        })?;

        let mut body = value.clone();
        let claimed = body
            .as_object_mut()
            .and_then(|map| map.remove("id"));
        let expected = Self::id_of(&body);
        match claimed {
            Some(Value::String(actual)) if actual == expected => {}
            Some(Value::String(actual)) => {
                return Err(TransactionError::InvalidHash { expected, actual })
            }
            _ => {
                return Err(TransactionError::InvalidHash {
                    expected,
                    actual: "(missing)".to_string(),
                })
            }
        }
        trace!(id = %expected, "transaction id verified");

        let version = obj
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| TransactionError::invalid_argument("missing version"))?;
        let tx = obj
            .get("transaction")
            .and_then(Value::as_object)
            .ok_or_else(|| TransactionError::invalid_argument("missing transaction body"))?;

        let operation: Operation = tx
            .get("operation")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|_| TransactionError::invalid_argument("unknown operation"))?
            .ok_or_else(|| TransactionError::invalid_argument("missing operation"))?;

        let timestamp = tx
            .get("timestamp")
            .and_then(Value::as_str)
            .ok_or_else(|| TransactionError::invalid_argument("missing timestamp"))?
            .to_string();

        let asset = decode_asset(
            tx.get("asset")
                .ok_or_else(|| TransactionError::invalid_argument("missing asset"))?,
            operation,
        )?;

        let metadata = match tx.get("metadata") {
            None | Some(Value::Null) => None,
            Some(value) => Some(decode_metadata(value)?),
        };

        let fulfillments = tx
            .get("fulfillments")
            .and_then(Value::as_array)
            .ok_or_else(|| TransactionError::invalid_argument("missing fulfillments"))?
            .iter()
            .map(Fulfillment::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        let conditions = tx
            .get("conditions")
            .and_then(Value::as_array)
            .ok_or_else(|| TransactionError::invalid_argument("missing conditions"))?
            .iter()
            .map(Condition::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Transaction::new(
            operation,
            fulfillments,
            conditions,
            asset,
            metadata,
            Some(timestamp),
            Some(version),
        ))
    }
}

fn decode_asset(value: &Value, operation: Operation) -> Result<Asset, TransactionError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TransactionError::invalid_argument("asset is not an object"))?;
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| TransactionError::invalid_argument("missing asset id"))?;

    if operation == Operation::Transfer {
        // Only the identity travels with a transfer.
        return Ok(Asset::reference(id));
    }

    let data = match obj.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            return Err(TransactionError::invalid_argument(
                "asset data is not a mapping",
            ))
        }
    };
    // The capability flags must be real booleans, not truthy values.
    let flag = |name: &str| -> Result<bool, TransactionError> {
        obj.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| TransactionError::invalid_argument(format!("asset {name} is not a boolean")))
    };
    Ok(Asset::with_id(
        id,
        data,
        flag("divisible")?,
        flag("updatable")?,
        flag("refillable")?,
    ))
}

fn decode_metadata(value: &Value) -> Result<Metadata, TransactionError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TransactionError::invalid_argument("metadata is not an object"))?;
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| TransactionError::invalid_argument("missing metadata id"))?;
    let data = match obj.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            return Err(TransactionError::invalid_argument(
                "metadata data is not a mapping",
            ))
        }
    };
    Ok(Metadata::with_id(id, data))
}
