//! Core type definitions for OPAL transactions.
//!
//! These types form the vocabulary of every transaction on the ledger:
//! the operation discriminant, the link from an input back to the output
//! it spends, and the asset/metadata descriptors a transaction carries.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents.
///
/// The operation determines which validation rules apply: `Create` and
/// `Genesis` fulfillments are self-certifying, while `Transfer`
/// fulfillments must match the prior conditions they spend. It is fixed at
/// construction and never changes afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Creation of a new digital asset, assigning it to its first owners.
    Create,
    /// Transfer of a previously created asset to new owners.
    Transfer,
    /// Creation of the ledger's genesis asset. Validated like `Create`.
    Genesis,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Transfer => write!(f, "TRANSFER"),
            Self::Genesis => write!(f, "GENESIS"),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionLink
// ---------------------------------------------------------------------------

/// A pointer from an input fulfillment to the condition it spends:
/// a transaction id plus a condition index within that transaction.
///
/// Both fields are present or both are absent — a half-specified link is
/// meaningless. An absent link encodes to JSON null (the shape inputs take
/// in a CREATE transaction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLink {
    /// Identifier of the transaction holding the spent condition.
    pub txid: Option<String>,
    /// Index of the spent condition within that transaction.
    pub cid: Option<u64>,
}

impl TransactionLink {
    /// A link pointing at condition `cid` of transaction `txid`.
    pub fn new(txid: impl Into<String>, cid: u64) -> Self {
        Self {
            txid: Some(txid.into()),
            cid: Some(cid),
        }
    }

    /// The empty link.
    pub fn empty() -> Self {
        Self {
            txid: None,
            cid: None,
        }
    }

    /// A link is present iff both fields are set.
    pub fn is_present(&self) -> bool {
        self.txid.is_some() && self.cid.is_some()
    }

    /// The wire form: an object when present, null otherwise.
    pub fn to_value(&self) -> Value {
        if self.is_present() {
            serde_json::json!({
                "txid": self.txid,
                "cid": self.cid,
            })
        } else {
            Value::Null
        }
    }

    /// Decode the wire form. Null and missing both mean "no link".
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                txid: map
                    .get("txid")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned),
                cid: map.get("cid").and_then(Value::as_u64),
            },
            _ => Self::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// The identity and descriptive metadata of the asset being created or
/// transferred.
///
/// The three capability flags are carried verbatim — their enforcement
/// (amount splitting, re-issuance, payload updates) is a ledger-level
/// concern, not a transaction-model one. A CREATE transaction embeds the
/// full asset; a TRANSFER restates only its `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Content-addressed identifier, freshly generated unless supplied.
    pub id: String,
    /// Free-form descriptive payload.
    pub data: Option<Map<String, Value>>,
    /// Whether the asset amount may be split across conditions.
    pub divisible: bool,
    /// Whether the asset payload may be updated by later transactions.
    pub updatable: bool,
    /// Whether the asset supply may be refilled after creation.
    pub refillable: bool,
}

impl Asset {
    /// A new asset with the given payload and a fresh unique id.
    pub fn new(data: Option<Map<String, Value>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data,
            divisible: false,
            updatable: false,
            refillable: false,
        }
    }

    /// An asset with an externally supplied id, as decoded from the wire.
    pub fn with_id(
        id: impl Into<String>,
        data: Option<Map<String, Value>>,
        divisible: bool,
        updatable: bool,
        refillable: bool,
    ) -> Self {
        Self {
            id: id.into(),
            data,
            divisible,
            updatable,
            refillable,
        }
    }

    /// An id-only reference, the shape a TRANSFER carries. Flags default
    /// to false and the payload is absent; only the identity survives.
    pub fn reference(id: impl Into<String>) -> Self {
        Self::with_id(id, None, false, false, false)
    }

    /// The full wire form, as embedded in CREATE/GENESIS transactions.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "data": self.data,
            "divisible": self.divisible,
            "updatable": self.updatable,
            "refillable": self.refillable,
        })
    }
}

impl Default for Asset {
    /// A fresh unique asset: no payload, all flags false.
    fn default() -> Self {
        Self::new(None)
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Free-form transaction metadata: an identifier plus an optional payload.
///
/// Same shape rules as [`Asset`] payloads, distinct namespace. A metadata
/// object without a payload encodes to JSON null, so its id only survives
/// serialization when there is a payload to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique identifier, freshly generated unless supplied.
    pub id: String,
    /// Free-form payload.
    pub data: Option<Map<String, Value>>,
}

impl Metadata {
    /// New metadata with the given payload and a fresh unique id.
    pub fn new(data: Option<Map<String, Value>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data,
        }
    }

    /// Metadata with an externally supplied id, as decoded from the wire.
    pub fn with_id(id: impl Into<String>, data: Option<Map<String, Value>>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// The wire form: an object when a payload exists, null otherwise.
    pub fn to_value(&self) -> Value {
        match &self.data {
            Some(data) => serde_json::json!({
                "id": self.id,
                "data": data,
            }),
            None => Value::Null,
        }
    }
}
