//! # Transaction Module
//!
//! Construction, signing, validation, and canonical encoding for OPAL
//! ledger transactions. Every asset creation and transfer on the ledger
//! is represented as a [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs       — Operation, TransactionLink, Asset, Metadata
//! condition.rs   — ConditionTree (recursive locks), OwnerSpec, Condition
//! fulfillment.rs — Fulfillment (claims that open prior conditions)
//! builder.rs     — The Transaction aggregate and the create/transfer builders
//! codec.rs       — Canonical encoding, identifiers, tamper-detecting decode
//! signing.rs     — The per-fulfillment signing pipeline
//! validation.rs  — fulfillments_valid, the ledger's admission predicate
//! error.rs       — TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** — [`Transaction::create`] locks a new asset to its first
//!    owners; [`Transaction::transfer`] spends prior conditions (via
//!    [`Transaction::to_inputs`]) to new owners.
//! 2. **Sign** — [`Transaction::sign`] derives the per-pair signing
//!    payload and installs signatures into each fulfillment's claim.
//! 3. **Encode** — [`Transaction::to_canonical`] attaches the
//!    content-derived identifier and yields the wire form.
//! 4. **Decode** — [`Transaction::from_canonical`] verifies the
//!    identifier before trusting a single field.
//! 5. **Validate** — [`Transaction::fulfillments_valid`] is the sole
//!    admission predicate for the surrounding ledger.
//!
//! ## Design Decisions
//!
//! - The identifier is the SHA3-256 of the canonical, signature-stripped
//!   encoding. It is never stored on the struct — always re-derived — so
//!   it cannot drift from the content it commits to.
//! - Signing payloads are derived from minimal single-pair partial
//!   transactions, so each signature stands alone and multi-party signing
//!   can proceed fulfillment by fulfillment.
//! - Signing substitutes new fulfillment values by index. No caller-held
//!   clone is ever written through.
//! - Validation of untrusted input never panics and never errors: corrupt
//!   claims report `false`.

pub mod builder;
pub mod codec;
pub mod condition;
pub mod error;
pub mod fulfillment;
pub mod signing;
pub mod types;
pub mod validation;

pub use builder::Transaction;
pub use condition::{Condition, ConditionTree, OwnerSpec};
pub use error::TransactionError;
pub use fulfillment::Fulfillment;
pub use types::{Asset, Metadata, Operation, TransactionLink};
