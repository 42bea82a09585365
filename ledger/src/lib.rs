// Copyright (c) 2026 OPAL Contributors. MIT License.
// See LICENSE for details.

//! # OPAL Ledger — Transaction Model
//!
//! The transaction core of OPAL, an open distributed asset ledger. This
//! crate defines how a transfer of a digital asset between parties is
//! represented, cryptographically locked, signed, validated, and given a
//! canonical content-derived identifier.
//!
//! The surrounding ledger — block assembly, peer voting, persistent
//! storage, networking — consumes this crate through exactly three
//! surfaces: the [`transaction::Transaction`] builders, the signing
//! pipeline, and [`Transaction::fulfillments_valid`] as the sole admission
//! predicate. Nothing in here does I/O.
//!
//! ## Architecture
//!
//! - **crypto** — Ed25519 keypairs, SHA-256 fingerprints, SHA3-256
//!   identifiers. Thin wrappers over audited implementations.
//! - **canonical** — The deterministic JSON encoding every signature and
//!   identifier depends on. The most safety-critical module in the crate.
//! - **transaction** — Conditions, fulfillments, threshold trees, and the
//!   `Transaction` aggregate with its construction, signing, validation,
//!   and encode/decode pipelines.
//!
//! ## Design Philosophy
//!
//! 1. The canonical encoding is part of the wire contract. Change it and
//!    every signature and identifier on the network stops verifying.
//! 2. Untrusted input failing validation is an expected outcome, reported
//!    as `false`. Programmer errors and integrity violations are `Err`.
//! 3. Signed transactions are values. Build, sign, then share immutably.
//!
//! [`Transaction::fulfillments_valid`]: transaction::Transaction::fulfillments_valid

pub mod canonical;
pub mod crypto;
pub mod transaction;
