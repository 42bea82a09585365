//! # Key Management
//!
//! Ed25519 keypairs and their text encodings for OPAL identities.
//!
//! Every owner in the transaction model — `owners_before`, `owners_after`,
//! every leaf of a threshold tree — is an Ed25519 public key, and on the
//! wire it travels as a base58 string. Signatures travel as hex. Those two
//! encodings are part of the wire contract, so the serde implementations
//! here are hand-written rather than derived: a public key serializes to
//! exactly the string other implementations expect, nothing more.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures (no k-value footguns like ECDSA).
//! - 128-bit security level in 32+32 bytes. Compact and sufficient.
//! - Fast verification — the validation pipeline re-verifies every
//!   signature of every threshold leaf, so this matters.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses the OS CSPRNG (`OsRng`).
//! - Keypairs are deliberately NOT serde-serializable. Exporting a secret
//!   is `to_base58()` — a conscious act, not a side effect of dumping a
//!   struct into JSON.

use std::fmt;
use std::hash::{Hash, Hasher};

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed — leaking details
/// about key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key: wrong length or malformed base58")]
    InvalidSecretKey,

    #[error("invalid public key: wrong length, malformed base58, or not an Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature: wrong length or malformed hex")]
    InvalidSignature,
}

/// An OPAL identity keypair wrapping an Ed25519 signing key.
///
/// This is what a party holds in order to unlock conditions addressed to
/// them. The transaction signing pipeline takes a slice of these, derives
/// the public half of each, and matches them against `owners_before`.
///
/// # Examples
///
/// ```
/// use opal_ledger::crypto::OpalKeypair;
///
/// let kp = OpalKeypair::generate();
/// let sig = kp.sign(b"spend condition 0 of tx ab12...");
/// assert!(kp.public_key().verify(b"spend condition 0 of tx ab12...", &sig));
/// ```
pub struct OpalKeypair {
    signing_key: SigningKey,
}

/// The public half of an OPAL identity, safe to share with the world.
///
/// Serializes as a base58 string — the form it takes in `owners_before`,
/// `owners_after`, and condition tree leaves on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct OpalPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a signing payload.
///
/// 64 bytes, deterministic for a given (key, message) pair. Serializes as
/// a 128-character hex string, the form it takes inside a signed condition
/// tree leaf. A signature of the wrong length never panics — verification
/// simply returns `false`.
#[derive(Clone, PartialEq, Eq)]
pub struct OpalSignature {
    bytes: Vec<u8>,
}

impl OpalKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed, so this is also
    /// the way to reconstruct a keypair from exported secret material.
    /// A weak seed gives a weak key; use a proper CSPRNG or KDF.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a base58-encoded secret key.
    ///
    /// Base58 is the ledger's text encoding for key material; this is the
    /// inverse of [`to_base58`](Self::to_base58).
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Export the secret key as base58.
    ///
    /// **Handle with extreme care.** This is the only secret standing
    /// between an attacker and every condition addressed to this identity.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.signing_key.to_bytes()).into_string()
    }

    /// The public key derived from this keypair's secret.
    ///
    /// Derivation is deterministic — the signing pipeline relies on it to
    /// match supplied private keys against `owners_before` entries.
    pub fn public_key(&self) -> OpalPublicKey {
        OpalPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message, producing a 64-byte Ed25519 signature.
    ///
    /// Deterministic per RFC 8032: the same (key, message) pair always
    /// yields the same signature, which is what makes re-signing a
    /// fulfillment an idempotent overwrite.
    pub fn sign(&self, message: &[u8]) -> OpalSignature {
        let sig = self.signing_key.sign(message);
        OpalSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }
}

impl Clone for OpalKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for OpalKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even partially.
        write!(f, "OpalKeypair(pub={})", self.public_key())
    }
}

impl PartialEq for OpalKeypair {
    /// Two keypairs are equal if their public keys match. Comparing secret
    /// material in a non-constant-time way is a bad habit, and for identity
    /// purposes the public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for OpalKeypair {}

// ---------------------------------------------------------------------------
// OpalPublicKey
// ---------------------------------------------------------------------------

impl OpalPublicKey {
    /// Create a public key from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parse a base58-encoded public key.
    ///
    /// Validates the length and that the bytes decode to a valid Ed25519
    /// point. We don't accept arbitrary 32 bytes — low-order points and
    /// other degenerate cases are rejected here rather than surfacing as
    /// weird verification behavior later.
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| KeyError::InvalidPublicKey)?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// The base58 representation — the wire form of an owner.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Returns a plain boolean: the callers in the validation pipeline
    /// want a yes/no answer, and a malformed signature is just "no".
    pub fn verify(&self, message: &[u8], signature: &OpalSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let dalek_sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl Hash for OpalPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for OpalPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for OpalPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpalPublicKey({})", self.to_base58())
    }
}

impl Serialize for OpalPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for OpalPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// OpalSignature
// ---------------------------------------------------------------------------

impl OpalSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw signature bytes (64 for any signature we produced).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The hex representation — the wire form inside a signed claim.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex-encoded signature. Length-checked: anything other than
    /// 64 bytes is rejected.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidSignature)?;
        if bytes.len() != 64 {
            return Err(KeyError::InvalidSignature);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for OpalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for OpalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "OpalSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "OpalSignature({})", hex_str)
        }
    }
}

impl Serialize for OpalSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for OpalSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
