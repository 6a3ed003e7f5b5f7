//! # Signing
//!
//! Deterministic ECDSA over secp256k1.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SIGNING FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  message ──► SHA-256 ──► digest                                         │
//! │                            │                                            │
//! │  private key ──────────────┤                                            │
//! │                            ▼                                            │
//! │              ECDSA sign, nonce from RFC 6979                            │
//! │                            │                                            │
//! │                            ▼                                            │
//! │              r || s (64 bytes, low-S) ──► hex                           │
//! │                                                                         │
//! │  Same key + same message = same signature                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Behavior
//!
//! Signing fails loudly on a bad private key. Verification never fails:
//! malformed keys, malformed signatures and wrong messages all give `false`.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use super::curve::parse_secp256k1_private_key;
use crate::error::{Error, Result};

/// Size of a compact secp256k1 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// A compact `r || s` ECDSA signature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_SIZE]);

impl Signature {
    /// Create from a slice (must be exactly 64 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; SIGNATURE_SIZE] = slice.try_into().map_err(|_| {
            Error::InvalidKey(format!(
                "Signature must be {} bytes, got {}",
                SIGNATURE_SIZE,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| Error::InvalidKey(format!("Invalid signature hex: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a message with a secp256k1 private key (hex)
///
/// Returns the signature as hex.
pub fn sign(message: &[u8], private_key: &str) -> Result<String> {
    let private_key = Zeroizing::new(
        hex::decode(private_key.trim())
            .map_err(|e| Error::InvalidKey(format!("Private key is not valid hex: {}", e)))?,
    );
    let signing_key = SigningKey::from(parse_secp256k1_private_key(&private_key)?);

    Ok(sign_with_key(&signing_key, message)?.to_hex())
}

/// Sign a message with a parsed key
pub fn sign_with_key(signing_key: &SigningKey, message: &[u8]) -> Result<Signature> {
    let digest = Sha256::digest(message);
    let signature: EcdsaSignature = signing_key
        .sign_prehash(&digest)
        .map_err(|e| Error::SigningFailed(e.to_string()))?;

    Signature::from_slice(&signature.to_bytes())
}

/// Verify a signature
///
/// `Ok(())` if valid, `Err(VerificationFailed)` if not.
pub fn verify(public_key: &[u8], message: &[u8], signature: &Signature) -> Result<()> {
    let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 public key: {}", e)))?;
    let signature = EcdsaSignature::from_slice(signature.as_bytes())
        .map_err(|_| Error::VerificationFailed)?;

    let digest = Sha256::digest(message);
    verifying_key
        .verify_prehash(&digest, &signature)
        .map_err(|_| Error::VerificationFailed)
}

/// Check a hex signature against a message and a public key (hex)
///
/// Never errors. Anything that does not verify is `false`.
pub fn verify_signed_with_public_key(message: &[u8], public_key: &str, signature: &str) -> bool {
    let result = hex::decode(public_key.trim())
        .map_err(Error::from)
        .and_then(|public_key| {
            let signature = Signature::from_hex(signature)?;
            verify(&public_key, message, &signature)
        });

    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Signature rejected");
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
