//! # Single-Recipient Engine
//!
//! ECIES encryption to one public key, and the matching decryption.
//!
//! ## Encryption Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ECIES ENCRYPTION                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  options ──► compose ──► curve, cipher, hashes, iv, s1, s2, strategy    │
//! │                                                                         │
//! │  recipient public key                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  agree as sender ──► ephemeral public key + shared secret               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  derive keys(shared secret, s1, ephemeral public key)                   │
//! │        │                                                                │
//! │        ├──► cipher key ──► encrypt(plaintext, iv) ──► ciphertext        │
//! │        │                                                  │             │
//! │        └──► mac key ──► HMAC(ciphertext || s2) ◄──────────┘             │
//! │                                                                         │
//! │  EncryptedEnvelope { iv?, publicKey, ephemPublicKey, ciphertext,        │
//! │                      mac, scheme }                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decryption Order
//!
//! 1. Parse the envelope (text input is pre-checked and decoded)
//! 2. Compare the envelope's scheme with the resolved scheme
//! 3. Compare the envelope's IV, if any, with the composed IV
//! 4. Recompute the shared secret from the private key
//! 5. Re-derive keys and recompute the MAC
//! 6. Constant-time MAC comparison
//! 7. Decrypt with the composed IV
//!
//! The scheme check happens before any cryptographic work, and nothing is
//! decrypted until the MAC has been verified. The `iv` field is not covered
//! by the MAC, so decryption never takes its IV from the envelope.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::envelope::{EncryptedEnvelope, EnvelopeInput};
use super::kdf::mac_verify;
use super::options::{ComposedOptions, EncryptionOptions};
use crate::error::{Error, Result};

/// Encrypt `plaintext` to a recipient public key (hex)
///
/// The envelope's scheme is `scheme`, else the scheme configured in
/// `options`, else the curve's default.
pub fn encrypt_with_public_key(
    public_key: &str,
    plaintext: &[u8],
    options: &EncryptionOptions,
    scheme: Option<&str>,
) -> Result<EncryptedEnvelope> {
    let composed = ComposedOptions::compose(options)?;
    encrypt_composed(public_key, plaintext, &composed, scheme)
}

/// Decrypt an envelope with a private key (hex)
///
/// `envelope` may be a parsed [`EncryptedEnvelope`] or its JSON text.
///
/// # Errors
///
/// - [`Error::InvalidEnvelope`] if the text is not an envelope
/// - [`Error::SchemeMismatch`] if the envelope declares a different scheme
/// - [`Error::AuthenticationFailed`] if the MAC does not verify or the
///   envelope carries an IV other than the one in `options`
pub fn decrypt_with_private_key<'a>(
    envelope: impl Into<EnvelopeInput<'a>>,
    private_key: &str,
    options: &EncryptionOptions,
    scheme: Option<&str>,
) -> Result<Vec<u8>> {
    let composed = ComposedOptions::compose(options)?;
    let input: EnvelopeInput<'a> = envelope.into();
    let envelope = input.resolve()?;
    decrypt_composed(&envelope, private_key, &composed, scheme)
}

/// Encrypt a UTF-8 string
pub fn encrypt_string_with_public_key(
    public_key: &str,
    plaintext: &str,
    options: &EncryptionOptions,
    scheme: Option<&str>,
) -> Result<EncryptedEnvelope> {
    encrypt_with_public_key(public_key, plaintext.as_bytes(), options, scheme)
}

/// Decrypt to a UTF-8 string
pub fn decrypt_string_with_private_key<'a>(
    envelope: impl Into<EnvelopeInput<'a>>,
    private_key: &str,
    options: &EncryptionOptions,
    scheme: Option<&str>,
) -> Result<String> {
    let plaintext = decrypt_with_private_key(envelope, private_key, options, scheme)?;
    String::from_utf8(plaintext)
        .map_err(|e| Error::DecryptionFailed(format!("Plaintext is not UTF-8: {}", e)))
}

pub(crate) fn encrypt_composed(
    public_key: &str,
    plaintext: &[u8],
    options: &ComposedOptions,
    scheme: Option<&str>,
) -> Result<EncryptedEnvelope> {
    let recipient = hex::decode(public_key.trim())
        .map_err(|e| Error::InvalidKey(format!("Public key is not valid hex: {}", e)))?;

    let agreement = options.curve.agree_as_sender(&recipient, options.key_format)?;
    let keys = options.strategy.derive_keys(
        agreement.shared_secret.as_bytes(),
        &options.s1,
        &agreement.ephemeral_public_key,
    )?;

    let ciphertext = options
        .cipher
        .encrypt(keys.cipher_key(), &options.iv, plaintext)?;
    let mac = options
        .strategy
        .compute_mac(keys.mac_key(), &options.s2, &ciphertext)?;

    let scheme = options.resolve_scheme(scheme);
    debug!(
        curve = %options.curve,
        cipher = %options.cipher,
        scheme = %scheme,
        plaintext_len = plaintext.len(),
        "Encrypted envelope"
    );

    Ok(EncryptedEnvelope {
        iv: (!options.iv.is_empty()).then(|| hex::encode(&options.iv)),
        public_key: hex::encode(&recipient),
        ephemeral_public_key: hex::encode(&agreement.ephemeral_public_key),
        ciphertext: hex::encode(&ciphertext),
        mac: hex::encode(&mac),
        scheme: Some(scheme),
    })
}

pub(crate) fn decrypt_composed(
    envelope: &EncryptedEnvelope,
    private_key: &str,
    options: &ComposedOptions,
    scheme: Option<&str>,
) -> Result<Vec<u8>> {
    let expected_scheme = options.resolve_scheme(scheme);
    if let Some(found) = envelope.scheme.as_deref() {
        if found != expected_scheme {
            warn!(expected = %expected_scheme, found, "Rejected envelope with foreign scheme");
            return Err(Error::SchemeMismatch {
                expected: expected_scheme,
                found: found.to_string(),
            });
        }
    }

    // The MAC does not cover the IV, so only the composed IV is ever used
    if let Some(carried) = envelope.iv_bytes()? {
        if !mac_verify(&carried, &options.iv) {
            warn!(cipher = %options.cipher, "Rejected envelope with foreign IV");
            return Err(Error::AuthenticationFailed);
        }
    }

    let ephemeral_public_key = envelope.ephemeral_public_key_bytes()?;
    let ciphertext = envelope.ciphertext_bytes()?;
    let stored_mac = envelope.mac_bytes()?;

    let private_key = Zeroizing::new(
        hex::decode(private_key.trim())
            .map_err(|e| Error::InvalidKey(format!("Private key is not valid hex: {}", e)))?,
    );

    let shared_secret = options
        .curve
        .agree_as_receiver(&private_key, &ephemeral_public_key)?;
    let keys = options.strategy.derive_keys(
        shared_secret.as_bytes(),
        &options.s1,
        &ephemeral_public_key,
    )?;

    let recomputed = options
        .strategy
        .compute_mac(keys.mac_key(), &options.s2, &ciphertext)?;
    if !mac_verify(&stored_mac, &recomputed) {
        warn!(curve = %options.curve, scheme = %expected_scheme, "MAC verification failed");
        return Err(Error::AuthenticationFailed);
    }

    let plaintext = options
        .cipher
        .decrypt(keys.cipher_key(), &options.iv, &ciphertext)?;
    debug!(
        curve = %options.curve,
        cipher = %options.cipher,
        plaintext_len = plaintext.len(),
        "Decrypted envelope"
    );

    Ok(plaintext)
}

// ============================================================================
// TESTS
// ============================================================================
