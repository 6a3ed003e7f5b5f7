//! # Onion Engine
//!
//! Layered encryption across an ordered list of recipients.
//!
//! ```text
//! plaintext
//!    │  encrypt to public_keys[0]
//!    ▼
//! layer 0 ──► JSON ──► encrypt to public_keys[1]
//!                         │
//!                         ▼
//!                      layer 1 ──► JSON ──► … ──► layer n-1 (distributed)
//! ```
//!
//! Decryption takes the private keys in the same order as the public keys
//! were given and peels from the last key to the first. Every layer except
//! the innermost must decrypt to a serialized envelope.
//!
//! All layers share one set of options and the scheme that resolves from
//! them.

use tracing::debug;

use super::ecies::{decrypt_composed, encrypt_composed};
use super::envelope::{EncryptedEnvelope, EnvelopeInput};
use super::options::{ComposedOptions, EncryptionOptions};
use crate::error::{Error, Result};

/// Encrypt `plaintext` in layers, one per public key (hex)
///
/// Returns every layer in order. The last element wraps all the others and
/// is the one to hand out.
pub fn encrypt_with_public_keys<K: AsRef<str>>(
    plaintext: &[u8],
    public_keys: &[K],
    options: &EncryptionOptions,
) -> Result<Vec<EncryptedEnvelope>> {
    if public_keys.is_empty() {
        return Err(Error::InvalidOptions(
            "onion encryption needs at least one public key".into(),
        ));
    }

    let composed = ComposedOptions::compose(options)?;
    let mut layers: Vec<EncryptedEnvelope> = Vec::with_capacity(public_keys.len());

    for public_key in public_keys {
        let envelope = match layers.last() {
            None => encrypt_composed(public_key.as_ref(), plaintext, &composed, None)?,
            Some(inner) => {
                let inner = inner.to_json()?;
                encrypt_composed(public_key.as_ref(), inner.as_bytes(), &composed, None)?
            }
        };
        layers.push(envelope);
    }

    debug!(layers = layers.len(), "Built onion");
    Ok(layers)
}

/// Peel an onion with private keys (hex) given in encryption order
pub fn decrypt_with_private_keys<'a, K: AsRef<str>>(
    envelope: impl Into<EnvelopeInput<'a>>,
    private_keys: &[K],
    options: &EncryptionOptions,
) -> Result<Vec<u8>> {
    let (innermost_key, outer_keys) = private_keys.split_first().ok_or_else(|| {
        Error::InvalidOptions("onion decryption needs at least one private key".into())
    })?;

    let composed = ComposedOptions::compose(options)?;
    let input: EnvelopeInput<'a> = envelope.into();
    let mut current = input.resolve()?.into_owned();

    for (index, private_key) in outer_keys.iter().enumerate().rev() {
        let layer = index + 1;
        let inner = decrypt_composed(&current, private_key.as_ref(), &composed, None)?;
        let inner = std::str::from_utf8(&inner).map_err(|_| {
            Error::InvalidEnvelope(format!("Onion layer {} did not contain an envelope", layer))
        })?;
        current = EncryptedEnvelope::from_json(inner).map_err(|e| {
            Error::InvalidEnvelope(format!("Onion layer {} did not contain an envelope: {}", layer, e))
        })?;
    }

    let plaintext = decrypt_composed(&current, innermost_key.as_ref(), &composed, None)?;
    debug!(layers = private_keys.len(), "Peeled onion");
    Ok(plaintext)
}

// ============================================================================
// TESTS
// ============================================================================
