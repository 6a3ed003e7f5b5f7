//! # Encrypted Envelope
//!
//! The wire-level result of single-recipient encryption.
//!
//! ## Serialized Form
//!
//! ```json
//! {
//!   "iv": "00000000000000000000000000000000",
//!   "publicKey": "02…",
//!   "ephemPublicKey": "03…",
//!   "ciphertext": "…",
//!   "mac": "…",
//!   "scheme": "asym.ecies.secp256k1"
//! }
//! ```
//!
//! `iv` and `scheme` are omitted when absent. Every byte field is hex.
//! `publicKey` is informational only; decryption never reads it.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Field names that must appear, in this order, in any serialized envelope
const ENVELOPE_MARKERS: [&str; 4] = ["publicKey", "ephemPublicKey", "ciphertext", "mac"];

/// An ECIES ciphertext with everything needed to decrypt it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    /// IV (hex), present only when a non-empty IV was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    /// Recipient public key (hex)
    pub public_key: String,
    /// Ephemeral public key (hex of its curve-specific wire bytes)
    #[serde(rename = "ephemPublicKey")]
    pub ephemeral_public_key: String,
    /// Ciphertext (hex)
    pub ciphertext: String,
    /// Authentication tag (hex)
    pub mac: String,
    /// Scheme identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl EncryptedEnvelope {
    /// Serialize to JSON text
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::SerializationError(format!("Failed to serialize envelope: {}", e)))
    }

    /// Parse JSON text
    ///
    /// Anything that does not look like an envelope, or does not decode as
    /// one, is rejected with [`Error::InvalidEnvelope`].
    pub fn from_json(text: &str) -> Result<Self> {
        if !is_encrypted_envelope(text) {
            return Err(Error::InvalidEnvelope(
                "text is missing required envelope fields".into(),
            ));
        }
        serde_json::from_str(text).map_err(|e| Error::InvalidEnvelope(e.to_string()))
    }

    /// Decoded IV bytes, `None` when absent
    pub fn iv_bytes(&self) -> Result<Option<Vec<u8>>> {
        self.iv
            .as_deref()
            .map(|iv| decode_field("iv", iv))
            .transpose()
    }

    /// Decoded ephemeral public key wire bytes
    pub fn ephemeral_public_key_bytes(&self) -> Result<Vec<u8>> {
        decode_field("ephemPublicKey", &self.ephemeral_public_key)
    }

    /// Decoded ciphertext bytes
    pub fn ciphertext_bytes(&self) -> Result<Vec<u8>> {
        decode_field("ciphertext", &self.ciphertext)
    }

    /// Decoded MAC bytes
    pub fn mac_bytes(&self) -> Result<Vec<u8>> {
        decode_field("mac", &self.mac)
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value)
        .map_err(|e| Error::InvalidEnvelope(format!("Field {} is not valid hex: {}", name, e)))
}

impl fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl FromStr for EncryptedEnvelope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

/// Syntactic pre-check for serialized envelopes
///
/// True when `publicKey`, `ephemPublicKey`, `ciphertext` and `mac` appear
/// in that order. This is not schema validation; decoding may still fail.
pub fn is_encrypted_envelope(text: &str) -> bool {
    let mut rest = text;
    for marker in ENVELOPE_MARKERS {
        match rest.find(marker) {
            Some(at) => rest = &rest[at + marker.len()..],
            None => return false,
        }
    }
    true
}

/// An envelope handed to decryption, parsed or still serialized
#[derive(Clone, Debug)]
pub enum EnvelopeInput<'a> {
    /// Already-parsed envelope
    Parsed(Cow<'a, EncryptedEnvelope>),
    /// JSON text, parsed on demand
    Serialized(Cow<'a, str>),
}

impl EnvelopeInput<'_> {
    /// Get the parsed envelope
    pub fn resolve(&self) -> Result<Cow<'_, EncryptedEnvelope>> {
        match self {
            EnvelopeInput::Parsed(envelope) => Ok(Cow::Borrowed(envelope.as_ref())),
            EnvelopeInput::Serialized(text) => EncryptedEnvelope::from_json(text).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a EncryptedEnvelope> for EnvelopeInput<'a> {
    fn from(envelope: &'a EncryptedEnvelope) -> Self {
        EnvelopeInput::Parsed(Cow::Borrowed(envelope))
    }
}

impl From<EncryptedEnvelope> for EnvelopeInput<'static> {
    fn from(envelope: EncryptedEnvelope) -> Self {
        EnvelopeInput::Parsed(Cow::Owned(envelope))
    }
}

impl<'a> From<&'a str> for EnvelopeInput<'a> {
    fn from(text: &'a str) -> Self {
        EnvelopeInput::Serialized(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for EnvelopeInput<'a> {
    fn from(text: &'a String) -> Self {
        EnvelopeInput::Serialized(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for EnvelopeInput<'static> {
    fn from(text: String) -> Self {
        EnvelopeInput::Serialized(Cow::Owned(text))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncryptedEnvelope {
        EncryptedEnvelope {
            iv: None,
            public_key: "02aa".into(),
            ephemeral_public_key: "03bb".into(),
            ciphertext: "cc".into(),
            mac: "dd".into(),
            scheme: Some("asym.ecies.secp256k1".into()),
        }
    }

    #[test]
    fn test_field_names_and_order() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"publicKey":"02aa","ephemPublicKey":"03bb","ciphertext":"cc","mac":"dd","scheme":"asym.ecies.secp256k1"}"#
        );
    }

    #[test]
    fn test_iv_written_first_when_present() {
        let mut envelope = sample();
        envelope.iv = Some("00".repeat(16));
        let json = envelope.to_json().unwrap();

        assert!(json.starts_with(r#"{"iv":""#));
        assert!(is_encrypted_envelope(&json));
    }

    #[test]
    fn test_parse_serialized() {
        let envelope = sample();
        let parsed: EncryptedEnvelope = envelope.to_string().parse().unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_optional_fields_may_be_missing() {
        let parsed = EncryptedEnvelope::from_json(
            r#"{"publicKey":"aa","ephemPublicKey":"bb","ciphertext":"cc","mac":"dd"}"#,
        )
        .unwrap();

        assert!(parsed.iv.is_none());
        assert!(parsed.scheme.is_none());
    }

    #[test]
    fn test_is_encrypted_envelope_order() {
        assert!(is_encrypted_envelope(
            r#"{"publicKey":"","ephemPublicKey":"","ciphertext":"","mac":""}"#
        ));
        assert!(!is_encrypted_envelope(
            r#"{"mac":"","ciphertext":"","ephemPublicKey":"","publicKey":""}"#
        ));
        assert!(!is_encrypted_envelope(r#"{"publicKey":"","ciphertext":""}"#));
        assert!(!is_encrypted_envelope("hello world"));
    }

    #[test]
    fn test_from_json_rejects_non_envelopes() {
        assert!(matches!(
            EncryptedEnvelope::from_json("plain text"),
            Err(Error::InvalidEnvelope(_))
        ));

        // Passes the pre-check but is not JSON
        assert!(matches!(
            EncryptedEnvelope::from_json("publicKey ephemPublicKey ciphertext mac"),
            Err(Error::InvalidEnvelope(_))
        ));
    }

    #[test]
    fn test_byte_decoders() {
        let envelope = sample();
        assert_eq!(envelope.ciphertext_bytes().unwrap(), vec![0xcc]);
        assert_eq!(envelope.mac_bytes().unwrap(), vec![0xdd]);
        assert_eq!(envelope.iv_bytes().unwrap(), None);

        let mut broken = sample();
        broken.mac = "xyz".into();
        assert!(matches!(broken.mac_bytes(), Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_envelope_input_resolves_both_forms() {
        let envelope = sample();
        let text = envelope.to_json().unwrap();

        let from_parsed = EnvelopeInput::from(&envelope);
        let from_text = EnvelopeInput::from(text.as_str());

        assert_eq!(from_parsed.resolve().unwrap().as_ref(), &envelope);
        assert_eq!(from_text.resolve().unwrap().as_ref(), &envelope);
        assert!(EnvelopeInput::from("garbage").resolve().is_err());
    }
}
