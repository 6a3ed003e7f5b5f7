//! # Curve Abstraction
//!
//! Per-curve key agreement used by the ECIES engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KEY AGREEMENT                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SENDER                                                                 │
//! │  ──────                                                                 │
//! │  fresh ephemeral secret  ×  recipient public key  →  shared secret      │
//! │  ephemeral public key    →  wire bytes (stored in the envelope)         │
//! │                                                                         │
//! │  RECEIVER                                                               │
//! │  ────────                                                               │
//! │  wire bytes  →  ephemeral public key                                    │
//! │  recipient private key  ×  ephemeral public key  →  shared secret       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Curves
//!
//! | Curve | Agreement | Shared secret | Ephemeral key wire bytes |
//! |-------|-----------|---------------|--------------------------|
//! | secp256k1 | ECDH | x-coordinate (32 bytes) | SEC1 point (33 or 65 bytes) |
//! | ed25519 | X25519 on the Montgomery form | 32 bytes | base64 text of the 32-byte key |
//!
//! The two curves encode the ephemeral key differently on the wire. Existing
//! envelopes depend on it, so the asymmetry is kept as is.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ed25519_dalek::{SigningKey as Ed25519SigningKey, VerifyingKey as Ed25519VerifyingKey};
use k256::ecdh::{diffie_hellman, EphemeralSecret};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey as Secp256k1PublicKey, SecretKey as Secp256k1SecretKey};
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Default scheme name for envelopes produced over secp256k1
pub const SECP256K1_DEFAULT_SCHEME: &str = "asym.ecies.secp256k1";

/// Default scheme name for envelopes produced over ed25519
pub const ED25519_DEFAULT_SCHEME: &str = "asym.ecies.ed25519";

/// Size of a secp256k1 private key in bytes
pub const SECP256K1_PRIVATE_KEY_SIZE: usize = 32;

/// Size of an ed25519 seed (private key) in bytes
pub const ED25519_SEED_SIZE: usize = 32;

/// Size of an ed25519 keypair (seed followed by public key) in bytes
pub const ED25519_KEYPAIR_SIZE: usize = 64;

/// Size of an ed25519 public key in bytes
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// The supported curves
///
/// This is a closed set. Adding a curve means adding a variant and
/// handling it in every match below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveType {
    /// secp256k1 (ECDH + ECDSA)
    Secp256k1,
    /// ed25519 keys, agreement via X25519
    Ed25519,
}

impl CurveType {
    /// All supported curves
    pub const ALL: [CurveType; 2] = [CurveType::Secp256k1, CurveType::Ed25519];

    /// Canonical tag for this curve
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveType::Secp256k1 => "secp256k1",
            CurveType::Ed25519 => "ed25519",
        }
    }

    /// Scheme name written into envelopes when no override is given
    pub fn default_scheme(&self) -> &'static str {
        match self {
            CurveType::Secp256k1 => SECP256K1_DEFAULT_SCHEME,
            CurveType::Ed25519 => ED25519_DEFAULT_SCHEME,
        }
    }

    /// Generate an ephemeral key and agree on a shared secret with the recipient
    ///
    /// `key_format` only affects secp256k1, where it selects the SEC1 point
    /// encoding of the ephemeral public key.
    pub fn agree_as_sender(
        &self,
        recipient_public_key: &[u8],
        key_format: KeyFormat,
    ) -> Result<SenderAgreement> {
        match self {
            CurveType::Secp256k1 => secp256k1_agree_as_sender(recipient_public_key, key_format),
            CurveType::Ed25519 => ed25519_agree_as_sender(recipient_public_key),
        }
    }

    /// Recompute the shared secret from the recipient private key and the
    /// ephemeral public key's wire bytes
    pub fn agree_as_receiver(
        &self,
        private_key: &[u8],
        ephemeral_public_key: &[u8],
    ) -> Result<SharedSecret> {
        match self {
            CurveType::Secp256k1 => secp256k1_agree_as_receiver(private_key, ephemeral_public_key),
            CurveType::Ed25519 => ed25519_agree_as_receiver(private_key, ephemeral_public_key),
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(CurveType::Secp256k1),
            "ed25519" => Ok(CurveType::Ed25519),
            _ => Err(Error::UnsupportedCurve(s.to_string())),
        }
    }
}

/// How secp256k1 points are serialized
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyFormat {
    /// 33-byte SEC1 compressed point
    #[default]
    Compressed,
    /// 65-byte SEC1 uncompressed point
    Uncompressed,
}

impl KeyFormat {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyFormat::Compressed => "compressed",
            KeyFormat::Uncompressed => "uncompressed",
        }
    }

    /// Whether points are written in compressed form
    pub fn is_compressed(&self) -> bool {
        matches!(self, KeyFormat::Compressed)
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "compressed" => Ok(KeyFormat::Compressed),
            "uncompressed" => Ok(KeyFormat::Uncompressed),
            _ => Err(Error::InvalidOptions(format!("Unknown key format: {}", s))),
        }
    }
}

/// Raw output of a key agreement
///
/// Zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: Vec<u8>,
}

impl SharedSecret {
    /// Create from raw agreement output
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Get the raw bytes (for key derivation)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Result of the sender side of a key agreement
pub struct SenderAgreement {
    /// Ephemeral public key, already in its curve-specific wire encoding
    pub ephemeral_public_key: Vec<u8>,
    /// Shared secret with the recipient
    pub shared_secret: SharedSecret,
}

// ============================================================================
// SECP256K1
// ============================================================================

fn parse_secp256k1_public_key(bytes: &[u8]) -> Result<Secp256k1PublicKey> {
    Secp256k1PublicKey::from_sec1_bytes(bytes)
        .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 public key: {}", e)))
}

pub(crate) fn parse_secp256k1_private_key(bytes: &[u8]) -> Result<Secp256k1SecretKey> {
    if bytes.len() != SECP256K1_PRIVATE_KEY_SIZE {
        return Err(Error::InvalidKey(format!(
            "secp256k1 private key must be {} bytes, got {}",
            SECP256K1_PRIVATE_KEY_SIZE,
            bytes.len()
        )));
    }
    Secp256k1SecretKey::from_slice(bytes)
        .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 private key: {}", e)))
}

pub(crate) fn encode_secp256k1_public_key(key: &Secp256k1PublicKey, format: KeyFormat) -> Vec<u8> {
    key.to_encoded_point(format.is_compressed())
        .as_bytes()
        .to_vec()
}

fn secp256k1_agree_as_sender(
    recipient_public_key: &[u8],
    key_format: KeyFormat,
) -> Result<SenderAgreement> {
    let recipient = parse_secp256k1_public_key(recipient_public_key)?;

    let ephemeral = EphemeralSecret::random(&mut OsRng);
    let ephemeral_public_key = encode_secp256k1_public_key(&ephemeral.public_key(), key_format);
    let shared = ephemeral.diffie_hellman(&recipient);

    Ok(SenderAgreement {
        ephemeral_public_key,
        shared_secret: SharedSecret::from_slice(shared.raw_secret_bytes()),
    })
}

fn secp256k1_agree_as_receiver(
    private_key: &[u8],
    ephemeral_public_key: &[u8],
) -> Result<SharedSecret> {
    let secret = parse_secp256k1_private_key(private_key)?;
    let ephemeral = parse_secp256k1_public_key(ephemeral_public_key)?;

    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
    Ok(SharedSecret::from_slice(shared.raw_secret_bytes()))
}

// ============================================================================
// ED25519
// ============================================================================

pub(crate) fn parse_ed25519_public_key(bytes: &[u8]) -> Result<Ed25519VerifyingKey> {
    let bytes: [u8; ED25519_PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
        Error::InvalidKey(format!(
            "ed25519 public key must be {} bytes, got {}",
            ED25519_PUBLIC_KEY_SIZE,
            bytes.len()
        ))
    })?;
    Ed25519VerifyingKey::from_bytes(&bytes)
        .map_err(|e| Error::InvalidKey(format!("Invalid ed25519 public key: {}", e)))
}

/// Accepts a bare 32-byte seed or a 64-byte `seed || public` keypair
pub(crate) fn parse_ed25519_private_key(bytes: &[u8]) -> Result<Ed25519SigningKey> {
    match bytes.len() {
        ED25519_SEED_SIZE | ED25519_KEYPAIR_SIZE => {
            let mut seed = Zeroizing::new([0u8; ED25519_SEED_SIZE]);
            seed.copy_from_slice(&bytes[..ED25519_SEED_SIZE]);
            Ok(Ed25519SigningKey::from_bytes(&seed))
        }
        len => Err(Error::InvalidKey(format!(
            "ed25519 private key must be {} or {} bytes, got {}",
            ED25519_SEED_SIZE, ED25519_KEYPAIR_SIZE, len
        ))),
    }
}

fn decode_ed25519_ephemeral_key(wire: &[u8]) -> Result<X25519PublicKey> {
    let text = std::str::from_utf8(wire).map_err(|_| {
        Error::InvalidKey("ed25519 ephemeral public key is not base64 text".into())
    })?;
    let raw = BASE64
        .decode(text.trim())
        .map_err(|e| Error::InvalidKey(format!("Invalid base64 ephemeral public key: {}", e)))?;
    let raw: [u8; 32] = raw.try_into().map_err(|_| {
        Error::InvalidKey("ed25519 ephemeral public key must decode to 32 bytes".into())
    })?;
    Ok(X25519PublicKey::from(raw))
}

fn ed25519_agree_as_sender(recipient_public_key: &[u8]) -> Result<SenderAgreement> {
    let recipient = parse_ed25519_public_key(recipient_public_key)?;
    let recipient = X25519PublicKey::from(recipient.to_montgomery().to_bytes());

    let ephemeral = StaticSecret::random_from_rng(OsRng);
    let ephemeral_public = X25519PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&recipient);

    if !shared.was_contributory() {
        return Err(Error::KeyExchangeFailed(
            "recipient ed25519 key is a low-order point".into(),
        ));
    }

    Ok(SenderAgreement {
        ephemeral_public_key: BASE64.encode(ephemeral_public.as_bytes()).into_bytes(),
        shared_secret: SharedSecret::from_slice(shared.as_bytes()),
    })
}

fn ed25519_agree_as_receiver(
    private_key: &[u8],
    ephemeral_public_key: &[u8],
) -> Result<SharedSecret> {
    let signing = parse_ed25519_private_key(private_key)?;
    let scalar = Zeroizing::new(signing.to_scalar_bytes());
    let secret = StaticSecret::from(*scalar);

    let ephemeral = decode_ed25519_ephemeral_key(ephemeral_public_key)?;
    let shared = secret.diffie_hellman(&ephemeral);

    if !shared.was_contributory() {
        return Err(Error::KeyExchangeFailed(
            "ephemeral public key is a low-order point".into(),
        ));
    }

    Ok(SharedSecret::from_slice(shared.as_bytes()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::generate_key_pair;

    fn key_bytes(curve: CurveType) -> (Vec<u8>, Vec<u8>) {
        let pair = generate_key_pair(curve);
        (
            hex::decode(&pair.public_key).unwrap(),
            hex::decode(&pair.private_key).unwrap(),
        )
    }

    #[test]
    fn test_curve_parsing() {
        assert_eq!("secp256k1".parse::<CurveType>().unwrap(), CurveType::Secp256k1);
        assert_eq!("ED25519".parse::<CurveType>().unwrap(), CurveType::Ed25519);

        let err = "p256".parse::<CurveType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedCurve(ref c) if c == "p256"));
    }

    #[test]
    fn test_default_schemes_differ() {
        assert_ne!(
            CurveType::Secp256k1.default_scheme(),
            CurveType::Ed25519.default_scheme()
        );
    }

    #[test]
    fn test_secp256k1_agreement() {
        let (public, private) = key_bytes(CurveType::Secp256k1);
        let curve = CurveType::Secp256k1;

        let sent = curve.agree_as_sender(&public, KeyFormat::Compressed).unwrap();
        assert_eq!(sent.ephemeral_public_key.len(), 33);

        let received = curve
            .agree_as_receiver(&private, &sent.ephemeral_public_key)
            .unwrap();
        assert_eq!(sent.shared_secret.as_bytes(), received.as_bytes());
        assert_eq!(received.as_bytes().len(), 32);
    }

    #[test]
    fn test_secp256k1_uncompressed_ephemeral_key() {
        let (public, private) = key_bytes(CurveType::Secp256k1);
        let curve = CurveType::Secp256k1;

        let sent = curve
            .agree_as_sender(&public, KeyFormat::Uncompressed)
            .unwrap();
        assert_eq!(sent.ephemeral_public_key.len(), 65);
        assert_eq!(sent.ephemeral_public_key[0], 0x04);

        let received = curve
            .agree_as_receiver(&private, &sent.ephemeral_public_key)
            .unwrap();
        assert_eq!(sent.shared_secret.as_bytes(), received.as_bytes());
    }

    #[test]
    fn test_ed25519_agreement_uses_base64_wire_encoding() {
        let (public, private) = key_bytes(CurveType::Ed25519);
        let curve = CurveType::Ed25519;

        let sent = curve.agree_as_sender(&public, KeyFormat::Compressed).unwrap();

        // 32 bytes of base64 with padding is 44 ASCII characters
        let text = std::str::from_utf8(&sent.ephemeral_public_key).unwrap();
        assert_eq!(text.len(), 44);
        assert_eq!(BASE64.decode(text).unwrap().len(), 32);

        let received = curve
            .agree_as_receiver(&private, &sent.ephemeral_public_key)
            .unwrap();
        assert_eq!(sent.shared_secret.as_bytes(), received.as_bytes());
    }

    #[test]
    fn test_ed25519_accepts_64_byte_private_key() {
        let (public, seed) = key_bytes(CurveType::Ed25519);
        let mut keypair = seed.clone();
        keypair.extend_from_slice(&public);

        let sent = CurveType::Ed25519
            .agree_as_sender(&public, KeyFormat::Compressed)
            .unwrap();
        let from_seed = CurveType::Ed25519
            .agree_as_receiver(&seed, &sent.ephemeral_public_key)
            .unwrap();
        let from_keypair = CurveType::Ed25519
            .agree_as_receiver(&keypair, &sent.ephemeral_public_key)
            .unwrap();

        assert_eq!(from_seed.as_bytes(), from_keypair.as_bytes());
    }

    #[test]
    fn test_ed25519_rejects_raw_ephemeral_bytes() {
        let (public, private) = key_bytes(CurveType::Ed25519);
        let sent = CurveType::Ed25519
            .agree_as_sender(&public, KeyFormat::Compressed)
            .unwrap();
        let raw = BASE64
            .decode(std::str::from_utf8(&sent.ephemeral_public_key).unwrap())
            .unwrap();

        // Raw key bytes are not valid base64 text for this curve
        let result = CurveType::Ed25519.agree_as_receiver(&private, &raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_private_key_gives_different_secret() {
        let (public, _) = key_bytes(CurveType::Secp256k1);
        let (_, other_private) = key_bytes(CurveType::Secp256k1);

        let sent = CurveType::Secp256k1
            .agree_as_sender(&public, KeyFormat::Compressed)
            .unwrap();
        let received = CurveType::Secp256k1
            .agree_as_receiver(&other_private, &sent.ephemeral_public_key)
            .unwrap();

        assert_ne!(sent.shared_secret.as_bytes(), received.as_bytes());
    }

    #[test]
    fn test_invalid_key_lengths() {
        assert!(matches!(
            CurveType::Secp256k1.agree_as_sender(&[2u8; 10], KeyFormat::Compressed),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            CurveType::Ed25519.agree_as_sender(&[1u8; 31], KeyFormat::Compressed),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            CurveType::Secp256k1.agree_as_receiver(&[1u8; 31], &[2u8; 33]),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            CurveType::Ed25519.agree_as_receiver(&[1u8; 48], b"AAAA"),
            Err(Error::InvalidKey(_))
        ));
    }
}
