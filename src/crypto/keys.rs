//! # Key Generation
//!
//! Fresh key pairs for either curve, hex-encoded the way the engine
//! consumes them.
//!
//! ## Key Formats
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY FORMATS                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  secp256k1                                                              │
//! │  • Private key: 32 bytes                                                │
//! │  • Public key: 33 bytes (compressed) or 65 bytes (uncompressed) SEC1    │
//! │                                                                         │
//! │  ed25519                                                                │
//! │  • Private key: 32-byte seed (64-byte seed || public also accepted)     │
//! │  • Public key: 32 bytes                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Key custody is the caller's business. Nothing here stores keys.

use ed25519_dalek::SigningKey as Ed25519SigningKey;
use k256::SecretKey as Secp256k1SecretKey;
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::curve::{
    encode_secp256k1_public_key, parse_ed25519_private_key, parse_secp256k1_private_key,
    CurveType, KeyFormat,
};
use crate::error::Result;

/// A hex-encoded key pair for one curve
///
/// The private half is zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPairHex {
    /// Curve the keys belong to
    #[zeroize(skip)]
    pub curve: CurveType,
    /// Public key (hex)
    pub public_key: String,
    /// Private key (hex)
    ///
    /// Only use this for secure storage. Never log or transmit it.
    pub private_key: String,
}

impl std::fmt::Debug for KeyPairHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairHex")
            .field("curve", &self.curve)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Generate a new random key pair
///
/// Uses the operating system's secure random number generator.
/// secp256k1 public keys are returned compressed.
pub fn generate_key_pair(curve: CurveType) -> KeyPairHex {
    match curve {
        CurveType::Secp256k1 => {
            let secret = Secp256k1SecretKey::random(&mut OsRng);
            let public = encode_secp256k1_public_key(&secret.public_key(), KeyFormat::Compressed);
            KeyPairHex {
                curve,
                public_key: hex::encode(public),
                private_key: hex::encode(secret.to_bytes()),
            }
        }
        CurveType::Ed25519 => {
            let secret = Ed25519SigningKey::generate(&mut OsRng);
            KeyPairHex {
                curve,
                public_key: hex::encode(secret.verifying_key().to_bytes()),
                private_key: hex::encode(secret.to_bytes()),
            }
        }
    }
}

/// Derive the public key (hex) for a private key (hex)
///
/// `key_format` only matters for secp256k1.
pub fn public_key_from_private(
    curve: CurveType,
    private_key: &str,
    key_format: KeyFormat,
) -> Result<String> {
    let private_key = zeroize::Zeroizing::new(hex::decode(private_key.trim())?);

    match curve {
        CurveType::Secp256k1 => {
            let secret = parse_secp256k1_private_key(&private_key)?;
            Ok(hex::encode(encode_secp256k1_public_key(
                &secret.public_key(),
                key_format,
            )))
        }
        CurveType::Ed25519 => {
            let secret = parse_ed25519_private_key(&private_key)?;
            Ok(hex::encode(secret.verifying_key().to_bytes()))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_keypair_generation() {
        for curve in CurveType::ALL {
            let kp1 = generate_key_pair(curve);
            let kp2 = generate_key_pair(curve);

            // Keys should be different
            assert_ne!(kp1.public_key, kp2.public_key);
            assert_ne!(kp1.private_key, kp2.private_key);
        }
    }

    #[test]
    fn test_key_sizes() {
        let secp = generate_key_pair(CurveType::Secp256k1);
        assert_eq!(hex::decode(&secp.public_key).unwrap().len(), 33);
        assert_eq!(hex::decode(&secp.private_key).unwrap().len(), 32);

        let ed = generate_key_pair(CurveType::Ed25519);
        assert_eq!(hex::decode(&ed.public_key).unwrap().len(), 32);
        assert_eq!(hex::decode(&ed.private_key).unwrap().len(), 32);
    }

    #[test]
    fn test_public_key_from_private() {
        for curve in CurveType::ALL {
            let kp = generate_key_pair(curve);
            let derived =
                public_key_from_private(curve, &kp.private_key, KeyFormat::Compressed).unwrap();
            assert_eq!(derived, kp.public_key);
        }
    }

    #[test]
    fn test_public_key_from_private_uncompressed() {
        let kp = generate_key_pair(CurveType::Secp256k1);
        let derived =
            public_key_from_private(CurveType::Secp256k1, &kp.private_key, KeyFormat::Uncompressed)
                .unwrap();
        assert_eq!(derived.len(), 130);
        assert!(derived.starts_with("04"));
    }

    #[test]
    fn test_public_key_from_bad_hex() {
        let result = public_key_from_private(CurveType::Ed25519, "zz", KeyFormat::Compressed);
        assert!(matches!(result, Err(Error::DeserializationError(_))));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let kp = generate_key_pair(CurveType::Ed25519);
        let printed = format!("{:?}", kp);
        assert!(!printed.contains(&kp.private_key));
        assert!(printed.contains(&kp.public_key));
    }
}
