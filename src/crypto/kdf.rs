//! # Key Derivation & MAC
//!
//! Turns the shared secret from a key agreement into a cipher key and a
//! MAC key, and authenticates ciphertexts.
//!
//! ## Default Derivation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      DEFAULT KEY STRATEGY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  digest = HASH(shared_secret || s1 || ephemeral_public_key)             │
//! │                                                                         │
//! │  ┌──────────────────────────┬──────────────────────────┐                │
//! │  │   first half             │   second half            │                │
//! │  │   → cipher key           │   → MAC key              │                │
//! │  └──────────────────────────┴──────────────────────────┘                │
//! │                                                                         │
//! │  SHA-256 → 16-byte keys (AES-128)                                       │
//! │  SHA-512 → 32-byte keys (AES-256)                                       │
//! │                                                                         │
//! │  mac = HMAC(mac_key, ciphertext || s2)                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Custom Strategies
//!
//! Callers that need a different derivation implement [`KeyStrategy`] and
//! attach it to their options. A custom strategy replaces both steps for
//! that call; the default code path is not consulted at all.
//!
//! ## MAC Verification
//!
//! [`mac_verify`] compares tags in constant time so the comparison does not
//! reveal where the first differing byte is.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Hash functions usable for key derivation and HMAC
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashType {
    /// SHA-256 (32-byte output)
    Sha256,
    /// SHA-512 (64-byte output)
    Sha512,
}

impl HashType {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Sha256 => "sha256",
            HashType::Sha512 => "sha512",
        }
    }

    /// Digest size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            HashType::Sha256 => 32,
            HashType::Sha512 => 64,
        }
    }

    /// Hash the concatenation of `parts`
    pub fn digest(&self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashType::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().to_vec()
            }
            HashType::Sha512 => {
                let mut hasher = Sha512::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().to_vec()
            }
        }
    }

    /// HMAC over the concatenation of `parts`
    pub fn hmac(&self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
        let invalid =
            |_: hmac::digest::InvalidLength| Error::KeyDerivationFailed("HMAC rejected the key".into());

        match self {
            HashType::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(invalid)?;
                for part in parts {
                    mac.update(part);
                }
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashType::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(invalid)?;
                for part in parts {
                    mac.update(part);
                }
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashType::Sha256),
            "sha512" => Ok(HashType::Sha512),
            _ => Err(Error::UnsupportedHash(s.to_string())),
        }
    }
}

/// Cipher key and MAC key derived from a shared secret
///
/// Zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    cipher_key: Vec<u8>,
    mac_key: Vec<u8>,
}

impl DerivedKeys {
    /// Wrap an existing key pair
    pub fn new(cipher_key: Vec<u8>, mac_key: Vec<u8>) -> Self {
        Self {
            cipher_key,
            mac_key,
        }
    }

    /// Key for the symmetric cipher
    pub fn cipher_key(&self) -> &[u8] {
        &self.cipher_key
    }

    /// Key for the MAC
    pub fn mac_key(&self) -> &[u8] {
        &self.mac_key
    }
}

/// Key derivation and MAC strategy
///
/// The engine calls `derive_keys` once per envelope and `compute_mac`
/// once on encrypt and once on decrypt.
pub trait KeyStrategy: Send + Sync {
    /// Derive the cipher and MAC keys
    fn derive_keys(
        &self,
        shared_secret: &[u8],
        s1: &[u8],
        ephemeral_public_key: &[u8],
    ) -> Result<DerivedKeys>;

    /// Compute the authentication tag for `ciphertext`
    fn compute_mac(&self, mac_key: &[u8], s2: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Hash-and-split derivation with an HMAC tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultKeyStrategy {
    /// Hash used for key derivation
    pub hash: HashType,
    /// Hash used inside the HMAC
    pub mac: HashType,
}

impl KeyStrategy for DefaultKeyStrategy {
    fn derive_keys(
        &self,
        shared_secret: &[u8],
        s1: &[u8],
        ephemeral_public_key: &[u8],
    ) -> Result<DerivedKeys> {
        derive_keys(self.hash, shared_secret, s1, ephemeral_public_key)
    }

    fn compute_mac(&self, mac_key: &[u8], s2: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        compute_mac(self.mac, mac_key, s2, ciphertext)
    }
}

/// Default key derivation
///
/// ```text
/// HASH(shared_secret || s1 || ephemeral_public_key)
///       │
///       ├──► first half  → cipher key
///       │
///       └──► second half → MAC key
/// ```
pub fn derive_keys(
    hash: HashType,
    shared_secret: &[u8],
    s1: &[u8],
    ephemeral_public_key: &[u8],
) -> Result<DerivedKeys> {
    if shared_secret.is_empty() {
        return Err(Error::KeyDerivationFailed("shared secret is empty".into()));
    }

    let digest = Zeroizing::new(hash.digest(&[shared_secret, s1, ephemeral_public_key]));
    let (cipher_key, mac_key) = digest.split_at(digest.len() / 2);

    Ok(DerivedKeys::new(cipher_key.to_vec(), mac_key.to_vec()))
}

/// Default MAC: `HMAC(mac_key, ciphertext || s2)`
pub fn compute_mac(mac: HashType, mac_key: &[u8], s2: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    mac.hmac(mac_key, &[ciphertext, s2])
}

/// Compare two tags in constant time
///
/// Returns `false` on a length mismatch. Otherwise every byte pair is
/// XORed and OR-accumulated before a single result is produced, so the
/// running time does not depend on where the tags differ.
pub fn mac_verify(expected: &[u8], recomputed: &[u8]) -> bool {
    if expected.len() != recomputed.len() {
        return false;
    }
    expected.ct_eq(recomputed).into()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_keys_deterministic() {
        let shared = [42u8; 32];

        let keys1 = derive_keys(HashType::Sha256, &shared, b"s1", b"ephem").unwrap();
        let keys2 = derive_keys(HashType::Sha256, &shared, b"s1", b"ephem").unwrap();

        assert_eq!(keys1.cipher_key(), keys2.cipher_key());
        assert_eq!(keys1.mac_key(), keys2.mac_key());
    }

    #[test]
    fn test_derive_keys_split_halves() {
        let shared = [42u8; 32];

        let keys = derive_keys(HashType::Sha512, &shared, b"", b"ephem").unwrap();
        let digest = HashType::Sha512.digest(&[&shared, b"", b"ephem"]);

        assert_eq!(keys.cipher_key(), &digest[..32]);
        assert_eq!(keys.mac_key(), &digest[32..]);
    }

    #[test]
    fn test_key_sizes_follow_hash() {
        let shared = [1u8; 32];

        let short = derive_keys(HashType::Sha256, &shared, b"", b"").unwrap();
        assert_eq!(short.cipher_key().len(), 16);
        assert_eq!(short.mac_key().len(), 16);

        let long = derive_keys(HashType::Sha512, &shared, b"", b"").unwrap();
        assert_eq!(long.cipher_key().len(), 32);
        assert_eq!(long.mac_key().len(), 32);
    }

    #[test]
    fn test_s1_changes_keys() {
        let shared = [42u8; 32];

        let keys1 = derive_keys(HashType::Sha256, &shared, b"context-a", b"ephem").unwrap();
        let keys2 = derive_keys(HashType::Sha256, &shared, b"context-b", b"ephem").unwrap();

        assert_ne!(keys1.cipher_key(), keys2.cipher_key());
    }

    #[test]
    fn test_empty_shared_secret_rejected() {
        let result = derive_keys(HashType::Sha256, &[], b"", b"ephem");
        assert!(matches!(result, Err(Error::KeyDerivationFailed(_))));
    }

    #[test]
    fn test_mac_covers_s2() {
        let key = [9u8; 16];

        let mac1 = compute_mac(HashType::Sha256, &key, b"", b"ciphertext").unwrap();
        let mac2 = compute_mac(HashType::Sha256, &key, b"extra", b"ciphertext").unwrap();

        assert_eq!(mac1.len(), 32);
        assert_ne!(mac1, mac2);
    }

    #[test]
    fn test_mac_is_hmac_over_ciphertext_then_s2() {
        let key = [9u8; 16];

        let split = compute_mac(HashType::Sha256, &key, b"s2", b"ciphertext").unwrap();
        let joined = HashType::Sha256.hmac(&key, &[b"ciphertexts2"]).unwrap();

        assert_eq!(split, joined);
    }

    #[test]
    fn test_mac_verify() {
        let tag = [7u8; 32];
        assert!(mac_verify(&tag, &tag));

        let mut first_differs = tag;
        first_differs[0] ^= 1;
        assert!(!mac_verify(&tag, &first_differs));

        let mut last_differs = tag;
        last_differs[31] ^= 0x80;
        assert!(!mac_verify(&tag, &last_differs));

        assert!(!mac_verify(&tag, &tag[..31]));
        assert!(!mac_verify(&[], &tag));
    }

    #[test]
    fn test_default_strategy_matches_free_functions() {
        let strategy = DefaultKeyStrategy {
            hash: HashType::Sha512,
            mac: HashType::Sha256,
        };
        let shared = [3u8; 32];

        let via_trait = strategy.derive_keys(&shared, b"a", b"b").unwrap();
        let direct = derive_keys(HashType::Sha512, &shared, b"a", b"b").unwrap();
        assert_eq!(via_trait.cipher_key(), direct.cipher_key());

        let mac = strategy.compute_mac(direct.mac_key(), b"s2", b"ct").unwrap();
        let expected = compute_mac(HashType::Sha256, direct.mac_key(), b"s2", b"ct").unwrap();
        assert_eq!(mac, expected);
    }

    #[test]
    fn test_hash_names() {
        assert_eq!("sha256".parse::<HashType>().unwrap(), HashType::Sha256);
        assert_eq!("SHA-512".parse::<HashType>().unwrap(), HashType::Sha512);
        assert!(matches!("md5".parse::<HashType>(), Err(Error::UnsupportedHash(_))));
    }
}
