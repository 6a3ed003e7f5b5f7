//! # Options
//!
//! Caller-facing encryption options and the composer that merges them with
//! the defaults into a fully-populated [`ComposedOptions`].
//!
//! ## Composition
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       OPTIONS COMPOSITION                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  EncryptionOptions (partial)      EncryptionDefaults (immutable)        │
//! │           │                                 │                           │
//! │           └──────────────┬──────────────────┘                           │
//! │                          ▼                                              │
//! │                  ComposedOptions                                        │
//! │                  • curve, cipher, hashes, key format                    │
//! │                  • iv, s1, s2 as bytes                                  │
//! │                  • scheme (if configured)                               │
//! │                  • key strategy (default or custom)                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## IV Resolution
//!
//! | Setting | ECB | CBC / CTR |
//! |---------|-----|-----------|
//! | derive (field absent, or `""` in JSON) | empty | 16 zero bytes |
//! | `null` | empty | empty (the cipher then rejects it) |
//! | hex string | parsed | parsed |
//!
//! When no cipher is configured the default cipher is used and the IV is
//! always derived, whatever the caller put in `iv`.
//!
//! ## Key Derivation Hash
//!
//! The default strategy splits the hash output in half, so the hash must
//! produce twice the cipher's key size: `sha256` for AES-128 and `sha512`
//! for AES-256. Leaving `hashCipherType` unset picks the matching one. An
//! explicit hash that does not match fails composition with
//! [`Error::InvalidOptions`]. Custom strategies size their own keys and are
//! not checked.
//!
//! ## JSON Option Documents
//!
//! Field names are camelCase. `iv` follows the table above: an absent field
//! or an empty string derives the IV, `null` asks for none.
//!
//! ```json
//! {
//!   "curveType": "ed25519",
//!   "symmetricCipherType": "aes-256-ctr",
//!   "hashCipherType": "sha512",
//!   "macCipherType": "sha256",
//!   "iv": null,
//!   "s1": "context",
//!   "scheme": "my.scheme"
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use super::cipher::SymmetricCipher;
use super::curve::{CurveType, KeyFormat};
use super::kdf::{DefaultKeyStrategy, HashType, KeyStrategy};
use crate::error::{Error, Result};

/// How the IV is chosen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IvSetting {
    /// Derive from the cipher mode (zero buffer when the mode needs one)
    #[default]
    Derive,
    /// Explicitly no IV, even for modes that need one
    NoIv,
    /// Explicit IV as hex
    Hex(String),
}

/// Which key strategy to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyKind {
    /// Hash-and-split derivation with HMAC
    #[default]
    Default,
    /// Caller-supplied [`KeyStrategy`]
    Custom,
}

/// Immutable defaults that options are composed against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncryptionDefaults {
    /// Curve used when none is configured
    pub curve_type: CurveType,
    /// Cipher used when none is configured
    pub symmetric_cipher_type: SymmetricCipher,
    /// HMAC hash used when none is configured
    pub mac_cipher_type: HashType,
    /// Point format used when none is configured
    pub key_format: KeyFormat,
}

impl EncryptionDefaults {
    /// The standard defaults: secp256k1, AES-128-ECB, HMAC-SHA256, compressed points
    pub const STANDARD: EncryptionDefaults = EncryptionDefaults {
        curve_type: CurveType::Secp256k1,
        symmetric_cipher_type: SymmetricCipher::Aes128Ecb,
        mac_cipher_type: HashType::Sha256,
        key_format: KeyFormat::Compressed,
    };

    /// Key derivation hash whose half-split yields a key for `cipher`
    pub fn hash_for(cipher: SymmetricCipher) -> HashType {
        if cipher.key_size() > 16 {
            HashType::Sha512
        } else {
            HashType::Sha256
        }
    }
}

impl Default for EncryptionDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Options for a single encrypt or decrypt call
///
/// Every field is optional. Unset fields fall back to
/// [`EncryptionDefaults`] during composition.
#[derive(Clone, Default)]
pub struct EncryptionOptions {
    /// Hash for key derivation
    pub hash_cipher_type: Option<HashType>,
    /// Hash for the HMAC
    pub mac_cipher_type: Option<HashType>,
    /// Curve for key agreement
    pub curve_type: Option<CurveType>,
    /// Symmetric cipher
    pub symmetric_cipher_type: Option<SymmetricCipher>,
    /// secp256k1 point format for the ephemeral key
    pub key_format: Option<KeyFormat>,
    /// IV selection
    pub iv: IvSetting,
    /// Shared context mixed into key derivation
    pub s1: Option<String>,
    /// Shared context mixed into the MAC
    pub s2: Option<String>,
    /// Scheme name override
    pub scheme: Option<String>,
    /// Strategy selection
    pub key_strategy: StrategyKind,
    /// Strategy object used when `key_strategy` is `Custom`
    pub custom_strategy: Option<Arc<dyn KeyStrategy>>,
}

impl fmt::Debug for EncryptionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionOptions")
            .field("hash_cipher_type", &self.hash_cipher_type)
            .field("mac_cipher_type", &self.mac_cipher_type)
            .field("curve_type", &self.curve_type)
            .field("symmetric_cipher_type", &self.symmetric_cipher_type)
            .field("key_format", &self.key_format)
            .field("iv", &self.iv)
            .field("scheme", &self.scheme)
            .field("key_strategy", &self.key_strategy)
            .field("custom_strategy", &self.custom_strategy.is_some())
            .finish_non_exhaustive()
    }
}

impl EncryptionOptions {
    /// Empty options (everything from defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a specific curve
    pub fn for_curve(curve: CurveType) -> Self {
        Self::new().curve(curve)
    }

    /// Set the curve
    pub fn curve(mut self, curve: CurveType) -> Self {
        self.curve_type = Some(curve);
        self
    }

    /// Set the symmetric cipher
    pub fn cipher(mut self, cipher: SymmetricCipher) -> Self {
        self.symmetric_cipher_type = Some(cipher);
        self
    }

    /// Set the key derivation hash
    pub fn hash(mut self, hash: HashType) -> Self {
        self.hash_cipher_type = Some(hash);
        self
    }

    /// Set the HMAC hash
    pub fn mac(mut self, mac: HashType) -> Self {
        self.mac_cipher_type = Some(mac);
        self
    }

    /// Set the secp256k1 point format
    pub fn key_format(mut self, format: KeyFormat) -> Self {
        self.key_format = Some(format);
        self
    }

    /// Use an explicit hex IV
    pub fn iv_hex(mut self, iv: impl Into<String>) -> Self {
        self.iv = IvSetting::Hex(iv.into());
        self
    }

    /// Use no IV at all
    pub fn no_iv(mut self) -> Self {
        self.iv = IvSetting::NoIv;
        self
    }

    /// Set the key derivation context
    pub fn s1(mut self, s1: impl Into<String>) -> Self {
        self.s1 = Some(s1.into());
        self
    }

    /// Set the MAC context
    pub fn s2(mut self, s2: impl Into<String>) -> Self {
        self.s2 = Some(s2.into());
        self
    }

    /// Set the scheme name
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Use a custom key strategy
    pub fn with_key_strategy(mut self, strategy: Arc<dyn KeyStrategy>) -> Self {
        self.key_strategy = StrategyKind::Custom;
        self.custom_strategy = Some(strategy);
        self
    }

    /// Parse an option document
    ///
    /// Unknown curve, cipher or hash names fail with the matching
    /// `Unsupported*` error rather than a generic deserialization error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawOptions = serde_json::from_str(json)?;
        raw.try_into()
    }
}

// ============================================================================
// JSON DOCUMENT
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOptions {
    hash_cipher_type: Option<String>,
    mac_cipher_type: Option<String>,
    curve_type: Option<String>,
    symmetric_cipher_type: Option<String>,
    key_format: Option<String>,
    #[serde(default, deserialize_with = "deserialize_iv")]
    iv: IvSetting,
    s1: Option<String>,
    s2: Option<String>,
    scheme: Option<String>,
    key_strategy: Option<String>,
}

/// `null` means no IV; a missing field never reaches this function
fn deserialize_iv<'de, D>(deserializer: D) -> std::result::Result<IvSetting, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
        None => IvSetting::NoIv,
        Some(hex) if hex.is_empty() => IvSetting::Derive,
        Some(hex) => IvSetting::Hex(hex),
    })
}

impl TryFrom<RawOptions> for EncryptionOptions {
    type Error = Error;

    fn try_from(raw: RawOptions) -> Result<Self> {
        let key_strategy = match raw.key_strategy.as_deref() {
            None | Some("default") => StrategyKind::Default,
            Some("custom") => StrategyKind::Custom,
            Some(other) => {
                return Err(Error::InvalidOptions(format!("Unknown key strategy: {}", other)))
            }
        };

        Ok(Self {
            hash_cipher_type: raw.hash_cipher_type.map(|s| s.parse()).transpose()?,
            mac_cipher_type: raw.mac_cipher_type.map(|s| s.parse()).transpose()?,
            curve_type: raw.curve_type.map(|s| s.parse()).transpose()?,
            symmetric_cipher_type: raw.symmetric_cipher_type.map(|s| s.parse()).transpose()?,
            key_format: raw.key_format.map(|s| s.parse()).transpose()?,
            iv: raw.iv,
            s1: raw.s1,
            s2: raw.s2,
            scheme: raw.scheme,
            key_strategy,
            custom_strategy: None,
        })
    }
}

// ============================================================================
// COMPOSED OPTIONS
// ============================================================================

/// Fully-resolved options for one call
#[derive(Clone)]
pub struct ComposedOptions {
    /// Curve for key agreement
    pub curve: CurveType,
    /// Symmetric cipher
    pub cipher: SymmetricCipher,
    /// Key derivation hash
    pub hash: HashType,
    /// HMAC hash
    pub mac: HashType,
    /// secp256k1 point format
    pub key_format: KeyFormat,
    /// IV bytes (possibly empty)
    pub iv: Vec<u8>,
    /// Key derivation context bytes
    pub s1: Vec<u8>,
    /// MAC context bytes
    pub s2: Vec<u8>,
    /// Scheme configured in the options, if any
    pub scheme: Option<String>,
    /// Key strategy for this call
    pub strategy: Arc<dyn KeyStrategy>,
}

impl fmt::Debug for ComposedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedOptions")
            .field("curve", &self.curve)
            .field("cipher", &self.cipher)
            .field("hash", &self.hash)
            .field("mac", &self.mac)
            .field("key_format", &self.key_format)
            .field("iv", &hex::encode(&self.iv))
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl ComposedOptions {
    /// Compose against [`EncryptionDefaults::STANDARD`]
    pub fn compose(options: &EncryptionOptions) -> Result<Self> {
        Self::compose_with(options, &EncryptionDefaults::STANDARD)
    }

    /// Compose against explicit defaults
    pub fn compose_with(options: &EncryptionOptions, defaults: &EncryptionDefaults) -> Result<Self> {
        let (cipher, iv_setting) = match options.symmetric_cipher_type {
            Some(cipher) => (cipher, &options.iv),
            None => (defaults.symmetric_cipher_type, &IvSetting::Derive),
        };

        let iv = match iv_setting {
            IvSetting::NoIv => Vec::new(),
            IvSetting::Hex(hex_iv) if !hex_iv.is_empty() => {
                hex::decode(hex_iv.trim().trim_start_matches("0x"))
                    .map_err(|e| Error::InvalidOptions(format!("Invalid IV hex: {}", e)))?
            }
            IvSetting::Derive | IvSetting::Hex(_) => vec![0u8; cipher.iv_size()],
        };

        let hash = options
            .hash_cipher_type
            .unwrap_or_else(|| EncryptionDefaults::hash_for(cipher));
        let mac = options.mac_cipher_type.unwrap_or(defaults.mac_cipher_type);

        let strategy: Arc<dyn KeyStrategy> = match options.key_strategy {
            StrategyKind::Default => {
                if hash.output_size() / 2 != cipher.key_size() {
                    return Err(Error::InvalidOptions(format!(
                        "{} derives {}-byte keys but {} needs {}",
                        hash,
                        hash.output_size() / 2,
                        cipher,
                        cipher.key_size()
                    )));
                }
                Arc::new(DefaultKeyStrategy { hash, mac })
            }
            StrategyKind::Custom => options.custom_strategy.clone().ok_or_else(|| {
                Error::MissingStrategy("custom key strategy selected but none was supplied".into())
            })?,
        };

        Ok(Self {
            curve: options.curve_type.unwrap_or(defaults.curve_type),
            cipher,
            hash,
            mac,
            key_format: options.key_format.unwrap_or(defaults.key_format),
            iv,
            s1: options.s1.as_deref().unwrap_or_default().as_bytes().to_vec(),
            s2: options.s2.as_deref().unwrap_or_default().as_bytes().to_vec(),
            scheme: options.scheme.clone(),
            strategy,
        })
    }

    /// Scheme for this call: explicit override, else options, else curve default
    pub fn resolve_scheme(&self, scheme_override: Option<&str>) -> String {
        scheme_override
            .or(self.scheme.as_deref())
            .unwrap_or_else(|| self.curve.default_scheme())
            .to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::DerivedKeys;

    struct FixedStrategy;

    impl KeyStrategy for FixedStrategy {
        fn derive_keys(&self, _: &[u8], _: &[u8], _: &[u8]) -> Result<DerivedKeys> {
            Ok(DerivedKeys::new(vec![1u8; 16], vec![2u8; 16]))
        }

        fn compute_mac(&self, _: &[u8], _: &[u8], _: &[u8]) -> Result<Vec<u8>> {
            Ok(vec![3u8; 8])
        }
    }

    #[test]
    fn test_defaults() {
        let composed = ComposedOptions::compose(&EncryptionOptions::new()).unwrap();

        assert_eq!(composed.curve, CurveType::Secp256k1);
        assert_eq!(composed.cipher, SymmetricCipher::Aes128Ecb);
        assert_eq!(composed.hash, HashType::Sha256);
        assert_eq!(composed.mac, HashType::Sha256);
        assert_eq!(composed.key_format, KeyFormat::Compressed);
        assert!(composed.iv.is_empty());
        assert!(composed.s1.is_empty());
        assert!(composed.s2.is_empty());
        assert!(composed.scheme.is_none());
    }

    #[test]
    fn test_derived_iv_for_counter_mode() {
        let options = EncryptionOptions::new().cipher(SymmetricCipher::Aes256Ctr);
        let composed = ComposedOptions::compose(&options).unwrap();

        assert_eq!(composed.iv, vec![0u8; 16]);
        assert_eq!(composed.hash, HashType::Sha512);
    }

    #[test]
    fn test_null_iv_overrides_mode_requirement() {
        let options = EncryptionOptions::new()
            .cipher(SymmetricCipher::Aes128Ctr)
            .no_iv();
        let composed = ComposedOptions::compose(&options).unwrap();

        assert!(composed.iv.is_empty());
    }

    #[test]
    fn test_explicit_iv() {
        let options = EncryptionOptions::new()
            .cipher(SymmetricCipher::Aes128Cbc)
            .iv_hex("000102030405060708090a0b0c0d0e0f");
        let composed = ComposedOptions::compose(&options).unwrap();

        assert_eq!(composed.iv, (0u8..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_iv_ignored_without_cipher() {
        let options = EncryptionOptions::new().iv_hex("00112233445566778899aabbccddeeff");
        let composed = ComposedOptions::compose(&options).unwrap();

        // Default cipher is ECB, so the derived IV is empty
        assert!(composed.iv.is_empty());
    }

    #[test]
    fn test_invalid_iv_hex() {
        let options = EncryptionOptions::new()
            .cipher(SymmetricCipher::Aes128Cbc)
            .iv_hex("not-hex");
        let result = ComposedOptions::compose(&options);

        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_context_strings_become_bytes() {
        let options = EncryptionOptions::new().s1("alpha").s2("beta");
        let composed = ComposedOptions::compose(&options).unwrap();

        assert_eq!(composed.s1, b"alpha");
        assert_eq!(composed.s2, b"beta");
    }

    #[test]
    fn test_explicit_hash_must_fit_cipher() {
        let matching = EncryptionOptions::new()
            .cipher(SymmetricCipher::Aes256Cbc)
            .hash(HashType::Sha512);
        assert_eq!(ComposedOptions::compose(&matching).unwrap().hash, HashType::Sha512);

        let too_long = EncryptionOptions::new().hash(HashType::Sha512);
        assert!(matches!(
            ComposedOptions::compose(&too_long),
            Err(Error::InvalidOptions(ref msg)) if msg.contains("aes-128-ecb")
        ));

        let too_short = EncryptionOptions::new()
            .cipher(SymmetricCipher::Aes256Cbc)
            .hash(HashType::Sha256);
        assert!(matches!(
            ComposedOptions::compose(&too_short),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_explicit_hash_unchecked_for_custom_strategy() {
        let options = EncryptionOptions::new()
            .cipher(SymmetricCipher::Aes128Ctr)
            .hash(HashType::Sha512)
            .with_key_strategy(Arc::new(FixedStrategy));
        let composed = ComposedOptions::compose(&options).unwrap();

        assert_eq!(composed.hash, HashType::Sha512);
    }

    #[test]
    fn test_from_json_mismatched_hash() {
        let options = EncryptionOptions::from_json(r#"{"hashCipherType": "sha512"}"#).unwrap();
        assert!(matches!(
            ComposedOptions::compose(&options),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_custom_strategy_without_object() {
        let options = EncryptionOptions {
            key_strategy: StrategyKind::Custom,
            ..Default::default()
        };
        let result = ComposedOptions::compose(&options);

        assert!(matches!(result, Err(Error::MissingStrategy(_))));
    }

    #[test]
    fn test_custom_strategy_is_used() {
        let options = EncryptionOptions::new().with_key_strategy(Arc::new(FixedStrategy));
        let composed = ComposedOptions::compose(&options).unwrap();

        let keys = composed.strategy.derive_keys(b"x", b"", b"").unwrap();
        assert_eq!(keys.cipher_key(), &[1u8; 16]);
    }

    #[test]
    fn test_scheme_resolution_order() {
        let plain = ComposedOptions::compose(&EncryptionOptions::for_curve(CurveType::Ed25519)).unwrap();
        assert_eq!(plain.resolve_scheme(None), CurveType::Ed25519.default_scheme());

        let configured =
            ComposedOptions::compose(&EncryptionOptions::new().scheme("from.options")).unwrap();
        assert_eq!(configured.resolve_scheme(None), "from.options");
        assert_eq!(configured.resolve_scheme(Some("from.override")), "from.override");
    }

    #[test]
    fn test_compose_with_custom_defaults() {
        let defaults = EncryptionDefaults {
            curve_type: CurveType::Ed25519,
            symmetric_cipher_type: SymmetricCipher::Aes256Cbc,
            mac_cipher_type: HashType::Sha512,
            key_format: KeyFormat::Uncompressed,
        };
        let composed = ComposedOptions::compose_with(&EncryptionOptions::new(), &defaults).unwrap();

        assert_eq!(composed.curve, CurveType::Ed25519);
        assert_eq!(composed.cipher, SymmetricCipher::Aes256Cbc);
        assert_eq!(composed.iv.len(), 16);
        assert_eq!(composed.hash, HashType::Sha512);
        assert_eq!(composed.mac, HashType::Sha512);
    }

    #[test]
    fn test_from_json() {
        let options = EncryptionOptions::from_json(
            r#"{
                "curveType": "ed25519",
                "symmetricCipherType": "aes-256-ctr",
                "macCipherType": "sha512",
                "iv": null,
                "s1": "context",
                "scheme": "custom.scheme"
            }"#,
        )
        .unwrap();

        assert_eq!(options.curve_type, Some(CurveType::Ed25519));
        assert_eq!(options.symmetric_cipher_type, Some(SymmetricCipher::Aes256Ctr));
        assert_eq!(options.mac_cipher_type, Some(HashType::Sha512));
        assert_eq!(options.iv, IvSetting::NoIv);
        assert_eq!(options.s1.as_deref(), Some("context"));
        assert_eq!(options.scheme.as_deref(), Some("custom.scheme"));
    }

    #[test]
    fn test_from_json_missing_iv_derives() {
        let options = EncryptionOptions::from_json(r#"{"symmetricCipherType": "aes-128-cbc"}"#).unwrap();
        assert_eq!(options.iv, IvSetting::Derive);
    }

    #[test]
    fn test_from_json_empty_iv_derives() {
        let options = EncryptionOptions::from_json(
            r#"{"symmetricCipherType": "aes-128-ctr", "iv": "", "keyFormat": "uncompressed"}"#,
        )
        .unwrap();
        assert_eq!(options.iv, IvSetting::Derive);
        assert_eq!(options.key_format, Some(KeyFormat::Uncompressed));

        let composed = ComposedOptions::compose(&options).unwrap();
        assert_eq!(composed.iv, vec![0u8; 16]);
    }

    #[test]
    fn test_from_json_unknown_curve() {
        let result = EncryptionOptions::from_json(r#"{"curveType": "p256"}"#);
        assert!(matches!(result, Err(Error::UnsupportedCurve(ref c)) if c == "p256"));
    }

    #[test]
    fn test_from_json_custom_strategy_needs_object() {
        let options = EncryptionOptions::from_json(r#"{"keyStrategy": "custom"}"#).unwrap();
        assert!(matches!(
            ComposedOptions::compose(&options),
            Err(Error::MissingStrategy(_))
        ));
    }
}
