//! # Cryptography Module
//!
//! ECIES encryption, onion layering and signing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CRYPTOGRAPHIC ARCHITECTURE                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  onion        encrypt_with_public_keys / decrypt_with_private_keys│  │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 ▼                                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  ecies        encrypt_with_public_key / decrypt_with_private_key │   │
//! │  └───────┬──────────────┬───────────────┬───────────────┬──────────┘   │
//! │          ▼              ▼               ▼               ▼              │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐       │
//! │  │  options    │ │  curve      │ │  kdf        │ │  cipher     │       │
//! │  │             │ │             │ │             │ │             │       │
//! │  │ • defaults  │ │ • secp256k1 │ │ • hash+split│ │ • AES-128   │       │
//! │  │ • IV rules  │ │ • ed25519   │ │ • HMAC      │ │ • AES-256   │       │
//! │  │ • scheme    │ │ • ephemeral │ │ • strategy  │ │ • ECB/CBC/  │       │
//! │  │             │ │   keys      │ │   trait     │ │   CTR       │       │
//! │  └─────────────┘ └─────────────┘ └─────────────┘ └─────────────┘       │
//! │                                                                         │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐                        │
//! │  │  envelope   │ │  signing    │ │  keys       │                        │
//! │  │ wire format │ │ ECDSA       │ │ generation  │                        │
//! │  └─────────────┘ └─────────────┘ └─────────────┘                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose |
//! |-----------|---------|
//! | secp256k1 ECDH | Key agreement |
//! | X25519 over ed25519 keys | Key agreement |
//! | SHA-256 / SHA-512 | Key derivation (hash, then split in half) |
//! | HMAC-SHA256 / HMAC-SHA512 | Envelope authentication |
//! | AES-128 / AES-256 in ECB, CBC, CTR | Payload encryption |
//! | ECDSA secp256k1, RFC 6979 | Signing |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: shared secrets and derived keys are zeroized when dropped
//! 2. **Constant-Time MAC Check**: tags are compared with `subtle`
//! 3. **Secure Random**: ephemeral keys come from `rand::rngs::OsRng`
//! 4. **Authenticate First**: nothing is decrypted before the MAC verifies

mod cipher;
mod curve;
mod ecies;
mod envelope;
mod kdf;
mod keys;
mod onion;
mod options;
mod signing;

pub use cipher::{CipherMode, SymmetricCipher, BLOCK_SIZE};
pub use curve::{
    CurveType, KeyFormat, SenderAgreement, SharedSecret, ED25519_DEFAULT_SCHEME,
    SECP256K1_DEFAULT_SCHEME,
};
pub use ecies::{
    decrypt_string_with_private_key, decrypt_with_private_key, encrypt_string_with_public_key,
    encrypt_with_public_key,
};
pub use envelope::{is_encrypted_envelope, EncryptedEnvelope, EnvelopeInput};
pub use kdf::{compute_mac, derive_keys, mac_verify, DefaultKeyStrategy, DerivedKeys, HashType, KeyStrategy};
pub use keys::{generate_key_pair, public_key_from_private, KeyPairHex};
pub use onion::{decrypt_with_private_keys, encrypt_with_public_keys};
pub use options::{ComposedOptions, EncryptionDefaults, EncryptionOptions, IvSetting, StrategyKind};
pub use signing::{sign, sign_with_key, verify, verify_signed_with_public_key, Signature, SIGNATURE_SIZE};
