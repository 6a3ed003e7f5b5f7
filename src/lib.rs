//! # ECIES Core
//!
//! Asymmetric encryption, layered multi-recipient encryption and message
//! signing over secp256k1 and ed25519 keys.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ECIES CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   caller (hex keys, bytes, options)                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌────────────┐   │
//! │  │  Options    │──►│   Curve     │──►│  KDF / MAC  │──►│  Cipher    │   │
//! │  │  Composer   │   │  Agreement  │   │             │   │            │   │
//! │  └─────────────┘   └─────────────┘   └─────────────┘   └─────┬──────┘   │
//! │                                                              │          │
//! │                                                              ▼          │
//! │                                                   EncryptedEnvelope     │
//! │                                                                         │
//! │  Decryption runs the same path backwards, re-deriving every key from    │
//! │  the private key and the envelope's ephemeral public key.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Key agreement, envelopes, onion layering and signing
//!
//! ## Quick Start
//!
//! ```
//! use ecies_core::crypto::{
//!     decrypt_with_private_key, encrypt_with_public_key, generate_key_pair, CurveType,
//!     EncryptionOptions,
//! };
//!
//! let keys = generate_key_pair(CurveType::Secp256k1);
//! let options = EncryptionOptions::new();
//!
//! let envelope = encrypt_with_public_key(&keys.public_key, b"hello", &options, None)?;
//! let plaintext = decrypt_with_private_key(&envelope, &keys.private_key, &options, None)?;
//! assert_eq!(plaintext, b"hello");
//! # Ok::<(), ecies_core::Error>(())
//! ```
//!
//! ## Entry Points
//!
//! | Function | Purpose |
//! |----------|---------|
//! | `encrypt_with_public_key` | One recipient |
//! | `decrypt_with_private_key` | One recipient |
//! | `encrypt_with_public_keys` | Onion over several recipients |
//! | `decrypt_with_private_keys` | Onion over several recipients |
//! | `sign` | ECDSA secp256k1 |
//! | `verify_signed_with_public_key` | ECDSA secp256k1, returns `bool` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod crypto;
pub mod error;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{
    decrypt_with_private_key, decrypt_with_private_keys, encrypt_with_public_key,
    encrypt_with_public_keys, sign, verify_signed_with_public_key, CurveType, EncryptedEnvelope,
    EncryptionOptions,
};
pub use error::{Error, Result};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of ECIES Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns build information for debugging
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        target: std::env::consts::OS,
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Build information for debugging
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Crate version
    pub version: &'static str,
    /// Target operating system
    pub target: &'static str,
    /// Build profile (debug/release)
    pub profile: &'static str,
}

// ============================================================================
// TESTS
// ============================================================================
