//! # Error Handling
//!
//! This module provides the error types for ECIES Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ERROR CATEGORIES                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Crypto (300-399)         Primitive failures: cipher, key parsing,      │
//! │                           key agreement, signing                        │
//! │                                                                         │
//! │  Protocol (400-499)       Envelope-level failures: unknown curve,       │
//! │                           malformed envelope, MAC mismatch, scheme      │
//! │                           mismatch, missing key strategy                │
//! │                                                                         │
//! │  Configuration (500-599)  Unusable options: bad IV hex, unknown         │
//! │                           cipher or hash names                          │
//! │                                                                         │
//! │  Internal (900-999)       Serialization of envelopes and options        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is final. Nothing in this crate retries, and no operation
//! returns partial plaintext alongside an error.

use thiserror::Error;

/// Result type alias for ECIES Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ECIES Core
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Signature did not verify
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key exchange failed
    #[error("Key exchange failed: {0}")]
    KeyExchangeFailed(String),

    /// Key derivation failed
    #[error("Failed to derive keys: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Protocol Errors (400-499)
    // ========================================================================

    /// The curve tag is not one of the supported curves
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// Serialized envelope could not be decoded
    #[error("Invalid encrypted envelope: {0}")]
    InvalidEnvelope(String),

    /// The MAC recomputed at decrypt time did not match the stored MAC
    #[error("Authentication failed: envelope is corrupted or has been tampered with")]
    AuthenticationFailed,

    /// The envelope declares a scheme other than the one resolved for this call
    #[error("Scheme mismatch: expected '{expected}', envelope declares '{found}'")]
    SchemeMismatch {
        /// Scheme resolved from the override, options or curve default
        expected: String,
        /// Scheme stored in the envelope
        found: String,
    },

    /// A custom key strategy was selected but none was supplied
    #[error("Missing strategy: {0}")]
    MissingStrategy(String),

    // ========================================================================
    // Configuration Errors (500-599)
    // ========================================================================

    /// Options are present but unusable
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Unknown symmetric cipher name
    #[error("Unsupported symmetric cipher: {0}")]
    UnsupportedCipher(String),

    /// Unknown hash name
    #[error("Unsupported hash: {0}")]
    UnsupportedHash(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 300-399: Crypto
    /// - 400-499: Protocol
    /// - 500-599: Configuration
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Crypto (300-399)
            Error::EncryptionFailed(_) => 300,
            Error::DecryptionFailed(_) => 301,
            Error::SigningFailed(_) => 302,
            Error::VerificationFailed => 303,
            Error::InvalidKey(_) => 304,
            Error::KeyExchangeFailed(_) => 305,
            Error::KeyDerivationFailed(_) => 306,

            // Protocol (400-499)
            Error::UnsupportedCurve(_) => 400,
            Error::InvalidEnvelope(_) => 401,
            Error::AuthenticationFailed => 402,
            Error::SchemeMismatch { .. } => 403,
            Error::MissingStrategy(_) => 404,

            // Configuration (500-599)
            Error::InvalidOptions(_) => 500,
            Error::UnsupportedCipher(_) => 501,
            Error::UnsupportedHash(_) => 502,

            // Internal (900-999)
            Error::SerializationError(_) => 902,
            Error::DeserializationError(_) => 903,
        }
    }

    /// Check if this error means the envelope may have been tampered with
    ///
    /// Callers usually want to surface these differently from plain
    /// configuration mistakes.
    pub fn indicates_tampering(&self) -> bool {
        matches!(self, Error::AuthenticationFailed | Error::SchemeMismatch { .. })
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::DeserializationError(format!("Invalid hex: {}", err))
    }
}

// ============================================================================
// TESTS
// ============================================================================
