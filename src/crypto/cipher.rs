//! # Symmetric Cipher
//!
//! AES in ECB, CBC and CTR modes, addressed by the `aes-<bits>-<mode>`
//! names used in option documents.
//!
//! | Name | Key | IV | Padding |
//! |------|-----|----|---------|
//! | `aes-128-ecb` | 16 bytes | none | PKCS#7 |
//! | `aes-256-ecb` | 32 bytes | none | PKCS#7 |
//! | `aes-128-cbc` | 16 bytes | 16 bytes | PKCS#7 |
//! | `aes-256-cbc` | 32 bytes | 16 bytes | PKCS#7 |
//! | `aes-128-ctr` | 16 bytes | 16 bytes | none (stream) |
//! | `aes-256-ctr` | 32 bytes | 16 bytes | none (stream) |
//!
//! The key is fresh for every envelope (it is derived from an ephemeral
//! agreement), so a fixed zero IV never repeats a key/IV pair.

use std::fmt;
use std::str::FromStr;

use aes::cipher::block_padding::{Pkcs7, UnpadError};
use aes::cipher::{
    BlockDecryptMut, BlockEncryptMut, InvalidLength, KeyInit, KeyIvInit, StreamCipher,
};
use aes::{Aes128, Aes256};

use crate::error::{Error, Result};

type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;
type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Block cipher mode of operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherMode {
    /// Electronic codebook, no IV
    Ecb,
    /// Cipher block chaining
    Cbc,
    /// Counter mode (stream)
    Ctr,
}

/// Supported symmetric ciphers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymmetricCipher {
    /// AES-128 in ECB mode
    Aes128Ecb,
    /// AES-256 in ECB mode
    Aes256Ecb,
    /// AES-128 in CBC mode
    Aes128Cbc,
    /// AES-256 in CBC mode
    Aes256Cbc,
    /// AES-128 in CTR mode
    Aes128Ctr,
    /// AES-256 in CTR mode
    Aes256Ctr,
}

impl SymmetricCipher {
    /// All supported ciphers
    pub const ALL: [SymmetricCipher; 6] = [
        SymmetricCipher::Aes128Ecb,
        SymmetricCipher::Aes256Ecb,
        SymmetricCipher::Aes128Cbc,
        SymmetricCipher::Aes256Cbc,
        SymmetricCipher::Aes128Ctr,
        SymmetricCipher::Aes256Ctr,
    ];

    /// Canonical name, e.g. `aes-128-ecb`
    pub fn as_str(&self) -> &'static str {
        match self {
            SymmetricCipher::Aes128Ecb => "aes-128-ecb",
            SymmetricCipher::Aes256Ecb => "aes-256-ecb",
            SymmetricCipher::Aes128Cbc => "aes-128-cbc",
            SymmetricCipher::Aes256Cbc => "aes-256-cbc",
            SymmetricCipher::Aes128Ctr => "aes-128-ctr",
            SymmetricCipher::Aes256Ctr => "aes-256-ctr",
        }
    }

    /// Mode of operation
    pub fn mode(&self) -> CipherMode {
        match self {
            SymmetricCipher::Aes128Ecb | SymmetricCipher::Aes256Ecb => CipherMode::Ecb,
            SymmetricCipher::Aes128Cbc | SymmetricCipher::Aes256Cbc => CipherMode::Cbc,
            SymmetricCipher::Aes128Ctr | SymmetricCipher::Aes256Ctr => CipherMode::Ctr,
        }
    }

    /// Key size in bytes
    pub fn key_size(&self) -> usize {
        match self {
            SymmetricCipher::Aes128Ecb | SymmetricCipher::Aes128Cbc | SymmetricCipher::Aes128Ctr => 16,
            SymmetricCipher::Aes256Ecb | SymmetricCipher::Aes256Cbc | SymmetricCipher::Aes256Ctr => 32,
        }
    }

    /// IV size in bytes the mode structurally requires (0 for ECB)
    pub fn iv_size(&self) -> usize {
        match self.mode() {
            CipherMode::Ecb => 0,
            CipherMode::Cbc | CipherMode::Ctr => BLOCK_SIZE,
        }
    }

    /// Whether the mode needs an IV at all
    pub fn requires_iv(&self) -> bool {
        self.iv_size() > 0
    }

    /// Encrypt `plaintext` with `key` and `iv`
    pub fn encrypt(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;
        self.check_iv(iv).map_err(Error::EncryptionFailed)?;

        let invalid = |e: InvalidLength| Error::EncryptionFailed(format!("{}: {}", self, e));

        let ciphertext = match self {
            SymmetricCipher::Aes128Ecb => Aes128EcbEnc::new_from_slice(key)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            SymmetricCipher::Aes256Ecb => Aes256EcbEnc::new_from_slice(key)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            SymmetricCipher::Aes128Cbc => Aes128CbcEnc::new_from_slices(key, iv)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            SymmetricCipher::Aes256Cbc => Aes256CbcEnc::new_from_slices(key, iv)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            SymmetricCipher::Aes128Ctr => {
                let mut buffer = plaintext.to_vec();
                Aes128Ctr::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .apply_keystream(&mut buffer);
                buffer
            }
            SymmetricCipher::Aes256Ctr => {
                let mut buffer = plaintext.to_vec();
                Aes256Ctr::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .apply_keystream(&mut buffer);
                buffer
            }
        };

        Ok(ciphertext)
    }

    /// Decrypt `ciphertext` with `key` and `iv`
    ///
    /// ## Errors
    ///
    /// Returns `DecryptionFailed` on a bad IV length or bad padding.
    pub fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;
        self.check_iv(iv).map_err(Error::DecryptionFailed)?;

        let invalid = |e: InvalidLength| Error::DecryptionFailed(format!("{}: {}", self, e));
        let unpad = |_: UnpadError| Error::DecryptionFailed(format!("{}: invalid padding", self));

        match self {
            SymmetricCipher::Aes128Ecb => Aes128EcbDec::new_from_slice(key)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(unpad),
            SymmetricCipher::Aes256Ecb => Aes256EcbDec::new_from_slice(key)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(unpad),
            SymmetricCipher::Aes128Cbc => Aes128CbcDec::new_from_slices(key, iv)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(unpad),
            SymmetricCipher::Aes256Cbc => Aes256CbcDec::new_from_slices(key, iv)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(unpad),
            SymmetricCipher::Aes128Ctr => {
                let mut buffer = ciphertext.to_vec();
                Aes128Ctr::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .apply_keystream(&mut buffer);
                Ok(buffer)
            }
            SymmetricCipher::Aes256Ctr => {
                let mut buffer = ciphertext.to_vec();
                Aes256Ctr::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .apply_keystream(&mut buffer);
                Ok(buffer)
            }
        }
    }

    fn check_key(&self, key: &[u8]) -> Result<()> {
        if key.len() != self.key_size() {
            return Err(Error::InvalidKey(format!(
                "{} requires a {}-byte key, got {}",
                self,
                self.key_size(),
                key.len()
            )));
        }
        Ok(())
    }

    fn check_iv(&self, iv: &[u8]) -> std::result::Result<(), String> {
        if iv.len() != self.iv_size() {
            return Err(format!(
                "{} requires a {}-byte IV, got {}",
                self,
                self.iv_size(),
                iv.len()
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SymmetricCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymmetricCipher {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_ascii_lowercase();
        SymmetricCipher::ALL
            .into_iter()
            .find(|cipher| cipher.as_str() == normalized)
            .ok_or_else(|| Error::UnsupportedCipher(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
