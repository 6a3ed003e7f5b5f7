//! # Encryption Demo
//!
//! Encrypts a message to a public key on each curve and decrypts it again.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example encryption_demo
//! ```

use ecies_core::crypto::{
    decrypt_string_with_private_key, encrypt_string_with_public_key, generate_key_pair, CurveType,
    EncryptedEnvelope, EncryptionOptions, SymmetricCipher,
};

fn main() -> ecies_core::Result<()> {
    println!("=== ECIES Core: Encryption Demo ===\n");

    let message = "Meet me at the usual place at noon.";

    for curve in CurveType::ALL {
        // Step 1: Create a recipient
        println!("[{}] Step 1: Creating recipient keypair...", curve);
        let recipient = generate_key_pair(curve);
        println!("  Public key: {}", recipient.public_key);
        println!();

        // Step 2: Encrypt
        println!("[{}] Step 2: Encrypting with AES-256-CBC...", curve);
        let options = EncryptionOptions::for_curve(curve).cipher(SymmetricCipher::Aes256Cbc);
        let envelope = encrypt_string_with_public_key(&recipient.public_key, message, &options, None)?;

        let json = envelope.to_json()?;
        println!("  Envelope: {}", json);
        println!("  Scheme: {}", envelope.scheme.as_deref().unwrap_or("-"));
        println!();

        // Step 3: Decrypt from the serialized form
        println!("[{}] Step 3: Decrypting...", curve);
        let decrypted =
            decrypt_string_with_private_key(json.as_str(), &recipient.private_key, &options, None)?;
        println!("  Plaintext: \"{}\"", decrypted);
        assert_eq!(decrypted, message);
        println!();

        // Step 4: Tamper with the ciphertext
        println!("[{}] Step 4: Tampering with the ciphertext...", curve);
        let tampered = flip_first_ciphertext_bit(&envelope);
        match decrypt_string_with_private_key(&tampered, &recipient.private_key, &options, None) {
            Ok(_) => println!("  [UNEXPECTED] Tampered envelope decrypted"),
            Err(e) => println!("  [OK] Rejected: {} (code {})", e, e.code()),
        }
        println!();
    }

    println!("=== Demo Complete ===");
    Ok(())
}

fn flip_first_ciphertext_bit(envelope: &EncryptedEnvelope) -> EncryptedEnvelope {
    let mut tampered = envelope.clone();
    let mut ciphertext = hex::decode(&envelope.ciphertext).unwrap_or_default();
    if let Some(first) = ciphertext.first_mut() {
        *first ^= 0x01;
    }
    tampered.ciphertext = hex::encode(ciphertext);
    tampered
}
